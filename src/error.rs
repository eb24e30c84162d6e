// error.rs - Error types for recursion expansion.
//
// Every failure is terminal for the call: no partial pattern is returned.
// Each variant renders the message a pattern author sees; `ErrorKind` lets
// callers branch on the failure without matching on payloads.

use thiserror::Error;

/// Error returned when a pattern's recursion directives cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecursionError {
    /// Depth literal is not a canonical integer in `2..=100`.
    #[error("Max depth must be integer between 2 and 100; used {literal}")]
    InvalidDepth { literal: String },

    /// Numbered backreference combined with recursion over captures.
    #[error("{subject} cannot be used with {context}")]
    UnsupportedBackref {
        subject: &'static str,
        context: &'static str,
    },

    /// `(?(DEFINE)...)` group combined with recursion.
    #[error("DEFINE groups cannot be used with recursion")]
    ForbiddenDefine,

    /// More than one recursion directive, or nested/mutual recursion.
    #[error("Cannot use multiple overlapping recursions")]
    OverlappingRecursion,

    /// Subpattern recursion outside the group it references.
    #[error("Recursive \\g cannot be used outside the referenced group \"{reference}\"")]
    InvalidReference { reference: String },
}

/// Discriminant of a [`RecursionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDepth,
    UnsupportedBackref,
    ForbiddenDefine,
    OverlappingRecursion,
    InvalidReference,
}

impl RecursionError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecursionError::InvalidDepth { .. } => ErrorKind::InvalidDepth,
            RecursionError::UnsupportedBackref { .. } => ErrorKind::UnsupportedBackref,
            RecursionError::ForbiddenDefine => ErrorKind::ForbiddenDefine,
            RecursionError::OverlappingRecursion => ErrorKind::OverlappingRecursion,
            RecursionError::InvalidReference { .. } => ErrorKind::InvalidReference,
        }
    }

    pub(crate) fn invalid_depth(literal: &str) -> Self {
        RecursionError::InvalidDepth {
            literal: literal.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_depth_message() {
        let err = RecursionError::invalid_depth("101");
        assert_eq!(err.kind(), ErrorKind::InvalidDepth);
        assert_eq!(
            err.to_string(),
            "Max depth must be integer between 2 and 100; used 101"
        );
    }

    #[test]
    fn unsupported_backref_message() {
        let err = RecursionError::UnsupportedBackref {
            subject: "Numbered backrefs",
            context: "global recursion",
        };
        assert_eq!(err.kind(), ErrorKind::UnsupportedBackref);
        assert_eq!(
            err.to_string(),
            "Numbered backrefs cannot be used with global recursion"
        );
    }

    #[test]
    fn invalid_reference_message() {
        let err = RecursionError::InvalidReference {
            reference: r"\g<a&R=2>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"Recursive \g cannot be used outside the referenced group "\g<a&R=2>""#
        );
    }

    #[test]
    fn unit_variants() {
        assert_eq!(
            RecursionError::ForbiddenDefine.to_string(),
            "DEFINE groups cannot be used with recursion"
        );
        assert_eq!(
            RecursionError::OverlappingRecursion.kind(),
            ErrorKind::OverlappingRecursion
        );
    }

    #[test]
    fn error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(RecursionError::ForbiddenDefine);
        assert!(err.source().is_none());
    }
}
