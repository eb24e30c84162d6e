// expand.rs - Public entry point: validate directives and unroll recursion.
//
// Control flow: pre-check, scan, validate, unroll, capture bookkeeping.
// Validation runs fail-fast in a fixed order: depth literals, numbered
// backrefs, DEFINE groups, multiple directives, non-ancestor references.

use tracing::{debug, trace};

use crate::depth::MaxDepth;
use crate::error::RecursionError;
use crate::features::{has_recursion_marker, PatternFeatures};
use crate::lexer::count_captures;
use crate::scan::{scan, Directive, DirectiveKind};
use crate::transfer::{map_capture_transfers, CaptureTransfers};
use crate::unroll::{make_recursive, HiddenCaptures, Scope};

/// How the expander is being used. Affects only error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Directives were written by the pattern author.
    #[default]
    Plugin,
    /// Directives were generated by another transpiler; messages avoid
    /// quoting syntax the author never wrote.
    External,
}

/// Result of a successful expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The rewritten pattern, free of recursion directives.
    pub pattern: String,
    /// Captures that exist only because of rewriting. Pre-seeded entries come
    /// first, shifted as needed; new entries follow in creation order.
    pub hidden_captures: Vec<usize>,
    /// The pre-seeded transfer table, remapped to the new numbering.
    pub capture_transfers: CaptureTransfers,
}

impl Expansion {
    /// Whether capture `number` is hidden.
    pub fn is_hidden(&self, number: usize) -> bool {
        self.hidden_captures.contains(&number)
    }

    /// Capture numbers in `1..=total_groups` that are not hidden, in order.
    /// A result view uses these to present the caller's original groups.
    pub fn visible_groups(&self, total_groups: usize) -> impl Iterator<Item = usize> + '_ {
        (1..=total_groups).filter(move |n| !self.is_hidden(*n))
    }
}

/// Builder for an expansion with pre-seeded capture bookkeeping.
///
/// # Examples
///
/// ```
/// use regex_recursion::expand::Expander;
///
/// let out = Expander::new()
///     .hidden_captures(vec![2])
///     .expand(r"^((a)\g<1&R=2>?b)$")
///     .unwrap();
/// assert_eq!(out.pattern, "^((a)(?:(a)(?:)?b)?b)$");
/// assert_eq!(out.hidden_captures, vec![2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Expander {
    hidden_captures: Vec<usize>,
    capture_transfers: CaptureTransfers,
    mode: Mode,
}

impl Expander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures already hidden by earlier rewrites.
    pub fn hidden_captures(mut self, hidden: impl Into<Vec<usize>>) -> Self {
        self.hidden_captures = hidden.into();
        self
    }

    /// Transfer table from earlier rewrites.
    pub fn capture_transfers(mut self, transfers: CaptureTransfers) -> Self {
        self.capture_transfers = transfers;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Expand every recursion directive in `pattern`.
    pub fn expand(self, pattern: &str) -> Result<Expansion, RecursionError> {
        let Expander {
            mut hidden_captures,
            capture_transfers,
            mode,
        } = self;
        let unchanged = |hidden_captures, capture_transfers| Expansion {
            pattern: pattern.to_string(),
            hidden_captures,
            capture_transfers,
        };

        if !has_recursion_marker(pattern) {
            trace!("no recursion marker; pattern unchanged");
            return Ok(unchanged(hidden_captures, capture_transfers));
        }
        let scan = scan(pattern);
        let Some(directive) = scan.directives.first() else {
            trace!("recursion markers are escaped or in classes; pattern unchanged");
            return Ok(unchanged(hidden_captures, capture_transfers));
        };

        let depths = scan
            .directives
            .iter()
            .map(|d| d.depth.parse::<MaxDepth>())
            .collect::<Result<Vec<_>, _>>()?;
        let depth = depths[0];

        if scan.features.contains(PatternFeatures::NUMBERED_BACKREF) {
            check_numbered_backrefs(pattern, directive, mode)?;
        }
        if scan.features.contains(PatternFeatures::DEFINE_GROUP) {
            return Err(RecursionError::ForbiddenDefine);
        }
        if scan.directives.len() > 1 {
            return Err(RecursionError::OverlappingRecursion);
        }
        let Some(recursed) = directive.recursed.clone() else {
            return Err(invalid_reference(pattern, directive, mode));
        };

        let left = &pattern[recursed.start..directive.span.start];
        let right = &pattern[directive.span.end..recursed.end];
        let scope = match directive.kind {
            DirectiveKind::Global => Scope::Global,
            DirectiveKind::Subpattern { .. } => Scope::Subpattern,
        };
        let mut hidden = HiddenCaptures::new(&mut hidden_captures, directive.captures_before);
        let expansion = make_recursive(left, right, depth.reps(), scope, &mut hidden);
        let added = hidden.added_len();
        hidden.finish();
        let capture_transfers = map_capture_transfers(
            capture_transfers,
            left,
            depth.reps(),
            added,
            directive.captures_before,
        );

        debug!(
            scope = ?scope,
            depth = depth.get(),
            added_captures = added,
            "expanded recursion"
        );

        let mut out = String::with_capacity(pattern.len() + expansion.len());
        out.push_str(&pattern[..recursed.start]);
        out.push_str(&expansion);
        out.push_str(&pattern[recursed.end..]);
        Ok(Expansion {
            pattern: out,
            hidden_captures,
            capture_transfers,
        })
    }
}

/// Expand `pattern` with no pre-seeded bookkeeping.
///
/// ```
/// let out = regex_recursion::expand(r"a(?R=2)?b").unwrap();
/// assert_eq!(out.pattern, "a(?:a(?:)?b)?b");
/// ```
pub fn expand(pattern: &str) -> Result<Expansion, RecursionError> {
    Expander::new().expand(pattern)
}

/// Numbered backrefs cannot be retargeted after captures are duplicated.
fn check_numbered_backrefs(
    pattern: &str,
    directive: &Directive<'_>,
    mode: Mode,
) -> Result<(), RecursionError> {
    let Some(recursed) = directive.recursed.clone() else {
        return Ok(());
    };
    if count_captures(&pattern[recursed]) == 0 {
        return Ok(());
    }
    let subject = match mode {
        Mode::Plugin => "Numbered backrefs",
        Mode::External => "Backrefs",
    };
    let context = match directive.kind {
        DirectiveKind::Global => "global recursion",
        DirectiveKind::Subpattern { .. } => "recursion of capturing groups",
    };
    Err(RecursionError::UnsupportedBackref { subject, context })
}

fn invalid_reference(pattern: &str, directive: &Directive<'_>, mode: Mode) -> RecursionError {
    let reference = match (mode, directive.kind) {
        (Mode::External, DirectiveKind::Subpattern { target }) => target.to_string(),
        _ => pattern[directive.span.clone()].to_string(),
    };
    RecursionError::InvalidReference { reference }
}
