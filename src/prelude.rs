// prelude.rs - Convenient re-exports.
//
//! # Prelude
//!
//! ```
//! use regex_recursion::prelude::*;
//!
//! let out = expand(r"^(?<r>a\g<r&R=2>?b)$").unwrap();
//! assert_eq!(out.pattern, "^(?<r>a(?:a(?:)?b)?b)$");
//! ```

pub use crate::depth::MaxDepth;
pub use crate::error::{ErrorKind, RecursionError};
pub use crate::expand::{expand, Expander, Expansion, Mode};
pub use crate::features::PatternFeatures;
pub use crate::transfer::CaptureTransfers;
