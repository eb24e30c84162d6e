//! # regex-recursion
//!
//! Bounded recursion for regex engines that cannot recurse. Patterns written
//! with a recursion directive are rewritten into plain regex syntax by
//! unrolling the recursed text a fixed number of times.
//!
//! Two directive shapes are supported, each with a maximum depth `N` in
//! `2..=100`:
//!
//! - `(?R=N)` recurses the whole pattern.
//! - `\g<name&R=N>` or `\g<number&R=N>` recurses the contents of a capturing
//!   group, and must appear inside that group.
//!
//! ## Quick Start
//!
//! ```rust
//! use regex_recursion::prelude::*;
//!
//! // Match an equal number of `a`s and `b`s, up to three of each.
//! let out = expand(r"a(?R=3)?b").unwrap();
//! assert_eq!(out.pattern, "a(?:a(?:a(?:)?b)?b)?b");
//! ```
//!
//! Captures duplicated by unrolling are reported as hidden so a result view
//! can skip them:
//!
//! ```rust
//! use regex_recursion::prelude::*;
//!
//! let out = expand(r"(?<r>(?<d>a)\g<r&R=2>?b)").unwrap();
//! assert_eq!(out.pattern, r"(?<r>(?<d>a)(?:(?<d_$2>a)(?:)?b)?b)");
//! assert_eq!(out.hidden_captures, vec![3]);
//! ```
//!
//! When composing with other rewrites, seed the expander with their hidden
//! captures and capture transfers; both are renumbered to match the output:
//!
//! ```rust
//! use regex_recursion::prelude::*;
//!
//! let out = Expander::new()
//!     .capture_transfers(CaptureTransfers::from([(1, vec![2])]))
//!     .expand("(a)(?R=2)?(b)")
//!     .unwrap();
//! assert_eq!(out.pattern, "(a)(?:(a)(?:)?(b))?(b)");
//! assert_eq!(out.capture_transfers, CaptureTransfers::from([(1, vec![3, 4])]));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`lexer`] | Escape- and class-aware tokenizer |
//! | [`features`] | Pre-check and pattern feature flags |
//! | [`depth`] | Depth literal validation |
//! | [`expand`] | Public API: `expand`, `Expander`, `Expansion` |
//! | [`transfer`] | Capture transfer table and remapping |
//! | [`error`] | Error types |
//!
//! Scanning (group tracking) and unrolling live in private modules.

pub mod depth;
pub mod error;
pub mod expand;
pub mod features;
pub mod lexer;
pub mod prelude;
pub mod transfer;

mod scan;
mod unroll;

pub use crate::expand::expand;
