// features.rs - Pattern pre-check and feature flags.
//
// The pre-check is a raw substring search with no escape or class awareness;
// it may report a directive that the scanner later rejects as literal, but
// never misses one.

use bitflags::bitflags;
use memchr::memmem;

use crate::scan;

bitflags! {
    /// Constructs found outside character classes during a scan.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PatternFeatures: u8 {
        /// `(?R=N)` or `\g<name&R=N>`.
        const RECURSION = 1 << 0;
        /// `\1` through `\9` (and longer numbers starting with those).
        const NUMBERED_BACKREF = 1 << 1;
        /// `(?(DEFINE)`.
        const DEFINE_GROUP = 1 << 2;
    }
}

impl PatternFeatures {
    /// Scan `pattern` and report which constructs it uses.
    pub fn detect(pattern: &str) -> PatternFeatures {
        scan::scan(pattern).features
    }
}

/// Fast test for anything that could be a recursion directive.
pub fn has_recursion_marker(pattern: &str) -> bool {
    let haystack = pattern.as_bytes();
    if memmem::find(haystack, b"(?R=").is_some() {
        return true;
    }
    memmem::find(haystack, b"\\g<").is_some() && memmem::find(haystack, b"&R=").is_some()
}
