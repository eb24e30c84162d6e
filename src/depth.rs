// depth.rs - Recursion depth literal.

use std::fmt;
use std::str::FromStr;

use crate::error::RecursionError;

/// Maximum recursion depth of a directive, always within `2..=100`.
///
/// Only canonical decimal literals are accepted: no sign, no leading zero,
/// no fraction.
///
/// ```
/// use regex_recursion::depth::MaxDepth;
///
/// let depth: MaxDepth = "20".parse().unwrap();
/// assert_eq!(depth.get(), 20);
/// assert_eq!(depth.reps(), 19);
/// assert!("02".parse::<MaxDepth>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxDepth(u8);

impl MaxDepth {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 100;

    /// The depth as given in the directive.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Number of nested copies the unroller emits (`depth - 1`).
    pub fn reps(self) -> usize {
        self.get() - 1
    }
}

impl FromStr for MaxDepth {
    type Err = RecursionError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        if literal.len() > 3 || !is_canonical_number(literal) {
            return Err(RecursionError::invalid_depth(literal));
        }
        match literal.parse::<u8>() {
            Ok(n) if (Self::MIN..=Self::MAX).contains(&n) => Ok(MaxDepth(n)),
            _ => Err(RecursionError::invalid_depth(literal)),
        }
    }
}

/// True for a decimal literal with no sign and no leading zero (`[1-9][0-9]*`).
pub(crate) fn is_canonical_number(literal: &str) -> bool {
    literal.starts_with(|c: char| ('1'..='9').contains(&c))
        && literal.bytes().all(|b| b.is_ascii_digit())
}

impl TryFrom<&str> for MaxDepth {
    type Error = RecursionError;

    fn try_from(literal: &str) -> Result<Self, Self::Error> {
        literal.parse()
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
