// unroll.rs - Textual unrolling of a recursion directive.
//
// Given the text left and right of a directive within the recursed span,
// emits `reps` nested copies around an empty base case:
//
//   depth 2: left(?:left(?:)right)right
//   depth 3: left(?:left(?:left(?:)right)right)right
//
// The `(?:)` separates tokens and absorbs a quantifier that followed the
// directive. Captures inside each copy are tagged with `_$N` for depth N so
// that named backreferences in a copy bind to the same copy's groups.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::lexer::{default_context, replace_unescaped, Token};

/// What the directive recurses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Global,
    Subpattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Records captures created by duplication.
///
/// New captures are numbered in the order they appear in the output. Every
/// pre-existing hidden capture at or after a new number is shifted up by one.
pub(crate) struct HiddenCaptures<'a> {
    existing: &'a mut Vec<usize>,
    added: SmallVec<[usize; 8]>,
    captures_before: usize,
}

impl<'a> HiddenCaptures<'a> {
    pub fn new(existing: &'a mut Vec<usize>, captures_before: usize) -> Self {
        HiddenCaptures {
            existing,
            added: SmallVec::new(),
            captures_before,
        }
    }

    fn insert_next(&mut self) {
        let number = self.captures_before + self.added.len() + 1;
        increment_if_at_least(self.existing, number);
        self.added.push(number);
    }

    pub fn added_len(&self) -> usize {
        self.added.len()
    }

    /// Append the new captures after the existing ones.
    pub fn finish(self) {
        self.existing.extend_from_slice(&self.added);
    }
}

fn increment_if_at_least(numbers: &mut [usize], threshold: usize) {
    for n in numbers.iter_mut().filter(|n| **n >= threshold) {
        *n += 1;
    }
}

/// Build the unrolled replacement for `left` + directive + `right`.
pub(crate) fn make_recursive(
    left: &str,
    right: &str,
    reps: usize,
    scope: Scope,
    hidden: &mut HiddenCaptures<'_>,
) -> String {
    // Only subpattern recursion can have backrefs pointing outside the span.
    let names_in_recursed: Option<HashSet<&str>> = match scope {
        Scope::Global => None,
        Scope::Subpattern => Some(
            default_context(left)
                .chain(default_context(right))
                .filter_map(|lx| match lx.token {
                    Token::NamedCaptureOpen(name) => Some(name),
                    _ => None,
                })
                .collect(),
        ),
    };
    let names = names_in_recursed.as_ref();

    let open = format!("(?:{left}");
    let close = format!("{right})");
    let mut out = String::with_capacity((left.len() + right.len() + 8) * (reps + 1));
    out.push_str(left);
    repeat_with_depth(&mut out, &open, Direction::Forward, reps, names, hidden);
    out.push_str("(?:)");
    repeat_with_depth(&mut out, &close, Direction::Backward, reps, names, hidden);
    out.push_str(right);
    out
}

fn repeat_with_depth(
    out: &mut String,
    piece: &str,
    direction: Direction,
    reps: usize,
    names_in_recursed: Option<&HashSet<&str>>,
    hidden: &mut HiddenCaptures<'_>,
) {
    for i in 0..reps {
        let depth = match direction {
            Direction::Forward => i + 2,
            Direction::Backward => reps - i + 1,
        };
        let copy = replace_unescaped(piece, |token| match *token {
            Token::NamedCaptureOpen(name) => {
                hidden.insert_next();
                Some(format!("(?<{name}_${depth}>"))
            }
            Token::CaptureOpen => {
                hidden.insert_next();
                None
            }
            Token::NamedBackref(name) => {
                let in_span = names_in_recursed.map_or(true, |names| names.contains(name));
                in_span.then(|| format!("\\k<{name}_${depth}>"))
            }
            _ => None,
        });
        out.push_str(&copy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unroll(left: &str, right: &str, reps: usize, scope: Scope) -> (String, Vec<usize>) {
        let mut existing = Vec::new();
        let mut hidden = HiddenCaptures::new(&mut existing, crate::lexer::count_captures(left));
        let out = make_recursive(left, right, reps, scope, &mut hidden);
        hidden.finish();
        (out, existing)
    }

    #[test]
    fn depth_two_and_three() {
        assert_eq!(unroll("a", "?b", 1, Scope::Global).0, "a(?:a(?:)?b)?b");
        assert_eq!(
            unroll("a", "?b", 2, Scope::Global).0,
            "a(?:a(?:a(?:)?b)?b)?b"
        );
    }

    #[test]
    fn depth_tags_mirror_between_sides() {
        let (out, hidden) = unroll("(?<w>.)", r"?\k<w>", 2, Scope::Global);
        assert_eq!(
            out,
            r"(?<w>.)(?:(?<w_$2>.)(?:(?<w_$3>.)(?:)?\k<w_$3>)?\k<w_$2>)?\k<w>"
        );
        assert_eq!(hidden, vec![2, 3]);
    }

    #[test]
    fn outside_backrefs_untouched_for_subpatterns() {
        let (out, _) = unroll(r"(?<b>b)\k<a>\k<b>", "?", 1, Scope::Subpattern);
        assert_eq!(out, r"(?<b>b)\k<a>\k<b>(?:(?<b_$2>b)\k<a>\k<b_$2>(?:)?)?");
    }

    #[test]
    fn global_renames_every_backref() {
        let (out, _) = unroll(r"\k<x>", "", 1, Scope::Global);
        assert_eq!(out, r"\k<x>(?:\k<x_$2>(?:))");
    }

    #[test]
    fn unnamed_captures_are_kept_but_hidden() {
        let (out, hidden) = unroll("(a)", "?(b)", 1, Scope::Global);
        assert_eq!(out, "(a)(?:(a)(?:)?(b))?(b)");
        assert_eq!(hidden, vec![2, 3]);
    }

    #[test]
    fn class_contents_are_not_renamed() {
        let (out, hidden) = unroll(r"[(?<x>]", "", 1, Scope::Global);
        assert_eq!(out, r"[(?<x>](?:[(?<x>](?:))");
        assert!(hidden.is_empty());
    }

    #[test]
    fn existing_hidden_captures_shift() {
        let mut existing = vec![7, 2, 3];
        let mut hidden = HiddenCaptures::new(&mut existing, 2);
        make_recursive("", "?(b)", 1, Scope::Global, &mut hidden);
        assert_eq!(hidden.added_len(), 1);
        hidden.finish();
        assert_eq!(existing, vec![8, 2, 4, 3]);
    }
}
