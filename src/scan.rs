// scan.rs - Single pass over a pattern: group tracking and directive discovery.
//
// The scanner keeps the stack of currently open groups, numbering capturing
// groups left to right by their opening delimiter the way a standard regex
// compiler does. Each recursion directive is recorded together with the
// number of captures opened before it and, for subpattern directives, the
// content range of the enclosing group it names (if any).

use std::ops::Range;

use smallvec::SmallVec;

use crate::depth::is_canonical_number;
use crate::features::PatternFeatures;
use crate::lexer::{group_contents, Lexeme, Lexer, Token};

/// A group open at the scanner's current position.
#[derive(Debug, Clone)]
struct OpenGroup<'p> {
    /// Capture number; `None` for non-capturing groups.
    number: Option<usize>,
    name: Option<&'p str>,
    /// Byte offset just past the opening delimiter.
    content_start: usize,
}

impl OpenGroup<'_> {
    fn is_named_by(&self, target: &str, target_number: Option<usize>) -> bool {
        self.name == Some(target) || (self.number.is_some() && self.number == target_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectiveKind<'p> {
    /// `(?R=N)`
    Global,
    /// `\g<target&R=N>`
    Subpattern { target: &'p str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive<'p> {
    pub kind: DirectiveKind<'p>,
    /// Unvalidated depth literal.
    pub depth: &'p str,
    /// Byte range of the directive itself.
    pub span: Range<usize>,
    /// Capturing groups opened before the directive.
    pub captures_before: usize,
    /// Range that gets recursed: the whole pattern for global recursion, the
    /// referenced group's contents for subpattern recursion. `None` when the
    /// directive is not inside the group it references.
    pub recursed: Option<Range<usize>>,
}

#[derive(Debug, Clone)]
pub(crate) struct Scan<'p> {
    pub features: PatternFeatures,
    pub directives: SmallVec<[Directive<'p>; 2]>,
}

/// Scanner state. Owned by one `scan` call.
struct Scanner<'p> {
    pattern: &'p str,
    open_groups: SmallVec<[OpenGroup<'p>; 8]>,
    captures: usize,
    features: PatternFeatures,
    directives: SmallVec<[Directive<'p>; 2]>,
}

impl<'p> Scanner<'p> {
    fn new(pattern: &'p str) -> Self {
        Scanner {
            pattern,
            open_groups: SmallVec::new(),
            captures: 0,
            features: PatternFeatures::empty(),
            directives: SmallVec::new(),
        }
    }

    fn run(mut self) -> Scan<'p> {
        let pattern = self.pattern;
        for lexeme in Lexer::new(pattern).filter(Lexeme::is_default_context) {
            self.step(lexeme);
        }
        Scan {
            features: self.features,
            directives: self.directives,
        }
    }

    fn step(&mut self, lexeme: Lexeme<'p>) {
        let Lexeme { token, span, .. } = lexeme;
        match token {
            Token::NamedCaptureOpen(name) => self.open_capture(Some(name), span.end),
            Token::CaptureOpen => self.open_capture(None, span.end),
            Token::GroupOpen => {
                if self.pattern[span.end..].starts_with("(DEFINE)") {
                    self.features |= PatternFeatures::DEFINE_GROUP;
                }
                self.open_groups.push(OpenGroup {
                    number: None,
                    name: None,
                    content_start: span.end,
                });
            }
            Token::GroupClose => {
                self.open_groups.pop();
            }
            Token::Escaped('1'..='9') => self.features |= PatternFeatures::NUMBERED_BACKREF,
            Token::GlobalRecursion { depth } => {
                self.features |= PatternFeatures::RECURSION;
                self.directives.push(Directive {
                    kind: DirectiveKind::Global,
                    depth,
                    span,
                    captures_before: self.captures,
                    recursed: Some(0..self.pattern.len()),
                });
            }
            Token::SubpatternRecursion { target, depth } => {
                self.features |= PatternFeatures::RECURSION;
                let recursed = self.enclosing_group_contents(target);
                self.directives.push(Directive {
                    kind: DirectiveKind::Subpattern { target },
                    depth,
                    span,
                    captures_before: self.captures,
                    recursed,
                });
            }
            _ => {}
        }
    }

    fn open_capture(&mut self, name: Option<&'p str>, content_start: usize) {
        self.captures += 1;
        self.open_groups.push(OpenGroup {
            number: Some(self.captures),
            name,
            content_start,
        });
    }

    /// Contents of the innermost open group named or numbered `target`.
    /// Only a canonical decimal target is a group number; `+1`, `-1` and
    /// `01` are looked up as names.
    fn enclosing_group_contents(&self, target: &str) -> Option<Range<usize>> {
        let target_number = if is_canonical_number(target) {
            target.parse::<usize>().ok()
        } else {
            None
        };
        let group = self
            .open_groups
            .iter()
            .rev()
            .find(|g| g.is_named_by(target, target_number))?;
        let start = group.content_start;
        let contents = group_contents(self.pattern, start);
        Some(start..start + contents.len())
    }
}

/// Scan `pattern` once, collecting feature flags and every directive found
/// outside character classes.
pub(crate) fn scan(pattern: &str) -> Scan<'_> {
    Scanner::new(pattern).run()
}
