// lexer.rs - Escape- and class-aware tokenizer for extended-syntax patterns.
//
// Walks a pattern left to right and classifies each lexeme. Inside a
// character class only escapes and bracket nesting are recognized; every
// other lexeme there is a plain character, so directive-like text in a class
// stays literal. Escaped pairs are consumed as one lexeme, so `\(?R=2)` or
// `\\g<r&R=2>` never look like directives.

use std::ops::Range;

/// A classified lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'p> {
    /// `(?<name>`, excluding lookbehind `(?<=` and `(?<!`.
    NamedCaptureOpen(&'p str),
    /// `(` not followed by `?`.
    CaptureOpen,
    /// Any other group opener; only the leading `(?` is consumed.
    GroupOpen,
    /// `)`.
    GroupClose,
    /// `[`, at any class depth.
    ClassOpen,
    /// `]` closing an open class.
    ClassClose,
    /// `\k<name>`.
    NamedBackref(&'p str),
    /// `\` followed by any character.
    Escaped(char),
    /// `(?R=N)`. The depth literal is unvalidated.
    GlobalRecursion { depth: &'p str },
    /// `\g<name-or-number&R=N>`. The depth literal is unvalidated.
    SubpatternRecursion { target: &'p str, depth: &'p str },
    /// Anything else.
    Char(char),
}

impl Token<'_> {
    /// True for group openers that allocate a capture number.
    pub fn is_capture_open(&self) -> bool {
        matches!(self, Token::CaptureOpen | Token::NamedCaptureOpen(_))
    }
}

/// A token together with its byte range in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<'p> {
    pub token: Token<'p>,
    pub span: Range<usize>,
    /// Whether the lexeme starts inside a character class. An opening `[`
    /// at the top level reports `false`; its matching `]` reports `true`.
    pub in_class: bool,
}

impl Lexeme<'_> {
    /// True when the lexeme is outside any character class and is not a
    /// class delimiter, i.e. it has regex meaning at the top level.
    pub fn is_default_context(&self) -> bool {
        !self.in_class && self.token != Token::ClassOpen
    }
}

/// Cursor over a pattern. Holds the position and class depth explicitly so a
/// scan can be resumed at any offset known to be outside a class.
#[derive(Debug, Clone)]
pub struct Lexer<'p> {
    pattern: &'p str,
    pos: usize,
    class_depth: usize,
}

impl<'p> Lexer<'p> {
    pub fn new(pattern: &'p str) -> Self {
        Lexer {
            pattern,
            pos: 0,
            class_depth: 0,
        }
    }

    /// Start lexing at byte offset `pos`, which must be on a char boundary
    /// outside any character class.
    pub fn at(pattern: &'p str, pos: usize) -> Self {
        Lexer {
            pattern,
            pos,
            class_depth: 0,
        }
    }

    pub fn in_class(&self) -> bool {
        self.class_depth > 0
    }

    fn rest(&self) -> &'p str {
        &self.pattern[self.pos..]
    }

    /// Lex one token at the top level (outside classes).
    fn lex_default(&self, c: char) -> (Token<'p>, usize) {
        let rest = self.rest();
        let mut chars = rest[c.len_utf8()..].chars();
        match c {
            '\\' => {
                if let Some(lexed) = lex_subpattern_recursion(rest) {
                    return lexed;
                }
                if let Some(lexed) = lex_named_backref(rest) {
                    return lexed;
                }
                match chars.next() {
                    Some(next) => (Token::Escaped(next), 1 + next.len_utf8()),
                    None => (Token::Char('\\'), 1),
                }
            }
            '(' => {
                if let Some(lexed) = lex_named_capture(rest) {
                    return lexed;
                }
                if let Some(lexed) = lex_global_recursion(rest) {
                    return lexed;
                }
                if rest[1..].starts_with('?') {
                    (Token::GroupOpen, 2)
                } else {
                    (Token::CaptureOpen, 1)
                }
            }
            ')' => (Token::GroupClose, 1),
            '[' => (Token::ClassOpen, 1),
            other => (Token::Char(other), other.len_utf8()),
        }
    }

    /// Lex one token inside a character class.
    fn lex_class(&self, c: char) -> (Token<'p>, usize) {
        let mut chars = self.rest()[c.len_utf8()..].chars();
        match c {
            '\\' => match chars.next() {
                Some(next) => (Token::Escaped(next), 1 + next.len_utf8()),
                None => (Token::Char('\\'), 1),
            },
            '[' => (Token::ClassOpen, 1),
            ']' => (Token::ClassClose, 1),
            other => (Token::Char(other), other.len_utf8()),
        }
    }
}

impl<'p> Iterator for Lexer<'p> {
    type Item = Lexeme<'p>;

    fn next(&mut self) -> Option<Lexeme<'p>> {
        let c = self.rest().chars().next()?;
        let in_class = self.in_class();
        let (token, len) = if in_class {
            self.lex_class(c)
        } else {
            self.lex_default(c)
        };
        match token {
            Token::ClassOpen => self.class_depth += 1,
            Token::ClassClose => self.class_depth -= 1,
            _ => {}
        }
        let start = self.pos;
        self.pos += len;
        Some(Lexeme {
            token,
            span: start..self.pos,
            in_class,
        })
    }
}

// === Directive and group lexers ===
//
// Each takes the remaining pattern starting at the candidate lexeme and
// returns the token with its byte length, or `None` if the shape does not
// match (the caller then falls back to a shorter token).

/// `(?<name>` where name is `[^>]+` and does not start with `=` or `!`.
fn lex_named_capture(rest: &str) -> Option<(Token<'_>, usize)> {
    let body = rest.strip_prefix("(?<")?;
    if body.starts_with(['=', '!']) {
        return None;
    }
    let end = body.find('>')?;
    if end == 0 {
        return None;
    }
    Some((Token::NamedCaptureOpen(&body[..end]), 3 + end + 1))
}

/// `(?R=N)` where N is `[^)]*`.
fn lex_global_recursion(rest: &str) -> Option<(Token<'_>, usize)> {
    let body = rest.strip_prefix("(?R=")?;
    let end = body.find(')')?;
    Some((
        Token::GlobalRecursion {
            depth: &body[..end],
        },
        4 + end + 1,
    ))
}

/// `\g<target&R=N>` where target is `[^>&]+` and N is `[^>]*`.
fn lex_subpattern_recursion(rest: &str) -> Option<(Token<'_>, usize)> {
    let body = rest.strip_prefix("\\g<")?;
    let target_end = body.find(['>', '&'])?;
    if target_end == 0 {
        return None;
    }
    let after_target = body[target_end..].strip_prefix("&R=")?;
    let depth_end = after_target.find('>')?;
    let len = 3 + target_end + 3 + depth_end + 1;
    Some((
        Token::SubpatternRecursion {
            target: &body[..target_end],
            depth: &after_target[..depth_end],
        },
        len,
    ))
}

/// `\k<name>` where name is `[^>]+`.
fn lex_named_backref(rest: &str) -> Option<(Token<'_>, usize)> {
    let body = rest.strip_prefix("\\k<")?;
    let end = body.find('>')?;
    if end == 0 {
        return None;
    }
    Some((Token::NamedBackref(&body[..end]), 3 + end + 1))
}

// === Unescaped queries ===

/// Iterate over lexemes that have regex meaning outside character classes.
pub fn default_context<'p>(pattern: &'p str) -> impl Iterator<Item = Lexeme<'p>> {
    Lexer::new(pattern).filter(Lexeme::is_default_context)
}

/// Number of capturing group openers outside character classes.
pub fn count_captures(pattern: &str) -> usize {
    default_context(pattern)
        .filter(|lx| lx.token.is_capture_open())
        .count()
}

/// Rewrite top-level lexemes. `replace` returns `Some(text)` to substitute a
/// lexeme or `None` to keep it as written.
pub fn replace_unescaped<'p, F>(pattern: &'p str, mut replace: F) -> String
where
    F: FnMut(&Token<'p>) -> Option<String>,
{
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut copied = 0;
    for lx in default_context(pattern) {
        if let Some(replacement) = replace(&lx.token) {
            out.push_str(&pattern[copied..lx.span.start]);
            out.push_str(&replacement);
            copied = lx.span.end;
        }
    }
    out.push_str(&pattern[copied..]);
    out
}

/// Contents of the group whose content begins at `start`, up to but not
/// including its closing `)`. Returns the rest of the pattern if the group
/// is unclosed.
pub fn group_contents(pattern: &str, start: usize) -> &str {
    let mut depth = 1usize;
    for lx in Lexer::at(pattern, start).filter(Lexeme::is_default_context) {
        match lx.token {
            Token::CaptureOpen | Token::NamedCaptureOpen(_) | Token::GroupOpen => depth += 1,
            Token::GroupClose => {
                depth -= 1;
                if depth == 0 {
                    return &pattern[start..lx.span.start];
                }
            }
            _ => {}
        }
    }
    &pattern[start..]
}
