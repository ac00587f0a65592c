// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Regex Parser** - *Pattern Text → Item Tree*
//!
//! Transliterates the UTF-8 pattern to a UTF-32 sequence, parses it into an
//! item tree, and expands counted quantifiers (`{n,m}` unrolls into
//! concatenations of copies finished with `?` / `+` forms) so the compiler
//! only ever sees the three base quantifiers.

use crate::regex::inst::{
    CLASS_D, CLASS_NOT_D, CLASS_NOT_S, CLASS_NOT_W, CLASS_S, CLASS_W, CharClass,
};
use crate::{KernelError, Result};

/// Upper bound for counted-repetition operands; unrolling beyond this is a
/// pattern error.
pub const MAX_REPEAT: u32 = 999;

/// Parsed pattern item tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    Empty,
    Char(u32),
    /// `.` — newline behaviour resolved at compile time via `dotall`.
    AnyChar,
    Class {
        class: CharClass,
        negated: bool,
    },
    Bol,
    Eol,
    Bow,
    NBow,
    Group {
        /// Capture index, or `None` for a non-capturing group.
        index: Option<u32>,
        inner: Box<Ast>,
    },
    Concat(Vec<Ast>),
    Alt(Vec<Ast>),
    Repeat {
        inner: Box<Ast>,
        min: u32,
        max: Option<u32>,
    },
}

/// Punctuation that `\` may escape to a literal.
const ESCAPABLE: &str = ".-+*\\?^$|{}()[]<>\"~'`_@=;:!#%&,/ ";

struct Parser {
    chars: Vec<u32>,
    pos: usize,
    next_group: u32,
}

/// Parses a pattern into its item tree. Returns the tree and the number of
/// capture groups.
pub fn parse(pattern: &str) -> Result<(Ast, u32)> {
    let mut parser = Parser {
        chars: pattern.chars().map(|c| c as u32).collect(),
        pos: 0,
        next_group: 1,
    };
    let ast = parser.parse_alt()?;
    if parser.pos < parser.chars.len() {
        return Err(KernelError::invalid_argument(format!(
            "unbalanced ')' at position {}",
            parser.pos
        )));
    }
    let expanded = expand(ast)?;
    Ok((expanded, parser.next_group - 1))
}

impl Parser {
    #[inline]
    fn peek(&self) -> Option<u32> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u32> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn parse_alt(&mut self) -> Result<Ast> {
        let mut alts = vec![self.parse_concat()?];
        while self.peek() == Some('|' as u32) {
            self.bump();
            alts.push(self.parse_concat()?);
        }
        if alts.len() == 1 {
            Ok(alts.pop().unwrap())
        } else {
            Ok(Ast::Alt(alts))
        }
    }

    fn parse_concat(&mut self) -> Result<Ast> {
        let mut items = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' as u32 || c == ')' as u32 {
                break;
            }
            items.push(self.parse_repeat()?);
        }
        match items.len() {
            0 => Ok(Ast::Empty),
            1 => Ok(items.pop().unwrap()),
            _ => Ok(Ast::Concat(items)),
        }
    }

    fn parse_repeat(&mut self) -> Result<Ast> {
        let atom = self.parse_atom()?;
        let (min, max) = match self.peek() {
            Some(c) if c == '*' as u32 => {
                self.bump();
                (0, None)
            }
            Some(c) if c == '+' as u32 => {
                self.bump();
                (1, None)
            }
            Some(c) if c == '?' as u32 => {
                self.bump();
                (0, Some(1))
            }
            Some(c) if c == '{' as u32 => match self.try_parse_counted()? {
                Some(bounds) => bounds,
                None => return Ok(atom),
            },
            _ => return Ok(atom),
        };
        if self.repeat_target_is_empty(&atom) {
            return Err(KernelError::invalid_argument(
                "quantifier has nothing to repeat",
            ));
        }
        // A trailing '?' would request laziness; matching is greedy-only.
        if self.peek() == Some('?' as u32) {
            self.bump();
        }
        Ok(Ast::Repeat {
            inner: Box::new(atom),
            min,
            max,
        })
    }

    fn repeat_target_is_empty(&self, ast: &Ast) -> bool {
        matches!(
            ast,
            Ast::Empty | Ast::Bol | Ast::Eol | Ast::Bow | Ast::NBow
        )
    }

    /// Parses `{n}`, `{n,}` or `{n,m}` after the opening brace has been
    /// peeked. Returns `None` (and rewinds) when the braces do not form a
    /// counted quantifier, which makes `{` a literal.
    fn try_parse_counted(&mut self) -> Result<Option<(u32, Option<u32>)>> {
        let start = self.pos;
        self.bump(); // '{'
        let min = self.parse_number();
        let Some(min) = min else {
            self.pos = start;
            return Ok(None);
        };
        let bounds = match self.peek() {
            Some(c) if c == '}' as u32 => {
                self.bump();
                (min, Some(min))
            }
            Some(c) if c == ',' as u32 => {
                self.bump();
                match self.peek() {
                    Some(c) if c == '}' as u32 => {
                        self.bump();
                        (min, None)
                    }
                    _ => {
                        let Some(max) = self.parse_number() else {
                            self.pos = start;
                            return Ok(None);
                        };
                        if self.peek() != Some('}' as u32) {
                            self.pos = start;
                            return Ok(None);
                        }
                        self.bump();
                        (min, Some(max))
                    }
                }
            }
            _ => {
                self.pos = start;
                return Ok(None);
            }
        };
        if let (min, Some(max)) = bounds {
            if min > max {
                return Err(KernelError::invalid_argument(format!(
                    "counted repetition {{{},{}}} has min > max",
                    min, max
                )));
            }
        }
        if bounds.0 > MAX_REPEAT || bounds.1.unwrap_or(0) > MAX_REPEAT {
            return Err(KernelError::invalid_argument(format!(
                "counted repetition exceeds the {} limit",
                MAX_REPEAT
            )));
        }
        Ok(Some(bounds))
    }

    fn parse_number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(c) = self.peek() {
            if !(('0' as u32)..=('9' as u32)).contains(&c) {
                break;
            }
            self.bump();
            value = Some(
                value
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(c - '0' as u32),
            );
        }
        value
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        let c = self.bump().ok_or_else(|| {
            KernelError::invalid_argument("unexpected end of pattern")
        })?;
        match char::from_u32(c) {
            Some('(') => {
                let index = if self.peek() == Some('?' as u32)
                    && self.chars.get(self.pos + 1).copied() == Some(':' as u32)
                {
                    self.pos += 2;
                    None
                } else {
                    let g = self.next_group;
                    self.next_group += 1;
                    Some(g)
                };
                let inner = self.parse_alt()?;
                if self.bump() != Some(')' as u32) {
                    return Err(KernelError::invalid_argument("missing ')'"));
                }
                Ok(Ast::Group {
                    index,
                    inner: Box::new(inner),
                })
            }
            Some(')') => Err(KernelError::invalid_argument("unbalanced ')'")),
            Some('*') | Some('+') | Some('?') => Err(KernelError::invalid_argument(
                "quantifier has nothing to repeat",
            )),
            Some('[') => self.parse_class(),
            Some('.') => Ok(Ast::AnyChar),
            Some('^') => Ok(Ast::Bol),
            Some('$') => Ok(Ast::Eol),
            Some('\\') => self.parse_escape(),
            _ => Ok(Ast::Char(c)),
        }
    }

    fn parse_escape(&mut self) -> Result<Ast> {
        let c = self.bump().ok_or_else(|| {
            KernelError::invalid_argument("pattern ends with a bare '\\'")
        })?;
        let ch = char::from_u32(c);
        match ch {
            Some('w') => Ok(builtin_class(CLASS_W)),
            Some('W') => Ok(builtin_class(CLASS_NOT_W)),
            Some('s') => Ok(builtin_class(CLASS_S)),
            Some('S') => Ok(builtin_class(CLASS_NOT_S)),
            Some('d') => Ok(builtin_class(CLASS_D)),
            Some('D') => Ok(builtin_class(CLASS_NOT_D)),
            Some('b') => Ok(Ast::Bow),
            Some('B') => Ok(Ast::NBow),
            Some('A') => Ok(Ast::Bol),
            Some('Z') => Ok(Ast::Eol),
            Some('n') => Ok(Ast::Char('\n' as u32)),
            Some('r') => Ok(Ast::Char('\r' as u32)),
            Some('t') => Ok(Ast::Char('\t' as u32)),
            Some('x') => {
                let value = self.parse_hex_escape()?;
                Ok(Ast::Char(value))
            }
            Some('0') => {
                let value = self.parse_octal_escape();
                Ok(Ast::Char(value))
            }
            Some(ch) if ch.is_ascii_digit() => Err(KernelError::invalid_argument(
                "backreferences are not supported",
            )),
            Some(ch) if ESCAPABLE.contains(ch) => Ok(Ast::Char(c)),
            _ => Err(KernelError::invalid_argument(format!(
                "unknown escape '\\{}'",
                ch.unwrap_or('?')
            ))),
        }
    }

    /// `\xhh` or `\x{h...}`.
    fn parse_hex_escape(&mut self) -> Result<u32> {
        if self.peek() == Some('{' as u32) {
            self.bump();
            let mut value = 0u32;
            let mut digits = 0;
            while let Some(c) = self.peek() {
                let Some(d) = char::from_u32(c).and_then(|ch| ch.to_digit(16)) else {
                    break;
                };
                self.bump();
                value = value.wrapping_mul(16).wrapping_add(d);
                digits += 1;
            }
            if digits == 0 || self.bump() != Some('}' as u32) {
                return Err(KernelError::invalid_argument("malformed \\x{...} escape"));
            }
            return Ok(value);
        }
        let mut value = 0u32;
        for _ in 0..2 {
            let Some(d) = self
                .peek()
                .and_then(char::from_u32)
                .and_then(|ch| ch.to_digit(16))
            else {
                return Err(KernelError::invalid_argument("malformed \\x escape"));
            };
            self.bump();
            value = value * 16 + d;
        }
        Ok(value)
    }

    /// `\0`, `\0o`, `\0oo` octal escapes.
    fn parse_octal_escape(&mut self) -> u32 {
        let mut value = 0u32;
        for _ in 0..2 {
            let Some(d) = self
                .peek()
                .and_then(char::from_u32)
                .and_then(|ch| ch.to_digit(8))
            else {
                break;
            };
            self.bump();
            value = value * 8 + d;
        }
        value
    }

    fn parse_class(&mut self) -> Result<Ast> {
        let negated = if self.peek() == Some('^' as u32) {
            self.bump();
            true
        } else {
            false
        };
        let mut class = CharClass::default();
        let mut first = true;
        loop {
            let Some(c) = self.bump() else {
                return Err(KernelError::invalid_argument("missing ']'"));
            };
            if c == ']' as u32 && !first {
                break;
            }
            first = false;
            let lo = if c == '\\' as u32 {
                match self.parse_class_escape(&mut class)? {
                    Some(lo) => lo,
                    None => continue,
                }
            } else {
                c
            };
            // Range when a '-' follows and isn't the closing literal.
            if self.peek() == Some('-' as u32)
                && self.chars.get(self.pos + 1).copied() != Some(']' as u32)
                && self.chars.get(self.pos + 1).is_some()
            {
                self.bump();
                let hi = self.bump().unwrap();
                let hi = if hi == '\\' as u32 {
                    self.parse_class_escape(&mut class)?.ok_or_else(|| {
                        KernelError::invalid_argument("class range ends in a named class")
                    })?
                } else {
                    hi
                };
                if lo > hi {
                    return Err(KernelError::invalid_argument(
                        "character class range is reversed",
                    ));
                }
                class.push_range(lo, hi);
            } else {
                class.push_range(lo, lo);
            }
        }
        Ok(Ast::Class { class, negated })
    }

    /// Escape inside `[...]`. Named classes fold into the builtin flags and
    /// return `None`; everything else returns the literal codepoint.
    fn parse_class_escape(&mut self, class: &mut CharClass) -> Result<Option<u32>> {
        let c = self.bump().ok_or_else(|| {
            KernelError::invalid_argument("class ends with a bare '\\'")
        })?;
        match char::from_u32(c) {
            Some('w') => {
                class.builtins |= CLASS_W;
                Ok(None)
            }
            Some('W') => {
                class.builtins |= CLASS_NOT_W;
                Ok(None)
            }
            Some('s') => {
                class.builtins |= CLASS_S;
                Ok(None)
            }
            Some('S') => {
                class.builtins |= CLASS_NOT_S;
                Ok(None)
            }
            Some('d') => {
                class.builtins |= CLASS_D;
                Ok(None)
            }
            Some('D') => {
                class.builtins |= CLASS_NOT_D;
                Ok(None)
            }
            Some('n') => Ok(Some('\n' as u32)),
            Some('r') => Ok(Some('\r' as u32)),
            Some('t') => Ok(Some('\t' as u32)),
            Some('x') => Ok(Some(self.parse_hex_escape()?)),
            Some('0') => Ok(Some(self.parse_octal_escape())),
            _ => Ok(Some(c)),
        }
    }
}

fn builtin_class(flag: u8) -> Ast {
    Ast::Class {
        class: CharClass {
            builtins: flag,
            ranges: Vec::new(),
        },
        negated: false,
    }
}

/// Expands counted quantifiers into base-quantifier trees: `x{n,m}` becomes
/// `n` copies followed by `m - n` optional copies, `x{n,}` ends its copies
/// with a `+` form. Capture indices duplicate as-is, so a repeated group
/// reports its last matching occurrence.
pub fn expand(ast: Ast) -> Result<Ast> {
    Ok(match ast {
        Ast::Concat(items) => Ast::Concat(
            items
                .into_iter()
                .map(expand)
                .collect::<Result<Vec<_>>>()?,
        ),
        Ast::Alt(items) => Ast::Alt(
            items
                .into_iter()
                .map(expand)
                .collect::<Result<Vec<_>>>()?,
        ),
        Ast::Group { index, inner } => Ast::Group {
            index,
            inner: Box::new(expand(*inner)?),
        },
        Ast::Repeat { inner, min, max } => {
            let inner = expand(*inner)?;
            match (min, max) {
                // Base quantifiers compile directly.
                (0, None) | (1, None) | (0, Some(1)) => Ast::Repeat {
                    inner: Box::new(inner),
                    min,
                    max,
                },
                (0, Some(0)) => Ast::Empty,
                (n, None) => {
                    // x{n,} → x … x x+
                    let mut items = Vec::with_capacity(n as usize);
                    for _ in 0..n - 1 {
                        items.push(inner.clone());
                    }
                    items.push(Ast::Repeat {
                        inner: Box::new(inner),
                        min: 1,
                        max: None,
                    });
                    Ast::Concat(items)
                }
                (n, Some(m)) => {
                    // x{n,m} → x … x x? … x?
                    let mut items = Vec::with_capacity(m as usize);
                    for _ in 0..n {
                        items.push(inner.clone());
                    }
                    for _ in n..m {
                        items.push(Ast::Repeat {
                            inner: Box::new(inner.clone()),
                            min: 0,
                            max: Some(1),
                        });
                    }
                    if items.is_empty() {
                        Ast::Empty
                    } else if items.len() == 1 {
                        items.pop().unwrap()
                    } else {
                        Ast::Concat(items)
                    }
                }
            }
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_and_concat() {
        let (ast, groups) = parse("ab").unwrap();
        assert_eq!(groups, 0);
        assert_eq!(
            ast,
            Ast::Concat(vec![Ast::Char('a' as u32), Ast::Char('b' as u32)])
        );
    }

    #[test]
    fn test_alternation_and_groups() {
        let (ast, groups) = parse("(a|b)c").unwrap();
        assert_eq!(groups, 1);
        match ast {
            Ast::Concat(items) => {
                assert!(matches!(&items[0], Ast::Group { index: Some(1), .. }));
                assert_eq!(items[1], Ast::Char('c' as u32));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_capturing_group() {
        let (_, groups) = parse("(?:ab)+").unwrap();
        assert_eq!(groups, 0);
    }

    #[test]
    fn test_counted_expansion() {
        let (ast, _) = parse("a{2,3}").unwrap();
        match ast {
            Ast::Concat(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], Ast::Char('a' as u32));
                assert_eq!(items[1], Ast::Char('a' as u32));
                assert!(matches!(
                    &items[2],
                    Ast::Repeat {
                        min: 0,
                        max: Some(1),
                        ..
                    }
                ));
            }
            other => panic!("unexpected {other:?}"),
        }

        let (open, _) = parse("a{2,}").unwrap();
        match open {
            Ast::Concat(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(&items[1], Ast::Repeat { min: 1, max: None, .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_literal_brace_when_not_counted() {
        let (ast, _) = parse("a{b").unwrap();
        assert_eq!(
            ast,
            Ast::Concat(vec![
                Ast::Char('a' as u32),
                Ast::Char('{' as u32),
                Ast::Char('b' as u32)
            ])
        );
    }

    #[test]
    fn test_classes() {
        let (ast, _) = parse("[a-c^]").unwrap();
        match ast {
            Ast::Class { class, negated } => {
                assert!(!negated);
                assert!(class.contains('b' as u32));
                assert!(class.contains('^' as u32));
                assert!(!class.contains('d' as u32));
            }
            other => panic!("unexpected {other:?}"),
        }
        let (neg, _) = parse("[^0-9]").unwrap();
        assert!(matches!(neg, Ast::Class { negated: true, .. }));
        let (named, _) = parse(r"[\d-]").unwrap();
        match named {
            Ast::Class { class, .. } => {
                assert!(class.contains('5' as u32));
                assert!(class.contains('-' as u32));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse(r"\.").unwrap().0, Ast::Char('.' as u32));
        assert_eq!(parse(r"\x41").unwrap().0, Ast::Char(0x41));
        assert_eq!(parse(r"\x{1F600}").unwrap().0, Ast::Char(0x1F600));
        assert_eq!(parse(r"\012").unwrap().0, Ast::Char(0o12));
        assert!(parse(r"\q").is_err());
        assert!(parse(r"\1").is_err());
    }

    #[test]
    fn test_error_cases() {
        assert!(parse("(a").is_err());
        assert!(parse("a)").is_err());
        assert!(parse("[ab").is_err());
        assert!(parse("*a").is_err());
        assert!(parse("a{3,2}").is_err());
        assert!(parse("a{1,10000}").is_err());
    }
}
