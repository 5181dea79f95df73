//! Incremental atom accumulator.
//!
//! While the driver is inside an atom, one of these holds the atom's
//! raw source text and its decoded value, growing one character at a
//! time. `raw` always mirrors the source exactly (quotes, backslashes
//! and radix prefixes included); `value` is what the atom means: the
//! NFKC-normalized token, the unescaped string body, or the magnitude
//! accumulated digit by digit. Both are absent between atoms.

use smol_str::SmolStr;
use unicode_normalization::UnicodeNormalization;

use crate::escape;

/// Radix of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub(crate) fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// A numeric literal whose magnitude no longer fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Positive,
    Negative,
}

/// Decoded value being accumulated. The sign of a number is recorded
/// here but only applied when the literal is finished, so the
/// magnitude is always non-negative while scanning.
#[derive(Debug)]
enum Pending {
    Text(String),
    Number { magnitude: i64, sign: Sign },
}

#[derive(Debug)]
struct Open {
    raw: String,
    value: Pending,
}

/// The accumulator itself. Exactly one atom may be open at a time; the
/// driver keeps it open precisely while in an atom-scanning state.
#[derive(Debug, Default)]
pub(crate) struct Lexer {
    open: Option<Open>,
}

impl Lexer {
    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Opens a token with its first character.
    pub(crate) fn start_ident(&mut self, c: char) {
        debug_assert!(self.open.is_none(), "atom already open");
        let mut value = String::new();
        value.extend(c.nfkc());
        self.open = Some(Open {
            raw: c.to_string(),
            value: Pending::Text(value),
        });
    }

    /// Appends one more token character; the value side receives its
    /// NFKC normalization, which may be several characters.
    pub(crate) fn ident(&mut self, c: char) {
        let (raw, text) = self.open_text();
        raw.push(c);
        text.extend(c.nfkc());
    }

    /// Opens a quoted string. The opening quote lands in `raw` only.
    pub(crate) fn start_string(&mut self, quote: char) {
        debug_assert!(self.open.is_none(), "atom already open");
        self.open = Some(Open {
            raw: quote.to_string(),
            value: Pending::Text(String::new()),
        });
    }

    /// Appends a verbatim string character to both sides.
    pub(crate) fn string_char(&mut self, c: char) {
        let (raw, text) = self.open_text();
        raw.push(c);
        text.push(c);
    }

    /// Records the backslash that introduces an escape, in `raw` only.
    pub(crate) fn escape_mark(&mut self, c: char) {
        let (raw, _) = self.open_text();
        raw.push(c);
    }

    /// Appends an escape code: `raw` gets the code character, the value
    /// side its decoded form (possibly empty, for a line continuation).
    pub(crate) fn escape_code(&mut self, c: char) {
        let Some(decoded) = escape::decode(c) else {
            unreachable!("rule table passed an unknown escape code");
        };
        let (raw, text) = self.open_text();
        raw.push(c);
        text.push_str(decoded);
    }

    /// Records the closing quote in `raw` only.
    pub(crate) fn end_quote(&mut self, quote: char) {
        let (raw, _) = self.open_text();
        raw.push(quote);
    }

    /// Opens a decimal literal with its first digit.
    pub(crate) fn start_number(&mut self, c: char) {
        debug_assert!(self.open.is_none(), "atom already open");
        let Some(digit) = c.to_digit(10) else {
            unreachable!("rule table passed a non-digit");
        };
        self.open = Some(Open {
            raw: c.to_string(),
            value: Pending::Number {
                magnitude: i64::from(digit),
                sign: Sign::Positive,
            },
        });
    }

    /// Opens a decimal literal with an explicit sign and no digits yet.
    pub(crate) fn start_signed(&mut self, c: char) {
        debug_assert!(self.open.is_none(), "atom already open");
        let sign = if c == '-' { Sign::Negative } else { Sign::Positive };
        self.open = Some(Open {
            raw: c.to_string(),
            value: Pending::Number { magnitude: 0, sign },
        });
    }

    /// Folds one digit into the magnitude in the given radix.
    pub(crate) fn digit(&mut self, c: char, radix: Radix) -> Result<(), Overflow> {
        let open = self.open_mut();
        open.raw.push(c);
        let Pending::Number { magnitude, .. } = &mut open.value else {
            unreachable!("digit fed into a text atom");
        };
        let Some(digit) = c.to_digit(radix.base()) else {
            unreachable!("rule table passed a non-digit");
        };
        *magnitude = magnitude
            .checked_mul(i64::from(radix.base()))
            .and_then(|m| m.checked_add(i64::from(digit)))
            .ok_or(Overflow)?;
        Ok(())
    }

    /// Records a radix prefix letter (`b`, `o` or `x`) in `raw` only.
    pub(crate) fn radix_prefix(&mut self, c: char) {
        self.open_mut().raw.push(c);
    }

    /// Closes a token or string atom, returning `(raw, value)` and
    /// leaving the accumulator empty.
    pub(crate) fn finish_text(&mut self) -> (SmolStr, SmolStr) {
        let open = self.take();
        let Pending::Text(text) = open.value else {
            unreachable!("number finished as text");
        };
        (open.raw.into(), text.into())
    }

    /// Closes a numeric atom, applying the recorded sign.
    pub(crate) fn finish_number(&mut self) -> (SmolStr, i64) {
        let open = self.take();
        let Pending::Number { magnitude, sign } = open.value else {
            unreachable!("text finished as number");
        };
        let value = match sign {
            Sign::Positive => magnitude,
            Sign::Negative => -magnitude,
        };
        (open.raw.into(), value)
    }

    fn open_mut(&mut self) -> &mut Open {
        match &mut self.open {
            Some(open) => open,
            None => unreachable!("no atom is open"),
        }
    }

    fn open_text(&mut self) -> (&mut String, &mut String) {
        let open = self.open_mut();
        match &mut open.value {
            Pending::Text(text) => (&mut open.raw, text),
            Pending::Number { .. } => unreachable!("text fed into a numeric literal"),
        }
    }

    fn take(&mut self) -> Open {
        match self.open.take() {
            Some(open) => open,
            None => unreachable!("no atom is open"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Lexer, Radix};

    #[test]
    fn token_accumulates_raw_and_value() {
        let mut lexer = Lexer::default();
        lexer.start_ident('a');
        lexer.ident('b');
        lexer.ident('c');
        let (raw, value) = lexer.finish_text();
        assert_eq!(raw, "abc");
        assert_eq!(value, "abc");
        assert!(!lexer.is_open());
    }

    #[test]
    fn token_value_is_normalized() {
        let mut lexer = Lexer::default();
        lexer.start_ident('ﬁ');
        lexer.ident('Ⅻ');
        let (raw, value) = lexer.finish_text();
        assert_eq!(raw, "ﬁⅫ");
        assert_eq!(value, "fiXII");
    }

    #[test]
    fn string_raw_keeps_the_source_spelling() {
        let mut lexer = Lexer::default();
        lexer.start_string('"');
        lexer.string_char('a');
        lexer.escape_mark('\\');
        lexer.escape_code('n');
        lexer.string_char('b');
        lexer.end_quote('"');
        let (raw, value) = lexer.finish_text();
        assert_eq!(raw, r#""a\nb""#);
        assert_eq!(value, "a\nb");
    }

    #[test]
    fn line_continuation_adds_nothing_to_the_value() {
        let mut lexer = Lexer::default();
        lexer.start_string('"');
        lexer.string_char('a');
        lexer.escape_mark('\\');
        lexer.escape_code('\r');
        lexer.escape_code('\n');
        lexer.string_char('b');
        lexer.end_quote('"');
        let (raw, value) = lexer.finish_text();
        assert_eq!(raw, "\"a\\\r\nb\"");
        assert_eq!(value, "ab");
    }

    #[test]
    fn decimal_number() {
        let mut lexer = Lexer::default();
        lexer.start_number('4');
        lexer.digit('2', Radix::Decimal).unwrap();
        let (raw, value) = lexer.finish_number();
        assert_eq!(raw, "42");
        assert_eq!(value, 42);
    }

    #[test]
    fn signed_number_applies_the_sign_at_the_end() {
        let mut lexer = Lexer::default();
        lexer.start_signed('-');
        lexer.digit('4', Radix::Decimal).unwrap();
        lexer.digit('2', Radix::Decimal).unwrap();
        let (raw, value) = lexer.finish_number();
        assert_eq!(raw, "-42");
        assert_eq!(value, -42);
    }

    #[test]
    fn hexadecimal_number() {
        let mut lexer = Lexer::default();
        lexer.start_number('0');
        lexer.radix_prefix('x');
        lexer.digit('0', Radix::Hexadecimal).unwrap();
        lexer.digit('c', Radix::Hexadecimal).unwrap();
        let (raw, value) = lexer.finish_number();
        assert_eq!(raw, "0x0c");
        assert_eq!(value, 0x0c);
    }

    #[test]
    fn overflow_is_reported() {
        let mut lexer = Lexer::default();
        lexer.start_number('9');
        for _ in 0..17 {
            lexer.digit('9', Radix::Decimal).unwrap();
        }
        assert!(lexer.digit('9', Radix::Decimal).is_err());
    }
}
