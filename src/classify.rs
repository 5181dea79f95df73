//! Character classification.
//!
//! Every predicate here is a pure function of a single code point; the
//! state machine's rule tables are built from these. Predicates that
//! appear together in one table are mutually exclusive, so dispatch is
//! deterministic regardless of rule order.

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Synthetic end-of-input mark, fed once after the real text so that an
/// atom still open at the end of the stream is finalized without a
/// separate epilogue pass.
pub const SENTINEL: char = '\0';

/// Code points 9–13 and 32.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, '\t'..='\r' | ' ')
}

/// Code points 0–31 and 127.
pub fn is_control(c: char) -> bool {
    matches!(c, '\0'..='\u{1f}' | '\u{7f}')
}

pub fn is_open_delim(c: char) -> bool {
    c == '('
}

pub fn is_close_delim(c: char) -> bool {
    c == ')'
}

pub fn is_delimiter(c: char) -> bool {
    is_open_delim(c) || is_close_delim(c)
}

pub fn is_quote(c: char) -> bool {
    c == '"'
}

pub fn is_backslash(c: char) -> bool {
    c == '\\'
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_digit_nonzero(c: char) -> bool {
    matches!(c, '1'..='9')
}

pub fn is_zero(c: char) -> bool {
    c == '0'
}

pub fn is_digit_bin(c: char) -> bool {
    matches!(c, '0' | '1')
}

pub fn is_digit_oct(c: char) -> bool {
    matches!(c, '0'..='7')
}

pub fn is_digit_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Leading sign of a decimal literal.
pub fn is_sign(c: char) -> bool {
    matches!(c, '+' | '-')
}

/// Radix prefix letter after a leading `0`: `0b` selects binary.
pub fn is_radix_bin(c: char) -> bool {
    c == 'b'
}

/// Radix prefix letter after a leading `0`: `0o` selects octal.
pub fn is_radix_oct(c: char) -> bool {
    c == 'o'
}

/// Radix prefix letter after a leading `0`: `0x` selects hexadecimal.
pub fn is_radix_hex(c: char) -> bool {
    c == 'x'
}

pub fn is_carriage_return(c: char) -> bool {
    c == '\r'
}

/// A single-character escape code other than CR. CR is classified
/// separately so that the escape state can absorb the LF of a CRLF
/// pair as part of the same line continuation.
pub fn is_escape_code(c: char) -> bool {
    c != '\r' && crate::escape::decode(c).is_some()
}

/// A character that may appear unescaped inside a quoted string.
pub fn is_string_verbatim(c: char) -> bool {
    !is_control(c) && !is_quote(c) && !is_backslash(c)
}

pub fn is_sentinel(c: char) -> bool {
    c == SENTINEL
}

/// `Other_ID_Start` exception set from Unicode PropList.
const OTHER_ID_START: [char; 6] = [
    '\u{1885}', '\u{1886}', '\u{2118}', '\u{212e}', '\u{309b}', '\u{309c}',
];

/// `Other_ID_Continue` exception set from Unicode PropList.
const OTHER_ID_CONTINUE: [char; 12] = [
    '\u{b7}', '\u{387}', '\u{1369}', '\u{136a}', '\u{136b}', '\u{136c}', '\u{136d}', '\u{136e}',
    '\u{136f}', '\u{1370}', '\u{1371}', '\u{19da}',
];

/// Unicode identifier-start: general category Lu, Ll, Lt, Lm, Lo or
/// Nl, the ASCII underscore, or a member of `Other_ID_Start`.
pub fn is_ident_start(c: char) -> bool {
    if c == '_' || OTHER_ID_START.contains(&c) {
        return true;
    }
    matches!(
        c.general_category(),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::LetterNumber
    )
}

/// Unicode identifier-continue: the start set plus categories Mn, Mc,
/// Nd and Pc, plus `Other_ID_Continue`.
pub fn is_ident_continue(c: char) -> bool {
    if is_ident_start(c) || OTHER_ID_CONTINUE.contains(&c) {
        return true;
    }
    matches!(
        c.general_category(),
        GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::DecimalNumber
            | GeneralCategory::ConnectorPunctuation
    )
}

/// [`is_ident_start`] with NFKC applied first: every code point of the
/// normalized form must itself pass the plain predicate. Rejects
/// characters whose normalization smuggles in something that is not a
/// legal identifier character (e.g. compatibility ligatures expanding
/// to spaced phrases).
pub fn is_ident_start_strict(c: char) -> bool {
    c.nfkc().all(is_ident_start)
}

/// [`is_ident_continue`] with the same NFKC pre-check.
pub fn is_ident_continue_strict(c: char) -> bool {
    c.nfkc().all(is_ident_continue)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('\t', true)]
    #[case('\n', true)]
    #[case('\r', true)]
    #[case(' ', true)]
    #[case('a', false)]
    #[case('\0', false)]
    fn whitespace(#[case] c: char, #[case] expected: bool) {
        assert_eq!(expected, is_whitespace(c));
    }

    #[rstest]
    #[case('\0', true)]
    #[case('\u{1f}', true)]
    #[case('\u{7f}', true)]
    #[case(' ', false)]
    #[case('A', false)]
    fn control(#[case] c: char, #[case] expected: bool) {
        assert_eq!(expected, is_control(c));
    }

    #[rstest]
    #[case('0', true, true, true, true)]
    #[case('1', true, true, true, true)]
    #[case('7', false, true, true, true)]
    #[case('8', false, false, true, true)]
    #[case('a', false, false, false, true)]
    #[case('F', false, false, false, true)]
    #[case('g', false, false, false, false)]
    fn digits(
        #[case] c: char,
        #[case] bin: bool,
        #[case] oct: bool,
        #[case] dec: bool,
        #[case] hex: bool,
    ) {
        assert_eq!(bin, is_digit_bin(c));
        assert_eq!(oct, is_digit_oct(c));
        assert_eq!(dec, is_digit(c));
        assert_eq!(hex, is_digit_hex(c));
    }

    #[rstest]
    #[case('a', true)]
    #[case('Z', true)]
    #[case('_', true)]
    #[case('施', true)] // CJK ideograph, category Lo
    #[case('é', true)]
    #[case('Ⅻ', true)] // Roman numeral, category Nl
    #[case('\u{2118}', true)] // script capital P, Other_ID_Start
    #[case('5', false)]
    #[case('-', false)]
    #[case('(', false)]
    #[case('"', false)]
    fn ident_start(#[case] c: char, #[case] expected: bool) {
        assert_eq!(expected, is_ident_start(c));
    }

    #[rstest]
    #[case('5', true)] // Nd
    #[case('\u{301}', true)] // combining acute, Mn
    #[case('\u{203f}', true)] // undertie, Pc
    #[case('\u{b7}', true)] // middle dot, Other_ID_Continue
    #[case('a', true)]
    #[case(' ', false)]
    #[case(')', false)]
    fn ident_continue(#[case] c: char, #[case] expected: bool) {
        assert_eq!(expected, is_ident_continue(c));
    }

    #[rstest]
    // fi ligature normalizes to "fi", still identifier characters.
    #[case('ﬁ', true, true)]
    // Arabic ligature normalizes to a phrase containing spaces.
    #[case('\u{fdfa}', true, false)]
    // Katakana sound mark normalizes to space + combining mark.
    #[case('\u{309b}', true, false)]
    #[case('a', true, true)]
    #[case('施', true, true)]
    fn strict_ident(#[case] c: char, #[case] plain: bool, #[case] strict: bool) {
        assert_eq!(plain, is_ident_start(c));
        assert_eq!(strict, is_ident_start_strict(c));
    }

    #[test]
    fn escape_codes_exclude_carriage_return() {
        for c in ['b', 't', 'v', 'n', 'f', 'r', '"', '\'', '\\', '\n'] {
            assert!(is_escape_code(c), "{c:?} should be an escape code");
        }
        assert!(!is_escape_code('\r'));
        assert!(is_carriage_return('\r'));
        assert!(!is_escape_code('z'));
    }

    #[test]
    fn verbatim_excludes_the_string_specials() {
        assert!(is_string_verbatim('a'));
        assert!(is_string_verbatim('('));
        assert!(is_string_verbatim('\''));
        assert!(!is_string_verbatim('"'));
        assert!(!is_string_verbatim('\\'));
        assert!(!is_string_verbatim('\n'));
        assert!(!is_string_verbatim(SENTINEL));
    }
}
