//! Parser states and their rule tables.
//!
//! Each state owns an ordered list of rules. A rule pairs a character
//! class with the actions to run when a character of that class
//! arrives, whether the character is consumed, and an optional next
//! state. The first matching rule wins; a character matching no rule
//! is a syntax error. The classes within any one table are mutually
//! exclusive, so dispatch is deterministic whatever the rule order.
//!
//! A rule that does not consume re-examines the same character in its
//! target state. Every such rule targets [`State::Expression`], whose
//! rules all consume, so dispatch takes at most two rounds per
//! character. The tables are fixed at compile time: changing the
//! grammar means editing a table, not the driver.

use std::fmt;

use crate::classify;
use crate::lexer::Radix;
use crate::tree::AtomKind;

/// Parser states. `Expression` is both the initial state and the only
/// state in which input may legally end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Between atoms, at any nesting depth.
    Expression,
    /// Inside a token.
    Token,
    /// Inside a quoted string.
    QuotedString,
    /// Immediately after a backslash inside a quoted string.
    Escape,
    /// After a leading `0`, which may still grow a radix prefix.
    LeadZero,
    /// Inside the digits of a decimal literal.
    NumberDec,
    /// Inside the digits of a binary literal.
    NumberBin,
    /// Inside the digits of an octal literal.
    NumberOct,
    /// Inside the digits of a hexadecimal literal.
    NumberHex,
    /// After a sign; exactly one decimal digit must follow.
    NumberDecC1,
    /// After `0b`; exactly one binary digit must follow.
    NumberBinC1,
    /// After `0o`; exactly one octal digit must follow.
    NumberOctC1,
    /// After `0x`; exactly one hexadecimal digit must follow.
    NumberHexC1,
}

impl State {
    /// States that scan the interior of an atom. The accumulator in
    /// the lexer is open exactly while the driver is in one of these.
    pub(crate) fn scans_atom(self) -> bool {
        !matches!(self, State::Expression)
    }

    pub(crate) fn rules(self) -> &'static [Rule] {
        match self {
            State::Expression => EXPRESSION_RULES,
            State::Token => TOKEN_RULES,
            State::QuotedString => QUOTED_STRING_RULES,
            State::Escape => ESCAPE_RULES,
            State::LeadZero => LEAD_ZERO_RULES,
            State::NumberDec => NUMBER_DEC_RULES,
            State::NumberBin => NUMBER_BIN_RULES,
            State::NumberOct => NUMBER_OCT_RULES,
            State::NumberHex => NUMBER_HEX_RULES,
            State::NumberDecC1 => NUMBER_DEC_C1_RULES,
            State::NumberBinC1 => NUMBER_BIN_C1_RULES,
            State::NumberOctC1 => NUMBER_OCT_C1_RULES,
            State::NumberHexC1 => NUMBER_HEX_C1_RULES,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Expression => "EXPRESSION",
            State::Token => "TOKEN",
            State::QuotedString => "QUOTED_STRING",
            State::Escape => "ESCAPE",
            State::LeadZero => "LEAD_ZERO",
            State::NumberDec => "NUMBER_DEC",
            State::NumberBin => "NUMBER_BIN",
            State::NumberOct => "NUMBER_OCT",
            State::NumberHex => "NUMBER_HEX",
            State::NumberDecC1 => "NUMBER_DEC_C1",
            State::NumberBinC1 => "NUMBER_BIN_C1",
            State::NumberOctC1 => "NUMBER_OCT_C1",
            State::NumberHexC1 => "NUMBER_HEX_C1",
        })
    }
}

/// Character classes the rule tables are written in terms of. Each
/// delegates to a predicate in [`classify`]; the identifier classes
/// use the strict (NFKC-checked) variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    OpenDelim,
    CloseDelim,
    Delimiter,
    Quote,
    Backslash,
    StringVerbatim,
    EscapeCode,
    CarriageReturn,
    IdentStart,
    IdentContinue,
    Zero,
    DigitNonZero,
    Digit,
    DigitBin,
    DigitOct,
    DigitHex,
    Sign,
    RadixBin,
    RadixOct,
    RadixHex,
    Sentinel,
}

impl CharClass {
    pub(crate) fn matches(self, c: char) -> bool {
        match self {
            CharClass::Whitespace => classify::is_whitespace(c),
            CharClass::OpenDelim => classify::is_open_delim(c),
            CharClass::CloseDelim => classify::is_close_delim(c),
            CharClass::Delimiter => classify::is_delimiter(c),
            CharClass::Quote => classify::is_quote(c),
            CharClass::Backslash => classify::is_backslash(c),
            CharClass::StringVerbatim => classify::is_string_verbatim(c),
            CharClass::EscapeCode => classify::is_escape_code(c),
            CharClass::CarriageReturn => classify::is_carriage_return(c),
            CharClass::IdentStart => classify::is_ident_start_strict(c),
            CharClass::IdentContinue => classify::is_ident_continue_strict(c),
            CharClass::Zero => classify::is_zero(c),
            CharClass::DigitNonZero => classify::is_digit_nonzero(c),
            CharClass::Digit => classify::is_digit(c),
            CharClass::DigitBin => classify::is_digit_bin(c),
            CharClass::DigitOct => classify::is_digit_oct(c),
            CharClass::DigitHex => classify::is_digit_hex(c),
            CharClass::Sign => classify::is_sign(c),
            CharClass::RadixBin => classify::is_radix_bin(c),
            CharClass::RadixOct => classify::is_radix_oct(c),
            CharClass::RadixHex => classify::is_radix_hex(c),
            CharClass::Sentinel => classify::is_sentinel(c),
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CharClass::Whitespace => "whitespace",
            CharClass::OpenDelim => "open delimiter",
            CharClass::CloseDelim => "close delimiter",
            CharClass::Delimiter => "delimiter",
            CharClass::Quote => "quote",
            CharClass::Backslash => "backslash",
            CharClass::StringVerbatim => "string character",
            CharClass::EscapeCode => "escape code",
            CharClass::CarriageReturn => "carriage return",
            CharClass::IdentStart => "identifier start",
            CharClass::IdentContinue => "identifier continue",
            CharClass::Zero => "zero",
            CharClass::DigitNonZero => "nonzero digit",
            CharClass::Digit => "decimal digit",
            CharClass::DigitBin => "binary digit",
            CharClass::DigitOct => "octal digit",
            CharClass::DigitHex => "hexadecimal digit",
            CharClass::Sign => "sign",
            CharClass::RadixBin => "binary radix prefix",
            CharClass::RadixOct => "octal radix prefix",
            CharClass::RadixHex => "hexadecimal radix prefix",
            CharClass::Sentinel => "end of input",
        })
    }
}

/// What a matched rule tells the driver to do. Actions carry the
/// payload they need; the driver dispatches them with a `match` and
/// routes them to the lexer or the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    OpenList,
    CloseList,
    StartToken,
    TokenChar,
    EndToken,
    StartString,
    StringChar,
    BeginEscape,
    EscapeChar,
    EndString,
    StartNumber,
    StartSigned,
    RadixPrefix,
    NumberDigit(Radix),
    EndNumber(AtomKind),
    Finish,
}

/// One row of a state's table.
#[derive(Debug)]
pub(crate) struct Rule {
    pub class: CharClass,
    pub actions: &'static [Action],
    /// When false the same character is re-examined in `next`.
    pub consume: bool,
    pub next: Option<State>,
}

const fn rule(
    class: CharClass,
    actions: &'static [Action],
    consume: bool,
    next: Option<State>,
) -> Rule {
    Rule {
        class,
        actions,
        consume,
        next,
    }
}

static EXPRESSION_RULES: &[Rule] = &[
    rule(CharClass::Whitespace, &[], true, None),
    rule(CharClass::OpenDelim, &[Action::OpenList], true, None),
    rule(CharClass::CloseDelim, &[Action::CloseList], true, None),
    rule(
        CharClass::DigitNonZero,
        &[Action::StartNumber],
        true,
        Some(State::NumberDec),
    ),
    rule(
        CharClass::Zero,
        &[Action::StartNumber],
        true,
        Some(State::LeadZero),
    ),
    rule(
        CharClass::Sign,
        &[Action::StartSigned],
        true,
        Some(State::NumberDecC1),
    ),
    rule(
        CharClass::Quote,
        &[Action::StartString],
        true,
        Some(State::QuotedString),
    ),
    rule(
        CharClass::IdentStart,
        &[Action::StartToken],
        true,
        Some(State::Token),
    ),
    rule(CharClass::Sentinel, &[Action::Finish], true, None),
];

static TOKEN_RULES: &[Rule] = &[
    rule(
        CharClass::Whitespace,
        &[Action::EndToken],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Delimiter,
        &[Action::EndToken],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Sentinel,
        &[Action::EndToken],
        false,
        Some(State::Expression),
    ),
    rule(CharClass::IdentContinue, &[Action::TokenChar], true, None),
];

static QUOTED_STRING_RULES: &[Rule] = &[
    rule(
        CharClass::Backslash,
        &[Action::BeginEscape],
        true,
        Some(State::Escape),
    ),
    rule(
        CharClass::Quote,
        &[Action::EndString],
        true,
        Some(State::Expression),
    ),
    rule(CharClass::StringVerbatim, &[Action::StringChar], true, None),
];

static ESCAPE_RULES: &[Rule] = &[
    // CR stays in the escape state so that the LF of a CRLF pair is
    // absorbed by the same line continuation.
    rule(CharClass::CarriageReturn, &[Action::EscapeChar], true, None),
    rule(
        CharClass::EscapeCode,
        &[Action::EscapeChar],
        true,
        Some(State::QuotedString),
    ),
];

static LEAD_ZERO_RULES: &[Rule] = &[
    rule(
        CharClass::Whitespace,
        &[Action::EndNumber(AtomKind::NumberDecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Delimiter,
        &[Action::EndNumber(AtomKind::NumberDecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Sentinel,
        &[Action::EndNumber(AtomKind::NumberDecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Digit,
        &[Action::NumberDigit(Radix::Decimal)],
        true,
        Some(State::NumberDec),
    ),
    rule(
        CharClass::RadixBin,
        &[Action::RadixPrefix],
        true,
        Some(State::NumberBinC1),
    ),
    rule(
        CharClass::RadixOct,
        &[Action::RadixPrefix],
        true,
        Some(State::NumberOctC1),
    ),
    rule(
        CharClass::RadixHex,
        &[Action::RadixPrefix],
        true,
        Some(State::NumberHexC1),
    ),
];

static NUMBER_DEC_RULES: &[Rule] = &[
    rule(
        CharClass::Whitespace,
        &[Action::EndNumber(AtomKind::NumberDecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Delimiter,
        &[Action::EndNumber(AtomKind::NumberDecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Sentinel,
        &[Action::EndNumber(AtomKind::NumberDecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Digit,
        &[Action::NumberDigit(Radix::Decimal)],
        true,
        None,
    ),
];

static NUMBER_BIN_RULES: &[Rule] = &[
    rule(
        CharClass::Whitespace,
        &[Action::EndNumber(AtomKind::NumberBinary)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Delimiter,
        &[Action::EndNumber(AtomKind::NumberBinary)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Sentinel,
        &[Action::EndNumber(AtomKind::NumberBinary)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::DigitBin,
        &[Action::NumberDigit(Radix::Binary)],
        true,
        None,
    ),
];

static NUMBER_OCT_RULES: &[Rule] = &[
    rule(
        CharClass::Whitespace,
        &[Action::EndNumber(AtomKind::NumberOctal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Delimiter,
        &[Action::EndNumber(AtomKind::NumberOctal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Sentinel,
        &[Action::EndNumber(AtomKind::NumberOctal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::DigitOct,
        &[Action::NumberDigit(Radix::Octal)],
        true,
        None,
    ),
];

static NUMBER_HEX_RULES: &[Rule] = &[
    rule(
        CharClass::Whitespace,
        &[Action::EndNumber(AtomKind::NumberHexadecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Delimiter,
        &[Action::EndNumber(AtomKind::NumberHexadecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::Sentinel,
        &[Action::EndNumber(AtomKind::NumberHexadecimal)],
        false,
        Some(State::Expression),
    ),
    rule(
        CharClass::DigitHex,
        &[Action::NumberDigit(Radix::Hexadecimal)],
        true,
        None,
    ),
];

static NUMBER_DEC_C1_RULES: &[Rule] = &[rule(
    CharClass::Digit,
    &[Action::NumberDigit(Radix::Decimal)],
    true,
    Some(State::NumberDec),
)];

static NUMBER_BIN_C1_RULES: &[Rule] = &[rule(
    CharClass::DigitBin,
    &[Action::NumberDigit(Radix::Binary)],
    true,
    Some(State::NumberBin),
)];

static NUMBER_OCT_C1_RULES: &[Rule] = &[rule(
    CharClass::DigitOct,
    &[Action::NumberDigit(Radix::Octal)],
    true,
    Some(State::NumberOct),
)];

static NUMBER_HEX_C1_RULES: &[Rule] = &[rule(
    CharClass::DigitHex,
    &[Action::NumberDigit(Radix::Hexadecimal)],
    true,
    Some(State::NumberHex),
)];

#[cfg(test)]
mod test {
    use super::State;
    use proptest::prelude::*;

    const ALL_STATES: [State; 13] = [
        State::Expression,
        State::Token,
        State::QuotedString,
        State::Escape,
        State::LeadZero,
        State::NumberDec,
        State::NumberBin,
        State::NumberOct,
        State::NumberHex,
        State::NumberDecC1,
        State::NumberBinC1,
        State::NumberOctC1,
        State::NumberHexC1,
    ];

    /// Push-back terminates because a rule that does not consume always
    /// lands in a state whose rules all consume.
    #[test]
    fn non_consuming_rules_return_to_expression() {
        for state in ALL_STATES {
            for rule in state.rules() {
                if !rule.consume {
                    assert_eq!(rule.next, Some(State::Expression), "in {state}");
                }
            }
        }
    }

    #[test]
    fn expression_rules_always_consume() {
        for rule in State::Expression.rules() {
            assert!(rule.consume, "{:?} does not consume", rule.class);
        }
    }

    proptest! {
        /// No character may match two classes of the same table.
        #[test]
        fn classes_within_a_table_are_disjoint(c: char) {
            for state in ALL_STATES {
                let matching = state.rules().iter().filter(|r| r.class.matches(c)).count();
                prop_assert!(matching <= 1, "{:?} matches {} rules of {}", c, matching, state);
            }
        }
    }
}
