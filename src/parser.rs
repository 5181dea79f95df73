//! The state-machine driver.
//!
//! A [`Parser`] consumes text one character at a time: it looks the
//! character up in the current state's rule table, runs the matched
//! rule's actions against the accumulator and the tree builder, and
//! follows the rule's transition. Input may arrive in chunks of any
//! size; [`Parser::finish`] feeds the end-of-input sentinel so that
//! whatever is still open is finalized through the same tables, then
//! hands over the finished tree.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use delegate::delegate;

use crate::classify;
use crate::lexer::Lexer;
use crate::state::{Action, CharClass, State};
use crate::tree::{AtomKind, AtomValue, StructureError, Tree, TreeBuilder};

/// A parse error.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A character no rule of the current state accepts.
    #[error("unexpected character {found:?} in state {state} at {position}")]
    Syntax {
        state: State,
        found: char,
        position: Position,
    },
    /// Input ended inside an atom that cannot end there.
    #[error("unexpected end of input in state {state} at {position}")]
    UnexpectedEnd { state: State, position: Position },
    /// A closing delimiter with no list open.
    #[error("closing delimiter without a matching opening delimiter at {position}")]
    UnbalancedClose { position: Position },
    /// Input ended with lists still open.
    #[error("unclosed list at {position} (depth {depth})")]
    UnclosedList { depth: usize, position: Position },
    /// A second top-level value; a document holds exactly one.
    #[error("document already has a top-level value; second one at {position}")]
    DuplicateRoot { position: Position },
    /// Input ended before any top-level value.
    #[error("input contains no value")]
    Empty,
    /// A numeric literal that does not fit in an `i64`.
    #[error("number does not fit in 64 bits at {position}")]
    NumberOverflow { position: Position },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shorthand for a result specialised to parse errors.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// 1-based source location of the character being examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    fn start() -> Self {
        Position { line: 1, column: 1 }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Observer for rule dispatch. The driver reports every matched rule
/// just before running its actions; a character examined twice because
/// of push-back is reported twice.
pub trait Trace {
    fn rule(&mut self, state: State, found: char, class: CharClass, position: Position);
}

impl<T: Trace + ?Sized> Trace for &mut T {
    fn rule(&mut self, state: State, found: char, class: CharClass, position: Position) {
        (**self).rule(state, found, class, position);
    }
}

/// The default observer; ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl Trace for NoTrace {
    fn rule(&mut self, _: State, _: char, _: CharClass, _: Position) {}
}

/// Observer that forwards every dispatch to [`log`] at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl Trace for LogTrace {
    fn rule(&mut self, state: State, found: char, class: CharClass, position: Position) {
        log::trace!("{position}: {state} {found:?} matched {class}");
    }
}

/// A streaming parser.
///
/// Feed it text in chunks of any size, then call
/// [`finish`](Parser::finish) to obtain the [`Tree`]. Chunk boundaries
/// carry no meaning; a parser fed character by character behaves
/// exactly like one fed the whole document at once.
#[derive(Debug)]
pub struct Parser<T = NoTrace> {
    state: State,
    lexer: Lexer,
    builder: TreeBuilder,
    position: Position,
    trace: T,
}

impl Parser<NoTrace> {
    pub fn new() -> Self {
        Self::with_trace(NoTrace)
    }
}

impl Default for Parser<NoTrace> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Trace> Parser<T> {
    /// A parser reporting rule dispatch to the given observer.
    pub fn with_trace(trace: T) -> Self {
        Parser {
            state: State::Expression,
            lexer: Lexer::default(),
            builder: TreeBuilder::default(),
            position: Position::start(),
            trace,
        }
    }

    delegate! {
        to self.builder {
            /// Current list nesting depth.
            pub fn depth(&self) -> usize;
        }
    }

    /// Position of the next character to be examined.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Feeds a chunk of text.
    pub fn feed(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.step(c)?;
        }
        Ok(())
    }

    /// Ends the input and hands over the tree.
    pub fn finish(mut self) -> Result<Tree> {
        self.step(classify::SENTINEL)?;
        self.builder.into_tree().ok_or(ParseError::Empty)
    }

    fn step(&mut self, c: char) -> Result<()> {
        loop {
            debug_assert_eq!(
                self.lexer.is_open(),
                self.state.scans_atom(),
                "accumulator must be open exactly while scanning an atom",
            );
            let Some(rule) = self.state.rules().iter().find(|rule| rule.class.matches(c)) else {
                return Err(self.no_rule(c));
            };
            self.trace.rule(self.state, c, rule.class, self.position);
            for action in rule.actions {
                self.apply(*action, c)?;
            }
            if let Some(next) = rule.next {
                self.state = next;
            }
            if rule.consume {
                self.position.advance(c);
                return Ok(());
            }
            // Push-back: the same character is re-examined in the new
            // state, which is always Expression and always consumes.
        }
    }

    fn no_rule(&self, c: char) -> ParseError {
        if classify::is_sentinel(c) {
            ParseError::UnexpectedEnd {
                state: self.state,
                position: self.position,
            }
        } else {
            ParseError::Syntax {
                state: self.state,
                found: c,
                position: self.position,
            }
        }
    }

    fn apply(&mut self, action: Action, c: char) -> Result<()> {
        match action {
            Action::OpenList => {
                self.builder.open_list();
                Ok(())
            }
            Action::CloseList => {
                let result = self.builder.close_list();
                self.structure(result)
            }
            Action::StartToken => {
                self.lexer.start_ident(c);
                Ok(())
            }
            Action::TokenChar => {
                self.lexer.ident(c);
                Ok(())
            }
            Action::EndToken => {
                let (raw, value) = self.lexer.finish_text();
                let result = self.builder.atom(AtomKind::Token, raw, AtomValue::Text(value));
                self.structure(result)
            }
            Action::StartString => {
                self.lexer.start_string(c);
                Ok(())
            }
            Action::StringChar => {
                self.lexer.string_char(c);
                Ok(())
            }
            Action::BeginEscape => {
                self.lexer.escape_mark(c);
                Ok(())
            }
            Action::EscapeChar => {
                self.lexer.escape_code(c);
                Ok(())
            }
            Action::EndString => {
                self.lexer.end_quote(c);
                let (raw, value) = self.lexer.finish_text();
                let result = self
                    .builder
                    .atom(AtomKind::QuotedString, raw, AtomValue::Text(value));
                self.structure(result)
            }
            Action::StartNumber => {
                self.lexer.start_number(c);
                Ok(())
            }
            Action::StartSigned => {
                self.lexer.start_signed(c);
                Ok(())
            }
            Action::RadixPrefix => {
                self.lexer.radix_prefix(c);
                Ok(())
            }
            Action::NumberDigit(radix) => self.lexer.digit(c, radix).map_err(|_| {
                ParseError::NumberOverflow {
                    position: self.position,
                }
            }),
            Action::EndNumber(kind) => {
                let (raw, value) = self.lexer.finish_number();
                let result = self.builder.atom(kind, raw, AtomValue::Int(value));
                self.structure(result)
            }
            Action::Finish => {
                let result = self.builder.end_of_input();
                self.structure(result)
            }
        }
    }

    fn structure(&self, result: Result<(), StructureError>) -> Result<()> {
        result.map_err(|err| match err {
            StructureError::ExtraClose => ParseError::UnbalancedClose {
                position: self.position,
            },
            StructureError::MissingClose { depth } => ParseError::UnclosedList {
                depth,
                position: self.position,
            },
            StructureError::SecondRoot => ParseError::DuplicateRoot {
                position: self.position,
            },
            StructureError::Empty => ParseError::Empty,
        })
    }
}

/// Parse a complete document from a string.
pub fn from_str(source: &str) -> Result<Tree> {
    from_str_with(source, NoTrace)
}

/// Parse a complete document, reporting rule dispatch to `trace`.
pub fn from_str_with<T: Trace>(source: &str, trace: T) -> Result<Tree> {
    let mut parser = Parser::with_trace(trace);
    parser.feed(source)?;
    parser.finish()
}

/// Parse a document from a buffered reader, feeding it line by line.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Tree> {
    from_reader_with(reader, NoTrace)
}

/// [`from_reader`] with a dispatch observer.
pub fn from_reader_with<R: BufRead, T: Trace>(mut reader: R, trace: T) -> Result<Tree> {
    let mut parser = Parser::with_trace(trace);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        parser.feed(&line)?;
    }
    parser.finish()
}

/// Parse the document in the file at `path`.
pub fn from_path(path: impl AsRef<Path>) -> Result<Tree> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}

#[cfg(test)]
mod test {
    use super::{from_str, CharClass, ParseError, Parser, Position, State, Trace};
    use crate::tree::{Atom, AtomKind, AtomValue, Node, Tree};
    use rstest::rstest;

    fn root_atom(tree: &Tree) -> &Atom {
        match tree.node(tree.root()) {
            Node::Atom(atom) => atom,
            Node::Expression(_) => panic!("expected an atom root"),
        }
    }

    #[rstest]
    #[case("0", 0, AtomKind::NumberDecimal)]
    #[case("7", 7, AtomKind::NumberDecimal)]
    #[case("100", 100, AtomKind::NumberDecimal)]
    #[case("0123", 123, AtomKind::NumberDecimal)]
    #[case("-42", -42, AtomKind::NumberDecimal)]
    #[case("+7", 7, AtomKind::NumberDecimal)]
    #[case("-0", 0, AtomKind::NumberDecimal)]
    #[case("0b1100", 12, AtomKind::NumberBinary)]
    #[case("0o14", 12, AtomKind::NumberOctal)]
    #[case("0x0c", 12, AtomKind::NumberHexadecimal)]
    #[case("0x0C", 12, AtomKind::NumberHexadecimal)]
    #[case("9223372036854775807", i64::MAX, AtomKind::NumberDecimal)]
    #[case("-9223372036854775807", -i64::MAX, AtomKind::NumberDecimal)]
    fn numbers(#[case] source: &str, #[case] expected: i64, #[case] kind: AtomKind) {
        let tree = from_str(source).unwrap();
        let atom = root_atom(&tree);
        assert_eq!(atom.kind, kind);
        assert_eq!(atom.raw, source);
        assert_eq!(atom.value, AtomValue::Int(expected));
    }

    #[rstest]
    #[case(r#""""#, "")]
    #[case(r#""hello world""#, "hello world")]
    #[case(r#""a\tb""#, "a\tb")]
    #[case(r#""a\nb""#, "a\nb")]
    #[case(r#""\b\v\f\r""#, "\u{8}\u{b}\u{c}\r")]
    #[case(r#""say \"hi\"""#, "say \"hi\"")]
    #[case(r#""\'quoted\'""#, "'quoted'")]
    #[case(r#""it's""#, "it's")]
    #[case(r#""back\\slash""#, "back\\slash")]
    #[case("\"line\\\ncont\"", "linecont")]
    #[case("\"line\\\r\ncont\"", "linecont")]
    fn strings(#[case] source: &str, #[case] expected: &str) {
        let tree = from_str(source).unwrap();
        let atom = root_atom(&tree);
        assert_eq!(atom.kind, AtomKind::QuotedString);
        assert_eq!(atom.raw, source);
        assert_eq!(atom.value, AtomValue::Text(expected.into()));
    }

    #[rstest]
    #[case("hello", "hello")]
    #[case("_tmp", "_tmp")]
    #[case("a1", "a1")]
    #[case("施", "施")]
    #[case("施耐庵", "施耐庵")]
    #[case("révolte", "révolte")]
    // Compatibility characters normalize in the value; raw keeps the
    // source spelling.
    #[case("ﬁle", "file")]
    #[case("Ⅻ", "XII")]
    fn tokens(#[case] source: &str, #[case] value: &str) {
        let tree = from_str(source).unwrap();
        let atom = root_atom(&tree);
        assert_eq!(atom.kind, AtomKind::Token);
        assert_eq!(atom.raw, source);
        assert_eq!(atom.value, AtomValue::Text(value.into()));
    }

    #[test]
    fn nested_lists() {
        let tree = from_str("(a (b c))").unwrap();
        assert_eq!(
            tree.dump(),
            "Expression:\n Token: a\n Expression:\n  Token: b\n  Token: c\n"
        );
    }

    #[test]
    fn empty_list_is_a_valid_document() {
        let tree = from_str("()").unwrap();
        assert_eq!(tree.children(tree.root()), &[]);
    }

    #[test]
    fn whitespace_between_atoms_is_free_form() {
        let spaced = from_str("  (\ta\n  ( b\r\nc )\n)  ").unwrap();
        let tight = from_str("(a (b c))").unwrap();
        assert_eq!(spaced, tight);
    }

    fn error_name(err: &ParseError) -> &'static str {
        match err {
            ParseError::Syntax { .. } => "syntax",
            ParseError::UnexpectedEnd { .. } => "unexpected end",
            ParseError::UnbalancedClose { .. } => "unbalanced close",
            ParseError::UnclosedList { .. } => "unclosed list",
            ParseError::DuplicateRoot { .. } => "duplicate root",
            ParseError::Empty => "empty",
            ParseError::NumberOverflow { .. } => "overflow",
            ParseError::Io(_) => "io",
        }
    }

    #[rstest]
    #[case("(a b", "unclosed list")]
    #[case("((a)", "unclosed list")]
    #[case(")", "unbalanced close")]
    #[case("(a))", "unbalanced close")]
    #[case("a b", "duplicate root")]
    #[case("(a) (b)", "duplicate root")]
    #[case("a ()", "duplicate root")]
    #[case("", "empty")]
    #[case("  \n\t", "empty")]
    #[case("0b", "unexpected end")]
    #[case("0o", "unexpected end")]
    #[case("0x", "unexpected end")]
    #[case("+", "unexpected end")]
    #[case("-", "unexpected end")]
    #[case("\"abc", "unexpected end")]
    #[case("\"abc\\", "unexpected end")]
    #[case("0b2", "syntax")]
    #[case("0o8", "syntax")]
    #[case("0xg", "syntax")]
    #[case("0h1", "syntax")]
    #[case("12a", "syntax")]
    #[case("+a", "syntax")]
    #[case("-0x10", "syntax")]
    #[case("\"a\\zb\"", "syntax")]
    #[case("\"a\nb\"", "syntax")]
    #[case("\u{fdfa}", "syntax")]
    #[case("9223372036854775808", "overflow")]
    #[case("-9223372036854775808", "overflow")]
    fn rejected(#[case] source: &str, #[case] expected: &'static str) {
        let err = from_str(source).unwrap_err();
        assert_eq!(expected, error_name(&err), "for {source:?}: {err}");
    }

    #[test]
    fn syntax_errors_carry_the_position() {
        let err = from_str("(\n  ]").unwrap_err();
        match err {
            ParseError::Syntax {
                state,
                found,
                position,
            } => {
                assert_eq!(state, State::Expression);
                assert_eq!(found, ']');
                assert_eq!((position.line(), position.column()), (2, 3));
            }
            other => panic!("expected a syntax error, got {other}"),
        }
    }

    #[test]
    fn unclosed_list_reports_depth_and_position() {
        let err = from_str("(a b").unwrap_err();
        match err {
            ParseError::UnclosedList { depth, position } => {
                assert_eq!(depth, 1);
                assert_eq!((position.line(), position.column()), (1, 5));
            }
            other => panic!("expected an unclosed list error, got {other}"),
        }
    }

    #[test]
    fn chunk_boundaries_do_not_matter() {
        let text = "(a (b \"c\\n\") 0x1f)";
        let whole = from_str(text).unwrap();

        let mut parser = Parser::new();
        for c in text.chars() {
            let mut buffer = [0u8; 4];
            parser.feed(c.encode_utf8(&mut buffer)).unwrap();
        }
        assert_eq!(parser.finish().unwrap(), whole);
    }

    #[test]
    fn depth_and_position_track_the_input() {
        let mut parser = Parser::new();
        parser.feed("((a\n b").unwrap();
        assert_eq!(parser.depth(), 2);
        assert_eq!(parser.position().line(), 2);
        assert_eq!(parser.position().column(), 3);
    }

    #[test]
    fn from_reader_matches_from_str() {
        let text = "(a\n (b c)\n \"d\")\n";
        let reader = std::io::Cursor::new(text.as_bytes());
        assert_eq!(
            super::from_reader(reader).unwrap(),
            from_str(text).unwrap()
        );
    }

    #[derive(Default)]
    struct Recorder(Vec<(State, CharClass)>);

    impl Trace for Recorder {
        fn rule(&mut self, state: State, _: char, class: CharClass, _: Position) {
            self.0.push((state, class));
        }
    }

    #[test]
    fn observer_sees_every_dispatch_including_push_back() {
        let mut recorder = Recorder::default();
        let mut parser = Parser::with_trace(&mut recorder);
        parser.feed("ab").unwrap();
        parser.finish().unwrap();

        // The sentinel is examined twice: once by TOKEN, whose rule
        // ends the token without consuming, and once by EXPRESSION.
        assert_eq!(
            recorder.0,
            vec![
                (State::Expression, CharClass::IdentStart),
                (State::Token, CharClass::IdentContinue),
                (State::Token, CharClass::Sentinel),
                (State::Expression, CharClass::Sentinel),
            ]
        );
    }

    #[test]
    fn log_trace_observer_is_usable() {
        let tree = super::from_str_with("(a)", super::LogTrace).unwrap();
        assert_eq!(tree, from_str("(a)").unwrap());
    }
}
