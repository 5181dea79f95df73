//! Streaming s-expression parsing into a single-rooted tree, and
//! printing back out.
//!
//! # Syntax
//!
//! - **Lists** are sequences of values, delimited on the outside by
//!   `(` and `)` and separated by whitespace. A document holds exactly
//!   one top-level value, which may be a lone atom.
//!
//! - **Tokens** are Unicode identifiers: an identifier-start character
//!   followed by identifier-continue characters. The token's value is
//!   its NFKC normalization; the spelling it was parsed from is kept
//!   alongside.
//!
//! - **Strings** are enclosed in double quotes. Within them the
//!   escapes `\b \t \v \n \f \r \" \' \\` stand for single
//!   characters, and a backslash before a line ending (LF or CRLF)
//!   continues the string on the next line. Unescaped control
//!   characters are not allowed.
//!
//! - **Numbers** are 64-bit integers: decimal, optionally signed, or
//!   unsigned binary/octal/hexadecimal with the `0b`/`0o`/`0x`
//!   prefixes.
//!
//! # Parsing
//!
//! Parsing is a character-at-a-time state machine, so input may arrive
//! in chunks of any size:
//!
//! ```
//! use sexptree::Parser;
//!
//! let mut parser = Parser::new();
//! parser.feed("(a (b ")?;
//! parser.feed("c))")?;
//! let tree = parser.finish()?;
//! assert_eq!(sexptree::to_string(&tree), "(a (b c))");
//! # Ok::<(), sexptree::ParseError>(())
//! ```
//!
//! For whole documents, [`from_str`], [`from_reader`] and
//! [`from_path`] wrap the same machinery.

pub mod classify;
pub(crate) mod escape;
pub(crate) mod lexer;
pub mod parser;
pub mod printer;
pub mod state;
pub mod tree;
pub mod value;

pub use parser::{
    from_path, from_reader, from_reader_with, from_str, from_str_with, LogTrace, NoTrace,
    ParseError, Parser, Position, Trace,
};
pub use printer::{to_string, to_string_pretty};
pub use state::{CharClass, State};
pub use tree::{Atom, AtomKind, AtomValue, Expression, Node, NodeId, Tree};
pub use value::Value;
