//! Plain-data projection of a parsed tree.

use std::fmt;

use proptest::arbitrary::Arbitrary;
use smol_str::SmolStr;

use crate::classify;
use crate::escape::escape_string;
use crate::tree::{AtomValue, Node, NodeId, Tree};

/// A tree reduced to plain nested data: expressions become lists,
/// atoms their decoded values. Kind and spelling distinctions are
/// gone; `0x0c` and `12` project to the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    List(Vec<Value>),
    Text(SmolStr),
    Int(i64),
}

impl Tree {
    /// Projects the whole document.
    pub fn to_value(&self) -> Value {
        self.value_of(self.root())
    }

    fn value_of(&self, id: NodeId) -> Value {
        match self.node(id) {
            Node::Atom(atom) => match &atom.value {
                AtomValue::Text(text) => Value::Text(text.clone()),
                AtomValue::Int(int) => Value::Int(*int),
            },
            Node::Expression(expr) => Value::List(
                expr.children()
                    .iter()
                    .map(|&child| self.value_of(child))
                    .collect(),
            ),
        }
    }
}

impl From<SmolStr> for Value {
    fn from(value: SmolStr) -> Self {
        Self::Text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

/// Writes the value back out as parseable source: lists in
/// parentheses, text as a quoted string, integers in decimal.
///
/// Text is always quoted, so the output parses even when the value
/// came from a token. Control characters without an escape code have
/// no string syntax and come out verbatim.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Value::Text(text) => f.write_str(&escape_string(text)),
            Value::Int(int) => write!(f, "{int}"),
        }
    }
}

impl Arbitrary for Value {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        // Only control characters with an escape code survive the
        // filter, so every generated value can be written out and read
        // back. The magnitude bound keeps i64::MIN out; its negation
        // is not representable while scanning.
        let text = any::<String>().prop_map(|s| {
            let printable: String = s
                .chars()
                .filter(|&c| {
                    !classify::is_control(c)
                        || matches!(c, '\u{8}' | '\t' | '\u{b}' | '\n' | '\u{c}' | '\r')
                })
                .collect();
            Value::Text(printable.into())
        });
        let int = (-i64::MAX..=i64::MAX).prop_map(Value::Int);

        let leaf = prop_oneof![text, int];
        leaf.prop_recursive(8, 256, 10, |inner| {
            proptest::collection::vec(inner, 0..10).prop_map(Value::List)
        })
        .boxed()
    }
}
