//! Print trees back into s-expression text.
//!
//! [`to_string`] emits the canonical single-line form: strings are
//! re-encoded from their decoded value so escapes come out canonical,
//! while tokens and numbers keep the raw spelling they were parsed
//! from. [`to_string_pretty`] lays the same text out to a target
//! width.

use std::borrow::Cow;

use crate::escape::escape_string;
use crate::tree::{Atom, AtomKind, AtomValue};

mod pretty;
mod simple;

pub use pretty::to_string_pretty;
pub use simple::to_string;

/// Source form of a single atom.
fn atom_text(atom: &Atom) -> Cow<'_, str> {
    match (&atom.kind, &atom.value) {
        (AtomKind::QuotedString, AtomValue::Text(text)) => Cow::Owned(escape_string(text)),
        _ => Cow::Borrowed(atom.raw.as_str()),
    }
}
