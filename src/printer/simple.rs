use std::fmt;

use crate::tree::{Node, NodeId, Tree};

use super::atom_text;

/// Canonical single-line printer: one space between siblings, nothing
/// else.
struct SimplePrinter<'a> {
    tree: &'a Tree,
    needs_whitespace: bool,
    string: String,
}

impl SimplePrinter<'_> {
    fn node(&mut self, id: NodeId) {
        match self.tree.node(id) {
            Node::Atom(atom) => {
                if self.needs_whitespace {
                    self.string.push(' ');
                }

                self.string.push_str(&atom_text(atom));
                self.needs_whitespace = true;
            }
            Node::Expression(expr) => {
                if self.needs_whitespace {
                    self.string.push(' ');
                }

                self.string.push('(');
                self.needs_whitespace = false;
                for &child in expr.children() {
                    self.node(child);
                }
                self.string.push(')');
                self.needs_whitespace = true;
            }
        }
    }
}

/// Print a tree into its canonical single-line form.
///
/// This function does not produce line breaks, indentation, or
/// unnecessary whitespace. Where human readability is a concern,
/// consider using the [`to_string_pretty`] function instead.
///
/// [`to_string_pretty`]: `crate::printer::to_string_pretty`
pub fn to_string(tree: &Tree) -> String {
    let mut printer = SimplePrinter {
        tree,
        needs_whitespace: false,
        string: String::new(),
    };
    printer.node(tree.root());
    printer.string
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_string(self))
    }
}
