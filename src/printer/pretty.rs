use pretty::DocAllocator as _;

use crate::tree::{Node, NodeId, Tree};

use super::atom_text;

/// Width-aware printer over the `pretty` crate. A list is rendered on
/// one line when it fits, otherwise it breaks with its children
/// indented two columns.
struct PrettyPrinter<'a> {
    arena: &'a pretty::Arena<'a>,
    tree: &'a Tree,
}

impl<'a> PrettyPrinter<'a> {
    fn node(&self, id: NodeId) -> pretty::DocBuilder<'a, pretty::Arena<'a>> {
        match self.tree.node(id) {
            Node::Atom(atom) => self.arena.text(atom_text(atom)),
            Node::Expression(expr) => {
                let children = expr.children().iter().map(|&child| self.node(child));
                let docs = self
                    .arena
                    .intersperse(children, self.arena.line())
                    .nest(2)
                    .group();

                self.arena
                    .text("(")
                    .append(docs)
                    .append(self.arena.text(")"))
            }
        }
    }
}

/// Pretty print a tree to the given line width.
pub fn to_string_pretty(tree: &Tree, width: usize) -> String {
    let arena = pretty::Arena::new();
    let printer = PrettyPrinter {
        arena: &arena,
        tree,
    };
    let doc = printer.node(tree.root());

    let mut string = String::new();
    let _ = doc.render_fmt(width, &mut string);
    string
}
