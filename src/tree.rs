//! The parsed document.
//!
//! Nodes live in a growable arena and refer to each other by index:
//! child lists and parent links are `NodeId`s, so the tree is a plain
//! data structure with no interior mutability or reference counting.
//! A document owns exactly one root, which may be a lone atom.

use std::fmt;
use std::fmt::Write as _;

use smol_str::SmolStr;

/// Index of a node in its tree's arena. Ids are only meaningful for
/// the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What kind of atom a leaf is. The number kinds record the radix the
/// literal was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Token,
    QuotedString,
    NumberDecimal,
    NumberBinary,
    NumberOctal,
    NumberHexadecimal,
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AtomKind::Token => "Token",
            AtomKind::QuotedString => "QuotedString",
            AtomKind::NumberDecimal => "NumberDecimal",
            AtomKind::NumberBinary => "NumberBinary",
            AtomKind::NumberOctal => "NumberOctal",
            AtomKind::NumberHexadecimal => "NumberHexadecimal",
        })
    }
}

/// Decoded payload of an atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomValue {
    Text(SmolStr),
    Int(i64),
}

/// A leaf node.
#[derive(Debug, Clone)]
pub struct Atom {
    pub kind: AtomKind,
    /// Exact source spelling, quotes, escapes and radix prefix
    /// included.
    pub raw: SmolStr,
    /// What the spelling denotes: the NFKC-normalized token, the
    /// unescaped string body, or the signed integer value.
    pub value: AtomValue,
    /// List nesting level the atom appeared at.
    pub depth: usize,
}

/// An interior node: an ordered list of children.
#[derive(Debug, Clone)]
pub struct Expression {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// List nesting level the opening delimiter appeared at.
    pub depth: usize,
}

impl Expression {
    /// The enclosing expression, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Atom(Atom),
    Expression(Expression),
}

/// A completely parsed document.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Children of `id`; empty for atoms.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Expression(expr) => expr.children(),
            Node::Atom(_) => &[],
        }
    }

    /// Indented listing of every node, one per line, in document
    /// order. Atoms show their kind and raw spelling.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, self.depth_of(self.root), &mut out);
        out
    }

    fn depth_of(&self, id: NodeId) -> usize {
        match self.node(id) {
            Node::Atom(atom) => atom.depth,
            Node::Expression(expr) => expr.depth,
        }
    }

    fn dump_node(&self, id: NodeId, base: usize, out: &mut String) {
        let indent = " ".repeat(self.depth_of(id) - base);
        match self.node(id) {
            Node::Atom(atom) => {
                let _ = writeln!(out, "{indent}{}: {}", atom.kind, atom.raw);
            }
            Node::Expression(expr) => {
                let _ = writeln!(out, "{indent}Expression:");
                for &child in expr.children() {
                    self.dump_node(child, base, out);
                }
            }
        }
    }

    fn node_eq(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        match (self.node(id), other.node(other_id)) {
            (Node::Atom(a), Node::Atom(b)) => a.kind == b.kind && a.value == b.value,
            (Node::Expression(a), Node::Expression(b)) => {
                a.children.len() == b.children.len()
                    && a.children
                        .iter()
                        .zip(&b.children)
                        .all(|(&x, &y)| self.node_eq(x, other, y))
            }
            _ => false,
        }
    }
}

/// Equality is semantic: same shape, and atoms agree in kind and
/// decoded value. The raw spelling is not compared, so a parsed string
/// equals its re-escaped canonical form.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.node_eq(self.root, other, other.root)
    }
}

impl Eq for Tree {}

/// Structural violations detected while building. The driver attaches
/// source positions when it surfaces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructureError {
    /// Closing delimiter with no list open.
    ExtraClose,
    /// End of input with this many lists still open.
    MissingClose { depth: usize },
    /// A second top-level node; a document holds exactly one.
    SecondRoot,
    /// End of input before any top-level node.
    Empty,
}

/// Assembles the arena as the driver reports delimiters and finished
/// atoms.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
    /// Innermost list currently open.
    open: Option<NodeId>,
    /// The single permitted top-level node, once finalized.
    root: Option<NodeId>,
    depth: usize,
}

impl TreeBuilder {
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Starts a list. Its node goes into the arena now; children are
    /// attached as they finish, and the list joins its own parent only
    /// when it closes.
    pub(crate) fn open_list(&mut self) {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Expression(Expression {
            parent: self.open,
            children: Vec::new(),
            depth: self.depth,
        }));
        self.open = Some(id);
        self.depth += 1;
    }

    /// Seals the open list and attaches it to its parent, or makes it
    /// the root if it closed at top level.
    pub(crate) fn close_list(&mut self) -> Result<(), StructureError> {
        let Some(id) = self.open else {
            return Err(StructureError::ExtraClose);
        };
        self.depth -= 1;
        self.open = match &self.nodes[id.0] {
            Node::Expression(expr) => expr.parent,
            Node::Atom(_) => unreachable!("open node is always an expression"),
        };
        self.attach(id)
    }

    /// Appends a finished atom under the open list, or as the root.
    pub(crate) fn atom(
        &mut self,
        kind: AtomKind,
        raw: SmolStr,
        value: AtomValue,
    ) -> Result<(), StructureError> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Atom(Atom {
            kind,
            raw,
            value,
            depth: self.depth,
        }));
        self.attach(id)
    }

    fn attach(&mut self, id: NodeId) -> Result<(), StructureError> {
        match self.open {
            Some(parent) => match &mut self.nodes[parent.0] {
                Node::Expression(expr) => expr.children.push(id),
                Node::Atom(_) => unreachable!("open node is always an expression"),
            },
            None => {
                if self.root.is_some() {
                    return Err(StructureError::SecondRoot);
                }
                self.root = Some(id);
            }
        }
        Ok(())
    }

    /// End-of-input check: every list closed and a root present.
    pub(crate) fn end_of_input(&self) -> Result<(), StructureError> {
        if self.depth > 0 {
            Err(StructureError::MissingClose { depth: self.depth })
        } else if self.root.is_none() {
            Err(StructureError::Empty)
        } else {
            Ok(())
        }
    }

    /// Hands over the finished tree; `None` until a root exists.
    pub(crate) fn into_tree(self) -> Option<Tree> {
        let root = self.root?;
        Some(Tree {
            nodes: self.nodes,
            root,
        })
    }
}
