//! Position-rooted diagnostic trees.
//!
//! An [`Error`] is a source position plus an ordered list of children. A
//! child is either a plain message ([`Diag::Leaf`]) or another tree rooted
//! at a different position ([`Diag::Node`]), which records where a problem
//! was reached from.
//!
//! Lookup and merge walk the tree with explicit work lists rather than
//! recursion, so adversarially deep trees cannot exhaust the stack.

use std::fmt;

use smart_ir::Position;

/// Default cap on the number of children kept per node.
pub const DEFAULT_LIMIT: usize = 120;

/// A child diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diag {
    Leaf(String),
    Node(Error),
}

impl Diag {
    /// Message of a leaf, `None` for a node.
    pub fn message(&self) -> Option<&str> {
        match self {
            Diag::Leaf(msg) => Some(msg),
            Diag::Node(_) => None,
        }
    }
}

impl From<Error> for Diag {
    fn from(err: Error) -> Self {
        Diag::Node(err)
    }
}

impl From<String> for Diag {
    fn from(msg: String) -> Self {
        Diag::Leaf(msg)
    }
}

impl From<&str> for Diag {
    fn from(msg: &str) -> Self {
        Diag::Leaf(msg.to_owned())
    }
}

/// A diagnostic tree rooted at a source position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Error {
    pub pos: Position,
    pub children: Vec<Diag>,
}

impl Error {
    /// Single-leaf diagnostic.
    pub fn new(pos: Position, msg: impl Into<String>) -> Self {
        Error {
            pos,
            children: vec![Diag::Leaf(msg.into())],
        }
    }

    /// Empty tree, grown with [`Error::merge`].
    pub fn at(pos: Position) -> Self {
        Error {
            pos,
            children: Vec::new(),
        }
    }

    /// Whether any direct child is a tree.
    pub fn is_tree(&self) -> bool {
        self.children.iter().any(|c| matches!(c, Diag::Node(_)))
    }

    /// Index of the direct child rooted at `pos`.
    ///
    /// Linear scan: insertion order drives rendering, so no index is kept.
    pub fn find(&self, pos: &Position) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, Diag::Node(e) if e.pos == *pos))
    }

    fn has_message(&self, msg: &str) -> bool {
        self.children.iter().any(|c| c.message() == Some(msg))
    }

    /// Whether `existing` is already carried by this tree and can be
    /// dropped from a sibling list when this tree is appended.
    fn subsumes(&self, existing: &Diag) -> bool {
        match existing {
            Diag::Node(e) => self.find(&e.pos).is_some(),
            Diag::Leaf(_) => false,
        }
    }

    /// First leaf message in depth-first order.
    pub fn first_message(&self) -> Option<&str> {
        let mut stack: Vec<&Error> = vec![self];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                if let Diag::Leaf(msg) = child {
                    return Some(msg);
                }
            }
            for child in node.children.iter().rev() {
                if let Diag::Node(e) = child {
                    stack.push(e);
                }
            }
        }
        None
    }

    /// Merge diagnostics into this tree with the default cap.
    pub fn merge<I>(&mut self, diags: I)
    where
        I: IntoIterator,
        I::Item: Into<Diag>,
    {
        self.merge_with_limit(diags, DEFAULT_LIMIT);
    }

    /// Merge diagnostics into this tree.
    ///
    /// - A leaf is appended unless an equal message is already a direct child.
    /// - A tree whose position matches an existing child is merged into that
    ///   child; otherwise children it already carries are removed and the
    ///   tree is appended.
    /// - A node holding more than `limit` children drops the oldest ones.
    pub fn merge_with_limit<I>(&mut self, diags: I, limit: usize)
    where
        I: IntoIterator,
        I::Item: Into<Diag>,
    {
        let incoming: Vec<Diag> = diags.into_iter().map(Into::into).collect();
        // (path from self to the merge target, diagnostic), processed LIFO.
        let mut work: Vec<(Vec<usize>, Diag)> =
            incoming.into_iter().rev().map(|d| (Vec::new(), d)).collect();

        while let Some((path, diag)) = work.pop() {
            let Some(target) = self.node_at_mut(&path) else {
                continue;
            };
            match diag {
                Diag::Leaf(msg) => {
                    if !target.has_message(&msg) {
                        target.children.push(Diag::Leaf(msg));
                    }
                }
                Diag::Node(err) => {
                    if let Some(i) = target.find(&err.pos) {
                        let mut child_path = path;
                        child_path.push(i);
                        for d in err.children.into_iter().rev() {
                            work.push((child_path.clone(), d));
                        }
                    } else {
                        target.children.retain(|c| !err.subsumes(c));
                        target.children.push(Diag::Node(err));
                    }
                }
            }
            target.truncate_oldest(limit);
        }
    }

    fn truncate_oldest(&mut self, limit: usize) {
        if limit > 0 && self.children.len() > limit {
            let dropped = self.children.len() - limit;
            tracing::debug!(dropped, limit, pos = %self.pos, "diagnostic node truncated");
            self.children.drain(..dropped);
        }
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Error> {
        let mut node = self;
        for &i in path {
            node = match node.children.get_mut(i) {
                Some(Diag::Node(e)) => e,
                _ => return None,
            };
        }
        Some(node)
    }

    /// First child only, with a count of the rest.
    pub fn brief(&self) -> String {
        let Some(first) = self.children.first() else {
            return self.pos.to_string();
        };
        let mut out = String::new();
        self.render_child(first, &mut out, true);
        if self.children.len() > 1 {
            out.push_str(&format!(" (and {} more)", self.children.len() - 1));
        }
        out
    }

    fn render_child(&self, child: &Diag, out: &mut String, provenance: bool) {
        match child {
            Diag::Leaf(msg) => {
                if self.pos.is_valid() || !self.pos.filename.is_empty() {
                    out.push_str(&format!("{}: {msg}", self.pos));
                } else {
                    out.push_str(msg);
                }
            }
            Diag::Node(e) => {
                out.push_str(&e.to_string());
                if provenance && e.pos != self.pos && self.pos.is_valid() {
                    out.push_str(&format!("\n{}: ...from here", self.pos));
                }
            }
        }
    }
}

/// Single-child chains collapse to the child's rendering; several children
/// render one per line, followed by a provenance line for this node when
/// its position is known.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        match self.children.as_slice() {
            [] => out.push_str(&self.pos.to_string()),
            [only] => self.render_child(only, &mut out, true),
            many => {
                for (i, child) in many.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    self.render_child(child, &mut out, false);
                }
                if self.pos.is_valid() && !self.pos.filename.is_empty() {
                    out.push_str(&format!("\n{}: ...from here", self.pos));
                }
            }
        }
        f.write_str(&out)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
