//! Collection of diagnostic trees.
//!
//! Features:
//! - Merging of diagnostics rooted at the same position
//! - A cap on the number of entries, dropping the oldest
//! - Sorting by file, line, column and message
//! - Collapsing several diagnostics on one line to the first

use std::cmp::Ordering;
use std::fmt;

use smart_ir::Position;

use crate::error::{Error, DEFAULT_LIMIT};

/// Configuration for diagnostic aggregation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct AggregateConfig {
    /// Maximum number of entries kept, per collection and per tree node
    /// (0 = unlimited). The oldest entries are dropped first.
    pub limit: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        AggregateConfig {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl AggregateConfig {
    /// A config with no limit (for testing).
    pub fn unlimited() -> Self {
        AggregateConfig { limit: 0 }
    }
}

/// Insertion-ordered list of diagnostic roots.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Errors {
    list: Vec<Error>,
    config: AggregateConfig,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AggregateConfig) -> Self {
        Errors {
            list: Vec::new(),
            config,
        }
    }

    /// Append a single-leaf diagnostic.
    pub fn add(&mut self, pos: Position, msg: impl Into<String>) {
        self.list.push(Error::new(pos, msg));
        self.truncate_oldest();
    }

    /// Merge diagnostic trees into the collection.
    ///
    /// A tree rooted at the same position as an existing entry is merged into
    /// that entry, so merging the same diagnostic twice keeps one entry.
    pub fn merge<I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = Error>,
    {
        for err in errors {
            if let Some(existing) = self.list.iter_mut().find(|e| e.pos == err.pos) {
                existing.merge_with_limit(err.children, self.config.limit);
            } else {
                self.list.push(err);
            }
            self.truncate_oldest();
        }
    }

    fn truncate_oldest(&mut self) {
        let limit = self.config.limit;
        if limit > 0 && self.list.len() > limit {
            let dropped = self.list.len() - limit;
            tracing::debug!(dropped, limit, "diagnostics truncated");
            self.list.drain(..dropped);
        }
    }

    /// Callback that records every reported diagnostic into `self`.
    ///
    /// Matches the scanner's error handler signature.
    pub fn handler(&mut self) -> impl FnMut(&Position, &str) + '_ {
        move |pos, msg| self.add(pos.clone(), msg)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn reset(&mut self) {
        self.list.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.list.iter()
    }

    /// Sort by filename, line, column, leaf-only before trees, then first
    /// message. The sort is stable.
    pub fn sort(&mut self) {
        self.list.sort_by(compare);
    }

    /// Sort, then keep only the first diagnostic per `(filename, line)`.
    pub fn remove_multiples(&mut self) {
        self.sort();
        self.list
            .dedup_by(|b, a| a.pos.filename == b.pos.filename && a.pos.line == b.pos.line);
    }

    /// `Ok` when no diagnostics were recorded.
    pub fn err(&self) -> Result<(), &Errors> {
        if self.list.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn compare(a: &Error, b: &Error) -> Ordering {
    a.pos
        .filename
        .cmp(&b.pos.filename)
        .then(a.pos.line.cmp(&b.pos.line))
        .then(a.pos.column.cmp(&b.pos.column))
        .then(a.is_tree().cmp(&b.is_tree()))
        .then_with(|| a.first_message().cmp(&b.first_message()))
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.list.as_slice() {
            [] => f.write_str("no errors"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more errors)", rest.len()),
        }
    }
}

impl std::error::Error for Errors {}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

#[cfg(test)]
mod tests;
