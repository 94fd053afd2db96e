//! Lexical contexts.
//!
//! The scanner interprets the same byte differently depending on where it
//! is: plain code, a recipe line, a double-quoted string, or the argument
//! region of a `$`/`&` call. The active interpretation is a [`Context`]
//! bitset; entering a nested construct pushes the current set onto a
//! [`ContextStack`] and leaving it pops the saved set back.

use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    /// Lexical context bits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Context: u16 {
        // === Nested constructs ===

        /// Inside a recipe or backslash-continued line.
        const COMPOUND_LINE = 1 << 0;
        /// Inside a `"` string.
        const COMPOUND_STRING = 1 << 1;
        /// Call arguments delimited by `( )`.
        const CALL_PAREN = 1 << 2;
        /// Call arguments delimited by `{ }`.
        const CALL_BRACE = 1 << 3;
        /// Left part of a colon-delimited call or a bracketed rule header.
        const CALL_COLON_L = 1 << 4;
        /// Right part of a colon-delimited call.
        const CALL_COLON_R = 1 << 5;
        /// Call on a bare identifier: `$name`.
        const CALL_IDENT = 1 << 6;
        /// Parenthesized group not introduced by a sigil, or braces nested
        /// inside a call.
        const COMPOUND_GROUP = 1 << 7;
        /// The open string is `"""`-delimited.
        const TRIPLE_QUOTE = 1 << 8;

        // === Line state ===

        /// Nothing but the line break has been scanned on this line.
        const FIRST_OF_LINE = 1 << 9;
        /// Leading tabs open recipes (set by the consumer).
        const CAN_BE_RECIPES = 1 << 10;
        /// Leading tabs open recipes (set after a rule header).
        const CAN_BE_RECIPE_TAB = 1 << 11;
        /// `#` does not start a comment.
        const COMMENTS_OFF = 1 << 12;
    }
}

impl Context {
    /// Any call-argument region.
    pub const CALL: Self = Self::CALL_PAREN
        .union(Self::CALL_BRACE)
        .union(Self::CALL_COLON_L)
        .union(Self::CALL_COLON_R)
        .union(Self::CALL_IDENT);

    pub const CALL_COLON: Self = Self::CALL_COLON_L.union(Self::CALL_COLON_R);

    /// Bits that only appear after a push.
    pub const NESTED: Self = Self::CALL
        .union(Self::COMPOUND_GROUP)
        .union(Self::COMPOUND_STRING)
        .union(Self::COMPOUND_LINE)
        .union(Self::TRIPLE_QUOTE);

    /// Bits carried into every nested context.
    pub const INHERITED: Self = Self::CAN_BE_RECIPES.union(Self::COMMENTS_OFF);
}

/// Current context plus the saved contexts of enclosing constructs.
#[derive(Clone, Debug, Default)]
pub struct ContextStack {
    current: Context,
    saved: SmallVec<[Context; 8]>,
}

impl ContextStack {
    pub fn new(initial: Context) -> Self {
        ContextStack {
            current: initial,
            saved: SmallVec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> Context {
        self.current
    }

    /// Number of enclosing contexts.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Context that the next pop restores.
    #[inline]
    pub fn peek(&self) -> Option<Context> {
        self.saved.last().copied()
    }

    #[inline]
    pub fn contains(&self, bits: Context) -> bool {
        self.current.contains(bits)
    }

    #[inline]
    pub fn intersects(&self, bits: Context) -> bool {
        self.current.intersects(bits)
    }

    #[inline]
    pub fn insert(&mut self, bits: Context) {
        self.current.insert(bits);
    }

    #[inline]
    pub fn remove(&mut self, bits: Context) {
        self.current.remove(bits);
    }

    /// Swap bits in place without changing the depth.
    pub fn replace(&mut self, from: Context, to: Context) {
        self.current.remove(from);
        self.current.insert(to);
    }

    /// Set or clear inherited bits on every level.
    pub fn set_inherited(&mut self, bits: Context, on: bool) {
        let bits = bits & Context::INHERITED;
        for ctx in self.saved.iter_mut().chain(std::iter::once(&mut self.current)) {
            ctx.set(bits, on);
        }
    }

    /// Enter a nested construct.
    pub fn push(&mut self, bits: Context) {
        self.saved.push(self.current);
        self.current = (self.current & Context::INHERITED) | bits;
        tracing::trace!(?bits, depth = self.saved.len(), "context push");
    }

    /// Leave the construct marked by `bits`.
    ///
    /// A no-op returning `false` when none of `bits` is set, so unbalanced
    /// input cannot pop an unrelated context.
    pub fn pop(&mut self, bits: Context) -> bool {
        if !self.current.intersects(bits) {
            return false;
        }
        let left = self.current;
        self.current = match self.saved.pop() {
            Some(ctx) => ctx,
            None => left - Context::NESTED,
        };
        tracing::trace!(?left, depth = self.saved.len(), "context pop");
        true
    }
}

#[cfg(test)]
mod tests;
