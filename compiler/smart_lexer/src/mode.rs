//! Scanner mode flags.

use bitflags::bitflags;

bitflags! {
    /// Options fixed when a scanner is created.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Mode: u8 {
        /// `#` is returned as a single-character `Hash` token instead of
        /// starting a comment.
        const SUPPRESS_COMMENTS = 1 << 0;
        /// Comments are returned as `Comment` tokens instead of being
        /// discarded. Ignored together with `SUPPRESS_COMMENTS`.
        const SCAN_COMMENTS = 1 << 1;
    }
}
