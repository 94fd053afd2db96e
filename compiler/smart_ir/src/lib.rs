//! Core types shared by the smart build language front end.
//!
//! - [`Token`]: the ordinal token model and keyword table
//! - [`Pos`], [`Position`], [`SourceFile`], [`FileSet`]: position bookkeeping

mod source;
mod token;

pub use source::{FileId, FileSet, Pos, Position, SourceFile};
pub use token::Token;
