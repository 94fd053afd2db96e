//! Diagnostic aggregation for the smart build language.
//!
//! The scanner reports problems through a callback; callers collect them in
//! an [`Errors`] list, sort it, optionally collapse it to one diagnostic per
//! line, and render it. Diagnostics reached through several places form
//! [`Error`] trees whose children record the provenance chain.
//!
//! ```text
//! let mut errors = Errors::new();
//! let mut scanner = Scanner::new(&mut file, src, Some(Box::new(errors.handler())), Mode::empty())?;
//! // ... scan
//! errors.remove_multiples();
//! ```

mod error;
mod errors;

pub use error::{Diag, Error, DEFAULT_LIMIT};
pub use errors::{AggregateConfig, Errors};
