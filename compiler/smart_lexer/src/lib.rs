//! Scanner for the smart build language.
//!
//! Converts source bytes into classified tokens for the parser. The scanner
//! is a single-pass state machine over a stack of lexical contexts: plain
//! code, recipe lines, `"` strings with embedded `$`/`&` references, and
//! call argument regions. It never backtracks and never stops on an error.
//!
//! ```text
//! let mut errors = Errors::new();
//! let mut file = SourceFile::new("build.smart", src.len() as u32);
//! let mut scanner = Scanner::new(&mut file, src, Some(Box::new(errors.handler())), Mode::empty())?;
//! loop {
//!     let (pos, tok, lit) = scanner.scan();
//!     if tok == Token::Eof { break; }
//! }
//! ```

mod context;
mod mode;
mod scanner;

pub use context::{Context, ContextStack};
pub use mode::Mode;
pub use scanner::{ErrorHandler, InitError, Scanner, Tokens};

use smart_diagnostic::Errors;
use smart_ir::{Pos, SourceFile, Token};

/// A scanned token with an owned literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub pos: Pos,
    pub tok: Token,
    pub lit: String,
}

/// Scan a whole source, collecting tokens (without `Eof`) and errors.
///
/// Positions are relative to a standalone file with base 1.
pub fn tokenize(name: &str, src: &[u8], mode: Mode) -> Result<(Vec<Lexeme>, Errors), InitError> {
    let size = u32::try_from(src.len()).map_err(|_| InitError::SizeMismatch {
        file_size: u32::MAX,
        source_len: src.len(),
    })?;
    let mut file = SourceFile::new(name, size);
    let mut errors = Errors::new();
    let lexemes = {
        let mut scanner = Scanner::new(&mut file, src, Some(Box::new(errors.handler())), mode)?;
        scanner
            .tokens()
            .map(|(pos, tok, lit)| Lexeme {
                pos,
                tok,
                lit: lit.into_owned(),
            })
            .collect()
    };
    Ok((lexemes, errors))
}
