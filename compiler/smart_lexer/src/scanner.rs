//! Context-sensitive scanner.
//!
//! One call to [`Scanner::scan`] yields one token. Which bytes form a token
//! depends on the active [`Context`]: inside a recipe line or a `"` string
//! most characters are raw text, inside call arguments they are ordinary
//! code. Nested constructs push a context and pop it when they close.
//!
//! Errors never stop the scanner. Each one goes to the optional handler and
//! bumps [`Scanner::error_count`]; the offending token is still returned.

mod datetime;
mod escape;
mod number;
mod strings;

use std::borrow::Cow;

use smart_ir::{Pos, Position, SourceFile, Token};

use crate::context::{Context, ContextStack};
use crate::mode::Mode;

/// Callback receiving every scan error.
pub type ErrorHandler<'a> = Box<dyn FnMut(&Position, &str) + 'a>;

const BOM: char = '\u{FEFF}';

/// Scanner initialization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("file size ({file_size}) does not match source length ({source_len})")]
    SizeMismatch { file_size: u32, source_len: usize },
}

/// Scanner over one source file.
///
/// Registers line starts in the file as it advances, so positions of
/// already-scanned text resolve to lines and columns.
pub struct Scanner<'a> {
    file: &'a mut SourceFile,
    src: &'a [u8],
    err: Option<ErrorHandler<'a>>,
    mode: Mode,

    // ─── Cursor ───
    /// Current character, `None` at EOF.
    ch: Option<char>,
    /// Byte offset of `ch`.
    offset: usize,
    /// Byte offset after `ch`.
    rd_offset: usize,

    // ─── Context ───
    ctx: ContextStack,
    /// The last sigil pushed a call whose opening delimiter is next.
    delim_pending: bool,

    error_count: usize,
}

impl<'a> Scanner<'a> {
    /// Prepare to scan `src`, whose length must equal the file's size.
    ///
    /// A leading byte order mark is skipped.
    #[tracing::instrument(level = "debug", skip_all, fields(file = file.name(), len = src.len()))]
    pub fn new(
        file: &'a mut SourceFile,
        src: &'a [u8],
        err: Option<ErrorHandler<'a>>,
        mode: Mode,
    ) -> Result<Self, InitError> {
        if file.size() as usize != src.len() {
            return Err(InitError::SizeMismatch {
                file_size: file.size(),
                source_len: src.len(),
            });
        }
        let mut initial = Context::FIRST_OF_LINE;
        if mode.contains(Mode::SUPPRESS_COMMENTS) {
            initial |= Context::COMMENTS_OFF;
        }
        let mut scanner = Scanner {
            file,
            src,
            err,
            mode,
            ch: Some(' '),
            offset: 0,
            rd_offset: 0,
            ctx: ContextStack::new(initial),
            delim_pending: false,
            error_count: 0,
        };
        scanner.advance();
        if scanner.ch == Some(BOM) {
            scanner.advance();
        }
        Ok(scanner)
    }

    /// Allow or forbid leading tabs to open recipe lines anywhere.
    ///
    /// Without this, a tab opens a recipe only on lines following a rule
    /// header.
    pub fn set_recipes(&mut self, on: bool) {
        self.ctx.set_inherited(Context::CAN_BE_RECIPES, on);
    }

    /// Active context bits.
    #[inline]
    pub fn context(&self) -> Context {
        self.ctx.current()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of errors reported so far.
    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Resolve a position handle of this file.
    pub fn position(&self, pos: Pos) -> Position {
        self.file.position(pos)
    }

    // ─── Cursor ───

    /// Move to the next character, decoding UTF-8 and registering line
    /// starts.
    fn advance(&mut self) {
        if self.ch == Some('\n') {
            self.file.add_line(to_u32(self.rd_offset));
        }
        let Some(&b) = self.src.get(self.rd_offset) else {
            self.offset = self.src.len();
            self.ch = None;
            return;
        };
        self.offset = self.rd_offset;
        if b < 0x80 {
            if b == 0 {
                self.error(self.offset, "illegal character NUL");
            }
            self.rd_offset += 1;
            self.ch = Some(char::from(b));
            return;
        }
        let width = utf8_char_width(b);
        let end = (self.offset + width).min(self.src.len());
        let decoded = std::str::from_utf8(&self.src[self.offset..end])
            .ok()
            .and_then(|s| s.chars().next());
        match decoded {
            Some(c) => {
                if c == BOM && self.offset > 0 {
                    self.error(self.offset, "illegal byte order mark");
                }
                self.rd_offset = end;
                self.ch = Some(c);
            }
            None => {
                self.error(self.offset, "illegal UTF-8 encoding");
                self.rd_offset += 1;
                self.ch = Some(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    /// Byte after the current character.
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.get(self.rd_offset).copied()
    }

    /// Byte `n` positions after [`Self::peek`].
    #[inline]
    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.rd_offset + n).copied()
    }

    /// Consume the current character if it is `c`.
    fn eat(&mut self, c: char) -> bool {
        if self.ch == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Jump to the next newline (or EOF) without consuming it.
    fn skip_to_newline(&mut self) {
        if matches!(self.ch, None | Some('\n')) {
            return;
        }
        let rest = &self.src[self.offset..];
        self.rd_offset = match memchr::memchr(b'\n', rest) {
            Some(i) => self.offset + i,
            None => self.src.len(),
        };
        // No newline was crossed, so no line start to register.
        self.ch = None;
        self.advance();
    }

    /// Source text from `start` to the current offset.
    fn lit(&self, start: usize) -> Cow<'a, str> {
        let src: &'a [u8] = self.src;
        String::from_utf8_lossy(&src[start..self.offset])
    }

    fn error(&mut self, offset: usize, msg: &str) {
        let pos = self.file.position(self.file.pos(to_u32(offset)));
        tracing::debug!(%pos, msg, "scan error");
        if let Some(handler) = self.err.as_mut() {
            handler(&pos, msg);
        }
        self.error_count += 1;
    }

    // ─── Tokens ───

    /// Scan the next token and return its position, kind and literal.
    ///
    /// Literals borrow from the source when it is valid UTF-8. At end of
    /// input `Eof` is returned with an empty literal, repeatedly.
    pub fn scan(&mut self) -> (Pos, Token, Cow<'a, str>) {
        loop {
            if let Some((start, tok, lit)) = self.scan_token() {
                if tok == Token::Linend {
                    self.ctx.insert(Context::FIRST_OF_LINE);
                } else {
                    self.ctx.remove(Context::FIRST_OF_LINE);
                }
                return (self.file.pos(to_u32(start)), tok, lit);
            }
        }
    }

    /// One scanning step; `None` when only skipped text was consumed.
    fn scan_token(&mut self) -> Option<(usize, Token, Cow<'a, str>)> {
        if self.ctx.contains(Context::CALL_IDENT) && !self.ch.is_some_and(is_letter) {
            self.ctx.pop(Context::CALL_IDENT);
        }

        let start = self.offset;
        let Some(ch) = self.ch else {
            self.close_at_eof();
            return Some((start, Token::Eof, Cow::Borrowed("")));
        };

        let current = self.ctx.current();
        if current.contains(Context::COMPOUND_LINE) {
            return self.scan_compound_line();
        }
        if current.contains(Context::COMPOUND_STRING) {
            return self.scan_compound_string();
        }
        if current.contains(Context::FIRST_OF_LINE)
            && !current.intersects(Context::NESTED)
            && !matches!(ch, '\t' | '\n' | '#')
        {
            self.ctx.remove(Context::CAN_BE_RECIPE_TAB);
        }

        if is_letter(ch) {
            let tok = self.scan_identifier();
            return Some((start, tok, self.lit(start)));
        }
        if ch.is_ascii_digit() {
            let tok = match self.scan_temporal() {
                Some(tok) => tok,
                None => self.scan_number(start),
            };
            return Some((start, tok, self.lit(start)));
        }

        let recipe_tab = self.recipe_tab_allowed();
        self.advance();
        let tok = match ch {
            '\t' if recipe_tab => {
                self.ctx.push(Context::COMPOUND_LINE);
                let text = self.offset;
                self.scan_text(|c| matches!(c, '\\' | '$' | '&' | '\n'));
                return Some((start, Token::Recipe, self.lit(text)));
            }
            ' ' | '\t' | '\r' => {
                while matches!(self.ch, Some(' ' | '\t' | '\r')) {
                    self.advance();
                }
                Token::Space
            }
            '\n' => {
                if self.ctx.intersects(Context::CALL_COLON) {
                    self.error(start, "colon call not terminated");
                    self.ctx.pop(Context::CALL_COLON);
                }
                Token::Linend
            }
            '#' => {
                if self.ctx.contains(Context::COMMENTS_OFF) {
                    Token::Hash
                } else {
                    self.skip_to_newline();
                    if !self.mode.contains(Mode::SCAN_COMMENTS) {
                        return None;
                    }
                    Token::Comment
                }
            }
            '\\' => {
                if self.eat('\n') {
                    // Line continuation.
                    return None;
                }
                Token::Backslash
            }
            '\'' => self.scan_raw_string(start),
            '"' => self.open_compound_string(),
            '$' | '&' => self.scan_sigil(ch),
            ':' => self.scan_colon(),
            '-' => match self.ch {
                Some('-') => {
                    self.advance();
                    Token::Minus2
                }
                Some('>') => {
                    self.advance();
                    Token::Arrow
                }
                Some('+') => {
                    self.advance();
                    if self.eat('=') {
                        Token::SubPlusAssign
                    } else {
                        Token::MinusPlus
                    }
                }
                Some('=') => {
                    self.advance();
                    if self.eat('+') {
                        Token::SubAssignPlus
                    } else {
                        Token::SubAssign
                    }
                }
                Some(d) if d.is_ascii_digit() => self.scan_number(start),
                _ => Token::Minus,
            },
            '+' => self.switch('=', Token::AddAssign, Token::Plus),
            '!' => self.switch('=', Token::ExcAssign, Token::Exc),
            '?' => self.switch('=', Token::QueAssign, Token::Question),
            '~' => self.switch('>', Token::TildeArrow, Token::Tilde),
            '.' => self.switch('.', Token::DotDot, Token::Dot),
            '=' => match self.ch {
                Some('>') => {
                    self.advance();
                    Token::FatArrow
                }
                Some('+') => {
                    self.advance();
                    Token::AssignPlus
                }
                _ => Token::Assign,
            },
            '@' => Token::At,
            '|' => Token::Bar,
            '%' => Token::Percent,
            '*' => Token::Star,
            '/' => Token::Pcon,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '[' => Token::LBrack,
            ']' => {
                if self.ch == Some(':') && self.ctx.intersects(Context::CALL_COLON) {
                    self.advance();
                    self.ctx.pop(Context::CALL_COLON);
                    self.rule_delim();
                    Token::ColonRbk
                } else {
                    Token::RBrack
                }
            }
            '(' => {
                if self.delim_pending && self.ctx.contains(Context::CALL_PAREN) {
                    self.delim_pending = false;
                } else {
                    self.ctx.push(Context::COMPOUND_GROUP);
                }
                Token::LParen
            }
            ')' => {
                self.ctx.pop(Context::CALL_PAREN | Context::COMPOUND_GROUP);
                Token::RParen
            }
            '{' => {
                if self.delim_pending && self.ctx.contains(Context::CALL_BRACE) {
                    self.delim_pending = false;
                } else if self.ctx.intersects(Context::CALL) {
                    self.ctx.push(Context::COMPOUND_GROUP);
                }
                Token::LBrace
            }
            '}' => {
                self.ctx.pop(Context::CALL_BRACE | Context::COMPOUND_GROUP);
                Token::RBrace
            }
            _ => {
                // NUL, bad encodings and stray BOMs were reported on advance.
                if !matches!(ch, '\0' | char::REPLACEMENT_CHARACTER | BOM) {
                    self.error(
                        start,
                        &format!("illegal character U+{:04X} '{ch}'", u32::from(ch)),
                    );
                }
                Token::Illegal
            }
        };

        let keeps_text =
            tok.is_literal() || matches!(tok, Token::Space | Token::Comment | Token::Illegal);
        let lit = if keeps_text {
            self.lit(start)
        } else {
            Cow::Borrowed("")
        };
        Some((start, tok, lit))
    }

    /// `yes` if the current character is `c` (consumed), else `no`.
    fn switch(&mut self, c: char, yes: Token, no: Token) -> Token {
        if self.eat(c) {
            yes
        } else {
            no
        }
    }

    /// Identifier, keyword or bareword starting at the current letter.
    fn scan_identifier(&mut self) -> Token {
        let start = self.offset;
        let mut chars = 0usize;
        while let Some(c) = self.ch {
            let part = match c {
                '-' => self.peek() != Some(b'>'),
                '+' | '@' => true,
                _ => is_letter(c) || is_digit(c),
            };
            if !part {
                break;
            }
            chars += 1;
            self.advance();
        }
        self.ctx.pop(Context::CALL_IDENT);
        if chars == 1 {
            return Token::Bareword;
        }
        let tok = Token::lookup(&self.lit(start));
        if tok != Token::Bareword && !tok.is_keyword() {
            self.error(start, &format!("unexpected token {tok}"));
        }
        tok
    }

    /// Sigil `$` or `&` (consumed): a closure/delegate with a special
    /// suffix, or the head of a call whose argument context is pushed here.
    fn scan_sigil(&mut self, sigil: char) -> Token {
        let suffix = self
            .ch
            .and_then(|c| u8::try_from(c).ok())
            .and_then(Token::closure_suffix);
        let closure = if let Some(tok) = suffix {
            self.advance();
            tok
        } else {
            let (bits, pending) = match self.ch {
                Some('(') => (Context::CALL_PAREN, true),
                Some('{') => (Context::CALL_BRACE, true),
                Some(':') => (Context::CALL_COLON_L, true),
                _ => (Context::CALL_IDENT, false),
            };
            self.ctx.push(bits);
            self.delim_pending = pending;
            Token::Closure
        };
        if sigil == '$' {
            closure.to_delegate().unwrap_or(Token::Delegate)
        } else {
            closure
        }
    }

    /// `:` (consumed) and the operators starting with it.
    fn scan_colon(&mut self) -> Token {
        if self.ctx.contains(Context::CALL_COLON_L) {
            // `$:`'s opening colon keeps the left state; the next one
            // separates name from arguments.
            if self.delim_pending {
                self.delim_pending = false;
            } else {
                self.ctx
                    .replace(Context::CALL_COLON_L, Context::CALL_COLON_R);
            }
            return Token::Colon;
        }
        if self.ctx.contains(Context::CALL_COLON_R) {
            self.ctx.pop(Context::CALL_COLON_R);
            return Token::Colon;
        }
        match self.ch {
            Some('=') => {
                self.advance();
                Token::ScoAssign
            }
            Some(':') => {
                self.advance();
                if self.eat('=') {
                    Token::DcoAssign
                } else {
                    self.rule_delim();
                    Token::Colon2
                }
            }
            Some('[') => {
                self.advance();
                self.ctx.push(Context::CALL_COLON_L);
                Token::ColonLbk
            }
            Some(c @ ('!' | '?')) if self.peek() == Some(b'[') => {
                self.advance();
                self.advance();
                self.ctx.push(Context::CALL_COLON_L);
                if c == '!' {
                    Token::ColonExcLbk
                } else {
                    Token::ColonQueLbk
                }
            }
            _ => {
                self.rule_delim();
                Token::Colon
            }
        }
    }

    /// A top-level rule delimiter lets the following lines open recipes.
    fn rule_delim(&mut self) {
        if !self.ctx.intersects(Context::NESTED) {
            self.ctx.insert(Context::CAN_BE_RECIPE_TAB);
        }
    }

    fn recipe_tab_allowed(&self) -> bool {
        let ctx = self.ctx.current();
        ctx.contains(Context::FIRST_OF_LINE)
            && !ctx.intersects(Context::NESTED)
            && ctx.intersects(Context::CAN_BE_RECIPES | Context::CAN_BE_RECIPE_TAB)
    }

    /// Consume characters up to the first one matching `stop`, or EOF.
    fn scan_text(&mut self, stop: impl Fn(char) -> bool) {
        while let Some(c) = self.ch {
            if stop(c) {
                break;
            }
            self.advance();
        }
    }

    /// Iterate over the remaining tokens, stopping before `Eof`.
    pub fn tokens(&mut self) -> Tokens<'_, 'a> {
        Tokens { scanner: self }
    }

    /// Unwind contexts left open at end of input.
    fn close_at_eof(&mut self) {
        while self.ctx.depth() > 0 {
            if self.ctx.contains(Context::COMPOUND_STRING) {
                self.error(self.offset, "string literal not terminated");
            }
            let open = self.ctx.current() & Context::NESTED;
            if !self.ctx.pop(open) {
                break;
            }
        }
    }
}

/// Token iterator over a borrowed [`Scanner`], from [`Scanner::tokens`].
///
/// Scans until `Eof`, which is not yielded.
pub struct Tokens<'s, 'a> {
    scanner: &'s mut Scanner<'a>,
}

impl<'a> Iterator for Tokens<'_, 'a> {
    type Item = (Pos, Token, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.scanner.scan();
        (item.1 != Token::Eof).then_some(item)
    }
}

#[inline]
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

#[inline]
fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || (!c.is_ascii() && c.is_numeric())
}

/// Width of a UTF-8 sequence from its leading byte; 1 for invalid leads.
#[inline]
fn utf8_char_width(first: u8) -> usize {
    match first {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

#[inline]
fn to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
