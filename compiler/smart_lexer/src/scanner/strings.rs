//! Quoted strings and the text of compound contexts.
//!
//! A `'` string is a single `String` token. A `"` string opens a compound
//! context in which the scanner returns `Raw` text runs, `Escape` tokens and
//! embedded calls until the closing quote yields `Composed`. Recipe lines
//! work the same way, ending at the line break.

use std::borrow::Cow;

use smart_ir::Token;

use super::escape::Escape;
use super::Scanner;
use crate::context::Context;

type Scanned<'a> = Option<(usize, Token, Cow<'a, str>)>;

impl<'a> Scanner<'a> {
    /// `'…'` or `'''…'''` after the consumed opening quote.
    pub(super) fn scan_raw_string(&mut self, start: usize) -> Token {
        if self.ch == Some('\'') {
            self.advance();
            if self.ch != Some('\'') {
                // Empty string.
                return Token::String;
            }
            self.advance();
            loop {
                match self.ch {
                    None => {
                        self.error(start, "raw string literal not terminated");
                        break;
                    }
                    Some('\'') if self.peek() == Some(b'\'') && self.peek_at(1) == Some(b'\'') => {
                        self.advance();
                        self.advance();
                        self.advance();
                        break;
                    }
                    Some(_) => self.advance(),
                }
            }
            return Token::String;
        }
        loop {
            match self.ch {
                Some('\'') => {
                    self.advance();
                    break;
                }
                None | Some('\n') => {
                    self.error(start, "raw string literal not terminated");
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.eat('\'');
                }
                Some(_) => self.advance(),
            }
        }
        Token::String
    }

    /// `"` or `"""` after the consumed first quote.
    pub(super) fn open_compound_string(&mut self) -> Token {
        if self.ch == Some('"') && self.peek() == Some(b'"') {
            self.advance();
            self.advance();
            self.ctx
                .push(Context::COMPOUND_STRING | Context::TRIPLE_QUOTE);
        } else {
            self.ctx.push(Context::COMPOUND_STRING);
        }
        Token::Compound
    }

    /// One step inside a `"` string.
    pub(super) fn scan_compound_string(&mut self) -> Scanned<'a> {
        let start = self.offset;
        let triple = self.ctx.contains(Context::TRIPLE_QUOTE);
        match self.ch {
            Some('"') => {
                if !triple {
                    self.advance();
                    self.ctx.pop(Context::COMPOUND_STRING);
                    return Some((start, Token::Composed, Cow::Borrowed("")));
                }
                if self.peek() == Some(b'"') && self.peek_at(1) == Some(b'"') {
                    self.advance();
                    self.advance();
                    self.advance();
                    self.ctx.pop(Context::COMPOUND_STRING);
                    return Some((start, Token::Composed, Cow::Borrowed("")));
                }
                // A lone quote inside `"""` is text.
                self.advance();
            }
            Some('\n') if !triple => {
                self.error(start, "string literal not terminated");
                self.advance();
                self.ctx.pop(Context::COMPOUND_STRING);
                return Some((start, Token::Linend, Cow::Borrowed("")));
            }
            Some('\\') => {
                self.advance();
                let text = self.offset;
                return match self.scan_escape('"') {
                    Escape::Valid => Some((start, Token::Escape, self.lit(text))),
                    Escape::Continuation => None,
                    Escape::Invalid => Some((start, Token::Illegal, self.lit(start))),
                };
            }
            Some(sigil @ ('$' | '&')) => return Some(self.sigil_or_raw(sigil)),
            _ => {}
        }
        self.scan_text(|c| matches!(c, '"' | '\\' | '$' | '&') || (c == '\n' && !triple));
        Some((start, Token::Raw, self.lit(start)))
    }

    /// One step inside a recipe line.
    pub(super) fn scan_compound_line(&mut self) -> Scanned<'a> {
        let start = self.offset;
        match self.ch {
            Some('\n') => {
                self.advance();
                self.ctx.pop(Context::COMPOUND_LINE);
                Some((start, Token::Linend, Cow::Borrowed("")))
            }
            Some('\\') => {
                self.advance();
                if self.ch.is_none() {
                    self.error(start, "escape sequence not terminated");
                    return Some((start, Token::Illegal, self.lit(start)));
                }
                let text = self.offset;
                self.advance();
                Some((start, Token::Escape, self.lit(text)))
            }
            Some(sigil @ ('$' | '&')) => Some(self.sigil_or_raw(sigil)),
            _ => {
                self.scan_text(|c| matches!(c, '\\' | '$' | '&' | '\n'));
                Some((start, Token::Raw, self.lit(start)))
            }
        }
    }

    /// A doubled sigil is the literal character; a single one starts a
    /// closure or delegate.
    fn sigil_or_raw(&mut self, sigil: char) -> (usize, Token, Cow<'a, str>) {
        let start = self.offset;
        self.advance();
        if self.eat(sigil) {
            let text = if sigil == '$' { "$" } else { "&" };
            return (start, Token::Raw, Cow::Borrowed(text));
        }
        (start, self.scan_sigil(sigil), Cow::Borrowed(""))
    }
}
