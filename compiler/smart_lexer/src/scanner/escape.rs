//! Backslash escapes in `"` strings.
//!
//! ```text
//! \a \b \f \n \r \t \v \\ \$ \"     single character
//! \ooo                               1-3 octal digits, at most 255
//! \xhh                               exactly 2 hex digits
//! \uhhhh  \Uhhhhhhhh                 Unicode scalar value
//! \<newline>                         line continuation
//! ```

use super::Scanner;

pub(super) enum Escape {
    Valid,
    /// Backslash-newline: consumed, produces no token.
    Continuation,
    /// Reported; the scanner emits `Illegal`.
    Invalid,
}

impl Scanner<'_> {
    /// Escape after a consumed backslash.
    pub(super) fn scan_escape(&mut self, quote: char) -> Escape {
        let offset = self.offset;
        let (len, radix, max): (usize, u32, u32) = match self.ch {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '$') => {
                self.advance();
                return Escape::Valid;
            }
            Some(c) if c == quote => {
                self.advance();
                return Escape::Valid;
            }
            Some('\n') => {
                self.advance();
                return Escape::Continuation;
            }
            Some('0'..='7') => (3, 8, 255),
            Some('x') => {
                self.advance();
                (2, 16, 255)
            }
            Some('u') => {
                self.advance();
                (4, 16, u32::from(char::MAX))
            }
            Some('U') => {
                self.advance();
                (8, 16, u32::from(char::MAX))
            }
            Some(_) => {
                self.error(offset, "unknown escape sequence");
                return Escape::Invalid;
            }
            None => {
                self.error(offset, "escape sequence not terminated");
                return Escape::Invalid;
            }
        };

        let mut value: u32 = 0;
        let mut n = 0;
        while n < len {
            let Some(d) = self.ch.and_then(|c| c.to_digit(radix)) else {
                break;
            };
            value = value * radix + d;
            self.advance();
            n += 1;
        }
        // Octal takes 1-3 digits; hex forms need all of theirs.
        if n == 0 || (radix == 16 && n < len) {
            let msg = if self.ch.is_some() {
                "illegal character in escape sequence"
            } else {
                "escape sequence not terminated"
            };
            self.error(self.offset, msg);
            return Escape::Invalid;
        }
        if value > max || (0xD800..0xE000).contains(&value) {
            self.error(offset, "escape sequence is invalid Unicode code point");
            return Escape::Invalid;
        }
        Escape::Valid
    }
}
