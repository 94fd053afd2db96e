//! Numeric literals.

use smart_ir::Token;

use super::Scanner;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    /// Characters consumed as part of the mantissa.
    fn accepts(self, c: char) -> bool {
        match self {
            Radix::Hex => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        }
    }

    /// Consumed but not valid in this radix.
    fn rejects(self, c: char) -> bool {
        match self {
            Radix::Binary => c > '1',
            Radix::Octal => c > '7',
            Radix::Decimal | Radix::Hex => false,
        }
    }
}

#[derive(Default)]
struct Digits {
    any: bool,
    /// Offset of the first digit outside the radix.
    invalid: Option<usize>,
}

impl Scanner<'_> {
    /// Number starting at the current digit. `start` points at a leading
    /// `-` when the literal is negative.
    pub(super) fn scan_number(&mut self, start: usize) -> Token {
        if self.ch == Some('0') {
            match self.peek() {
                Some(b'b' | b'B') => {
                    self.advance();
                    self.advance();
                    let digits = self.scan_digits(Radix::Binary);
                    if !digits.any {
                        self.error(start, "binary literal has no digits");
                    } else if let Some(offset) = digits.invalid {
                        self.error(offset, "invalid digit in binary literal");
                    }
                    return Token::Bin;
                }
                Some(b'x' | b'X') => {
                    self.advance();
                    self.advance();
                    if !self.scan_digits(Radix::Hex).any {
                        self.error(start, "hexadecimal literal has no digits");
                    }
                    return Token::Hex;
                }
                _ => {}
            }
            self.advance();
            let digits = self.scan_digits(Radix::Octal);
            if self.at_fraction() || self.at_exponent() {
                self.scan_fraction_and_exponent();
                return Token::Float;
            }
            // `0…i` is read as decimal.
            if self.ch == Some('i') || !digits.any {
                return Token::Int;
            }
            if let Some(offset) = digits.invalid {
                self.error(offset, "illegal octal number");
                return Token::Int;
            }
            return Token::Oct;
        }

        self.scan_digits(Radix::Decimal);
        if self.at_fraction() || self.at_exponent() {
            self.scan_fraction_and_exponent();
            return Token::Float;
        }
        Token::Int
    }

    /// A `.` starts a fraction only when a digit follows, so `1.o` stays
    /// `INT DOT BAREWORD`.
    fn at_fraction(&self) -> bool {
        self.ch == Some('.') && self.peek().is_some_and(|b| b.is_ascii_digit())
    }

    fn at_exponent(&self) -> bool {
        if !matches!(self.ch, Some('e' | 'E')) {
            return false;
        }
        match self.peek() {
            Some(b'+' | b'-') => self.peek_at(1).is_some_and(|b| b.is_ascii_digit()),
            Some(b) => b.is_ascii_digit(),
            None => false,
        }
    }

    fn scan_fraction_and_exponent(&mut self) {
        if self.at_fraction() {
            self.advance();
            self.scan_digits(Radix::Decimal);
        }
        if self.at_exponent() {
            self.advance();
            if matches!(self.ch, Some('+' | '-')) {
                self.advance();
            }
            self.scan_digits(Radix::Decimal);
        }
    }

    /// Mantissa with `_` separators.
    fn scan_digits(&mut self, radix: Radix) -> Digits {
        let mut digits = Digits::default();
        let mut underscore: Option<usize> = None;
        loop {
            match self.ch {
                Some('_') => {
                    if underscore.is_some() {
                        self.error(self.offset, "'_' must separate successive digits");
                    }
                    underscore = Some(self.offset);
                }
                Some(c) if radix.accepts(c) => {
                    if radix.rejects(c) && digits.invalid.is_none() {
                        digits.invalid = Some(self.offset);
                    }
                    digits.any = true;
                    underscore = None;
                }
                _ => break,
            }
            self.advance();
        }
        if let Some(offset) = underscore {
            self.error(offset, "'_' must separate successive digits");
        }
        digits
    }
}
