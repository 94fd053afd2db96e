//! Token kinds for the smart build language.
//!
//! # Layout
//!
//! `Token` is a `#[repr(u8)]` enum whose discriminants are arranged in
//! contiguous ranges. Every family predicate (`is_literal`, `is_closure`,
//! `is_assign`, ...) is a half-open interval test over the discriminant:
//!
//! | Range                       | Category             |
//! |-----------------------------|----------------------|
//! | `Illegal..Bareword`         | Special              |
//! | `Bareword..Space`           | Literals             |
//! | `Space..Colon`              | Operators            |
//! | `Colon..Closure`            | Rule delimiters      |
//! | `Closure..Delegate`         | Closures (21)        |
//! | `Delegate..Assign`          | Delegates (21)       |
//! | `Assign..Project`           | Assignment operators |
//! | `Project..=No`              | Keywords + constants |
//!
//! # Invariant
//!
//! Closures and delegates are declared in exactly parallel order, so a
//! delegate is `closure + (Delegate - Closure)`. New variants must be added
//! inside the range they belong to; [`Token::ALL`] is checked at compile
//! time against the discriminants.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Token {
    // === Special ===
    Illegal,
    Eof,
    Comment,

    // === Literals ===
    /// Identifier: `foo`, `a-b`, `lib+x`
    Bareword,
    /// `0b0101`
    Bin,
    /// `0755`
    Oct,
    /// `123`, `-4`, `10_000`
    Int,
    /// `0xFF`
    Hex,
    /// `1.5`, `2e10`
    Float,
    /// `2021-06-01`
    Date,
    /// `12:30:00`
    Time,
    /// `2021-06-01T12:30:00Z`
    DateTime,
    /// Raw single-quoted string: `'...'`
    String,
    /// Opening `"` of a compound (interpolated) string
    Compound,
    /// Literal text fragment inside a compound string or line
    Raw,
    /// Backslash escape fragment inside a compound string or line
    Escape,
    /// Closing `"` of a compound string
    Composed,
    /// Tab-introduced recipe line
    Recipe,

    // === Operators ===
    // List delimiters come first.
    Space,
    Comma,

    Linend,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Dot,
    DotDot,
    Semicolon,
    At,
    Bar,
    Exc,
    Question,
    Percent,
    /// Unary `+`
    Plus,
    /// Unary `-`
    Minus,
    Minus2,
    /// Property selection `->`
    Arrow,
    MinusPlus,
    /// Path concatenation `/`
    Pcon,
    Backslash,
    Star,
    FatArrow,
    Tilde,
    TildeArrow,
    Hash,

    // === Rule delimiters ===
    Colon,
    Colon2,
    ColonLbk,
    ColonExcLbk,
    ColonQueLbk,
    ColonRbk,

    // === Closures (parallel to delegates) ===
    Closure,
    ClosureSlash,
    ClosureDot,
    ClosureAt,
    ClosureBar,
    ClosureLt,
    ClosureCaret,
    ClosureStar,
    ClosureMinus,
    ClosurePlus,
    ClosureQuestion,
    Closure1,
    Closure2,
    Closure3,
    Closure4,
    Closure5,
    Closure6,
    Closure7,
    Closure8,
    Closure9,
    ClosureUnderscore,

    // === Delegates (parallel to closures) ===
    Delegate,
    DelegateSlash,
    DelegateDot,
    DelegateAt,
    DelegateBar,
    DelegateLt,
    DelegateCaret,
    DelegateStar,
    DelegateMinus,
    DelegatePlus,
    DelegateQuestion,
    Delegate1,
    Delegate2,
    Delegate3,
    Delegate4,
    Delegate5,
    Delegate6,
    Delegate7,
    Delegate8,
    Delegate9,
    DelegateUnderscore,

    // === Assignment operators ===
    Assign,
    AssignPlus,
    AddAssign,
    QueAssign,
    ExcAssign,
    ScoAssign,
    DcoAssign,
    SubAssign,
    SubPlusAssign,
    SubAssignPlus,

    // === Keywords ===
    Project,
    Package,
    Module,
    Configure,
    Configuration,
    Use,
    Eval,
    Export,
    Include,
    Import,
    Instance,
    Files,

    // === Constants ===
    True,
    False,
    Yes,
    No,
}

// Half-open range bounds over the discriminant.
const LITERAL_BEG: u8 = Token::Bareword as u8;
const LITERAL_END: u8 = Token::Space as u8;
const OPERATOR_BEG: u8 = Token::Space as u8;
const OPERATOR_END: u8 = Token::Project as u8;
const LIST_DELIM_BEG: u8 = Token::Space as u8;
const LIST_DELIM_END: u8 = Token::Linend as u8;
const RULE_DELIM_BEG: u8 = Token::Colon as u8;
const RULE_DELIM_END: u8 = Token::Closure as u8;
const CLOSURE_BEG: u8 = Token::Closure as u8;
const CLOSURE_END: u8 = Token::Delegate as u8;
const DELEGATE_BEG: u8 = Token::Delegate as u8;
const DELEGATE_END: u8 = Token::Assign as u8;
const ASSIGN_BEG: u8 = Token::Assign as u8;
const ASSIGN_END: u8 = Token::Project as u8;
const KEYWORD_BEG: u8 = Token::Project as u8;
const KEYWORD_END: u8 = Token::No as u8 + 1;
const CONSTANT_BEG: u8 = Token::True as u8;
const CONSTANT_END: u8 = Token::No as u8 + 1;

/// Distance between a closure and its delegate counterpart.
const DELEGATE_OFFSET: u8 = DELEGATE_BEG - CLOSURE_BEG;

const _: () = assert!(CLOSURE_END - CLOSURE_BEG == 21);
const _: () = assert!(DELEGATE_END - DELEGATE_BEG == CLOSURE_END - CLOSURE_BEG);
const _: () = assert!(ASSIGN_END - ASSIGN_BEG == 10);

const _: () = {
    let mut i = 0;
    while i < Token::ALL.len() {
        assert!(Token::ALL[i] as u8 as usize == i, "Token::ALL out of order");
        i += 1;
    }
};

/// Identifier text to keyword token, built once from the keyword range.
static KEYWORDS: LazyLock<FxHashMap<&'static str, Token>> = LazyLock::new(|| {
    Token::ALL[KEYWORD_BEG as usize..KEYWORD_END as usize]
        .iter()
        .map(|&tok| (tok.text(), tok))
        .collect()
});

impl Token {
    /// Every token kind, indexed by discriminant.
    pub const ALL: [Token; KEYWORD_END as usize] = [
        Token::Illegal,
        Token::Eof,
        Token::Comment,
        Token::Bareword,
        Token::Bin,
        Token::Oct,
        Token::Int,
        Token::Hex,
        Token::Float,
        Token::Date,
        Token::Time,
        Token::DateTime,
        Token::String,
        Token::Compound,
        Token::Raw,
        Token::Escape,
        Token::Composed,
        Token::Recipe,
        Token::Space,
        Token::Comma,
        Token::Linend,
        Token::LParen,
        Token::RParen,
        Token::LBrack,
        Token::RBrack,
        Token::LBrace,
        Token::RBrace,
        Token::Dot,
        Token::DotDot,
        Token::Semicolon,
        Token::At,
        Token::Bar,
        Token::Exc,
        Token::Question,
        Token::Percent,
        Token::Plus,
        Token::Minus,
        Token::Minus2,
        Token::Arrow,
        Token::MinusPlus,
        Token::Pcon,
        Token::Backslash,
        Token::Star,
        Token::FatArrow,
        Token::Tilde,
        Token::TildeArrow,
        Token::Hash,
        Token::Colon,
        Token::Colon2,
        Token::ColonLbk,
        Token::ColonExcLbk,
        Token::ColonQueLbk,
        Token::ColonRbk,
        Token::Closure,
        Token::ClosureSlash,
        Token::ClosureDot,
        Token::ClosureAt,
        Token::ClosureBar,
        Token::ClosureLt,
        Token::ClosureCaret,
        Token::ClosureStar,
        Token::ClosureMinus,
        Token::ClosurePlus,
        Token::ClosureQuestion,
        Token::Closure1,
        Token::Closure2,
        Token::Closure3,
        Token::Closure4,
        Token::Closure5,
        Token::Closure6,
        Token::Closure7,
        Token::Closure8,
        Token::Closure9,
        Token::ClosureUnderscore,
        Token::Delegate,
        Token::DelegateSlash,
        Token::DelegateDot,
        Token::DelegateAt,
        Token::DelegateBar,
        Token::DelegateLt,
        Token::DelegateCaret,
        Token::DelegateStar,
        Token::DelegateMinus,
        Token::DelegatePlus,
        Token::DelegateQuestion,
        Token::Delegate1,
        Token::Delegate2,
        Token::Delegate3,
        Token::Delegate4,
        Token::Delegate5,
        Token::Delegate6,
        Token::Delegate7,
        Token::Delegate8,
        Token::Delegate9,
        Token::DelegateUnderscore,
        Token::Assign,
        Token::AssignPlus,
        Token::AddAssign,
        Token::QueAssign,
        Token::ExcAssign,
        Token::ScoAssign,
        Token::DcoAssign,
        Token::SubAssign,
        Token::SubPlusAssign,
        Token::SubAssignPlus,
        Token::Project,
        Token::Package,
        Token::Module,
        Token::Configure,
        Token::Configuration,
        Token::Use,
        Token::Eval,
        Token::Export,
        Token::Include,
        Token::Import,
        Token::Instance,
        Token::Files,
        Token::True,
        Token::False,
        Token::Yes,
        Token::No,
    ];

    /// Token for a discriminant, if one exists.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Token> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Maps an identifier to its keyword token, or `Bareword`.
    pub fn lookup(ident: &str) -> Token {
        KEYWORDS.get(ident).copied().unwrap_or(Token::Bareword)
    }

    /// Closure token selected by the byte following `&`.
    ///
    /// Returns `None` when the byte is not one of the 20 suffixes, in
    /// which case the sigil opens a call instead.
    pub const fn closure_suffix(b: u8) -> Option<Token> {
        let tok = match b {
            b'/' => Token::ClosureSlash,
            b'.' => Token::ClosureDot,
            b'@' => Token::ClosureAt,
            b'|' => Token::ClosureBar,
            b'<' => Token::ClosureLt,
            b'^' => Token::ClosureCaret,
            b'*' => Token::ClosureStar,
            b'-' => Token::ClosureMinus,
            b'+' => Token::ClosurePlus,
            b'?' => Token::ClosureQuestion,
            b'1'..=b'9' => {
                return Token::from_index(Token::Closure1 as u8 + (b - b'1'));
            }
            b'_' => Token::ClosureUnderscore,
            _ => return None,
        };
        Some(tok)
    }

    /// Delegate counterpart of a closure token.
    ///
    /// Returns `None` for anything that is not a closure.
    #[inline]
    pub const fn to_delegate(self) -> Option<Token> {
        if self.is_closure() {
            Token::from_index(self as u8 + DELEGATE_OFFSET)
        } else {
            None
        }
    }

    /// Closure counterpart of a delegate token.
    #[inline]
    pub const fn to_closure(self) -> Option<Token> {
        if self.is_delegate() {
            Token::from_index(self as u8 - DELEGATE_OFFSET)
        } else {
            None
        }
    }

    #[inline]
    const fn within(self, beg: u8, end: u8) -> bool {
        let i = self as u8;
        beg <= i && i < end
    }

    #[inline]
    pub const fn is_literal(self) -> bool {
        self.within(LITERAL_BEG, LITERAL_END)
    }

    /// Operators, rule delimiters, sigils and assignments.
    #[inline]
    pub const fn is_operator(self) -> bool {
        self.within(OPERATOR_BEG, OPERATOR_END)
    }

    #[inline]
    pub const fn is_list_delim(self) -> bool {
        self.within(LIST_DELIM_BEG, LIST_DELIM_END)
    }

    #[inline]
    pub const fn is_rule_delim(self) -> bool {
        self.within(RULE_DELIM_BEG, RULE_DELIM_END)
    }

    #[inline]
    pub const fn is_closure(self) -> bool {
        self.within(CLOSURE_BEG, CLOSURE_END)
    }

    #[inline]
    pub const fn is_delegate(self) -> bool {
        self.within(DELEGATE_BEG, DELEGATE_END)
    }

    #[inline]
    pub const fn is_assign(self) -> bool {
        self.within(ASSIGN_BEG, ASSIGN_END)
    }

    /// Keywords, including the boolean and yes/no constants.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        self.within(KEYWORD_BEG, KEYWORD_END)
    }

    #[inline]
    pub const fn is_constant(self) -> bool {
        self.within(CONSTANT_BEG, CONSTANT_END)
    }

    /// Canonical surface text, or a descriptive name for literal kinds.
    pub const fn text(self) -> &'static str {
        match self {
            Token::Illegal => "ILLEGAL",
            Token::Eof => "EOF",
            Token::Comment => "COMMENT",

            Token::Bareword => "BAREWORD",
            Token::Bin => "BIN",
            Token::Oct => "OCT",
            Token::Int => "INT",
            Token::Hex => "HEX",
            Token::Float => "FLOAT",
            Token::Date => "DATE",
            Token::Time => "TIME",
            Token::DateTime => "DATETIME",
            Token::String => "STRING",
            Token::Compound => "COMPOUND",
            Token::Raw => "RAW",
            Token::Escape => "ESCAPE",
            Token::Composed => "COMPOSED",
            Token::Recipe => "RECIPE",

            Token::Space => "SPACE",
            Token::Comma => ",",
            Token::Linend => "LINEND",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrack => "[",
            Token::RBrack => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Dot => ".",
            Token::DotDot => "..",
            Token::Semicolon => ";",
            Token::At => "@",
            Token::Bar => "|",
            Token::Exc => "!",
            Token::Question => "?",
            Token::Percent => "%",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Minus2 => "--",
            Token::Arrow => "->",
            Token::MinusPlus => "-+",
            Token::Pcon => "/",
            Token::Backslash => "\\",
            Token::Star => "*",
            Token::FatArrow => "=>",
            Token::Tilde => "~",
            Token::TildeArrow => "~>",
            Token::Hash => "#",

            Token::Colon => ":",
            Token::Colon2 => "::",
            Token::ColonLbk => ":[",
            Token::ColonExcLbk => ":![",
            Token::ColonQueLbk => ":?[",
            Token::ColonRbk => "]:",

            Token::Closure => "&",
            Token::ClosureSlash => "&/",
            Token::ClosureDot => "&.",
            Token::ClosureAt => "&@",
            Token::ClosureBar => "&|",
            Token::ClosureLt => "&<",
            Token::ClosureCaret => "&^",
            Token::ClosureStar => "&*",
            Token::ClosureMinus => "&-",
            Token::ClosurePlus => "&+",
            Token::ClosureQuestion => "&?",
            Token::Closure1 => "&1",
            Token::Closure2 => "&2",
            Token::Closure3 => "&3",
            Token::Closure4 => "&4",
            Token::Closure5 => "&5",
            Token::Closure6 => "&6",
            Token::Closure7 => "&7",
            Token::Closure8 => "&8",
            Token::Closure9 => "&9",
            Token::ClosureUnderscore => "&_",

            Token::Delegate => "$",
            Token::DelegateSlash => "$/",
            Token::DelegateDot => "$.",
            Token::DelegateAt => "$@",
            Token::DelegateBar => "$|",
            Token::DelegateLt => "$<",
            Token::DelegateCaret => "$^",
            Token::DelegateStar => "$*",
            Token::DelegateMinus => "$-",
            Token::DelegatePlus => "$+",
            Token::DelegateQuestion => "$?",
            Token::Delegate1 => "$1",
            Token::Delegate2 => "$2",
            Token::Delegate3 => "$3",
            Token::Delegate4 => "$4",
            Token::Delegate5 => "$5",
            Token::Delegate6 => "$6",
            Token::Delegate7 => "$7",
            Token::Delegate8 => "$8",
            Token::Delegate9 => "$9",
            Token::DelegateUnderscore => "$_",

            Token::Assign => "=",
            Token::AssignPlus => "=+",
            Token::AddAssign => "+=",
            Token::QueAssign => "?=",
            Token::ExcAssign => "!=",
            Token::ScoAssign => ":=",
            Token::DcoAssign => "::=",
            Token::SubAssign => "-=",
            Token::SubPlusAssign => "-+=",
            Token::SubAssignPlus => "-=+",

            Token::Project => "project",
            Token::Package => "package",
            Token::Module => "module",
            Token::Configure => "configure",
            Token::Configuration => "configuration",
            Token::Use => "use",
            Token::Eval => "eval",
            Token::Export => "export",
            Token::Include => "include",
            Token::Import => "import",
            Token::Instance => "instance",
            Token::Files => "files",

            Token::True => "true",
            Token::False => "false",
            Token::Yes => "yes",
            Token::No => "no",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
