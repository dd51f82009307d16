//! Token kind definitions for the lenient ES|QL tokenizer.
//!
//! Quoted lexemes keep their *unescaped* value in the kind and report whether
//! the closing quote was found, so the parser can build a partial tree from a
//! query that is still being typed.

use crate::lexer::keyword::Keyword;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted identifier (`status`, `@timestamp`, `_id`).
    Ident(String),
    /// Backtick quoted identifier; `name` has doubled backticks collapsed.
    QuotedIdent { name: String, terminated: bool },
    /// Reserved word, matched case-insensitively.
    Keyword(Keyword),
    Integer,
    Decimal,
    /// Double quoted or triple quoted string; `value` is unescaped.
    String { value: String, terminated: bool },
    /// Query parameter `?`, `?name` or `?1`; holds the text after `?`.
    Param(String),
    Pipe,
    Comma,
    Dot,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    /// `=`
    Assign,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Colon,
    DoubleColon,
    /// Anything else; kept so source patterns like `<logs-{now/d}>` survive.
    Other(char),
}

impl TokenKind {
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            TokenKind::Keyword(k) => Some(*k),
            _ => None,
        }
    }

    /// Identifier text (quoted or not), already unescaped.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(s) => Some(s.as_str()),
            TokenKind::QuotedIdent { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_ident(&self) -> bool {
        matches!(self, TokenKind::Ident(_) | TokenKind::QuotedIdent { .. })
    }

    /// Binary comparison operators.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Neq
                | TokenKind::Lt
                | TokenKind::Lte
                | TokenKind::Gt
                | TokenKind::Gte
        )
    }

    /// Arithmetic operators.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Percent
        )
    }

    /// Symbol of a binary operator token as registered in the function catalog.
    pub fn operator_symbol(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Lte => "<=",
            TokenKind::Gt => ">",
            TokenKind::Gte => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Colon => ":",
            _ => return None,
        })
    }
}
