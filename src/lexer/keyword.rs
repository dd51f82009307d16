//! Reserved ES|QL words recognised by the tokenizer.
//!
//! Command names are deliberately *not* keywords: they are looked up in the
//! command registry by the parser, so a column may still be called `sort` or
//! `limit`. Only the words that change the shape of an expression or of a
//! command clause live here.
//!
//! - Keywords are matched case-insensitively via `from_lower` on a
//!   pre-lower-cased slice.
//! - `as_str` gives the canonical upper-case spelling used in suggestions.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    And,
    Or,
    Not,
    In,
    Is,
    Null,
    Like,
    Rlike,
    True,
    False,
    By,
    As,
    On,
    With,
    Where,
    Metadata,
    Asc,
    Desc,
    Nulls,
}

impl Keyword {
    /// Keywords that can follow a complete expression inside a command.
    pub const CLAUSE_BOUNDARIES: [Self; 6] = [
        Keyword::By,
        Keyword::As,
        Keyword::On,
        Keyword::With,
        Keyword::Where,
        Keyword::Metadata,
    ];

    /// Attempt to classify a *lower-cased* word slice into a `Keyword`.
    ///
    /// NOTE: the caller lower-cases once per lexeme so this stays allocation free.
    pub fn from_lower(word: &str) -> Option<Self> {
        use Keyword::*;
        let kw = match word {
            "and" => And,
            "or" => Or,
            "not" => Not,
            "in" => In,
            "is" => Is,
            "null" => Null,
            "like" => Like,
            "rlike" => Rlike,
            "true" => True,
            "false" => False,
            "by" => By,
            "as" => As,
            "on" => On,
            "with" => With,
            "where" => Where,
            "metadata" => Metadata,
            "asc" => Asc,
            "desc" => Desc,
            "nulls" => Nulls,
            _ => return None,
        };
        Some(kw)
    }

    /// Canonical upper-case form, as inserted by suggestions.
    pub const fn as_str(self) -> &'static str {
        use Keyword::*;
        match self {
            And => "AND",
            Or => "OR",
            Not => "NOT",
            In => "IN",
            Is => "IS",
            Null => "NULL",
            Like => "LIKE",
            Rlike => "RLIKE",
            True => "TRUE",
            False => "FALSE",
            By => "BY",
            As => "AS",
            On => "ON",
            With => "WITH",
            Where => "WHERE",
            Metadata => "METADATA",
            Asc => "ASC",
            Desc => "DESC",
            Nulls => "NULLS",
        }
    }

    pub fn is_clause_boundary(self) -> bool {
        Self::CLAUSE_BOUNDARIES.contains(&self)
    }
}
