//! Token model tying a `TokenKind` to its raw text and source span.
//!
//! Offsets always refer to the *original* query string handed to the
//! tokenizer, so suggestion ranges and diagnostics can be computed without a
//! reconstructed string. Whitespace is not tokenized but survives as gaps
//! between `end` of one token and `start` of the next.
use crate::lexer::{keyword::Keyword, token_kind::TokenKind};
use crate::*;

/// A lexical token with its inclusive start and exclusive end byte offsets.
///
/// Invariants:
/// - `end >= start`
/// - `text == query[start..end]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ident(&self) -> Option<&str> {
        self.kind.ident()
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind.is_keyword(kw)
    }

    /// Lower-cased raw text, used for case-insensitive word matching.
    pub fn lower(&self) -> String {
        self.text.to_ascii_lowercase()
    }

    /// True for a bare word (identifier or keyword) equal to `word` ignoring case.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Ident(_) | TokenKind::Keyword(_))
            && self.text.eq_ignore_ascii_case(word)
    }

    /// NOTE: End is exclusive, so `cursor == end` returns false.
    pub fn contains(&self, cursor: usize) -> bool {
        cursor >= self.start && cursor < self.end
    }

    /// True when the token ends exactly at `cursor`, i.e. the user is still typing it.
    pub fn touches(&self, cursor: usize) -> bool {
        self.end == cursor
    }

    /// True when no whitespace separates `self` from the following `next` token.
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.end == next.start
    }

    pub const fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn location(&self) -> Location {
        Location::new(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_span() {
        let t = Token::new(TokenKind::Comma, ",", 5, 6);
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
        assert_eq!(t.span(), (5, 6));
        assert_eq!(t.location(), Location::new(5, 6));
    }

    #[test]
    fn contains_and_touches() {
        let t = Token::new(TokenKind::Ident("host".into()), "host", 10, 14);
        assert!(t.contains(10));
        assert!(!t.contains(14)); // end exclusive
        assert!(t.touches(14));
        assert!(!t.touches(13));
    }

    #[test]
    fn word_matching_ignores_case() {
        let t = Token::new(TokenKind::Ident("Lookup".into()), "Lookup", 0, 6);
        assert!(t.is_word("LOOKUP"));
        let kw = Token::new(TokenKind::Keyword(Keyword::By), "by", 0, 2);
        assert!(kw.is_word("BY"));
        let s = Token::new(
            TokenKind::String {
                value: "by".into(),
                terminated: true,
            },
            "\"by\"",
            0,
            4,
        );
        assert!(!s.is_word("by"));
    }

    #[test]
    fn adjacency() {
        let a = Token::new(TokenKind::Ident("logs".into()), "logs", 0, 4);
        let b = Token::new(TokenKind::Minus, "-", 4, 5);
        let c = Token::new(TokenKind::Star, "*", 6, 7);
        assert!(a.is_adjacent_to(&b));
        assert!(!b.is_adjacent_to(&c));
    }
}
