//! Lenient ES|QL tokenization.
//!
//! Modules:
//! - `keyword`    : Reserved words that shape expressions and clauses.
//! - `token_kind` : Classification of lexical atoms.
//! - `token`      : Token struct pairing a `TokenKind` with raw text and span.
//! - `tokenizer`  : Single pass tokenizer producing a `Vec<Token>` from raw text.
//!
//! Design Principles:
//! 1. Accept incomplete / invalid input (robust for live editing).
//! 2. Preserve original casing and raw offsets for range computation.
//! 3. Command names stay plain identifiers; the command registry owns them.
//!
//! Example:
//! ```rust
//! use esql_lang::prelude::*;
//!
//! let tokens = tokenize("FROM logs METADATA _id");
//! assert!(tokens.iter().any(|t| t.is_keyword(Keyword::Metadata)));
//! assert!(tokens.iter().any(|t| t.ident() == Some("logs")));
//! ```

pub mod keyword;
pub mod token;
pub mod token_kind;
pub mod tokenizer;

pub use keyword::Keyword;
pub use token::Token;
pub use token_kind::TokenKind;
pub use tokenizer::tokenize;

/// Convenience prelude re-exporting the most commonly used items.
pub mod prelude {
    pub use super::{Keyword, Token, TokenKind, tokenize};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_and_access() {
        let tokens = tokenize("FROM a | KEEP b");
        assert!(tokens.iter().any(|t| t.ident() == Some("a")));
        assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::Pipe)));
        assert!(tokens.iter().any(|t| t.is_word("keep")));
    }

    #[test]
    fn prelude_import_works() {
        use super::prelude::*;
        let toks = tokenize("STATS c = count(*) BY host");
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::By)));
    }
}
