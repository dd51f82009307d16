use crate::lexer::{keyword::Keyword, token::Token, token_kind::TokenKind};
use crate::trace;

/// Lenient ES|QL tokenizer producing a flat stream of `Token`s.
///
/// Behavior:
/// - Skips whitespace and `//` / `/* */` comments; boundaries survive in offsets.
/// - Aggregates `[A-Za-z_@][A-Za-z0-9_]*` runs into identifiers, preserving case,
///   and classifies reserved words through [`Keyword::from_lower`].
/// - Backtick identifiers collapse doubled backticks (`` `a``b` `` is ``a`b``).
/// - Unterminated strings and quoted identifiers extend to end of input and are
///   flagged `terminated: false`.
/// - Anything unknown becomes `Other(char)`.
///
/// Guarantees:
/// - Never panics and never fails; malformed input still yields tokens.
/// - Offsets are byte offsets on char boundaries of `query`.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut scanner = Scanner {
        src: query,
        pos: 0,
        out: Vec::new(),
    };
    scanner.run();
    scanner.out
}

struct Scanner<'q> {
    src: &'q str,
    pos: usize,
    out: Vec<Token>,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<'q> Scanner<'q> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let text = &self.src[start..self.pos];
        self.out.push(Token::new(kind, text, start, self.pos));
    }

    fn previous_is_adjacent(&self, start: usize) -> bool {
        self.out.last().is_some_and(|t| t.end == start)
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;

            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if self.starts_with("//") {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            if self.starts_with("/*") {
                self.pos += 2;
                match self.src[self.pos..].find("*/") {
                    Some(idx) => self.pos += idx + 2,
                    None => self.pos = self.src.len(),
                }
                continue;
            }

            if is_ident_start(c) {
                self.identifier(start);
                continue;
            }
            if c.is_ascii_digit()
                || (c == '.'
                    && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit())
                    && !self.previous_is_adjacent(start))
            {
                self.number(start);
                continue;
            }

            match c {
                '`' => self.quoted_identifier(start),
                '"' => self.string(start),
                '?' => {
                    self.bump();
                    while self.peek().is_some_and(is_ident_part) {
                        self.bump();
                    }
                    let name = self.src[start + 1..self.pos].to_string();
                    self.push(TokenKind::Param(name), start);
                }
                _ => self.punctuation(start, c),
            }
        }
    }

    fn identifier(&mut self, start: usize) {
        self.bump();
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        let kind = Keyword::from_lower(&text.to_ascii_lowercase())
            .map(TokenKind::Keyword)
            .unwrap_or_else(|| TokenKind::Ident(text.to_string()));
        self.push(kind, start);
    }

    fn number(&mut self, start: usize) {
        let mut decimal = false;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        // `1.` and `1.5` are decimals, `2024.logs` stays an integer followed by a dot.
        if self.peek() == Some('.') && !self.peek_nth(1).is_some_and(is_ident_start) {
            decimal = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                decimal = true;
                for _ in 0..digit_at {
                    self.bump();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
        }
        let kind = if decimal {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        self.push(kind, start);
    }

    fn quoted_identifier(&mut self, start: usize) {
        self.bump();
        let mut name = String::new();
        let mut terminated = false;
        while let Some(c) = self.bump() {
            if c == '`' {
                if self.peek() == Some('`') {
                    self.bump();
                    name.push('`');
                    continue;
                }
                terminated = true;
                break;
            }
            name.push(c);
        }
        self.push(TokenKind::QuotedIdent { name, terminated }, start);
    }

    fn string(&mut self, start: usize) {
        if self.starts_with("\"\"\"") {
            self.pos += 3;
            let (value, terminated) = match self.src[self.pos..].find("\"\"\"") {
                Some(idx) => {
                    let value = self.src[self.pos..self.pos + idx].to_string();
                    self.pos += idx + 3;
                    (value, true)
                }
                None => {
                    let value = self.src[self.pos..].to_string();
                    self.pos = self.src.len();
                    (value, false)
                }
            };
            self.push(TokenKind::String { value, terminated }, start);
            return;
        }

        self.bump();
        let mut value = String::new();
        let mut terminated = false;
        while let Some(c) = self.bump() {
            match c {
                '"' => {
                    terminated = true;
                    break;
                }
                '\\' => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => value.push('\\'),
                },
                other => value.push(other),
            }
        }
        self.push(TokenKind::String { value, terminated }, start);
    }

    fn punctuation(&mut self, start: usize, c: char) {
        self.bump();
        let next = self.peek();
        let kind = match (c, next) {
            ('=', Some('=')) => {
                self.bump();
                TokenKind::Eq
            }
            ('!', Some('=')) => {
                self.bump();
                TokenKind::Neq
            }
            ('<', Some('=')) => {
                self.bump();
                TokenKind::Lte
            }
            ('>', Some('=')) => {
                self.bump();
                TokenKind::Gte
            }
            (':', Some(':')) => {
                self.bump();
                TokenKind::DoubleColon
            }
            ('=', _) => TokenKind::Assign,
            ('<', _) => TokenKind::Lt,
            ('>', _) => TokenKind::Gt,
            (':', _) => TokenKind::Colon,
            ('|', _) => TokenKind::Pipe,
            (',', _) => TokenKind::Comma,
            ('.', _) => TokenKind::Dot,
            ('(', _) => TokenKind::ParenOpen,
            (')', _) => TokenKind::ParenClose,
            ('[', _) => TokenKind::BracketOpen,
            (']', _) => TokenKind::BracketClose,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,
            ('%', _) => TokenKind::Percent,
            (other, _) => {
                trace!("Unknown character {other:?} at {start}");
                TokenKind::Other(other)
            }
        };
        self.push(kind, start);
    }
}
