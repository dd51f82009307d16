//! Identifier, column-pattern and source-name rules.
//!
//! Multi-token names are glued together by adjacency: a dotted field
//! (`` `a``b`.c ``), a KEEP pattern (`host.*`) or an index expression
//! (`remote:logs-*::failures`) is a run of tokens with no whitespace between
//! them, so the node span always covers the raw text end to end.
use super::{PResult, Parser};
use crate::*;

/// True if `name` cannot be written bare and must be backtick quoted.
pub fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_alphabetic() || first == '_' || first == '@') {
        return true;
    }
    if Keyword::from_lower(&name.to_ascii_lowercase()).is_some() {
        return true;
    }
    !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '@')
        || name.ends_with('.')
        || name.contains("..")
}

/// Quote `name` for insertion into a query, doubling embedded backticks.
pub fn escape_identifier(name: &str) -> String {
    if needs_quoting(name) {
        format!("`{}`", name.replace('`', "``"))
    } else {
        name.to_string()
    }
}

/// Reverse of [`escape_identifier`]; also flattens `` `a`.`b` `` into `a.b`.
pub fn unescape_identifier(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '`' {
            out.push(c);
        } else if quoted && chars.peek() == Some(&'`') {
            chars.next();
            out.push('`');
        } else {
            quoted = !quoted;
        }
    }
    out
}

/// Tokens that may appear inside an unquoted index expression.
pub(crate) fn is_source_part(kind: &TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::Comma
            | TokenKind::Pipe
            | TokenKind::ParenOpen
            | TokenKind::ParenClose
            | TokenKind::BracketOpen
            | TokenKind::BracketClose
            | TokenKind::String { .. }
            | TokenKind::Assign
            | TokenKind::Param(_)
    )
}

/// Split `cluster:index::selector`.
pub(crate) fn split_source(name: &str) -> (Option<String>, String, Option<String>) {
    let (base, selector) = match name.split_once("::") {
        Some((base, selector)) => (base, Some(selector.to_string())),
        None => (name, None),
    };
    match base.split_once(':') {
        Some((cluster, index)) => (Some(cluster.to_string()), index.to_string(), selector),
        None => (None, base.to_string(), selector),
    }
}

impl Parser<'_> {
    /// A dotted column name. Returns `None` without recording an error when
    /// the next token cannot start a name.
    pub(crate) fn qualified_name(&mut self) -> Option<Column> {
        self.name_run(false)
    }

    /// A KEEP/DROP style pattern where `*` may appear in any segment.
    pub(crate) fn column_pattern(&mut self) -> Option<Column> {
        self.name_run(true)
    }

    /// Required column; records "expected a column name" when missing.
    pub(crate) fn expect_column(&mut self, allow_star: bool) -> PResult<Column> {
        match self.name_run(allow_star) {
            Some(column) => Ok(column),
            None => Err(self.expected("a column name")),
        }
    }

    fn name_run(&mut self, allow_star: bool) -> Option<Column> {
        let first = self.peek()?;
        let starts_name = first.kind.is_ident() || (allow_star && first.kind == TokenKind::Star);
        if !starts_name {
            return None;
        }

        let mut parts = vec![String::new()];
        let mut quoted = false;
        let mut unterminated = false;
        let mut prev: Option<&Token> = None;
        while let Some(tok) = self.peek() {
            if prev.is_some_and(|p| !p.is_adjacent_to(tok)) {
                break;
            }
            let Some(segment) = parts.last_mut() else {
                break;
            };
            match &tok.kind {
                TokenKind::Ident(name) => segment.push_str(name),
                TokenKind::QuotedIdent { name, terminated } => {
                    segment.push_str(name);
                    quoted = true;
                    unterminated |= !terminated;
                }
                TokenKind::Star if allow_star => segment.push('*'),
                TokenKind::Dot if prev.is_some() => parts.push(String::new()),
                _ => break,
            }
            prev = Some(tok);
            self.bump();
        }

        let location = Location::new(first.start, self.last_end());
        let dangling_dot = parts.last().is_some_and(String::is_empty);
        if unterminated {
            self.error("unterminated quoted identifier", location);
        } else if dangling_dot {
            self.error("expected a name after '.'", Location::at(location.end));
        }
        Some(Column {
            name: parts.join("."),
            parts,
            quoted,
            location,
            text: self.slice(location),
            incomplete: unterminated || dangling_dot,
        })
    }

    /// Reserved words may open an index name (`in*`, `nulls`), except
    /// METADATA and a clause keyword standing on its own (`ENRICH p ON x`).
    fn keyword_starts_source(&self, keyword: Keyword) -> bool {
        match keyword {
            Keyword::Metadata => false,
            Keyword::On | Keyword::With => self
                .peek()
                .zip(self.peek_nth(1))
                .is_some_and(|(kw, next)| kw.is_adjacent_to(next) && is_source_part(&next.kind)),
            _ => true,
        }
    }

    /// An index or policy name: a quoted string or a run of adjacent tokens.
    pub(crate) fn source(&mut self, kind: SourceKind) -> Option<Source> {
        let first = self.peek()?;
        let (name, incomplete) = match &first.kind {
            TokenKind::String { value, terminated } => {
                self.bump();
                (value.clone(), !terminated)
            }
            TokenKind::Keyword(kw) if !self.keyword_starts_source(*kw) => return None,
            k if !is_source_part(k) => return None,
            _ => {
                let mut name = String::new();
                let mut unterminated = false;
                let mut prev: Option<&Token> = None;
                while let Some(tok) = self.peek() {
                    if prev.is_some_and(|p| !p.is_adjacent_to(tok)) || !is_source_part(&tok.kind) {
                        break;
                    }
                    match &tok.kind {
                        TokenKind::QuotedIdent { name: n, terminated } => {
                            name.push_str(n);
                            unterminated |= !terminated;
                        }
                        _ => name.push_str(&tok.text),
                    }
                    prev = Some(tok);
                    self.bump();
                }
                (name, unterminated)
            }
        };

        let location = Location::new(first.start, self.last_end());
        if incomplete {
            self.error("unterminated quoted source name", location);
        }
        let (cluster, index, selector) = split_source(&name);
        Some(Source {
            name,
            index,
            cluster,
            selector,
            kind,
            location,
            text: self.slice(location),
            incomplete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, distr::Alphanumeric};
    use rstest::rstest;

    #[rstest]
    #[case("host", "host")]
    #[case("host.name", "host.name")]
    #[case("@timestamp", "@timestamp")]
    #[case("my field", "`my field`")]
    #[case("a`b", "`a``b`")]
    #[case("1st", "`1st`")]
    #[case("by", "`by`")]
    #[case("", "``")]
    fn escaping(#[case] name: &str, #[case] escaped: &str) {
        assert_eq!(escape_identifier(name), escaped);
        assert_eq!(unescape_identifier(escaped), name);
    }

    #[test]
    fn unescape_flattens_segments() {
        assert_eq!(unescape_identifier("`a.b`.`c``d`"), "a.b.c`d");
        assert_eq!(unescape_identifier("a.`b`"), "a.b");
    }

    #[rstest]
    #[case("logs", None, "logs", None)]
    #[case("remote:logs-*", Some("remote"), "logs-*", None)]
    #[case("logs::failures", None, "logs", Some("failures"))]
    #[case("c:logs::data", Some("c"), "logs", Some("data"))]
    fn source_parts(
        #[case] name: &str,
        #[case] cluster: Option<&str>,
        #[case] index: &str,
        #[case] selector: Option<&str>,
    ) {
        let (c, i, s) = split_source(name);
        assert_eq!(c.as_deref(), cluster);
        assert_eq!(i, index);
        assert_eq!(s.as_deref(), selector);
    }

    #[test]
    fn dotted_quoted_column_spans_every_segment() {
        let text = "FROM a | KEEP `we``ird`.`na.me`, other";
        let ParseResult { query, errors } = parse(text);
        assert!(errors.is_empty(), "{errors:?}");
        let column = query.commands[1].args[0].as_column().expect("column");
        assert_eq!(column.name, "we`ird.na.me");
        assert_eq!(column.parts, vec!["we`ird", "na.me"]);
        assert!(column.quoted);
        assert_eq!(column.location, Location::new(14, 31));
        assert_eq!(column.text, "`we``ird`.`na.me`");
    }

    #[rstest]
    #[case("FROM in*", "in*")]
    #[case("FROM on-logs", "on-logs")]
    #[case("FROM nulls", "nulls")]
    #[case("FROM by_host, a", "by_host")]
    #[case("FROM a | LOOKUP JOIN with-keys ON k", "with-keys")]
    fn reserved_words_open_index_names(#[case] text: &str, #[case] index: &str) {
        let ParseResult { query, errors } = parse(text);
        assert!(errors.is_empty(), "{text}: {errors:?}");
        let sources: Vec<_> = query
            .commands
            .iter()
            .flat_map(|c| c.args.iter().filter_map(Node::as_source))
            .map(|s| s.name.as_str())
            .collect();
        assert!(sources.contains(&index), "{text}: {sources:?}");
    }

    #[rstest]
    #[case("FROM metadata")]
    #[case("FROM a | ENRICH ON x")]
    fn clause_keywords_are_not_index_names(#[case] text: &str) {
        let ParseResult { errors, .. } = parse(text);
        assert_eq!(errors.len(), 1, "{text}: {errors:?}");
    }

    #[test]
    fn sources_are_adjacent_token_runs() {
        let text = "FROM logs-*, remote:metrics-2024.01, \"quoted,name\"";
        let ParseResult { query, errors } = parse(text);
        assert!(errors.is_empty(), "{errors:?}");
        let sources: Vec<_> = query.commands[0]
            .args
            .iter()
            .filter_map(Node::as_source)
            .map(|s| (s.name.as_str(), s.location))
            .collect();
        assert_eq!(
            sources,
            vec![
                ("logs-*", Location::new(5, 11)),
                ("remote:metrics-2024.01", Location::new(13, 35)),
                ("quoted,name", Location::new(37, 50)),
            ]
        );
    }

    #[test]
    fn backtick_round_trip_for_random_names() {
        let mut rng = rand::rng();
        for k in 0..8 {
            let len = rng.random_range(1..10);
            let mut name: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect();
            for _ in 0..k {
                let at = rng.random_range(0..=name.len());
                name.insert(at, '`');
            }
            let text = format!("FROM a | KEEP {}", escape_identifier(&name));
            let ParseResult { query, errors } = parse(&text);
            assert!(errors.is_empty(), "{text}: {errors:?}");
            let column = query.commands[1].args[0].as_column().expect("column");
            assert_eq!(column.name, name, "{text}");
            assert_eq!(column.location.end, text.len());
        }
    }
}
