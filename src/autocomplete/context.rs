//! What a command's completion hook sees: its tokens up to the cursor, the
//! partially typed word, and the columns flowing into it.
use crate::*;

/// The token run being typed at the cursor.
#[derive(Debug, Clone, Copy)]
pub struct Partial<'a> {
    /// Raw text of the run; empty after whitespace or punctuation.
    pub text: &'a str,
    /// Raw offsets of the run, `None` when nothing is being typed.
    pub range: Option<Location>,
    /// Tokens of the command before the run.
    pub before: &'a [Token],
}

impl<'a> Partial<'a> {
    pub fn previous(&self) -> Option<&'a Token> {
        self.before.last()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct SuggestContext<'a> {
    /// Query text up to the cursor.
    pub text: &'a str,
    pub cursor: usize,
    pub command: &'a Command,
    /// Tokens after the command name, up to the cursor.
    pub tokens: &'a [Token],
    /// Columns flowing into the command.
    pub columns: &'a ColumnSet,
    pub schema: &'a SchemaSnapshot,
}

fn is_word_part(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_) | TokenKind::QuotedIdent { .. } | TokenKind::Keyword(_) | TokenKind::Dot
    )
}

/// True when `token` completes an operand.
pub(crate) fn ends_operand(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Ident(_)
        | TokenKind::QuotedIdent { .. }
        | TokenKind::Integer
        | TokenKind::Decimal
        | TokenKind::Param(_)
        | TokenKind::ParenClose
        | TokenKind::BracketClose => true,
        TokenKind::String { terminated, .. } => *terminated,
        TokenKind::Keyword(kw) => matches!(kw, Keyword::True | Keyword::False | Keyword::Null),
        _ => false,
    }
}

/// Splits a trailing dotted column path (`host.name`) off `tokens`.
pub(crate) fn trailing_path(tokens: &[Token]) -> (&[Token], &[Token]) {
    let mut start = tokens.len();
    while start > 0
        && matches!(
            tokens[start - 1].kind,
            TokenKind::Ident(_) | TokenKind::QuotedIdent { .. } | TokenKind::Dot
        )
        && (start == tokens.len() || tokens[start - 1].is_adjacent_to(&tokens[start]))
    {
        start -= 1;
    }
    tokens.split_at(start)
}

/// An unclosed function call around the cursor.
#[derive(Debug, Clone, Copy)]
pub struct OpenCall<'a> {
    pub definition: Option<&'static FunctionDefinition>,
    pub name: &'a str,
    /// Index of the argument being typed.
    pub argument: usize,
}

impl<'a> SuggestContext<'a> {
    fn run(&self, part: impl Fn(&TokenKind) -> bool) -> Partial<'a> {
        let tokens = self.tokens;
        let mut start = tokens.len();
        if tokens.last().is_some_and(|t| t.end == self.cursor) {
            while start > 0
                && part(&tokens[start - 1].kind)
                && (start == tokens.len() || tokens[start - 1].is_adjacent_to(&tokens[start]))
            {
                start -= 1;
            }
        }
        let run = &tokens[start..];
        let range = match (run.first(), run.last()) {
            (Some(first), Some(last)) => Some(Location::new(first.start, last.end)),
            _ => None,
        };
        Partial {
            text: range.map(|r| r.slice(self.text)).unwrap_or_default(),
            range,
            before: &tokens[..start],
        }
    }

    /// Identifier being typed: dotted and backtick quoted segments included.
    pub fn word(&self) -> Partial<'a> {
        self.run(is_word_part)
    }

    /// Index expression being typed (`remote:logs-*`, `"quoted"`).
    pub fn source(&self) -> Partial<'a> {
        let quoted = self.tokens.last().filter(|t| {
            t.end == self.cursor && matches!(t.kind, TokenKind::String { .. })
        });
        match quoted {
            Some(tok) => Partial {
                text: tok.location().slice(self.text),
                range: Some(tok.location()),
                before: &self.tokens[..self.tokens.len() - 1],
            },
            None => self.run(crate::parser::is_source_part),
        }
    }

    /// Last clause keyword outside parentheses, with its token index.
    pub fn clause(&self, before: &[Token], keywords: &[Keyword]) -> Option<(Keyword, usize)> {
        let mut depth = 0i32;
        let mut found = None;
        for (i, tok) in before.iter().enumerate() {
            match &tok.kind {
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth -= 1,
                TokenKind::Keyword(kw) if depth <= 0 && keywords.contains(kw) => {
                    found = Some((*kw, i))
                }
                _ => {}
            }
        }
        found
    }

    /// The innermost call whose parenthesis is still open.
    pub fn open_call<'t>(&self, before: &'t [Token]) -> Option<OpenCall<'t>> {
        let mut stack: Vec<Option<OpenCall<'t>>> = Vec::new();
        for (i, tok) in before.iter().enumerate() {
            match &tok.kind {
                TokenKind::ParenOpen => {
                    let call = i
                        .checked_sub(1)
                        .and_then(|p| before.get(p))
                        .and_then(|p| match &p.kind {
                            TokenKind::Ident(name) => Some(name.as_str()),
                            _ => None,
                        })
                        .map(|name| OpenCall {
                            definition: function_definition(&name.to_ascii_lowercase()),
                            name,
                            argument: 0,
                        });
                    stack.push(call);
                }
                TokenKind::ParenClose => {
                    stack.pop();
                }
                TokenKind::Comma => {
                    if let Some(Some(call)) = stack.last_mut() {
                        call.argument += 1;
                    }
                }
                _ => {}
            }
        }
        stack.pop().flatten()
    }

    /// True when the cursor sits inside parentheses.
    pub fn nested(&self, before: &[Token]) -> bool {
        let depth: i32 = before
            .iter()
            .map(|t| match t.kind {
                TokenKind::ParenOpen => 1,
                TokenKind::ParenClose => -1,
                _ => 0,
            })
            .sum();
        depth > 0
    }

    /// Columns accepted by `ty`, minus `exclude`.
    pub fn column_suggestions(
        &self,
        ty: ParamType,
        exclude: &[&str],
        range: Option<Location>,
    ) -> Suggestions {
        self.columns
            .iter()
            .filter(|f| !exclude.contains(&f.name.as_str()))
            .filter(|f| f.ty.is_none_or(|t| ty.accepts(t, false)))
            .map(|f| Suggestion::column(f).range(range))
            .collect()
    }

    /// Names of complete column arguments written before `range`.
    pub fn used_columns(&self, nodes: &'a [Node], range: Option<Location>) -> Vec<&'a str> {
        let limit = range.map_or(self.cursor, |r| r.start);
        nodes
            .iter()
            .filter_map(Node::as_column)
            .filter(|c| c.location.end < limit)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Suggestions for an expression at `tag`. `follow` is offered after a
    /// complete operand outside any parenthesis (`, `, `| `, `BY `, ...).
    pub fn expression(&self, tag: LocationTag, before: &[Token], follow: Suggestions) -> Suggestions {
        let range = self.word().range;
        let previous = before.last();
        let call = self.open_call(before);

        if let Some(prev) = previous.filter(|t| ends_operand(t)) {
            let left = prev
                .ident()
                .and_then(|name| self.columns.get(name))
                .and_then(|f| f.ty);
            let mut out = operators(tag, left, range);
            if let Some(call) = call {
                let more = call
                    .definition
                    .is_none_or(|d| d.max_args().is_none_or(|max| call.argument + 1 < max));
                if more {
                    out.push(Suggestion::comma().range(range));
                }
            } else if !self.nested(before) {
                out.extend(follow.into_iter().map(|s| s.range(range)));
            }
            return out;
        }

        match previous.map(|t| &t.kind) {
            Some(TokenKind::Keyword(Keyword::Is)) => {
                return vec![
                    Suggestion::value("NULL", "Null test").range(range),
                    Suggestion::value("NOT NULL", "Not null test").range(range),
                ];
            }
            Some(TokenKind::Keyword(Keyword::Not))
                if before.len() >= 2 && ends_operand(&before[before.len() - 2]) =>
            {
                return ["IN", "LIKE", "RLIKE"]
                    .into_iter()
                    .map(|kw| Suggestion::keyword(kw, "").range(range))
                    .collect();
            }
            Some(TokenKind::Keyword(Keyword::In | Keyword::Like | Keyword::Rlike)) => {
                return Vec::new();
            }
            Some(TokenKind::Other(_)) | Some(TokenKind::String { .. }) => return Vec::new(),
            _ => {}
        }

        let expected = call
            .and_then(|c| c.definition.zip(Some(c.argument)))
            .map_or(ParamType::Any, |(definition, i)| parameter_type(definition, i));
        let inside_agg = call
            .and_then(|c| c.definition)
            .is_some_and(FunctionDefinition::is_agg);
        let categories: &[FunctionCategory] = match tag {
            LocationTag::Stats if !inside_agg => &[FunctionCategory::Agg, FunctionCategory::Scalar],
            LocationTag::StatsBy => &[FunctionCategory::Grouping, FunctionCategory::Scalar],
            _ => &[FunctionCategory::Scalar],
        };

        let mut out = self.column_suggestions(expected, &[], range);
        out.extend(
            function_registry()
                .get_functions_by_location(tag, expected, categories)
                .into_iter()
                .map(|f| Suggestion::function(f).range(range)),
        );
        out
    }
}

/// Type accepted at argument `i` across the signatures of `definition`.
fn parameter_type(definition: &FunctionDefinition, i: usize) -> ParamType {
    let mut types = definition
        .signatures
        .iter()
        .filter_map(|s| s.param(i).map(|p| p.ty));
    match types.next() {
        Some(first) if types.all(|t| t == first) => first,
        _ => ParamType::Any,
    }
}

/// Binary operators usable at `tag`, narrowed by the left operand type.
fn operators(tag: LocationTag, left: Option<FieldType>, range: Option<Location>) -> Suggestions {
    function_registry()
        .get_functions_by_location(tag, ParamType::Any, &[FunctionCategory::Operator])
        .into_iter()
        .filter(|f| f.name != "not" && f.name != "=")
        .filter(|f| f.signatures.iter().any(|s| s.params.len() == 2 || f.name.starts_with("is")))
        .filter(|f| {
            left.is_none_or(|ty| {
                f.signatures
                    .iter()
                    .any(|s| s.params.first().is_none_or(|p| p.ty.accepts(ty, false)))
            })
        })
        .map(|f| Suggestion::operator(f.name, f.description).range(range))
        .collect()
}
