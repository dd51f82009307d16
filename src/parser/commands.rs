//! Per-command argument grammar. Each rule pushes the nodes it managed to
//! build into the command before reporting a failure, so a half-typed
//! command still carries its prefix for validation and autocomplete.
use super::expression::function_node;
use super::{PResult, ParseState, Parser, Stop};
use crate::*;

/// Words that turn into `<type> JOIN`.
pub(crate) const JOIN_TYPES: [&str; 3] = ["lookup", "left", "right"];

fn push(args: &mut Vec<Node>, node: Node) -> PResult {
    let incomplete = node.incomplete();
    args.push(node);
    if incomplete { Err(Stop) } else { Ok(()) }
}

impl Parser<'_> {
    pub(super) fn arguments(&mut self, command: &mut Command, nested: bool) -> PResult {
        let args = &mut command.args;
        match command.name.as_str() {
            "from" | "ts" => self.from_args(args),
            "row" | "eval" => self.fields(args, false),
            "show" => self.show_args(args),
            "where" => push(args, self.expect_expression()?),
            "stats" | "inlinestats" => self.stats_args(args, nested),
            "keep" | "drop" => self.columns(args, true),
            "rename" => self.rename_args(args),
            "sort" => self.sort_args(args),
            "limit" => self.limit_args(args),
            "dissect" => self.dissect_args(args),
            "grok" => self.grok_args(args),
            "enrich" => self.enrich_args(args),
            "mv_expand" => push(args, Node::Column(self.expect_column(false)?)),
            "join" => self.join_args(args),
            "fork" => self.fork_args(args),
            "change_point" => self.change_point_args(args),
            "sample" => self.sample_args(args),
            _ => Ok(()),
        }
    }

    /// Parse an option introduced by `keyword` into its own node.
    fn with_option(
        &mut self,
        name: &str,
        keyword: &Token,
        args: &mut Vec<Node>,
        body: impl FnOnce(&mut Self, &mut Vec<Node>) -> PResult,
    ) -> PResult {
        self.transition(ParseState::ParsingOptions);
        let mut inner = Vec::new();
        let outcome = body(self, &mut inner);
        let location = Location::new(keyword.start, self.last_end());
        args.push(Node::Option(CommandOption {
            name: name.to_string(),
            args: inner,
            location,
            text: self.slice(location),
            incomplete: outcome.is_err(),
        }));
        self.transition(ParseState::ParsingArguments);
        outcome
    }

    /// True when the next tokens are `name =` (dotted and quoted names included).
    fn assignment_ahead(&self) -> bool {
        let mut i = self.pos;
        let mut prev: Option<&Token> = None;
        while let Some(tok) = self.tokens.get(i) {
            if prev.is_some_and(|p| !p.is_adjacent_to(tok)) {
                break;
            }
            if !matches!(
                tok.kind,
                TokenKind::Ident(_) | TokenKind::QuotedIdent { .. } | TokenKind::Dot
            ) {
                break;
            }
            prev = Some(tok);
            i += 1;
        }
        i > self.pos && self.tokens.get(i).is_some_and(|t| t.kind == TokenKind::Assign)
    }

    /// `[name =] expr`
    fn field(&mut self) -> PResult<Node> {
        if !self.assignment_ahead() {
            return self.expect_expression();
        }
        let target = self.expect_column(false)?;
        self.bump();
        let value = self.expression();
        let incomplete = target.incomplete || value.as_ref().is_none_or(Node::incomplete);
        let location = Location::new(target.location.start, self.last_end());
        let mut operands = vec![Node::Column(target)];
        operands.extend(value);
        Ok(function_node(
            "=",
            FunctionSubtype::Binary,
            operands,
            location,
            self.src,
            incomplete,
        ))
    }

    /// Comma separated fields. In STATS each field may carry `WHERE cond`.
    fn fields(&mut self, args: &mut Vec<Node>, filtered: bool) -> PResult {
        loop {
            let mut field = self.field()?;
            if filtered
                && !field.incomplete()
                && self.eat_keyword(Keyword::Where).is_some()
            {
                let start = field.location().start;
                let condition = self.expression();
                let incomplete = condition.as_ref().is_none_or(Node::incomplete);
                let location = Location::new(start, self.last_end());
                let mut operands = vec![field];
                operands.extend(condition);
                field = function_node(
                    "where",
                    FunctionSubtype::Binary,
                    operands,
                    location,
                    self.src,
                    incomplete,
                );
            }
            push(args, field)?;
            if self.eat(&TokenKind::Comma).is_none() {
                return Ok(());
            }
        }
    }

    fn columns(&mut self, args: &mut Vec<Node>, allow_star: bool) -> PResult {
        loop {
            let column = self.expect_column(allow_star)?;
            push(args, Node::Column(column))?;
            if self.eat(&TokenKind::Comma).is_none() {
                return Ok(());
            }
        }
    }

    fn from_args(&mut self, args: &mut Vec<Node>) -> PResult {
        loop {
            let Some(source) = self.source(SourceKind::Index) else {
                return Err(self.expected("an index name"));
            };
            push(args, Node::Source(source))?;
            if self.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }

        if let Some(keyword) = self.eat_keyword(Keyword::Metadata) {
            return self.with_option("metadata", keyword, args, |p, fields| {
                p.columns(fields, false)
            });
        }
        let legacy = self.at(&TokenKind::BracketOpen)
            && self.peek_nth(1).is_some_and(|t| t.is_keyword(Keyword::Metadata));
        if legacy && let Some(open) = self.bump() {
            self.bump();
            return self.with_option("metadata", open, args, |p, fields| {
                p.columns(fields, false)?;
                match p.eat(&TokenKind::BracketClose) {
                    Some(_) => Ok(()),
                    None => Err(p.expected("']'")),
                }
            });
        }
        Ok(())
    }

    fn show_args(&mut self, args: &mut Vec<Node>) -> PResult {
        match self.peek() {
            Some(tok) if matches!(tok.kind, TokenKind::Ident(_)) => {
                self.bump();
                args.push(Node::Identifier(Identifier {
                    name: tok.lower(),
                    location: tok.location(),
                    text: tok.text.clone(),
                }));
                Ok(())
            }
            _ => Err(self.expected("INFO")),
        }
    }

    fn stats_args(&mut self, args: &mut Vec<Node>, nested: bool) -> PResult {
        if !self.at_command_boundary(nested) && !self.at_keyword(Keyword::By) {
            self.fields(args, true)?;
        }
        match self.eat_keyword(Keyword::By) {
            Some(by) => self.with_option("by", by, args, |p, groups| p.fields(groups, false)),
            None => Ok(()),
        }
    }

    fn rename_args(&mut self, args: &mut Vec<Node>) -> PResult {
        loop {
            if self.assignment_ahead() {
                let field = self.field()?;
                push(args, field)?;
            } else {
                let old = self.expect_column(true)?;
                if old.incomplete {
                    return push(args, Node::Column(old));
                }
                let start = old.location.start;
                let mut operands = vec![Node::Column(old)];
                let outcome = match self.eat_keyword(Keyword::As) {
                    None => Err(self.expected("AS")),
                    Some(_) => self.expect_column(false).and_then(|new| {
                        let incomplete = new.incomplete;
                        operands.push(Node::Column(new));
                        if incomplete { Err(Stop) } else { Ok(()) }
                    }),
                };
                let location = Location::new(start, self.last_end());
                args.push(Node::Option(CommandOption {
                    name: "as".into(),
                    args: operands,
                    location,
                    text: self.slice(location),
                    incomplete: outcome.is_err(),
                }));
                outcome?;
            }
            if self.eat(&TokenKind::Comma).is_none() {
                return Ok(());
            }
        }
    }

    fn sort_args(&mut self, args: &mut Vec<Node>) -> PResult {
        loop {
            let expr = self.expect_expression()?;
            let start = expr.location().start;
            let mut incomplete = expr.incomplete();
            let mut direction = None;
            let mut nulls = None;
            if !incomplete {
                if self.eat_keyword(Keyword::Asc).is_some() {
                    direction = Some(SortDirection::Asc);
                } else if self.eat_keyword(Keyword::Desc).is_some() {
                    direction = Some(SortDirection::Desc);
                }
                if self.eat_keyword(Keyword::Nulls).is_some() {
                    match self.peek() {
                        Some(t) if t.is_word("first") => nulls = Some(NullsOrder::First),
                        Some(t) if t.is_word("last") => nulls = Some(NullsOrder::Last),
                        _ => {
                            self.expected("FIRST or LAST");
                            incomplete = true;
                        }
                    }
                    if nulls.is_some() {
                        self.bump();
                    }
                }
            }
            let location = Location::new(start, self.last_end());
            let order = Node::Order(Order {
                expr: Box::new(expr),
                direction,
                nulls,
                location,
                text: self.slice(location),
                incomplete,
            });
            push(args, order)?;
            if self.eat(&TokenKind::Comma).is_none() {
                return Ok(());
            }
        }
    }

    /// A bare numeric or parameter literal.
    fn number_literal(&mut self, what: &str, decimals: bool) -> PResult<Node> {
        let kind = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Integer) => LiteralKind::Integer,
            Some(TokenKind::Decimal) if decimals => LiteralKind::Decimal,
            Some(TokenKind::Param(_)) => LiteralKind::Param,
            _ => return Err(self.expected(what)),
        };
        let Some(tok) = self.bump() else {
            return Err(Stop);
        };
        let value = match &tok.kind {
            TokenKind::Param(name) => name.clone(),
            _ => tok.text.clone(),
        };
        Ok(Node::Literal(Literal {
            kind,
            value,
            location: tok.location(),
            text: tok.text.clone(),
            incomplete: false,
        }))
    }

    fn limit_args(&mut self, args: &mut Vec<Node>) -> PResult {
        let limit = self.number_literal("an integer literal", false)?;
        push(args, limit)
    }

    fn sample_args(&mut self, args: &mut Vec<Node>) -> PResult {
        let probability = self.number_literal("a probability", true)?;
        push(args, probability)
    }

    /// The quoted pattern of DISSECT and GROK.
    fn pattern(&mut self, args: &mut Vec<Node>) -> PResult {
        match self.peek() {
            Some(tok) if matches!(tok.kind, TokenKind::String { .. }) => {
                let pattern = self.expect_expression()?;
                push(args, pattern)
            }
            _ => Err(self.expected("a pattern string")),
        }
    }

    fn dissect_args(&mut self, args: &mut Vec<Node>) -> PResult {
        self.grok_args(args)?;
        while let Some(name) = self.peek().filter(|t| matches!(t.kind, TokenKind::Ident(_)))
            && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Assign)
        {
            self.bump();
            self.bump();
            let value = self.expression();
            let incomplete = value.as_ref().is_none_or(Node::incomplete);
            let location = Location::new(name.start, self.last_end());
            let option = Node::Option(CommandOption {
                name: name.lower(),
                args: value.into_iter().collect(),
                location,
                text: self.slice(location),
                incomplete,
            });
            push(args, option)?;
        }
        Ok(())
    }

    fn grok_args(&mut self, args: &mut Vec<Node>) -> PResult {
        let input = self.expect_expression()?;
        push(args, input)?;
        self.pattern(args)
    }

    fn enrich_args(&mut self, args: &mut Vec<Node>) -> PResult {
        let Some(policy) = self.source(SourceKind::Policy) else {
            return Err(self.expected("a policy name"));
        };
        push(args, Node::Source(policy))?;
        if let Some(on) = self.eat_keyword(Keyword::On) {
            self.with_option("on", on, args, |p, fields| {
                let column = p.expect_column(false)?;
                push(fields, Node::Column(column))
            })?;
        }
        if let Some(with) = self.eat_keyword(Keyword::With) {
            self.with_option("with", with, args, |p, fields| loop {
                let field = if p.assignment_ahead() {
                    p.field()?
                } else {
                    Node::Column(p.expect_column(false)?)
                };
                push(fields, field)?;
                if p.eat(&TokenKind::Comma).is_none() {
                    return Ok(());
                }
            })?;
        }
        Ok(())
    }

    fn join_args(&mut self, args: &mut Vec<Node>) -> PResult {
        let Some(index) = self.source(SourceKind::Index) else {
            return Err(self.expected("an index name"));
        };
        push(args, Node::Source(index))?;
        let Some(on) = self.eat_keyword(Keyword::On) else {
            return Err(self.expected("ON"));
        };
        self.with_option("on", on, args, |p, conditions| loop {
            let condition = p.expect_expression()?;
            push(conditions, condition)?;
            if p.eat(&TokenKind::Comma).is_none() {
                return Ok(());
            }
        })
    }

    fn fork_args(&mut self, args: &mut Vec<Node>) -> PResult {
        if !self.at(&TokenKind::ParenOpen) {
            return Err(self.expected("'(' to open a FORK branch"));
        }
        let outer = self.state;
        while let Some(open) = self.eat(&TokenKind::ParenOpen) {
            let mut branch = self.pipeline(true);
            let closed = self.eat(&TokenKind::ParenClose).is_some();
            branch.location = Location::new(open.start, self.last_end());
            if !closed {
                if !branch.incomplete && !branch.commands.iter().any(|c| c.incomplete) {
                    self.expected("')'");
                }
                branch.incomplete = true;
            }
            let incomplete = branch.incomplete;
            args.push(Node::Query(branch));
            if incomplete {
                self.state = outer;
                return Err(Stop);
            }
        }
        self.state = outer;
        Ok(())
    }

    fn change_point_args(&mut self, args: &mut Vec<Node>) -> PResult {
        let value = self.expect_column(false)?;
        push(args, Node::Column(value))?;
        if let Some(on) = self.eat_keyword(Keyword::On) {
            self.with_option("on", on, args, |p, keys| {
                let key = p.expect_column(false)?;
                push(keys, Node::Column(key))
            })?;
        }
        if let Some(as_kw) = self.eat_keyword(Keyword::As) {
            self.with_option("as", as_kw, args, |p, names| {
                let type_name = p.expect_column(false)?;
                push(names, Node::Column(type_name))?;
                if p.eat(&TokenKind::Comma).is_none() {
                    return Err(p.expected("','"));
                }
                let pvalue_name = p.expect_column(false)?;
                push(names, Node::Column(pvalue_name))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(text: &str) -> Command {
        let ParseResult { query, errors } = parse(text);
        assert!(errors.is_empty(), "{text}: {errors:?}");
        query.commands.last().cloned().expect("at least one command")
    }

    fn texts(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::text).collect()
    }

    #[test]
    fn from_with_metadata() {
        let from = command("FROM logs-*, remote:idx METADATA _id, _index");
        let sources: Vec<_> = from.positional().map(Node::text).collect();
        assert_eq!(sources, vec!["logs-*", "remote:idx"]);
        let metadata = from.option("metadata").expect("metadata option");
        assert_eq!(texts(&metadata.args), vec!["_id", "_index"]);
        assert_eq!(metadata.text, "METADATA _id, _index");
    }

    #[test]
    fn legacy_bracketed_metadata() {
        let from = command("FROM logs [METADATA _id]");
        let metadata = from.option("metadata").expect("metadata option");
        assert!(metadata.text.starts_with('['));
        assert_eq!(texts(&metadata.args), vec!["_id"]);
    }

    #[test]
    fn stats_with_filters_and_grouping() {
        let stats = command("FROM a | STATS c = count(*) WHERE x > 1, avg(b) BY host, h = bucket(t, 1 hour)");
        let aggs: Vec<_> = stats.positional().collect();
        assert_eq!(aggs.len(), 2);
        let filtered = aggs[0].as_function().expect("where wrapper");
        assert_eq!(filtered.name, "where");
        assert_eq!(filtered.args[0].as_function().map(|f| f.name.as_str()), Some("="));
        let by = stats.option("by").expect("by");
        assert_eq!(texts(&by.args), vec!["host", "h = bucket(t, 1 hour)"]);
    }

    #[test]
    fn stats_without_aggregates() {
        let stats = command("FROM a | STATS BY host");
        assert_eq!(stats.positional().count(), 0);
        assert!(stats.option("by").is_some());
        assert!(command("FROM a | STATS").args.is_empty());
    }

    #[test]
    fn rename_both_forms() {
        let rename = command("FROM a | RENAME b AS c, d = e");
        let as_form = rename.option("as").expect("as option");
        assert_eq!(texts(&as_form.args), vec!["b", "c"]);
        let assign = rename.args[1].as_function().expect("assignment");
        assert!(assign.is_assignment());
        assert_eq!(texts(&assign.args), vec!["d", "e"]);
    }

    #[test]
    fn sort_orders() {
        let sort = command("FROM a | SORT b DESC NULLS LAST, c, d ASC");
        let orders: Vec<_> = sort
            .args
            .iter()
            .map(|n| match n {
                Node::Order(o) => (o.expr.text().to_string(), o.direction, o.nulls),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            orders,
            vec![
                ("b".into(), Some(SortDirection::Desc), Some(NullsOrder::Last)),
                ("c".into(), None, None),
                ("d".into(), Some(SortDirection::Asc), None),
            ]
        );
    }

    #[test]
    fn dissect_and_grok() {
        let dissect = command("FROM a | DISSECT msg \"%{a} %{b}\" APPEND_SEPARATOR = \"-\"");
        assert_eq!(dissect.args.len(), 3);
        let option = dissect.option("append_separator").expect("option");
        assert_eq!(texts(&option.args), vec!["\"-\""]);
        let grok = command("FROM a | GROK msg \"%{IP:ip}\"");
        assert_eq!(texts(&grok.args), vec!["msg", "\"%{IP:ip}\""]);
    }

    #[test]
    fn enrich_with_mode_and_clauses() {
        let enrich = command("FROM a | ENRICH _remote:policy ON host WITH n = name, region");
        let policy = enrich.args[0].as_source().expect("policy");
        assert_eq!(policy.kind, SourceKind::Policy);
        assert_eq!(policy.cluster.as_deref(), Some("_remote"));
        assert_eq!(policy.index, "policy");
        assert_eq!(texts(&enrich.option("on").expect("on").args), vec!["host"]);
        assert_eq!(
            texts(&enrich.option("with").expect("with").args),
            vec!["n = name", "region"]
        );
    }

    #[test]
    fn join_and_change_point() {
        let join = command("FROM a | LEFT JOIN lookup_idx ON k1, k2");
        assert_eq!(join.command_type.as_deref(), Some("left"));
        assert_eq!(texts(&join.option("on").expect("on").args), vec!["k1", "k2"]);

        let cp = command("FROM a | CHANGE_POINT v ON t AS kind, p");
        assert_eq!(texts(&cp.option("as").expect("as").args), vec!["kind", "p"]);
        assert_eq!(texts(&cp.option("on").expect("on").args), vec!["t"]);
    }

    #[test]
    fn fork_branches_are_queries() {
        let fork = command("FROM a | FORK (WHERE x > 1 | LIMIT 2) (STATS count())");
        let branches: Vec<_> = fork
            .args
            .iter()
            .map(|n| match n {
                Node::Query(q) => q.commands.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(branches, vec![vec!["where", "limit"], vec!["stats"]]);
        assert_eq!(fork.args[0].location(), Location::new(14, 37));
    }

    #[test]
    fn limit_and_sample_literals() {
        let limit = command("FROM a | LIMIT 10");
        assert_eq!(limit.args[0].as_literal().and_then(Literal::as_i64), Some(10));
        let sample = command("FROM a | SAMPLE 0.25");
        assert_eq!(sample.args[0].as_literal().and_then(Literal::as_f64), Some(0.25));
        let ParseResult { errors, .. } = parse("FROM a | LIMIT x");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn show_and_mv_expand() {
        let show = command("SHOW INFO");
        assert!(matches!(&show.args[0], Node::Identifier(i) if i.name == "info"));
        let mv = command("FROM a | MV_EXPAND tags");
        assert_eq!(texts(&mv.args), vec!["tags"]);
    }

    #[test]
    fn partial_commands_keep_prefix() {
        let ParseResult { query, .. } = parse("FROM a | RENAME b AS");
        let rename = &query.commands[1];
        assert!(rename.incomplete);
        let option = rename.option("as").expect("as option");
        assert!(option.incomplete);
        assert_eq!(texts(&option.args), vec!["b"]);

        let ParseResult { query, .. } = parse("FROM a | STATS avg(b) BY ");
        let stats = &query.commands[1];
        assert!(stats.incomplete);
        assert!(stats.option("by").is_some_and(|o| o.args.is_empty()));
    }
}
