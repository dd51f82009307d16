//! Ordering and row count commands: SORT, LIMIT and SAMPLE.
use super::*;

pub(super) const SORT: CommandDefinition = CommandDefinition {
    name: "sort",
    description: "Sorts all results by the specified fields.",
    declaration: "SORT column1 [ASC/DESC][NULLS FIRST/NULLS LAST][, ..., columnN [ASC/DESC][NULLS FIRST/NULLS LAST]]",
    examples: &[
        "FROM logs | SORT @timestamp DESC",
        "FROM logs | SORT bytes ASC NULLS FIRST, host",
    ],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Sort],
    validate: validate_sort,
    autocomplete: suggest_sort,
    columns_after: same_columns,
};

pub(super) const LIMIT: CommandDefinition = CommandDefinition {
    name: "limit",
    description: "Returns the first search results, in query order, up to the specified maximum.",
    declaration: "LIMIT max_number_of_rows",
    examples: &["FROM logs | LIMIT 100"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[],
    validate: no_validation,
    autocomplete: suggest_limit,
    columns_after: same_columns,
};

pub(super) const SAMPLE: CommandDefinition = CommandDefinition {
    name: "sample",
    description: "Samples a fraction of the table rows.",
    declaration: "SAMPLE probability",
    examples: &["FROM logs | SAMPLE 0.1"],
    validate: validate_sample,
    autocomplete: suggest_sample,
    ..LIMIT
};

fn validate_sort(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    for order in ctx.command.args.iter().filter(|n| !n.incomplete()) {
        let expr = match order {
            Node::Order(o) => &*o.expr,
            other => other,
        };
        ctx.check_expression(expr, LocationTag::Sort, &mut out);
    }
    out
}

fn ordering() -> Suggestions {
    vec![
        Suggestion::keyword("ASC", "Ascending order"),
        Suggestion::keyword("DESC", "Descending order"),
    ]
}

fn null_ordering() -> Suggestions {
    vec![
        Suggestion::keyword("NULLS FIRST", "Nulls first"),
        Suggestion::keyword("NULLS LAST", "Nulls last"),
    ]
}

fn suggest_sort(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let before = word.before;
    let end = || vec![Suggestion::comma(), Suggestion::pipe()];
    match before {
        [.., last] if last.is_keyword(Keyword::Nulls) => vec![
            Suggestion::keyword("FIRST", "Nulls first").range(word.range),
            Suggestion::keyword("LAST", "Nulls last").range(word.range),
        ],
        [.., nulls, last]
            if nulls.is_keyword(Keyword::Nulls)
                && (last.is_word("first") || last.is_word("last")) =>
        {
            end()
        }
        [.., last] if last.is_keyword(Keyword::Asc) || last.is_keyword(Keyword::Desc) => {
            null_ordering().into_iter().chain(end()).collect()
        }
        _ => {
            let follow = ordering().into_iter().chain(null_ordering()).chain(end()).collect();
            ctx.expression(LocationTag::Sort, before, follow)
                .into_iter()
                .map(|s| match s.kind {
                    SuggestionKind::Column => s.retrigger(),
                    _ => s,
                })
                .collect()
        }
    }
}

fn suggest_limit(ctx: &SuggestContext<'_>) -> Suggestions {
    match ctx.word().previous() {
        None => ["10", "100", "1000"]
            .into_iter()
            .map(|n| Suggestion::value(format!("{n} "), "Row count").retrigger())
            .collect(),
        Some(prev) if ends_operand(prev) => vec![Suggestion::pipe()],
        Some(_) => Vec::new(),
    }
}

fn validate_sample(ctx: &CommandContext<'_>) -> Vec<Message> {
    let Some(literal) = ctx.command.args.first().and_then(Node::as_literal) else {
        return Vec::new();
    };
    if literal.kind == LiteralKind::Param {
        return Vec::new();
    }
    match literal.as_f64() {
        Some(p) if p > 0.0 && p < 1.0 => Vec::new(),
        _ => vec![MessageId::InvalidSampleProbability.at(
            literal.location,
            params! { "value" => literal.text },
        )],
    }
}

fn suggest_sample(ctx: &SuggestContext<'_>) -> Suggestions {
    match ctx.word().previous() {
        None => [".001", ".01", ".1"]
            .into_iter()
            .map(|p| Suggestion::value(format!("{p} "), "Sampling probability").retrigger())
            .collect(),
        Some(prev) if ends_operand(prev) => vec![Suggestion::pipe()],
        Some(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample(text: &str) -> Vec<Message> {
        let query = parse(text).query;
        let command = &query.commands[1];
        let columns = ColumnSet::unknown();
        let schema = SchemaSnapshot::default();
        validate_sample(&CommandContext {
            command,
            columns: &columns,
            schema: &schema,
            license: None,
        })
    }

    #[rstest]
    #[case("FROM a | SAMPLE 0.5", 0)]
    #[case("FROM a | SAMPLE .001", 0)]
    #[case("FROM a | SAMPLE ?p", 0)]
    #[case("FROM a | SAMPLE 1", 1)]
    #[case("FROM a | SAMPLE 0", 1)]
    #[case("FROM a | SAMPLE 1.5", 1)]
    fn sample_probability_bounds(#[case] text: &str, #[case] errors: usize) {
        let messages = sample(text);
        assert_eq!(messages.len(), errors, "{text}: {messages:?}");
        assert!(messages.iter().all(|m| m.code == MessageId::InvalidSampleProbability));
    }
}
