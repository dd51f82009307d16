//! `LOOKUP JOIN`: adds the columns of a lookup index matched on key columns.
use super::*;

pub(super) const JOIN: CommandDefinition = CommandDefinition {
    name: "join",
    description: "Join a table with another table.",
    declaration: "LOOKUP JOIN lookup_index ON join_condition",
    examples: &[
        "FROM employees | LOOKUP JOIN languages_lookup ON language_code",
        "FROM logs | LOOKUP JOIN hosts_lookup ON host, dc",
    ],
    kind: CommandKind::Processing,
    hidden: false,
    types: &["lookup", "left", "right"],
    license: None,
    locations: &[LocationTag::Join],
    validate: validate_join,
    autocomplete: suggest_join,
    columns_after: join_columns,
};

fn index(command: &Command) -> Option<&Source> {
    command
        .positional()
        .next()
        .and_then(Node::as_source)
        .filter(|s| !s.incomplete)
}

/// Columns of the lookup index, when they were fetched.
fn lookup_columns(command: &Command, schema: &SchemaSnapshot) -> ColumnSet {
    let columns = index(command).and_then(|s| schema.join_columns.get(&s.index));
    ColumnSet::from_schema(columns.map(Vec::as_slice))
}

fn validate_join(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    let Some(source) = index(ctx.command) else {
        return out;
    };
    if let Some(valid) = &ctx.schema.join_indices
        && !valid.iter().any(|s| s.name == source.index || s.name == source.name)
    {
        out.push(MessageId::InvalidJoinIndex.at(
            source.location,
            params! { "identifier" => source.text },
        ));
        return out;
    }

    let Some(on) = ctx.command.option("on") else {
        return out;
    };
    let mut columns = ctx.columns.clone();
    columns.extend(lookup_columns(ctx.command, ctx.schema));
    let scope = CommandContext {
        columns: &columns,
        ..*ctx
    };
    for condition in on.args.iter().filter(|n| !n.incomplete()) {
        scope.check_expression(condition, LocationTag::Join, &mut out);
    }
    out
}

fn join_columns(command: &Command, mut columns: ColumnSet, schema: &SchemaSnapshot) -> ColumnSet {
    if index(command).is_none() {
        return columns;
    }
    let keys: Vec<&str> = command
        .option("on")
        .map(|on| on.args.iter().filter_map(Node::as_column).map(|c| c.name.as_str()).collect())
        .unwrap_or_default();
    let lookup = lookup_columns(command, schema);
    let known = lookup.is_known();
    for field in lookup.iter().filter(|f| !keys.contains(&f.name.as_str())) {
        columns.insert(field.name.clone(), field.ty, false);
    }
    if !known {
        columns.extend(ColumnSet::unknown());
    }
    columns
}

fn suggest_join(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let before = word.before;
    let Some((_, i)) = ctx.clause(before, &[Keyword::On]) else {
        let source = ctx.source();
        if !source.before.is_empty() {
            return vec![Suggestion::keyword("ON", "Join condition")];
        }
        return ctx
            .schema
            .join_indices
            .iter()
            .flatten()
            .map(|s| Suggestion::source(s).retrigger().range(source.range))
            .map(|s| Suggestion { text: format!("{} ", s.text), ..s })
            .collect();
    };

    let lookup = lookup_columns(ctx.command, ctx.schema);
    let after_on = &before[i + 1..];
    match after_on.last() {
        None | Some(Token { kind: TokenKind::Comma, .. }) => {
            let shared: ColumnSet = if lookup.is_known() {
                ctx.columns
                    .iter()
                    .filter(|f| lookup.has(&f.name) == Some(true))
                    .cloned()
                    .collect()
            } else {
                ctx.columns.clone()
            };
            let scope = SuggestContext {
                columns: &shared,
                ..*ctx
            };
            scope
                .column_suggestions(ParamType::Any, &[], word.range)
                .into_iter()
                .map(|s| s.detail("Join key"))
                .collect()
        }
        Some(prev) if ends_operand(prev) => {
            let mut columns = ctx.columns.clone();
            columns.extend(lookup);
            let scope = SuggestContext {
                columns: &columns,
                ..*ctx
            };
            scope.expression(
                LocationTag::Join,
                before,
                vec![Suggestion::comma(), Suggestion::pipe()],
            )
        }
        Some(_) => ctx.expression(LocationTag::Join, before, Vec::new()),
    }
}
