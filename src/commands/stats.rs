//! Aggregating commands: STATS and INLINESTATS.
use super::transform::naming_field;
use super::*;

pub(super) const STATS: CommandDefinition = CommandDefinition {
    name: "stats",
    description: "Groups rows according to a common value and calculates one or more aggregated values over the grouped rows.",
    declaration: "STATS [column1 =] expression1 [WHERE boolean_expression1][, ...] [BY grouping_expression1[, ...]]",
    examples: &[
        "FROM logs | STATS count = COUNT(*) BY host",
        "FROM logs | STATS avg(bytes) WHERE status >= 500",
    ],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Stats, LocationTag::StatsBy, LocationTag::StatsWhere],
    validate: validate_stats,
    autocomplete: suggest_stats,
    columns_after: stats_columns,
};

pub(super) const INLINESTATS: CommandDefinition = CommandDefinition {
    name: "inlinestats",
    description: "Calculates aggregated values and appends them to every row of the group.",
    declaration: "INLINESTATS [column1 =] expression1[, ...] [BY grouping_expression1[, ...]]",
    examples: &["FROM logs | INLINESTATS max_bytes = MAX(bytes) BY host"],
    hidden: true,
    columns_after: inline_stats_columns,
    ..STATS
};

/// The value of a stats field, without its name and filter.
fn aggregate_value(node: &Node) -> &Node {
    let field = match node {
        Node::Function(f) if f.name == "where" && f.subtype == FunctionSubtype::Binary => {
            f.args.first().unwrap_or(node)
        }
        _ => node,
    };
    field_parts(field).1
}

fn validate_stats(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    let command = ctx.command;
    let display = command.display_name();
    if command.args.is_empty() {
        out.push(MessageId::StatsNoArguments.at(
            command.location,
            params! { "command" => display },
        ));
        return out;
    }

    for field in command.positional().filter(|n| !n.incomplete()) {
        let before = out.len();
        ctx.check_expression(field, LocationTag::Stats, &mut out);
        if out.len() > before {
            continue;
        }
        let value = aggregate_value(field);
        if !contains_agg(value) {
            out.push(MessageId::NoAggFunction.at(
                value.location(),
                params! { "command" => display, "expression" => value.text() },
            ));
        } else if !is_agg_closed(value) {
            out.push(MessageId::ExpressionNotAggClosed.at(
                value.location(),
                params! { "command" => display, "expression" => value.text() },
            ));
        }
    }

    if let Some(by) = command.option("by") {
        check_fields(ctx, &by.args, LocationTag::StatsBy, &mut out);
    }
    out
}

fn aggregates(command: &Command, input: &ColumnSet) -> ColumnSet {
    let mut out = ColumnSet::known();
    for field in command.positional().filter(|n| !n.incomplete()) {
        let named = match field {
            Node::Function(f) if f.name == "where" => f.args.first().unwrap_or(field),
            _ => field,
        };
        let (name, value) = field_parts(named);
        out.insert(name, type_of(value, command, input), true);
    }
    if let Some(by) = command.option("by") {
        for group in by.args.iter().filter(|n| !n.incomplete()) {
            let (name, value) = field_parts(group);
            let ty = match value {
                Node::Column(c) => input.get(&c.name).and_then(|f| f.ty),
                _ => type_of(value, command, input),
            };
            let user_defined = !matches!(group, Node::Column(_));
            out.insert(name, ty, user_defined);
        }
    }
    out
}

fn stats_columns(command: &Command, input: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    aggregates(command, &input)
}

fn inline_stats_columns(command: &Command, input: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    let added = aggregates(command, &input);
    let mut columns = input;
    columns.extend(added);
    columns
}

/// True if a comma outside parentheses follows token `from`.
fn field_ended(before: &[Token], from: usize) -> bool {
    let mut depth = 0i32;
    for tok in &before[from + 1..] {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth -= 1,
            TokenKind::Comma if depth <= 0 => return true,
            _ => {}
        }
    }
    false
}

fn suggest_stats(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let before = word.before;
    match ctx.clause(before, &[Keyword::By, Keyword::Where]) {
        Some((Keyword::By, _)) => {
            let mut out = ctx.expression(
                LocationTag::StatsBy,
                before,
                vec![Suggestion::comma(), Suggestion::pipe()],
            );
            if naming_field(before) {
                out.insert(0, Suggestion::assign().range(word.range));
            }
            out
        }
        Some((Keyword::Where, i)) if !field_ended(before, i) => ctx.expression(
            LocationTag::StatsWhere,
            before,
            vec![
                Suggestion::comma(),
                Suggestion::keyword("BY", "Group by"),
                Suggestion::pipe(),
            ],
        ),
        _ => {
            let mut out = ctx.expression(
                LocationTag::Stats,
                before,
                vec![
                    Suggestion::comma(),
                    Suggestion::keyword("BY", "Group by"),
                    Suggestion::keyword("WHERE", "Filter the aggregation"),
                    Suggestion::pipe(),
                ],
            );
            let field_start = before
                .last()
                .is_none_or(|t| matches!(t.kind, TokenKind::Comma | TokenKind::Assign));
            if field_start && !ctx.nested(before) {
                out.retain(|s| s.kind != SuggestionKind::Column);
                if before.is_empty() {
                    out.push(Suggestion::keyword("BY", "Group by").range(word.range));
                }
            }
            if naming_field(before) {
                out.insert(0, Suggestion::assign().range(word.range));
            }
            out
        }
    }
}
