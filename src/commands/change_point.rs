//! CHANGE_POINT: detects spikes, dips and trend changes in a numeric column.
use super::*;

pub(super) const CHANGE_POINT: CommandDefinition = CommandDefinition {
    name: "change_point",
    description: "Detects spikes, dips, and change points in a metric.",
    declaration: "CHANGE_POINT value [ON key] [AS type_name, pvalue_name]",
    examples: &[
        "FROM metrics | STATS avg = AVG(cpu) BY bucket = BUCKET(@timestamp, 1 hour) | CHANGE_POINT avg ON bucket",
        "FROM metrics | CHANGE_POINT cpu ON @timestamp AS kind, p",
    ],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: Some(LicenseTier::Platinum),
    locations: &[],
    validate: validate_change_point,
    autocomplete: suggest_change_point,
    columns_after: change_point_columns,
};

const DEFAULT_NAMES: (&str, &str) = ("type", "pvalue");

fn validate_change_point(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    let Some(value) = ctx
        .command
        .positional()
        .find_map(Node::as_column)
        .filter(|c| !c.incomplete)
    else {
        return out;
    };
    if ctx.check_column(value, &mut out)
        && let Some(given) = ctx.columns.get(&value.name).and_then(|f| f.ty)
        && !given.is_numeric()
    {
        out.push(MessageId::UnsupportedColumnTypeForCommand.at(
            value.location,
            params! {
                "command" => "CHANGE_POINT",
                "expected" => "double, long, integer",
                "column" => value.name,
                "given" => given,
            },
        ));
    }
    if let Some(on) = ctx.command.option("on") {
        for key in on.args.iter().filter_map(Node::as_column).filter(|c| !c.incomplete) {
            ctx.check_column(key, &mut out);
        }
    }
    out
}

fn change_point_columns(command: &Command, mut columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    let names: Vec<&str> = command
        .option("as")
        .filter(|o| !o.incomplete)
        .map(|o| o.args.iter().filter_map(Node::as_column).map(|c| c.name.as_str()).collect())
        .unwrap_or_default();
    let (type_name, pvalue_name) = match names.as_slice() {
        [t, p] => (*t, *p),
        _ => DEFAULT_NAMES,
    };
    columns.insert(type_name, Some(FieldType::Keyword), true);
    columns.insert(pvalue_name, Some(FieldType::Double), true);
    columns
}

fn suggest_change_point(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let before = word.before;
    let end = |keywords: &[(&str, &str)]| -> Suggestions {
        keywords
            .iter()
            .map(|(kw, detail)| Suggestion::keyword(kw, detail))
            .chain([Suggestion::pipe()])
            .collect()
    };
    match ctx.clause(before, &[Keyword::On, Keyword::As]) {
        None if before.is_empty() => ctx.column_suggestions(ParamType::Number, &[], word.range),
        None => end(&[("ON", "Key column"), ("AS", "Output column names")]),
        Some((Keyword::On, i)) if before.len() == i + 1 => {
            ctx.column_suggestions(ParamType::Any, &[], word.range)
        }
        Some((Keyword::On, _)) => end(&[("AS", "Output column names")]),
        Some((_, i)) => match &before[i + 1..] {
            [] => vec![
                Suggestion::value(format!("{}, {} ", DEFAULT_NAMES.0, DEFAULT_NAMES.1), "Default names"),
            ],
            [name] if name.kind.is_ident() => vec![Suggestion::comma()],
            [_, comma, name] if comma.kind == TokenKind::Comma && name.kind.is_ident() => {
                vec![Suggestion::pipe()]
            }
            _ => Vec::new(),
        },
    }
}
