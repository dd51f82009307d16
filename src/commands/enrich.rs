//! ENRICH: adds the enrich fields of a policy, matched on a column.
use super::*;

pub(super) const ENRICH: CommandDefinition = CommandDefinition {
    name: "enrich",
    description: "Enrich table with another table.",
    declaration: "ENRICH policy [ON match_field] [WITH [new_name1 = ]field1, [new_name2 = ]field2, ...]",
    examples: &[
        "FROM logs | ENRICH hosts_policy",
        "FROM logs | ENRICH _coordinator:hosts_policy ON host WITH region, dc = datacenter",
    ],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Enrich, LocationTag::EnrichWith],
    validate: validate_enrich,
    autocomplete: suggest_enrich,
    columns_after: enrich_columns,
};

/// Accepted `mode:` prefixes of the policy name.
pub const ENRICH_MODES: [&str; 3] = ["_any", "_coordinator", "_remote"];

fn policy(command: &Command) -> Option<&Source> {
    command
        .positional()
        .next()
        .and_then(Node::as_source)
        .filter(|s| !s.incomplete)
}

/// `(new name, policy field)` of each WITH entry.
fn assignments(command: &Command) -> Vec<(String, &Column)> {
    let Some(with) = command.option("with") else {
        return Vec::new();
    };
    with.args
        .iter()
        .filter(|n| !n.incomplete())
        .filter_map(|node| match node {
            Node::Column(c) => Some((c.name.clone(), c)),
            Node::Function(f) if f.is_assignment() => match f.args.as_slice() {
                [Node::Column(target), Node::Column(field)] => Some((target.name.clone(), field)),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn validate_enrich(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    let Some(source) = policy(ctx.command) else {
        return out;
    };

    if let Some(mode) = &source.cluster
        && !ENRICH_MODES.contains(&mode.to_ascii_lowercase().as_str())
    {
        out.push(MessageId::UnsupportedSettingCommandValue.at(
            source.location,
            params! {
                "command" => "ENRICH",
                "value" => mode,
                "expected" => ENRICH_MODES.join(", "),
            },
        ));
    }

    let known = ctx.schema.policies.is_some();
    let info = ctx.schema.policy(&source.index);
    if known && info.is_none() {
        out.push(MessageId::UnknownPolicy.at(
            source.location,
            params! { "name" => source.index },
        ));
    }

    if let Some(on) = ctx.command.option("on") {
        for column in on.args.iter().filter_map(Node::as_column).filter(|c| !c.incomplete) {
            ctx.check_column(column, &mut out);
        }
    }

    if let Some(info) = info {
        for (_, field) in assignments(ctx.command) {
            if !info.enrich_fields.contains(&field.name) {
                out.push(MessageId::UnknownColumn.at(
                    field.location,
                    params! { "name" => field.name },
                ));
            }
        }
    }
    out
}

fn enrich_columns(command: &Command, mut columns: ColumnSet, schema: &SchemaSnapshot) -> ColumnSet {
    let Some(source) = policy(command) else {
        return columns;
    };
    let typed = schema.policy_columns.get(&source.index);
    let typed_as = |name: &str| {
        typed
            .and_then(|cols| cols.iter().find(|c| c.name == name))
            .map(ColumnInfo::field_type)
    };

    let fields = assignments(command);
    if !fields.is_empty() {
        for (name, field) in fields {
            columns.insert(name, typed_as(&field.name), true);
        }
        return columns;
    }
    match (typed, schema.policy(&source.index)) {
        (Some(typed), _) => {
            for column in typed {
                columns.insert(column.name.clone(), Some(column.field_type()), true);
            }
        }
        (None, Some(info)) => {
            for name in &info.enrich_fields {
                columns.insert(name.clone(), None, true);
            }
        }
        (None, None) => columns.extend(ColumnSet::unknown()),
    }
    columns
}

fn suggest_enrich(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let before = word.before;
    let enrich_fields = |range: Option<Location>| -> Suggestions {
        let Some(source) = policy(ctx.command) else {
            return Vec::new();
        };
        let typed = ctx.schema.policy_columns.get(&source.index);
        let names = ctx
            .schema
            .policy(&source.index)
            .map(|p| p.enrich_fields.clone())
            .unwrap_or_default();
        names
            .into_iter()
            .map(|name| {
                let ty = typed
                    .and_then(|cols| cols.iter().find(|c| c.name == name))
                    .map(ColumnInfo::field_type);
                Suggestion::column(&Field::new(name, ty)).range(range)
            })
            .collect()
    };

    match ctx.clause(before, &[Keyword::On, Keyword::With]) {
        None => {
            let source = ctx.source();
            if !source.before.is_empty() {
                return vec![
                    Suggestion::keyword("ON", "Match field"),
                    Suggestion::keyword("WITH", "Enrich fields"),
                    Suggestion::pipe(),
                ];
            }
            let mut out: Suggestions = ctx
                .schema
                .policies
                .iter()
                .flatten()
                .map(|p| Suggestion::policy(p).range(source.range))
                .collect();
            if source.text.starts_with('_') && !source.text.contains(':') {
                out.extend(ENRICH_MODES.iter().map(|mode| {
                    Suggestion::value(format!("{mode}:"), "Enrich mode")
                        .retrigger()
                        .range(source.range)
                }));
            }
            out
        }
        Some((Keyword::On, i)) => {
            if before.len() == i + 1 {
                ctx.column_suggestions(ParamType::Any, &[], word.range)
            } else {
                vec![Suggestion::keyword("WITH", "Enrich fields"), Suggestion::pipe()]
            }
        }
        Some(_) => {
            let (rest, path) = trailing_path(before);
            let marker = rest.last().map(|t| &t.kind);
            match (path.is_empty(), marker) {
                (true, Some(TokenKind::Keyword(Keyword::With) | TokenKind::Comma))
                | (true, Some(TokenKind::Assign)) => enrich_fields(word.range),
                (false, Some(TokenKind::Keyword(Keyword::With) | TokenKind::Comma)) => vec![
                    Suggestion::assign(),
                    Suggestion::comma(),
                    Suggestion::pipe(),
                ],
                (false, Some(TokenKind::Assign)) => vec![Suggestion::comma(), Suggestion::pipe()],
                _ => Vec::new(),
            }
        }
    }
}
