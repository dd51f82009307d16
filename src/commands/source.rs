//! Source commands: FROM, TS, ROW and SHOW.
use super::*;

/// Metadata fields FROM can expose, with their types.
pub(crate) const METADATA_FIELDS: [(&str, FieldType); 7] = [
    ("_version", FieldType::Long),
    ("_id", FieldType::Keyword),
    ("_index", FieldType::Keyword),
    ("_source", FieldType::Unsupported),
    ("_ignored", FieldType::Keyword),
    ("_index_mode", FieldType::Keyword),
    ("_score", FieldType::Double),
];

pub(super) const FROM: CommandDefinition = CommandDefinition {
    name: "from",
    description: "Retrieves data from one or more data streams, indices, or aliases.",
    declaration: "FROM index_pattern [METADATA fields]",
    examples: &["FROM logs", "FROM logs-*", "FROM logs-*, metrics-* METADATA _id"],
    kind: CommandKind::Source,
    hidden: false,
    types: &[],
    license: None,
    locations: &[],
    validate: validate_sources,
    autocomplete: suggest_sources,
    columns_after: source_columns,
};

pub(super) const TS: CommandDefinition = CommandDefinition {
    name: "ts",
    description: "Retrieves data from one or more time series indices.",
    declaration: "TS index_pattern [METADATA fields]",
    examples: &["TS metrics"],
    hidden: true,
    ..FROM
};

pub(super) const ROW: CommandDefinition = CommandDefinition {
    name: "row",
    description: "Produces a row with one or more columns with values that you specify.",
    declaration: "ROW column1 = value1[, ..., columnN = valueN]",
    examples: &["ROW a = 1, b = \"two\", c = null"],
    kind: CommandKind::Source,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Row],
    validate: validate_row,
    autocomplete: suggest_row,
    columns_after: row_columns,
};

pub(super) const SHOW: CommandDefinition = CommandDefinition {
    name: "show",
    description: "Returns information about the deployment and its capabilities.",
    declaration: "SHOW INFO",
    examples: &["SHOW INFO"],
    kind: CommandKind::Source,
    hidden: false,
    types: &[],
    license: None,
    locations: &[],
    validate: no_validation,
    autocomplete: suggest_show,
    columns_after: show_columns,
};

fn source_exists(source: &Source, known: &[SourceInfo]) -> bool {
    if source.index.contains('*') {
        return known.iter().any(|s| glob_match(&source.index, &s.name));
    }
    known
        .iter()
        .any(|s| s.name == source.name || s.name == source.index)
}

fn validate_sources(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    if let Some(known) = &ctx.schema.sources {
        for source in ctx.command.positional().filter_map(Node::as_source) {
            if source.incomplete || source.cluster.is_some() {
                continue;
            }
            if !source_exists(source, known) {
                out.push(MessageId::UnknownIndex.at(
                    source.location,
                    params! { "name" => source.name },
                ));
            }
        }
    }

    if let Some(metadata) = ctx.command.option("metadata") {
        if metadata.text.starts_with('[') {
            out.push(MessageId::MetadataBracketsDeprecation.at(metadata.location, Params::new()));
        }
        let available = METADATA_FIELDS.map(|(name, _)| name);
        for field in metadata.args.iter().filter_map(Node::as_column) {
            if !available.contains(&field.name.as_str()) {
                out.push(MessageId::UnknownMetadataField.at(
                    field.location,
                    params! { "value" => field.name, "available" => available.join(", ") },
                ));
            }
        }
    }
    out
}

fn source_columns(command: &Command, _: ColumnSet, schema: &SchemaSnapshot) -> ColumnSet {
    let mut columns = ColumnSet::from_schema(schema.columns.as_deref());
    if let Some(metadata) = command.option("metadata") {
        for field in metadata.args.iter().filter_map(Node::as_column) {
            if let Some((name, ty)) = METADATA_FIELDS.iter().find(|(n, _)| *n == field.name) {
                columns.insert(*name, Some(*ty), false);
            }
        }
    }
    columns
}

fn suggest_sources(ctx: &SuggestContext<'_>) -> Suggestions {
    let command = ctx.command;
    if ctx.tokens.iter().any(|t| t.is_keyword(Keyword::Metadata)) {
        let word = ctx.word();
        let listed = command
            .option("metadata")
            .map(|m| ctx.used_columns(&m.args, word.range))
            .unwrap_or_default();
        return match word.previous() {
            Some(prev) if prev.is_keyword(Keyword::Metadata) || prev.kind == TokenKind::Comma => {
                METADATA_FIELDS
                    .iter()
                    .filter(|(name, _)| !listed.contains(name))
                    .map(|(name, ty)| {
                        Suggestion::new(SuggestionKind::Column, *name, *name)
                            .detail(ty.to_string())
                            .range(word.range)
                    })
                    .collect()
            }
            Some(prev) if ends_operand(prev) => vec![Suggestion::comma(), Suggestion::pipe()],
            _ => Vec::new(),
        };
    }

    let part = ctx.source();
    if part.previous().is_some_and(|t| t.kind != TokenKind::Comma) {
        return vec![
            Suggestion::keyword("METADATA", "Add metadata fields to the results"),
            Suggestion::comma(),
            Suggestion::pipe(),
        ];
    }

    let limit = part.range.map_or(ctx.cursor, |r| r.start);
    let listed: Vec<&str> = command
        .positional()
        .filter_map(Node::as_source)
        .filter(|s| s.location.end < limit)
        .map(|s| s.name.as_str())
        .collect();
    let show_hidden = part.text.starts_with('.');
    let known = ctx.schema.sources.as_deref().unwrap_or_default();
    let mut out: Suggestions = known
        .iter()
        .filter(|s| show_hidden || !s.hidden)
        .filter(|s| !listed.contains(&s.name.as_str()))
        .map(|s| Suggestion::source(s).range(part.range).retrigger())
        .collect();

    let typed = part.text.trim_matches('"');
    let complete = typed.contains('*') || known.iter().any(|s| s.name == typed);
    if complete {
        for (suffix, detail) in [(" | ", "Pipe (|)"), (", ", "Comma (,)"), (" METADATA ", "Add metadata")] {
            out.push(
                Suggestion::new(
                    SuggestionKind::Source,
                    part.text,
                    format!("{}{suffix}", part.text),
                )
                .detail(detail)
                .filter(part.text)
                .range(part.range)
                .retrigger(),
            );
        }
    }
    out
}

fn validate_row(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    check_fields(ctx, &ctx.command.args, LocationTag::Row, &mut out);
    out
}

fn row_columns(command: &Command, _: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    with_fields(command, &command.args, ColumnSet::known())
}

fn suggest_row(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    ctx.expression(
        LocationTag::Row,
        word.before,
        vec![Suggestion::comma(), Suggestion::pipe()],
    )
}

fn show_columns(_: &Command, _: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    ["version", "date", "hash"]
        .into_iter()
        .map(|name| Field {
            name: name.into(),
            ty: Some(FieldType::Keyword),
            user_defined: false,
        })
        .collect()
}

fn suggest_show(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    match word.previous() {
        None => vec![
            Suggestion::new(SuggestionKind::Keyword, "INFO", "INFO")
                .detail("Get information about the Elasticsearch cluster")
                .range(word.range),
        ],
        Some(_) => vec![Suggestion::pipe()],
    }
}
