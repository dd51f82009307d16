//! Column selection commands: KEEP, DROP, RENAME and MV_EXPAND.
use super::*;

pub(super) const KEEP: CommandDefinition = CommandDefinition {
    name: "keep",
    description: "Rearranges fields in the input table by applying the keep clauses in fields.",
    declaration: "KEEP column1[, ..., columnN]",
    examples: &["FROM logs | KEEP @timestamp, host, message", "FROM logs | KEEP host.*"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[],
    validate: validate_keep,
    autocomplete: suggest_column_list,
    columns_after: keep_columns,
};

pub(super) const DROP: CommandDefinition = CommandDefinition {
    name: "drop",
    description: "Drops columns.",
    declaration: "DROP column1[, ..., columnN]",
    examples: &["FROM logs | DROP message", "FROM logs | DROP tmp_*"],
    validate: validate_drop,
    columns_after: drop_columns,
    ..KEEP
};

pub(super) const RENAME: CommandDefinition = CommandDefinition {
    name: "rename",
    description: "Renames an old column to a new one.",
    declaration: "RENAME old1 AS new1[, ..., oldN AS newN]",
    examples: &["FROM logs | RENAME host AS hostname", "FROM logs | RENAME hostname = host"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Rename],
    validate: validate_rename,
    autocomplete: suggest_rename,
    columns_after: rename_columns,
};

pub(super) const MV_EXPAND: CommandDefinition = CommandDefinition {
    name: "mv_expand",
    description: "Expands multivalued fields into one row per value, duplicating other fields.",
    declaration: "MV_EXPAND column",
    examples: &["ROW a = [1, 2, 3] | MV_EXPAND a"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[],
    validate: validate_mv_expand,
    autocomplete: suggest_single_column,
    columns_after: same_columns,
};

fn patterns(command: &Command) -> Vec<&Column> {
    command
        .args
        .iter()
        .filter_map(Node::as_column)
        .filter(|c| !c.incomplete)
        .collect()
}

fn check_patterns(ctx: &CommandContext<'_>, out: &mut Vec<Message>) {
    for column in patterns(ctx.command) {
        if !column.name.contains('*') {
            ctx.check_column(column, out);
        } else if ctx.columns.is_known() && ctx.columns.matching(&column.name).next().is_none() {
            out.push(MessageId::UnknownColumn.at(
                column.location,
                params! { "name" => column.name },
            ));
        }
    }
}

fn validate_keep(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    check_patterns(ctx, &mut out);
    out
}

fn validate_drop(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    if let Some(all) = patterns(ctx.command).into_iter().find(|c| c.name == "*") {
        out.push(MessageId::DropAllColumnsError.at(all.location, Params::new()));
        return out;
    }
    check_patterns(ctx, &mut out);
    out
}

fn keep_columns(command: &Command, mut columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    let names: Vec<&str> = patterns(command).iter().map(|c| c.name.as_str()).collect();
    columns.keep(&names);
    columns
}

fn drop_columns(command: &Command, mut columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    let names: Vec<&str> = patterns(command).iter().map(|c| c.name.as_str()).collect();
    columns.drop(&names);
    columns
}

/// KEEP and DROP: columns not listed yet, then `, ` or `| `.
fn suggest_column_list(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    match word.previous() {
        Some(prev) if prev.kind != TokenKind::Comma => {
            if ends_operand(prev) || prev.kind == TokenKind::Star {
                vec![Suggestion::comma(), Suggestion::pipe()]
            } else {
                Vec::new()
            }
        }
        _ => {
            let listed = ctx.used_columns(&ctx.command.args, word.range);
            ctx.column_suggestions(ParamType::Any, &listed, word.range)
        }
    }
}

/// `(old, new)` of each rename clause.
fn renames(command: &Command) -> Vec<(&Column, &Column)> {
    command
        .args
        .iter()
        .filter(|n| !n.incomplete())
        .filter_map(|node| {
            let (args, swapped) = match node {
                Node::Option(o) if o.name == "as" => (&o.args, false),
                Node::Function(f) if f.is_assignment() => (&f.args, true),
                _ => return None,
            };
            match args.as_slice() {
                [Node::Column(a), Node::Column(b)] if swapped => Some((b, a)),
                [Node::Column(a), Node::Column(b)] => Some((a, b)),
                _ => None,
            }
        })
        .collect()
}

fn validate_rename(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    let mut columns = ctx.columns.clone();
    for (old, new) in renames(ctx.command) {
        if let Some(wildcard) = [old, new].into_iter().find(|c| c.name.contains('*')) {
            out.push(MessageId::WildcardNotSupportedForCommand.at(
                wildcard.location,
                params! { "command" => "RENAME", "value" => wildcard.text },
            ));
            continue;
        }
        if columns.has(&old.name) == Some(false) {
            out.push(MessageId::UnknownColumn.at(
                old.location,
                params! { "name" => old.name },
            ));
            continue;
        }
        columns.rename(&old.name, &new.name);
    }
    out
}

fn rename_columns(command: &Command, mut columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    for (old, new) in renames(command) {
        if columns.has(&old.name) != Some(false) {
            columns.rename(&old.name, &new.name);
        }
    }
    columns
}

fn suggest_rename(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let columns = || ctx.column_suggestions(ParamType::Any, &[], word.range);
    let (rest, path) = trailing_path(word.before);
    if path.is_empty() {
        return match rest.last().map(|t| &t.kind) {
            // AS or = always follows the old name.
            None | Some(TokenKind::Comma) => {
                columns().into_iter().map(Suggestion::retrigger).collect()
            }
            Some(TokenKind::Assign) => columns(),
            _ => Vec::new(),
        };
    }
    match rest.last().map(|t| &t.kind) {
        None | Some(TokenKind::Comma) => vec![
            Suggestion::keyword("AS", "Rename the column"),
            Suggestion::assign(),
        ],
        Some(TokenKind::Keyword(Keyword::As)) | Some(TokenKind::Assign) => {
            vec![Suggestion::comma(), Suggestion::pipe()]
        }
        _ => Vec::new(),
    }
}

fn validate_mv_expand(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    for column in patterns(ctx.command) {
        ctx.check_column(column, &mut out);
    }
    out
}

/// A single column, then the pipe.
pub(super) fn suggest_single_column(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    match word.previous() {
        None => ctx.column_suggestions(ParamType::Any, &[], word.range),
        Some(prev) if ends_operand(prev) => vec![Suggestion::pipe()],
        Some(_) => Vec::new(),
    }
}
