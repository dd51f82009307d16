//! FORK: runs the input through parallel branches and unions their output.
use super::*;

pub(super) const FORK: CommandDefinition = CommandDefinition {
    name: "fork",
    description: "Runs several pipelines over the same input and merges their results, tagging each row with `_fork`.",
    declaration: "FORK (<processing_commands>) (<processing_commands>) ... (<processing_commands>)",
    examples: &["FROM logs | FORK (WHERE status >= 500) (STATS count(*) BY host)"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[],
    validate: validate_fork,
    autocomplete: suggest_fork,
    columns_after: fork_columns,
};

/// Column naming the branch a row came from.
pub const FORK_COLUMN: &str = "_fork";

fn branches(command: &Command) -> impl Iterator<Item = &Query> {
    command.args.iter().filter_map(|n| match n {
        Node::Query(q) => Some(q),
        _ => None,
    })
}

fn validate_fork(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    if branches(ctx.command).count() < 2 {
        out.push(MessageId::ForkTooFewBranches.at(ctx.command.location, Params::new()));
    }
    for branch in branches(ctx.command) {
        out.extend(validate_pipeline(
            &branch.commands,
            ctx.columns.clone(),
            ctx.schema,
            ctx.license,
        ));
    }
    out
}

fn fork_columns(command: &Command, input: ColumnSet, schema: &SchemaSnapshot) -> ColumnSet {
    let mut merged = ColumnSet::known();
    let mut any = false;
    for branch in branches(command) {
        any = true;
        let produced = columns_through(&branch.commands, input.clone(), schema);
        let known = produced.is_known();
        for field in produced.iter() {
            if merged.has(&field.name) != Some(true) {
                merged.insert(field.name.clone(), field.ty, field.user_defined);
            }
        }
        if !known {
            merged.extend(ColumnSet::unknown());
        }
    }
    if !any {
        return input;
    }
    merged.insert(FORK_COLUMN, Some(FieldType::Keyword), false);
    merged
}

/// Outside the branches only `(` and, once two branches exist, the pipe.
fn suggest_fork(ctx: &SuggestContext<'_>) -> Suggestions {
    let open = Suggestion::new(SuggestionKind::Keyword, "(", "(")
        .detail("Open a new branch")
        .retrigger();
    match ctx.tokens.last().map(|t| &t.kind) {
        None => vec![open],
        Some(TokenKind::ParenClose) if branches(ctx.command).count() >= 2 => {
            vec![open, Suggestion::pipe()]
        }
        Some(TokenKind::ParenClose) => vec![open],
        Some(_) => Vec::new(),
    }
}
