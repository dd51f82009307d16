//! Cursor-aware completion over a partially typed query.
//!
//! The query is cut at the cursor and re-parsed. Command names are offered
//! at the start of a pipeline stage; anywhere else the active command's own
//! hook decides, seeing the columns produced by the commands before it.
mod context;
mod cursor;
mod suggestion;
mod suggestion_tests;

pub use context::*;
pub use cursor::*;
pub use suggestion::*;

use crate::*;
use itertools::Itertools;

/// Suggestions for the cursor position in `text`. Never fails: collaborator
/// errors only narrow the result.
pub async fn suggest<C: SchemaCallbacks + ?Sized>(
    text: &str,
    cursor: impl Into<Cursor>,
    callbacks: &C,
) -> Suggestions {
    let cursor = cursor.into();
    let offset = cursor.clamp(text);
    let prefix = &text[..offset];
    let ParseResult { query, .. } = parse(prefix);
    let schema = SchemaSnapshot::collect(&query, prefix, callbacks).await;
    let tokens = tokenize(prefix);

    let suggestions = suggest_at(prefix, &tokens, &query, &schema);
    debug!(
        "Suggesting {} candidates at {offset} (trigger {:?})",
        suggestions.len(),
        cursor.trigger()
    );
    suggestions
        .into_iter()
        .unique_by(|s| (s.text.clone(), s.label.clone()))
        .collect()
}

/// The FORK branch still open at the end of `query`, with its FORK command.
fn open_branch(query: &Query) -> Option<(&Command, &Query)> {
    let fork = query.commands.last().filter(|c| c.name == "fork")?;
    match fork.args.last() {
        Some(Node::Query(branch)) if branch.incomplete => Some((fork, branch)),
        _ => None,
    }
}

/// Where a new command name may start.
enum Position {
    Start,
    AfterPipe,
    Branch,
}

fn command_position(query: &Query, before: &[Token]) -> Option<Position> {
    let last = before.last()?;
    match last.kind {
        TokenKind::Pipe => Some(Position::AfterPipe),
        TokenKind::ParenOpen => {
            let (_, branch) = open_branch(query)?;
            (branch.location.start == last.start).then_some(Position::Branch)
        }
        _ => None,
    }
}

fn suggest_at(text: &str, tokens: &[Token], query: &Query, schema: &SchemaSnapshot) -> Suggestions {
    let cursor = text.len();
    let typing = tokens
        .last()
        .filter(|t| t.end == cursor && (t.kind.is_ident() || t.kind.keyword().is_some()));
    let before = match typing {
        Some(_) => &tokens[..tokens.len() - 1],
        None => tokens,
    };
    let range = typing.map(Token::location);

    let position = match before.last() {
        None => Some(Position::Start),
        Some(_) => command_position(query, before),
    };
    if let Some(position) = position {
        return command_suggestions(query, position, range);
    }
    if let [.., head, kind] = before
        && matches!(head.kind, TokenKind::Pipe | TokenKind::ParenOpen)
        && kind.ident().is_some_and(|k| JOIN_TYPES.contains(&k.to_ascii_lowercase().as_str()))
    {
        return vec![Suggestion::keyword("JOIN", "Join a lookup index").range(range)];
    }

    let Some(command) = query.command_at(cursor) else {
        return Vec::new();
    };
    let Some(definition) = command_definition(&command.name) else {
        trace!("No completion for unknown command [{}]", command.name);
        return Vec::new();
    };

    let columns = columns_before(query, command, schema);
    let start = tokens
        .iter()
        .position(|t| t.start >= command.name_location.end)
        .unwrap_or(tokens.len());
    let context = SuggestContext {
        text,
        cursor,
        command,
        tokens: &tokens[start..],
        columns: &columns,
        schema,
    };
    debug!(
        "Completing [{}] with {} columns in scope",
        command.display_name(),
        columns.len()
    );
    (definition.autocomplete)(&context)
}

fn command_suggestions(query: &Query, position: Position, range: Option<Location>) -> Suggestions {
    let registry = command_registry();
    let has_fork = query.commands.iter().any(|c| c.name == "fork");
    let candidates: Vec<&CommandDefinition> = match position {
        Position::Start => registry.suggestable(CommandKind::Source).collect(),
        Position::AfterPipe if open_branch(query).is_some() => registry
            .suggestable(CommandKind::Processing)
            .filter(|c| c.allowed_in_fork())
            .collect(),
        Position::AfterPipe => registry
            .suggestable(CommandKind::Processing)
            .filter(|c| !(has_fork && c.name == "fork"))
            .collect(),
        Position::Branch => registry
            .suggestable(CommandKind::Processing)
            .filter(|c| c.allowed_in_fork())
            .collect(),
    };
    candidates
        .into_iter()
        .map(|c| Suggestion::command(c).range(range))
        .collect()
}

/// Columns flowing into `command`, which is either a top-level command or
/// one inside the FORK branch being typed.
fn columns_before(query: &Query, command: &Command, schema: &SchemaSnapshot) -> ColumnSet {
    let preceding = |commands: &[Command]| -> Option<usize> {
        commands.iter().position(|c| std::ptr::eq(c, command))
    };
    if let Some(i) = preceding(&query.commands) {
        return columns_through(&query.commands[..i], ColumnSet::known(), schema);
    }
    let Some((_, branch)) = open_branch(query) else {
        return ColumnSet::unknown();
    };
    let outer = query.commands.len().saturating_sub(1);
    let input = columns_through(&query.commands[..outer], ColumnSet::known(), schema);
    let inner = preceding(&branch.commands).unwrap_or(branch.commands.len());
    columns_through(&branch.commands[..inner], input, schema)
}
