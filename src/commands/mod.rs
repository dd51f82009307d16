//! Pipeline command catalog.
//!
//! Each command is a data record plus three pure hooks: `validate` checks
//! one parsed command against the columns flowing into it, `autocomplete`
//! proposes what may follow the cursor inside it, and `columns_after`
//! computes the columns it hands to the next command.
mod change_point;
mod enrich;
mod fork;
mod join;
mod patterns;
mod projection;
mod sort;
mod source;
mod stats;
mod transform;

use crate::*;
use std::{collections::HashMap, fmt, sync::LazyLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CommandKind {
    /// Produces rows; only valid as the first command.
    #[display("source")]
    Source,
    #[display("processing")]
    Processing,
}

/// Inputs of a command's `validate` hook.
pub struct CommandContext<'a> {
    pub command: &'a Command,
    /// Columns flowing into the command.
    pub columns: &'a ColumnSet,
    pub schema: &'a SchemaSnapshot,
    /// Caller license; `None` skips license checks.
    pub license: Option<LicenseTier>,
}

pub type ValidateFn = fn(&CommandContext<'_>) -> Vec<Message>;
pub type AutocompleteFn = fn(&SuggestContext<'_>) -> Suggestions;
pub type ColumnsAfterFn = fn(&Command, ColumnSet, &SchemaSnapshot) -> ColumnSet;

pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// Grammar summary, e.g. `LIMIT max_number_of_rows`.
    pub declaration: &'static str,
    pub examples: &'static [&'static str],
    pub kind: CommandKind,
    /// Parseable but left out of command suggestions.
    pub hidden: bool,
    /// Qualifiers written before the name (`LOOKUP JOIN`).
    pub types: &'static [&'static str],
    pub license: Option<LicenseTier>,
    /// Argument contexts offered to the function registry.
    pub locations: &'static [LocationTag],
    pub validate: ValidateFn,
    pub autocomplete: AutocompleteFn,
    pub columns_after: ColumnsAfterFn,
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl CommandDefinition {
    pub fn allowed_in_fork(&self) -> bool {
        self.kind == CommandKind::Processing && self.name != "fork"
    }

    /// Upper-case name as inserted by suggestions; JOIN uses its first type.
    pub fn label(&self) -> String {
        match self.types.first() {
            Some(kind) => format!("{kind} {}", self.name).to_ascii_uppercase(),
            None => self.name.to_ascii_uppercase(),
        }
    }
}

fn no_validation(_: &CommandContext<'_>) -> Vec<Message> {
    Vec::new()
}

fn no_suggestions(_: &SuggestContext<'_>) -> Suggestions {
    Vec::new()
}

fn same_columns(_: &Command, columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    columns
}

pub struct CommandRegistry {
    commands: Vec<CommandDefinition>,
    by_name: HashMap<&'static str, usize>,
}

static COMMANDS: LazyLock<CommandRegistry> = LazyLock::new(|| {
    CommandRegistry::new(vec![
        source::FROM,
        source::TS,
        source::ROW,
        source::SHOW,
        transform::WHERE,
        transform::EVAL,
        stats::STATS,
        stats::INLINESTATS,
        projection::KEEP,
        projection::DROP,
        projection::RENAME,
        projection::MV_EXPAND,
        sort::SORT,
        sort::LIMIT,
        sort::SAMPLE,
        patterns::DISSECT,
        patterns::GROK,
        enrich::ENRICH,
        join::JOIN,
        fork::FORK,
        change_point::CHANGE_POINT,
    ])
});

pub fn command_registry() -> &'static CommandRegistry {
    &COMMANDS
}

pub fn command_definition(name: &str) -> Option<&'static CommandDefinition> {
    COMMANDS.get(name)
}

impl CommandRegistry {
    pub fn new(commands: Vec<CommandDefinition>) -> Self {
        let by_name = commands
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name, i))
            .collect();
        Self { commands, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.by_name.get(name).map(|&i| &self.commands[i])
    }

    pub fn all(&self) -> &[CommandDefinition] {
        &self.commands
    }

    /// Commands offered at the start of a query or after a pipe.
    pub fn suggestable(&self, kind: CommandKind) -> impl Iterator<Item = &CommandDefinition> {
        self.commands
            .iter()
            .filter(move |c| c.kind == kind && !c.hidden)
    }
}

/// `Some(message)` when the caller's tier is below what `definition` needs.
pub(crate) fn command_license(
    definition: &CommandDefinition,
    command: &Command,
    license: Option<LicenseTier>,
) -> Option<Message> {
    let required = definition.license?;
    if license?.allows(required) {
        return None;
    }
    Some(MessageId::LicenseRequired.at(
        command.name_location,
        params! { "name" => command.display_name(), "requiredLicense" => required },
    ))
}

/// Name and value of a `[name =] expr` field; bare expressions are named
/// after their source text.
pub(crate) fn field_parts(node: &Node) -> (String, &Node) {
    if let Node::Function(f) = node
        && f.is_assignment()
        && let [Node::Column(target), value] = f.args.as_slice()
    {
        return (target.name.clone(), value);
    }
    (node.text().trim().to_string(), node)
}

/// Add each field of `nodes` to `columns`, typing later fields with the
/// ones defined before them.
pub(crate) fn with_fields(command: &Command, nodes: &[Node], mut columns: ColumnSet) -> ColumnSet {
    for node in nodes.iter().filter(|n| !n.incomplete()) {
        let (name, value) = field_parts(node);
        let ty = type_of(value, command, &columns);
        columns.insert(name, ty, true);
    }
    columns
}

/// Check each field of `nodes` at `tag`; later fields see earlier ones.
pub(crate) fn check_fields(
    ctx: &CommandContext<'_>,
    nodes: &[Node],
    tag: LocationTag,
    out: &mut Vec<Message>,
) {
    let mut columns = ctx.columns.clone();
    for node in nodes {
        if node.incomplete() {
            continue;
        }
        let step = CommandContext {
            command: ctx.command,
            columns: &columns,
            schema: ctx.schema,
            license: ctx.license,
        };
        let ty = step.check_expression(node, tag, out);
        let (name, _) = field_parts(node);
        columns.insert(name, ty, true);
    }
}
