//! Semantic checks over a parsed pipeline.
//!
//! Commands are walked in order while the set of available columns is
//! carried from one to the next, so each command is checked only against
//! what the commands before it produce.
mod columns;
mod expression;
mod validation_tests;

pub use columns::*;
pub use expression::*;

use crate::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Caller license; falls back to `ESQL_LICENSE`, and license checks are
    /// skipped when neither is set.
    pub license: Option<LicenseTier>,
}

impl ValidationOptions {
    pub fn with_license(license: LicenseTier) -> Self {
        Self {
            license: Some(license),
        }
    }

    fn effective_license(&self) -> Option<LicenseTier> {
        self.license.or_else(|| config().license_tier())
    }
}

/// Parse `text`, fetch the schema it needs and validate it. Syntax errors
/// come first, followed by semantic diagnostics.
pub async fn validate_query<C: SchemaCallbacks + ?Sized>(
    text: &str,
    callbacks: &C,
    options: &ValidationOptions,
) -> Vec<Message> {
    let ParseResult { query, mut errors } = parse(text);
    let schema = SchemaSnapshot::collect(&query, text, callbacks).await;
    errors.extend(validate(&query, &schema, options));
    debug!("Validated query with {} messages", errors.len());
    errors
}

/// Semantic diagnostics of an already parsed query.
pub fn validate(query: &Query, schema: &SchemaSnapshot, options: &ValidationOptions) -> Vec<Message> {
    let license = options.effective_license();
    let mut out = validate_pipeline(&query.commands, ColumnSet::known(), schema, license);

    let mut forks = Vec::new();
    query.visit_commands(&mut |command| {
        if command.name == "fork" {
            forks.push(command.name_location);
        }
    });
    if let Some(second) = forks.get(1) {
        out.push(MessageId::TooManyForks.at(*second, Params::new()));
    }

    out.extend(schema.unavailable_warning(query.location));
    out
}

/// Run each command's checks with the columns flowing into it. Commands
/// that did not parse are skipped.
pub(crate) fn validate_pipeline(
    commands: &[Command],
    input: ColumnSet,
    schema: &SchemaSnapshot,
    license: Option<LicenseTier>,
) -> Vec<Message> {
    let mut out = Vec::new();
    let mut columns = input;
    for command in commands {
        if let Some(definition) = command_definition(&command.name)
            && !command.incomplete
        {
            out.extend(command_license(definition, command, license));
            let context = CommandContext {
                command,
                columns: &columns,
                schema,
                license,
            };
            let messages = (definition.validate)(&context);
            trace!(
                "Validated [{}] against {} columns: {} messages",
                command.display_name(),
                columns.len(),
                messages.len()
            );
            out.extend(messages);
        }
        columns = columns_after(command, columns, schema);
    }
    out
}
