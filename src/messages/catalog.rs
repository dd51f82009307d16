use super::{MessageId, Severity};

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub id: MessageId,
    pub severity: Severity,
    pub text: &'static str,
}

const fn error(id: MessageId, text: &'static str) -> Template {
    Template {
        id,
        severity: Severity::Error,
        text,
    }
}

const fn warning(id: MessageId, text: &'static str) -> Template {
    Template {
        id,
        severity: Severity::Warning,
        text,
    }
}

/// Indexed by `MessageId` discriminant.
static TEMPLATES: [Template; 32] = {
    use MessageId::*;
    [
        error(SyntaxError, "SyntaxError: {detail}"),
        error(UnknownColumn, "Unknown column [{name}]"),
        error(UnknownIndex, "Unknown index [{name}]"),
        error(UnknownFunction, "Unknown function [{name}]"),
        error(UnknownPolicy, "Unknown policy [{name}]"),
        error(
            UnknownMetadataField,
            "Metadata field [{value}] is not available. Available metadata fields are: [{available}]",
        ),
        error(UnknownInterval, "Unexpected time interval qualifier: '{value}'"),
        error(
            UnknownDissectKeyword,
            "Expected [APPEND_SEPARATOR] in [DISSECT] but found [{keyword}]",
        ),
        error(
            WrongDissectOptionArgumentType,
            "Invalid value for DISSECT APPEND_SEPARATOR: expected a string, but was [{value}]",
        ),
        error(
            WrongArgumentNumber,
            "Error: [{fn}] function expects {expected}, got {actual}.",
        ),
        error(
            WrongArgumentType,
            "Argument of [{fn}] must be [{expected}], found value [{value}] type [{given}]",
        ),
        error(ExpectedConstant, "Argument of [{fn}] must be a constant, received [{value}]"),
        error(
            UnsupportedLiteralOption,
            "Invalid option [{value}] for {fn}. Supported options: [{accepted}].",
        ),
        error(UnsupportedFunctionForCommand, "{command} does not support function {name}"),
        error(
            UnsupportedFunctionForCommandOption,
            "{command} {option} does not support function {name}",
        ),
        error(
            AggInAggFunction,
            "Aggregate function's parameters must be an attribute, literal or a non-aggregation function; found [{nested}] inside [{outer}]",
        ),
        error(
            NoAggFunction,
            "At least one aggregation function required in [{command}], found [{expression}]",
        ),
        error(
            ExpressionNotAggClosed,
            "Cannot combine aggregation and non-aggregation values in [{command}], found [{expression}]",
        ),
        error(
            StatsNoArguments,
            "At least one aggregation or grouping expression required in [{command}]",
        ),
        error(
            UnsupportedColumnTypeForCommand,
            "{command} only supports values of type [{expected}]. Found [{column}] of type [{given}]",
        ),
        error(DropAllColumnsError, "Removing all fields is not allowed [*]"),
        error(
            WildcardNotSupportedForCommand,
            "Using wildcards (*) in {command} is not allowed [{value}]",
        ),
        error(
            UnsupportedSettingCommandValue,
            "Unrecognized value [{value}] for {command}, mode needs to be one of [{expected}]",
        ),
        error(LicenseRequired, "{name} requires a {requiredLicense} license"),
        error(
            LicenseRequiredForSignature,
            "{name} with {signature} requires a {requiredLicense} license",
        ),
        error(TooManyForks, "[FORK] a query cannot have more than one FORK command."),
        error(ForkTooFewBranches, "[FORK] must include at least two branches."),
        error(
            InvalidJoinIndex,
            "[{identifier}] index is not a valid JOIN index. Please use a \"lookup\" mode index for JOIN commands.",
        ),
        error(
            InvalidSampleProbability,
            "[SAMPLE] probability must be a number between 0 and 1 (exclusive), found [{value}]",
        ),
        warning(
            MetadataBracketsDeprecation,
            "Square brackets '[]' need to be removed from FROM METADATA declaration",
        ),
        warning(
            UnsupportedFieldType,
            "Field [{field}] cannot be retrieved, it is unsupported or not indexed; returning null",
        ),
        warning(
            SchemaUnavailable,
            "Could not verify the query against the live schema: {reason}",
        ),
    ]
};

pub fn template(id: MessageId) -> &'static Template {
    &TEMPLATES[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for (i, entry) in TEMPLATES.iter().enumerate() {
            assert_eq!(entry.id as usize, i, "{:?} is out of place", entry.id);
        }
    }
}
