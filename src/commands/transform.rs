//! Row-wise commands: WHERE and EVAL.
use super::*;

pub(super) const WHERE: CommandDefinition = CommandDefinition {
    name: "where",
    description: "Uses a boolean expression to filter rows.",
    declaration: "WHERE expression",
    examples: &["FROM logs | WHERE status >= 500", "FROM logs | WHERE host IS NOT NULL"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Where],
    validate: validate_where,
    autocomplete: suggest_where,
    columns_after: same_columns,
};

pub(super) const EVAL: CommandDefinition = CommandDefinition {
    name: "eval",
    description: "Calculates an expression and puts the resulting value into a search results field.",
    declaration: "EVAL [column1 =] value1[, ..., [columnN =] valueN]",
    examples: &["FROM logs | EVAL kb = bytes / 1024", "ROW a = 1 | EVAL b = a * 2, c = round(b)"],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Eval],
    validate: validate_eval,
    autocomplete: suggest_eval,
    columns_after: eval_columns,
};

fn validate_where(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    let Some(condition) = ctx.command.args.first() else {
        return out;
    };
    let ty = ctx.check_expression(condition, LocationTag::Where, &mut out);
    if let Some(given) = ty.filter(|t| !matches!(t, FieldType::Boolean | FieldType::Null))
        && out.is_empty()
    {
        out.push(MessageId::UnsupportedColumnTypeForCommand.at(
            condition.location(),
            params! {
                "command" => "WHERE",
                "expected" => FieldType::Boolean,
                "column" => condition.text(),
                "given" => given,
            },
        ));
    }
    out
}

fn suggest_where(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    ctx.expression(LocationTag::Where, word.before, vec![Suggestion::pipe()])
}

fn validate_eval(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    check_fields(ctx, &ctx.command.args, LocationTag::Eval, &mut out);
    out
}

fn eval_columns(command: &Command, columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    with_fields(command, &command.args, columns)
}

/// True when `before` ends with a lone name starting a new field.
pub(super) fn naming_field(before: &[Token]) -> bool {
    match before {
        [name] => name.kind.is_ident(),
        [.., separator, name] => {
            matches!(separator.kind, TokenKind::Comma | TokenKind::Keyword(Keyword::By))
                && name.kind.is_ident()
        }
        _ => false,
    }
}

fn suggest_eval(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    let mut out = ctx.expression(
        LocationTag::Eval,
        word.before,
        vec![Suggestion::comma(), Suggestion::pipe()],
    );
    if naming_field(word.before) {
        out.insert(0, Suggestion::assign().range(word.range));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        tokenize(text)
    }

    #[test]
    fn detects_new_field_names() {
        assert!(naming_field(&lex("total")));
        assert!(naming_field(&lex("a = 1, total")));
        assert!(naming_field(&lex("count(*) BY host")));
        assert!(!naming_field(&lex("a +")));
        assert!(!naming_field(&lex("")));
    }
}
