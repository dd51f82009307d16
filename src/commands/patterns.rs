//! Text extraction commands: DISSECT and GROK.
use super::*;

pub(super) const DISSECT: CommandDefinition = CommandDefinition {
    name: "dissect",
    description: "Extracts multiple string values from a single string input, based on a pattern.",
    declaration: "DISSECT input \"pattern\" [APPEND_SEPARATOR=\"<separator>\"]",
    examples: &["ROW a = \"1953-01-23T12:15:00Z - some text - 127.0.0.1\" | DISSECT a \"%{Y}-%{M}-%{D}T%{h}:%{m}:%{s}Z - %{msg} - %{ip}\""],
    kind: CommandKind::Processing,
    hidden: false,
    types: &[],
    license: None,
    locations: &[LocationTag::Dissect],
    validate: validate_dissect,
    autocomplete: suggest_dissect,
    columns_after: dissect_columns,
};

pub(super) const GROK: CommandDefinition = CommandDefinition {
    name: "grok",
    description: "Extracts multiple string values from a single string input, based on a regular expression pattern.",
    declaration: "GROK input \"pattern\"",
    examples: &["ROW a = \"1.2.3.4 [2023-01-23T12:15:00.000Z] Connected\" | GROK a \"%{IP:my_ip} \\\\[%{TIMESTAMP_ISO8601:@timestamp}\\\\] %{GREEDYDATA:status}\""],
    locations: &[LocationTag::Grok],
    validate: validate_grok,
    autocomplete: suggest_grok,
    columns_after: grok_columns,
    ..DISSECT
};

const APPEND_SEPARATOR: &str = "append_separator";

/// The unescaped pattern string, once it is complete.
fn pattern(command: &Command) -> Option<&str> {
    command
        .positional()
        .nth(1)
        .and_then(Node::as_literal)
        .filter(|l| l.kind == LiteralKind::String && !l.incomplete)
        .map(|l| l.value.as_str())
}

/// Keys written by a dissect pattern: `%{key}`, `%{+key}` and `%{key->}`.
/// Skipped (`%{?key}`, `%{}`) and reference keys produce no column.
pub fn dissect_keys(pattern: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut rest = pattern;
    while let Some(start) = rest.find("%{") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let key = &rest[start + 2..start + len];
        rest = &rest[start + len + 1..];

        let key = key.trim_end_matches("->");
        let key = key.strip_prefix('+').unwrap_or(key);
        let key = key.split('/').next().unwrap_or_default();
        if key.is_empty() || key.starts_with(['?', '*', '&']) {
            continue;
        }
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Named captures of a grok pattern with their types: `%{SYNTAX:name[:type]}`
/// and `(?<name>regex)`.
pub fn grok_fields(pattern: &str) -> Vec<(String, FieldType)> {
    let mut fields: Vec<(String, FieldType)> = Vec::new();
    let mut add = |name: &str, ty: FieldType| {
        if !name.is_empty() && !fields.iter().any(|(n, _)| n == name) {
            fields.push((name.to_string(), ty));
        }
    };

    let mut rest = pattern;
    while let Some(start) = rest.find("%{") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let mut parts = rest[start + 2..start + len].split(':').skip(1);
        if let Some(name) = parts.next() {
            let ty = match parts.next() {
                Some("int") => FieldType::Integer,
                Some("long") => FieldType::Long,
                Some("float" | "double") => FieldType::Double,
                Some("boolean") => FieldType::Boolean,
                _ => FieldType::Keyword,
            };
            add(name, ty);
        }
        rest = &rest[start + len + 1..];
    }

    let mut rest = pattern;
    while let Some(start) = rest.find("(?<") {
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        add(&rest[start + 3..start + len], FieldType::Keyword);
        rest = &rest[start + len + 1..];
    }
    fields
}

/// The input expression must be a string.
fn check_input(ctx: &CommandContext<'_>, tag: LocationTag, out: &mut Vec<Message>) {
    let Some(input) = ctx.command.positional().next().filter(|n| !n.incomplete()) else {
        return;
    };
    let before = out.len();
    let ty = ctx.check_expression(input, tag, out);
    if let Some(given) = ty.filter(|t| !t.is_string() && *t != FieldType::Null)
        && out.len() == before
    {
        out.push(MessageId::UnsupportedColumnTypeForCommand.at(
            input.location(),
            params! {
                "command" => tag,
                "expected" => "keyword, text",
                "column" => input.text(),
                "given" => given,
            },
        ));
    }
}

fn validate_dissect(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    check_input(ctx, LocationTag::Dissect, &mut out);
    for option in ctx.command.options().filter(|o| !o.incomplete) {
        if option.name != APPEND_SEPARATOR {
            let keyword = option.text.split('=').next().unwrap_or_default().trim();
            out.push(MessageId::UnknownDissectKeyword.at(
                option.location,
                params! { "keyword" => keyword },
            ));
            continue;
        }
        let string = option
            .args
            .first()
            .and_then(Node::as_literal)
            .is_some_and(|l| l.kind == LiteralKind::String);
        if !string && let Some(value) = option.args.first() {
            out.push(MessageId::WrongDissectOptionArgumentType.at(
                value.location(),
                params! { "value" => value.text() },
            ));
        }
    }
    out
}

fn validate_grok(ctx: &CommandContext<'_>) -> Vec<Message> {
    let mut out = Vec::new();
    check_input(ctx, LocationTag::Grok, &mut out);
    out
}

fn dissect_columns(command: &Command, mut columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    for key in pattern(command).map(dissect_keys).unwrap_or_default() {
        columns.insert(key, Some(FieldType::Keyword), true);
    }
    columns
}

fn grok_columns(command: &Command, mut columns: ColumnSet, _: &SchemaSnapshot) -> ColumnSet {
    for (name, ty) in pattern(command).map(grok_fields).unwrap_or_default() {
        columns.insert(name, Some(ty), true);
    }
    columns
}

/// Where the cursor sits in `<input> "pattern" ...`.
enum Slot {
    Input,
    Pattern,
    AfterPattern,
    Option,
    Other,
}

fn slot(before: &[Token]) -> Slot {
    let (rest, path) = trailing_path(before);
    let pattern_at = before
        .iter()
        .position(|t| matches!(t.kind, TokenKind::String { terminated: true, .. }));
    match pattern_at {
        None if before.is_empty() => Slot::Input,
        None if rest.is_empty() && !path.is_empty() => Slot::Pattern,
        None => Slot::Other,
        Some(i) if i + 1 == before.len() => Slot::AfterPattern,
        Some(_) => match before {
            [.., name, assign] if name.kind.is_ident() && assign.kind == TokenKind::Assign => {
                Slot::Option
            }
            [.., assign, value]
                if assign.kind == TokenKind::Assign && ends_operand(value) =>
            {
                Slot::AfterPattern
            }
            _ => Slot::Other,
        },
    }
}

fn suggest_input(ctx: &SuggestContext<'_>, range: Option<Location>) -> Suggestions {
    ctx.column_suggestions(ParamType::String, &[], range)
        .into_iter()
        .map(Suggestion::retrigger)
        .collect()
}

fn suggest_dissect(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    match slot(word.before) {
        Slot::Input => suggest_input(ctx, word.range),
        Slot::Pattern => vec![
            Suggestion::value("\"%{firstWord}\" ", "A dissect pattern").retrigger(),
        ],
        Slot::AfterPattern => {
            let appended = word
                .before
                .iter()
                .any(|t| t.ident().is_some_and(|n| n.eq_ignore_ascii_case(APPEND_SEPARATOR)));
            let mut out = Vec::new();
            if !appended {
                out.push(
                    Suggestion::new(SuggestionKind::Keyword, "APPEND_SEPARATOR", "APPEND_SEPARATOR = ")
                        .detail("Separator for appended fields")
                        .retrigger()
                        .range(word.range),
                );
            }
            out.push(Suggestion::pipe());
            out
        }
        Slot::Option => [":", ";", "-", " "]
            .into_iter()
            .map(|sep| Suggestion::value(format!("\"{sep}\" "), "Separator").retrigger())
            .collect(),
        Slot::Other => Vec::new(),
    }
}

fn suggest_grok(ctx: &SuggestContext<'_>) -> Suggestions {
    let word = ctx.word();
    match slot(word.before) {
        Slot::Input => suggest_input(ctx, word.range),
        Slot::Pattern => vec![
            Suggestion::value("\"%{WORD:firstWord}\" ", "A grok pattern").retrigger(),
        ],
        Slot::AfterPattern => vec![Suggestion::pipe()],
        Slot::Option | Slot::Other => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("%{a} %{b}", vec!["a", "b"])]
    #[case("%{+a} %{+a/2} %{?skip} %{}", vec!["a"])]
    #[case("%{ts->} %{*k} %{&k}", vec!["ts"])]
    #[case("%{a} %{a}", vec!["a"])]
    #[case("no keys", vec![])]
    fn dissect_pattern_keys(#[case] pattern: &str, #[case] expected: Vec<&str>) {
        assert_eq!(dissect_keys(pattern), expected);
    }

    #[test]
    fn grok_pattern_types() {
        let fields = grok_fields("%{IP:ip} %{NUMBER:bytes:int} %{NUMBER:took:float} %{WORD} (?<user>\\w+)");
        assert_eq!(
            fields,
            vec![
                ("ip".to_string(), FieldType::Keyword),
                ("bytes".to_string(), FieldType::Integer),
                ("took".to_string(), FieldType::Double),
                ("user".to_string(), FieldType::Keyword),
            ]
        );
    }

    fn validate(text: &str, columns: ColumnSet) -> Vec<Message> {
        let query = parse(text).query;
        let command = query.commands.last().expect("command");
        let definition = command_definition(&command.name).expect("definition");
        let schema = SchemaSnapshot::default();
        (definition.validate)(&CommandContext {
            command,
            columns: &columns,
            schema: &schema,
            license: None,
        })
    }

    #[rstest]
    #[case("FROM a | DISSECT s \"%{a}\"", vec![])]
    #[case("FROM a | DISSECT n \"%{a}\"", vec![MessageId::UnsupportedColumnTypeForCommand])]
    #[case("FROM a | DISSECT s \"%{a}\" append_separator = \"-\"", vec![])]
    #[case("FROM a | DISSECT s \"%{a}\" separator = \"-\"", vec![MessageId::UnknownDissectKeyword])]
    #[case("FROM a | DISSECT s \"%{a}\" append_separator = 1", vec![MessageId::WrongDissectOptionArgumentType])]
    #[case("FROM a | GROK n \"%{WORD:w}\"", vec![MessageId::UnsupportedColumnTypeForCommand])]
    fn input_and_options(#[case] text: &str, #[case] expected: Vec<MessageId>) {
        let columns: ColumnSet = [
            Field::new("s", Some(FieldType::Keyword)),
            Field::new("n", Some(FieldType::Long)),
        ]
        .into_iter()
        .collect();
        let codes: Vec<_> = validate(text, columns).into_iter().map(|m| m.code).collect();
        assert_eq!(codes, expected, "{text}");
    }
}
