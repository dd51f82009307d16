#![cfg(test)]
use crate::*;
use rstest::rstest;

fn codes(messages: &[Message]) -> Vec<MessageId> {
    messages.iter().map(|m| m.code).collect()
}

mod scenario_testing {
    use super::*;

    #[tokio::test]
    async fn unknown_column_is_reported_once_where_it_is_written() {
        let schema = ExternalSchema::new().with_columns([ColumnInfo::new("realField", "keyword")]);
        let messages =
            validate_query("FROM a | KEEP missingField", &schema, &ValidationOptions::default()).await;

        assert_eq!(codes(&messages), vec![MessageId::UnknownColumn]);
        assert_eq!(messages[0].location, Location::new(14, 26));
        assert_eq!(messages[0].severity, Severity::Error);
        assert!(messages[0].text.contains("missingField"));
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn stats_needs_an_aggregation(ctx: &mut MockSchema) {
        let messages = ctx.validate("FROM a | STATS b = 1").await;
        assert!(codes(&messages).contains(&MessageId::NoAggFunction));
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn second_fork_is_flagged_once(ctx: &mut MockSchema) {
        let text = "FROM a | FORK (LIMIT 1) (LIMIT 2) | FORK (LIMIT 3) (LIMIT 4)";
        let messages = ctx.validate(text).await;
        let forks: Vec<_> = messages
            .iter()
            .filter(|m| m.code == MessageId::TooManyForks)
            .collect();
        assert_eq!(forks.len(), 1);
        assert_eq!(forks[0].location.slice(text), "FORK");
        assert!(forks[0].location.start > 9);
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn syntax_errors_come_first(ctx: &mut MockSchema) {
        let messages = ctx.validate("FROM a | KEEP missing | LIMIT x").await;
        assert_eq!(
            codes(&messages),
            vec![MessageId::SyntaxError, MessageId::UnknownColumn]
        );
    }

    #[tokio::test]
    async fn failing_collaborator_yields_one_warning() {
        struct Down;
        impl SchemaCallbacks for Down {
            async fn get_columns_for(&self, _: &str) -> Result<Option<Vec<ColumnInfo>>> {
                Err(Error::callback("timeout"))
            }
            async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
                Err(Error::callback("timeout"))
            }
            async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
                Ok(None)
            }
        }
        let messages =
            validate_query("FROM a | KEEP anything", &Down, &ValidationOptions::default()).await;
        assert_eq!(codes(&messages), vec![MessageId::SchemaUnavailable]);
        assert_eq!(messages[0].severity, Severity::Warning);
    }
}

mod command_testing {
    use super::*;

    #[test_context(MockSchema)]
    #[rstest]
    // Case 1: sources
    #[case("FROM a", &[])]
    #[case("FROM missing_index", &[MessageId::UnknownIndex])]
    #[case("FROM nope*", &[MessageId::UnknownIndex])]
    #[case("FROM remote:missing", &[])]
    #[case("FROM in*", &[])]
    // Case 2: metadata
    #[case("FROM a METADATA _id, _score", &[])]
    #[case("FROM a METADATA _nope", &[MessageId::UnknownMetadataField])]
    #[case("FROM a [METADATA _id]", &[MessageId::MetadataBracketsDeprecation])]
    // Case 3: functions
    #[case("FROM a | EVAL abs(keywordField)", &[MessageId::WrongArgumentType])]
    #[case("FROM a | EVAL abs(1, 2)", &[MessageId::WrongArgumentNumber])]
    #[case("FROM a | EVAL nope(1)", &[MessageId::UnknownFunction])]
    #[case("FROM a | EVAL x = unsupportedField", &[MessageId::UnsupportedFieldType])]
    #[case("FROM a | WHERE keywordField", &[MessageId::UnsupportedColumnTypeForCommand])]
    #[case("FROM a | WHERE avg(doubleField) > 1", &[MessageId::UnsupportedFunctionForCommand])]
    // Case 4: aggregations
    #[case("FROM a | STATS", &[MessageId::StatsNoArguments])]
    #[case("FROM a | STATS avg(max(doubleField))", &[MessageId::AggInAggFunction])]
    #[case("FROM a | STATS avg(doubleField) + doubleField", &[MessageId::ExpressionNotAggClosed])]
    #[case("FROM a | STATS c = count(*) BY keywordField | KEEP c, keywordField", &[])]
    // Case 5: projections
    #[case("FROM a | DROP *", &[MessageId::DropAllColumnsError])]
    #[case("FROM a | RENAME key* AS k", &[MessageId::WildcardNotSupportedForCommand])]
    #[case("FROM a | RENAME keywordField AS kw | KEEP kw, keywordField", &[MessageId::UnknownColumn])]
    #[case("FROM a | KEEP key* | SORT keywordField DESC", &[])]
    // Case 6: enrich and join
    #[case("FROM a | ENRICH policy | KEEP otherField", &[])]
    #[case("FROM a | ENRICH nope", &[MessageId::UnknownPolicy])]
    #[case("FROM a | LOOKUP JOIN lookup_index ON keywordField | KEEP joinValue", &[])]
    #[case("FROM a | LOOKUP JOIN index ON keywordField", &[MessageId::InvalidJoinIndex])]
    // Case 7: the rest
    #[case("FROM a | SAMPLE 2", &[MessageId::InvalidSampleProbability])]
    #[case("FROM a | FORK (LIMIT 1)", &[MessageId::ForkTooFewBranches])]
    #[case("ROW a = 1, b = a + 1 | EVAL c = b * 2 | KEEP c", &[])]
    #[case("ROW a = 1 | KEEP b", &[MessageId::UnknownColumn])]
    #[tokio::test]
    async fn should_report(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] expected: &[MessageId],
    ) {
        let messages = ctx.validate(text).await;
        assert_eq!(codes(&messages), expected, "{text}: {messages:?}");
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn license_is_checked_only_when_known(ctx: &mut MockSchema) {
        let text = "FROM a | CHANGE_POINT doubleField ON @timestamp";
        let basic = ctx.validate_with(text, LicenseTier::Basic).await;
        assert_eq!(codes(&basic), vec![MessageId::LicenseRequired]);

        let platinum = ctx.validate_with(text, LicenseTier::Platinum).await;
        assert!(platinum.is_empty(), "{platinum:?}");

        let unset = ctx.validate(text).await;
        assert!(unset.is_empty(), "{unset:?}");
    }
}

mod column_flow_testing {
    use super::*;

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot {
            columns: Some(
                FIELDS
                    .iter()
                    .map(|(name, ty)| ColumnInfo::new(*name, *ty))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("FROM a | EVAL x = longField + 1 | RENAME x AS y | STATS m = max(y) BY keywordField | KEEP m")]
    #[case("FROM a | DROP key* | DISSECT textField \"%{a} %{b}\" | SORT a | LIMIT 5")]
    #[case("ROW a = 1 | GROK a \"%{NUMBER:n:int}\" | MV_EXPAND n | EVAL z = n * 2")]
    fn prefix_parse_agrees_with_full_parse(#[case] text: &str) {
        let schema = snapshot();
        let full = parse(text).query;
        for (i, command) in full.commands.iter().enumerate() {
            let prefix = parse(&text[..command.location.end]).query;
            let expected = columns_through(&full.commands[..=i], ColumnSet::known(), &schema);
            let actual = columns_through(&prefix.commands, ColumnSet::known(), &schema);
            assert_eq!(
                actual.names().collect::<Vec<_>>(),
                expected.names().collect::<Vec<_>>(),
                "after [{}]",
                command.display_name()
            );
        }
    }

    #[test]
    fn unknown_input_silences_column_checks() {
        let query = parse("FROM a | KEEP anything | WHERE other > 1").query;
        let messages = validate(&query, &SchemaSnapshot::default(), &ValidationOptions::default());
        assert!(messages.is_empty(), "{messages:?}");
    }
}
