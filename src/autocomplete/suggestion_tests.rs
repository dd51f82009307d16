#![cfg(test)]
use crate::*;
use rstest::rstest;

fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.text.as_str()).collect()
}

/// Suggestions at the end of `text`.
async fn at_end(ctx: &MockSchema, text: &str) -> Suggestions {
    ctx.suggest(text, text.len()).await
}

mod command_testing {
    use super::*;

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn empty_query_offers_source_commands_only(ctx: &mut MockSchema) {
        let result = ctx.suggest("", 0).await;
        assert_eq!(texts(&result), vec!["FROM ", "ROW ", "SHOW "]);
        assert!(result.iter().all(|s| s.command.is_some()));
    }

    #[test_context(MockSchema)]
    #[rstest]
    // Case 1: after a pipe every visible processing command
    #[case("FROM a | ", &["WHERE ", "EVAL ", "STATS ", "KEEP ", "LOOKUP JOIN ", "FORK ", "CHANGE_POINT "], &["FROM ", "INLINESTATS ", "TS "])]
    // Case 2: a typed name keeps the same list
    #[case("FROM a | ke", &["KEEP ", "WHERE "], &["ROW "])]
    // Case 3: inside a FORK branch FORK itself is not offered
    #[case("FROM a | FORK (", &["WHERE ", "LIMIT "], &["FORK ", "FROM "])]
    // Case 4: after a pipe inside a branch
    #[case("FROM a | FORK (WHERE integerField > 1 | ", &["SORT "], &["FORK "])]
    // Case 5: only one FORK per query
    #[case("FROM a | FORK (LIMIT 1) (LIMIT 2) | ", &["KEEP "], &["FORK "])]
    #[tokio::test]
    async fn should_recommend_commands(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] included: &[&str],
        #[case] excluded: &[&str],
    ) {
        let result = at_end(ctx, text).await;
        let texts = texts(&result);
        for text in included {
            assert!(texts.contains(text), "missing {text} in {texts:?}");
        }
        for text in excluded {
            assert!(!texts.contains(text), "unexpected {text} in {texts:?}");
        }
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn typed_command_name_is_replaced(ctx: &mut MockSchema) {
        let result = at_end(ctx, "FROM a | ke").await;
        let keep = result.iter().find(|s| s.text == "KEEP ").expect("KEEP suggested");
        assert_eq!(keep.range_to_replace, Some(Location::new(9, 11)));
    }

    #[test_context(MockSchema)]
    #[rstest]
    #[case("FROM a | LOOKUP ")]
    #[case("FROM a | LEFT ")]
    #[tokio::test]
    async fn join_type_completes_to_join(ctx: &mut MockSchema, #[case] text: &str) {
        assert_eq!(texts(&at_end(ctx, text).await), vec!["JOIN "]);
    }
}

mod source_testing {
    use super::*;

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn should_recommend_visible_sources(ctx: &mut MockSchema) {
        let result = at_end(ctx, "FROM ").await;
        let labels: Vec<_> = result.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"my-index"));
        assert!(labels.contains(&"lookup_index"));
        assert!(!labels.contains(&".secret"));
        assert!(result.iter().all(|s| s.command.is_some()));

        let hidden = at_end(ctx, "FROM .se").await;
        assert!(hidden.iter().any(|s| s.label == ".secret"));
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn already_listed_sources_are_skipped(ctx: &mut MockSchema) {
        let result = at_end(ctx, "FROM index, ").await;
        let labels: Vec<_> = result.iter().map(|s| s.label.as_str()).collect();
        assert!(!labels.contains(&"index"));
        assert!(labels.contains(&"my-index"));
    }

    #[test_context(MockSchema)]
    #[rstest]
    #[case("FROM a*", "a*", Location::new(5, 7))]
    #[case("FROM my-index", "my-index", Location::new(5, 13))]
    #[case("FROM a, logs-2024", "logs-2024", Location::new(8, 17))]
    #[tokio::test]
    async fn complete_source_offers_follow_ups(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] typed: &str,
        #[case] range: Location,
    ) {
        // When
        let result = at_end(ctx, text).await;

        // Should
        let follow_ups: Vec<_> = result
            .iter()
            .filter(|s| s.filter_text.as_deref() == Some(typed))
            .collect();
        let follow_texts: Vec<_> = follow_ups.iter().map(|s| s.text.clone()).collect();
        assert_eq!(
            follow_texts,
            vec![format!("{typed} | "), format!("{typed}, "), format!("{typed} METADATA ")]
        );
        assert!(follow_ups.iter().all(|s| s.range_to_replace == Some(range)));
        assert!(follow_ups.iter().all(|s| s.command.is_some()));
    }

    #[test_context(MockSchema)]
    #[rstest]
    #[case("FROM a ", &["METADATA ", ", ", "| "])]
    #[case("FROM a METADATA ", &["_version", "_id", "_index", "_source", "_ignored", "_index_mode", "_score"])]
    #[case("FROM a METADATA _id, ", &["_version", "_index", "_source", "_ignored", "_index_mode", "_score"])]
    #[case("FROM a METADATA _id ", &[", ", "| "])]
    #[tokio::test]
    async fn metadata_clause(ctx: &mut MockSchema, #[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(texts(&at_end(ctx, text).await), expected);
    }
}

mod column_testing {
    use super::*;

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn keep_excludes_listed_fields(ctx: &mut MockSchema) {
        let result = ctx.suggest("FROM a | KEEP keywordField, ", 27).await;
        let labels: Vec<_> = result.iter().map(|s| s.label.as_str()).collect();
        assert!(!labels.contains(&"keywordField"));
        assert!(labels.contains(&"textField"));
        assert!(labels.contains(&"any#Char$Field"));
    }

    #[test_context(MockSchema)]
    #[rstest]
    // Case 1: backtick quoted name with special characters
    #[case("FROM a | KEEP `any#Char$Field`", "any#Char$Field", "`any#Char$Field`", Location::new(14, 30))]
    // Case 2: dotted name still being typed
    #[case("FROM a | KEEP kubernetes.some", "kubernetes.something.something", "kubernetes.something.something", Location::new(14, 29))]
    // Case 3: dotted name made of quoted segments
    #[case("FROM a | KEEP `kubernetes`.`something`.some", "kubernetes.something.something", "kubernetes.something.something", Location::new(14, 43))]
    // Case 4: plain prefix
    #[case("FROM a | DROP key", "keywordField", "keywordField", Location::new(14, 17))]
    #[tokio::test]
    async fn replacement_range_covers_raw_token(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] label: &str,
        #[case] inserted: &str,
        #[case] range: Location,
    ) {
        let result = at_end(ctx, text).await;
        let column = result
            .iter()
            .find(|s| s.label == label)
            .unwrap_or_else(|| panic!("{label} not suggested for {text}"));
        assert_eq!(column.text, inserted);
        assert_eq!(column.range_to_replace, Some(range));
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn columns_follow_the_pipeline(ctx: &mut MockSchema) {
        let result = at_end(ctx, "FROM a | EVAL total = longField * 2 | KEEP ").await;
        let total = result.iter().find(|s| s.label == "total").expect("total suggested");
        assert_eq!(total.detail, "long");

        let renamed = at_end(ctx, "FROM a | RENAME keywordField AS kw | KEEP ").await;
        let labels: Vec<_> = renamed.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"kw"));
        assert!(!labels.contains(&"keywordField"));

        let stats = at_end(ctx, "FROM a | STATS c = count(*) BY ipField | KEEP ").await;
        assert_eq!(
            stats.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
            vec!["c", "ipField"]
        );
    }

    #[test_context(MockSchema)]
    #[rstest]
    // Case 1: RENAME old name is followed by AS or =
    #[case("FROM a | RENAME ", true)]
    #[case("FROM a | RENAME keywordField AS kw, ", true)]
    // Case 2: SORT field is followed by an ordering, a comma or a pipe
    #[case("FROM a | SORT ", true)]
    #[case("FROM a | SORT doubleField, ", true)]
    // Case 3: the new name after = ends the clause
    #[case("FROM a | RENAME kw = ", false)]
    #[tokio::test]
    async fn columns_retrigger_where_more_input_follows(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] retrigger: bool,
    ) {
        let result = at_end(ctx, text).await;
        let columns: Vec<_> = result.iter().filter(|s| s.kind == SuggestionKind::Column).collect();
        assert!(!columns.is_empty(), "no columns for {text}");
        assert!(
            columns.iter().all(|s| s.command.is_some() == retrigger),
            "{text}: {columns:?}"
        );
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn join_and_enrich_add_columns(ctx: &mut MockSchema) {
        let joined = at_end(ctx, "FROM a | LOOKUP JOIN lookup_index ON keywordField | KEEP ").await;
        assert!(joined.iter().any(|s| s.label == "joinValue"));

        let enriched = at_end(ctx, "FROM a | ENRICH policy | KEEP ").await;
        let labels: Vec<_> = enriched.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"otherField"));
        assert!(labels.contains(&"yetAnotherField"));
    }
}

mod expression_testing {
    use super::*;

    #[test_context(MockSchema)]
    #[rstest]
    // Case 1: start of an EVAL expression offers columns and scalar functions
    #[case("FROM a | EVAL ", &["keywordField", "abs($0)", "now()"], &["avg($0)", "| "])]
    // Case 2: STATS starts with aggregations, not columns
    #[case("FROM a | STATS ", &["avg($0)", "count($0)", "BY "], &["keywordField", "| "])]
    // Case 3: inside an aggregation columns come back, nested aggregations do not
    #[case("FROM a | STATS avg(", &["doubleField", "longField"], &["avg($0)", "keywordField"])]
    // Case 4: grouping functions after BY
    #[case("FROM a | STATS count(*) BY ", &["bucket($0)", "keywordField"], &["avg($0)"])]
    // Case 5: after an operand, operators and the follow-ups
    #[case("FROM a | WHERE doubleField ", &["> ", "| "], &["doubleField"])]
    // Case 6: IS expects NULL tests
    #[case("FROM a | WHERE doubleField IS ", &["NULL", "NOT NULL"], &["> "])]
    // Case 7: SORT orderings
    #[case("FROM a | SORT doubleField ", &["ASC ", "DESC ", "NULLS FIRST ", ", ", "| "], &[])]
    #[case("FROM a | SORT doubleField DESC ", &["NULLS FIRST ", "NULLS LAST ", "| "], &["ASC "])]
    #[case("FROM a | SORT doubleField NULLS ", &["FIRST ", "LAST "], &["| "])]
    // Case 8: a new EVAL field name can be assigned
    #[case("FROM a | EVAL newField ", &["= "], &[])]
    #[tokio::test]
    async fn should_recommend_expressions(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] included: &[&str],
        #[case] excluded: &[&str],
    ) {
        let result = at_end(ctx, text).await;
        let texts = texts(&result);
        for text in included {
            assert!(texts.contains(text), "missing {text} in {texts:?}");
        }
        for text in excluded {
            assert!(!texts.contains(text), "unexpected {text} in {texts:?}");
        }
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn function_arguments_are_typed(ctx: &mut MockSchema) {
        let result = at_end(ctx, "FROM a | EVAL abs(").await;
        let labels: Vec<_> = result.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"doubleField"));
        assert!(labels.contains(&"integerField"));
        assert!(!labels.contains(&"keywordField"));
        assert!(!labels.contains(&"dateField"));
    }
}

mod command_argument_testing {
    use super::*;

    #[test_context(MockSchema)]
    #[rstest]
    #[case("FROM a | ENRICH ", &["policy "])]
    #[case("FROM a | ENRICH policy ", &["ON ", "WITH ", "| "])]
    #[case("FROM a | ENRICH policy WITH ", &["otherField", "yetAnotherField"])]
    #[case("FROM a | LOOKUP JOIN ", &["lookup_index "])]
    #[case("FROM a | LOOKUP JOIN lookup_index ", &["ON "])]
    #[case("FROM a | LOOKUP JOIN lookup_index ON ", &["keywordField"])]
    #[case("FROM a | LIMIT ", &["10 ", "100 ", "1000 "])]
    #[case("FROM a | LIMIT 10 ", &["| "])]
    #[case("FROM a | DISSECT textField ", &["\"%{firstWord}\" "])]
    #[case("FROM a | GROK textField \"%{WORD:w}\" ", &["| "])]
    #[case("FROM a | RENAME keywordField ", &["AS ", "= "])]
    #[case("FROM a | RENAME keywordField AS k ", &[", ", "| "])]
    #[case("FROM a | MV_EXPAND keywordField ", &["| "])]
    #[case("FROM a | FORK ", &["("])]
    #[case("FROM a | FORK (LIMIT 1) (LIMIT 2) ", &["(", "| "])]
    #[case("SHOW ", &["INFO"])]
    #[tokio::test]
    async fn should_recommend_arguments(
        ctx: &mut MockSchema,
        #[case] text: &str,
        #[case] expected: &[&str],
    ) {
        assert_eq!(texts(&at_end(ctx, text).await), expected, "{text}");
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn unknown_command_has_no_suggestions(ctx: &mut MockSchema) {
        assert!(at_end(ctx, "FROM a | NOPE ").await.is_empty());
        assert!(at_end(ctx, "FROM a | WHERE \"unterminated").await.is_empty());
    }
}

mod engine_properties {
    use super::*;
    use futures::future::join_all;

    const QUERIES: [&str; 6] = [
        "",
        "FROM ",
        "FROM a | EVAL ",
        "FROM a | STATS avg(doubleField) BY ",
        "FROM a | KEEP keywordField, ",
        "FROM a | FORK (WHERE integerField > 1) (",
    ];

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn suggest_is_idempotent(ctx: &mut MockSchema) {
        for text in QUERIES {
            let first = at_end(ctx, text).await;
            let second = at_end(ctx, text).await;
            assert_eq!(first, second, "{text}");
        }
    }

    #[test_context(MockSchema)]
    #[rstest]
    #[case(' ')]
    #[case(',')]
    #[case('(')]
    #[tokio::test]
    async fn trigger_character_does_not_change_content(ctx: &mut MockSchema, #[case] trigger: char) {
        for text in QUERIES {
            let invoked = ctx.suggest(text, text.len()).await;
            let triggered = suggest(text, Cursor::triggered_by(text.len(), trigger), &ctx.callbacks).await;
            assert_eq!(invoked, triggered, "{text}");
        }
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn concurrent_calls_do_not_interfere(ctx: &mut MockSchema) {
        let ctx: &MockSchema = ctx;
        let mut sequential = Vec::new();
        for text in QUERIES {
            sequential.push(at_end(ctx, text).await);
        }
        let concurrent = join_all(QUERIES.iter().map(|text| at_end(ctx, text))).await;
        assert_eq!(sequential, concurrent);
    }

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn cursor_beyond_text_is_clamped(ctx: &mut MockSchema) {
        let clamped = ctx.suggest("FROM a | ", 400).await;
        assert_eq!(clamped, at_end(ctx, "FROM a | ").await);
    }

    #[tokio::test]
    async fn failing_collaborator_still_completes() {
        struct Down;
        impl SchemaCallbacks for Down {
            async fn get_columns_for(&self, _: &str) -> Result<Option<Vec<ColumnInfo>>> {
                Err(Error::callback("down"))
            }
            async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
                Err(Error::callback("down"))
            }
            async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
                Err(Error::callback("down"))
            }
        }
        let result = suggest("FROM a | EVAL ", 14, &Down).await;
        assert!(result.iter().any(|s| s.text == "abs($0)"));
        assert!(result.iter().all(|s| s.kind != SuggestionKind::Column));
    }
}
