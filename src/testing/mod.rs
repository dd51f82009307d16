#![cfg(test)]
crate::reexport!(fixtures);
crate::reexport!(context);
pub use rstest::*;

pub(in crate::testing) fn common_init() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Only initialize once for all tests
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env()) // <- reads RUST_LOG
            .with_test_writer() // ensures it integrates with `cargo test` output
            .init();
    });
}

mod mock_schema_tests {
    use super::{super::*, *};

    #[test_context(MockSchema)]
    #[tokio::test]
    async fn serves_one_field_per_type(ctx: &mut MockSchema) -> Result {
        let columns = ctx.callbacks.get_columns_for("FROM index").await?.unwrap_or_default();
        assert_eq!(columns.len(), FIELDS.len());
        let types: Vec<_> = columns.iter().map(ColumnInfo::field_type).collect();
        assert!(types.contains(&FieldType::GeoShape));
        assert!(types.contains(&FieldType::Unsupported));
        Ok(())
    }

    #[test_context(MockSchema)]
    #[rstest]
    #[case("FROM lookup_index", &["joinKey", "joinValue", "keywordField"])]
    #[case("FROM a | KEEP otherStringField", &["otherStringField"])]
    #[tokio::test]
    async fn columns_follow_the_prefix(
        ctx: &mut MockSchema,
        #[case] query: &str,
        #[case] expected: &[&str],
    ) -> Result {
        let columns = ctx.callbacks.get_columns_for(query).await?.unwrap_or_default();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, expected);
        Ok(())
    }
}
