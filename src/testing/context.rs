use crate::testing::*;
use crate::*;
use std::sync::Arc;
use test_context::AsyncTestContext;
pub use test_context::test_context;

/// Per-test collaborator over [`mock_schema`], behind the moka cache the
/// way embedders are expected to wire it.
pub struct MockSchema {
    pub schema: Arc<ExternalSchema>,
    pub callbacks: CachedCallbacks<Arc<ExternalSchema>>,
}

impl MockSchema {
    pub async fn validate(&self, text: &str) -> Vec<Message> {
        validate_query(text, &self.callbacks, &ValidationOptions::default()).await
    }

    pub async fn validate_with(&self, text: &str, license: LicenseTier) -> Vec<Message> {
        validate_query(text, &self.callbacks, &ValidationOptions::with_license(license)).await
    }

    pub async fn suggest(&self, text: &str, cursor: usize) -> Suggestions {
        suggest(text, cursor, &self.callbacks).await
    }
}

impl AsyncTestContext for MockSchema {
    async fn setup() -> Self {
        crate::testing::common_init();
        let schema = Arc::new(mock_schema());
        Self {
            callbacks: CachedCallbacks::new(schema.clone()),
            schema,
        }
    }

    async fn teardown(self) {
        self.callbacks.invalidate_all();
    }
}
