use crate::*;
use moka::future::Cache;
use std::{sync::Arc, time::Duration};

/// Memoizes a collaborator by query prefix.
///
/// Entries expire after the configured TTL. Failed calls are not cached so
/// the next keystroke retries them.
pub struct CachedCallbacks<C> {
    inner: C,
    columns: Cache<String, Option<Vec<ColumnInfo>>>,
    sources: Cache<(), Option<Vec<SourceInfo>>>,
    policies: Cache<(), Option<Vec<PolicyInfo>>>,
    join_indices: Cache<(), Option<Vec<SourceInfo>>>,
}

impl<C: SchemaCallbacks> CachedCallbacks<C> {
    /// Capacity and TTL from [`config()`].
    pub fn new(inner: C) -> Self {
        let config = config();
        Self::with_limits(inner, config.cache_capacity, config.cache_ttl())
    }

    pub fn with_limits(inner: C, capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            columns: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            sources: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            policies: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            join_indices: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop every cached response, e.g. after the collaborator's data changed.
    pub fn invalidate_all(&self) {
        self.columns.invalidate_all();
        self.sources.invalidate_all();
        self.policies.invalidate_all();
        self.join_indices.invalidate_all();
    }
}

fn shared(err: Arc<Error>) -> Error {
    Error::callback(err.to_string())
}

impl<C: SchemaCallbacks> SchemaCallbacks for CachedCallbacks<C> {
    async fn get_columns_for(&self, query: &str) -> Result<Option<Vec<ColumnInfo>>> {
        let key = query.trim().to_string();
        self.columns
            .try_get_with(key, async {
                trace!("Column cache miss for {query:?}");
                self.inner.get_columns_for(query).await
            })
            .await
            .map_err(shared)
    }

    async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
        self.sources
            .try_get_with((), self.inner.get_sources())
            .await
            .map_err(shared)
    }

    async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
        self.policies
            .try_get_with((), self.inner.get_policies())
            .await
            .map_err(shared)
    }

    async fn get_join_indices(&self) -> Result<Option<Vec<SourceInfo>>> {
        self.join_indices
            .try_get_with((), self.inner.get_join_indices())
            .await
            .map_err(shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl SchemaCallbacks for Counting {
        async fn get_columns_for(&self, query: &str) -> Result<Option<Vec<ColumnInfo>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::callback("timeout"));
            }
            Ok(Some(vec![ColumnInfo::new(query, "keyword")]))
        }

        async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(vec![SourceInfo::new("a"), SourceInfo::new("b").lookup()]))
        }

        async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn keyed_by_prefix() -> Result {
        let cached = CachedCallbacks::with_limits(Counting::default(), 16, Duration::from_secs(60));
        let first = cached.get_columns_for("FROM a").await?;
        let again = cached.get_columns_for("FROM a").await?;
        assert_eq!(first, again);
        cached.get_columns_for("FROM b").await?;
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);

        cached.get_sources().await?;
        cached.get_sources().await?;
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    /// Join indices come from a dedicated endpoint, not a filter over sources.
    struct JoinEndpoint {
        calls: AtomicUsize,
    }

    impl SchemaCallbacks for JoinEndpoint {
        async fn get_columns_for(&self, _query: &str) -> Result<Option<Vec<ColumnInfo>>> {
            Ok(Some(vec![ColumnInfo::new("x", "keyword")]))
        }

        async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
            Ok(Some(vec![SourceInfo::new("a")]))
        }

        async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
            Ok(None)
        }

        async fn get_join_indices(&self) -> Result<Option<Vec<SourceInfo>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(vec![SourceInfo::new("special").lookup()]))
        }
    }

    #[tokio::test]
    async fn join_indices_are_forwarded_and_memoized() -> Result {
        let endpoint = JoinEndpoint {
            calls: AtomicUsize::new(0),
        };
        let cached = CachedCallbacks::with_limits(endpoint, 16, Duration::from_secs(60));

        let joinable = cached.get_join_indices().await?.unwrap_or_default();
        assert_eq!(joinable, vec![SourceInfo::new("special").lookup()]);
        cached.get_join_indices().await?;
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);

        let messages = validate_query(
            "FROM a | LOOKUP JOIN special ON x",
            &cached,
            &ValidationOptions::default(),
        )
        .await;
        assert!(
            messages.iter().all(|m| m.code != MessageId::InvalidJoinIndex),
            "{messages:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn join_indices_default_to_lookup_sources() -> Result {
        let cached = CachedCallbacks::with_limits(Counting::default(), 16, Duration::from_secs(60));
        let joinable = cached.get_join_indices().await?.unwrap_or_default();
        assert_eq!(joinable, vec![SourceInfo::new("b").lookup()]);
        Ok(())
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let failing = Counting {
            fail: true,
            ..Default::default()
        };
        let cached = CachedCallbacks::with_limits(failing, 16, Duration::from_secs(60));
        assert!(cached.get_columns_for("FROM a").await.is_err());
        assert!(cached.get_columns_for("FROM a").await.is_err());
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_prefixes_do_not_cross() -> Result {
        let cached = CachedCallbacks::with_limits(Counting::default(), 16, Duration::from_secs(60));
        let prefixes = ["FROM a", "FROM a | KEEP x", "FROM b"];
        let results =
            futures::future::join_all(prefixes.iter().map(|p| cached.get_columns_for(p))).await;
        for (prefix, result) in prefixes.iter().zip(results) {
            let columns = result?.unwrap_or_default();
            assert_eq!(columns[0].name, *prefix);
        }
        Ok(())
    }
}
