use crate::*;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, future::Future, sync::Arc};

/// Read-only access to live schema data.
///
/// Every method may suspend on I/O. Returning `Ok(None)` means the data is
/// not available to this caller and disables the checks that need it;
/// `Err` is a collaborator failure and is reported as a single warning.
pub trait SchemaCallbacks: Send + Sync {
    /// Columns produced by `query`, a prefix of the query being processed.
    fn get_columns_for(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Vec<ColumnInfo>>>> + Send;

    fn get_sources(&self) -> impl Future<Output = Result<Option<Vec<SourceInfo>>>> + Send;

    fn get_policies(&self) -> impl Future<Output = Result<Option<Vec<PolicyInfo>>>> + Send;

    /// Indices usable on the right side of a JOIN.
    fn get_join_indices(&self) -> impl Future<Output = Result<Option<Vec<SourceInfo>>>> + Send {
        async move {
            let sources = self.get_sources().await?;
            Ok(sources.map(|all| all.into_iter().filter(SourceInfo::is_lookup).collect()))
        }
    }
}

impl<T: SchemaCallbacks> SchemaCallbacks for Arc<T> {
    fn get_columns_for(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Vec<ColumnInfo>>>> + Send {
        self.as_ref().get_columns_for(query)
    }

    fn get_sources(&self) -> impl Future<Output = Result<Option<Vec<SourceInfo>>>> + Send {
        self.as_ref().get_sources()
    }

    fn get_policies(&self) -> impl Future<Output = Result<Option<Vec<PolicyInfo>>>> + Send {
        self.as_ref().get_policies()
    }

    fn get_join_indices(&self) -> impl Future<Output = Result<Option<Vec<SourceInfo>>>> + Send {
        self.as_ref().get_join_indices()
    }
}

/// In-memory schema, usable directly as [`SchemaCallbacks`].
///
/// `columns` are returned for any query whose sources have no entry in
/// `index_columns`. A trailing `KEEP` in the requested prefix narrows the
/// result, which is how enrich policy fields are resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalSchema {
    pub columns: Option<Vec<ColumnInfo>>,
    pub sources: Option<Vec<SourceInfo>>,
    pub policies: Option<Vec<PolicyInfo>>,
    pub index_columns: HashMap<String, Vec<ColumnInfo>>,
}

impl ExternalSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnInfo>) -> Self {
        self.columns = Some(columns.into_iter().collect());
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = SourceInfo>) -> Self {
        self.sources = Some(sources.into_iter().collect());
        self
    }

    pub fn with_policies(mut self, policies: impl IntoIterator<Item = PolicyInfo>) -> Self {
        self.policies = Some(policies.into_iter().collect());
        self
    }

    pub fn with_index_columns(
        mut self,
        index: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnInfo>,
    ) -> Self {
        self.index_columns
            .insert(index.into(), columns.into_iter().collect());
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn columns_for(&self, query: &str) -> Option<Vec<ColumnInfo>> {
        let ParseResult { query: parsed, .. } = parse(query);
        let mut commands = parsed.commands.iter();
        let from = commands.next()?;

        let indexed: Vec<&ColumnInfo> = from
            .args
            .iter()
            .filter_map(Node::as_source)
            .filter_map(|s| self.index_columns.get(&s.name))
            .flatten()
            .collect();
        let mut columns: Vec<ColumnInfo> = if indexed.is_empty() {
            self.columns.clone()?
        } else {
            indexed.into_iter().cloned().collect()
        };

        if let Some(keep) = commands.find(|c| c.name == "keep") {
            let kept: Vec<&str> = keep
                .args
                .iter()
                .filter_map(Node::as_column)
                .map(|c| c.name.as_str())
                .collect();
            columns.retain(|c| kept.contains(&c.name.as_str()));
        }
        Some(columns)
    }
}

impl SchemaCallbacks for ExternalSchema {
    async fn get_columns_for(&self, query: &str) -> Result<Option<Vec<ColumnInfo>>> {
        Ok(self.columns_for(query))
    }

    async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
        Ok(self.sources.clone())
    }

    async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
        Ok(self.policies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ExternalSchema {
        ExternalSchema::new()
            .with_columns([ColumnInfo::new("a", "keyword"), ColumnInfo::new("b", "long")])
            .with_sources([SourceInfo::new("logs"), SourceInfo::new("lookup_idx").lookup()])
            .with_index_columns("lookup_idx", [ColumnInfo::new("k", "keyword")])
    }

    #[tokio::test]
    async fn columns_by_source_and_keep() -> Result {
        let schema = schema();
        let all = schema.get_columns_for("FROM logs").await?.unwrap_or_default();
        assert_eq!(all.len(), 2);
        let lookup = schema.get_columns_for("FROM lookup_idx").await?.unwrap_or_default();
        assert_eq!(lookup, vec![ColumnInfo::new("k", "keyword")]);
        let kept = schema.get_columns_for("FROM logs | KEEP b").await?.unwrap_or_default();
        assert_eq!(kept, vec![ColumnInfo::new("b", "long")]);
        Ok(())
    }

    #[tokio::test]
    async fn join_indices_default_to_lookup_sources() -> Result {
        let joinable = schema().get_join_indices().await?.unwrap_or_default();
        assert_eq!(joinable.len(), 1);
        assert_eq!(joinable[0].name, "lookup_idx");
        Ok(())
    }

    #[tokio::test]
    async fn missing_data_is_none() -> Result {
        let empty = ExternalSchema::new();
        assert_eq!(empty.get_sources().await?, None);
        assert_eq!(empty.get_columns_for("FROM x").await?, None);
        Ok(())
    }

    #[test]
    fn loads_from_json() -> Result {
        let schema = ExternalSchema::from_json(
            r#"{"columns":[{"name":"a","type":"ip"}],"sources":[{"name":"logs"}]}"#,
        )?;
        assert_eq!(schema.columns.map(|c| c.len()), Some(1));
        assert!(schema.policies.is_none());
        assert!(ExternalSchema::from_json("{").is_err());
        Ok(())
    }
}
