use crate::*;
use itertools::Itertools;
use std::collections::HashMap;

/// Collaborator data fetched once per `validate`/`suggest` call.
///
/// `None` means the collaborator did not provide that list, which disables
/// the checks depending on it. Failed calls are recorded in `failures` and
/// behave like `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSnapshot {
    /// Columns produced by the source command.
    pub columns: Option<Vec<ColumnInfo>>,
    pub sources: Option<Vec<SourceInfo>>,
    pub policies: Option<Vec<PolicyInfo>>,
    pub join_indices: Option<Vec<SourceInfo>>,
    /// Columns of each JOIN index referenced by the query.
    pub join_columns: HashMap<String, Vec<ColumnInfo>>,
    /// Enrich fields of each policy referenced by the query, typed.
    pub policy_columns: HashMap<String, Vec<ColumnInfo>>,
    pub failures: Vec<String>,
}

impl SchemaSnapshot {
    /// Fetch what `query` needs. Each column request only sees the query
    /// prefix up to the command that needs it.
    pub async fn collect<C: SchemaCallbacks + ?Sized>(
        query: &Query,
        text: &str,
        callbacks: &C,
    ) -> Self {
        let mut snapshot = SchemaSnapshot::default();

        if let Some(first) = query.commands.first() {
            snapshot.columns = match first.name.as_str() {
                "from" | "ts" => {
                    let prefix = Location::new(0, first.location.end).slice(text);
                    snapshot.record("columns", callbacks.get_columns_for(prefix).await)
                }
                _ => Some(Vec::new()),
            };
        }
        snapshot.sources = snapshot.record("sources", callbacks.get_sources().await);

        let mut joins = Vec::new();
        let mut enriches = Vec::new();
        let mut has_join = false;
        let mut has_enrich = false;
        query.visit_commands(&mut |command| {
            has_join |= command.name == "join";
            has_enrich |= command.name == "enrich";
            let target = command.positional().find_map(Node::as_source);
            match (command.name.as_str(), target) {
                ("join", Some(source)) => joins.push(source.index.clone()),
                ("enrich", Some(source)) => enriches.push(source.index.clone()),
                _ => {}
            }
        });

        if has_join {
            snapshot.join_indices =
                snapshot.record("join indices", callbacks.get_join_indices().await);
        }
        for index in joins.into_iter().unique() {
            let request = format!("FROM {}", escape_source(&index));
            if let Some(columns) =
                snapshot.record("join columns", callbacks.get_columns_for(&request).await)
            {
                snapshot.join_columns.insert(index, columns);
            }
        }

        if has_enrich {
            snapshot.policies = snapshot.record("policies", callbacks.get_policies().await);
        }
        for name in enriches.into_iter().unique() {
            let Some(policy) = snapshot.policy(&name).cloned() else {
                continue;
            };
            if policy.enrich_fields.is_empty() {
                snapshot.policy_columns.insert(name, Vec::new());
                continue;
            }
            let request = format!(
                "FROM {} | KEEP {}",
                policy.source_indices.iter().map(|s| escape_source(s)).join(", "),
                policy.enrich_fields.iter().map(|f| escape_identifier(f)).join(", ")
            );
            if let Some(columns) =
                snapshot.record("policy columns", callbacks.get_columns_for(&request).await)
            {
                snapshot.policy_columns.insert(name, columns);
            }
        }

        debug!(
            "Collected schema snapshot: {} columns, {} failures",
            snapshot.columns.as_ref().map_or(0, Vec::len),
            snapshot.failures.len()
        );
        snapshot
    }

    fn record<T>(&mut self, what: &str, result: Result<Option<T>>) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(err) => {
                warn!("Schema callback for {what} failed: {err}");
                self.failures.push(err.to_string());
                None
            }
        }
    }

    pub fn policy(&self, name: &str) -> Option<&PolicyInfo> {
        self.policies.as_ref()?.iter().find(|p| p.name == name)
    }

    pub fn source(&self, name: &str) -> Option<&SourceInfo> {
        self.sources.as_ref()?.iter().find(|s| s.name == name)
    }

    /// A single warning when any collaborator call failed.
    pub fn unavailable_warning(&self, location: Location) -> Option<Message> {
        let reason = self.failures.first()?;
        Some(MessageId::SchemaUnavailable.at(location, params! { "reason" => reason }))
    }
}

fn escape_source(name: &str) -> String {
    if name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '*' | ':'))
    {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl SchemaCallbacks for Failing {
        async fn get_columns_for(&self, _query: &str) -> Result<Option<Vec<ColumnInfo>>> {
            Err(Error::callback("cluster unreachable"))
        }

        async fn get_sources(&self) -> Result<Option<Vec<SourceInfo>>> {
            Ok(Some(vec![SourceInfo::new("logs")]))
        }

        async fn get_policies(&self) -> Result<Option<Vec<PolicyInfo>>> {
            Ok(None)
        }
    }

    fn schema() -> ExternalSchema {
        ExternalSchema::new()
            .with_columns([ColumnInfo::new("a", "keyword"), ColumnInfo::new("zip", "keyword")])
            .with_sources([SourceInfo::new("logs"), SourceInfo::new("people").lookup()])
            .with_policies([PolicyInfo::new("geo", ["zips"], "zip", ["city"])])
            .with_index_columns("people", [ColumnInfo::new("person", "keyword")])
            .with_index_columns(
                "zips",
                [ColumnInfo::new("zip", "keyword"), ColumnInfo::new("city", "text")],
            )
    }

    #[tokio::test]
    async fn collects_what_the_query_references() {
        let text = "FROM logs | LOOKUP JOIN people ON a | ENRICH geo ON zip";
        let ParseResult { query, .. } = parse(text);
        let snapshot = SchemaSnapshot::collect(&query, text, &schema()).await;
        assert_eq!(snapshot.columns.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            snapshot.join_columns.get("people"),
            Some(&vec![ColumnInfo::new("person", "keyword")])
        );
        assert_eq!(
            snapshot.policy_columns.get("geo"),
            Some(&vec![ColumnInfo::new("city", "text")])
        );
        assert!(snapshot.failures.is_empty());
    }

    #[tokio::test]
    async fn row_needs_no_column_callback() {
        let text = "ROW a = 1";
        let ParseResult { query, .. } = parse(text);
        let snapshot = SchemaSnapshot::collect(&query, text, &Failing).await;
        assert_eq!(snapshot.columns, Some(Vec::new()));
        assert!(snapshot.failures.is_empty());
    }

    #[tokio::test]
    async fn failures_become_one_warning() {
        let text = "FROM logs | LOOKUP JOIN people ON a";
        let ParseResult { query, .. } = parse(text);
        let snapshot = SchemaSnapshot::collect(&query, text, &Failing).await;
        assert_eq!(snapshot.columns, None);
        assert_eq!(snapshot.failures.len(), 2);
        let warning = snapshot
            .unavailable_warning(Location::new(0, 4))
            .expect("warning");
        assert_eq!(warning.code, MessageId::SchemaUnavailable);
        assert!(!warning.is_error());
    }
}
