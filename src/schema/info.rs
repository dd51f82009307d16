use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Elasticsearch type name as reported by the collaborator.
    #[serde(rename = "type")]
    pub ty: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn field_type(&self) -> FieldType {
        FieldType::from_es(&self.ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    /// Index mode; `lookup` indices can be joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl SourceInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            mode: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn lookup(mut self) -> Self {
        self.mode = Some("lookup".into());
        self
    }

    pub fn is_lookup(&self) -> bool {
        self.mode.as_deref() == Some("lookup")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInfo {
    pub name: String,
    pub source_indices: Vec<String>,
    pub match_field: String,
    pub enrich_fields: Vec<String>,
}

impl PolicyInfo {
    pub fn new(
        name: impl Into<String>,
        source_indices: impl IntoIterator<Item = impl Into<String>>,
        match_field: impl Into<String>,
        enrich_fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            source_indices: source_indices.into_iter().map(Into::into).collect(),
            match_field: match_field.into(),
            enrich_fields: enrich_fields.into_iter().map(Into::into).collect(),
        }
    }
}
