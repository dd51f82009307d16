//! The schema most tests run against.
use crate::*;

/// One column per supported type, plus names that need quoting.
pub const FIELDS: &[(&str, &str)] = &[
    ("keywordField", "keyword"),
    ("otherStringField", "keyword"),
    ("textField", "text"),
    ("integerField", "integer"),
    ("longField", "long"),
    ("unsignedLongField", "unsigned_long"),
    ("doubleField", "double"),
    ("dateField", "date"),
    ("dateNanosField", "date_nanos"),
    ("booleanField", "boolean"),
    ("ipField", "ip"),
    ("versionField", "version"),
    ("geoPointField", "geo_point"),
    ("geoShapeField", "geo_shape"),
    ("cartesianPointField", "cartesian_point"),
    ("cartesianShapeField", "cartesian_shape"),
    ("unsupportedField", "unsupported"),
    ("any#Char$Field", "keyword"),
    ("kubernetes.something.something", "keyword"),
    ("@timestamp", "date"),
];

pub const INDICES: &[&str] = &["a", "index", "my-index", "other-index", "logs-2024"];

pub const POLICY: &str = "policy";

pub fn columns(fields: &[(&str, &str)]) -> Vec<ColumnInfo> {
    fields
        .iter()
        .map(|(name, ty)| ColumnInfo::new(*name, *ty))
        .collect()
}

/// The mock collaborator: indices, a hidden index, a lookup index and an
/// enrich policy over `enrich_idx`.
pub fn mock_schema() -> ExternalSchema {
    let sources = INDICES
        .iter()
        .map(|name| SourceInfo::new(*name))
        .chain([
            SourceInfo::new(".secret").hidden(),
            SourceInfo::new("lookup_index").lookup(),
        ]);
    ExternalSchema::new()
        .with_columns(columns(FIELDS))
        .with_sources(sources)
        .with_policies([PolicyInfo::new(
            POLICY,
            ["enrich_idx"],
            "otherStringField",
            ["otherField", "yetAnotherField"],
        )])
        .with_index_columns(
            "lookup_index",
            columns(&[
                ("joinKey", "keyword"),
                ("joinValue", "long"),
                ("keywordField", "keyword"),
            ]),
        )
        .with_index_columns(
            "enrich_idx",
            columns(&[
                ("otherStringField", "keyword"),
                ("otherField", "keyword"),
                ("yetAnotherField", "double"),
            ]),
        )
}
