//! Structured diagnostics.
//!
//! A diagnostic is identified by a closed [`MessageId`]; the catalog maps each
//! id to its severity and an English template. Rendering goes through the
//! [`Translate`] seam so callers can localize from `code` + `params` alone.
mod catalog;

pub use catalog::{Template, template};

use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named template parameters, rendered into `{name}` placeholders.
pub type Params = BTreeMap<&'static str, String>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[display("error")]
    Error,
    #[display("warning")]
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageId {
    SyntaxError,
    UnknownColumn,
    UnknownIndex,
    UnknownFunction,
    UnknownPolicy,
    UnknownMetadataField,
    UnknownInterval,
    UnknownDissectKeyword,
    WrongDissectOptionArgumentType,
    WrongArgumentNumber,
    WrongArgumentType,
    ExpectedConstant,
    UnsupportedLiteralOption,
    UnsupportedFunctionForCommand,
    UnsupportedFunctionForCommandOption,
    AggInAggFunction,
    NoAggFunction,
    ExpressionNotAggClosed,
    StatsNoArguments,
    UnsupportedColumnTypeForCommand,
    DropAllColumnsError,
    WildcardNotSupportedForCommand,
    UnsupportedSettingCommandValue,
    LicenseRequired,
    LicenseRequiredForSignature,
    TooManyForks,
    ForkTooFewBranches,
    InvalidJoinIndex,
    InvalidSampleProbability,
    MetadataBracketsDeprecation,
    UnsupportedFieldType,
    SchemaUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub text: String,
    pub location: Location,
    pub code: MessageId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// Turns a message id and its parameters into display text.
pub trait Translate {
    fn translate(&self, id: MessageId, params: &Params) -> String;
}

/// Renders the built-in English templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl Translate for DefaultTranslator {
    fn translate(&self, id: MessageId, params: &Params) -> String {
        render(template(id).text, params)
    }
}

/// Replace `{name}` placeholders; unknown placeholders are kept verbatim.
pub fn render(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match params.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

impl MessageId {
    pub fn severity(self) -> Severity {
        template(self).severity
    }

    /// Build the message with the default English rendering.
    pub fn at(self, location: Location, params: Params) -> Message {
        self.translated(location, params, &DefaultTranslator)
    }

    pub fn translated(self, location: Location, params: Params, translator: &impl Translate) -> Message {
        Message {
            severity: self.severity(),
            text: translator.translate(self, &params),
            location,
            code: self,
            params: params
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

impl Message {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders() {
        let params = params! { "fn" => "abs", "expected" => "exactly one argument", "actual" => 2 };
        let message = MessageId::WrongArgumentNumber.at(Location::new(3, 9), params);
        assert_eq!(message.severity, Severity::Error);
        assert_eq!(
            message.text,
            "Error: [abs] function expects exactly one argument, got 2."
        );
        assert_eq!(message.params.get("fn").map(String::as_str), Some("abs"));
    }

    #[test]
    fn unknown_placeholders_survive() {
        assert_eq!(render("a {b} {c", &params! { "x" => 1 }), "a {b} {c");
        assert_eq!(render("no params", &Params::new()), "no params");
    }

    #[test]
    fn warnings_are_warnings() {
        assert_eq!(MessageId::MetadataBracketsDeprecation.severity(), Severity::Warning);
        assert_eq!(MessageId::UnsupportedFieldType.severity(), Severity::Warning);
        assert_eq!(MessageId::SchemaUnavailable.severity(), Severity::Warning);
        assert_eq!(MessageId::TooManyForks.severity(), Severity::Error);
    }

    #[test]
    fn json_shape() {
        let message = MessageId::UnknownColumn.at(Location::new(14, 26), params! { "name" => "missingField" });
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "unknownColumn");
        assert_eq!(json["location"]["start"], 14);
        assert_eq!(json["text"], "Unknown column [missingField]");
    }

    struct Shouting;

    impl Translate for Shouting {
        fn translate(&self, id: MessageId, params: &Params) -> String {
            DefaultTranslator.translate(id, params).to_uppercase()
        }
    }

    #[test]
    fn custom_translator() {
        let message = MessageId::UnknownIndex.translated(
            Location::default(),
            params! { "name" => "logs" },
            &Shouting,
        );
        assert_eq!(message.text, "UNKNOWN INDEX [LOGS]");
        assert_eq!(message.code, MessageId::UnknownIndex);
    }
}
