use crate::*;
use serde::{Deserialize, Serialize};

/// What kind of thing a suggestion inserts; editors pick an icon from it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    #[display("keyword")]
    Keyword,
    #[display("command")]
    Command,
    #[display("function")]
    Function,
    #[display("operator")]
    Operator,
    #[display("column")]
    Column,
    #[display("source")]
    Source,
    #[display("policy")]
    Policy,
    #[display("value")]
    Value,
}

/// Tells the editor to reopen the suggestion menu once the item is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCommand {
    pub title: String,
    pub id: String,
}

impl TriggerCommand {
    pub fn suggest() -> Self {
        Self {
            title: "Trigger Suggestion Dialog".into(),
            id: "editor.action.triggerSuggest".into(),
        }
    }
}

/// A completion candidate. `text` replaces `range_to_replace`, or is
/// inserted at the cursor when there is no range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("{text}")]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub label: String,
    pub text: String,
    pub kind: SuggestionKind,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_to_replace: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<TriggerCommand>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub as_snippet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
}

pub type Suggestions = Vec<Suggestion>;

impl Suggestion {
    pub fn new(kind: SuggestionKind, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            kind,
            detail: String::new(),
            filter_text: None,
            range_to_replace: None,
            command: None,
            as_snippet: false,
            sort_text: None,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn retrigger(mut self) -> Self {
        self.command = Some(TriggerCommand::suggest());
        self
    }

    pub fn range(mut self, range: Option<Location>) -> Self {
        self.range_to_replace = range;
        self
    }

    pub fn filter(mut self, filter_text: impl Into<String>) -> Self {
        self.filter_text = Some(filter_text.into());
        self
    }

    pub fn sort(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    /// `KEYWORD ` followed by a new suggestion round.
    pub fn keyword(keyword: &str, detail: &str) -> Self {
        Self::new(SuggestionKind::Keyword, keyword, format!("{keyword} "))
            .detail(detail)
            .retrigger()
    }

    pub fn pipe() -> Self {
        Self::new(SuggestionKind::Keyword, "|", "| ")
            .detail("Pipe (|)")
            .sort("1")
            .retrigger()
    }

    pub fn comma() -> Self {
        Self::new(SuggestionKind::Keyword, ",", ", ")
            .detail("Comma (,)")
            .sort("1")
            .retrigger()
    }

    pub fn assign() -> Self {
        Self::new(SuggestionKind::Operator, "=", "= ")
            .detail("Assign (=)")
            .retrigger()
    }

    pub fn command(definition: &CommandDefinition) -> Self {
        let label = definition.label();
        Self::new(SuggestionKind::Command, label.clone(), format!("{label} "))
            .detail(definition.description)
            .retrigger()
    }

    pub fn column(field: &Field) -> Self {
        let detail = field.ty.map(|t| t.to_string()).unwrap_or_default();
        Self::new(
            SuggestionKind::Column,
            field.name.clone(),
            escape_identifier(&field.name),
        )
        .detail(detail)
    }

    /// `name($0)` snippet placing the cursor between the parentheses.
    pub fn function(definition: &FunctionDefinition) -> Self {
        let (text, snippet) = if definition.max_args() == Some(0) {
            (format!("{}()", definition.name), false)
        } else {
            (format!("{}($0)", definition.name), true)
        };
        let mut suggestion = Self::new(
            SuggestionKind::Function,
            definition.name.to_ascii_uppercase(),
            text,
        )
        .detail(definition.description)
        .sort("2");
        suggestion.as_snippet = snippet;
        if snippet { suggestion.retrigger() } else { suggestion }
    }

    /// Infix operator with surrounding spaces, e.g. `== `.
    pub fn operator(symbol: &str, detail: &str) -> Self {
        let text = match symbol.chars().next() {
            Some(c) if c.is_alphabetic() => symbol.to_ascii_uppercase(),
            _ => symbol.to_string(),
        };
        Self::new(SuggestionKind::Operator, text.clone(), format!("{text} "))
            .detail(detail)
            .sort("3")
            .retrigger()
    }

    pub fn source(source: &SourceInfo) -> Self {
        let text = if source
            .name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '*' | ':'))
        {
            source.name.clone()
        } else {
            format!("\"{}\"", source.name)
        };
        let detail = if source.is_lookup() { "Lookup index" } else { "Index" };
        Self::new(SuggestionKind::Source, source.name.clone(), text).detail(detail)
    }

    pub fn policy(policy: &PolicyInfo) -> Self {
        Self::new(SuggestionKind::Policy, policy.name.clone(), format!("{} ", policy.name))
            .detail(format!(
                "Policy on {}, matching {}",
                policy.source_indices.join(", "),
                policy.match_field
            ))
            .retrigger()
    }

    /// A literal value inserted as written.
    pub fn value(text: impl Into<String>, detail: &str) -> Self {
        let text = text.into();
        Self::new(SuggestionKind::Value, text.clone(), text).detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_escaped() {
        let field = Field {
            name: "any#Char$Field".into(),
            ty: Some(FieldType::Double),
            user_defined: false,
        };
        let suggestion = Suggestion::column(&field);
        assert_eq!(suggestion.text, "`any#Char$Field`");
        assert_eq!(suggestion.label, "any#Char$Field");
        assert_eq!(suggestion.detail, "double");
        assert!(suggestion.command.is_none());
    }

    #[test]
    fn functions_are_snippets() {
        let round = function_definition("round").map(Suggestion::function);
        let round = round.expect("round is registered");
        assert_eq!(round.text, "round($0)");
        assert!(round.as_snippet);
        assert!(round.command.is_some());
        let pi = function_definition("pi").map(Suggestion::function);
        assert_eq!(pi.map(|s| s.text), Some("pi()".to_string()));
    }

    #[test]
    fn json_shape() {
        let suggestion = Suggestion::pipe().range(Some(Location::new(3, 5)));
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["text"], "| ");
        assert_eq!(json["rangeToReplace"]["start"], 3);
        assert_eq!(json["command"]["id"], "editor.action.triggerSuggest");
        assert!(json.get("asSnippet").is_none());
        assert!(json.get("filterText").is_none());
    }

    #[test]
    fn displays_inserted_text() {
        assert_eq!(Suggestion::keyword("BY", "").to_string(), "BY ");
        assert_eq!(Suggestion::operator("not in", "").text, "NOT IN ");
    }
}
