//! Declarative validation rules for request messages
//!
//! A [`RuleSet`] lists the keys a message accepts and an ordered list of
//! [`FieldRule`]s. Evaluating a rule set against the submitted fields yields a
//! [`ValidationResult`] whose messages follow rule declaration order.

use serde::Serialize;
use serde_json::{Map, Value};

use super::validators::{
    validate_array, validate_max_length, validate_min_array_length, validate_positive_integer,
    validate_presence, validate_string,
};

/// Submitted fields of a request message, in payload order
pub type FieldValues = Map<String, Value>;

/// When a rule is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// On every validation; an absent field is checked as null
    Always,
    /// Only when the key is present in the payload
    IfRequested,
}

/// A single predicate applied to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Presence,
    IsString,
    MaxLength(usize),
    IsArray,
    MinArrayLength { min: usize, noun: &'static str },
    PositiveInteger,
}

impl Check {
    fn apply(&self, value: &Value) -> Result<(), String> {
        match self {
            Check::Presence => validate_presence(value),
            Check::IsString => validate_string(value),
            Check::MaxLength(max) => validate_max_length(value, *max),
            Check::IsArray => validate_array(value),
            Check::MinArrayLength { min, noun } => validate_min_array_length(value, *min, noun),
            Check::PositiveInteger => validate_positive_integer(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub check: Check,
    pub activation: Activation,
}

/// Allowed keys plus ordered field rules for one message type
#[derive(Debug, Clone)]
pub struct RuleSet {
    allowed_keys: Vec<&'static str>,
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(allowed_keys: &[&'static str]) -> Self {
        Self {
            allowed_keys: allowed_keys.to_vec(),
            rules: Vec::new(),
        }
    }

    /// Append a rule. Panics on rules that can never be satisfied or that
    /// name a field the message does not accept.
    pub fn rule(mut self, field: &'static str, check: Check, activation: Activation) -> Self {
        assert!(
            self.allowed_keys.contains(&field),
            "rule for '{}' names a field outside the allowed keys",
            field
        );
        match check {
            Check::MaxLength(0) => panic!("maximum length for '{}' must be positive", field),
            Check::MinArrayLength { min: 0, .. } => {
                panic!("minimum array length for '{}' must be positive", field)
            }
            _ => {}
        }
        self.rules.push(FieldRule {
            field,
            check,
            activation,
        });
        self
    }

    pub fn allowed_keys(&self) -> &[&'static str] {
        &self.allowed_keys
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Run the unknown-key check and every active rule
    pub fn validate(&self, fields: &FieldValues) -> ValidationResult {
        let mut result = ValidationResult::default();

        let unknown: Vec<&str> = fields
            .keys()
            .map(String::as_str)
            .filter(|key| !self.allowed_keys.contains(key))
            .collect();
        if !unknown.is_empty() {
            result.add(format!("Unknown field(s): '{}'", unknown.join("', '")));
        }

        for rule in &self.rules {
            let value = match (fields.get(rule.field), rule.activation) {
                (Some(value), _) => value,
                (None, Activation::Always) => &Value::Null,
                (None, Activation::IfRequested) => continue,
            };
            if let Err(message) = rule.check.apply(value) {
                result.add_field_error(rule.field, message);
            }
        }

        result
    }
}

/// Human-readable label for a field name: `process_types` -> `Process types`
pub fn display_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered full messages produced by a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    messages: Vec<String>,
}

impl ValidationResult {
    /// Add a message that is not tied to a field
    pub fn add(&mut self, message: impl Into<String>) -> &mut Self {
        self.messages.push(message.into());
        self
    }

    /// Add a field message, prefixed with the field's display label
    pub fn add_field_error(&mut self, field: &str, message: impl AsRef<str>) -> &mut Self {
        self.messages
            .push(format!("{} {}", display_label(field), message.as_ref()));
        self
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn full_messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// All messages joined into one sentence
    pub fn to_sentence(&self) -> String {
        self.messages.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> FieldValues {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn rule_set() -> RuleSet {
        RuleSet::new(&["name", "process_types"])
            .rule("name", Check::Presence, Activation::Always)
            .rule("name", Check::IsString, Activation::Always)
            .rule("process_types", Check::IsArray, Activation::IfRequested)
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("process_types"), "Process types");
        assert_eq!(display_label("name"), "Name");
        assert_eq!(display_label("memory_in_mb"), "Memory in mb");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn test_unknown_keys_in_payload_order() {
        let result = rule_set().validate(&fields(json!({
            "zeta": 1,
            "name": "x",
            "alpha": 2,
        })));

        assert_eq!(
            result.full_messages(),
            &["Unknown field(s): 'zeta', 'alpha'".to_string()]
        );
    }

    #[test]
    fn test_always_rule_treats_absent_field_as_null() {
        let result = rule_set().validate(&FieldValues::new());

        assert_eq!(
            result.full_messages(),
            &[
                "Name can't be blank".to_string(),
                "Name must be a string".to_string()
            ]
        );
    }

    #[test]
    fn test_if_requested_rule_skips_absent_field() {
        let result = rule_set().validate(&fields(json!({"name": "x"})));
        assert!(result.is_valid());
    }

    #[test]
    fn test_if_requested_rule_fires_on_explicit_null() {
        let result = rule_set().validate(&fields(json!({"name": "x", "process_types": null})));
        assert_eq!(result.to_sentence(), "Process types must be an array");
    }

    #[test]
    fn test_messages_follow_rule_order_not_payload_order() {
        let result = rule_set().validate(&fields(json!({
            "process_types": "web",
            "name": 7,
        })));

        assert_eq!(
            result.full_messages(),
            &[
                "Name must be a string".to_string(),
                "Process types must be an array".to_string()
            ]
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let rules = rule_set();
        let input = fields(json!({"name": "", "other": true}));
        assert_eq!(rules.validate(&input), rules.validate(&input));
    }

    #[test]
    #[should_panic(expected = "outside the allowed keys")]
    fn test_rule_for_unknown_field_panics() {
        let _ = RuleSet::new(&["name"]).rule("command", Check::Presence, Activation::Always);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_bound_panics() {
        let _ = RuleSet::new(&["command"]).rule("command", Check::MaxLength(0), Activation::Always);
    }

    #[test]
    fn test_result_serializes_as_message_list() {
        let mut result = ValidationResult::default();
        result.add_field_error("name", "can't be blank");
        assert_eq!(serde_json::to_value(&result).unwrap(), json!(["Name can't be blank"]));
    }
}
