//! Request messages accepted by the sidecar endpoints
//!
//! Each message declares its rule set once; the typed struct is only built
//! after the raw fields pass validation.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::rules::{Activation, Check, FieldValues, RuleSet, ValidationResult};

/// Maximum length of a sidecar command
pub const MAX_COMMAND_LENGTH: usize = 4096;
/// Maximum length of a sidecar name
pub const MAX_NAME_LENGTH: usize = 255;

const PROCESS_TYPE_MINIMUM: Check = Check::MinArrayLength {
    min: 1,
    noun: "process_type",
};

/// A request body that is validated against a declarative rule set
pub trait RequestMessage: DeserializeOwned + Sized {
    /// Short name used in logs and metrics
    const NAME: &'static str;

    fn rule_set() -> &'static RuleSet;

    fn validate(fields: &FieldValues) -> ValidationResult {
        Self::rule_set().validate(fields)
    }

    fn from_fields(fields: FieldValues) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(fields))
    }
}

static SIDECAR_UPDATE_RULES: Lazy<RuleSet> = Lazy::new(|| {
    use Activation::IfRequested;

    RuleSet::new(&["name", "command", "process_types"])
        .rule("name", Check::Presence, IfRequested)
        .rule("name", Check::IsString, IfRequested)
        .rule("command", Check::Presence, IfRequested)
        .rule("command", Check::IsString, IfRequested)
        .rule("command", Check::MaxLength(MAX_COMMAND_LENGTH), IfRequested)
        .rule("process_types", Check::IsArray, IfRequested)
        .rule("process_types", PROCESS_TYPE_MINIMUM, IfRequested)
});

static SIDECAR_CREATE_RULES: Lazy<RuleSet> = Lazy::new(|| {
    use Activation::{Always, IfRequested};

    RuleSet::new(&["name", "command", "process_types", "memory_in_mb"])
        .rule("name", Check::Presence, Always)
        .rule("name", Check::IsString, Always)
        .rule("name", Check::MaxLength(MAX_NAME_LENGTH), Always)
        .rule("command", Check::Presence, Always)
        .rule("command", Check::IsString, Always)
        .rule("command", Check::MaxLength(MAX_COMMAND_LENGTH), Always)
        .rule("process_types", Check::Presence, Always)
        .rule("process_types", Check::IsArray, Always)
        .rule("process_types", PROCESS_TYPE_MINIMUM, Always)
        .rule("memory_in_mb", Check::PositiveInteger, IfRequested)
});

/// Partial update of a sidecar; omitted fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SidecarUpdateMessage {
    pub name: Option<String>,
    pub command: Option<String>,
    pub process_types: Option<Vec<String>>,
    #[serde(skip)]
    requested: BTreeSet<String>,
}

impl SidecarUpdateMessage {
    /// Whether the key was present in the submitted payload
    pub fn requested(&self, key: &str) -> bool {
        self.requested.contains(key)
    }
}

impl RequestMessage for SidecarUpdateMessage {
    const NAME: &'static str = "sidecar_update";

    fn rule_set() -> &'static RuleSet {
        &SIDECAR_UPDATE_RULES
    }

    fn from_fields(fields: FieldValues) -> Result<Self, serde_json::Error> {
        let requested = fields.keys().cloned().collect();
        let mut message: Self = serde_json::from_value(Value::Object(fields))?;
        message.requested = requested;
        Ok(message)
    }
}

/// New sidecar for an app
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SidecarCreateMessage {
    pub name: String,
    pub command: String,
    pub process_types: Vec<String>,
    pub memory_in_mb: Option<u64>,
}

impl RequestMessage for SidecarCreateMessage {
    const NAME: &'static str = "sidecar_create";

    fn rule_set() -> &'static RuleSet {
        &SIDECAR_CREATE_RULES
    }
}
