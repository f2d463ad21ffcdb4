//! Conversion of errors into JSON error records
//!
//! Errors are classified once, where they are caught, into a
//! [`PresentableError`]. [`ErrorHasher`] turns that into an [`ErrorRecord`]
//! either verbatim (for logs) or sanitized (for response bodies). Unrecognized
//! errors never leak their details through the sanitized form.

use serde::Serialize;
use serde_json::{json, Map, Value};

pub const UNKNOWN_ERROR_CODE: i64 = 10001;
pub const UNKNOWN_ERROR_NAME: &str = "UnknownError";
pub const UNKNOWN_ERROR_DESCRIPTION: &str = "An unknown error occurred.";

/// Which kind of error is being presented
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorClass {
    /// Any error without a catalog entry
    Generic { type_name: String },
    /// An error from the API error catalog
    Api { name: String, code: i64 },
    /// An error reported by a downstream service, with its raw response
    Services { type_name: String, source: Value },
}

/// An error ready to be rendered as an [`ErrorRecord`]
#[derive(Debug, Clone, PartialEq)]
pub struct PresentableError {
    pub class: ErrorClass,
    pub message: String,
    pub backtrace: Option<Vec<String>>,
    pub extra: Map<String, Value>,
}

impl PresentableError {
    fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            backtrace: None,
            extra: Map::new(),
        }
    }

    /// Generic error named after the Rust type of `error`
    pub fn generic<E: std::error::Error + ?Sized>(error: &E) -> Self {
        Self::named(std::any::type_name::<E>(), error.to_string())
    }

    /// Generic error with an explicit type name
    pub fn named(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Generic {
                type_name: type_name.into(),
            },
            message,
        )
    }

    pub fn api(name: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Api {
                name: name.into(),
                code,
            },
            message,
        )
    }

    pub fn services(
        type_name: impl Into<String>,
        message: impl Into<String>,
        source: Value,
    ) -> Self {
        Self::new(
            ErrorClass::Services {
                type_name: type_name.into(),
                source,
            },
            message,
        )
    }

    pub fn with_backtrace<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backtrace = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Extra fields merged over the generated record
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// JSON object describing an error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorRecord(Map<String, Value>);

impl ErrorRecord {
    pub fn code(&self) -> Option<i64> {
        self.0.get("code").and_then(Value::as_i64)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.0.get("error_code").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    pub fn backtrace(&self) -> Option<&Value> {
        self.0.get("backtrace")
    }

    pub fn source(&self) -> Option<&Value> {
        self.0.get("source")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// The record used for absent and unrecognized errors
pub fn unknown_error_record() -> ErrorRecord {
    let mut record = Map::new();
    record.insert("error_code".into(), json!(UNKNOWN_ERROR_NAME));
    record.insert("description".into(), json!(UNKNOWN_ERROR_DESCRIPTION));
    record.insert("code".into(), json!(UNKNOWN_ERROR_CODE));
    ErrorRecord(record)
}

/// Last path segment of a type name, without generic arguments
///
/// Trait objects are named after their principal trait, so
/// `dyn core::error::Error + Send + Sync` becomes `Error`.
pub fn demodulize(type_name: &str) -> &str {
    let unboxed = type_name.trim().trim_start_matches("dyn ");
    let principal = unboxed.split(" + ").next().unwrap_or(unboxed);
    let base = principal.split('<').next().unwrap_or(principal);
    base.rsplit("::").next().unwrap_or(base)
}

/// Builds error records for an optional error
#[derive(Debug, Clone, Copy)]
pub struct ErrorHasher<'a> {
    error: Option<&'a PresentableError>,
}

impl<'a> ErrorHasher<'a> {
    pub fn new(error: Option<&'a PresentableError>) -> Self {
        Self { error }
    }

    /// Full record, including diagnostics
    pub fn unsanitized_hash(&self) -> ErrorRecord {
        let Some(error) = self.error else {
            return unknown_error_record();
        };

        let mut payload = Map::new();
        payload.insert("code".into(), json!(UNKNOWN_ERROR_CODE));
        payload.insert("description".into(), json!(error.message));

        match &error.class {
            ErrorClass::Generic { type_name } => {
                payload.insert(
                    "error_code".into(),
                    json!(format!("CF-{}", demodulize(type_name))),
                );
            }
            ErrorClass::Api { name, code } => {
                payload.insert("code".into(), json!(code));
                payload.insert("error_code".into(), json!(format!("CF-{}", name)));
            }
            ErrorClass::Services { type_name, .. } => {
                payload.insert(
                    "error_code".into(),
                    json!(format!("CF-{}", demodulize(type_name))),
                );
            }
        }

        if let Some(backtrace) = &error.backtrace {
            payload.insert("backtrace".into(), json!(backtrace));
        }
        if let ErrorClass::Services { source, .. } = &error.class {
            payload.insert("source".into(), source.clone());
        }

        for (key, value) in &error.extra {
            payload.insert(key.clone(), value.clone());
        }

        ErrorRecord(payload)
    }

    /// Public record: unknown errors are hidden, diagnostics stripped
    pub fn sanitized_hash(&self) -> ErrorRecord {
        if !(self.is_api_error() || self.is_services_error()) {
            return unknown_error_record();
        }

        let mut record = self.unsanitized_hash();
        record.0.remove("source");
        record.0.remove("backtrace");
        record
    }

    pub fn is_api_error(&self) -> bool {
        matches!(
            self.error,
            Some(PresentableError {
                class: ErrorClass::Api { .. },
                ..
            })
        )
    }

    pub fn is_services_error(&self) -> bool {
        matches!(
            self.error,
            Some(PresentableError {
                class: ErrorClass::Services { .. },
                ..
            })
        )
    }
}

/// Record for `error`, sanitized or not
pub fn to_record(error: Option<&PresentableError>, sanitize: bool) -> ErrorRecord {
    let hasher = ErrorHasher::new(error);
    if sanitize {
        hasher.sanitized_hash()
    } else {
        hasher.unsanitized_hash()
    }
}
