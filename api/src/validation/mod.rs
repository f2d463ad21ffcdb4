//! Request message validation
//!
//! Request bodies are checked as raw JSON fields before any typed message is
//! built, so that "absent" and "explicitly null" stay distinguishable and
//! partial updates only validate the keys a client actually sent.
//!
//! # Overview
//!
//! 1. **Rules** - `RuleSet`, a declarative list of allowed keys and field
//!    checks, evaluated into an ordered `ValidationResult`
//! 2. **Validators** - the individual field predicates
//! 3. **Messages** - concrete request messages and their rule sets
//! 4. **Extractors** - `ValidatedMessage<M>` for Axum handlers
//!
//! # Validation Error Response
//!
//! When validation fails, a 422 Unprocessable Entity is returned:
//!
//! ```json
//! {
//!   "code": 10008,
//!   "description": "Unknown field(s): 'updated_at', Name can't be blank",
//!   "error_code": "CF-UnprocessableEntity",
//!   "errors": ["Unknown field(s): 'updated_at'", "Name can't be blank"]
//! }
//! ```

pub mod extractors;
pub mod messages;
pub mod rules;
pub mod validators;

pub use extractors::{validation_error, ValidatedMessage};
pub use messages::{RequestMessage, SidecarCreateMessage, SidecarUpdateMessage};
pub use rules::{display_label, Activation, Check, FieldRule, FieldValues, RuleSet, ValidationResult};
