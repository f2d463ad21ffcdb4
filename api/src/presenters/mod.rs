//! Presenters turn internal values into response bodies.

pub mod error_hasher;

pub use error_hasher::{
    demodulize, to_record, unknown_error_record, ErrorClass, ErrorHasher, ErrorRecord,
    PresentableError,
};
