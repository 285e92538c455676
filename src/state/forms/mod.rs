//! Form domain layer
//!
//! Value tree addressing and the per-form state record.

mod field;
mod form_state;
pub mod values;

pub use field::{FieldPath, PathSegment};
pub use form_state::{FieldErrors, FormState};
