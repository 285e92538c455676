//! Form engine: mutation, validation and submission

mod events;
mod form;
mod handler;
pub mod validator;

pub use events::{ChangeEvent, InputEvent, InputTarget, SubmitEvent};
pub use form::{ChangeHandler, FormEngine, FormOptions, SubmitOutcome};
pub use handler::{submit_fn, SubmitHandler};

#[cfg(test)]
pub use handler::MockSubmitHandler;

/// Readable text from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
