//! Rule-driven form validation.
//!
//! Declarative per-field rules, cross-field matching, debounced and IME-aware
//! live validation, and a single-flight submission state machine, as used by
//! the course marketplace registration page.
//!
//! - [`ValidationEngine`] evaluates rules and owns touched and submission state.
//! - [`Form`] drives an engine from UI events and submits through a
//!   [`SubmitTransport`](transport::SubmitTransport).
//! - [`registration`] holds the concrete registration form.

pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod notify;
pub mod password;
pub mod registration;
pub mod rules;
pub mod state;
pub mod storage;
pub mod transport;
pub mod value;

mod engine;
mod form;

pub use config::FormConfig;
pub use engine::ValidationEngine;
pub use form::{Form, SubmitOutcome};
pub use state::{FieldState, SubmissionState};
pub use value::{FieldValue, FormData};
