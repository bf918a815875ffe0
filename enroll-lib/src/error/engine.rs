//! Programmer errors raised by the validation engine

/// Misuse of the engine: bad rule tables, unknown fields, or calls the
/// submission state machine does not allow.
///
/// Field validation failures are never reported through this type; they are
/// plain message lists returned by the validate calls.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The field has no rule registered in this form.
    #[error("Field '{0}' is not registered in this form")]
    UnknownField(String),

    /// The same field name was registered twice.
    #[error("Field '{0}' is registered more than once")]
    DuplicateField(String),

    /// A match rule points at a field the form does not know.
    #[error("Field '{field}' must match '{target}', which is not registered")]
    UnknownMatchTarget { field: String, target: String },

    /// A pattern rule failed to compile.
    #[error("Field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// The form was already submitted successfully and no longer accepts input.
    #[error("Form '{0}' has already been submitted")]
    Completed(String),

    /// The operation is not allowed while a submission is in flight.
    #[error("Form '{0}' has a submission in flight")]
    SubmissionInFlight(String),
}

impl EngineError {
    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField(field.into())
    }
}
