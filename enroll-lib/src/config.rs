//! Form session configuration

use std::time::Duration;

/// Default debounce window for live validation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for a live [`Form`](crate::Form) session.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use enroll_lib::FormConfig;
///
/// let config = FormConfig::default()
///     .with_debounce(Duration::from_millis(150))
///     .with_strength_field("password");
/// ```
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// How long input must stay quiet before a field is validated.
    ///
    /// Default: 300 ms
    pub debounce: Duration,

    /// Field whose input updates the strength meter, if any.
    ///
    /// Default: none
    pub strength_field: Option<String>,

    /// Notice shown when a submit is blocked by invalid fields.
    pub invalid_message: String,

    /// Notice shown when the transport fails without a usable reason.
    pub failure_message: String,

    /// Notice shown after a successful submission.
    pub success_message: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            strength_field: None,
            invalid_message: "Please fix all errors before submitting".to_string(),
            failure_message: "Submission failed, please try again".to_string(),
            success_message: "Submitted successfully".to_string(),
        }
    }
}

impl FormConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the field that drives the strength meter.
    pub fn with_strength_field(mut self, field: impl Into<String>) -> Self {
        self.strength_field = Some(field.into());
        self
    }

    /// Sets the notice for a blocked submit.
    pub fn with_invalid_message(mut self, msg: impl Into<String>) -> Self {
        self.invalid_message = msg.into();
        self
    }

    /// Sets the fallback notice for a failed submit.
    pub fn with_failure_message(mut self, msg: impl Into<String>) -> Self {
        self.failure_message = msg.into();
        self
    }

    /// Sets the notice for a successful submit.
    pub fn with_success_message(mut self, msg: impl Into<String>) -> Self {
        self.success_message = msg.into();
        self
    }
}
