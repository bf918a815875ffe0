//! Field and submission state.

use std::fmt;

use serde::Serialize;

use crate::value::FieldValue;

/// Where the form is in its submission lifecycle.
///
/// ```text
/// Idle --submit(valid)--> Submitting --success--> Succeeded
/// Idle --submit(valid)--> Submitting --failure--> Idle
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    /// Terminal: the form accepts no further input or submissions.
    Succeeded,
}

impl SubmissionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Submitting => f.write_str("submitting"),
            Self::Succeeded => f.write_str("succeeded"),
        }
    }
}

/// Snapshot of one field, derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub value: FieldValue,
    pub touched: bool,
    /// Empty when the field is valid.
    pub errors: Vec<String>,
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether errors should be shown: only touched fields display them.
    pub fn shows_errors(&self) -> bool {
        self.touched && !self.errors.is_empty()
    }
}
