//! Password scoring.
//!
//! Two independent algorithms live here:
//!
//! - [`compute_password_strength`] drives the strength meter. Six checks,
//!   advisory only.
//! - [`password_gate`] decides whether a password is accepted. Five checks
//!   with a coarser threshold.

use serde::Serialize;

/// Labels for each strength meter level, weakest first.
pub const STRENGTH_LABELS: [&str; 5] = ["Very weak", "Weak", "Medium", "Strong", "Very strong"];

/// Message for a password rejected as too weak.
pub const WEAK_PASSWORD: &str = "Password strength is too low";

/// Message for a password of medium strength.
pub const MEDIUM_PASSWORD: &str =
    "Password strength is medium; use upper and lower case letters, digits and symbols";

/// Strength meter reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// Raw score, 0..=6.
    pub score: u8,
    /// Meter level, 0..=4.
    pub level: u8,
    /// Meter fill, 0..=100, rounded half up.
    pub percentage: u8,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        STRENGTH_LABELS[usize::from(self.level.min(4))]
    }
}

/// Compute the strength meter reading for a password.
///
/// One point each for: length >= 8, length >= 12, a lowercase letter, an
/// uppercase letter, a digit, a symbol.
pub fn compute_password_strength(value: &str) -> PasswordStrength {
    let length = value.chars().count();
    let score = [
        length >= 8,
        length >= 12,
        value.chars().any(|c| c.is_ascii_lowercase()),
        value.chars().any(|c| c.is_ascii_uppercase()),
        value.chars().any(|c| c.is_ascii_digit()),
        value.chars().any(is_symbol),
    ]
    .into_iter()
    .filter(|hit| *hit)
    .count() as u8;

    PasswordStrength {
        score,
        level: score.saturating_sub(1).min(4),
        percentage: ((u32::from(score) * 100 + 3) / 6).min(100) as u8,
    }
}

/// Acceptance verdict of the password gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    /// Fewer than two checks passed.
    Weak,
    /// Two or three checks passed.
    Medium,
    /// Four or five checks passed.
    Strong,
}

/// Score used by the gate: one point each for length >= 8, a lowercase
/// letter, an uppercase letter, a digit, a symbol.
pub fn gate_score(value: &str) -> u8 {
    [
        value.chars().count() >= 8,
        value.chars().any(|c| c.is_ascii_lowercase()),
        value.chars().any(|c| c.is_ascii_uppercase()),
        value.chars().any(|c| c.is_ascii_digit()),
        value.chars().any(is_symbol),
    ]
    .into_iter()
    .filter(|hit| *hit)
    .count() as u8
}

pub fn password_gate(value: &str) -> GateVerdict {
    match gate_score(value) {
        0 | 1 => GateVerdict::Weak,
        2 | 3 => GateVerdict::Medium,
        _ => GateVerdict::Strong,
    }
}

/// Custom rule for password fields.
///
/// Only [`GateVerdict::Strong`] passes; the medium verdict carries its
/// advisory text as the failure message.
pub fn password_rule(value: &str) -> Result<(), String> {
    match password_gate(value) {
        GateVerdict::Weak => Err(WEAK_PASSWORD.to_string()),
        GateVerdict::Medium => Err(MEDIUM_PASSWORD.to_string()),
        GateVerdict::Strong => Ok(()),
    }
}

// Not a word character and not whitespace.
fn is_symbol(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_excludes_underscore_and_space() {
        assert!(is_symbol('!'));
        assert!(is_symbol('@'));
        assert!(!is_symbol('_'));
        assert!(!is_symbol(' '));
        assert!(!is_symbol('a'));
    }

    #[test]
    fn test_percentage_steps() {
        let percentages: Vec<u8> = ["", "a", "aB", "aB1", "aB1!", "aB1!efgh", "aB1!efghijkl"]
            .iter()
            .map(|p| compute_password_strength(p).percentage)
            .collect();
        assert_eq!(percentages, vec![0, 17, 33, 50, 67, 83, 100]);
    }
}
