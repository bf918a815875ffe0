//! The course marketplace registration form.

use std::sync::Arc;

use crate::config::FormConfig;
use crate::engine::ValidationEngine;
use crate::error::EngineError;
use crate::form::Form;
use crate::notify::Notifier;
use crate::password::{WEAK_PASSWORD, password_rule};
use crate::rules::{Rule, RuleSet};
use crate::transport::SubmitTransport;

/// Name the registration engine is bound to.
pub const FORM_NAME: &str = "register";

pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const PASSWORD: &str = "password";
pub const CONFIRM_PASSWORD: &str = "confirm-password";
pub const NICKNAME: &str = "nickname";
pub const CAPTCHA: &str = "captcha";
pub const AGREEMENT: &str = "agreement";

/// Registration fields in declaration order.
pub const FIELDS: [&str; 8] = [
    USERNAME,
    EMAIL,
    PHONE,
    PASSWORD,
    CONFIRM_PASSWORD,
    NICKNAME,
    CAPTCHA,
    AGREEMENT,
];

/// The registration rule table.
pub fn registration_rules() -> RuleSet {
    RuleSet::new()
        .field(
            USERNAME,
            Rule::new()
                .required("Please enter a username")
                .min_length(3, "Username must be at least {min} characters")
                .max_length(20, "Username cannot exceed {max} characters")
                .pattern(
                    r"^[a-zA-Z0-9_]+$",
                    "Username may only contain letters, digits and underscores",
                ),
        )
        .field(
            EMAIL,
            Rule::new()
                .required("Please enter an email address")
                .pattern(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", "Please enter a valid email address"),
        )
        .field(
            PHONE,
            Rule::new()
                .required("Please enter a phone number")
                .pattern(r"^1[3-9][0-9]{9}$", "Please enter a valid 11-digit phone number"),
        )
        .field(
            PASSWORD,
            Rule::new()
                .required("Please set a password")
                .min_length(8, "Password must be at least {min} characters")
                .custom(password_rule, WEAK_PASSWORD),
        )
        .field(
            CONFIRM_PASSWORD,
            Rule::new()
                .required("Please confirm your password")
                .matches(PASSWORD, "The two passwords do not match"),
        )
        .field(
            NICKNAME,
            Rule::new()
                .max_length(30, "Nickname cannot exceed {max} characters")
                .pattern(
                    r"^[\x{4e00}-\x{9fa5}a-zA-Z0-9_-]+$",
                    "Nickname may only contain Chinese characters, letters, digits, underscores and hyphens",
                ),
        )
        .field(
            CAPTCHA,
            Rule::new()
                .required("Please enter the captcha")
                .exact_length(4, "The captcha is {length} characters long"),
        )
        .field(
            AGREEMENT,
            Rule::new().required("Please accept the user agreement"),
        )
}

/// Session config for the registration form: strength meter on the password
/// field and registration wording for notices.
pub fn registration_config() -> FormConfig {
    FormConfig::default()
        .with_strength_field(PASSWORD)
        .with_failure_message("Registration failed, please try again")
        .with_success_message("Registration successful, welcome aboard!")
}

/// Build the registration engine.
pub fn registration_engine() -> Result<ValidationEngine, EngineError> {
    ValidationEngine::new(FORM_NAME, registration_rules())
}

/// Build a live registration form.
pub fn registration_form(
    notifier: Arc<dyn Notifier>,
    transport: Arc<dyn SubmitTransport>,
) -> Result<Form, EngineError> {
    Ok(Form::with_shared(
        registration_engine()?,
        registration_config(),
        notifier,
        transport,
    ))
}
