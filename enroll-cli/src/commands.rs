//! Subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use enroll_lib::password::{GateVerdict, compute_password_strength, password_gate};
use enroll_lib::registration::{
    self, AGREEMENT, CAPTCHA, CONFIRM_PASSWORD, EMAIL, NICKNAME, PASSWORD, PHONE, USERNAME,
};
use enroll_lib::storage::{FileStorage, StorageProvider};
use enroll_lib::transport::SimulatedTransport;
use enroll_lib::{FieldValue, Form, FormData, SubmitOutcome};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::args::{CheckArgs, RegisterArgs, StrengthArgs};
use crate::error::CliError;
use crate::notifier::TerminalNotifier;
use crate::paths;

/// Storage key of the last successful registration.
pub const LAST_REGISTRATION: &str = "lastRegistration";

/// What gets persisted after a successful registration. Passwords and the
/// captcha are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRegistration {
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nickname: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl StoredRegistration {
    pub fn from_form(data: &FormData, registered_at: DateTime<Utc>) -> Self {
        let nickname = data.text(NICKNAME);
        Self {
            username: data.text(USERNAME).to_string(),
            email: data.text(EMAIL).to_string(),
            phone: data.text(PHONE).to_string(),
            nickname: (!nickname.is_empty()).then(|| nickname.to_string()),
            registered_at,
        }
    }
}

pub async fn register(args: RegisterArgs) -> Result<ExitCode, CliError> {
    let transport = SimulatedTransport::new()
        .with_latency(Duration::from_millis(args.latency_ms))
        .with_failure_rate(args.failure_rate);
    let form = registration::registration_form(Arc::new(TerminalNotifier), Arc::new(transport))?;

    for (name, value) in [
        (USERNAME, &args.username),
        (EMAIL, &args.email),
        (PHONE, &args.phone),
        (PASSWORD, &args.password),
        (CONFIRM_PASSWORD, &args.confirm_password),
        (NICKNAME, &args.nickname),
        (CAPTCHA, &args.captcha),
    ] {
        form.on_input(name, value.as_str())?;
        form.on_blur(name)?;
    }
    form.on_toggle(AGREEMENT, args.agree)?;

    if !args.password.is_empty() {
        let strength = compute_password_strength(&args.password);
        println!(
            "Password strength: {} ({}%)",
            strength.label(),
            strength.percentage
        );
    }

    println!("Submitting...");
    match form.submit().await {
        SubmitOutcome::Submitted(receipt) => {
            let store = args.store.or_else(paths::default_store);
            if let Some(path) = store {
                let data = form.with_engine(|engine| engine.form_data());
                save_registration(path, StoredRegistration::from_form(&data, receipt.submitted_at))
                    .await?;
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Invalid { focus } => {
            print_field_errors(&form)?;
            debug!("First invalid field: {}", focus);
            Ok(ExitCode::from(2))
        }
        SubmitOutcome::Failed(_) | SubmitOutcome::Rejected(_) => Ok(ExitCode::FAILURE),
    }
}

pub fn check(args: CheckArgs) -> Result<ExitCode, CliError> {
    let mut engine = registration::registration_engine()?;
    if let Some(password) = &args.password {
        engine.set_value(PASSWORD, password.as_str())?;
    }

    let value = if args.field == AGREEMENT {
        FieldValue::Flag(matches!(args.value.as_str(), "on" | "true" | "yes"))
    } else {
        FieldValue::from(args.value)
    };

    let errors = engine.validate_field(&args.field, value)?;
    if errors.is_empty() {
        println!("✓ {} is valid", args.field);
        return Ok(ExitCode::SUCCESS);
    }
    for error in errors {
        println!("✗ {}", error);
    }
    Ok(ExitCode::from(2))
}

pub fn strength(args: StrengthArgs) -> ExitCode {
    let strength = compute_password_strength(&args.password);
    let verdict = match password_gate(&args.password) {
        GateVerdict::Weak => "rejected (weak)",
        GateVerdict::Medium => "rejected (medium)",
        GateVerdict::Strong => "accepted",
    };
    println!("Strength:   {} (level {}/4)", strength.label(), strength.level);
    println!("Meter:      {}%", strength.percentage);
    println!("Acceptance: {}", verdict);
    ExitCode::SUCCESS
}

/// Persist a registration under [`LAST_REGISTRATION`].
pub async fn save_registration(
    path: PathBuf,
    registration: StoredRegistration,
) -> Result<(), CliError> {
    info!("Saving registration to {}", path.display());
    let storage = StorageProvider::new(FileStorage::new(path));
    storage.set(LAST_REGISTRATION, &registration).await?;
    Ok(())
}

fn print_field_errors(form: &Form) -> Result<(), CliError> {
    let names: Vec<String> = form.with_engine(|engine| engine.fields().map(str::to_string).collect());
    for name in names {
        let state = form.field_state(&name)?;
        for error in state.errors {
            println!("  {}: {}", name, error);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_registration_skips_secrets() {
        let mut engine = registration::registration_engine().unwrap();
        engine.set_value(USERNAME, "alice_01").unwrap();
        engine.set_value(EMAIL, "alice@example.com").unwrap();
        engine.set_value(PHONE, "13812345678").unwrap();
        engine.set_value(PASSWORD, "Abcdef12").unwrap();

        let stored = StoredRegistration::from_form(&engine.form_data(), Utc::now());
        assert_eq!(stored.username, "alice_01");
        assert_eq!(stored.nickname, None);

        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("registeredAt").is_some());
        assert!(json.get("nickname").is_none());
    }

    #[tokio::test]
    async fn test_save_registration_round_trip() {
        let path = std::env::temp_dir().join(format!("enroll-cli-{}.json", uuid::Uuid::new_v4()));
        let stored = StoredRegistration {
            username: "bob".into(),
            email: "bob@example.com".into(),
            phone: "13912345678".into(),
            nickname: Some("小博".into()),
            registered_at: Utc::now(),
        };

        save_registration(path.clone(), stored.clone()).await.unwrap();

        let storage = StorageProvider::new(FileStorage::new(&path));
        let loaded: Option<StoredRegistration> = storage.get(LAST_REGISTRATION).await.unwrap();
        assert_eq!(loaded, Some(stored));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_check_confirm_password() {
        let args = CheckArgs {
            field: CONFIRM_PASSWORD.into(),
            value: "Abcdef13".into(),
            password: Some("Abcdef12".into()),
        };
        assert_eq!(check(args).unwrap(), ExitCode::from(2));
    }

    #[test]
    fn test_check_unknown_field() {
        let args = CheckArgs {
            field: "age".into(),
            value: "30".into(),
            password: None,
        };
        assert!(matches!(check(args), Err(CliError::Engine(_))));
    }
}
