//! Compiled rules: one ordered list of tagged checks per field.

use regex::Regex;

use super::rule::{CustomFn, FailureKind, Rule};
use crate::error::EngineError;

/// One constraint, ready to evaluate.
#[derive(Clone)]
enum Check {
    MinLength(usize),
    MaxLength(usize),
    ExactLength(usize),
    Pattern(Regex),
    Match(String),
    Custom(CustomFn),
}

#[derive(Clone)]
struct CompiledCheck {
    check: Check,
    message: String,
}

/// A rule after template rendering and pattern compilation.
#[derive(Clone)]
pub(crate) struct CompiledRule {
    required: Option<String>,
    checks: Vec<CompiledCheck>,
    match_target: Option<String>,
}

impl CompiledRule {
    pub(crate) fn compile(field: &str, rule: &Rule) -> Result<Self, EngineError> {
        let message = |kind: FailureKind| {
            let template = rule.template(kind).unwrap_or(kind.default_template());
            render(template, field, rule)
        };

        let mut checks = Vec::new();
        if let Some(min) = rule.min_length {
            checks.push(CompiledCheck {
                check: Check::MinLength(min),
                message: message(FailureKind::MinLength),
            });
        }
        if let Some(max) = rule.max_length {
            checks.push(CompiledCheck {
                check: Check::MaxLength(max),
                message: message(FailureKind::MaxLength),
            });
        }
        if let Some(length) = rule.exact_length {
            checks.push(CompiledCheck {
                check: Check::ExactLength(length),
                message: message(FailureKind::ExactLength),
            });
        }
        if let Some(pattern) = &rule.pattern {
            let re = Regex::new(pattern).map_err(|source| EngineError::InvalidPattern {
                field: field.to_string(),
                source,
            })?;
            checks.push(CompiledCheck {
                check: Check::Pattern(re),
                message: message(FailureKind::Pattern),
            });
        }
        if let Some(target) = &rule.match_field {
            checks.push(CompiledCheck {
                check: Check::Match(target.clone()),
                message: message(FailureKind::Match),
            });
        }
        if let Some(custom) = &rule.custom {
            checks.push(CompiledCheck {
                check: Check::Custom(custom.clone()),
                message: message(FailureKind::Custom),
            });
        }

        Ok(Self {
            required: rule.required.then(|| message(FailureKind::Required)),
            checks,
            match_target: rule.match_field.clone(),
        })
    }

    pub(crate) fn is_required(&self) -> bool {
        self.required.is_some()
    }

    pub(crate) fn match_target(&self) -> Option<&str> {
        self.match_target.as_deref()
    }

    /// Evaluate `value` (already trimmed). `lookup` resolves the current text
    /// of other fields for match checks.
    ///
    /// Every failing check contributes its message; nothing short-circuits
    /// except an empty optional value, which skips everything.
    pub(crate) fn evaluate<'a>(&self, value: &str, lookup: impl Fn(&str) -> &'a str) -> Vec<String> {
        let mut errors = Vec::new();

        if value.is_empty() {
            match &self.required {
                Some(msg) => errors.push(msg.clone()),
                None => return errors,
            }
        }

        let length = value.chars().count();
        for CompiledCheck { check, message } in &self.checks {
            let failure = match check {
                Check::MinLength(min) => (length < *min).then(|| message.clone()),
                Check::MaxLength(max) => (length > *max).then(|| message.clone()),
                Check::ExactLength(expected) => (length != *expected).then(|| message.clone()),
                Check::Pattern(re) => (!re.is_match(value)).then(|| message.clone()),
                Check::Match(target) => (value != lookup(target)).then(|| message.clone()),
                Check::Custom(f) => match f(value) {
                    Ok(()) => None,
                    Err(msg) if msg.trim().is_empty() => Some(message.clone()),
                    Err(msg) => Some(msg),
                },
            };
            errors.extend(failure);
        }

        errors
    }
}

fn render(template: &str, field: &str, rule: &Rule) -> String {
    let mut out = template.replace("{field}", field);
    if let Some(min) = rule.min_length {
        out = out.replace("{min}", &min.to_string());
    }
    if let Some(max) = rule.max_length {
        out = out.replace("{max}", &max.to_string());
    }
    if let Some(length) = rule.exact_length {
        out = out.replace("{length}", &length.to_string());
    }
    out
}
