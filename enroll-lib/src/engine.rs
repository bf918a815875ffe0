//! The validation engine: rule evaluation, touched tracking and the
//! submission state machine for one form.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::error::EngineError;
use crate::events::{EventSender, FormEvent};
use crate::rules::{CompiledRule, RuleSet};
use crate::state::{FieldState, SubmissionState};
use crate::value::{FieldValue, FormData};

/// Result of trying to start a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmitStart {
    /// Every field is valid; the snapshot goes to the transport.
    Ready(FormData),
    /// Some field is invalid; `focus` is the first one in declaration order.
    Invalid { focus: String },
    /// The form is not idle.
    Busy(SubmissionState),
}

/// Validation engine bound to one form.
///
/// The rule table is compiled in [`ValidationEngine::new`] and is read-only
/// afterwards. Field values, touched flags and the submission state belong to
/// this instance only.
///
/// # Example
///
/// ```
/// use enroll_lib::ValidationEngine;
/// use enroll_lib::rules::{Rule, RuleSet};
///
/// let rules = RuleSet::new().field("username", Rule::new().required("Please enter a username"));
/// let mut engine = ValidationEngine::new("signup", rules).unwrap();
///
/// assert_eq!(engine.validate_field("username", "").unwrap(), vec!["Please enter a username"]);
/// assert!(!engine.validate_all());
/// assert!(engine.is_touched("username"));
/// ```
pub struct ValidationEngine {
    form: String,
    order: Vec<String>,
    rules: HashMap<String, CompiledRule>,
    values: HashMap<String, FieldValue>,
    touched: HashSet<String>,
    composing: HashSet<String>,
    submission: SubmissionState,
    events: Option<EventSender>,
}

impl ValidationEngine {
    /// Compile `rules` into an engine for the form called `form`.
    ///
    /// Fails on duplicate field names, invalid patterns, and match rules that
    /// point at fields the form does not register.
    pub fn new(form: impl Into<String>, rules: RuleSet) -> Result<Self, EngineError> {
        let form = form.into();
        let mut order = Vec::with_capacity(rules.len());
        let mut compiled = HashMap::with_capacity(rules.len());

        for (name, rule) in rules.iter() {
            if compiled.contains_key(name) {
                return Err(EngineError::DuplicateField(name.to_string()));
            }
            compiled.insert(name.to_string(), CompiledRule::compile(name, rule)?);
            order.push(name.to_string());
        }

        for name in &order {
            if let Some(target) = compiled.get(name).and_then(CompiledRule::match_target) {
                if !compiled.contains_key(target) {
                    return Err(EngineError::UnknownMatchTarget {
                        field: name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        debug!("Form '{}' compiled with {} fields", form, order.len());

        Ok(Self {
            form,
            order,
            rules: compiled,
            values: HashMap::new(),
            touched: HashSet::new(),
            composing: HashSet::new(),
            submission: SubmissionState::Idle,
            events: None,
        })
    }

    /// Publish events on `sender`.
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.events = Some(sender);
        self
    }

    /// Name of the form this engine is bound to.
    pub fn form(&self) -> &str {
        &self.form
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn is_required(&self, name: &str) -> Result<bool, EngineError> {
        Ok(self.rule(name)?.is_required())
    }

    /// Record the current value of a field.
    pub fn set_value(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), EngineError> {
        self.rule(name)?;
        self.ensure_open()?;
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// The stored value of a field, if one was set.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Validate `value` as the value of `name`.
    ///
    /// Pure: depends only on the rule, `value`, and the stored values of the
    /// fields a match rule reads. Returns every failure message in check
    /// order; an empty list means valid.
    pub fn validate_field(
        &self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<String>, EngineError> {
        let value = value.into();
        let rule = self.rule(name)?;
        Ok(rule.evaluate(value.as_text(), |other| self.text_of(other)))
    }

    /// Validate the stored value of `name` and publish the result.
    pub fn check_field(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let rule = self.rule(name)?;
        let errors = rule.evaluate(self.text_of(name), |other| self.text_of(other));
        trace!("Field '{}' validated with {} errors", name, errors.len());
        self.emit(FormEvent::FieldValidated {
            name: name.to_string(),
            errors: errors.clone(),
        });
        Ok(errors)
    }

    /// Mark a field as touched. Idempotent.
    pub fn touch(&mut self, name: &str) -> Result<(), EngineError> {
        self.rule(name)?;
        self.ensure_open()?;
        if self.touched.insert(name.to_string()) {
            trace!("Field '{}' touched", name);
        }
        Ok(())
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Derive the current state of a field.
    pub fn field_state(&self, name: &str) -> Result<FieldState, EngineError> {
        let rule = self.rule(name)?;
        Ok(FieldState {
            value: self.values.get(name).cloned().unwrap_or_default(),
            touched: self.is_touched(name),
            errors: rule.evaluate(self.text_of(name), |other| self.text_of(other)),
        })
    }

    /// Fields whose match rule reads `name`.
    pub fn dependents(&self, name: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|field| {
                self.rules
                    .get(field.as_str())
                    .and_then(CompiledRule::match_target)
                    == Some(name)
            })
            .cloned()
            .collect()
    }

    /// Touch and validate every field from scratch.
    ///
    /// Returns `true` iff no field has errors. Cached results are never
    /// trusted: a match rule can break when only the other field changed.
    pub fn validate_all(&mut self) -> bool {
        self.sweep().is_none()
    }

    /// First field in declaration order whose stored value has errors.
    pub fn first_invalid(&self) -> Option<String> {
        self.order
            .iter()
            .find(|name| {
                self.rules
                    .get(name.as_str())
                    .is_some_and(|rule| {
                        !rule
                            .evaluate(self.text_of(name), |other| self.text_of(other))
                            .is_empty()
                    })
            })
            .cloned()
    }

    /// Ordered snapshot of every field value.
    pub fn form_data(&self) -> FormData {
        FormData::new(
            self.order
                .iter()
                .map(|name| {
                    let value = self.values.get(name).cloned().unwrap_or_default();
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    /// Mark a field as receiving composed (IME) input, or clear the mark.
    pub fn set_composing(&mut self, name: &str, composing: bool) -> Result<(), EngineError> {
        self.rule(name)?;
        self.ensure_open()?;
        if composing {
            self.composing.insert(name.to_string());
        } else {
            self.composing.remove(name);
        }
        Ok(())
    }

    pub fn is_composing(&self, name: &str) -> bool {
        self.composing.contains(name)
    }

    /// Clear values, touched and composing flags.
    ///
    /// Refused while a submission is in flight and once the form has been
    /// submitted successfully.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.submission == SubmissionState::Submitting {
            return Err(EngineError::SubmissionInFlight(self.form.clone()));
        }
        self.ensure_open()?;
        self.values.clear();
        self.touched.clear();
        self.composing.clear();
        debug!("Form '{}' reset", self.form);
        Ok(())
    }

    pub(crate) fn begin_submit(&mut self) -> SubmitStart {
        if !self.submission.is_idle() {
            debug!(
                "Form '{}' submit rejected while {}",
                self.form, self.submission
            );
            return SubmitStart::Busy(self.submission);
        }

        if let Some(focus) = self.sweep() {
            debug!("Form '{}' submit blocked, first invalid field '{}'", self.form, focus);
            return SubmitStart::Invalid { focus };
        }

        self.transition(SubmissionState::Submitting);
        SubmitStart::Ready(self.form_data())
    }

    pub(crate) fn finish_submit(&mut self, succeeded: bool) {
        if self.submission != SubmissionState::Submitting {
            return;
        }
        let next = if succeeded {
            SubmissionState::Succeeded
        } else {
            SubmissionState::Idle
        };
        self.transition(next);
    }

    pub(crate) fn emit(&self, event: FormEvent) {
        if let Some(events) = &self.events {
            events.send(event);
        }
    }

    // Touch and check every field; returns the first invalid one.
    fn sweep(&mut self) -> Option<String> {
        self.touched.extend(self.order.iter().cloned());

        let mut first_invalid = None;
        for name in &self.order {
            let errors = self.check_field(name).unwrap_or_default();
            if !errors.is_empty() && first_invalid.is_none() {
                first_invalid = Some(name.clone());
            }
        }
        first_invalid
    }

    // Succeeded is terminal: no more edits, touches or resets.
    fn ensure_open(&self) -> Result<(), EngineError> {
        if self.submission.is_terminal() {
            return Err(EngineError::Completed(self.form.clone()));
        }
        Ok(())
    }

    fn transition(&mut self, to: SubmissionState) {
        let from = self.submission;
        if from == to {
            return;
        }
        self.submission = to;
        debug!("Form '{}' submission {} -> {}", self.form, from, to);
        self.emit(FormEvent::SubmissionChanged { from, to });
    }

    fn rule(&self, name: &str) -> Result<&CompiledRule, EngineError> {
        self.rules
            .get(name)
            .ok_or_else(|| EngineError::unknown_field(name))
    }

    fn text_of(&self, name: &str) -> &str {
        self.values.get(name).map(FieldValue::as_text).unwrap_or("")
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("form", &self.form)
            .field("fields", &self.order)
            .field("touched", &self.touched)
            .field("submission", &self.submission)
            .finish()
    }
}
