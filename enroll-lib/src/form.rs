//! Live form session.
//!
//! [`Form`] drives a [`ValidationEngine`] from UI events: debounced input,
//! blur, checkbox changes, IME composition and submission. It is cheap to
//! clone; all clones share one engine.
//!
//! # Example
//!
//! ```ignore
//! let form = Form::new(engine, FormConfig::default(), LogNotifier, SimulatedTransport::default());
//!
//! form.on_input("username", "al")?;   // ignored until the field is touched
//! form.on_blur("username")?;          // touch + validate now
//! form.on_input("username", "alice")?; // validated 300ms after the last keystroke
//!
//! match form.submit().await {
//!     SubmitOutcome::Invalid { focus } => focus_field(&focus),
//!     SubmitOutcome::Submitted(_) => show_success(),
//!     _ => {}
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use log::{debug, trace, warn};

use crate::config::FormConfig;
use crate::debounce::Debouncer;
use crate::engine::{SubmitStart, ValidationEngine};
use crate::error::{EngineError, SubmitError, extract_panic_message};
use crate::events::FormEvent;
use crate::notify::{Notice, Notifier};
use crate::password::compute_password_strength;
use crate::state::{FieldState, SubmissionState};
use crate::transport::{SubmitReceipt, SubmitTransport};
use crate::value::FieldValue;

/// What a call to [`Form::submit`] did.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The transport accepted the form. The form is now closed.
    Submitted(SubmitReceipt),
    /// Validation failed; nothing was sent. `focus` should receive focus.
    Invalid { focus: String },
    /// The transport failed. The form is idle again and may be resubmitted.
    Failed(SubmitError),
    /// The form was not idle; the call was ignored.
    Rejected(SubmissionState),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

struct FormInner {
    engine: Mutex<ValidationEngine>,
    config: FormConfig,
    notifier: Arc<dyn Notifier>,
    transport: Arc<dyn SubmitTransport>,
    debouncer: Debouncer,
}

/// A live form bound to one engine, notifier and transport.
///
/// Input handlers spawn debounce timers and must run inside a tokio runtime.
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl Form {
    pub fn new(
        engine: ValidationEngine,
        config: FormConfig,
        notifier: impl Notifier + 'static,
        transport: impl SubmitTransport + 'static,
    ) -> Self {
        Self::with_shared(engine, config, Arc::new(notifier), Arc::new(transport))
    }

    /// Like [`Form::new`], for collaborators that are already shared.
    pub fn with_shared(
        engine: ValidationEngine,
        config: FormConfig,
        notifier: Arc<dyn Notifier>,
        transport: Arc<dyn SubmitTransport>,
    ) -> Self {
        let debouncer = Debouncer::new(config.debounce);
        Self {
            inner: Arc::new(FormInner {
                engine: Mutex::new(engine),
                config,
                notifier,
                transport,
                debouncer,
            }),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.inner.config
    }

    /// Run `f` with read access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&ValidationEngine) -> R) -> R {
        f(&self.engine())
    }

    pub fn field_state(&self, name: &str) -> Result<FieldState, EngineError> {
        self.engine().field_state(name)
    }

    pub fn submission(&self) -> SubmissionState {
        self.engine().submission()
    }

    /// The text of a field changed.
    ///
    /// Stores the value and restarts the field's debounce timer. When the
    /// timer fires the field is validated with its latest value if it has
    /// been touched, and touched fields that must match it are validated
    /// either way. Composing fields are not scheduled at all.
    pub fn on_input(&self, name: &str, value: impl Into<FieldValue>) -> Result<(), EngineError> {
        let value = value.into();
        let composing = {
            let mut engine = self.engine();
            engine.set_value(name, value.clone())?;
            if self.inner.config.strength_field.as_deref() == Some(name) {
                engine.emit(FormEvent::StrengthChanged {
                    name: name.to_string(),
                    strength: compute_password_strength(value.raw_text()),
                });
            }
            engine.is_composing(name)
        };

        if composing {
            trace!("Field '{}' is composing, validation suppressed", name);
            return Ok(());
        }

        let form = self.clone();
        let field = name.to_string();
        self.inner.debouncer.schedule(name, async move {
            form.revalidate_if_touched(&field);
        });
        Ok(())
    }

    /// The field lost focus: touch it and validate now.
    pub fn on_blur(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let mut engine = self.engine();
        engine.touch(name)?;
        Self::revalidate(&engine, name)
    }

    /// A checkbox changed: store and validate now.
    pub fn on_toggle(&self, name: &str, checked: bool) -> Result<Vec<String>, EngineError> {
        let mut engine = self.engine();
        engine.set_value(name, checked)?;
        Self::revalidate(&engine, name)
    }

    /// IME composition started: suppress validation for the field.
    pub fn composition_start(&self, name: &str) -> Result<(), EngineError> {
        self.engine().set_composing(name, true)?;
        self.inner.debouncer.cancel(name);
        Ok(())
    }

    /// IME composition ended: store the composed text and validate once,
    /// touched or not.
    pub fn composition_end(
        &self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<String>, EngineError> {
        let mut engine = self.engine();
        engine.set_composing(name, false)?;
        engine.set_value(name, value)?;
        Self::revalidate(&engine, name)
    }

    /// Validate everything and, if valid, hand the form to the transport.
    ///
    /// At most one submission is in flight: calls made while submitting, or
    /// after a successful submission, return [`SubmitOutcome::Rejected`]
    /// without touching the transport.
    pub async fn submit(&self) -> SubmitOutcome {
        let start = self.engine().begin_submit();
        let data = match start {
            SubmitStart::Ready(data) => data,
            SubmitStart::Invalid { focus } => {
                self.notify(Notice::error(self.inner.config.invalid_message.clone()));
                return SubmitOutcome::Invalid { focus };
            }
            SubmitStart::Busy(state) => return SubmitOutcome::Rejected(state),
        };

        debug!("Submitting {} fields", data.len());
        let result = match AssertUnwindSafe(self.inner.transport.submit(&data))
            .catch_unwind()
            .await
        {
            Ok(result) => result.map_err(SubmitError::from),
            Err(panic) => Err(SubmitError::Panicked(extract_panic_message(&*panic))),
        };

        self.engine().finish_submit(result.is_ok());

        match result {
            Ok(receipt) => {
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| self.inner.config.success_message.clone());
                self.notify(Notice::success(message));
                SubmitOutcome::Submitted(receipt)
            }
            Err(err) => {
                warn!("Submission failed: {}", err);
                self.notify(Notice::error(
                    err.user_message(&self.inner.config.failure_message),
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Reset the engine and cancel pending timers.
    pub fn reset(&self) -> Result<(), EngineError> {
        self.engine().reset()?;
        self.inner.debouncer.cancel_all();
        Ok(())
    }

    // Debounce callback. The field itself is checked only once touched, but
    // touched dependents always follow the new value.
    fn revalidate_if_touched(&self, name: &str) {
        let engine = self.engine();
        let result = if engine.is_touched(name) {
            Self::revalidate(&engine, name).map(drop)
        } else {
            trace!("Field '{}' untouched, live validation skipped", name);
            Self::revalidate_dependents(&engine, name)
        };
        if let Err(err) = result {
            warn!("Live validation of '{}' failed: {}", name, err);
        }
    }

    // Validate `name`, then any touched field whose match rule reads it.
    fn revalidate(engine: &ValidationEngine, name: &str) -> Result<Vec<String>, EngineError> {
        let errors = engine.check_field(name)?;
        Self::revalidate_dependents(engine, name)?;
        Ok(errors)
    }

    fn revalidate_dependents(engine: &ValidationEngine, name: &str) -> Result<(), EngineError> {
        for dependent in engine.dependents(name) {
            if engine.is_touched(&dependent) {
                engine.check_field(&dependent)?;
            }
        }
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }

    fn engine(&self) -> MutexGuard<'_, ValidationEngine> {
        self.inner
            .engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("engine", &*self.engine())
            .field("config", &self.inner.config)
            .finish()
    }
}
