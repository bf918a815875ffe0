//! Events published by a form for a rendering layer.
//!
//! The engine never blocks on delivery: events go through an unbounded
//! channel and are dropped silently once the receiver is gone.

use tokio::sync::mpsc;

use crate::password::PasswordStrength;
use crate::state::SubmissionState;

/// Something a rendering layer may want to reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// A field was validated. Empty `errors` means it is valid.
    FieldValidated { name: String, errors: Vec<String> },
    /// The submission state changed.
    SubmissionChanged {
        from: SubmissionState,
        to: SubmissionState,
    },
    /// The strength meter reading for a password field changed.
    StrengthChanged {
        name: String,
        strength: PasswordStrength,
    },
}

/// Sender half of the event channel.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<FormEvent>,
}

impl EventSender {
    /// Publish an event.
    ///
    /// Non-blocking. Errors are ignored (receiver dropped = nobody listening).
    pub fn send(&self, event: FormEvent) {
        let _ = self.tx.send(event);
    }
}

/// Receiver half of the event channel.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<FormEvent>,
}

impl EventReceiver {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<FormEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<FormEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every queued event.
    pub fn drain(&mut self) -> Vec<FormEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Create a new event channel pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}
