//! Shared test collaborators.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use enroll_lib::error::TransportError;
use enroll_lib::notify::{Notice, Notifier};
use enroll_lib::registration::{self, FIELDS};
use enroll_lib::transport::{SubmitReceipt, SubmitTransport};
use enroll_lib::{Form, FormData};

/// Notifier that keeps every notice.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Scripted transport: pops one queued result per call, succeeding once the
/// queue is empty.
#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Arc<AtomicUsize>,
    results: Arc<Mutex<VecDeque<Result<SubmitReceipt, TransportError>>>>,
    last: Arc<Mutex<Option<FormData>>>,
    latency: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(50),
            ..Self::default()
        }
    }

    pub fn then_fail(self, err: TransportError) -> Self {
        self.results.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_data(&self) -> Option<FormData> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmitTransport for MockTransport {
    async fn submit(&self, data: &FormData) -> Result<SubmitReceipt, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(data.clone());
        tokio::time::sleep(self.latency).await;
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SubmitReceipt::now()))
    }
}

/// Transport that panics mid-request.
pub struct PanickingTransport;

#[async_trait]
impl SubmitTransport for PanickingTransport {
    async fn submit(&self, _data: &FormData) -> Result<SubmitReceipt, TransportError> {
        panic!("connection reset");
    }
}

/// A complete, valid registration.
pub fn valid_registration() -> Vec<(&'static str, &'static str)> {
    vec![
        (registration::USERNAME, "alice_01"),
        (registration::EMAIL, "alice@example.com"),
        (registration::PHONE, "13812345678"),
        (registration::PASSWORD, "Abcdef12"),
        (registration::CONFIRM_PASSWORD, "Abcdef12"),
        (registration::NICKNAME, "小艾"),
        (registration::CAPTCHA, "x7k2"),
    ]
}

/// Fill every field of a registration form with valid input.
pub fn fill_valid(form: &Form) {
    for (name, value) in valid_registration() {
        form.on_input(name, value).unwrap();
    }
    form.on_toggle(registration::AGREEMENT, true).unwrap();
    assert_eq!(FIELDS.len(), valid_registration().len() + 1);
}

pub fn registration_form(notifier: &RecordingNotifier, transport: impl SubmitTransport + 'static) -> Form {
    Form::new(
        registration::registration_engine().unwrap(),
        registration::registration_config(),
        notifier.clone(),
        transport,
    )
}
