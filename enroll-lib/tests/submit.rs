mod common;

use common::{MockTransport, PanickingTransport, RecordingNotifier, fill_valid, registration_form};
use enroll_lib::error::{EngineError, SubmitError, TransportError};
use enroll_lib::events::{self, FormEvent};
use enroll_lib::notify::NoticeLevel;
use enroll_lib::registration::{self, CAPTCHA, USERNAME};
use enroll_lib::{FieldValue, Form, SubmissionState, SubmitOutcome};

#[tokio::test(start_paused = true)]
async fn test_invalid_form_never_reaches_transport() {
    let notifier = RecordingNotifier::default();
    let transport = MockTransport::new();
    let form = registration_form(&notifier, transport.clone());

    let outcome = form.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Invalid { ref focus } if focus == USERNAME));
    assert_eq!(transport.calls(), 0);
    assert_eq!(form.submission(), SubmissionState::Idle);
    assert!(form.field_state(USERNAME).unwrap().touched);

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, form.config().invalid_message);
}

#[tokio::test(start_paused = true)]
async fn test_focus_goes_to_first_invalid_field() {
    let notifier = RecordingNotifier::default();
    let form = registration_form(&notifier, MockTransport::new());
    fill_valid(&form);
    form.on_input(CAPTCHA, "12345").unwrap();

    match form.submit().await {
        SubmitOutcome::Invalid { focus } => assert_eq!(focus, CAPTCHA),
        other => panic!("expected invalid outcome, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_successful_submit_is_terminal() {
    let notifier = RecordingNotifier::default();
    let transport = MockTransport::new();
    let form = registration_form(&notifier, transport.clone());
    fill_valid(&form);

    let outcome = form.submit().await;
    assert!(outcome.is_submitted());
    assert_eq!(form.submission(), SubmissionState::Succeeded);
    assert_eq!(transport.calls(), 1);

    let data = transport.last_data().unwrap();
    assert_eq!(data.text(USERNAME), "alice_01");
    assert_eq!(data.get(registration::AGREEMENT), Some(&FieldValue::Flag(true)));

    let notices = notifier.notices();
    assert_eq!(notices.last().unwrap().level, NoticeLevel::Success);

    // No more input, no more submissions.
    assert!(matches!(
        form.on_input(USERNAME, "mallory"),
        Err(EngineError::Completed(_))
    ));
    assert!(matches!(
        form.submit().await,
        SubmitOutcome::Rejected(SubmissionState::Succeeded)
    ));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_succeeded_form_cannot_be_reopened() {
    let notifier = RecordingNotifier::default();
    let transport = MockTransport::new();
    let form = registration_form(&notifier, transport.clone());
    fill_valid(&form);
    assert!(form.submit().await.is_submitted());

    assert!(matches!(form.reset(), Err(EngineError::Completed(_))));
    assert!(matches!(form.on_blur(USERNAME), Err(EngineError::Completed(_))));
    assert!(matches!(
        form.composition_start(USERNAME),
        Err(EngineError::Completed(_))
    ));
    assert!(matches!(
        form.on_toggle(registration::AGREEMENT, false),
        Err(EngineError::Completed(_))
    ));
    assert_eq!(form.submission(), SubmissionState::Succeeded);
    assert_eq!(
        form.field_state(USERNAME).unwrap().value,
        FieldValue::from("alice_01")
    );

    assert!(matches!(
        form.submit().await,
        SubmitOutcome::Rejected(SubmissionState::Succeeded)
    ));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_double_submit_calls_transport_once() {
    let notifier = RecordingNotifier::default();
    let transport = MockTransport::new();
    let form = registration_form(&notifier, transport.clone());
    fill_valid(&form);

    let (first, second) = tokio::join!(form.submit(), form.submit());

    assert!(first.is_submitted());
    assert!(matches!(second, SubmitOutcome::Rejected(SubmissionState::Submitting)));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_returns_to_idle() {
    let notifier = RecordingNotifier::default();
    let transport =
        MockTransport::new().then_fail(TransportError::Rejected("Username already exists".into()));
    let form = registration_form(&notifier, transport.clone());
    fill_valid(&form);

    let outcome = form.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(SubmitError::Transport(TransportError::Rejected(_)))
    ));
    assert_eq!(form.submission(), SubmissionState::Idle);

    // Entered values survive the failure.
    assert_eq!(
        form.field_state(USERNAME).unwrap().value,
        FieldValue::from("alice_01")
    );

    let error = notifier.notices().pop().unwrap();
    assert_eq!(error.level, NoticeLevel::Error);
    assert_eq!(error.message, "Username already exists");

    // Retry is a fresh submit.
    assert!(form.submit().await.is_submitted());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_uses_fallback_message() {
    let notifier = RecordingNotifier::default();
    let transport =
        MockTransport::new().then_fail(TransportError::Unavailable("timeout".into()));
    let form = registration_form(&notifier, transport);
    fill_valid(&form);

    form.submit().await;
    let error = notifier.notices().pop().unwrap();
    assert_eq!(error.message, "Registration failed, please try again");
}

#[tokio::test(start_paused = true)]
async fn test_transport_panic_becomes_submit_error() {
    let notifier = RecordingNotifier::default();
    let form = registration_form(&notifier, PanickingTransport);
    fill_valid(&form);

    match form.submit().await {
        SubmitOutcome::Failed(SubmitError::Panicked(message)) => {
            assert_eq!(message, "connection reset")
        }
        other => panic!("expected panic failure, got {other:?}"),
    }
    assert_eq!(form.submission(), SubmissionState::Idle);
    assert_eq!(notifier.notices().pop().unwrap().level, NoticeLevel::Error);
}

#[tokio::test(start_paused = true)]
async fn test_submission_events() {
    let (tx, mut rx) = events::channel();
    let notifier = RecordingNotifier::default();
    let transport = MockTransport::new().then_fail(TransportError::Rejected("nope".into()));
    let form = Form::new(
        registration::registration_engine().unwrap().with_events(tx),
        registration::registration_config(),
        notifier,
        transport,
    );
    fill_valid(&form);

    form.submit().await;
    form.submit().await;

    let transitions: Vec<(SubmissionState, SubmissionState)> = rx
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            FormEvent::SubmissionChanged { from, to } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (SubmissionState::Idle, SubmissionState::Submitting),
            (SubmissionState::Submitting, SubmissionState::Idle),
            (SubmissionState::Idle, SubmissionState::Submitting),
            (SubmissionState::Submitting, SubmissionState::Succeeded),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_reset_after_failure() {
    let notifier = RecordingNotifier::default();
    let transport = MockTransport::new().then_fail(TransportError::Rejected("taken".into()));
    let form = registration_form(&notifier, transport);
    fill_valid(&form);
    form.submit().await;

    form.reset().unwrap();
    assert!(form.field_state(USERNAME).unwrap().value.is_empty());
    assert!(!form.field_state(USERNAME).unwrap().touched);
}
