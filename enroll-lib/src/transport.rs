//! Submission transports.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::value::FormData;

/// Acknowledgement of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// When the transport accepted the submission.
    pub submitted_at: DateTime<Utc>,
    /// Optional message from the receiving side.
    pub message: Option<String>,
}

impl SubmitReceipt {
    /// Creates a receipt stamped with the current time.
    pub fn now() -> Self {
        Self {
            submitted_at: Utc::now(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Sends a validated form somewhere.
///
/// Called at most once per submit attempt. Latency and failures are the
/// transport's business; the form only reacts to the result.
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    async fn submit(&self, data: &FormData) -> Result<SubmitReceipt, TransportError>;
}

/// Transport that pretends to talk to a registration service.
///
/// Waits for `latency`, then fails with probability `failure_rate`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use enroll_lib::transport::SimulatedTransport;
///
/// let transport = SimulatedTransport::default()
///     .with_latency(Duration::from_millis(10))
///     .with_failure_rate(0.0);
/// assert_eq!(transport.failure_rate(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    latency: Duration,
    failure_rate: f64,
    failure_message: String,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(3),
            failure_rate: 0.2,
            failure_message: "Username already exists".to_string(),
        }
    }
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated round-trip time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sets the failure probability, clamped to `0.0..=1.0`.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }

    /// Sets the rejection message.
    pub fn with_failure_message(mut self, msg: impl Into<String>) -> Self {
        self.failure_message = msg.into();
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    fn roll_failure(&self) -> bool {
        rand::rng().random_bool(self.failure_rate)
    }
}

#[async_trait]
impl SubmitTransport for SimulatedTransport {
    async fn submit(&self, data: &FormData) -> Result<SubmitReceipt, TransportError> {
        log::debug!("Simulated submit of {} fields", data.len());
        tokio::time::sleep(self.latency).await;

        if self.roll_failure() {
            log::warn!("Simulated submit rejected: {}", self.failure_message);
            return Err(TransportError::Rejected(self.failure_message.clone()));
        }
        Ok(SubmitReceipt::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_rate_is_clamped() {
        assert_eq!(SimulatedTransport::new().with_failure_rate(1.5).failure_rate(), 1.0);
        assert_eq!(SimulatedTransport::new().with_failure_rate(-1.0).failure_rate(), 0.0);
        assert_eq!(SimulatedTransport::new().with_failure_rate(f64::NAN).failure_rate(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_and_outcome() {
        let data = FormData::default();

        let always_ok = SimulatedTransport::new().with_failure_rate(0.0);
        let started = tokio::time::Instant::now();
        assert!(always_ok.submit(&data).await.is_ok());
        assert!(started.elapsed() >= Duration::from_secs(3));

        let always_fails = SimulatedTransport::new()
            .with_latency(Duration::ZERO)
            .with_failure_rate(1.0);
        assert_eq!(
            always_fails.submit(&data).await,
            Err(TransportError::Rejected("Username already exists".into()))
        );
    }
}
