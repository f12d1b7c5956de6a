use crate::config::CallbackConfig;
use crate::features::ExtractedIntelligence;
use crate::session::SessionRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Final session report. Field names and their order are part of the
/// receiving endpoint's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub session_id: String,
    pub scam_detected: bool,
    pub total_messages_exchanged: u32,
    pub extracted_intelligence: ReportedIntelligence,
    pub agent_notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedIntelligence {
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phishing_links: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub suspicious_keywords: Vec<String>,
}

impl From<&ExtractedIntelligence> for ReportedIntelligence {
    fn from(intel: &ExtractedIntelligence) -> Self {
        Self {
            bank_accounts: intel.bank_accounts.clone(),
            upi_ids: intel.upi_ids.clone(),
            phishing_links: intel.phishing_links.clone(),
            phone_numbers: intel.phone_numbers.clone(),
            suspicious_keywords: intel.suspicious_keywords.clone(),
        }
    }
}

impl From<&SessionRecord> for CallbackPayload {
    fn from(record: &SessionRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            scam_detected: record.scam_detected,
            total_messages_exchanged: record.total_messages,
            extracted_intelligence: ReportedIntelligence::from(&record.intelligence),
            agent_notes: record.notes.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("endpoint answered with HTTP {0}")]
    Status(u16),
    #[error("delivery for session {session_id} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        session_id: String,
        attempts: u32,
        last_error: String,
    },
    #[error("pending queue lock poisoned")]
    LockPoisoned,
}

/// Posts session reports to the configured endpoint.
///
/// Each submission is tried up to `max_attempts` times. A payload that still
/// fails is parked in a pending queue which [`CallbackClient::flush_pending`]
/// retries later.
pub struct CallbackClient {
    client: Client,
    config: CallbackConfig,
    pending: Mutex<VecDeque<CallbackPayload>>,
}

impl CallbackClient {
    pub fn new(config: CallbackConfig) -> Result<Self, CallbackError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("scam-honeypot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CallbackError::Client)?;

        Ok(Self {
            client,
            config,
            pending: Mutex::new(VecDeque::new()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn pending_count(&self) -> Result<usize, CallbackError> {
        let pending = self.pending.lock().map_err(|_| CallbackError::LockPoisoned)?;
        Ok(pending.len())
    }

    fn enqueue<I>(&self, payloads: I) -> Result<(), CallbackError>
    where
        I: IntoIterator<Item = CallbackPayload>,
    {
        let mut pending = self.pending.lock().map_err(|_| CallbackError::LockPoisoned)?;
        for payload in payloads {
            if self.config.max_pending == 0 {
                log::warn!("Pending queue disabled, dropping report for session {}", payload.session_id);
                continue;
            }
            while pending.len() >= self.config.max_pending {
                if let Some(dropped) = pending.pop_front() {
                    log::warn!(
                        "Pending queue full ({}), dropping oldest report for session {}",
                        self.config.max_pending,
                        dropped.session_id
                    );
                }
            }
            pending.push_back(payload);
        }
        Ok(())
    }

    /// Delivers `payload`, queueing it for later when every attempt fails.
    pub async fn submit(&self, payload: &CallbackPayload) -> Result<(), CallbackError> {
        match self.send_with_retries(payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!(
                    "Queueing report for session {} after failed delivery: {}",
                    payload.session_id,
                    e
                );
                self.enqueue([payload.clone()])?;
                Err(e)
            }
        }
    }

    /// Retries every queued payload once through the normal retry loop.
    /// Returns how many were delivered; the rest go back on the queue.
    pub async fn flush_pending(&self) -> Result<usize, CallbackError> {
        let queued: Vec<CallbackPayload> = {
            let mut pending = self.pending.lock().map_err(|_| CallbackError::LockPoisoned)?;
            pending.drain(..).collect()
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        for payload in queued {
            match self.send_with_retries(&payload).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    log::warn!("Report for session {} still undeliverable: {}", payload.session_id, e);
                    failed.push(payload);
                }
            }
        }

        self.enqueue(failed)?;

        log::info!(
            "Flushed {} pending reports, {} remain",
            delivered,
            self.pending_count()?
        );
        Ok(delivered)
    }

    async fn send_with_retries(&self, payload: &CallbackPayload) -> Result<(), CallbackError> {
        let attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.send_once(payload).await {
                Ok(()) => {
                    log::info!(
                        "Delivered report for session {} to {} (attempt {})",
                        payload.session_id,
                        self.config.endpoint,
                        attempt
                    );
                    return Ok(());
                }
                Err(e) => {
                    log::debug!(
                        "Attempt {}/{} for session {} failed: {}",
                        attempt,
                        attempts,
                        payload.session_id,
                        e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    }
                }
            }
        }

        Err(CallbackError::Exhausted {
            session_id: payload.session_id.clone(),
            attempts,
            last_error,
        })
    }

    async fn send_once(&self, payload: &CallbackPayload) -> Result<(), CallbackError> {
        let mut request = self.client.post(&self.config.endpoint).json(payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(CallbackError::Status(response.status().as_u16()))
        }
    }
}
