//! Autofill submission: hands the current profile plus a target form URL to
//! the remote filling service.
//!
//! One submission at a time. The busy flag is the only guard against a second
//! submission while the first is in flight; the backend has no idempotency key.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::api_client::{ApiClient, SubmitAck};
use crate::credentials::CredentialProvider;
use crate::errors::ClientError;
use crate::notify::Notifier;
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Pre-flight validation failed; no request was sent.
    Rejected,
    /// Another submission is in flight; nothing was done.
    Busy,
    Succeeded { job_id: Option<String> },
    Failed,
}

pub struct AutofillSubmitter {
    api: ApiClient,
    notifier: Notifier,
    busy: AtomicBool,
    state: watch::Sender<SubmissionState>,
}

impl AutofillSubmitter {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            api,
            notifier,
            busy: AtomicBool::new(false),
            state,
        }
    }

    /// True while a submission is validating or in flight. A UI disables its
    /// submit control on this.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Runs one submission to completion and reports it through exactly one
    /// notification (none when busy).
    pub async fn submit(
        &self,
        credentials: &dyn CredentialProvider,
        form_url: &str,
        profile: &Profile,
    ) -> SubmitOutcome {
        if self.busy.swap(true, Ordering::AcqRel) {
            debug!("Submission already in flight; ignoring");
            return SubmitOutcome::Busy;
        }
        let _busy = BusyGuard(self);

        self.transition(SubmissionState::Validating);
        if form_url.trim().is_empty() {
            self.notifier.warn("Form URL is required");
            return SubmitOutcome::Rejected;
        }

        self.transition(SubmissionState::Submitting);
        match self.send(credentials, form_url, profile).await {
            Ok(ack) => {
                info!(
                    "Autofill job accepted (status: {}, job_id: {})",
                    ack.status.as_deref().unwrap_or("-"),
                    ack.job_id.as_deref().unwrap_or("-")
                );
                self.transition(SubmissionState::Succeeded);
                self.notifier.success("Upload successful");
                SubmitOutcome::Succeeded { job_id: ack.job_id }
            }
            Err(e) => {
                error!("Autofill submission failed: {e}");
                self.transition(SubmissionState::Failed);
                self.notifier.error("Upload failed");
                SubmitOutcome::Failed
            }
        }
    }

    async fn send(
        &self,
        credentials: &dyn CredentialProvider,
        form_url: &str,
        profile: &Profile,
    ) -> Result<SubmitAck, ClientError> {
        let token = credentials.token().await?;
        self.api.submit_form(&token, form_url, profile).await
    }

    fn transition(&self, next: SubmissionState) {
        let previous = self.state.send_replace(next);
        debug!("Submission state {previous:?} -> {next:?}");
    }
}

/// Returns the submitter to `Idle` and clears the busy flag when a submission
/// ends, including when its future is dropped mid-flight.
struct BusyGuard<'a>(&'a AutofillSubmitter);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.transition(SubmissionState::Idle);
        self.0.busy.store(false, Ordering::Release);
    }
}
