//! Dashboard session, the view controller for one signed-in user.
//!
//! Owns the profile store and both backend clients for the lifetime of an
//! authenticated session. Signing out consumes the session, so no profile
//! state outlives it.

use std::sync::Arc;

use tracing::{error, info};

use crate::api_client::ApiClient;
use crate::credentials::CredentialProvider;
use crate::errors::{ClientError, ProfileError};
use crate::notify::Notifier;
use crate::profile::{FetchOutcome, Profile, ProfileField, ProfileStore, ProfileSync};
use crate::submission::{AutofillSubmitter, SubmissionState, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Profile,
    FillForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
}

/// A save whose edit session has already closed. Awaiting `outcome` performs
/// the upsert and fires the notification; dropping it abandons the save.
#[must_use = "the profile is only persisted when the pending save is awaited"]
pub struct PendingSave {
    sync: ProfileSync,
    credentials: Arc<dyn CredentialProvider>,
    notifier: Notifier,
    snapshot: Profile,
}

impl PendingSave {
    pub async fn outcome(self) -> SaveOutcome {
        match self
            .sync
            .save_profile(self.credentials.as_ref(), &self.snapshot)
            .await
        {
            Ok(()) => {
                self.notifier.success("Profile saved successfully");
                SaveOutcome::Saved
            }
            Err(e) => {
                error!("Profile save failed: {e}");
                self.notifier.error("Failed to save profile");
                SaveOutcome::Failed
            }
        }
    }
}

pub struct DashboardSession {
    credentials: Arc<dyn CredentialProvider>,
    store: ProfileStore,
    sync: ProfileSync,
    submitter: AutofillSubmitter,
    notifier: Notifier,
    view: View,
    form_url: String,
}

impl DashboardSession {
    /// Opens a session for a signed-in user and loads their profile once.
    pub async fn start(
        credentials: Arc<dyn CredentialProvider>,
        api: ApiClient,
        notifier: Notifier,
    ) -> Result<Self, ClientError> {
        if !credentials.is_signed_in() {
            return Err(ClientError::NotSignedIn);
        }

        let sync = ProfileSync::new(api.clone());
        let (profile, outcome) = sync.fetch_profile(credentials.as_ref()).await;
        if outcome == FetchOutcome::Defaulted {
            info!("Starting with an empty profile");
        }

        Ok(Self {
            credentials,
            store: ProfileStore::new(profile),
            sync,
            submitter: AutofillSubmitter::new(api, notifier.clone()),
            notifier,
            view: View::default(),
            form_url: String::new(),
        })
    }

    pub fn profile(&self) -> &Profile {
        self.store.profile()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show(&mut self, view: View) {
        self.view = view;
    }

    pub fn is_editing(&self) -> bool {
        self.store.is_editing()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn begin_edit(&mut self) {
        self.store.begin_edit();
    }

    pub fn set_field(&mut self, field: ProfileField, raw: &str) -> Result<(), ProfileError> {
        self.store.set_field(field, raw)
    }

    pub fn set_field_by_name(&mut self, name: &str, raw: &str) -> Result<(), ProfileError> {
        self.store.set_field_by_name(name, raw)
    }

    /// Ends the edit session and hands back the save to await.
    ///
    /// Editing is closed before the network result is known and stays closed
    /// whatever the outcome; a failed save is reported, not rolled back.
    pub fn save(&mut self) -> Result<PendingSave, ProfileError> {
        let snapshot = self.store.end_edit()?;
        Ok(PendingSave {
            sync: self.sync.clone(),
            credentials: self.credentials.clone(),
            notifier: self.notifier.clone(),
            snapshot,
        })
    }

    /// The single edit/save control: opens an edit session when viewing,
    /// saves when editing.
    pub fn toggle_edit(&mut self) -> Option<PendingSave> {
        if self.store.is_editing() {
            self.save().ok()
        } else {
            self.store.begin_edit();
            None
        }
    }

    pub fn form_url(&self) -> &str {
        &self.form_url
    }

    pub fn set_form_url(&mut self, url: impl Into<String>) {
        self.form_url = url.into();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitter.is_busy()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submitter.state()
    }

    /// Submits the in-memory profile for the current form URL.
    pub async fn submit(&self) -> SubmitOutcome {
        self.submitter
            .submit(self.credentials.as_ref(), &self.form_url, self.store.profile())
            .await
    }

    /// Tears the session down. Pending saves that were not awaited are abandoned.
    pub fn sign_out(self) {
        info!("Session closed");
    }
}
