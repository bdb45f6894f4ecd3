use tracing::{info, warn};

use crate::api_client::ApiClient;
use crate::credentials::CredentialProvider;
use crate::errors::ClientError;
use crate::profile::models::Profile;
use crate::profile::store::ProfileStore;

/// How `fetch_profile` arrived at its result. Informational only; callers
/// treat both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    Defaulted,
}

/// Reads and writes the persisted profile. A fresh token is requested for
/// every call.
#[derive(Clone)]
pub struct ProfileSync {
    api: ApiClient,
}

impl ProfileSync {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the stored profile and merges it over the defaults.
    ///
    /// Never fails: a missing profile, a transport error and a malformed payload
    /// all fall back to the default profile with a warning, since "no profile
    /// yet" is the normal first-run state.
    pub async fn fetch_profile(
        &self,
        credentials: &dyn CredentialProvider,
    ) -> (Profile, FetchOutcome) {
        match self.try_fetch(credentials).await {
            Ok(fetched) => {
                info!("Loaded existing profile ({} keys)", fetched.len());
                (ProfileStore::merge(&fetched), FetchOutcome::Loaded)
            }
            Err(e) if e.is_not_found() => {
                warn!("No existing profile found");
                (ProfileStore::initialize(), FetchOutcome::Defaulted)
            }
            Err(e) => {
                warn!("No existing profile found: {e}");
                (ProfileStore::initialize(), FetchOutcome::Defaulted)
            }
        }
    }

    async fn try_fetch(
        &self,
        credentials: &dyn CredentialProvider,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ClientError> {
        let token = credentials.token().await?;
        self.api.get_profile(&token).await
    }

    /// Upserts the full profile. Any non-2xx answer is a failure.
    pub async fn save_profile(
        &self,
        credentials: &dyn CredentialProvider,
        profile: &Profile,
    ) -> Result<(), ClientError> {
        let token = credentials.token().await?;
        self.api.post_profile(&token, profile).await
    }
}
