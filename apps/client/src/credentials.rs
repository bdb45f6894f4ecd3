use async_trait::async_trait;

use crate::errors::ClientError;

/// Source of bearer credentials for backend calls.
///
/// Implementations are asked for a token before every authenticated request;
/// callers never cache the returned value.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    fn is_signed_in(&self) -> bool;

    async fn token(&self) -> Result<String, ClientError>;
}

/// Credential provider backed by a token handed over by the identity provider
/// out of band (environment or CLI flag). No token means signed out.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self { token }
    }

    pub fn signed_in(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    async fn token(&self) -> Result<String, ClientError> {
        self.token.clone().ok_or(ClientError::NotSignedIn)
    }
}
