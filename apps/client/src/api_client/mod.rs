//! Backend client, the single point of entry for every HTTP call this crate makes.
//!
//! No other module talks to the profile/autofill backend directly. Every call
//! is stamped with a bearer token the caller obtained just before the call.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ClientError;
use crate::profile::Profile;

/// Backend the original deployment served from.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

pub const FORM_URL_FIELD: &str = "form_url";
pub const JSON_FILE_FIELD: &str = "json_file";
pub const JSON_FILE_NAME: &str = "data.json";

/// Acknowledgement returned by `POST /submit/` when the backend accepted the job.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SubmitAck {
    pub status: Option<String>,
    pub job_id: Option<String>,
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .user_agent(concat!(
                    env!("CARGO_PKG_NAME"),
                    "/",
                    env!("CARGO_PKG_VERSION")
                ))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /profile: the stored record as a JSON object.
    pub async fn get_profile(&self, token: &str) -> Result<Map<String, Value>, ClientError> {
        let response = self
            .client
            .get(self.url("/profile"))
            .bearer_auth(token)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        match response.json::<Value>().await? {
            Value::Object(fields) => {
                debug!("GET /profile returned {} keys", fields.len());
                Ok(fields)
            }
            _ => Err(ClientError::NotAnObject),
        }
    }

    /// POST /profile: full-record upsert.
    pub async fn post_profile(&self, token: &str, profile: &Profile) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/profile"))
            .bearer_auth(token)
            .json(profile)
            .send()
            .await?;
        ensure_success(response).await?;
        debug!("POST /profile succeeded");
        Ok(())
    }

    /// POST /submit/: hands the profile and target form URL to the autofill service.
    ///
    /// The acknowledgement body is optional; an unreadable body on a 2xx answer
    /// still counts as accepted.
    pub async fn submit_form(
        &self,
        token: &str,
        form_url: &str,
        profile: &Profile,
    ) -> Result<SubmitAck, ClientError> {
        let form = submission_form(form_url, profile)?;
        let response = self
            .client
            .post(self.url("/submit/"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let body = response.text().await.unwrap_or_default();
        let ack = serde_json::from_str::<SubmitAck>(&body).unwrap_or_default();
        debug!("POST /submit/ accepted: {ack:?}");
        Ok(ack)
    }
}

/// Multipart payload for one autofill submission: the URL as typed, plus the
/// serialized profile attached as a JSON file.
fn submission_form(form_url: &str, profile: &Profile) -> Result<Form, ClientError> {
    let json = serde_json::to_vec(profile)?;
    let file = Part::bytes(json)
        .file_name(JSON_FILE_NAME)
        .mime_str("application/json")?;

    Ok(Form::new()
        .text(FORM_URL_FIELD, form_url.to_string())
        .part(JSON_FILE_FIELD, file))
}

/// Turns any non-2xx answer into `ClientError::Api`, keeping the backend's message.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}
