use serde::Deserialize;

use crate::error::LlmError;

pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Account the hub associates with a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubIdentity {
    pub name: String,
    pub kind: Option<String>,
}

/// Token-based login against a model hub.
pub trait HubAuth: Send + Sync {
    /// Validate `token` with the hub and return the account it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the hub rejects the token.
    fn login(&self, token: &str) -> Result<HubIdentity, LlmError>;
}

#[derive(Deserialize)]
struct WhoAmI {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Blocking client for the HuggingFace Hub `whoami-v2` endpoint.
#[derive(Debug, Clone)]
pub struct HubClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl HubClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LlmError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("resume-screener/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            http,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn whoami_url(&self) -> String {
        format!("{}/api/whoami-v2", self.endpoint)
    }
}

impl HubAuth for HubClient {
    fn login(&self, token: &str) -> Result<HubIdentity, LlmError> {
        let response = self
            .http
            .get(self.whoami_url())
            .bearer_auth(token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::HubStatus {
                status: status.as_u16(),
                body,
            });
        }

        let whoami: WhoAmI = response.json()?;
        tracing::debug!(user = %whoami.name, "hub accepted token");
        Ok(HubIdentity {
            name: whoami.name,
            kind: whoami.kind,
        })
    }
}
