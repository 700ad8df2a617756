use serde::Deserialize;
use thiserror::Error;

const SIGNED_URL_ENDPOINT: &str =
    "https://api.elevenlabs.io/v1/convai/conversation/get_signed_url";

#[derive(Debug, Error)]
pub enum SignedUrlError {
    #[error("Voice transport credentials are not configured")]
    MissingCredentials,
    #[error("Signed URL request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Voice transport returned {status}: {body}")]
    Vendor { status: u16, body: String },
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    signed_url: String,
}

/// Proxies signed-URL issuance so the browser never sees the raw API key.
pub struct SignedUrlService {
    client: reqwest::Client,
    api_key: Option<String>,
    agent_id: Option<String>,
}

impl SignedUrlService {
    pub fn new(api_key: Option<String>, agent_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            agent_id,
        }
    }

    pub async fn fetch_signed_url(&self) -> Result<String, SignedUrlError> {
        let (api_key, agent_id) = match (&self.api_key, &self.agent_id) {
            (Some(key), Some(agent)) => (key, agent),
            _ => return Err(SignedUrlError::MissingCredentials),
        };

        let response = self
            .client
            .get(SIGNED_URL_ENDPOINT)
            .query(&[("agent_id", agent_id)])
            .header("xi-api-key", api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SignedUrlError::Vendor { status, body });
        }

        let body: SignedUrlResponse = response.json().await?;
        Ok(body.signed_url)
    }
}
