use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::CallError;
use crate::wire::error_detail;

/// JSON-over-HTTP transport shared by the remote collaborators.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_secs: u64, system_proxy: bool) -> reqwest::Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(timeout_secs));
        if !system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, CallError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CallError::Transport(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CallError::Transport(format!("reading response from {url} failed: {e}")))?;
        debug!(%url, status = status.as_u16(), bytes = text.len(), "response");

        if !status.is_success() {
            return Err(CallError::Status {
                status: status.as_u16(),
                detail: error_detail(status.as_u16(), &text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| CallError::Malformed(format!("unreadable response from {url}: {e}")))
    }
}
