use async_trait::async_trait;
use tracing::debug;

use super::http::HttpTransport;
use super::DesignService;
use crate::errors::CallError;
use crate::wire::{DesignRequest, DesignResponse};

pub struct HttpDesignService {
    transport: HttpTransport,
    path: String,
}

impl HttpDesignService {
    pub fn new(transport: HttpTransport, path: String) -> Self {
        Self { transport, path }
    }
}

pub(crate) fn design_url(resp: &DesignResponse) -> Result<String, CallError> {
    resp.first_url()
        .map(str::to_string)
        .ok_or_else(|| CallError::MissingArtifact("No image URL returned".into()))
}

#[async_trait]
impl DesignService for HttpDesignService {
    async fn generate(&self, req: &DesignRequest) -> Result<String, CallError> {
        debug!(body = %req.redacted(), "design request");
        let resp: DesignResponse = self.transport.post(&self.path, req).await?;
        design_url(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_body_without_url_is_missing_artifact() {
        let resp: DesignResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(
            design_url(&resp),
            Err(CallError::MissingArtifact("No image URL returned".into()))
        );
        let resp: DesignResponse = serde_json::from_str(r#"{"data":[{"url":"X"}]}"#).unwrap();
        assert_eq!(design_url(&resp), Ok("X".to_string()));
    }
}
