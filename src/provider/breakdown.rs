use async_trait::async_trait;

use super::http::HttpTransport;
use super::BreakdownService;
use crate::errors::CallError;
use crate::wire::{BreakdownRequest, BreakdownResponse};

pub struct HttpBreakdownService {
    transport: HttpTransport,
    path: String,
}

impl HttpBreakdownService {
    pub fn new(transport: HttpTransport, path: String) -> Self {
        Self { transport, path }
    }
}

/// An ok response with no text is its own outcome, not a transport error.
pub(crate) fn breakdown_text(resp: BreakdownResponse) -> Result<String, CallError> {
    match resp.breakdown {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(CallError::Empty),
    }
}

#[async_trait]
impl BreakdownService for HttpBreakdownService {
    async fn analyze(&self, req: &BreakdownRequest) -> Result<String, CallError> {
        let resp: BreakdownResponse = self.transport.post(&self.path, req).await?;
        breakdown_text(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_missing_breakdown_is_empty() {
        for body in [r#"{"breakdown":""}"#, r#"{"breakdown":"  "}"#, "{}"] {
            let resp: BreakdownResponse = serde_json::from_str(body).unwrap();
            assert_eq!(breakdown_text(resp), Err(CallError::Empty), "{body}");
        }
        let resp: BreakdownResponse = serde_json::from_str(r###"{"breakdown":"## Costs"}"###).unwrap();
        assert_eq!(breakdown_text(resp).unwrap(), "## Costs");
    }
}
