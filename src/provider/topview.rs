use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::http::HttpTransport;
use super::TopViewService;
use crate::errors::CallError;
use crate::wire::{TopViewRequest, TopViewResponse};

pub struct HttpTopViewService {
    transport: HttpTransport,
    path: String,
}

impl HttpTopViewService {
    pub fn new(transport: HttpTransport, path: String) -> Self {
        Self { transport, path }
    }
}

#[async_trait]
impl TopViewService for HttpTopViewService {
    async fn plan(&self, req: &TopViewRequest) -> Result<String, CallError> {
        let resp: TopViewResponse = self.transport.post(&self.path, req).await?;
        resp.url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| CallError::MissingArtifact("No plan URL returned".into()))
    }
}

/// Stand-in plan service: waits, then returns a fixed placeholder image.
pub struct SimulatedTopView {
    delay: Duration,
    placeholder_url: String,
}

impl SimulatedTopView {
    pub fn new(delay: Duration, placeholder_url: String) -> Self {
        Self { delay, placeholder_url }
    }
}

#[async_trait]
impl TopViewService for SimulatedTopView {
    async fn plan(&self, req: &TopViewRequest) -> Result<String, CallError> {
        debug!(design = %req.image_url, delay_ms = self.delay.as_millis() as u64, "simulating top-view plan");
        tokio::time::sleep(self.delay).await;
        Ok(self.placeholder_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_returns_placeholder_after_delay() {
        let svc = SimulatedTopView::new(Duration::from_millis(2500), "/top-view-placeholder.png".into());
        let started = tokio::time::Instant::now();
        let url = svc
            .plan(&TopViewRequest { image_url: "X".into() })
            .await
            .unwrap();
        assert_eq!(url, "/top-view-placeholder.png");
        assert!(started.elapsed() >= Duration::from_millis(2500));
    }
}
