use async_trait::async_trait;

use crate::cli::TopViewMode;
use crate::config::Config;
use crate::errors::CallError;
use crate::wire::{BreakdownRequest, DesignRequest, TopViewRequest};

pub mod breakdown;
pub mod design;
pub mod http;
pub mod topview;

/// Renders a design image and returns its url.
#[async_trait]
pub trait DesignService: Send + Sync {
    async fn generate(&self, req: &DesignRequest) -> Result<String, CallError>;
}

/// Produces the cost / plant / strategy narrative for a design image.
#[async_trait]
pub trait BreakdownService: Send + Sync {
    async fn analyze(&self, req: &BreakdownRequest) -> Result<String, CallError>;
}

/// Produces a labeled top-down plan image and returns its url.
#[async_trait]
pub trait TopViewService: Send + Sync {
    async fn plan(&self, req: &TopViewRequest) -> Result<String, CallError>;
}

pub type DynDesign = Box<dyn DesignService>;
pub type DynBreakdown = Box<dyn BreakdownService>;
pub type DynTopView = Box<dyn TopViewService>;

pub struct Services {
    pub design: DynDesign,
    pub breakdown: DynBreakdown,
    pub top_view: DynTopView,
}

pub fn make_services(cfg: &Config) -> anyhow::Result<Services> {
    let transport = http::HttpTransport::new(
        &cfg.service.base_url,
        cfg.service.timeout_secs,
        cfg.service.system_proxy,
    )?;

    let top_view: DynTopView = match cfg.top_view.mode {
        TopViewMode::Remote => Box::new(topview::HttpTopViewService::new(
            transport.clone(),
            cfg.service.top_view_path.clone(),
        )),
        TopViewMode::Simulated => Box::new(topview::SimulatedTopView::new(
            std::time::Duration::from_millis(cfg.top_view.delay_ms),
            cfg.top_view.placeholder_url.clone(),
        )),
    };

    Ok(Services {
        design: Box::new(design::HttpDesignService::new(
            transport.clone(),
            cfg.service.design_path.clone(),
        )),
        breakdown: Box::new(breakdown::HttpBreakdownService::new(
            transport,
            cfg.service.breakdown_path.clone(),
        )),
        top_view,
    })
}

#[async_trait]
impl<S: DesignService + ?Sized> DesignService for std::sync::Arc<S> {
    async fn generate(&self, req: &DesignRequest) -> Result<String, CallError> {
        (**self).generate(req).await
    }
}

#[async_trait]
impl<S: BreakdownService + ?Sized> BreakdownService for std::sync::Arc<S> {
    async fn analyze(&self, req: &BreakdownRequest) -> Result<String, CallError> {
        (**self).analyze(req).await
    }
}

#[async_trait]
impl<S: TopViewService + ?Sized> TopViewService for std::sync::Arc<S> {
    async fn plan(&self, req: &TopViewRequest) -> Result<String, CallError> {
        (**self).plan(req).await
    }
}
