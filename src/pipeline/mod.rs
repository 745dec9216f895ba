//! Pipeline coordinator.
//!
//! Owns the three stage controllers and the current design artifact. The
//! design stage feeds the other two; re-running it clears them before the new
//! design request goes out.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::encode::ReferenceImage;
use crate::errors::{CallError, PipelineError};
use crate::prompt::{compose, ComposedPrompt, FeatureSelection};
use crate::provider::Services;
use crate::stage::{StageController, StageKind, StageState};
use crate::wire::{BreakdownRequest, DesignRequest, TopViewRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignArtifact {
    pub url: String,
    pub prompt_used: String,
}

/// Cost / plant / strategy narrative (markdown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownResult(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopViewArtifact {
    pub url: String,
}

pub type DesignState = StageState<Arc<DesignArtifact>>;
pub type BreakdownState = StageState<BreakdownResult>;
pub type TopViewState = StageState<TopViewArtifact>;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub n: u32,
    pub aspect: String,
    pub tier: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { n: 1, aspect: "16:9".into(), tier: "Custom Landscape".into() }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            n: cfg.design.n,
            aspect: cfg.design.aspect.clone(),
            tier: cfg.breakdown.tier.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub design: DesignState,
    pub breakdown: BreakdownState,
    pub top_view: TopViewState,
}

const NO_DESIGN_FOR_BREAKDOWN: &str = "No design image generated yet. Please generate a design first.";
const NO_DESIGN_FOR_TOP_VIEW: &str = "Generate the main design first.";

/// One user session's worth of generation state.
pub struct Pipeline {
    session: Uuid,
    settings: PipelineSettings,
    services: Services,
    design: StageController<Arc<DesignArtifact>>,
    breakdown: StageController<BreakdownResult>,
    top_view: StageController<TopViewArtifact>,
}

impl Pipeline {
    pub fn new(services: Services, settings: PipelineSettings) -> Self {
        let session = Uuid::new_v4();
        debug!(%session, "new pipeline session");
        Self {
            session,
            settings,
            services,
            design: StageController::new(StageKind::Design),
            breakdown: StageController::new(StageKind::Breakdown),
            top_view: StageController::new(StageKind::TopView),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn design_state(&self) -> DesignState {
        self.design.state()
    }

    pub fn breakdown_state(&self) -> BreakdownState {
        self.breakdown.state()
    }

    pub fn top_view_state(&self) -> TopViewState {
        self.top_view.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            design: self.design_state(),
            breakdown: self.breakdown_state(),
            top_view: self.top_view_state(),
        }
    }

    /// The design downstream stages would run against right now.
    pub fn current_design(&self) -> Option<Arc<DesignArtifact>> {
        self.design.state().artifact().cloned()
    }

    pub async fn run_design(
        &self,
        selection: &FeatureSelection,
        reference: Option<&ReferenceImage>,
    ) -> Result<DesignState, PipelineError> {
        // downstream results belong to the design being replaced; they are
        // already Idle whenever design is Pending
        self.breakdown.reset();
        self.top_view.reset();
        let ticket = self.design.begin()?;

        let prompt = compose(selection, reference.is_some());
        info!(session = %self.session, edit = reference.is_some(), "generating design");
        let outcome = self.request_design(&prompt, reference).await;

        Ok(ticket.finish(outcome.map(|url| {
            Arc::new(DesignArtifact { url, prompt_used: prompt.into_string() })
        })))
    }

    async fn request_design(
        &self,
        prompt: &ComposedPrompt,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, CallError> {
        let image_base64 = match reference {
            Some(r) => Some(r.encode().await?.into_string()),
            None => None,
        };
        let req = DesignRequest {
            prompt: prompt.as_str().to_string(),
            is_edit: reference.is_some(),
            image_base64,
            n: self.settings.n,
            aspect: self.settings.aspect.clone(),
        };
        self.services.design.generate(&req).await
    }

    pub async fn run_breakdown(&self) -> Result<BreakdownState, PipelineError> {
        let design = self
            .current_design()
            .ok_or_else(|| PipelineError::Precondition(NO_DESIGN_FOR_BREAKDOWN.into()))?;
        let req = BreakdownRequest { image_url: design.url.clone(), tier: self.settings.tier.clone() };
        info!(session = %self.session, design = %design.url, "generating breakdown");

        let service = &self.services.breakdown;
        self.breakdown
            .trigger(move || async move { service.analyze(&req).await.map(BreakdownResult) })
            .await
    }

    pub async fn run_top_view(&self) -> Result<TopViewState, PipelineError> {
        let design = self
            .current_design()
            .ok_or_else(|| PipelineError::Precondition(NO_DESIGN_FOR_TOP_VIEW.into()))?;
        let req = TopViewRequest { image_url: design.url.clone() };
        info!(session = %self.session, design = %design.url, "generating top-view plan");

        let service = &self.services.top_view;
        self.top_view
            .trigger(move || async move { service.plan(&req).await.map(|url| TopViewArtifact { url }) })
            .await
    }
}
