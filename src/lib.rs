pub mod cli;
pub mod config;
pub mod encode;
pub mod errors;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod stage;
pub mod ux;
pub mod wire;

pub use encode::{ReferenceImage, ReferenceSlot};
pub use errors::{CallError, PipelineError};
pub use pipeline::{BreakdownResult, DesignArtifact, Pipeline, PipelineSettings, TopViewArtifact};
pub use prompt::{compose, ComposedPrompt, FeatureSelection, HardscapeMaterial, HardscapeType};
pub use stage::{StageKind, StageState};
