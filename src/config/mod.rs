use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::cli::TopViewMode;
use crate::encode::DEFAULT_MAX_REFERENCE_BYTES;
use crate::errors::ConfigError;
use crate::prompt::FeatureSelection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub service: ServiceConfig,
    pub design: DesignConfig,
    pub breakdown: BreakdownConfig,
    pub top_view: TopViewConfig,
    pub reference: ReferenceConfig,
    /// Starting selection; CLI flags are applied on top.
    pub features: FeatureSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub design_path: String,
    pub breakdown_path: String,
    pub top_view_path: String,
    pub timeout_secs: u64,
    /// Honour HTTP(S)_PROXY from the environment.
    pub system_proxy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub n: u32,
    pub aspect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    pub tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopViewConfig {
    pub mode: TopViewMode,
    pub delay_ms: u64,
    pub placeholder_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub max_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-10-01".into(),
            service: ServiceConfig::default(),
            design: DesignConfig::default(),
            breakdown: BreakdownConfig::default(),
            top_view: TopViewConfig::default(),
            reference: ReferenceConfig::default(),
            features: FeatureSelection::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            design_path: "/api/generate".into(),
            breakdown_path: "/api/breakdown".into(),
            top_view_path: "/api/topview".into(),
            timeout_secs: 300,
            system_proxy: true,
        }
    }
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self { n: 1, aspect: "16:9".into() }
    }
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self { tier: "Custom Landscape".into() }
    }
}

impl Default for TopViewConfig {
    fn default() -> Self {
        Self {
            mode: TopViewMode::Simulated,
            delay_ms: 2500,
            placeholder_url: "/top-view-placeholder.png".into(),
        }
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_REFERENCE_BYTES }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults, overlaid with the TOML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                debug!(path = %p.display(), "loading config");
                Self::from_toml(&fs_err::read_to_string(p)?)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::HardscapeMaterial;
    use std::io::Write;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg = Config::from_toml(
            r#"
            [service]
            base_url = "https://yard.example"

            [top_view]
            mode = "remote"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.service.base_url, "https://yard.example");
        assert_eq!(cfg.service.design_path, "/api/generate");
        assert_eq!(cfg.top_view.mode, TopViewMode::Remote);
        assert_eq!(cfg.top_view.delay_ms, 2500);
        assert_eq!(cfg.breakdown.tier, "Custom Landscape");
        assert_eq!(cfg.reference.max_bytes, 5 * 1024 * 1024);
        assert!(cfg.features.native_planting);
    }

    #[test]
    fn features_table_is_read() {
        let cfg = Config::from_toml(
            r#"
            [features]
            native_planting = false
            hardscape = true
            hardscape_type = "walkway-patio"
            hardscape_material = "stone"
            "#,
        )
        .unwrap();
        assert!(!cfg.features.native_planting);
        assert!(cfg.features.hardscape);
        assert_eq!(cfg.features.hardscape_material, HardscapeMaterial::Stone);
    }

    #[test]
    fn load_reads_file_and_reports_bad_toml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[design]\naspect = \"4:3\"").unwrap();
        let cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.design.aspect, "4:3");
        assert_eq!(cfg.design.n, 1);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "[design\n").unwrap();
        assert!(matches!(Config::load(Some(bad.path())), Err(ConfigError::Parse(_))));
        assert!(matches!(Config::load(Some(Path::new("/nonexistent/yard.toml"))), Err(ConfigError::Read(_))));
    }
}
