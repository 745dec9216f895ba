use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::prompt::{FeatureSelection, HardscapeMaterial, HardscapeType};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopViewMode {
    /// Placeholder plan after a fixed delay.
    #[value(alias = "sim")]
    Simulated,
    /// POST to the configured top-view endpoint.
    Remote,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardscapeArg {
    Walkway,
    #[value(alias = "walkway+patio")]
    WalkwayPatio,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialArg {
    Stone,
    Pavers,
}

#[derive(Parser, Debug)]
#[command(name = "yardcraft", version, about = "Generate a landscape design, cost breakdown and top-down plan")]
pub struct Args {
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, value_enum)]
    pub top_view_mode: Option<TopViewMode>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Photo of the yard to redesign
    #[arg(long)]
    pub reference: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_native_planting: bool,

    #[arg(long, default_value_t = false)]
    pub rain_garden: bool,

    /// Adds a permeable walkway (or walkway and patio)
    #[arg(long, value_enum)]
    pub hardscape: Option<HardscapeArg>,

    #[arg(long, value_enum, requires = "hardscape")]
    pub material: Option<MaterialArg>,

    #[arg(long, default_value_t = false)]
    pub culinary: bool,

    #[arg(long, default_value_t = false)]
    pub medicinal: bool,

    #[arg(long, default_value_t = false)]
    pub fruit: bool,

    /// Run the cost/plant/strategy breakdown after the design
    #[arg(long, default_value_t = false)]
    pub breakdown: bool,

    /// Run the top-down plan after the design
    #[arg(long, default_value_t = false)]
    pub top_view: bool,

    /// Run every stage without asking
    #[arg(long, default_value_t = false)]
    pub auto_approve: bool,

    /// Print the composed prompt and exit
    #[arg(long, default_value_t = false)]
    pub print_prompt: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    /// Applies the feature flags on top of `base`.
    pub fn apply_features(&self, base: FeatureSelection) -> FeatureSelection {
        let mut sel = base;
        if self.no_native_planting {
            sel.native_planting = false;
        }
        if self.rain_garden {
            sel.rain_garden = true;
        }
        if let Some(hs) = self.hardscape {
            sel.hardscape = true;
            sel.hardscape_type = match hs {
                HardscapeArg::Walkway => HardscapeType::Walkway,
                HardscapeArg::WalkwayPatio => HardscapeType::WalkwayPatio,
            };
        }
        if let Some(m) = self.material {
            sel.hardscape_material = match m {
                MaterialArg::Stone => HardscapeMaterial::Stone,
                MaterialArg::Pavers => HardscapeMaterial::Pavers,
            };
        }
        if self.culinary || self.medicinal || self.fruit {
            sel.edible_guild = true;
            sel.culinary |= self.culinary;
            sel.medicinal |= self.medicinal;
            sel.fruit |= self.fruit;
        }
        sel
    }
}
