use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HardscapeType {
    #[default]
    Walkway,
    WalkwayPatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardscapeMaterial {
    Stone,
    #[default]
    Pavers,
}

/// The landscape features a user asked for.
///
/// `hardscape_*` only matter when `hardscape` is on, and the three guild
/// toggles only matter when `edible_guild` is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSelection {
    pub native_planting: bool,
    pub rain_garden: bool,
    pub hardscape: bool,
    pub hardscape_type: HardscapeType,
    pub hardscape_material: HardscapeMaterial,
    pub edible_guild: bool,
    pub culinary: bool,
    pub medicinal: bool,
    pub fruit: bool,
}

impl Default for FeatureSelection {
    fn default() -> Self {
        Self {
            native_planting: true,
            rain_garden: false,
            hardscape: false,
            hardscape_type: HardscapeType::default(),
            hardscape_material: HardscapeMaterial::default(),
            edible_guild: false,
            culinary: false,
            medicinal: false,
            fruit: false,
        }
    }
}

impl FeatureSelection {
    /// Everything off.
    pub fn none() -> Self {
        Self { native_planting: false, ..Self::default() }
    }
}

/// Prompt text sent to the design service. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComposedPrompt(String);

impl ComposedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ComposedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const NATIVE_PLANTING: &str = "grass completely removed and replaced with low-water Colorado native perennials, grasses, and shrubs (80%+ native coverage)";
const RAIN_GARDEN: &str = "downspout routed into a beautiful infiltration basin / rain garden with native wetland plants";
const CULINARY_GUILD: &str = "culinary herb and vegetable guild";
const MEDICINAL_GUILD: &str = "medicinal herb guild";
const FRUIT_GUILD: &str = "fruit tree and berry bush guild";

const OPENING: &str = "Photorealistic landscape design for a real Fort Collins, Colorado yard.";

fn constraints() -> &'static str {
r#"ONLY modify the yard/grass/plants/soil/landscape features.
DO NOT change house, roof, windows, garage, driveway, sidewalks, fences, or any architecture.
Natural daylight, high detail, professional photography style."#
}

fn hardscape_phrase(kind: HardscapeType, material: HardscapeMaterial) -> String {
    let hs = match kind {
        HardscapeType::Walkway => "permeable walkway",
        HardscapeType::WalkwayPatio => "permeable walkway AND patio",
    };
    let mat = match material {
        HardscapeMaterial::Stone => "natural stone",
        HardscapeMaterial::Pavers => "pavers",
    };
    format!("{hs} made of {mat}")
}

/// Ordered feature phrases for the enabled toggles.
pub fn feature_phrases(sel: &FeatureSelection) -> Vec<String> {
    let mut features = Vec::new();
    if sel.native_planting {
        features.push(NATIVE_PLANTING.to_string());
    }
    if sel.rain_garden {
        features.push(RAIN_GARDEN.to_string());
    }
    if sel.hardscape {
        features.push(hardscape_phrase(sel.hardscape_type, sel.hardscape_material));
    }
    if sel.edible_guild {
        let guilds: Vec<&str> = [
            (sel.culinary, CULINARY_GUILD),
            (sel.medicinal, MEDICINAL_GUILD),
            (sel.fruit, FRUIT_GUILD),
        ]
        .into_iter()
        .filter_map(|(on, phrase)| on.then_some(phrase))
        .collect();
        // one combined feature, not one per guild
        if !guilds.is_empty() {
            features.push(guilds.join(", "));
        }
    }
    features
}

/// Builds the design prompt. The text is the same with or without a
/// reference photo; edit mode travels as the request's `isEdit` flag.
pub fn compose(sel: &FeatureSelection, has_reference: bool) -> ComposedPrompt {
    let features = feature_phrases(sel);
    if has_reference {
        tracing::debug!("composing prompt for edit request");
    }

    let mut out = String::from(OPENING);
    out.push('\n');
    if !features.is_empty() {
        out.push_str(&format!("Include these specific features: {}.\n", features.join(", ")));
    }
    out.push_str(constraints());
    ComposedPrompt(out)
}
