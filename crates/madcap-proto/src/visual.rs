//! Visual concepts and the `/generate-visual` wire contract.

use serde::{Deserialize, Serialize};

/// Style directive for the first of the two parallel visual requests.
pub const CONCEPT_STYLE_LIFESTYLE: &str = "1 - Lifestyle/Aspirational Style: Focus on emotional \
     connection, lifestyle moments, and aspirational imagery. Use warm, natural lighting and \
     authentic human interactions.";

/// Style directive for the second of the two parallel visual requests.
pub const CONCEPT_STYLE_BOLD: &str = "2 - Bold/Dynamic Style: Focus on product features, bold \
     graphics, vibrant colors, and energetic compositions. Use dramatic lighting and striking \
     visual elements.";

/// A generated visual concept.
///
/// Two are produced per selected campaign, one per fixed style directive.
/// Concepts parsed out of the combined free-text response carry no directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualConcept {
    /// Concept number, 1 or 2.
    pub index: u8,
    pub style_directive: Option<String>,
    pub caption: String,
    /// Inline data URI or a direct image URL.
    pub image_data: String,
}

/// The visual concept the user chose, carried forward into script and video
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedVisualConcept {
    pub number: u8,
    pub description: String,
    pub image_url: String,
}

/// Request body for `POST /generate-visual`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualRequest {
    pub concept: String,
    pub campaign_content: String,
}

/// Response body for `POST /generate-visual`.
///
/// The service reports several auxiliary fields; only `caption` and
/// `image_data` are required for the stage to count as successful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub visual_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl VisualResponse {
    /// A concept is usable only when both caption and image data are present
    /// and non-empty. Anything less fails the whole stage.
    pub fn is_complete(&self) -> bool {
        self.caption.as_deref().is_some_and(|c| !c.is_empty())
            && self.image_data.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Names the missing required fields, for error reporting.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.caption.as_deref().is_some_and(|c| !c.is_empty()) {
            missing.push("caption");
        }
        if !self.image_data.as_deref().is_some_and(|d| !d.is_empty()) {
            missing.push("image_data");
        }
        missing
    }
}
