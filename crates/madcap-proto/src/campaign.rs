//! Campaign options produced from the combined generation response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two generated campaigns an option is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignLabel {
    A,
    B,
}

impl CampaignLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignLabel::A => "A",
            CampaignLabel::B => "B",
        }
    }
}

impl fmt::Display for CampaignLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields extracted from a campaign block.
///
/// Every field is optional: extraction degrades per-field, and a fully
/// unstructured block falls back to raw text rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFields {
    pub name: Option<String>,
    pub big_idea: Option<String>,
    pub target_impact: Option<String>,
    pub why_it_works: Option<String>,
    pub bottom_line: Option<String>,
}

impl CampaignFields {
    /// True when none of the four labeled sub-fields extracted.
    ///
    /// The campaign name alone does not count as structure; rendering falls
    /// back to the raw block in that case.
    pub fn is_empty(&self) -> bool {
        self.big_idea.is_none()
            && self.target_impact.is_none()
            && self.why_it_works.is_none()
            && self.bottom_line.is_none()
    }
}

/// One of the two campaign proposals parsed from the combined response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignOption {
    pub label: CampaignLabel,
    /// The full matched block, markers included. Carried forward verbatim
    /// as context for the later stages.
    pub raw_text: String,
    pub fields: CampaignFields,
}

impl CampaignOption {
    /// Raw block with `**` emphasis markup stripped, for fallback rendering
    /// when no structured fields extracted. Content is never dropped.
    pub fn fallback_text(&self) -> String {
        self.raw_text.replace("**", "")
    }

    /// Whether structured rendering is possible for this option.
    pub fn is_structured(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// The campaign the user chose, carried forward as context for the visual,
/// script, and video stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCampaign {
    pub label: CampaignLabel,
    pub content: String,
}
