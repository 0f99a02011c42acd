//! Script and video generation wire contracts and outcome classification.

use serde::{Deserialize, Serialize};

/// A video script, generated or synthesized as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoScript {
    pub text: String,
}

impl VideoScript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Request body for `POST /generate-script`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub campaign_content: String,
    pub visual_concept: String,
    pub company_name: String,
}

/// Response body for `POST /generate-script`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ScriptResponse {
    /// The usable script text, if the service produced one.
    pub fn script_text(&self) -> Option<&str> {
        self.script.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Request body for `POST /generate-video-direct`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    pub script: String,
    pub campaign_content: String,
    pub visual_concept: String,
}

/// Feature summary the video service reports alongside a completed render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFeatures {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Response body for `POST /generate-video-direct`. Terminal entity of the
/// pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub features: Option<VideoFeatures>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub video_count: Option<u32>,
}

/// Resolved classification of a video generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoOutcome {
    /// The service returned a playable video URL.
    Success,
    /// The service gave up waiting, but the render may still complete out of
    /// band. Must not be presented as a final failure.
    Timeout,
    Failed,
}

impl VideoResult {
    /// Classifies the result into its resolved outcome.
    pub fn outcome(&self) -> VideoOutcome {
        if self.success && self.video_url.as_deref().is_some_and(|u| !u.is_empty()) {
            VideoOutcome::Success
        } else if self.status.as_deref() == Some("timeout") {
            VideoOutcome::Timeout
        } else {
            VideoOutcome::Failed
        }
    }

    /// Error message for display, defaulting when the service sent none.
    pub fn error_text(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("Unknown error")
    }

    /// Error type for display, defaulting when the service sent none.
    pub fn error_type_text(&self) -> &str {
        self.error_type.as_deref().unwrap_or("Unknown")
    }

    /// Synthesizes a failed result from a local (transport-level) error, so
    /// the pipeline always resolves to a renderable state.
    pub fn from_failure(error: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            success: false,
            status: Some("error".to_string()),
            error: Some(error.into()),
            error_type: Some(error_type.into()),
            ..Self::default()
        }
    }
}

/// Video-related fragments parsed out of the combined free-text response.
///
/// All fields are independently optional; this exists before a final
/// [`VideoResult`] is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSection {
    /// Script block, from either the script or script-used label.
    pub script: Option<String>,
    /// Server-side operation identifier line.
    pub operation: Option<String>,
    /// Free-text status block.
    pub status: Option<String>,
    /// Direct link to the rendered video, when present.
    pub video_url: Option<String>,
}

/// Presentation-facing tone for an in-flight status block.
///
/// Secondary to [`VideoOutcome`]: it only controls how a status is styled
/// before a final resolved state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Error,
    InProgress,
}

impl VideoSection {
    pub fn is_empty(&self) -> bool {
        self.script.is_none()
            && self.operation.is_none()
            && self.status.is_none()
            && self.video_url.is_none()
    }

    /// Classifies the status block, if one is present.
    pub fn status_tone(&self) -> Option<StatusTone> {
        self.status.as_deref().map(classify_status)
    }
}

/// Status text containing "failed" or "error" (case-insensitive, substring)
/// gets the error tone; everything else reads as in-progress.
pub fn classify_status(status: &str) -> StatusTone {
    let lower = status.to_lowercase();
    if lower.contains("failed") || lower.contains("error") {
        StatusTone::Error
    } else {
        StatusTone::InProgress
    }
}
