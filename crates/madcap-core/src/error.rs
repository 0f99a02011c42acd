use madcap_proto::GatewayError;
use thiserror::Error;

/// Stage-level workflow failures.
///
/// Script generation failure is deliberately absent from the surfaced set in
/// the happy path: it is recovered locally with a fallback script and only
/// reported as a warning notice.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No service URL is available; the machine stays idle.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport, HTTP, or auth failure reported by the gateway.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// One of the two parallel visual generations failed or returned
    /// incomplete data. Identifies which.
    #[error("visual concept {concept} generation failed: {reason}")]
    VisualGeneration { concept: u8, reason: String },

    /// Script generation failed; carried internally to trigger the fallback.
    #[error("script generation failed: {0}")]
    ScriptGeneration(String),

    /// Video generation resolved as failed, with server-provided detail.
    #[error("video generation failed: {error} ({error_type})")]
    VideoGeneration { error: String, error_type: String },

    /// The requested campaign label or concept index is not in cached state,
    /// or the stage it belongs to has not been reached.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}
