//! The remote agent service seam.
//!
//! Defines the [`Gateway`] trait that transport adapters implement. The
//! workflow state machine drives the pipeline exclusively through this trait,
//! so transports (HTTP, mocks) stay swappable and the core stays free of
//! network dependencies.

use crate::video::{ScriptRequest, ScriptResponse, VideoRequest, VideoResult};
use crate::visual::{VisualRequest, VisualResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body for `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Response body for `POST /query`: one free-text blob containing any
/// combination of marked sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

/// Transport-agnostic gateway failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not authenticated: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// The remote agent service performing the actual generation work.
///
/// Each method maps to one service endpoint; request and response field
/// names are part of the compatibility contract.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `POST /query` — the combined campaign generation request.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse>;

    /// `POST /generate-visual` — one visual concept for one style directive.
    async fn generate_visual(&self, request: &VisualRequest) -> Result<VisualResponse>;

    /// `POST /generate-script` — a video script seeded with campaign,
    /// concept, and company name.
    async fn generate_script(&self, request: &ScriptRequest) -> Result<ScriptResponse>;

    /// `POST /generate-video-direct` — kicks off and awaits video rendering.
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoResult>;
}
