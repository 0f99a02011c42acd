//! # madcap-proto
//!
//! Shared types, error definitions, and traits for the Madcap campaign pipeline.
//!
//! This crate provides the foundational abstractions used across all Madcap crates,
//! including:
//! - Domain entities for each pipeline stage (brief, campaigns, visuals, video)
//! - Wire request/response types for the remote agent service
//! - The [`Gateway`] and [`IdentityProvider`] seams implemented by adapters
//! - Stage completion events and user-facing notices

pub mod brief;
pub mod campaign;
pub mod event;
pub mod gateway;
pub mod identity;
pub mod video;
pub mod visual;

pub use brief::CampaignBrief;
pub use campaign::{CampaignFields, CampaignLabel, CampaignOption, SelectedCampaign};
pub use event::{Notice, NoticeLevel, Stage, StageEvent, StagePayload};
pub use gateway::{Gateway, GatewayError, QueryRequest, QueryResponse};
pub use identity::{IdentityProvider, UserIdentity};
pub use video::{
    ScriptRequest, ScriptResponse, StatusTone, VideoFeatures, VideoOutcome, VideoRequest,
    VideoResult, VideoScript, VideoSection,
};
pub use visual::{
    CONCEPT_STYLE_BOLD, CONCEPT_STYLE_LIFESTYLE, SelectedVisualConcept, VisualConcept,
    VisualRequest, VisualResponse,
};
