//! Stage completion events and user-facing notices.
//!
//! Completion of a user action or network call is delivered to the workflow
//! state machine as an explicit [`StageEvent`] carrying the stage identifier
//! and payload, rather than by mutating shared state from callbacks. Each
//! event also carries the sequence number of the request that produced it so
//! stale completions can be discarded.

use crate::campaign::CampaignOption;
use crate::video::{VideoResult, VideoScript, VideoSection};
use crate::visual::VisualConcept;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the four-step pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Campaigns,
    Visuals,
    Script,
    Video,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Campaigns => "campaigns",
            Stage::Visuals => "visuals",
            Stage::Script => "script",
            Stage::Video => "video",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data produced by a completed stage request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StagePayload {
    /// Parsed sections of the combined generation response. Sections are
    /// independent; any combination may be present.
    Campaigns {
        options: Vec<CampaignOption>,
        concepts: Vec<VisualConcept>,
        video: Option<VideoSection>,
    },
    /// Both parallel visual generations succeeded.
    Visuals { concepts: Vec<VisualConcept> },
    Script { script: VideoScript },
    Video { result: VideoResult },
}

/// A completion event fed into the workflow state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEvent {
    /// Monotonic sequence number of the request this event completes.
    pub seq: u64,
    pub stage: Stage,
    pub payload: StagePayload,
}

impl StageEvent {
    pub fn new(seq: u64, stage: Stage, payload: StagePayload) -> Self {
        Self {
            seq,
            stage,
            payload,
        }
    }
}

/// Category of a transient user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
    Warning,
}

/// A transient user-visible notification emitted by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}
