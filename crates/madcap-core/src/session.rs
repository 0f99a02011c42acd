//! Workflow state machine for the four-stage campaign pipeline.
//!
//! A [`WorkflowSession`] owns one user's in-memory pipeline run: brief →
//! campaign options → visual concepts → script → video. Transitions happen
//! only on user actions (submit, select campaign, select concept) or on
//! completion of an outstanding network call; completions are delivered as
//! explicit [`StageEvent`]s carrying the stage identifier and payload.
//!
//! Each issued request is tagged with a monotonic sequence number, and a
//! completion older than the newest issued request is discarded instead of
//! applied, so a slow early response cannot overwrite state set by a later
//! one.

use crate::error::WorkflowError;
use crate::parser::parse_combined_response;
use crate::script::fallback_script;
use madcap_proto::{
    CONCEPT_STYLE_BOLD, CONCEPT_STYLE_LIFESTYLE, CampaignBrief, CampaignLabel, CampaignOption,
    Gateway, GatewayError, Notice, NoticeLevel, QueryRequest, ScriptRequest, SelectedCampaign,
    SelectedVisualConcept, Stage, StageEvent, StagePayload, VideoOutcome, VideoRequest,
    VideoResult, VideoScript, VideoSection, VisualConcept, VisualRequest, VisualResponse,
};
use tracing::{debug, info, warn};

/// Current position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    BriefSubmitted,
    CampaignsReady,
    CampaignSelected,
    ConceptsReady,
    ConceptSelected,
    ScriptReady,
    VideoPending,
    VideoResolved(VideoOutcome),
}

/// One user's pipeline session.
///
/// The session is passed by reference to whatever layer renders it; UI
/// actions invoke its methods directly. Earlier stages can be re-invoked
/// with previously cached data (re-selecting a different already-fetched
/// campaign re-runs only visual generation).
pub struct WorkflowSession<G> {
    gateway: Option<G>,
    state: WorkflowState,
    brief: Option<CampaignBrief>,
    campaigns: Vec<CampaignOption>,
    inline_concepts: Vec<VisualConcept>,
    inline_video: Option<VideoSection>,
    selected_campaign: Option<SelectedCampaign>,
    concepts: Vec<VisualConcept>,
    selected_concept: Option<SelectedVisualConcept>,
    script: Option<VideoScript>,
    video: Option<VideoResult>,
    notices: Vec<Notice>,
    /// Sequence number of the most recently issued request.
    seq: u64,
}

impl<G: Gateway> WorkflowSession<G> {
    /// Creates a session backed by the given gateway.
    pub fn new(gateway: G) -> Self {
        Self::with_gateway(Some(gateway))
    }

    /// Creates a session with no service configured. Submitting a brief
    /// fails with a configuration error and the machine stays idle.
    pub fn unconfigured() -> Self {
        Self::with_gateway(None)
    }

    fn with_gateway(gateway: Option<G>) -> Self {
        Self {
            gateway,
            state: WorkflowState::Idle,
            brief: None,
            campaigns: Vec::new(),
            inline_concepts: Vec::new(),
            inline_video: None,
            selected_campaign: None,
            concepts: Vec::new(),
            selected_concept: None,
            script: None,
            video: None,
            notices: Vec::new(),
            seq: 0,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn campaigns(&self) -> &[CampaignOption] {
        &self.campaigns
    }

    /// Visual concepts embedded in the combined response, if any.
    pub fn inline_concepts(&self) -> &[VisualConcept] {
        &self.inline_concepts
    }

    /// Video fragments embedded in the combined response, if any.
    pub fn inline_video(&self) -> Option<&VideoSection> {
        self.inline_video.as_ref()
    }

    pub fn selected_campaign(&self) -> Option<&SelectedCampaign> {
        self.selected_campaign.as_ref()
    }

    pub fn concepts(&self) -> &[VisualConcept] {
        &self.concepts
    }

    pub fn selected_concept(&self) -> Option<&SelectedVisualConcept> {
        self.selected_concept.as_ref()
    }

    pub fn script(&self) -> Option<&VideoScript> {
        self.script.as_ref()
    }

    pub fn video_result(&self) -> Option<&VideoResult> {
        self.video.as_ref()
    }

    /// Removes and returns the accumulated transient notifications.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Submits a brief and runs the combined campaign generation request.
    ///
    /// On success the parsed campaign options (and any other sections the
    /// response carried) become available and the machine enters
    /// `CampaignsReady`. On failure the machine returns to `Idle` with no
    /// partial state retained.
    pub async fn submit_brief(
        &mut self,
        brief: CampaignBrief,
    ) -> Result<&[CampaignOption], WorkflowError> {
        self.ensure_configured()?;

        self.reset_results();
        let seq = self.next_seq();
        let request = QueryRequest {
            query: brief.query_text(),
        };
        self.brief = Some(brief);
        self.state = WorkflowState::BriefSubmitted;
        self.notify(
            NoticeLevel::Info,
            "Starting complete marketing campaign generation...",
        );
        info!(seq, "submitting campaign brief");

        let outcome = self.gateway_ref()?.query(&request).await;
        match outcome {
            Ok(response) => {
                let parsed = parse_combined_response(&response.response);
                self.notify(
                    NoticeLevel::Success,
                    "Agent workflow complete. Processing results...",
                );
                self.apply(StageEvent::new(
                    seq,
                    Stage::Campaigns,
                    StagePayload::Campaigns {
                        options: parsed.campaigns,
                        concepts: parsed.concepts,
                        video: parsed.video,
                    },
                ));
                Ok(&self.campaigns)
            }
            Err(err) => {
                self.brief = None;
                self.state = WorkflowState::Idle;
                self.notify(
                    NoticeLevel::Error,
                    format!("Marketing workflow failed: {err}"),
                );
                Err(err.into())
            }
        }
    }

    /// Records the chosen campaign and generates both visual concepts.
    ///
    /// The two requests run concurrently with fixed, opposite style
    /// directives. The stage succeeds only when both responses are complete;
    /// either failing fails the stage as a unit, identifying which concept
    /// was at fault. Prior stage data stays intact for retry.
    pub async fn select_campaign(
        &mut self,
        label: CampaignLabel,
    ) -> Result<&[VisualConcept], WorkflowError> {
        self.ensure_configured()?;

        let option = self
            .campaigns
            .iter()
            .find(|c| c.label == label)
            .cloned()
            .ok_or_else(|| {
                WorkflowError::InvalidSelection(format!("campaign {label} is not available"))
            })?;

        let content = option.raw_text;
        self.selected_campaign = Some(SelectedCampaign {
            label,
            content: content.clone(),
        });
        self.state = WorkflowState::CampaignSelected;
        self.notify(
            NoticeLevel::Success,
            format!("Selected campaign {label}. Generating visual concepts..."),
        );

        let seq = self.next_seq();
        let request_one = VisualRequest {
            concept: CONCEPT_STYLE_LIFESTYLE.to_string(),
            campaign_content: content.clone(),
        };
        let request_two = VisualRequest {
            concept: CONCEPT_STYLE_BOLD.to_string(),
            campaign_content: content,
        };
        info!(seq, campaign = %label, "generating visual concepts");

        let gateway = self.gateway_ref()?;
        let (first, second) = tokio::join!(
            gateway.generate_visual(&request_one),
            gateway.generate_visual(&request_two),
        );

        // Evaluate concept 1 first so its failure is never masked by
        // concept 2's.
        let accepted = accept_visual(1, first).and_then(|one| {
            accept_visual(2, second).map(|two| {
                vec![
                    VisualConcept {
                        index: 1,
                        style_directive: Some(CONCEPT_STYLE_LIFESTYLE.to_string()),
                        caption: one.0,
                        image_data: one.1,
                    },
                    VisualConcept {
                        index: 2,
                        style_directive: Some(CONCEPT_STYLE_BOLD.to_string()),
                        caption: two.0,
                        image_data: two.1,
                    },
                ]
            })
        });

        match accepted {
            Ok(concepts) => {
                self.apply(StageEvent::new(
                    seq,
                    Stage::Visuals,
                    StagePayload::Visuals { concepts },
                ));
                self.notify(
                    NoticeLevel::Success,
                    "Visual concepts generated successfully.",
                );
                Ok(&self.concepts)
            }
            Err(err) => {
                self.notify(NoticeLevel::Error, format!("Visual generation failed: {err}"));
                Err(err)
            }
        }
    }

    /// Records the chosen visual concept, generates the script, then the
    /// video.
    ///
    /// Script failure does not abort the pipeline: a deterministic fallback
    /// script is synthesized and video generation proceeds with it. Every
    /// path resolves to a `VideoResolved` state; transport failures resolve
    /// as a failed result rather than an error.
    pub async fn select_visual_concept(
        &mut self,
        index: u8,
    ) -> Result<VideoOutcome, WorkflowError> {
        self.ensure_configured()?;

        let concept = self
            .concepts
            .iter()
            .find(|c| c.index == index)
            .cloned()
            .ok_or_else(|| {
                WorkflowError::InvalidSelection(format!("visual concept {index} is not available"))
            })?;
        let campaign = self.selected_campaign.clone().ok_or_else(|| {
            WorkflowError::InvalidSelection("no campaign has been selected".to_string())
        })?;
        let brief = self.brief.clone().ok_or_else(|| {
            WorkflowError::InvalidSelection("no brief has been submitted".to_string())
        })?;

        self.selected_concept = Some(SelectedVisualConcept {
            number: index,
            description: concept.caption.clone(),
            image_url: concept.image_data.clone(),
        });
        self.state = WorkflowState::ConceptSelected;
        self.notify(
            NoticeLevel::Success,
            format!("Selected visual concept {index}. Creating cinematic video script..."),
        );

        let script_seq = self.next_seq();
        let script_request = ScriptRequest {
            campaign_content: campaign.content.clone(),
            visual_concept: concept.caption.clone(),
            company_name: brief.company_name.clone(),
        };
        info!(seq = script_seq, concept = index, "generating video script");

        let script_outcome: Result<String, WorkflowError> =
            match self.gateway_ref()?.generate_script(&script_request).await {
                Ok(response) => response.script_text().map(str::to_string).ok_or_else(|| {
                    WorkflowError::ScriptGeneration("service returned an empty script".to_string())
                }),
                Err(err) => Err(WorkflowError::ScriptGeneration(err.to_string())),
            };

        let script_text = match script_outcome {
            Ok(text) => {
                self.apply(StageEvent::new(
                    script_seq,
                    Stage::Script,
                    StagePayload::Script {
                        script: VideoScript::new(text.clone()),
                    },
                ));
                self.notify(NoticeLevel::Info, "Video script ready. Generating video...");
                text
            }
            Err(err) => {
                warn!(error = %err, "continuing with synthesized fallback script");
                self.notify(
                    NoticeLevel::Warning,
                    format!("{err}; continuing with a fallback script"),
                );
                let text =
                    fallback_script(&campaign.content, &concept.caption, &brief.company_name);
                self.apply(StageEvent::new(
                    script_seq,
                    Stage::Script,
                    StagePayload::Script {
                        script: VideoScript::new(text.clone()),
                    },
                ));
                text
            }
        };

        self.state = WorkflowState::VideoPending;
        let video_seq = self.next_seq();
        let video_request = VideoRequest {
            script: script_text,
            campaign_content: campaign.content,
            visual_concept: concept.caption,
        };
        info!(seq = video_seq, "generating video");

        let result = match self.gateway_ref()?.generate_video(&video_request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "video generation request failed");
                VideoResult::from_failure(err.to_string(), "Generation Failed")
            }
        };

        let outcome = result.outcome();
        self.apply(StageEvent::new(
            video_seq,
            Stage::Video,
            StagePayload::Video { result },
        ));

        match outcome {
            VideoOutcome::Success => {
                self.notify(NoticeLevel::Success, "Video generated successfully.");
            }
            VideoOutcome::Timeout => {
                self.notify(
                    NoticeLevel::Warning,
                    "Video generation timed out but may still be processing in the background.",
                );
            }
            VideoOutcome::Failed => {
                let message = match &self.video {
                    Some(result) => format!("Video generation failed: {}", result.error_text()),
                    None => "Video generation failed".to_string(),
                };
                self.notify(NoticeLevel::Error, message);
            }
        }

        Ok(outcome)
    }

    /// Applies a stage completion event.
    ///
    /// Returns `false` when the event is stale — produced by a request older
    /// than the most recently issued one — in which case state is unchanged.
    pub fn apply(&mut self, event: StageEvent) -> bool {
        if event.seq < self.seq {
            debug!(
                seq = event.seq,
                latest = self.seq,
                stage = %event.stage,
                "discarding stale stage completion"
            );
            return false;
        }

        match event.payload {
            StagePayload::Campaigns {
                options,
                concepts,
                video,
            } => {
                info!(
                    campaigns = options.len(),
                    inline_concepts = concepts.len(),
                    has_video_section = video.is_some(),
                    "combined response processed"
                );
                self.campaigns = options;
                self.inline_concepts = concepts;
                self.inline_video = video;
                self.state = WorkflowState::CampaignsReady;
            }
            StagePayload::Visuals { concepts } => {
                self.concepts = concepts;
                self.state = WorkflowState::ConceptsReady;
            }
            StagePayload::Script { script } => {
                self.script = Some(script);
                self.state = WorkflowState::ScriptReady;
            }
            StagePayload::Video { result } => {
                let outcome = result.outcome();
                self.video = Some(result);
                self.state = WorkflowState::VideoResolved(outcome);
            }
        }
        true
    }

    fn ensure_configured(&mut self) -> Result<(), WorkflowError> {
        if self.gateway.is_some() {
            return Ok(());
        }
        self.notify(
            NoticeLevel::Error,
            "Configuration error: the service URL is not available.",
        );
        Err(WorkflowError::Configuration(
            "service URL is not available".to_string(),
        ))
    }

    fn gateway_ref(&self) -> Result<&G, WorkflowError> {
        self.gateway.as_ref().ok_or_else(|| {
            WorkflowError::Configuration("service URL is not available".to_string())
        })
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }

    fn reset_results(&mut self) {
        self.campaigns.clear();
        self.inline_concepts.clear();
        self.inline_video = None;
        self.selected_campaign = None;
        self.concepts.clear();
        self.selected_concept = None;
        self.script = None;
        self.video = None;
    }
}

/// Validates one of the two parallel visual responses, naming the concept
/// and the missing fields on failure.
fn accept_visual(
    concept: u8,
    result: Result<VisualResponse, GatewayError>,
) -> Result<(String, String), WorkflowError> {
    let response = result.map_err(|err| WorkflowError::VisualGeneration {
        concept,
        reason: err.to_string(),
    })?;

    let missing = response.missing_fields();
    match (response.caption, response.image_data) {
        (Some(caption), Some(image_data)) if missing.is_empty() => Ok((caption, image_data)),
        _ => Err(WorkflowError::VisualGeneration {
            concept,
            reason: format!("response missing {}", missing.join(" and ")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGateway, RecordedRequest};
    use madcap_proto::{QueryResponse, ScriptResponse};

    const COMBINED: &str = "🚀 **CAMPAIGN A: Morning Momentum**\n\
💡 **The Big Idea:** Own the first hour of the day.\n\
⚡ **Bottom Line:** Be the ritual.\n\n\
🚀 **CAMPAIGN B: Night Shift**\n\
💡 **The Big Idea:** Win the wind-down.\n\
⚡ **Bottom Line:** Calm is the new loud.\n";

    fn brief() -> CampaignBrief {
        CampaignBrief::new("Acme", "acme.com", "grow signups")
    }

    fn visual_ok(caption: &str) -> VisualResponse {
        VisualResponse {
            caption: Some(caption.to_string()),
            image_data: Some(format!("data:image/png;base64,{caption}")),
            ..VisualResponse::default()
        }
    }

    fn video_success() -> VideoResult {
        VideoResult {
            success: true,
            status: Some("completed".into()),
            video_url: Some("https://storage.googleapis.com/renders/out.mp4".into()),
            ..VideoResult::default()
        }
    }

    async fn session_with_campaigns(mock: &MockGateway) -> WorkflowSession<MockGateway> {
        mock.script_query(Ok(QueryResponse {
            response: COMBINED.to_string(),
        }));
        let mut session = WorkflowSession::new(mock.clone());
        session.submit_brief(brief()).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_unconfigured_submit_fails_and_stays_idle() {
        let mut session = WorkflowSession::<MockGateway>::unconfigured();
        let err = session.submit_brief(brief()).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Configuration(_)));
        assert_eq!(session.state(), WorkflowState::Idle);
        let notices = session.drain_notices();
        assert!(notices.iter().any(|n| n.level == NoticeLevel::Error));
    }

    #[tokio::test]
    async fn test_submit_brief_parses_campaigns() {
        let mock = MockGateway::new();
        let session = session_with_campaigns(&mock).await;

        assert_eq!(session.state(), WorkflowState::CampaignsReady);
        assert_eq!(session.campaigns().len(), 2);
        assert_eq!(session.campaigns()[0].label, CampaignLabel::A);
        assert_eq!(session.campaigns()[1].label, CampaignLabel::B);

        let requests = mock.requests();
        assert!(
            matches!(&requests[0], RecordedRequest::Query(q) if q.query.contains("Company: Acme"))
        );
    }

    #[tokio::test]
    async fn test_submit_brief_failure_returns_to_idle() {
        let mock = MockGateway::new();
        mock.script_query(Err(GatewayError::Http {
            status: 500,
            body: "boom".into(),
        }));
        let mut session = WorkflowSession::new(mock);

        let err = session.submit_brief(brief()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Gateway(GatewayError::Http { status: 500, .. })));
        assert_eq!(session.state(), WorkflowState::Idle);
        assert!(session.campaigns().is_empty());
    }

    #[tokio::test]
    async fn test_select_campaign_generates_both_concepts() {
        let mock = MockGateway::new();
        let mut session = session_with_campaigns(&mock).await;
        mock.script_visual(1, Ok(visual_ok("warm lifestyle shot")));
        mock.script_visual(2, Ok(visual_ok("bold graphic shot")));

        let concepts = session.select_campaign(CampaignLabel::A).await.unwrap();
        assert_eq!(concepts.len(), 2);
        assert_eq!(concepts[0].index, 1);
        assert_eq!(concepts[0].caption, "warm lifestyle shot");
        assert_eq!(
            concepts[0].style_directive.as_deref(),
            Some(CONCEPT_STYLE_LIFESTYLE)
        );
        assert_eq!(session.state(), WorkflowState::ConceptsReady);
        assert_eq!(
            session.selected_campaign().unwrap().label,
            CampaignLabel::A
        );

        // Both requests carried the selected campaign's raw block.
        let visuals: Vec<_> = mock
            .requests()
            .into_iter()
            .filter_map(|r| match r {
                RecordedRequest::Visual(v) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(visuals.len(), 2);
        assert!(visuals.iter().all(|v| v.campaign_content.contains("Morning Momentum")));
    }

    #[tokio::test]
    async fn test_select_campaign_fails_when_concept_two_incomplete() {
        let mock = MockGateway::new();
        let mut session = session_with_campaigns(&mock).await;
        mock.script_visual(1, Ok(visual_ok("fine")));
        mock.script_visual(
            2,
            Ok(VisualResponse {
                caption: Some("caption without image".into()),
                ..VisualResponse::default()
            }),
        );

        let err = session.select_campaign(CampaignLabel::A).await.unwrap_err();
        match err {
            WorkflowError::VisualGeneration { concept, reason } => {
                assert_eq!(concept, 2);
                assert!(reason.contains("image_data"));
            }
            other => panic!("expected VisualGeneration, got {other:?}"),
        }
        assert_eq!(session.state(), WorkflowState::CampaignSelected);
        assert!(session.concepts().is_empty());
    }

    #[tokio::test]
    async fn test_both_visual_failures_report_concept_one_first() {
        let mock = MockGateway::new();
        let mut session = session_with_campaigns(&mock).await;
        mock.script_visual(1, Err(GatewayError::Network("refused".into())));
        mock.script_visual(2, Err(GatewayError::Network("refused".into())));

        let err = session.select_campaign(CampaignLabel::B).await.unwrap_err();
        assert!(matches!(err, WorkflowError::VisualGeneration { concept: 1, .. }));
    }

    #[tokio::test]
    async fn test_select_campaign_unknown_label() {
        let mock = MockGateway::new();
        mock.script_query(Ok(QueryResponse {
            response: "no campaign markers here".into(),
        }));
        let mut session = WorkflowSession::new(mock);
        session.submit_brief(brief()).await.unwrap();

        let err = session.select_campaign(CampaignLabel::A).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidSelection(_)));
    }

    async fn session_with_concepts(mock: &MockGateway) -> WorkflowSession<MockGateway> {
        let mut session = session_with_campaigns(mock).await;
        mock.script_visual(1, Ok(visual_ok("lifestyle")));
        mock.script_visual(2, Ok(visual_ok("bold")));
        session.select_campaign(CampaignLabel::A).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_full_pipeline_resolves_success() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;
        mock.script_script(Ok(ScriptResponse {
            success: Some(true),
            script: Some("Open on a sunrise over the bay.".into()),
            message: None,
        }));
        mock.script_video(Ok(video_success()));

        let outcome = session.select_visual_concept(1).await.unwrap();
        assert_eq!(outcome, VideoOutcome::Success);
        assert_eq!(
            session.state(),
            WorkflowState::VideoResolved(VideoOutcome::Success)
        );
        assert_eq!(
            session.script().unwrap().text,
            "Open on a sunrise over the bay."
        );
        assert_eq!(
            session.video_result().unwrap().video_url.as_deref(),
            Some("https://storage.googleapis.com/renders/out.mp4")
        );

        // The generated script was the one sent to video generation.
        let video_request = mock
            .requests()
            .into_iter()
            .find_map(|r| match r {
                RecordedRequest::Video(v) => Some(v),
                _ => None,
            })
            .unwrap();
        assert_eq!(video_request.script, "Open on a sunrise over the bay.");
    }

    #[tokio::test]
    async fn test_script_failure_falls_back_and_still_generates_video() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;
        mock.script_script(Err(GatewayError::Http {
            status: 503,
            body: "script writer down".into(),
        }));
        mock.script_video(Ok(video_success()));

        let outcome = session.select_visual_concept(1).await.unwrap();
        assert_eq!(outcome, VideoOutcome::Success);

        let video_request = mock
            .requests()
            .into_iter()
            .find_map(|r| match r {
                RecordedRequest::Video(v) => Some(v),
                _ => None,
            })
            .unwrap();
        let expected = fallback_script(
            &session.selected_campaign().unwrap().content,
            "lifestyle",
            "Acme",
        );
        assert_eq!(video_request.script, expected);

        // Campaign content, concept description, company name, in order.
        let campaign_at = video_request.script.find("Morning Momentum").unwrap();
        let concept_at = video_request.script.find("lifestyle").unwrap();
        let company_at = video_request.script.find("Acme").unwrap();
        assert!(campaign_at < concept_at && concept_at < company_at);

        let notices = session.drain_notices();
        assert!(notices.iter().any(|n| n.level == NoticeLevel::Warning));
    }

    #[tokio::test]
    async fn test_empty_script_response_triggers_fallback() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;
        mock.script_script(Ok(ScriptResponse {
            success: Some(true),
            script: Some("   ".into()),
            message: None,
        }));
        mock.script_video(Ok(video_success()));

        session.select_visual_concept(2).await.unwrap();
        assert!(session.script().unwrap().text.contains("Visual concept: bold"));
    }

    #[tokio::test]
    async fn test_video_timeout_resolves_timeout() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;
        mock.script_script(Ok(ScriptResponse {
            success: Some(true),
            script: Some("script".into()),
            message: None,
        }));
        mock.script_video(Ok(VideoResult {
            success: false,
            status: Some("timeout".into()),
            operation_name: Some("operations/abc".into()),
            ..VideoResult::default()
        }));

        let outcome = session.select_visual_concept(1).await.unwrap();
        assert_eq!(outcome, VideoOutcome::Timeout);
        assert_eq!(
            session.state(),
            WorkflowState::VideoResolved(VideoOutcome::Timeout)
        );
        let notices = session.drain_notices();
        assert!(notices.iter().any(|n| n.level == NoticeLevel::Warning));
    }

    #[tokio::test]
    async fn test_video_transport_failure_resolves_failed() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;
        mock.script_script(Ok(ScriptResponse {
            success: Some(true),
            script: Some("script".into()),
            message: None,
        }));
        // No scripted video response: the call errors at transport level.

        let outcome = session.select_visual_concept(1).await.unwrap();
        assert_eq!(outcome, VideoOutcome::Failed);

        let result = session.video_result().unwrap();
        assert_eq!(result.error_type_text(), "Generation Failed");
        assert_eq!(
            session.state(),
            WorkflowState::VideoResolved(VideoOutcome::Failed)
        );
    }

    #[tokio::test]
    async fn test_failed_video_defaults_error_fields() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;
        mock.script_script(Ok(ScriptResponse {
            success: Some(true),
            script: Some("script".into()),
            message: None,
        }));
        mock.script_video(Ok(VideoResult {
            success: false,
            ..VideoResult::default()
        }));

        session.select_visual_concept(1).await.unwrap();
        let result = session.video_result().unwrap();
        assert_eq!(result.error_text(), "Unknown error");
        assert_eq!(result.error_type_text(), "Unknown");
    }

    #[tokio::test]
    async fn test_reselecting_campaign_reuses_cached_options() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;

        mock.script_visual(1, Ok(visual_ok("new lifestyle")));
        mock.script_visual(2, Ok(visual_ok("new bold")));
        session.select_campaign(CampaignLabel::B).await.unwrap();

        assert_eq!(session.selected_campaign().unwrap().label, CampaignLabel::B);
        assert_eq!(session.concepts()[0].caption, "new lifestyle");

        // Only the initial combined query hit the service.
        let query_count = mock
            .requests()
            .iter()
            .filter(|r| matches!(r, RecordedRequest::Query(_)))
            .count();
        assert_eq!(query_count, 1);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let mock = MockGateway::new();
        let mut session = session_with_campaigns(&mock).await;

        let applied = session.apply(StageEvent::new(
            0,
            Stage::Visuals,
            StagePayload::Visuals {
                concepts: vec![VisualConcept {
                    index: 1,
                    style_directive: None,
                    caption: "stale".into(),
                    image_data: "stale".into(),
                }],
            },
        ));

        assert!(!applied);
        assert_eq!(session.state(), WorkflowState::CampaignsReady);
        assert!(session.concepts().is_empty());
    }

    #[tokio::test]
    async fn test_resubmitting_brief_clears_prior_results() {
        let mock = MockGateway::new();
        let mut session = session_with_concepts(&mock).await;

        mock.script_query(Ok(QueryResponse {
            response: COMBINED.to_string(),
        }));
        session.submit_brief(brief()).await.unwrap();

        assert!(session.concepts().is_empty());
        assert!(session.selected_campaign().is_none());
        assert_eq!(session.state(), WorkflowState::CampaignsReady);
    }
}
