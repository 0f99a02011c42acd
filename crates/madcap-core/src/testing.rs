//! Scripted mock gateway for deterministic testing.

use async_trait::async_trait;
use madcap_proto::{
    Gateway, GatewayError, QueryRequest, QueryResponse, ScriptRequest, ScriptResponse,
    VideoRequest, VideoResult, VisualRequest, VisualResponse,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type GatewayResult<T> = Result<T, GatewayError>;

/// Record of one request the mock received.
#[derive(Debug, Clone)]
pub enum RecordedRequest {
    Query(QueryRequest),
    Visual(VisualRequest),
    Script(ScriptRequest),
    Video(VideoRequest),
}

#[derive(Default)]
struct MockState {
    query_responses: VecDeque<GatewayResult<QueryResponse>>,
    /// Responses for the two parallel visual requests, keyed by the leading
    /// concept number of the style directive so scripting stays independent
    /// of poll order.
    visual_responses: [Option<GatewayResult<VisualResponse>>; 2],
    script_responses: VecDeque<GatewayResult<ScriptResponse>>,
    video_responses: VecDeque<GatewayResult<VideoResult>>,
    requests: Vec<RecordedRequest>,
}

/// Mock gateway that returns pre-scripted responses and records every
/// request it receives.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_query(&self, result: GatewayResult<QueryResponse>) {
        self.state.lock().unwrap().query_responses.push_back(result);
    }

    /// Scripts the response for the visual request whose style directive
    /// starts with the given concept number (1 or 2).
    pub fn script_visual(&self, concept: u8, result: GatewayResult<VisualResponse>) {
        let slot = usize::from(concept.saturating_sub(1)).min(1);
        self.state.lock().unwrap().visual_responses[slot] = Some(result);
    }

    pub fn script_script(&self, result: GatewayResult<ScriptResponse>) {
        self.state.lock().unwrap().script_responses.push_back(result);
    }

    pub fn script_video(&self, result: GatewayResult<VideoResult>) {
        self.state.lock().unwrap().video_responses.push_back(result);
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    fn unscripted(endpoint: &str) -> GatewayError {
        GatewayError::Network(format!("no scripted response for {endpoint}"))
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn query(&self, request: &QueryRequest) -> GatewayResult<QueryResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Query(request.clone()));
        state
            .query_responses
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("/query")))
    }

    async fn generate_visual(&self, request: &VisualRequest) -> GatewayResult<VisualResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Visual(request.clone()));
        let slot = usize::from(!request.concept.starts_with('1'));
        state.visual_responses[slot]
            .take()
            .unwrap_or_else(|| Err(Self::unscripted("/generate-visual")))
    }

    async fn generate_script(&self, request: &ScriptRequest) -> GatewayResult<ScriptResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Script(request.clone()));
        state
            .script_responses
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("/generate-script")))
    }

    async fn generate_video(&self, request: &VideoRequest) -> GatewayResult<VideoResult> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest::Video(request.clone()));
        state
            .video_responses
            .pop_front()
            .unwrap_or_else(|| Err(Self::unscripted("/generate-video-direct")))
    }
}
