//! reqwest implementation of the agent service gateway.

use crate::auth::AuthSession;
use async_trait::async_trait;
use madcap_core::ServiceConfig;
use madcap_proto::{
    Gateway, GatewayError, QueryRequest, QueryResponse, ScriptRequest, ScriptResponse,
    VideoRequest, VideoResult, VisualRequest, VisualResponse,
};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Script and video generation can take several minutes server-side; the
/// client waits rather than enforcing its own deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// HTTP gateway to the remote agent service.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    auth: Option<AuthSession>,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth.is_some())
            .finish()
    }
}

impl HttpGateway {
    /// Creates a gateway from resolved configuration.
    ///
    /// Fails when no service URL is configured.
    pub fn new(config: &ServiceConfig) -> Result<Self, GatewayError> {
        let base_url = config
            .service_url
            .clone()
            .ok_or_else(|| GatewayError::Config("service URL is not available".to_string()))?;
        Self::with_base_url(base_url)
    }

    /// Creates a gateway for an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            auth: None,
        })
    }

    /// Attaches an auth session; subsequent requests carry its bearer token.
    pub fn with_auth(mut self, auth: AuthSession) -> Self {
        self.auth = Some(auth);
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, GatewayError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%url, "posting request");

        let mut builder = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .header("content-type", "application/json");
        if let Some(auth) = &self.auth {
            builder = builder.headers(auth.auth_headers()?);
        }

        let response = builder
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http { status, body });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, GatewayError> {
        info!("running combined campaign generation");
        self.post("/query", request).await
    }

    async fn generate_visual(
        &self,
        request: &VisualRequest,
    ) -> Result<VisualResponse, GatewayError> {
        info!("generating visual concept");
        self.post("/generate-visual", request).await
    }

    async fn generate_script(
        &self,
        request: &ScriptRequest,
    ) -> Result<ScriptResponse, GatewayError> {
        info!(company = %request.company_name, "generating video script");
        self.post("/generate-script", request).await
    }

    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoResult, GatewayError> {
        info!("generating video");
        self.post("/generate-video-direct", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_service_url() {
        let err = HttpGateway::new(&ServiceConfig::default()).unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let gateway = HttpGateway::with_base_url("http://localhost:8080").unwrap();
        assert_eq!(gateway.endpoint("/query"), "http://localhost:8080/query");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let gateway = HttpGateway::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(
            gateway.endpoint("/generate-visual"),
            "http://localhost:8080/generate-visual"
        );
    }

    #[test]
    fn test_configured_gateway_from_config() {
        let config = ServiceConfig::with_url("https://service.example.com");
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(
            gateway.endpoint("/generate-video-direct"),
            "https://service.example.com/generate-video-direct"
        );
    }
}
