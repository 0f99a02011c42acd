//! Service configuration resolution.
//!
//! The service URL resolves in priority order: explicit value, then the
//! `MADCAP_SERVICE_URL` environment variable, then the YAML config file.
//! When none of those yield a URL, callers may fall back to the hostname
//! mapping the deployed frontend used (localhost → local dev service,
//! anything else → production).

use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Local development service, matching the Docker default port.
pub const LOCAL_SERVICE_URL: &str = "http://localhost:8080";

/// Deployed production service.
pub const PRODUCTION_SERVICE_URL: &str =
    "https://adk-marketing-platform-661519955445.us-central1.run.app";

const SERVICE_URL_ENV: &str = "MADCAP_SERVICE_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the remote agent service. `None` means unconfigured;
    /// submitting a brief then fails with a configuration error.
    pub service_url: Option<String>,
}

impl ServiceConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            service_url: Some(url.into()),
        }
    }

    /// Loads from the environment, after attempting to read a `.env` file.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            service_url: env::var(SERVICE_URL_ENV).ok().filter(|v| !v.is_empty()),
        }
    }

    /// Loads from a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, WorkflowError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WorkflowError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&raw).map_err(|e| {
            WorkflowError::Configuration(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Resolves with the full priority chain: explicit > env > file.
    ///
    /// A missing file is only an error when it was explicitly requested.
    pub fn resolve(
        explicit: Option<String>,
        file: Option<&Path>,
    ) -> Result<Self, WorkflowError> {
        if let Some(url) = explicit.filter(|u| !u.is_empty()) {
            return Ok(Self::with_url(url));
        }

        let from_env = Self::from_env();
        if from_env.service_url.is_some() {
            return Ok(from_env);
        }

        match file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The environment-detection fallback retained from the original
    /// deployment: local hostnames map to the local development service,
    /// anything else to production.
    pub fn default_url_for_host(hostname: &str) -> &'static str {
        if hostname == "localhost" || hostname == "127.0.0.1" {
            LOCAL_SERVICE_URL
        } else {
            PRODUCTION_SERVICE_URL
        }
    }

    /// The configured URL, or the hostname fallback when unconfigured.
    pub fn url_or_host_default(&self, hostname: &str) -> String {
        self.service_url
            .clone()
            .unwrap_or_else(|| Self::default_url_for_host(hostname).to_string())
    }
}
