//! # madcap-gateway
//!
//! Transport adapters for the Madcap pipeline:
//! - [`HttpGateway`] — reqwest implementation of the agent service gateway
//! - [`AuthSession`] / [`StaticIdentity`] — bearer-token identity handling

pub mod auth;
pub mod http;

pub use auth::{AuthSession, StaticIdentity};
pub use http::HttpGateway;
