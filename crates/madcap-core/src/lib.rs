//! # madcap-core
//!
//! Core pipeline functionality for the Madcap campaign client.
//!
//! This crate provides:
//! - The workflow state machine sequencing the four pipeline stages
//! - The response parser for the combined free-text generation response
//! - Service configuration resolution
//! - The workflow error taxonomy
//! - A scripted mock gateway for deterministic testing

mod config;
mod error;
mod parser;
mod script;
mod session;
pub mod testing;

pub use config::ServiceConfig;
pub use error::WorkflowError;
pub use parser::{ParsedResponse, parse_combined_response};
pub use script::fallback_script;
pub use session::{WorkflowSession, WorkflowState};
