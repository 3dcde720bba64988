//! AI assistant for the operations dashboard.
//!
//! [`Assistant::ask`] sends the question, plus an optional incident summary
//! built by [`incident_context`], to an OpenAI-compatible chat-completions
//! endpoint. Without an API key, or when the call fails, it answers from a
//! local rule set instead ([`offline_response`]), so callers always get
//! text back.
//!
//! ```
//! use dashboard_assistant::{Assistant, AssistantConfig, incident_context};
//! use dashboard_core::{Incident, Severity};
//!
//! let incidents = vec![Incident::new("INC-1", "Phishing wave", "Phishing", Severity::High, "2024-06-01")];
//! let context = incident_context(&incidents);
//!
//! let assistant = Assistant::new(AssistantConfig::default()).unwrap();
//! let answer = assistant.ask("What should we prioritise?", Some(&context));
//! assert!(answer.contains("Prioritisation advice"));
//! ```

mod client;
mod error;
mod offline;

pub use client::{Assistant, AssistantConfig, EMPTY_MESSAGE, ERROR_PREFIX};
pub use error::{AssistantError, Result};
pub use offline::{incident_context, offline_response};
