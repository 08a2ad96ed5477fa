//! comply-client: submission payload + HTTP transport for the model
//! compliance checker.
//!
//! The UI never talks to reqwest directly; it goes through the [`Analyzer`]
//! trait so tests can stand in a stub backend.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use comply_protocol::{AnalysisReport, AuditCheck, ContractVariant, ReportError};

pub mod http;

pub use http::ComplianceClient;

/// Default backend location (the service runs next to the client).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Everything one submission carries: the form text fields, the optional
/// attachments, and the checks the user opted into (in selection order).
/// Lives for exactly one submit/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Correlation id for logs; never sent to the backend.
    pub submission_id: Uuid,
    pub model_name: String,
    pub model_description: String,
    pub model_file: Option<PathBuf>,
    pub dataset_file: Option<PathBuf>,
    pub checks: Vec<AuditCheck>,
}

impl SubmissionPayload {
    pub fn new(model_name: impl Into<String>, model_description: impl Into<String>) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            model_name: model_name.into(),
            model_description: model_description.into(),
            model_file: None,
            dataset_file: None,
            checks: vec![],
        }
    }
}

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    pub variant: ContractVariant,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            variant: ContractVariant::default(),
            timeout_secs: 60,
        }
    }
}

impl EndpointConfig {
    /// Full request URL for this configuration.
    pub fn url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.variant.path()
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The seam between the UI and the network. One call per submission,
/// blocking until the backend answers or fails.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, payload: &SubmissionPayload) -> Result<AnalysisReport, ClientError>;
}

/// Everything that can go wrong between "submit" and "report rendered".
/// The UI collapses all of these into a single alert, as the contract
/// demands; the variants exist so logs and tests can tell them apart.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Init(#[source] reqwest::Error),

    #[error("could not reach the analysis service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analysis service returned HTTP {status}")]
    Status { status: u16 },

    #[error("could not read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Malformed(#[from] ReportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_local_analyze() {
        let config = EndpointConfig::default();
        assert_eq!(config.url(), "http://127.0.0.1:8000/analyze");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let config = EndpointConfig {
            base_url: "http://localhost:9000/".into(),
            variant: ContractVariant::Check,
            ..EndpointConfig::default()
        };
        assert_eq!(config.url(), "http://localhost:9000/check");
    }

    #[test]
    fn test_new_payload_is_empty() {
        let payload = SubmissionPayload::new("resnet", "image classifier");
        assert_eq!(payload.model_name, "resnet");
        assert!(payload.model_file.is_none());
        assert!(payload.dataset_file.is_none());
        assert!(payload.checks.is_empty());
    }

    #[test]
    fn test_payload_roundtrip() {
        let mut payload = SubmissionPayload::new("gpt-mini", "small language model");
        payload.checks = vec![AuditCheck::BiasCheck, AuditCheck::PrivacyScan];
        payload.model_file = Some(PathBuf::from("model.onnx"));

        let json = serde_json::to_string(&payload).unwrap();
        let back: SubmissionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
