//! Blocking HTTP transport for the analysis service.
//!
//! One multipart POST per submission. The caller (the UI controller) runs
//! this on a worker thread, so blocking here keeps the UI thread free.

use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use comply_protocol::parse_report;
use comply_protocol::AnalysisReport;

use crate::{Analyzer, ClientError, EndpointConfig, SubmissionPayload};

/// HTTP client for the compliance analysis endpoint.
pub struct ComplianceClient {
    http: Client,
    config: EndpointConfig,
}

impl ComplianceClient {
    /// Build a client for the given endpoint. The timeout covers the whole
    /// request, upload included.
    pub fn new(config: EndpointConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Init)?;

        debug!(url = %config.url(), variant = ?config.variant, "compliance client ready");
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Assemble the multipart body: text fields always, file parts only
    /// when an attachment is actually present, checks encoded per the
    /// configured contract variant.
    fn build_form(&self, payload: &SubmissionPayload) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("model_name", payload.model_name.clone())
            .text("model_description", payload.model_description.clone());

        if let Some(path) = &payload.model_file {
            form = form
                .file("model_file", path)
                .map_err(|source| ClientError::Attachment {
                    path: path.clone(),
                    source,
                })?;
        }

        if let Some(path) = &payload.dataset_file {
            form = form
                .file("dataset_file", path)
                .map_err(|source| ClientError::Attachment {
                    path: path.clone(),
                    source,
                })?;
        }

        let encoding = self.config.variant.checks_encoding();
        for (name, value) in encoding.fields(&payload.checks) {
            form = form.text(name, value);
        }

        Ok(form)
    }
}

impl Analyzer for ComplianceClient {
    fn analyze(&self, payload: &SubmissionPayload) -> Result<AnalysisReport, ClientError> {
        let url = self.config.url();
        info!(
            submission_id = %payload.submission_id,
            url = %url,
            checks = payload.checks.len(),
            has_model_file = payload.model_file.is_some(),
            has_dataset_file = payload.dataset_file.is_some(),
            "submitting model for analysis"
        );

        let form = self.build_form(payload)?;
        let response = self.http.post(&url).multipart(form).send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                submission_id = %payload.submission_id,
                status = status.as_u16(),
                "analysis service rejected the submission"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let report = parse_report(&body)?;

        info!(
            submission_id = %payload.submission_id,
            score = report.score.value(),
            suggestions = report.suggestions.len(),
            "analysis complete"
        );
        Ok(report)
    }
}
