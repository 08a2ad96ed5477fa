// Form-submit controller: owns the submit state machine and the worker
// thread that carries the blocking HTTP call off the UI thread.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use comply_client::{Analyzer, ClientError, SubmissionPayload};
use comply_protocol::{AnalysisReport, AuditCheck};

/// Which panel the user is looking at. A pure two-state reveal; nothing
/// about it survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intro,
    Form,
}

/// The submit lifecycle. Exactly two states: `Pending` means the loader is
/// up, the results are hidden, and one request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Pending,
}

/// Current contents of the form widgets. The checkbox flags collapse into
/// an ordered check list at submit time.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pub model_name: String,
    pub model_description: String,
    /// Path to the model attachment; empty means none.
    pub model_file: String,
    /// Path to the dataset attachment; empty means none.
    pub dataset_file: String,
    pub bias_check: bool,
    pub transparency_audit: bool,
    pub privacy_scan: bool,
}

impl FormFields {
    /// Checked boxes in presentation order. Unchecked boxes contribute
    /// nothing.
    pub fn selected_checks(&self) -> Vec<AuditCheck> {
        let flags = [self.bias_check, self.transparency_audit, self.privacy_scan];
        AuditCheck::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(check, selected)| selected.then_some(check))
            .collect()
    }

    pub fn to_payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new(
            self.model_name.trim().to_string(),
            self.model_description.trim().to_string(),
        );
        payload.model_file = path_or_none(&self.model_file);
        payload.dataset_file = path_or_none(&self.dataset_file);
        payload.checks = self.selected_checks();
        payload
    }
}

fn path_or_none(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

/// What one completed submit/response cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Report(AnalysisReport),
    Failure(String),
}

/// The form-submit controller.
///
/// `submit` flips `Idle -> Pending` synchronously and hands the payload to
/// a worker thread; `poll` (called every frame) drains the completion
/// channel and flips back. A submit while one is pending is rejected
/// instead of racing.
pub struct Controller {
    analyzer: Arc<dyn Analyzer>,
    stage: Stage,
    state: SubmitState,
    pending: Option<Receiver<Result<AnalysisReport, ClientError>>>,
    latest: Option<AnalysisReport>,
    alert: Option<String>,
}

impl Controller {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            analyzer,
            stage: Stage::Intro,
            state: SubmitState::Idle,
            pending: None,
            latest: None,
            alert: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// The report currently on screen, if any. Cleared on submit so the
    /// results panel stays hidden while a request is pending.
    pub fn latest_report(&self) -> Option<&AnalysisReport> {
        self.latest.as_ref()
    }

    /// Pop the pending alert, if any. Each failed submission raises
    /// exactly one.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Intro panel -> form panel. Harmless if already on the form.
    pub fn advance_intro(&mut self) {
        if self.stage == Stage::Intro {
            debug!("leaving intro panel");
            self.stage = Stage::Form;
        }
    }

    /// Start a submission from the current form contents. Returns whether
    /// a request was actually dispatched; a submit while one is already in
    /// flight is dropped.
    pub fn submit(&mut self, fields: &FormFields) -> bool {
        if self.state == SubmitState::Pending {
            warn!("submission already in flight, ignoring");
            return false;
        }

        let payload = fields.to_payload();
        info!(
            submission_id = %payload.submission_id,
            checks = payload.checks.len(),
            "submitting form"
        );

        self.transition(SubmitState::Pending);
        self.latest = None;

        let (tx, rx) = channel();
        let analyzer = Arc::clone(&self.analyzer);
        thread::spawn(move || {
            let result = analyzer.analyze(&payload);
            // The receiver disappears only if the controller was dropped.
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
        true
    }

    /// Drain the completion channel. Returns the outcome on the frame the
    /// request finishes, `None` otherwise.
    pub fn poll(&mut self) -> Option<SubmitOutcome> {
        let rx = self.pending.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(Ok(report)) => {
                self.latest = Some(report.clone());
                SubmitOutcome::Report(report)
            }
            Ok(Err(err)) => self.fail(format!("An error occurred: {err}")),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                self.fail("An error occurred: analysis worker stopped unexpectedly".to_string())
            }
        };

        self.pending = None;
        self.transition(SubmitState::Idle);
        Some(outcome)
    }

    fn fail(&mut self, message: String) -> SubmitOutcome {
        warn!(%message, "submission failed");
        self.alert = Some(message.clone());
        SubmitOutcome::Failure(message)
    }

    fn transition(&mut self, next: SubmitState) {
        debug!(from = ?self.state, to = ?next, "submit state transition");
        self.state = next;
    }
}
