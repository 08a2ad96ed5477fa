// Pure mapping from an analysis report to what the results panel shows.
// Kept widget-free so the rendering contract is testable on its own.

use comply_protocol::AnalysisReport;

/// Shown when the backend reports no risk text.
pub const NO_RISKS_FALLBACK: &str = "No major risks found.";

/// Shown as the only list entry when there are no suggestions.
pub const NO_SUGGESTIONS_FALLBACK: &str = "No suggestions. Good to go!";

/// Progress-bar fill for the score, in [0.0, 1.0].
pub fn score_fill(report: &AnalysisReport) -> f32 {
    report.score.fraction()
}

/// Score text, e.g. `73%`.
pub fn score_text(report: &AnalysisReport) -> String {
    report.score.percent_text()
}

pub fn risk_line(report: &AnalysisReport) -> &str {
    report.risks.as_deref().unwrap_or(NO_RISKS_FALLBACK)
}

/// Suggestion list entries, in response order, no de-duplication. An empty
/// or absent sequence renders as the single fallback line.
pub fn suggestion_lines(report: &AnalysisReport) -> Vec<String> {
    if report.suggestions.is_empty() {
        vec![NO_SUGGESTIONS_FALLBACK.to_string()]
    } else {
        report.suggestions.clone()
    }
}
