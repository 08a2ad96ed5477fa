//! comply-protocol: the wire contract between the upload client and the
//! compliance analysis backend.
//!
//! Design rules:
//! - Scores are bounded and clamped, never trusted raw.
//! - Every historical field spelling parses; we only ever write the
//!   canonical one.
//! - A missing optional field is a default, not an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The audit categories a user can opt into. The wire labels are fixed
/// and human-readable; the backend matches on the exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditCheck {
    #[serde(rename = "Bias Check")]
    BiasCheck,
    #[serde(rename = "Transparency Audit")]
    TransparencyAudit,
    #[serde(rename = "Privacy Scan")]
    PrivacyScan,
}

impl AuditCheck {
    /// Every check, in the order the form presents them. Submission order
    /// follows this order.
    pub const ALL: [AuditCheck; 3] = [
        AuditCheck::BiasCheck,
        AuditCheck::TransparencyAudit,
        AuditCheck::PrivacyScan,
    ];

    /// The exact label sent on the wire (and shown next to the checkbox).
    pub fn label(&self) -> &'static str {
        match self {
            AuditCheck::BiasCheck => "Bias Check",
            AuditCheck::TransparencyAudit => "Transparency Audit",
            AuditCheck::PrivacyScan => "Privacy Scan",
        }
    }
}

/// A compliance score in [0, 100]. Backends have been observed sending
/// values outside the range; we clamp instead of rejecting, and an absent
/// score reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub fn new(raw: f64) -> Self {
        if !raw.is_finite() {
            tracing::warn!(raw, "non-finite score in response, treating as 0");
            return Score(0.0);
        }
        Score(raw.clamp(0.0, 100.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Fill fraction for a progress bar, in [0.0, 1.0].
    pub fn fraction(&self) -> f32 {
        (self.0 / 100.0) as f32
    }

    /// Display text, e.g. `73%`.
    pub fn percent_text(&self) -> String {
        format!("{}%", self.0)
    }
}

impl Default for Score {
    fn default() -> Self {
        Score(0.0)
    }
}

impl From<f64> for Score {
    fn from(raw: f64) -> Self {
        Score::new(raw)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> f64 {
        score.0
    }
}

/// The backend's verdict for one submission.
///
/// The two script generations and the backend never agreed on field names,
/// so deserialization accepts every spelling seen in the wild:
/// `score`/`compliance_score`, `risks`/`risk_level`/`risk_report`,
/// `suggestions`/`improvement_suggestions`. Serialization writes the
/// canonical (first) names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default, alias = "compliance_score")]
    pub score: Score,

    #[serde(default, alias = "risk_level", alias = "risk_report")]
    pub risks: Option<String>,

    #[serde(default, alias = "improvement_suggestions")]
    pub suggestions: Vec<String>,
}

/// Parse a response body into a report.
///
/// Unknown fields are ignored and missing optional fields default; the
/// only failure here is a body that is not the expected JSON shape at all.
pub fn parse_report(body: &str) -> Result<AnalysisReport, ReportError> {
    serde_json::from_str(body).map_err(|err| {
        tracing::error!(%err, "analysis response did not match the contract");
        ReportError::Malformed {
            reason: err.to_string(),
        }
    })
}

/// Which generation of the backend contract to speak.
///
/// `Analyze` is canonical (what the current backend serves); `Check` is
/// kept for the older deployment that differs in path and in how the
/// selected checks are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractVariant {
    #[default]
    Analyze,
    Check,
}

impl ContractVariant {
    /// Request path for this variant.
    pub fn path(&self) -> &'static str {
        match self {
            ContractVariant::Analyze => "/analyze",
            ContractVariant::Check => "/check",
        }
    }

    pub fn checks_encoding(&self) -> ChecksEncoding {
        match self {
            ContractVariant::Analyze => ChecksEncoding::JsonArray,
            ContractVariant::Check => ChecksEncoding::Repeated,
        }
    }
}

/// How the selected checks travel inside the multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksEncoding {
    /// One `checks` field holding a JSON array of labels. Always present,
    /// even when nothing is selected (the array is just empty).
    JsonArray,
    /// One `checks` field per selected label; nothing selected means no
    /// `checks` field at all.
    Repeated,
}

impl ChecksEncoding {
    /// Render the selected checks as multipart text fields, preserving
    /// selection order.
    pub fn fields(&self, checks: &[AuditCheck]) -> Vec<(&'static str, String)> {
        match self {
            ChecksEncoding::JsonArray => {
                let labels: Vec<&str> = checks.iter().map(AuditCheck::label).collect();
                vec![("checks", serde_json::Value::from(labels).to_string())]
            }
            ChecksEncoding::Repeated => checks
                .iter()
                .map(|check| ("checks", check.label().to_string()))
                .collect(),
        }
    }
}

/// Contract-level errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed analysis response: {reason}")]
    Malformed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_fields() {
        let report = parse_report(
            r#"{"score": 73, "risks": "Minor bias detected", "suggestions": ["Add more diverse data"]}"#,
        )
        .unwrap();

        assert_eq!(report.score.value(), 73.0);
        assert_eq!(report.risks.as_deref(), Some("Minor bias detected"));
        assert_eq!(report.suggestions, vec!["Add more diverse data"]);
    }

    #[test]
    fn test_parse_legacy_field_spellings() {
        let report = parse_report(
            r#"{"compliance_score": 85, "risk_level": "Low", "improvement_suggestions": ["Use SHAP for transparency."]}"#,
        )
        .unwrap();

        assert_eq!(report.score.value(), 85.0);
        assert_eq!(report.risks.as_deref(), Some("Low"));
        assert_eq!(report.suggestions.len(), 1);
    }

    #[test]
    fn test_parse_backend_risk_report_spelling() {
        // The original backend stub answered with `risk_report`.
        let report = parse_report(r#"{"compliance_score": 85, "risk_report": "Minor bias"}"#).unwrap();
        assert_eq!(report.risks.as_deref(), Some("Minor bias"));
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let report = parse_report(r#"{"risks": "Unknown"}"#).unwrap();
        assert_eq!(report.score.value(), 0.0);
        assert_eq!(report.score.percent_text(), "0%");
    }

    #[test]
    fn test_missing_suggestions_reads_as_empty() {
        let report = parse_report(r#"{"score": 50}"#).unwrap();
        assert!(report.suggestions.is_empty());
        assert!(report.risks.is_none());
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(Score::new(120.0).value(), 100.0);
        assert_eq!(Score::new(-3.0).value(), 0.0);
        assert_eq!(Score::new(f64::NAN).value(), 0.0);

        let report = parse_report(r#"{"score": 250}"#).unwrap();
        assert_eq!(report.score.value(), 100.0);
        assert_eq!(report.score.fraction(), 1.0);
    }

    #[test]
    fn test_score_rendering() {
        let score = Score::new(73.0);
        assert_eq!(score.percent_text(), "73%");
        assert!((score.fraction() - 0.73).abs() < 1e-6);
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = parse_report("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ReportError::Malformed { .. }));
    }

    #[test]
    fn test_variant_paths() {
        assert_eq!(ContractVariant::Analyze.path(), "/analyze");
        assert_eq!(ContractVariant::Check.path(), "/check");
        assert_eq!(ContractVariant::default(), ContractVariant::Analyze);
    }

    #[test]
    fn test_json_array_checks_encoding() {
        let fields = ChecksEncoding::JsonArray
            .fields(&[AuditCheck::BiasCheck, AuditCheck::PrivacyScan]);

        assert_eq!(
            fields,
            vec![("checks", r#"["Bias Check","Privacy Scan"]"#.to_string())]
        );

        // Nothing selected still sends the (empty) array.
        assert_eq!(
            ChecksEncoding::JsonArray.fields(&[]),
            vec![("checks", "[]".to_string())]
        );
    }

    #[test]
    fn test_repeated_checks_encoding() {
        let fields = ChecksEncoding::Repeated
            .fields(&[AuditCheck::BiasCheck, AuditCheck::TransparencyAudit]);

        assert_eq!(
            fields,
            vec![
                ("checks", "Bias Check".to_string()),
                ("checks", "Transparency Audit".to_string()),
            ]
        );
        assert!(ChecksEncoding::Repeated.fields(&[]).is_empty());
    }

    #[test]
    fn test_report_roundtrip_writes_canonical_names() {
        let report = AnalysisReport {
            score: Score::new(42.0),
            risks: Some("Moderate".into()),
            suggestions: vec!["Retrain model with balanced dataset.".into()],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"score\""));
        assert!(json.contains("\"risks\""));
        assert!(json.contains("\"suggestions\""));

        let back = parse_report(&json).unwrap();
        assert_eq!(back, report);
    }
}
