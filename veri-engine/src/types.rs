//! Core domain types for trust analysis.
//!
//! Wire serialization is camelCase to match the dashboard frontend; the
//! request type additionally accepts the legacy `answerText`/`contextType`
//! field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Domain Context
// ============================================================================

/// High-stakes domain the analyzed content belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainContext {
    /// Legal / contract review
    Legal,
    /// Financial / audit / risk
    Finance,
    /// Policy / regulatory compliance
    Compliance,
}

impl DomainContext {
    /// Long-form description used when briefing the oracle.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Legal => {
                "Legal / Contract Review - This content may be used for legal decisions, \
                 contract analysis, or legal advice"
            }
            Self::Finance => {
                "Financial / Audit / Risk - This content may be used for financial decisions, \
                 audit reports, or risk assessments"
            }
            Self::Compliance => {
                "Policy / Regulatory Compliance - This content may be used for regulatory \
                 filings, policy decisions, or compliance documentation"
            }
        }
    }

    /// Short noun for spoken-style summaries ("this legal content ...").
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Finance => "financial",
            Self::Compliance => "compliance",
        }
    }
}

impl std::fmt::Display for DomainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legal => write!(f, "legal"),
            Self::Finance => write!(f, "finance"),
            Self::Compliance => write!(f, "compliance"),
        }
    }
}

// ============================================================================
// Analysis Request
// ============================================================================

/// A request to analyze one piece of AI-generated text.
///
/// Immutable once constructed; `text` must be non-empty after trimming
/// (enforced by the engine before any oracle call).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// The AI-generated answer to analyze
    #[serde(alias = "answerText")]
    pub text: String,

    /// Domain the content will be used in
    #[serde(alias = "contextType")]
    pub context: DomainContext,

    /// Whether a spoken-style summary should be produced
    #[serde(default)]
    pub voice_mode: bool,
}

impl AnalysisRequest {
    /// Create a new analysis request.
    pub fn new(text: impl Into<String>, context: DomainContext, voice_mode: bool) -> Self {
        Self {
            text: text.into(),
            context,
            voice_mode,
        }
    }

    /// Preview of the input text for history summaries (40 chars max).
    pub fn input_preview(&self) -> String {
        let trimmed = self.text.trim();
        if trimmed.chars().count() > 40 {
            let head: String = trimmed.chars().take(40).collect();
            format!("{head}...")
        } else {
            trimmed.to_string()
        }
    }
}

// ============================================================================
// Risk Taxonomy
// ============================================================================

/// Category of a flagged issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskType {
    /// Fabricated facts, citations, or figures
    Hallucination,
    /// Factually wrong or misleading statement
    Misstatement,
    /// Claim that cannot be independently verified
    Unverifiable,
    /// Content that may breach a regulatory or policy requirement
    ComplianceGap,
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hallucination => write!(f, "hallucination"),
            Self::Misstatement => write!(f, "misstatement"),
            Self::Unverifiable => write!(f, "unverifiable"),
            Self::ComplianceGap => write!(f, "compliance_gap"),
        }
    }
}

/// A single flagged issue within the analyzed text.
///
/// Issues keep their insertion order from the oracle or heuristic; duplicates
/// are not collapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Short quote (or paraphrase) of the risky part of the input
    pub snippet: String,
    /// Risk category
    pub risk_type: RiskType,
    /// Plain-English explanation of why this was flagged
    pub explanation: String,
    /// Guidance on what a human reviewer should verify
    pub human_check_hint: String,
}

// ============================================================================
// Trust Label
// ============================================================================

/// Trust verdict for an analysis.
///
/// The ordering is deliberately inverted from common risk intuition:
/// `High` trust is the GOOD outcome (high score), `Low` trust is the
/// escalation case signaling the content requires immediate human review.
/// The label is always derived from the score through
/// [`crate::scoring::label_for_score`], never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustLabel {
    /// Score >= 71: content is broadly trustworthy
    High,
    /// Score 41-70: concerns present, professional review recommended
    Medium,
    /// Score <= 40: escalation case, immediate human review required
    Low,
}

impl TrustLabel {
    /// Whether this label is the escalation case.
    pub const fn is_escalation(&self) -> bool {
        matches!(self, Self::Low)
    }
}

impl std::fmt::Display for TrustLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

// ============================================================================
// Oracle Judgment
// ============================================================================

/// Validated, normalized output of the consensus oracle.
///
/// Carries no label: the label is recomputed from the score by the scoring
/// engine so the score/label invariant cannot be violated by the wire.
#[derive(Debug, Clone)]
pub struct OracleJudgment {
    /// Trust score, already clamped to [0, 100]
    pub score: u8,
    /// Flagged issues in oracle order (malformed entries already dropped)
    pub issues: Vec<Issue>,
    /// Narrative for a lawyer/compliance officer
    pub compliance_report: String,
    /// Short note for an audit log
    pub audit_note: String,
    /// Spoken-style summary, when the oracle produced one
    pub voice_summary: Option<String>,
}

// ============================================================================
// Analysis Result
// ============================================================================

/// Completed trust analysis.
///
/// Invariants: `label` is a pure function of `score`; `timestamp` is assigned
/// once at completion and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Trust score in [0, 100]
    pub score: u8,
    /// Trust label derived from the score
    pub label: TrustLabel,
    /// Flagged issues, insertion order preserved
    pub issues: Vec<Issue>,
    /// Compliance narrative
    pub compliance_report: String,
    /// Audit log note
    pub audit_note: String,
    /// Spoken-style summary (voice-mode requests only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_summary: Option<String>,
    /// Completion time (UTC)
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// History
// ============================================================================

/// Lightweight view of a past analysis, safe to ship across the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Entry id
    pub id: Uuid,
    /// Completion time of the underlying result
    pub timestamp: DateTime<Utc>,
    /// Domain context of the request
    pub context: DomainContext,
    /// Trust label
    pub label: TrustLabel,
    /// Trust score
    pub score: u8,
    /// First 40 characters of the input
    pub input_preview: String,
    /// Whether the request ran in voice mode
    pub voice_mode: bool,
    /// Number of flagged issues
    pub issue_count: usize,
}

/// A retained past analysis: summary fields plus the full result.
///
/// Created when an analysis completes, evicted oldest-first once the store
/// capacity is exceeded, never mutated after creation.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Unique entry id
    pub id: Uuid,
    /// Domain context of the request
    pub context: DomainContext,
    /// First 40 characters of the input
    pub input_preview: String,
    /// Whether the request ran in voice mode
    pub voice_mode: bool,
    /// The completed analysis
    pub full_result: AnalysisResult,
}

impl HistoryEntry {
    /// Create an entry from a request and its completed result.
    pub fn new(request: &AnalysisRequest, full_result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            context: request.context,
            input_preview: request.input_preview(),
            voice_mode: request.voice_mode,
            full_result,
        }
    }

    /// Summary view of this entry.
    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            id: self.id,
            timestamp: self.full_result.timestamp,
            context: self.context,
            label: self.full_result.label,
            score: self.full_result.score,
            input_preview: self.input_preview.clone(),
            voice_mode: self.voice_mode,
            issue_count: self.full_result.issues.len(),
        }
    }
}

// ============================================================================
// Aggregate Stats
// ============================================================================

/// Running aggregate statistics over all completed analyses.
///
/// Derived incrementally per analysis, independent of the bounded history
/// (it stays accurate after history eviction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Analyses recorded since the last day rollover
    pub checks_today: u64,
    /// Percentage of results in the escalation case (Low trust), [0, 100]
    pub high_risk_percentage: f64,
    /// Simulated currency amount of fines avoided by catching issues early
    pub estimated_fines_avoided: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_legacy_field_names() {
        let req: AnalysisRequest = serde_json::from_str(
            r#"{"answerText": "some generated answer", "contextType": "legal", "voiceMode": true}"#,
        )
        .unwrap();
        assert_eq!(req.text, "some generated answer");
        assert_eq!(req.context, DomainContext::Legal);
        assert!(req.voice_mode);
    }

    #[test]
    fn request_voice_mode_defaults_off() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"text": "abc", "context": "finance"}"#).unwrap();
        assert!(!req.voice_mode);
    }

    #[test]
    fn input_preview_truncates_to_40_chars() {
        let long = "x".repeat(100);
        let req = AnalysisRequest::new(long, DomainContext::Legal, false);
        let preview = req.input_preview();
        assert_eq!(preview.chars().count(), 43); // 40 + "..."
        assert!(preview.ends_with("..."));

        let short = AnalysisRequest::new("short text", DomainContext::Legal, false);
        assert_eq!(short.input_preview(), "short text");
    }

    #[test]
    fn trust_label_wire_format_is_capitalized() {
        assert_eq!(serde_json::to_string(&TrustLabel::High).unwrap(), "\"High\"");
        assert_eq!(serde_json::to_string(&TrustLabel::Low).unwrap(), "\"Low\"");
    }

    #[test]
    fn escalation_case_is_low_trust() {
        assert!(TrustLabel::Low.is_escalation());
        assert!(!TrustLabel::Medium.is_escalation());
        assert!(!TrustLabel::High.is_escalation());
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = AnalysisResult {
            score: 62,
            label: TrustLabel::Medium,
            issues: vec![],
            compliance_report: "report".into(),
            audit_note: "note".into(),
            voice_summary: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"complianceReport\""));
        assert!(json.contains("\"auditNote\""));
        assert!(!json.contains("voiceSummary")); // skipped when None
    }

    #[test]
    fn history_entry_summary_mirrors_result() {
        let req = AnalysisRequest::new("the text under review", DomainContext::Compliance, true);
        let result = AnalysisResult {
            score: 35,
            label: TrustLabel::Low,
            issues: vec![Issue {
                snippet: "the text".into(),
                risk_type: RiskType::Unverifiable,
                explanation: "e".into(),
                human_check_hint: "h".into(),
            }],
            compliance_report: String::new(),
            audit_note: String::new(),
            voice_summary: Some("summary".into()),
            timestamp: Utc::now(),
        };
        let entry = HistoryEntry::new(&req, result);
        let summary = entry.summary();
        assert_eq!(summary.score, 35);
        assert_eq!(summary.label, TrustLabel::Low);
        assert_eq!(summary.context, DomainContext::Compliance);
        assert_eq!(summary.issue_count, 1);
        assert!(summary.voice_mode);
    }
}
