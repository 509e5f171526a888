//! Scoring engine: merges oracle judgments (or heuristic fallbacks) into
//! final analysis results.
//!
//! This module is the single place the score/label relationship is
//! enforced. No other component may emit a [`TrustLabel`] without going
//! through [`label_for_score`]. Labels read inverted from common risk
//! intuition: High trust is the good outcome, Low trust is the escalation
//! case.

use chrono::Utc;
use tracing::warn;

use crate::heuristic::RiskIndicator;
use crate::oracle::OracleFailure;
use crate::types::{
    AnalysisRequest, AnalysisResult, Issue, OracleJudgment, RiskType, TrustLabel,
};

/// Fallback score for a High risk indicator (band [20, 40]).
const FALLBACK_SCORE_HIGH_RISK: u8 = 30;
/// Fallback score for a Medium risk indicator (band [41, 70]).
const FALLBACK_SCORE_MEDIUM_RISK: u8 = 55;
/// Fallback score for a Low or absent risk indicator (band [71, 90]).
const FALLBACK_SCORE_LOW_RISK: u8 = 80;

/// Derive the trust label from a score.
///
/// Exact boundaries: `>= 71` High, `41..=70` Medium, `<= 40` Low.
pub const fn label_for_score(score: u8) -> TrustLabel {
    if score >= 71 {
        TrustLabel::High
    } else if score >= 41 {
        TrustLabel::Medium
    } else {
        TrustLabel::Low
    }
}

/// Merge a validated oracle judgment into a final result.
///
/// Adopts the oracle's score, issues, and narratives; recomputes the label;
/// synthesizes the voice summary locally when voice mode is on and the
/// oracle did not provide one. The timestamp is assigned here, once.
pub fn merge_judgment(request: &AnalysisRequest, judgment: OracleJudgment) -> AnalysisResult {
    let label = label_for_score(judgment.score);

    let voice_summary = if request.voice_mode {
        Some(judgment.voice_summary.unwrap_or_else(|| {
            voice_summary(judgment.score, label, judgment.issues.len(), request)
        }))
    } else {
        None
    };

    AnalysisResult {
        score: judgment.score,
        label,
        issues: judgment.issues,
        compliance_report: judgment.compliance_report,
        audit_note: judgment.audit_note,
        voice_summary,
        timestamp: Utc::now(),
    }
}

/// Build a degraded-but-valid result when the oracle is unavailable.
///
/// The heuristic indicator maps to a fixed score band, a single caveat
/// issue notes that automated verification was unavailable, and the
/// narratives are conservative boilerplate. The caller still gets a fully
/// formed result; oracle unavailability is never a user-facing failure.
pub fn degraded_result(
    request: &AnalysisRequest,
    indicator: RiskIndicator,
    failure: &OracleFailure,
) -> AnalysisResult {
    warn!(
        indicator = ?indicator,
        reason = %failure,
        "Consensus oracle unavailable, falling back to local screening"
    );

    let (score, caveat) = match indicator {
        RiskIndicator::High => (
            FALLBACK_SCORE_HIGH_RISK,
            "Local screening found repeated absolute or guarantee language.",
        ),
        RiskIndicator::Medium => (
            FALLBACK_SCORE_MEDIUM_RISK,
            "Local screening found overclaim or heavy hedging language.",
        ),
        RiskIndicator::Low => (
            FALLBACK_SCORE_LOW_RISK,
            "Local screening found no indicator phrases.",
        ),
        RiskIndicator::None => (
            FALLBACK_SCORE_LOW_RISK,
            "Local screening had insufficient signal to assess this text.",
        ),
    };
    let label = label_for_score(score);

    let issue = Issue {
        snippet: request.input_preview(),
        risk_type: RiskType::Unverifiable,
        explanation: format!(
            "Automated verification unavailable. {caveat} The trust score is a local \
             estimate, not a consensus judgment."
        ),
        human_check_hint: "Re-run the analysis when the review service is available, and have \
                           a qualified professional review the content before relying on it."
            .to_string(),
    };

    let noun = request.context.noun();
    let compliance_report = format!(
        "The consensus review service could not be reached, so this {noun} content was \
         screened locally against risk indicator phrases only. The resulting trust score of \
         {score}/100 is a conservative estimate and must not be treated as a full compliance \
         assessment. Claims in the content have not been checked for fabrication or \
         regulatory exposure. Route this content through standard professional review before \
         any official use."
    );

    let audit_note = format!(
        "Consensus review unavailable ({failure}); degraded local screening applied. Trust \
         score {score}/100 ({label} trust). Manual compliance review required."
    );

    let voice_summary = if request.voice_mode {
        Some(voice_summary(score, label, 1, request))
    } else {
        None
    };

    AnalysisResult {
        score,
        label,
        issues: vec![issue],
        compliance_report,
        audit_note,
        voice_summary,
        timestamp: Utc::now(),
    }
}

/// Spoken-style summary of a completed analysis.
fn voice_summary(
    score: u8,
    label: TrustLabel,
    issue_count: usize,
    request: &AnalysisRequest,
) -> String {
    let (status, recommendation) = match label {
        TrustLabel::High => (
            "appears to be trustworthy",
            "can likely proceed with standard review",
        ),
        TrustLabel::Medium => (
            "has some areas of concern",
            "should be reviewed by a qualified professional before proceeding",
        ),
        TrustLabel::Low => (
            "has significant trust and compliance risks",
            "should be escalated for thorough human review before any action",
        ),
    };

    let plural = if issue_count == 1 { "issue that requires" } else { "issues that require" };

    format!(
        "Based on consensus analysis, this {} content {} with a trust score of {} out of 100. \
         I identified {} potential {} attention. My recommendation is that this content {}.",
        request.context.noun(),
        status,
        score,
        issue_count,
        plural,
        recommendation
    )
}
