//! End-to-end engine tests over stub oracle providers.
//!
//! Covers the full analyze flow: judgment adoption, heuristic degradation on
//! oracle failure, bounded history, aggregate stats, and report rendering.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use veri_engine::oracle::{OracleFailure, OracleProvider};
use veri_engine::report;
use veri_engine::types::{AnalysisRequest, DomainContext, RiskType, TrustLabel};
use veri_engine::TrustEngine;

/// Provider that always answers with a fixed judgment body.
struct StubOracle {
    body: String,
}

impl StubOracle {
    fn with_score(score: u8) -> Self {
        Self {
            body: format!(
                r#"{{
                    "score": {score},
                    "issues": [
                        {{"snippet": "the flagged claim", "riskType": "hallucination",
                          "explanation": "stub explanation", "humanCheckHint": "stub hint"}}
                    ],
                    "complianceReport": "stub compliance report",
                    "auditNote": "stub audit note"
                }}"#
            ),
        }
    }
}

#[async_trait]
impl OracleProvider for StubOracle {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, OracleFailure> {
        Ok(self.body.clone())
    }
}

/// Provider that cycles through a list of scores, one per call.
struct SequenceOracle {
    scores: Vec<u8>,
    cursor: AtomicUsize,
}

#[async_trait]
impl OracleProvider for SequenceOracle {
    fn name(&self) -> &str {
        "sequence"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, OracleFailure> {
        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        let score = self.scores[i % self.scores.len()];
        Ok(StubOracle::with_score(score).body)
    }
}

/// Provider that is never reachable.
struct FailingOracle;

#[async_trait]
impl OracleProvider for FailingOracle {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, OracleFailure> {
        Err(OracleFailure::Unreachable("connection refused".into()))
    }
}

fn request(text: &str) -> AnalysisRequest {
    AnalysisRequest::new(text, DomainContext::Legal, false)
}

#[tokio::test]
async fn analyze_adopts_oracle_judgment() {
    let engine = TrustEngine::new(Arc::new(StubOracle::with_score(88)));
    let result = engine
        .analyze(request("The cited precedent was decided in 2019 by the appellate court."))
        .await
        .unwrap();

    assert_eq!(result.score, 88);
    assert_eq!(result.label, TrustLabel::High);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.compliance_report, "stub compliance report");
    assert_eq!(result.audit_note, "stub audit note");
}

#[tokio::test]
async fn analyze_rejects_empty_text_before_any_oracle_call() {
    let engine = TrustEngine::new(Arc::new(FailingOracle));
    for text in ["", "   ", "\n\t"] {
        let err = engine.analyze(request(text)).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
    // Nothing was recorded
    assert_eq!(engine.stats().await.checks_today, 0);
    assert!(engine.history_summaries().await.is_empty());
}

#[tokio::test]
async fn oracle_failure_degrades_to_heuristic_band() {
    let engine = TrustEngine::new(Arc::new(FailingOracle));

    // Overclaim-heavy text -> High risk indicator -> band [20, 40]
    let risky = engine
        .analyze(request(
            "Guaranteed, absolutely certain, 100% accurate, no risk at all.",
        ))
        .await
        .unwrap();
    assert_eq!(risky.score, 30);
    assert_eq!(risky.label, TrustLabel::Low);
    assert_eq!(risky.issues.len(), 1, "exactly one synthesized caveat issue");
    assert_eq!(risky.issues[0].risk_type, RiskType::Unverifiable);

    // Clean long text -> Low risk indicator -> band [71, 90]
    let clean = engine
        .analyze(request(
            "The quarterly filing was submitted on the third of March this year.",
        ))
        .await
        .unwrap();
    assert_eq!(clean.score, 80);
    assert_eq!(clean.label, TrustLabel::High);

    for result in [&risky, &clean] {
        assert!((20..=90).contains(&result.score));
    }
}

#[tokio::test]
async fn render_is_idempotent_over_analyze_output() {
    let engine = TrustEngine::new(Arc::new(StubOracle::with_score(55)));
    let result = engine
        .analyze(request("The agreement covers both parties for a period of five years."))
        .await
        .unwrap();

    let first = report::render(&result);
    let second = report::render(&result);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn history_is_bounded_and_ordered() {
    let engine = TrustEngine::new(Arc::new(StubOracle::with_score(60)));

    for i in 1..=11 {
        engine
            .analyze(request(&format!("analysis number {i} of the submitted answer text")))
            .await
            .unwrap();
    }

    let summaries = engine.history_summaries().await;
    assert_eq!(summaries.len(), 10);
    // The first analysis was evicted, the rest are newest-first
    assert!(summaries[0].input_preview.contains("analysis number 11"));
    assert!(summaries[9].input_preview.contains("analysis number 2"));
    assert!(summaries
        .iter()
        .all(|s| !s.input_preview.contains("analysis number 1 ")));
}

#[tokio::test]
async fn stats_fold_per_label() {
    let engine = TrustEngine::new(Arc::new(SequenceOracle {
        scores: vec![85, 20],
        cursor: AtomicUsize::new(0),
    }));

    engine
        .analyze(request("First answer under review, expected to score well."))
        .await
        .unwrap();
    engine
        .analyze(request("Second answer under review, expected to score poorly."))
        .await
        .unwrap();

    let stats = engine.stats().await;
    assert_eq!(stats.checks_today, 2);
    // One High (50k) + one Low (0)
    assert_eq!(stats.estimated_fines_avoided, 50_000);
    // One escalation out of two
    assert_eq!(stats.high_risk_percentage, 50.0);
}

#[tokio::test]
async fn concurrent_analyses_do_not_corrupt_state() {
    let engine = Arc::new(TrustEngine::new(Arc::new(StubOracle::with_score(30))));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .analyze(request(&format!("concurrent submission number {i}")))
                    .await
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let stats = engine.stats().await;
    assert_eq!(stats.checks_today, 10);
    // Every result scored 30 -> Low -> all escalations
    assert_eq!(stats.high_risk_percentage, 100.0);
    assert_eq!(engine.history_summaries().await.len(), 10);
}

#[tokio::test]
async fn label_distribution_and_trend_follow_history() {
    let engine = TrustEngine::new(Arc::new(SequenceOracle {
        scores: vec![85, 55, 20],
        cursor: AtomicUsize::new(0),
    }));

    for text in [
        "First answer in the sequence of submitted texts.",
        "Second answer in the sequence of submitted texts.",
        "Third answer in the sequence of submitted texts.",
    ] {
        engine.analyze(request(text)).await.unwrap();
    }

    let [high, medium, low] = engine.label_distribution().await;
    assert_eq!(high.1, 1);
    assert_eq!(medium.1, 1);
    assert_eq!(low.1, 1);

    // Chronological: oldest first
    assert_eq!(engine.score_trend().await, vec![85, 55, 20]);
}

#[tokio::test]
async fn voice_mode_produces_voice_summary() {
    let engine = TrustEngine::new(Arc::new(StubOracle::with_score(88)));
    let mut req = request("The cited precedent was decided in 2019 by the appellate court.");
    req.voice_mode = true;

    let result = engine.analyze(req).await.unwrap();
    let summary = result.voice_summary.expect("voice mode requested");
    assert!(summary.contains("88 out of 100"));
}
