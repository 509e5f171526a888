//! Veri Engine - Trust scoring and consensus analysis for AI-generated content.
//!
//! The engine takes raw text plus a domain context, obtains a consensus
//! judgment from an external reasoning oracle (or degrades to a local
//! heuristic when the oracle is unavailable), and maintains running
//! aggregate statistics plus a bounded analysis history.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TrustEngine                           │
//! ├──────────────┬──────────────────┬────────────────────────────┤
//! │  Heuristic   │  Consensus       │  Scoring                   │
//! │  Classifier  │  Oracle Adapter  │  Engine                    │
//! ├──────────────┴──────────────────┴────────────────────────────┤
//! │        Stats Tracker        │        History Store           │
//! │            (one shared mutual-exclusion domain)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each [`TrustEngine::analyze`] call is independent and may run
//! concurrently with others; only the final stats/history fold takes the
//! write lock, and it does so in one atomic read-modify-write step.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod heuristic;
pub mod history;
pub mod lexicon;
pub mod oracle;
pub mod report;
pub mod scoring;
pub mod stats;
pub mod types;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use veri_common::config::OracleConfig;
use veri_common::error::{Error, Result};

use crate::heuristic::classify_with;
use crate::history::{DayBucket, HistoryStore};
use crate::lexicon::Lexicon;
use crate::oracle::{ConsensusAdapter, HttpOracle, OracleProvider, SimulatedOracle};
use crate::stats::StatsTracker;
use crate::types::{
    AggregateStats, AnalysisRequest, AnalysisResult, HistoryEntry, HistorySummary, TrustLabel,
};

/// Shared mutable engine state: one mutual-exclusion domain for the stats
/// tracker and the history store, so concurrent completions fold in
/// atomically.
#[derive(Debug, Default)]
struct EngineState {
    stats: StatsTracker,
    history: HistoryStore,
}

/// The trust scoring engine facade.
///
/// Owns the consensus adapter and the process-wide aggregate state. Cheap
/// to share: clone the surrounding `Arc`, not the engine.
pub struct TrustEngine {
    adapter: ConsensusAdapter,
    state: Arc<RwLock<EngineState>>,
}

impl TrustEngine {
    /// Create an engine over an explicit oracle provider.
    pub fn new(provider: Arc<dyn OracleProvider>) -> Self {
        Self {
            adapter: ConsensusAdapter::new(provider),
            state: Arc::new(RwLock::new(EngineState::default())),
        }
    }

    /// Create an engine from oracle configuration.
    ///
    /// Unknown providers and missing credentials surface as configuration
    /// errors here, at startup.
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let provider: Arc<dyn OracleProvider> = match config.provider.to_lowercase().as_str() {
            "simulated" => Arc::new(SimulatedOracle),
            "http" => Arc::new(HttpOracle::new(config).map_err(|e| Error::Config(e.to_string()))?),
            other => {
                return Err(Error::Config(format!(
                    "unknown oracle provider '{other}'"
                )))
            }
        };

        info!(provider = %provider.name(), "Trust engine initialized");
        Ok(Self::new(provider))
    }

    /// Name of the configured oracle provider.
    pub fn oracle_mode(&self) -> &str {
        self.adapter.provider_name()
    }

    /// Analyze one piece of AI-generated text.
    ///
    /// Fails only for invalid input; oracle unavailability degrades to a
    /// heuristic-band result with an explicit caveat issue. The completed
    /// result is appended to history and folded into the aggregate stats
    /// under a single write guard before it is returned.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        if request.text.trim().is_empty() {
            return Err(Error::InvalidInput(
                "text must not be empty or whitespace-only".into(),
            ));
        }

        let result = match self.adapter.request_consensus(&request).await {
            Ok(judgment) => scoring::merge_judgment(&request, judgment),
            Err(failure) => {
                let lexicon = Lexicon::for_context(request.context);
                let indicator = classify_with(&lexicon, &request.text);
                scoring::degraded_result(&request, indicator, &failure)
            }
        };

        info!(
            context = %request.context,
            score = result.score,
            label = %result.label,
            issues = result.issues.len(),
            "Analysis completed"
        );

        {
            let mut state = self.state.write().await;
            state.stats.record(&result);
            state.history.append(HistoryEntry::new(&request, result.clone()));
        }

        Ok(result)
    }

    /// Read-only snapshot of the aggregate statistics.
    pub async fn stats(&self) -> AggregateStats {
        self.state.read().await.stats.snapshot()
    }

    /// Reset the daily check counter (day-rollover collaborator hook).
    pub async fn roll_day(&self) {
        self.state.write().await.stats.roll_day();
    }

    /// Summaries of retained history, most recent first.
    pub async fn history_summaries(&self) -> Vec<HistorySummary> {
        self.state.read().await.history.summaries()
    }

    /// Full result of the history entry at `index` (0 = most recent).
    pub async fn history_detail(&self, index: usize) -> Option<AnalysisResult> {
        self.state
            .read()
            .await
            .history
            .get(index)
            .map(|e| e.full_result.clone())
    }

    /// Rendered plain-text report of the history entry at `index`.
    pub async fn history_report(&self, index: usize) -> Option<String> {
        self.state
            .read()
            .await
            .history
            .get(index)
            .map(|e| report::render(&e.full_result))
    }

    /// Retained-entry count per trust label.
    pub async fn label_distribution(&self) -> [(TrustLabel, usize); 3] {
        self.state.read().await.history.label_distribution()
    }

    /// Scores in chronological order (oldest first).
    pub async fn score_trend(&self) -> Vec<u8> {
        self.state.read().await.history.score_trend()
    }

    /// Day-bucketed activity over the trailing heatmap window ending now.
    pub async fn activity_heatmap(&self) -> Vec<DayBucket> {
        self.state
            .read()
            .await
            .history
            .activity_heatmap(chrono::Utc::now())
    }
}
