//! Local heuristic classifier for live risk feedback.
//!
//! A pure, zero-latency classifier that scores text against the risk
//! lexicon without any oracle call. Safe to run on every keystroke
//! (debouncing is the caller's concern) and concurrently with in-flight
//! analyses: it has no state and takes no locks.

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;

/// Minimum trimmed length (in characters) below which there is not enough
/// signal to classify.
pub const MIN_SIGNAL_LEN: usize = 20;

/// Length above which otherwise-clean text is still worth a low-risk note.
const LOW_BAND_LEN: usize = 50;

/// Overclaim hits at or above this count indicate high risk.
const HIGH_OVERCLAIM_HITS: usize = 2;

/// Hedge hits at or above this count indicate medium risk.
const MEDIUM_HEDGE_HITS: usize = 3;

/// Local risk indicator produced without consulting the oracle.
///
/// Unlike [`crate::types::TrustLabel`], this reads in the intuitive
/// direction: `High` means high RISK (heavy overclaim language), not high
/// trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskIndicator {
    /// Not enough signal to say anything
    None,
    /// Long enough to matter, no indicator phrases found
    Low,
    /// Some overclaim or heavy hedging detected
    Medium,
    /// Repeated overclaim language detected
    High,
}

/// Count occurrences of each phrase in the haystack, summed across phrases.
///
/// Matches are case-insensitive, non-overlapping per phrase, and require
/// only substring containment. Overclaim and hedge counts are independent;
/// a stretch of text can contribute to both.
fn count_hits(haystack_lower: &str, phrases: &[&str]) -> usize {
    phrases
        .iter()
        .map(|phrase| haystack_lower.matches(phrase).count())
        .sum()
}

/// Classify text against the base lexicon.
pub fn classify(text: &str) -> RiskIndicator {
    classify_with(&Lexicon::base(), text)
}

/// Classify text against a specific (per-context) lexicon.
///
/// Policy, in priority order:
/// 1. trimmed length below [`MIN_SIGNAL_LEN`] → `None`;
/// 2. two or more overclaim hits → `High`;
/// 3. at least one overclaim hit, or three or more hedge hits → `Medium`;
/// 4. length above 50 characters → `Low`;
/// 5. otherwise `None`.
pub fn classify_with(lexicon: &Lexicon, text: &str) -> RiskIndicator {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < MIN_SIGNAL_LEN {
        return RiskIndicator::None;
    }

    let lower = trimmed.to_lowercase();
    let overclaim_hits = count_hits(&lower, &lexicon.overclaim);
    let hedge_hits = count_hits(&lower, &lexicon.hedge);

    if overclaim_hits >= HIGH_OVERCLAIM_HITS {
        RiskIndicator::High
    } else if overclaim_hits >= 1 || hedge_hits >= MEDIUM_HEDGE_HITS {
        RiskIndicator::Medium
    } else if len > LOW_BAND_LEN {
        RiskIndicator::Low
    } else {
        RiskIndicator::None
    }
}
