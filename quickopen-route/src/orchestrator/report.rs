//! What happened during a resolution, in a form suitable for debug output.

use serde::Serialize;
use std::fmt;

use crate::types::{Intent, PlanReason, ScoredCandidate, SearchResult};

/// Raw candidates kept per phase in a [`PhaseReport`].
pub const PREVIEW_LIMIT: usize = 5;

/// Which provider call a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Primary,
    Retry,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Retry => "retry",
        })
    }
}

/// Where the final URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// The classifier produced the URL without searching.
    Direct,
    /// Best candidate of the primary phase.
    Primary,
    /// Best candidate of the retry phase.
    Retry,
    /// The generic web-search URL.
    Fallback,
}

/// A raw provider candidate, trimmed for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePreview {
    pub url: String,
    pub title: Option<String>,
    /// The provider's own relevance score.
    pub score: Option<f64>,
}

impl From<&SearchResult> for CandidatePreview {
    fn from(result: &SearchResult) -> Self {
        Self {
            url: result.url.clone(),
            title: result.title.clone(),
            score: result.score,
        }
    }
}

/// Outcome of one provider call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Query text actually sent.
    pub query: String,
    /// Best safe candidate, or the `-999` sentinel.
    pub best: ScoredCandidate,
    /// First [`PREVIEW_LIMIT`] raw candidates in provider order.
    pub candidates: Vec<CandidatePreview>,
    /// The provider's expanded query, if it reported one.
    pub autoprompt: Option<String>,
    pub elapsed_ms: u64,
    /// Set when the call failed or timed out.
    pub error: Option<String>,
}

impl PhaseReport {
    /// Returns `true` if the phase produced a usable URL.
    pub fn has_url(&self) -> bool {
        self.best.has_url()
    }
}

/// The orchestrator's answer for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Where to send the user. Always a concrete URL.
    pub url: String,
    pub intent: Intent,
    pub reason: PlanReason,
    pub source: ResolutionSource,
    /// Empty for direct plans; otherwise one or two entries in call order.
    pub phases: Vec<PhaseReport>,
    /// The generic search URL for this query, whether or not it was used.
    pub fallback_url: String,
}

impl Resolution {
    /// The report for `phase`, if that phase ran.
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}
