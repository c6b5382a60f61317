//! Search orchestrator: bounded primary/retry phases, ranking, fallback.
//!
//! A [`crate::types::RoutedPlan`] goes in; a [`Resolution`] with a concrete
//! URL always comes out. Provider failures, timeouts and unsafe candidates
//! are recorded in the per-phase [`PhaseReport`]s and never propagated.

pub mod report;
pub mod resolve;

pub use report::{CandidatePreview, Phase, PhaseReport, Resolution, ResolutionSource};
pub use resolve::Orchestrator;
