//! # swag_core
//!
//! Monte Carlo scenario analysis for phase-based retirement planning.
//!
//! A household's plan is split into four phases: income-now, income-later,
//! growth, and legacy. Each phase carries its own risk budget and asset
//! allocation. The engine generates per-driver economic paths, simulates
//! yearly cashflows across them, stresses the plan with named scenarios,
//! and scores every phase on a 0-100 outcome scale.
//!
//! ## Example
//!
//! ```ignore
//! use swag_core::{analyze, create_default_input};
//!
//! let input = create_default_input("hh-42");
//! let result = analyze(&input)?;
//!
//! println!("overall: {:.1}", result.overall_score);
//! for metrics in &result.phase_metrics {
//!     println!("{}: {:.1}", metrics.phase, metrics.outcome_score);
//! }
//! ```
//!
//! Analyses are deterministic: the same input and master seed always
//! produce the same paths, metrics, and scores. Path simulation runs in
//! parallel when the default `parallel` feature is enabled.

#![warn(clippy::all)]

// =============================================================================
// Modules
// =============================================================================

pub mod allocation;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod monitor;
pub mod objective;
pub mod receipt;
pub mod rng;
pub mod simulation;
pub mod stress;

#[cfg(test)]
mod tests;

// =============================================================================
// Re-exports
// =============================================================================

pub use analyzer::{
    AnalysisProgress, MIN_PATHS, QUICK_ANALYZE_PATH_CAP, analyze, analyze_with_progress,
    create_default_input, generate_rebalancing_recommendations, quick_analyze, stress_test,
    validate_input,
};
pub use config::{HouseholdBuilder, HouseholdInput, RiskConfig, ScenarioConfig};
pub use error::{AnalyzerError, ConfigError, ValidationError};
pub use model::{
    AnalysisResult, AssetClass, AssetVector, CashflowRecord, EconomicScenario, FinalMetrics,
    PathResult, Phase, PhaseAllocation, PhaseAllocations, PhaseMetrics, PhaseSchedule,
    Recommendation, RecommendationPriority, ScenarioKind, StressSummary,
};
pub use receipt::{
    FnvDigest, Receipt, ReceiptDigest, Sha256Digest, make_outcome_receipt, verify_receipt,
};
