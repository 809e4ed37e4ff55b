//! Analysis entry points
//!
//! Validates a household, generates the scenario ensemble, optimizes phase
//! allocations, runs the stress suite, and scores the outcome. All fatal
//! input problems surface here before any simulation starts.
//!
//! # Example
//!
//! ```ignore
//! use swag_core::analyzer::{analyze, create_default_input};
//!
//! let input = create_default_input("hh-42");
//! let result = analyze(&input)?;
//! println!("overall score: {:.1}", result.overall_score);
//! for summary in &result.stress_summaries {
//!     println!("{}: {:.0}% success", summary.scenario, summary.success_rate * 100.0);
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::allocation::optimize_all;
use crate::config::{HouseholdBuilder, HouseholdInput};
use crate::error::{AnalyzerError, ValidationError};
use crate::generate::generate_ensemble;
use crate::model::{
    AnalysisResult, Phase, PhaseSchedule, Recommendation, ScenarioKind,
};
use crate::objective::{
    compute_phase_metrics, overall_score, rebalancing_recommendations, summarize_scenarios,
};
use crate::stress::{run_stress_suite, suite_path_count};

/// Fewest Monte Carlo paths a full analysis will accept.
pub const MIN_PATHS: usize = 100;

/// Paths actually simulated by [`quick_analyze`], regardless of config.
pub const QUICK_ANALYZE_PATH_CAP: usize = 200;

// =============================================================================
// Progress
// =============================================================================

/// Shared progress and cancellation handle for a running analysis.
///
/// Clone it before starting the run and poll (or cancel) from another
/// thread; all clones observe the same counters.
#[derive(Debug, Clone, Default)]
pub struct AnalysisProgress {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl AnalysisProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn complete_one(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Check a household input for fatal problems. Runs before any simulation.
pub fn validate_input(input: &HouseholdInput) -> Result<(), ValidationError> {
    if input.household_id.trim().is_empty() {
        return Err(ValidationError::MissingHouseholdId);
    }
    if !(18..=100).contains(&input.current_age) {
        return Err(ValidationError::AgeOutOfRange {
            current_age: input.current_age,
        });
    }
    if input.retirement_age <= input.current_age {
        return Err(ValidationError::RetirementNotAfterCurrentAge {
            current_age: input.current_age,
            retirement_age: input.retirement_age,
        });
    }
    if !(input.initial_portfolio > 0.0) {
        return Err(ValidationError::NonPositivePortfolio {
            initial_portfolio: input.initial_portfolio,
        });
    }
    if input.scenario.n_paths < MIN_PATHS {
        return Err(ValidationError::InsufficientPaths {
            n_paths: input.scenario.n_paths,
            minimum: MIN_PATHS,
        });
    }
    for phase in Phase::ALL {
        if !input.risk.epsilon.contains_key(&phase) {
            return Err(ValidationError::MissingPhaseEpsilon(phase));
        }
    }
    for phase in Phase::ALL {
        if !input.risk.budgets.contains_key(&phase) {
            return Err(ValidationError::MissingPhaseBudget(phase));
        }
    }
    Ok(())
}

// =============================================================================
// Entry points
// =============================================================================

/// Full analysis: base case plus every stress scenario.
pub fn analyze(input: &HouseholdInput) -> Result<AnalysisResult, AnalyzerError> {
    run_pipeline(input, input.scenario.n_paths, &ScenarioKind::STRESSES, None)
}

/// Full analysis with external progress reporting and cancellation.
pub fn analyze_with_progress(
    input: &HouseholdInput,
    progress: &AnalysisProgress,
) -> Result<AnalysisResult, AnalyzerError> {
    run_pipeline(
        input,
        input.scenario.n_paths,
        &ScenarioKind::STRESSES,
        Some(progress),
    )
}

/// The same pipeline as [`analyze`] — every stress cohort included — over an
/// ensemble capped at [`QUICK_ANALYZE_PATH_CAP`] paths for fast iteration.
///
/// Same validation as [`analyze`]; only the simulated workload shrinks.
pub fn quick_analyze(input: &HouseholdInput) -> Result<AnalysisResult, AnalyzerError> {
    let effective_paths = input.scenario.n_paths.min(QUICK_ANALYZE_PATH_CAP);
    run_pipeline(input, effective_paths, &ScenarioKind::STRESSES, None)
}

/// Base case plus the named stress scenarios.
///
/// Names use the wire form, e.g. `"market_crash_early"`. An unknown name
/// fails the whole call; `"base_case"` is accepted and ignored since the
/// base cohort always runs.
pub fn stress_test<S: AsRef<str>>(
    input: &HouseholdInput,
    names: &[S],
) -> Result<AnalysisResult, AnalyzerError> {
    let mut stresses = Vec::with_capacity(names.len());
    for name in names {
        let kind: ScenarioKind = name.as_ref().parse()?;
        if kind != ScenarioKind::BaseCase {
            stresses.push(kind);
        }
    }
    run_pipeline(input, input.scenario.n_paths, &stresses, None)
}

/// Score-gap rebalancing recommendations for a completed analysis.
pub fn generate_rebalancing_recommendations(
    result: &AnalysisResult,
    targets: Option<&FxHashMap<Phase, f64>>,
) -> Vec<Recommendation> {
    rebalancing_recommendations(&result.phase_metrics, targets)
}

/// A fully populated baseline household that passes validation as-is.
pub fn create_default_input(household_id: impl Into<String>) -> HouseholdInput {
    HouseholdBuilder::new(household_id).with_default_plan().build()
}

// =============================================================================
// Pipeline
// =============================================================================

fn run_pipeline(
    input: &HouseholdInput,
    effective_paths: usize,
    stresses: &[ScenarioKind],
    progress: Option<&AnalysisProgress>,
) -> Result<AnalysisResult, AnalyzerError> {
    let started = Instant::now();
    validate_input(input)?;

    info!(
        household = %input.household_id,
        paths = effective_paths,
        stresses = stresses.len(),
        "starting analysis"
    );

    let scenarios = generate_ensemble(&input.scenario, effective_paths)?;
    let allocations = optimize_all(&input.risk, &scenarios)?;

    if let Some(progress) = progress {
        progress.set_total(suite_path_count(
            &input.scenario.stress,
            scenarios.len(),
            stresses,
        ));
    }

    let path_results =
        match run_stress_suite(input, &allocations, &scenarios, stresses, progress) {
            Ok(results) => results,
            Err(AnalyzerError::Cancelled) => {
                warn!(household = %input.household_id, "analysis cancelled");
                return Err(AnalyzerError::Cancelled);
            }
            Err(e) => return Err(e),
        };

    let schedule = PhaseSchedule::new(
        input.current_age,
        input.retirement_age,
        &input.scenario.phase_offsets,
    );
    let phase_metrics = compute_phase_metrics(input, &schedule, &path_results);
    let overall = overall_score(&phase_metrics);
    let stress_summaries = summarize_scenarios(&path_results);

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        household = %input.household_id,
        overall_score = overall,
        elapsed_ms,
        "analysis complete"
    );

    Ok(AnalysisResult {
        household_id: input.household_id.clone(),
        seed: input.scenario.master_seed.clone(),
        allocations,
        path_results,
        phase_metrics,
        overall_score: overall,
        stress_summaries,
        elapsed_ms,
    })
}
