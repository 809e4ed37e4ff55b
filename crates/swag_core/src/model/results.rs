//! Aggregated analysis output: phase metrics, stress summaries, and
//! rebalancing recommendations.

use serde::{Deserialize, Serialize};

use super::allocation::PhaseAllocations;
use super::phase::Phase;
use super::records::{PathResult, ScenarioKind};

/// Per-phase aggregate metrics.
///
/// The probability metrics (`income_sufficiency`, `drawdown_breach_probability`,
/// `legacy_confidence`) live in [0, 1]; `after_tax_efficiency` is clamped to
/// [0, 1]; `liquidity_coverage` is a ratio ≥ 0; `outcome_score` is the
/// composite on [0, 100]. Derived wholesale on each run, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub phase: Phase,
    /// ISP: fraction of paths meeting every scheduled need in the window.
    pub income_sufficiency: f64,
    /// DGBP: fraction of paths breaching the max-drawdown guardrail.
    pub drawdown_breach_probability: f64,
    /// LCR: liquid resources over mandatory outflows.
    pub liquidity_coverage: f64,
    /// LCI: fraction of paths whose terminal value meets the legacy goal.
    pub legacy_confidence: f64,
    /// ATE: after-tax retention share of gross outflows.
    pub after_tax_efficiency: f64,
    /// OS: weighted composite on [0, 100].
    pub outcome_score: f64,
    /// Paths scored by ISP (its denominator). 0 means the window held no
    /// post-retirement scheduled needs and ISP fell back to its documented
    /// default of 0.0.
    pub qualifying_paths: usize,
}

/// Aggregate view of one cohort (base case or one stress variant).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressSummary {
    pub scenario: ScenarioKind,
    pub paths: usize,
    pub success_rate: f64,
    pub p5_terminal_value: f64,
    pub median_terminal_value: f64,
    pub p95_terminal_value: f64,
    /// Mean years-to-depletion across depleted paths; `None` when no path
    /// depleted.
    pub mean_years_to_depletion: Option<f64>,
}

/// Priority attached to a rebalancing recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Low,
}

/// One rebalancing recommendation for a phase scoring below target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub phase: Phase,
    pub current_score: f64,
    pub target_score: f64,
    /// `target_score - current_score`, always positive.
    pub gap: f64,
    pub priority: RecommendationPriority,
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub household_id: String,
    /// Master seed the scenario ensemble was generated from.
    pub seed: String,
    pub allocations: PhaseAllocations,
    /// Every simulated path, tagged by cohort; ordering within a cohort
    /// follows the base scenario index.
    pub path_results: Vec<PathResult>,
    /// One entry per phase, in lifecycle order.
    pub phase_metrics: Vec<PhaseMetrics>,
    /// Mean of the four phase outcome scores.
    pub overall_score: f64,
    pub stress_summaries: Vec<StressSummary>,
    pub elapsed_ms: u64,
}

impl AnalysisResult {
    /// Metrics for one phase.
    #[must_use]
    pub fn metrics_for(&self, phase: Phase) -> Option<&PhaseMetrics> {
        self.phase_metrics.iter().find(|m| m.phase == phase)
    }

    /// Paths belonging to one cohort.
    pub fn paths_for(&self, scenario: ScenarioKind) -> impl Iterator<Item = &PathResult> {
        self.path_results
            .iter()
            .filter(move |p| p.scenario == scenario)
    }

    /// Fraction of a cohort's paths that finished without depleting.
    /// Returns `None` for a cohort with no paths.
    #[must_use]
    pub fn success_rate(&self, scenario: ScenarioKind) -> Option<f64> {
        let mut total = 0usize;
        let mut successes = 0usize;
        for path in self.paths_for(scenario) {
            total += 1;
            if path.final_metrics.success {
                successes += 1;
            }
        }
        (total > 0).then(|| successes as f64 / total as f64)
    }

    /// Summary row for one cohort.
    #[must_use]
    pub fn summary_for(&self, scenario: ScenarioKind) -> Option<&StressSummary> {
        self.stress_summaries
            .iter()
            .find(|s| s.scenario == scenario)
    }
}
