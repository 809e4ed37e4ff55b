//! Phase objective metrics
//!
//! Scores each planning phase against the pooled simulation results. Five
//! normalized metrics feed a weighted outcome score per phase:
//!
//! - income sufficiency: fraction of paths meeting every scheduled
//!   retirement need inside the phase window
//! - drawdown breach probability: fraction of paths whose in-window
//!   drawdown exceeds the household's tolerance (depleted paths breach)
//! - liquidity coverage: how many times over the liquid sleeve covers a
//!   year's outflows, capped and averaged
//! - legacy confidence: fraction of paths finishing at or above the
//!   legacy goal
//! - after-tax efficiency: share of gross outflows kept after taxes
//!
//! The module also evaluates phase transitions and produces rebalancing
//! recommendations from outcome-score gaps.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::config::HouseholdInput;
use crate::model::{
    PathResult, Phase, PhaseMetrics, PhaseSchedule, Recommendation, RecommendationPriority,
    ScenarioKind, StressSummary,
};

/// Outcome score a phase should reach when no explicit target is given.
pub const DEFAULT_TARGET_SCORE: f64 = 75.0;

/// Score gap above which a rebalancing recommendation is high priority.
pub const HIGH_PRIORITY_GAP: f64 = 15.0;

/// Liquidity ratios are capped here before averaging.
const LIQUIDITY_RATIO_CAP: f64 = 10.0;

// =============================================================================
// Outcome score
// =============================================================================

/// Weights over `[sufficiency, 1 - breach, liquidity, tax, legacy]`.
///
/// Early income phases weight sufficiency and liquidity; Growth shifts
/// toward breach control and legacy building; Legacy is dominated by the
/// legacy goal itself.
fn score_weights(phase: Phase) -> [f64; 5] {
    match phase {
        Phase::IncomeNow => [0.40, 0.25, 0.20, 0.10, 0.05],
        Phase::IncomeLater => [0.35, 0.25, 0.15, 0.15, 0.10],
        Phase::Growth => [0.15, 0.25, 0.10, 0.20, 0.30],
        Phase::Legacy => [0.10, 0.15, 0.05, 0.15, 0.55],
    }
}

/// Weighted outcome score on a 0-100 scale.
///
/// Breach probability is inverted and liquidity coverage is normalized at a
/// 2x target before weighting; the result is clamped to the scale.
pub fn outcome_score(phase: Phase, isp: f64, dgbp: f64, lcr: f64, ate: f64, lci: f64) -> f64 {
    let weights = score_weights(phase);
    let norms = [isp, 1.0 - dgbp, lcr.min(2.0) / 2.0, ate, lci];
    let raw: f64 = weights.iter().zip(norms).map(|(w, n)| w * n).sum();
    (100.0 * raw).clamp(0.0, 100.0)
}

// =============================================================================
// Phase metrics
// =============================================================================

fn scheduled_need_years(input: &HouseholdInput) -> FxHashSet<usize> {
    let mut years = FxHashSet::default();
    for group in &input.cashflow_needs {
        for need in &group.schedule {
            if need.amount > 0.0 {
                years.insert(need.year);
            }
        }
    }
    years
}

fn income_sufficiency(
    input: &HouseholdInput,
    need_years: &FxHashSet<usize>,
    window: (usize, usize),
    results: &[PathResult],
) -> (f64, usize) {
    let qualifying_years: Vec<usize> = (window.0..window.1)
        .filter(|&year| {
            need_years.contains(&year)
                && input.current_age + year as u32 >= input.retirement_age
        })
        .collect();

    if qualifying_years.is_empty() || results.is_empty() {
        return (0.0, 0);
    }

    let met = results
        .iter()
        .filter(|path| {
            qualifying_years
                .iter()
                .all(|&year| path.records.get(year).is_some_and(|r| r.need_met()))
        })
        .count();

    (met as f64 / results.len() as f64, results.len())
}

fn path_breaches(path: &PathResult, window: (usize, usize), max_drawdown: f64) -> bool {
    let mut records = path.records_in_window(window).peekable();
    let Some(first) = records.peek() else {
        // Depleted before the phase began.
        return true;
    };

    let mut peak = first.beginning_balance;
    let mut worst: f64 = 0.0;
    for record in records {
        let value = record.ending_balance;
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst > max_drawdown
}

fn breach_probability(results: &[PathResult], window: (usize, usize), max_drawdown: f64) -> f64 {
    if window.0 >= window.1 || results.is_empty() {
        return 0.0;
    }
    let breached = results
        .iter()
        .filter(|path| path_breaches(path, window, max_drawdown))
        .count();
    breached as f64 / results.len() as f64
}

fn liquidity_coverage(results: &[PathResult], window: (usize, usize)) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for path in results {
        for record in path.records_in_window(window) {
            let outflows = record.withdrawals + record.taxes + record.ltc_costs;
            if outflows > 0.0 {
                let liquid =
                    record.allocation.cash + record.allocation.credit + record.contributions;
                sum += (liquid / outflows).min(LIQUIDITY_RATIO_CAP);
                count += 1;
            }
        }
    }
    if count == 0 { 1.0 } else { sum / count as f64 }
}

fn legacy_confidence(results: &[PathResult], legacy_goal: f64) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let reached = results
        .iter()
        .filter(|path| path.final_metrics.terminal_value >= legacy_goal)
        .count();
    reached as f64 / results.len() as f64
}

fn after_tax_efficiency(results: &[PathResult], window: (usize, usize)) -> f64 {
    let mut withdrawals = 0.0;
    let mut taxes = 0.0;
    for path in results {
        for record in path.records_in_window(window) {
            withdrawals += record.withdrawals;
            taxes += record.taxes;
        }
    }
    let gross = withdrawals + taxes;
    if gross <= 0.0 { 1.0 } else { 1.0 - taxes / gross }
}

/// Compute the five metrics and the outcome score for every phase, pooling
/// all simulated paths regardless of cohort.
pub fn compute_phase_metrics(
    input: &HouseholdInput,
    schedule: &PhaseSchedule,
    results: &[PathResult],
) -> Vec<PhaseMetrics> {
    let horizon = input.scenario.horizon_years;
    let need_years = scheduled_need_years(input);
    let lci = legacy_confidence(results, input.risk.legacy_goal);

    Phase::ALL
        .iter()
        .map(|&phase| {
            let window = schedule.window(phase, horizon);
            let (isp, qualifying_paths) =
                income_sufficiency(input, &need_years, window, results);
            let dgbp = breach_probability(results, window, input.risk.max_drawdown);
            let lcr = liquidity_coverage(results, window);
            let ate = after_tax_efficiency(results, window);

            PhaseMetrics {
                phase,
                income_sufficiency: isp,
                drawdown_breach_probability: dgbp,
                liquidity_coverage: lcr,
                legacy_confidence: lci,
                after_tax_efficiency: ate,
                outcome_score: outcome_score(phase, isp, dgbp, lcr, ate, lci),
                qualifying_paths,
            }
        })
        .collect()
}

/// Mean outcome score across phases, 0.0 when empty.
pub fn overall_score(metrics: &[PhaseMetrics]) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    metrics.iter().map(|m| m.outcome_score).sum::<f64>() / metrics.len() as f64
}

// =============================================================================
// Phase transitions
// =============================================================================

/// Tolerances for moving a household into its next phase posture.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionPolicy {
    /// Largest acceptable increase in drawdown breach probability.
    pub max_breach_increase: f64,
    /// Largest acceptable drop in income sufficiency.
    pub max_sufficiency_drop: f64,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            max_breach_increase: 0.05,
            max_sufficiency_drop: 0.10,
        }
    }
}

/// One metric's movement across a proposed transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDelta {
    pub metric: &'static str,
    pub current: f64,
    pub projected: f64,
    pub delta: f64,
}

/// Verdict on a proposed phase transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionAssessment {
    pub recommended: bool,
    /// Metric movements that exceeded policy, empty when recommended.
    pub blocking: Vec<RiskDelta>,
}

/// Compare current-phase metrics against the projected next-phase metrics.
///
/// A transition is recommended only when the projected outcome score
/// strictly improves and no risk metric deteriorates beyond policy; any
/// violation lands in `blocking` with its delta.
pub fn evaluate_phase_transition(
    current: &PhaseMetrics,
    projected: &PhaseMetrics,
    policy: &TransitionPolicy,
) -> TransitionAssessment {
    let mut blocking = Vec::new();

    let score_delta = projected.outcome_score - current.outcome_score;
    if score_delta <= 0.0 {
        blocking.push(RiskDelta {
            metric: "outcome_score",
            current: current.outcome_score,
            projected: projected.outcome_score,
            delta: score_delta,
        });
    }

    let breach_delta =
        projected.drawdown_breach_probability - current.drawdown_breach_probability;
    if breach_delta > policy.max_breach_increase {
        blocking.push(RiskDelta {
            metric: "drawdown_breach_probability",
            current: current.drawdown_breach_probability,
            projected: projected.drawdown_breach_probability,
            delta: breach_delta,
        });
    }

    let sufficiency_delta = projected.income_sufficiency - current.income_sufficiency;
    if -sufficiency_delta > policy.max_sufficiency_drop {
        blocking.push(RiskDelta {
            metric: "income_sufficiency",
            current: current.income_sufficiency,
            projected: projected.income_sufficiency,
            delta: sufficiency_delta,
        });
    }

    TransitionAssessment {
        recommended: blocking.is_empty(),
        blocking,
    }
}

// =============================================================================
// Rebalancing
// =============================================================================

/// Recommend attention for phases scoring below target.
///
/// Targets default to [`DEFAULT_TARGET_SCORE`] per phase; gaps above
/// [`HIGH_PRIORITY_GAP`] are high priority. Phases at or above target are
/// omitted, and results sort largest gap first.
pub fn rebalancing_recommendations(
    metrics: &[PhaseMetrics],
    targets: Option<&FxHashMap<Phase, f64>>,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = metrics
        .iter()
        .filter_map(|m| {
            let target = targets
                .and_then(|t| t.get(&m.phase))
                .copied()
                .unwrap_or(DEFAULT_TARGET_SCORE);
            let gap = target - m.outcome_score;
            if gap <= 0.0 {
                return None;
            }
            let priority = if gap > HIGH_PRIORITY_GAP {
                RecommendationPriority::High
            } else {
                RecommendationPriority::Low
            };
            Some(Recommendation {
                phase: m.phase,
                current_score: m.outcome_score,
                target_score: target,
                gap,
                priority,
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.gap.total_cmp(&a.gap));
    recommendations
}

// =============================================================================
// Stress summaries
// =============================================================================

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() as f64 - 1.0)).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Summarize results per scenario tag, base case first.
pub fn summarize_scenarios(results: &[PathResult]) -> Vec<StressSummary> {
    let kinds =
        std::iter::once(ScenarioKind::BaseCase).chain(ScenarioKind::STRESSES.iter().copied());

    let mut summaries = Vec::new();
    for kind in kinds {
        let cohort: Vec<&PathResult> =
            results.iter().filter(|p| p.scenario == kind).collect();
        if cohort.is_empty() {
            continue;
        }

        let paths = cohort.len();
        let successes = cohort.iter().filter(|p| p.final_metrics.success).count();

        let mut terminals: Vec<f64> = cohort
            .iter()
            .map(|p| p.final_metrics.terminal_value)
            .collect();
        terminals.sort_by(f64::total_cmp);

        let depletion_years: Vec<f64> = cohort
            .iter()
            .filter_map(|p| p.final_metrics.years_to_depletion)
            .map(|y| y as f64)
            .collect();
        let mean_years_to_depletion = if depletion_years.is_empty() {
            None
        } else {
            Some(depletion_years.iter().sum::<f64>() / depletion_years.len() as f64)
        };

        summaries.push(StressSummary {
            scenario: kind,
            paths,
            success_rate: successes as f64 / paths as f64,
            p5_terminal_value: percentile(&terminals, 5.0),
            median_terminal_value: percentile(&terminals, 50.0),
            p95_terminal_value: percentile(&terminals, 95.0),
            mean_years_to_depletion,
        });
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_weights_sum_to_one() {
        for phase in Phase::ALL {
            let total: f64 = score_weights(phase).iter().sum();
            assert!((total - 1.0).abs() < 1e-12, "{phase:?}: {total}");
        }
    }

    #[test]
    fn outcome_score_stays_on_scale() {
        for phase in Phase::ALL {
            assert_eq!(outcome_score(phase, 1.0, 0.0, 2.0, 1.0, 1.0), 100.0);
            assert_eq!(outcome_score(phase, 0.0, 1.0, 0.0, 0.0, 0.0), 0.0);
            // Out-of-range inputs clamp instead of escaping the scale.
            assert_eq!(outcome_score(phase, 4.0, -3.0, 50.0, 2.0, 3.0), 100.0);
            assert_eq!(outcome_score(phase, -2.0, 2.0, 0.0, -1.0, -1.0), 0.0);
        }
    }

    #[test]
    fn percentile_picks_nearest_rank() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&sorted, 0.0), 10.0);
        assert_eq!(percentile(&sorted, 50.0), 30.0);
        assert_eq!(percentile(&sorted, 100.0), 50.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
