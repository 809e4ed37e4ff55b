//! Ongoing-plan monitoring
//!
//! Lightweight checks run between full analyses: compare observed metrics
//! against a threshold policy, decide whether a drawdown has become a
//! confirmed breach, and stage how quickly risk comes back on after one.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Threshold names ending in this suffix are floors; everything else is a
/// ceiling.
pub const FLOOR_SUFFIX: &str = "_floor";

/// Drawdown z-score at which a breach is considered material.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// Days a drawdown must persist before it is a confirmed breach.
pub const DEFAULT_MIN_DAYS: u32 = 10;

// =============================================================================
// Threshold evaluation
// =============================================================================

/// Evaluate observed metrics against a named threshold policy.
///
/// A `"<metric>_floor"` entry breaches when the metric falls below its
/// bound; any other entry breaches when the metric reaches or exceeds it.
/// Metrics absent from the observation never breach. The returned names are
/// sorted for stable output.
pub fn evaluate_thresholds(
    metrics: &FxHashMap<String, f64>,
    policy: &FxHashMap<String, f64>,
) -> Vec<String> {
    let mut names: Vec<&String> = policy.keys().collect();
    names.sort();

    let mut breached = Vec::new();
    for name in names {
        let bound = policy[name];
        let metric_name = name.strip_suffix(FLOOR_SUFFIX).unwrap_or(name);
        let Some(&value) = metrics.get(metric_name) else {
            continue;
        };
        let hit = if name.ends_with(FLOOR_SUFFIX) {
            value < bound
        } else {
            value >= bound
        };
        if hit {
            breached.push(name.clone());
        }
    }
    breached
}

// =============================================================================
// Breach state
// =============================================================================

/// Observed drawdown severity and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownSignal {
    /// How many standard deviations the current drawdown sits from normal.
    pub zscore: f64,
    pub days_in_drawdown: u32,
}

/// A drawdown is a confirmed breach only when it is both severe and
/// persistent.
pub fn breach_state(signal: &DrawdownSignal, z_threshold: f64, min_days: u32) -> bool {
    signal.zscore >= z_threshold && signal.days_in_drawdown >= min_days
}

// =============================================================================
// Re-risking
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    Recovery,
    Expansion,
    Contraction,
    Neutral,
}

/// Market backdrop for a re-risking decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Annualized volatility of the broad market.
    pub volatility: f64,
    /// Fraction of constituents above their long-term trend.
    pub breadth: f64,
    pub regime: MarketRegime,
}

/// Conditions and step sizes for adding risk back after a breach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReRiskPolicy {
    /// Volatility at or below which any re-risking is allowed.
    pub calm_volatility: f64,
    /// Breadth at or above which the larger recovery step unlocks.
    pub healthy_breadth: f64,
    pub conservative_add_pct: f64,
    pub recovery_add_pct: f64,
}

impl Default for ReRiskPolicy {
    fn default() -> Self {
        Self {
            calm_volatility: 0.15,
            healthy_breadth: 0.55,
            conservative_add_pct: 0.10,
            recovery_add_pct: 0.15,
        }
    }
}

/// One increment of risk to restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReRiskStage {
    pub add_pct: f64,
}

/// Stage the return of risk exposure, smallest step first.
///
/// Stages are cumulative: each `add_pct` applies on top of the previous
/// stages. Calm volatility together with healthy breadth unlocks the
/// conservative step; an explicit recovery regime unlocks the larger second
/// step on top of it.
pub fn re_risk_stages(state: &MarketState, policy: &ReRiskPolicy) -> Vec<ReRiskStage> {
    let mut stages = Vec::new();
    if state.volatility <= policy.calm_volatility && state.breadth >= policy.healthy_breadth {
        stages.push(ReRiskStage {
            add_pct: policy.conservative_add_pct,
        });
        if state.regime == MarketRegime::Recovery {
            stages.push(ReRiskStage {
                add_pct: policy.recovery_add_pct,
            });
        }
    }
    stages
}

/// Total exposure restored by a staged plan.
pub fn total_add_pct(stages: &[ReRiskStage]) -> f64 {
    stages.iter().map(|s| s.add_pct).sum()
}
