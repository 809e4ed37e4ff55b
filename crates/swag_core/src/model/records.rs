//! Per-path simulation output: cashflow ledgers, terminal metrics, and the
//! cohort tags the stress orchestrator stamps on every run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::economy::AssetVector;
use super::phase::Phase;
use crate::error::ConfigError;

/// Cohort tag carried by every [`PathResult`]: either the base case or one of
/// the five named stress transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    BaseCase,
    MarketCrashEarly,
    PersistentInflation,
    LongevityShock,
    LtcEvent,
    SequenceRisk,
}

impl ScenarioKind {
    /// The five stress variants, in the order the orchestrator runs them.
    pub const STRESSES: [ScenarioKind; 5] = [
        ScenarioKind::MarketCrashEarly,
        ScenarioKind::PersistentInflation,
        ScenarioKind::LongevityShock,
        ScenarioKind::LtcEvent,
        ScenarioKind::SequenceRisk,
    ];

    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::BaseCase => "base_case",
            ScenarioKind::MarketCrashEarly => "market_crash_early",
            ScenarioKind::PersistentInflation => "persistent_inflation",
            ScenarioKind::LongevityShock => "longevity_shock",
            ScenarioKind::LtcEvent => "ltc_event",
            ScenarioKind::SequenceRisk => "sequence_risk",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base_case" => Ok(ScenarioKind::BaseCase),
            "market_crash_early" => Ok(ScenarioKind::MarketCrashEarly),
            "persistent_inflation" => Ok(ScenarioKind::PersistentInflation),
            "longevity_shock" => Ok(ScenarioKind::LongevityShock),
            "ltc_event" => Ok(ScenarioKind::LtcEvent),
            "sequence_risk" => Ok(ScenarioKind::SequenceRisk),
            other => Err(ConfigError::UnknownStressScenario(other.to_string())),
        }
    }
}

/// One simulated year within one path. Records form an append-only sequence
/// per path; the sequence truncates early when the portfolio depletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRecord {
    pub year: usize,
    pub age: u32,
    pub phase: Phase,
    pub beginning_balance: f64,
    pub contributions: f64,
    /// Inflation-adjusted amount the schedule asked for this year.
    pub scheduled_need: f64,
    /// Amount actually withdrawn; falls short of `scheduled_need` when the
    /// portfolio cannot cover it.
    pub withdrawals: f64,
    pub taxes: f64,
    pub ltc_costs: f64,
    /// Dollar growth applied after net flows.
    pub investment_return: f64,
    pub ending_balance: f64,
    /// Dollar allocation snapshot at year end.
    pub allocation: AssetVector,
}

impl CashflowRecord {
    /// Whether this year's scheduled need was met in full.
    #[must_use]
    pub fn need_met(&self) -> bool {
        self.withdrawals + 1e-9 >= self.scheduled_need
    }
}

/// Terminal metrics derived from the last record of a (possibly truncated)
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalMetrics {
    pub terminal_value: f64,
    pub total_withdrawals: f64,
    /// False when the portfolio depleted before the end of the horizon.
    pub success: bool,
    /// Years simulated before depletion, when it occurred.
    pub years_to_depletion: Option<usize>,
}

/// Result of simulating one (scenario, stress-variant) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub scenario: ScenarioKind,
    /// Index of the base scenario this run consumed; stress cohorts recycle
    /// base indices, so `(scenario, path_index)` identifies a run.
    pub path_index: usize,
    pub records: Vec<CashflowRecord>,
    pub final_metrics: FinalMetrics,
}

impl PathResult {
    /// Records whose simulation year falls in the half-open window.
    pub fn records_in_window(
        &self,
        window: (usize, usize),
    ) -> impl Iterator<Item = &CashflowRecord> {
        self.records
            .iter()
            .filter(move |r| r.year >= window.0 && r.year < window.1)
    }

    /// Whether the path produced no record at or after the given year
    /// (depleted before reaching it).
    #[must_use]
    pub fn truncated_before(&self, year: usize) -> bool {
        self.records.last().is_none_or(|r| r.year < year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_kind_round_trips_through_names() {
        for kind in ScenarioKind::STRESSES {
            assert_eq!(kind.name().parse::<ScenarioKind>(), Ok(kind));
        }
        assert_eq!("base_case".parse::<ScenarioKind>(), Ok(ScenarioKind::BaseCase));
        assert!(matches!(
            "volmageddon".parse::<ScenarioKind>(),
            Err(ConfigError::UnknownStressScenario(_))
        ));
    }
}
