//! Per-phase allocation targets produced by the optimizer.

use serde::{Deserialize, Serialize};

use super::economy::AssetVector;
use super::phase::Phase;

/// Target allocation for one lifecycle phase: a weight vector over asset
/// classes (sum ≈ 1.0) plus the descriptors estimated from the scenario
/// ensemble the optimizer saw. Created once per analysis run and read-only
/// afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseAllocation {
    pub phase: Phase,
    pub weights: AssetVector,
    pub expected_return: f64,
    pub expected_volatility: f64,
    pub expected_max_drawdown: f64,
}

/// The full set of phase allocations for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseAllocations {
    pub income_now: PhaseAllocation,
    pub income_later: PhaseAllocation,
    pub growth: PhaseAllocation,
    pub legacy: PhaseAllocation,
}

impl PhaseAllocations {
    #[must_use]
    pub fn for_phase(&self, phase: Phase) -> &PhaseAllocation {
        match phase {
            Phase::IncomeNow => &self.income_now,
            Phase::IncomeLater => &self.income_later,
            Phase::Growth => &self.growth,
            Phase::Legacy => &self.legacy,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseAllocation> {
        [
            &self.income_now,
            &self.income_later,
            &self.growth,
            &self.legacy,
        ]
        .into_iter()
    }
}
