//! Lifecycle phases and the age-based schedule that assigns them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the four fixed lifecycle phases.
///
/// The phase set is closed: internal call sites match exhaustively and can
/// never see an unknown phase. Externally supplied phase identifiers enter
/// through [`Phase::from_str`], which rejects anything outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    IncomeNow,
    IncomeLater,
    Growth,
    Legacy,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 4] = [
        Phase::IncomeNow,
        Phase::IncomeLater,
        Phase::Growth,
        Phase::Legacy,
    ];

    /// Stable snake_case identifier, matching the serde representation.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Phase::IncomeNow => "income_now",
            Phase::IncomeLater => "income_later",
            Phase::Growth => "growth",
            Phase::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income_now" => Ok(Phase::IncomeNow),
            "income_later" => Ok(Phase::IncomeLater),
            "growth" => Ok(Phase::Growth),
            "legacy" => Ok(Phase::Legacy),
            other => Err(ConfigError::UnknownPhase(other.to_string())),
        }
    }
}

/// Year offsets that position the phase transitions relative to the
/// household's ages. The stock values (+2, +12, retirement+15) follow the
/// planning methodology defaults and are kept configurable rather than
/// hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBoundaryOffsets {
    /// Years after the current age at which Income-Now hands off to Income-Later.
    pub income_later_years: u32,
    /// Years after the current age at which Income-Later hands off to Growth.
    pub growth_years: u32,
    /// Years after the retirement age at which Growth hands off to Legacy.
    pub legacy_years_after_retirement: u32,
}

impl Default for PhaseBoundaryOffsets {
    fn default() -> Self {
        Self {
            income_later_years: 2,
            growth_years: 12,
            legacy_years_after_retirement: 15,
        }
    }
}

/// Resolved phase-transition ages for one household.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSchedule {
    pub current_age: u32,
    /// Age at which Income-Later begins.
    pub income_later_age: u32,
    /// Age at which Growth begins.
    pub growth_age: u32,
    /// Age at which Legacy begins.
    pub legacy_age: u32,
}

impl PhaseSchedule {
    #[must_use]
    pub fn new(current_age: u32, retirement_age: u32, offsets: &PhaseBoundaryOffsets) -> Self {
        Self {
            current_age,
            income_later_age: current_age + offsets.income_later_years,
            growth_age: current_age + offsets.growth_years,
            legacy_age: retirement_age + offsets.legacy_years_after_retirement,
        }
    }

    /// Phase active at a given age.
    #[must_use]
    pub fn phase_at_age(&self, age: u32) -> Phase {
        if age < self.income_later_age {
            Phase::IncomeNow
        } else if age < self.growth_age {
            Phase::IncomeLater
        } else if age < self.legacy_age {
            Phase::Growth
        } else {
            Phase::Legacy
        }
    }

    /// Half-open `[start, end)` simulation-year window a phase occupies,
    /// clamped to the simulation horizon. Windows can be empty when the
    /// schedule places a transition past the horizon.
    #[must_use]
    pub fn window(&self, phase: Phase, horizon_years: usize) -> (usize, usize) {
        let to_year = |age: u32| -> usize {
            age.saturating_sub(self.current_age) as usize
        };
        let (start, end) = match phase {
            Phase::IncomeNow => (0, to_year(self.income_later_age)),
            Phase::IncomeLater => (to_year(self.income_later_age), to_year(self.growth_age)),
            Phase::Growth => (to_year(self.growth_age), to_year(self.legacy_age)),
            Phase::Legacy => (to_year(self.legacy_age), horizon_years),
        };
        (start.min(horizon_years), end.min(horizon_years))
    }
}
