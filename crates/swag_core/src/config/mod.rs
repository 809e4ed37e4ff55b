//! Analyzer configuration
//!
//! The main input type is [`HouseholdInput`], which carries everything one
//! analysis run needs. Fields split into three groups:
//!
//! **World assumptions** (things you might vary across runs):
//! - `scenario` — economic model parameters, path count, horizon, seed
//!
//! **Your situation** (fixed facts):
//! - ages, `initial_portfolio`, `holdings`
//!
//! **Your plan** (structure with tunable values):
//! - `cashflow_needs`, `contribution`, `risk`
//!
//! Every optional field carries a serde default, so partial JSON inputs
//! deserialize into the documented baseline. For programmatic construction
//! use the fluent [`HouseholdBuilder`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{
    AssetClass, CreditParams, CryptoParams, EquityParams, InflationParams, InfrastructureParams,
    Phase, PhaseBoundaryOffsets, RateParams,
};

pub mod builder;

pub use builder::HouseholdBuilder;

fn default_n_paths() -> usize {
    1000
}

fn default_horizon_years() -> usize {
    40
}

fn default_master_seed() -> String {
    "default".to_string()
}

fn default_max_drawdown() -> f64 {
    0.20
}

fn default_confidence_level() -> f64 {
    0.90
}

fn default_legacy_goal() -> f64 {
    500_000.0
}

/// Complete input for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdInput {
    pub household_id: String,
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    /// Pooled investable portfolio at the start of the simulation. Must be
    /// positive.
    pub initial_portfolio: f64,
    /// Current positions, informational for reporting and receipts; the
    /// simulator works on the pooled balance plus phase weights.
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub cashflow_needs: Vec<PhaseCashflowNeeds>,
    #[serde(default)]
    pub contribution: ContributionPolicy,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

/// One current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub class: AssetClass,
    pub value: f64,
}

/// A phase-tagged schedule of withdrawal needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseCashflowNeeds {
    pub phase: Phase,
    /// Essential needs feed income-sufficiency scoring the same way as
    /// discretionary ones; the flag is carried for reporting.
    #[serde(default)]
    pub essential: bool,
    /// When set, amounts grow with the path's realized inflation.
    #[serde(default)]
    pub inflation_protected: bool,
    pub schedule: Vec<CashflowNeed>,
}

/// One scheduled withdrawal, indexed by simulation year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowNeed {
    pub year: usize,
    pub amount: f64,
}

/// Working-years contribution policy: each pre-retirement year contributes
/// `min(annual_cap, balance_fraction * balance)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPolicy {
    pub annual_cap: f64,
    pub balance_fraction: f64,
}

impl Default for ContributionPolicy {
    fn default() -> Self {
        Self {
            annual_cap: 25_000.0,
            balance_fraction: 0.10,
        }
    }
}

/// Per-phase risk tolerances and household-level guardrails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Per-phase tolerance in [0, 1]; scales how hard the optimizer tilts.
    #[serde(default)]
    pub epsilon: FxHashMap<Phase, f64>,
    /// Per-phase risk budget in [0, 1]; 0.5 is the neutral midpoint.
    #[serde(default)]
    pub budgets: FxHashMap<Phase, f64>,
    /// Peak-to-trough drawdown guardrail used by DGBP scoring.
    #[serde(default = "default_max_drawdown")]
    pub max_drawdown: f64,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Terminal bequest target used by legacy-confidence scoring.
    #[serde(default = "default_legacy_goal")]
    pub legacy_goal: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        let mut epsilon = FxHashMap::default();
        epsilon.insert(Phase::IncomeNow, 0.10);
        epsilon.insert(Phase::IncomeLater, 0.15);
        epsilon.insert(Phase::Growth, 0.25);
        epsilon.insert(Phase::Legacy, 0.20);

        let mut budgets = FxHashMap::default();
        budgets.insert(Phase::IncomeNow, 0.25);
        budgets.insert(Phase::IncomeLater, 0.40);
        budgets.insert(Phase::Growth, 0.70);
        budgets.insert(Phase::Legacy, 0.45);

        Self {
            epsilon,
            budgets,
            max_drawdown: default_max_drawdown(),
            confidence_level: default_confidence_level(),
            legacy_goal: default_legacy_goal(),
        }
    }
}

/// Economic-model configuration: how many paths, how long, and the parameter
/// set for every driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_n_paths")]
    pub n_paths: usize,
    #[serde(default = "default_horizon_years")]
    pub horizon_years: usize,
    /// Master seed; every per-path, per-driver stream derives from it.
    #[serde(default = "default_master_seed")]
    pub master_seed: String,
    #[serde(default)]
    pub inflation: InflationParams,
    #[serde(default)]
    pub rates: RateParams,
    #[serde(default)]
    pub equity: EquityParams,
    #[serde(default)]
    pub credit: CreditParams,
    #[serde(default)]
    pub infrastructure: InfrastructureParams,
    #[serde(default)]
    pub crypto: CryptoParams,
    #[serde(default)]
    pub ltc: LtcParams,
    #[serde(default)]
    pub longevity: LongevityParams,
    #[serde(default)]
    pub taxes: TaxParams,
    #[serde(default)]
    pub stress: StressParams,
    #[serde(default)]
    pub phase_offsets: PhaseBoundaryOffsets,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            n_paths: default_n_paths(),
            horizon_years: default_horizon_years(),
            master_seed: default_master_seed(),
            inflation: InflationParams::default(),
            rates: RateParams::default(),
            equity: EquityParams::default(),
            credit: CreditParams::default(),
            infrastructure: InfrastructureParams::default(),
            crypto: CryptoParams::default(),
            ltc: LtcParams::default(),
            longevity: LongevityParams::default(),
            taxes: TaxParams::default(),
            stress: StressParams::default(),
            phase_offsets: PhaseBoundaryOffsets::default(),
        }
    }
}

/// Long-term-care shock model: from the onset age, each year draws an
/// independent trigger probability; a trigger charges the base cost grown by
/// realized inflation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LtcParams {
    pub onset_age: u32,
    pub annual_probability: f64,
    pub base_cost: f64,
}

impl Default for LtcParams {
    fn default() -> Self {
        Self {
            onset_age: 75,
            annual_probability: 0.03,
            base_cost: 140_000.0,
        }
    }
}

/// Longevity-shock stress: how many extra years the horizon extends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongevityParams {
    pub extension_years: usize,
}

impl Default for LongevityParams {
    fn default() -> Self {
        Self { extension_years: 5 }
    }
}

/// Simplified tax model: an ordinary-income rate applied to withdrawals and
/// a gains rate applied to positive return dollars. Both rates are
/// illustrative placeholders pending real actuarial inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxParams {
    pub ordinary_rate: f64,
    pub gains_rate: f64,
}

impl Default for TaxParams {
    fn default() -> Self {
        Self {
            ordinary_rate: 0.12,
            gains_rate: 0.05,
        }
    }
}

/// Stress-cohort sizing and transform magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressParams {
    /// Cap on the number of base-case paths simulated.
    pub base_case_cap: usize,
    /// Base scenarios recycled into each stress cohort.
    pub per_stress_paths: usize,
    /// Year-0 equity return forced by `market_crash_early`.
    pub crash_return: f64,
    /// Uniform shift applied by `persistent_inflation`.
    pub inflation_shift: f64,
    /// Years reversed by `sequence_risk`.
    pub sequence_reversal_years: usize,
}

impl Default for StressParams {
    fn default() -> Self {
        Self {
            base_case_cap: 1000,
            per_stress_paths: 100,
            crash_return: -0.35,
            inflation_shift: 0.025,
            sequence_reversal_years: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_documented_defaults() {
        let input: HouseholdInput = serde_json::from_str(
            r#"{
                "household_id": "hh-1",
                "current_age": 45,
                "retirement_age": 67,
                "life_expectancy": 95,
                "initial_portfolio": 1000000.0
            }"#,
        )
        .unwrap();

        assert_eq!(input.scenario.n_paths, 1000);
        assert_eq!(input.scenario.master_seed, "default");
        assert_eq!(input.contribution.annual_cap, 25_000.0);
        assert_eq!(input.risk.epsilon.len(), 4);
        assert_eq!(input.scenario.ltc.onset_age, 75);
        assert_eq!(input.scenario.stress.base_case_cap, 1000);
    }

    #[test]
    fn phase_keyed_maps_serialize_with_string_keys() {
        let risk = RiskConfig::default();
        let json = serde_json::to_string(&risk).unwrap();
        assert!(json.contains("\"income_now\""));
        let back: RiskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.budgets[&Phase::Growth], 0.70);
    }
}
