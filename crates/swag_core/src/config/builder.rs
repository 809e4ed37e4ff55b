//! Household input builder
//!
//! Fluent API for assembling a [`HouseholdInput`] without hand-writing the
//! nested config structs.
//!
//! # Example
//!
//! ```ignore
//! use swag_core::config::HouseholdBuilder;
//! use swag_core::model::{AssetClass, Phase};
//!
//! let input = HouseholdBuilder::new("hh-42")
//!     .ages(52, 65, 92)
//!     .initial_portfolio(2_400_000.0)
//!     .holding("VTI", AssetClass::Equity, 1_400_000.0)
//!     .holding("BND", AssetClass::Credit, 700_000.0)
//!     .essential_need(Phase::Growth, 13..=27, 84_000.0)
//!     .budget(Phase::Growth, 0.65)
//!     .paths(2_000)
//!     .master_seed("hh-42-2026q1")
//!     .build();
//! ```

use std::ops::RangeInclusive;

use super::{
    CashflowNeed, ContributionPolicy, Holding, HouseholdInput, LtcParams, PhaseCashflowNeeds,
    RiskConfig, ScenarioConfig, StressParams, TaxParams,
};
use crate::model::{AssetClass, Phase};

/// Builder for [`HouseholdInput`] with sensible baseline values.
pub struct HouseholdBuilder {
    input: HouseholdInput,
    horizon_override: Option<usize>,
}

impl HouseholdBuilder {
    /// Start from the baseline household: ages 45/67/95, a $1.25M pooled
    /// portfolio, default risk budgets, and default economic parameters.
    #[must_use]
    pub fn new(household_id: impl Into<String>) -> Self {
        Self {
            input: HouseholdInput {
                household_id: household_id.into(),
                current_age: 45,
                retirement_age: 67,
                life_expectancy: 95,
                initial_portfolio: 1_250_000.0,
                holdings: Vec::new(),
                cashflow_needs: Vec::new(),
                contribution: ContributionPolicy::default(),
                risk: RiskConfig::default(),
                scenario: ScenarioConfig::default(),
            },
            horizon_override: None,
        }
    }

    // =========================================================================
    // Situation
    // =========================================================================

    #[must_use]
    pub fn current_age(mut self, age: u32) -> Self {
        self.input.current_age = age;
        self
    }

    #[must_use]
    pub fn retirement_age(mut self, age: u32) -> Self {
        self.input.retirement_age = age;
        self
    }

    #[must_use]
    pub fn life_expectancy(mut self, age: u32) -> Self {
        self.input.life_expectancy = age;
        self
    }

    /// Set current, retirement, and life-expectancy ages in one call.
    #[must_use]
    pub fn ages(self, current: u32, retirement: u32, life_expectancy: u32) -> Self {
        self.current_age(current)
            .retirement_age(retirement)
            .life_expectancy(life_expectancy)
    }

    #[must_use]
    pub fn initial_portfolio(mut self, value: f64) -> Self {
        self.input.initial_portfolio = value;
        self
    }

    #[must_use]
    pub fn holding(mut self, symbol: impl Into<String>, class: AssetClass, value: f64) -> Self {
        self.input.holdings.push(Holding {
            symbol: symbol.into(),
            class,
            value,
        });
        self
    }

    // =========================================================================
    // Plan
    // =========================================================================

    /// Add a raw needs schedule.
    #[must_use]
    pub fn need_schedule(mut self, needs: PhaseCashflowNeeds) -> Self {
        self.input.cashflow_needs.push(needs);
        self
    }

    /// Add an essential, inflation-protected annual need across a year range.
    #[must_use]
    pub fn essential_need(
        self,
        phase: Phase,
        years: RangeInclusive<usize>,
        annual_amount: f64,
    ) -> Self {
        self.annual_need(phase, years, annual_amount, true, true)
    }

    /// Add a discretionary, nominal-dollar annual need across a year range.
    #[must_use]
    pub fn discretionary_need(
        self,
        phase: Phase,
        years: RangeInclusive<usize>,
        annual_amount: f64,
    ) -> Self {
        self.annual_need(phase, years, annual_amount, false, false)
    }

    #[must_use]
    pub fn annual_need(
        mut self,
        phase: Phase,
        years: RangeInclusive<usize>,
        annual_amount: f64,
        essential: bool,
        inflation_protected: bool,
    ) -> Self {
        let schedule = years
            .map(|year| CashflowNeed {
                year,
                amount: annual_amount,
            })
            .collect();
        self.input.cashflow_needs.push(PhaseCashflowNeeds {
            phase,
            essential,
            inflation_protected,
            schedule,
        });
        self
    }

    #[must_use]
    pub fn contribution(mut self, annual_cap: f64, balance_fraction: f64) -> Self {
        self.input.contribution = ContributionPolicy {
            annual_cap,
            balance_fraction,
        };
        self
    }

    // =========================================================================
    // Risk
    // =========================================================================

    #[must_use]
    pub fn epsilon(mut self, phase: Phase, value: f64) -> Self {
        self.input.risk.epsilon.insert(phase, value);
        self
    }

    #[must_use]
    pub fn budget(mut self, phase: Phase, value: f64) -> Self {
        self.input.risk.budgets.insert(phase, value);
        self
    }

    #[must_use]
    pub fn max_drawdown(mut self, value: f64) -> Self {
        self.input.risk.max_drawdown = value;
        self
    }

    #[must_use]
    pub fn confidence_level(mut self, value: f64) -> Self {
        self.input.risk.confidence_level = value;
        self
    }

    #[must_use]
    pub fn legacy_goal(mut self, value: f64) -> Self {
        self.input.risk.legacy_goal = value;
        self
    }

    // =========================================================================
    // Scenario
    // =========================================================================

    #[must_use]
    pub fn paths(mut self, n_paths: usize) -> Self {
        self.input.scenario.n_paths = n_paths;
        self
    }

    /// Override the simulation horizon. Without this the horizon is derived
    /// from the ages (`life_expectancy - current_age`).
    #[must_use]
    pub fn horizon_years(mut self, years: usize) -> Self {
        self.horizon_override = Some(years);
        self
    }

    #[must_use]
    pub fn master_seed(mut self, seed: impl Into<String>) -> Self {
        self.input.scenario.master_seed = seed.into();
        self
    }

    /// Replace the whole economic-scenario configuration.
    #[must_use]
    pub fn scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.input.scenario = scenario;
        self
    }

    #[must_use]
    pub fn ltc(mut self, params: LtcParams) -> Self {
        self.input.scenario.ltc = params;
        self
    }

    #[must_use]
    pub fn taxes(mut self, params: TaxParams) -> Self {
        self.input.scenario.taxes = params;
        self
    }

    #[must_use]
    pub fn stress(mut self, params: StressParams) -> Self {
        self.input.scenario.stress = params;
        self
    }

    // =========================================================================
    // Baseline plan
    // =========================================================================

    /// Populate holdings and a retirement spending plan consistent with the
    /// builder's current ages: essential inflation-protected income from
    /// retirement to end of horizon, plus a discretionary early-retirement
    /// travel budget.
    #[must_use]
    pub fn with_default_plan(self) -> Self {
        let current = self.input.current_age;
        let retirement = self.input.retirement_age;
        let life = self.input.life_expectancy;
        let legacy_offset = self
            .input
            .scenario
            .phase_offsets
            .legacy_years_after_retirement;

        let retirement_year = retirement.saturating_sub(current) as usize;
        let legacy_year = (retirement + legacy_offset).saturating_sub(current) as usize;
        let last_year = (life.saturating_sub(current) as usize).saturating_sub(1);

        let mut builder = self
            .holding("VTI", AssetClass::Equity, 600_000.0)
            .holding("BND", AssetClass::Credit, 350_000.0)
            .holding("IGF", AssetClass::Infrastructure, 150_000.0)
            .holding("BTC", AssetClass::Crypto, 50_000.0)
            .holding("CASH", AssetClass::Cash, 100_000.0);

        if retirement_year < legacy_year && legacy_year <= last_year {
            builder = builder
                .essential_need(Phase::Growth, retirement_year..=legacy_year - 1, 60_000.0)
                .essential_need(Phase::Legacy, legacy_year..=last_year, 60_000.0)
                .discretionary_need(
                    Phase::Growth,
                    retirement_year..=(retirement_year + 7).min(last_year),
                    15_000.0,
                );
        } else if retirement_year <= last_year {
            builder = builder.essential_need(Phase::Legacy, retirement_year..=last_year, 60_000.0);
        }

        builder
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Finalize the input. The horizon defaults to the span between the
    /// current age and life expectancy unless explicitly overridden.
    #[must_use]
    pub fn build(mut self) -> HouseholdInput {
        let derived = self
            .input
            .life_expectancy
            .saturating_sub(self.input.current_age) as usize;
        self.input.scenario.horizon_years = self.horizon_override.unwrap_or(derived.max(1));
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_derives_horizon_from_ages() {
        let input = HouseholdBuilder::new("hh-1").ages(45, 67, 95).build();
        assert_eq!(input.scenario.horizon_years, 50);
    }

    #[test]
    fn explicit_horizon_wins_over_derivation() {
        let input = HouseholdBuilder::new("hh-1").horizon_years(12).build();
        assert_eq!(input.scenario.horizon_years, 12);
    }

    #[test]
    fn default_plan_schedules_spending_from_retirement() {
        let input = HouseholdBuilder::new("hh-1").with_default_plan().build();
        assert_eq!(input.holdings.len(), 5);

        let first_need_year = input
            .cashflow_needs
            .iter()
            .flat_map(|g| g.schedule.iter().map(|n| n.year))
            .min()
            .unwrap();
        assert_eq!(first_need_year, 22);

        let last_need_year = input
            .cashflow_needs
            .iter()
            .flat_map(|g| g.schedule.iter().map(|n| n.year))
            .max()
            .unwrap();
        assert_eq!(last_need_year, 49);
    }
}
