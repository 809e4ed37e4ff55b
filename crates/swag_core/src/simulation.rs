//! Cashflow path simulation
//!
//! Walks one household through one economic scenario, year by year:
//! contributions while working, inflation-adjusted scheduled withdrawals in
//! retirement, long-term-care shocks past the onset age, simplified taxes,
//! and investment growth at the active phase's allocation. Simulation stops
//! early when the balance is depleted.
//!
//! # Example
//!
//! ```ignore
//! use swag_core::simulation::{PathOptions, SimulationContext, simulate_path};
//!
//! let ctx = SimulationContext::new(&input, &allocations);
//! let mut rng = swag_core::rng::driver_rng("default", "path0_ltc");
//! let (records, metrics) =
//!     simulate_path(&ctx, &scenario, PathOptions::default(), &mut rng);
//! assert_eq!(records.len(), scenario.horizon());
//! assert!(metrics.success);
//! ```

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::config::HouseholdInput;
use crate::model::{
    CashflowRecord, EconomicScenario, FinalMetrics, PhaseAllocations, PhaseSchedule,
};

/// One scheduled outflow in a given simulation year.
#[derive(Debug, Clone)]
struct ScheduledNeed {
    amount: f64,
    inflation_protected: bool,
}

/// Per-path simulation switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOptions {
    /// Force a long-term-care event at the first eligible age instead of
    /// waiting for a random draw.
    pub force_ltc: bool,
}

/// Precomputed state shared by every path simulated for one household.
pub struct SimulationContext<'a> {
    input: &'a HouseholdInput,
    allocations: &'a PhaseAllocations,
    schedule: PhaseSchedule,
    needs_by_year: FxHashMap<usize, Vec<ScheduledNeed>>,
}

impl<'a> SimulationContext<'a> {
    pub fn new(input: &'a HouseholdInput, allocations: &'a PhaseAllocations) -> Self {
        let schedule = PhaseSchedule::new(
            input.current_age,
            input.retirement_age,
            &input.scenario.phase_offsets,
        );

        let mut needs_by_year: FxHashMap<usize, Vec<ScheduledNeed>> = FxHashMap::default();
        for group in &input.cashflow_needs {
            for need in &group.schedule {
                needs_by_year.entry(need.year).or_default().push(ScheduledNeed {
                    amount: need.amount,
                    inflation_protected: group.inflation_protected,
                });
            }
        }

        Self {
            input,
            allocations,
            schedule,
            needs_by_year,
        }
    }

    pub fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    /// Carry the final scheduled year's needs forward for `extra_years`.
    ///
    /// Horizon-extension stresses use this so that living longer means
    /// spending longer rather than coasting through need-free years.
    pub fn extend_final_needs(&mut self, extra_years: usize) {
        let Some(&last_year) = self.needs_by_year.keys().max() else {
            return;
        };
        let carried = self.needs_by_year[&last_year].clone();
        for offset in 1..=extra_years {
            self.needs_by_year.insert(last_year + offset, carried.clone());
        }
    }

    /// Total nominal need in `year`, with inflation-protected amounts grown
    /// by the path's cumulative inflation.
    fn nominal_need(&self, year: usize, cumulative_inflation: f64) -> f64 {
        self.needs_by_year
            .get(&year)
            .map(|needs| {
                needs
                    .iter()
                    .map(|need| {
                        if need.inflation_protected {
                            need.amount * cumulative_inflation
                        } else {
                            need.amount
                        }
                    })
                    .sum()
            })
            .unwrap_or(0.0)
    }
}

/// Simulate one path.
///
/// Yearly ordering: contributions are added, the scheduled need is priced in
/// nominal dollars, care costs and taxes come off the top, the withdrawal is
/// capped at what remains, and the surviving balance grows at the phase
/// allocation's return. The loop exits after the first year that ends at
/// zero, and `years_to_depletion` records how many years the money lasted.
pub fn simulate_path<R: Rng + ?Sized>(
    ctx: &SimulationContext<'_>,
    scenario: &EconomicScenario,
    options: PathOptions,
    rng: &mut R,
) -> (Vec<CashflowRecord>, FinalMetrics) {
    let input = ctx.input;
    let ltc = &input.scenario.ltc;
    let taxes = &input.scenario.taxes;
    let forced_ltc_age = ltc.onset_age.max(input.current_age);

    let horizon = scenario.horizon();
    let mut records = Vec::with_capacity(horizon);
    let mut balance = input.initial_portfolio;
    let mut prior_gain: f64 = 0.0;
    let mut total_withdrawals = 0.0;
    let mut years_to_depletion = None;

    for year in 0..horizon {
        let age = input.current_age + year as u32;
        let phase = ctx.schedule.phase_at_age(age);
        let allocation = ctx.allocations.for_phase(phase);
        let beginning_balance = balance;

        let contributions = if age < input.retirement_age {
            input
                .contribution
                .annual_cap
                .min(input.contribution.balance_fraction * beginning_balance)
        } else {
            0.0
        };

        let cumulative_inflation = scenario.cumulative_inflation(year);
        // Scheduled needs are withdrawal events; they only fire once retired.
        let scheduled_need = if age >= input.retirement_age {
            ctx.nominal_need(year, cumulative_inflation)
        } else {
            0.0
        };

        // The event draw happens every eligible year so that forced-event
        // paths consume the same random stream as their base counterparts.
        let mut ltc_event = false;
        if age >= ltc.onset_age {
            ltc_event = rng.random::<f64>() < ltc.annual_probability;
        }
        if options.force_ltc && age == forced_ltc_age {
            ltc_event = true;
        }
        let ltc_costs = if ltc_event {
            ltc.base_cost * cumulative_inflation
        } else {
            0.0
        };

        // Withdrawal taxes are assessed on the scheduled amount so that a
        // shortfall year still shows its full tax drag; gains tax trails the
        // prior year's realized growth.
        let tax_due =
            taxes.ordinary_rate * scheduled_need + taxes.gains_rate * prior_gain.max(0.0);

        let available = (beginning_balance + contributions - ltc_costs - tax_due).max(0.0);
        let withdrawals = scheduled_need.min(available);
        total_withdrawals += withdrawals;

        let net =
            (beginning_balance + contributions - withdrawals - ltc_costs - tax_due).max(0.0);
        let portfolio_return = allocation.weights.dot(&scenario.year_returns(year));
        let investment_return = net * portfolio_return;
        let ending_balance = (net * (1.0 + portfolio_return)).max(0.0);

        records.push(CashflowRecord {
            year,
            age,
            phase,
            beginning_balance,
            contributions,
            scheduled_need,
            withdrawals,
            taxes: tax_due,
            ltc_costs,
            investment_return,
            ending_balance,
            allocation: allocation.weights.scale(ending_balance),
        });

        prior_gain = investment_return;
        balance = ending_balance;

        if ending_balance <= 0.0 {
            years_to_depletion = Some(year + 1);
            break;
        }
    }

    let terminal_value = records.last().map(|r| r.ending_balance).unwrap_or(0.0);
    let metrics = FinalMetrics {
        terminal_value,
        total_withdrawals,
        success: years_to_depletion.is_none(),
        years_to_depletion,
    };

    (records, metrics)
}
