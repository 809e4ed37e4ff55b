//! Stress scenario orchestration
//!
//! Runs the base-case cohort plus the requested stress cohorts and collects
//! every simulated path into one result set. Stresses never mutate the base
//! scenarios: each transform copies a path with one override applied, so the
//! base cohort and its stressed variants stay comparable draw for draw.
//!
//! The stresses:
//! - `market_crash_early`: first-year equity return replaced with a crash
//! - `persistent_inflation`: every year's inflation shifted up
//! - `longevity_shock`: paths regenerated at an extended horizon, with the
//!   final year's scheduled needs carried forward
//! - `ltc_event`: a long-term-care event forced at the first eligible age
//! - `sequence_risk`: the first years of equity returns reversed in place

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::analyzer::AnalysisProgress;
use crate::config::{HouseholdInput, StressParams};
use crate::error::AnalyzerError;
use crate::generate::generate_scenario_with_horizon;
use crate::model::{EconomicScenario, PathResult, PhaseAllocations, ScenarioKind};
use crate::rng::driver_rng;
use crate::simulation::{PathOptions, SimulationContext, simulate_path};

/// Copy a scenario with the named stress applied.
///
/// Horizon extension and forced care events are handled by the orchestrator
/// rather than by a scenario transform, so those kinds pass through
/// unchanged, as does the base case.
pub fn apply_stress(
    kind: ScenarioKind,
    scenario: &EconomicScenario,
    params: &StressParams,
) -> EconomicScenario {
    match kind {
        ScenarioKind::MarketCrashEarly => scenario.with_equity_return(0, params.crash_return),
        ScenarioKind::PersistentInflation => scenario.with_inflation_shift(params.inflation_shift),
        ScenarioKind::SequenceRisk => {
            scenario.with_reversed_equity_prefix(params.sequence_reversal_years)
        }
        ScenarioKind::BaseCase | ScenarioKind::LongevityShock | ScenarioKind::LtcEvent => {
            scenario.clone()
        }
    }
}

fn simulate_cohort(
    ctx: &SimulationContext<'_>,
    kind: ScenarioKind,
    cohort: &[EconomicScenario],
    options: PathOptions,
    master_seed: &str,
    progress: Option<&AnalysisProgress>,
) -> Result<Vec<PathResult>, AnalyzerError> {
    let run_one = |path_index: usize,
                   scenario: &EconomicScenario|
     -> Result<PathResult, AnalyzerError> {
        if progress.is_some_and(AnalysisProgress::is_cancelled) {
            return Err(AnalyzerError::Cancelled);
        }
        // The care-event stream is keyed by path index only, so a path and
        // its stressed variants draw identical event years.
        let mut rng = driver_rng(master_seed, &format!("path{path_index}_ltc"));
        let (records, final_metrics) = simulate_path(ctx, scenario, options, &mut rng);
        if let Some(progress) = progress {
            progress.complete_one();
        }
        Ok(PathResult {
            scenario: kind,
            path_index,
            records,
            final_metrics,
        })
    };

    #[cfg(feature = "parallel")]
    {
        cohort
            .par_iter()
            .enumerate()
            .map(|(path_index, scenario)| run_one(path_index, scenario))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        cohort
            .iter()
            .enumerate()
            .map(|(path_index, scenario)| run_one(path_index, scenario))
            .collect()
    }
}

/// Number of paths each cohort of the suite will simulate, given the size of
/// the generated ensemble. Used to size progress reporting up front.
pub fn suite_path_count(
    params: &StressParams,
    ensemble_size: usize,
    stresses: &[ScenarioKind],
) -> usize {
    let base = ensemble_size.min(params.base_case_cap);
    let per_stress = ensemble_size.min(params.per_stress_paths);
    let stress_cohorts = stresses
        .iter()
        .filter(|&&kind| kind != ScenarioKind::BaseCase)
        .count();
    base + per_stress * stress_cohorts
}

/// Run the base case and the requested stresses over a generated ensemble.
///
/// The base case simulates up to `base_case_cap` paths; each stress recycles
/// the first `per_stress_paths` paths of the same ensemble. Every cohort
/// contributes at least one [`PathResult`] whenever the ensemble is
/// non-empty.
pub fn run_stress_suite(
    input: &HouseholdInput,
    allocations: &PhaseAllocations,
    scenarios: &[EconomicScenario],
    stresses: &[ScenarioKind],
    progress: Option<&AnalysisProgress>,
) -> Result<Vec<PathResult>, AnalyzerError> {
    let params = &input.scenario.stress;
    let seed = input.scenario.master_seed.as_str();
    let ctx = SimulationContext::new(input, allocations);

    let mut results = Vec::new();

    let base_count = scenarios.len().min(params.base_case_cap);
    debug!(scenario = %ScenarioKind::BaseCase, paths = base_count, "simulating cohort");
    results.extend(simulate_cohort(
        &ctx,
        ScenarioKind::BaseCase,
        &scenarios[..base_count],
        PathOptions::default(),
        seed,
        progress,
    )?);

    let stress_count = scenarios.len().min(params.per_stress_paths);
    for &kind in stresses {
        if kind == ScenarioKind::BaseCase {
            continue;
        }
        debug!(scenario = %kind, paths = stress_count, "simulating cohort");

        match kind {
            ScenarioKind::LongevityShock => {
                let extension = input.scenario.longevity.extension_years;
                let extended_horizon = input.scenario.horizon_years + extension;
                let cohort = (0..stress_count)
                    .map(|path_index| {
                        generate_scenario_with_horizon(
                            &input.scenario,
                            path_index,
                            extended_horizon,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let mut extended_ctx = SimulationContext::new(input, allocations);
                extended_ctx.extend_final_needs(extension);
                results.extend(simulate_cohort(
                    &extended_ctx,
                    kind,
                    &cohort,
                    PathOptions::default(),
                    seed,
                    progress,
                )?);
            }
            ScenarioKind::LtcEvent => {
                results.extend(simulate_cohort(
                    &ctx,
                    kind,
                    &scenarios[..stress_count],
                    PathOptions { force_ltc: true },
                    seed,
                    progress,
                )?);
            }
            _ => {
                let cohort: Vec<EconomicScenario> = scenarios[..stress_count]
                    .iter()
                    .map(|scenario| apply_stress(kind, scenario, params))
                    .collect();
                results.extend(simulate_cohort(
                    &ctx,
                    kind,
                    &cohort,
                    PathOptions::default(),
                    seed,
                    progress,
                )?);
            }
        }
    }

    Ok(results)
}
