//! Phase allocation optimization
//!
//! Produces one asset mix per planning phase from the household's risk
//! budgets. Each phase starts from a characteristic base mix and is tilted
//! toward or away from growth assets by the phase's risk budget, scaled by
//! its shortfall tolerance. Expected-return, volatility, and drawdown
//! descriptors are estimated against the generated scenario ensemble.
//!
//! # Example
//!
//! ```ignore
//! use swag_core::allocation::optimize_all;
//! use swag_core::config::{RiskConfig, ScenarioConfig};
//! use swag_core::generate::generate_ensemble;
//!
//! let scenarios = generate_ensemble(&ScenarioConfig::default(), 200)?;
//! let allocations = optimize_all(&RiskConfig::default(), &scenarios)?;
//! assert!(allocations.growth.weights.equity > allocations.income_now.weights.equity);
//! ```

use crate::config::RiskConfig;
use crate::error::{AnalyzerError, ValidationError};
use crate::model::{
    AssetClass, AssetVector, EconomicScenario, Phase, PhaseAllocation, PhaseAllocations,
};

/// Scenarios sampled when estimating the per-phase drawdown descriptor.
const DRAWDOWN_SAMPLE_PATHS: usize = 50;

// =============================================================================
// Base mixes
// =============================================================================

/// Characteristic pre-tilt mix for a phase.
///
/// Equity exposure steps up from Income-Now through Growth, then eases back
/// for Legacy, which leans on credit and infrastructure for durable income.
fn base_mix(phase: Phase) -> AssetVector {
    match phase {
        Phase::IncomeNow => AssetVector {
            equity: 0.15,
            credit: 0.35,
            infrastructure: 0.10,
            crypto: 0.00,
            cash: 0.40,
        },
        Phase::IncomeLater => AssetVector {
            equity: 0.30,
            credit: 0.35,
            infrastructure: 0.15,
            crypto: 0.02,
            cash: 0.18,
        },
        Phase::Growth => AssetVector {
            equity: 0.55,
            credit: 0.15,
            infrastructure: 0.15,
            crypto: 0.05,
            cash: 0.10,
        },
        Phase::Legacy => AssetVector {
            equity: 0.35,
            credit: 0.30,
            infrastructure: 0.25,
            crypto: 0.02,
            cash: 0.08,
        },
    }
}

/// Move weight between the defensive legs (cash, credit) and the growth legs
/// (equity, crypto). A positive shift adds risk; a negative shift sheds it.
/// Total weight is conserved.
fn apply_risk_tilt(mix: &mut AssetVector, shift: f64) {
    if shift > 0.0 {
        let defensive = mix.cash + mix.credit;
        if defensive <= 0.0 {
            return;
        }
        let take = shift.min(defensive);
        mix.cash -= take * (mix.cash / defensive);
        mix.credit -= take * (mix.credit / defensive);
        mix.equity += take * 0.8;
        mix.crypto += take * 0.2;
    } else if shift < 0.0 {
        let growth = mix.equity + mix.crypto;
        if growth <= 0.0 {
            return;
        }
        let take = (-shift).min(growth);
        mix.equity -= take * (mix.equity / growth);
        mix.crypto -= take * (mix.crypto / growth);
        mix.cash += take * 0.6;
        mix.credit += take * 0.4;
    }
}

// =============================================================================
// Scenario moments
// =============================================================================

struct ClassMoments {
    mean: AssetVector,
    std_dev: AssetVector,
}

fn sample_moments(scenarios: &[EconomicScenario]) -> ClassMoments {
    let mut sum = AssetVector::default();
    let mut sum_sq = AssetVector::default();
    let mut count = 0usize;

    for scenario in scenarios {
        for year in 0..scenario.horizon() {
            let returns = scenario.year_returns(year);
            for class in AssetClass::ALL {
                let r = returns.get(class);
                sum.set(class, sum.get(class) + r);
                sum_sq.set(class, sum_sq.get(class) + r * r);
            }
            count += 1;
        }
    }

    if count == 0 {
        return ClassMoments {
            mean: AssetVector::default(),
            std_dev: AssetVector::default(),
        };
    }

    let n = count as f64;
    let mut mean = AssetVector::default();
    let mut std_dev = AssetVector::default();
    for class in AssetClass::ALL {
        let m = sum.get(class) / n;
        mean.set(class, m);
        let variance = (sum_sq.get(class) / n - m * m).max(0.0);
        std_dev.set(class, variance.sqrt());
    }

    ClassMoments { mean, std_dev }
}

fn estimated_max_drawdown(weights: &AssetVector, scenarios: &[EconomicScenario]) -> f64 {
    let sample = &scenarios[..scenarios.len().min(DRAWDOWN_SAMPLE_PATHS)];
    if sample.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for scenario in sample {
        let mut value = 1.0;
        let mut peak = 1.0;
        let mut worst = 0.0;
        for year in 0..scenario.horizon() {
            let portfolio_return = weights.dot(&scenario.year_returns(year));
            value *= 1.0 + portfolio_return;
            if value > peak {
                peak = value;
            }
            let drawdown = (peak - value) / peak;
            if drawdown > worst {
                worst = drawdown;
            }
        }
        total += worst;
    }
    total / sample.len() as f64
}

// =============================================================================
// Optimization
// =============================================================================

/// Optimize the mix for a single phase.
///
/// The tilt magnitude is `(budget - 0.5) * (0.30 + 0.40 * epsilon)`: a
/// risk budget above one half pushes weight into equity and crypto, one
/// below pulls it back into cash and credit, and a larger shortfall
/// tolerance amplifies the move in either direction.
pub fn optimize(
    phase: Phase,
    budget: f64,
    epsilon: f64,
    scenarios: &[EconomicScenario],
) -> PhaseAllocation {
    let mut weights = base_mix(phase);
    let shift = (budget - 0.5) * (0.30 + 0.40 * epsilon);
    apply_risk_tilt(&mut weights, shift);
    let weights = weights.normalized();

    let moments = sample_moments(scenarios);
    let expected_return = weights.dot(&moments.mean);
    let expected_volatility = AssetClass::ALL
        .iter()
        .map(|&class| {
            let w = weights.get(class);
            let s = moments.std_dev.get(class);
            (w * s).powi(2)
        })
        .sum::<f64>()
        .sqrt();
    let expected_max_drawdown = estimated_max_drawdown(&weights, scenarios);

    PhaseAllocation {
        phase,
        weights,
        expected_return,
        expected_volatility,
        expected_max_drawdown,
    }
}

fn phase_params(risk: &RiskConfig, phase: Phase) -> Result<(f64, f64), ValidationError> {
    let epsilon = *risk
        .epsilon
        .get(&phase)
        .ok_or(ValidationError::MissingPhaseEpsilon(phase))?;
    let budget = *risk
        .budgets
        .get(&phase)
        .ok_or(ValidationError::MissingPhaseBudget(phase))?;
    Ok((budget, epsilon))
}

/// Optimize all four phases from the household's risk configuration.
///
/// Fails if any phase is missing its shortfall tolerance or risk budget.
pub fn optimize_all(
    risk: &RiskConfig,
    scenarios: &[EconomicScenario],
) -> Result<PhaseAllocations, AnalyzerError> {
    let solve = |phase: Phase| -> Result<PhaseAllocation, AnalyzerError> {
        let (budget, epsilon) = phase_params(risk, phase)?;
        Ok(optimize(phase, budget, epsilon, scenarios))
    };

    Ok(PhaseAllocations {
        income_now: solve(Phase::IncomeNow)?,
        income_later: solve(Phase::IncomeLater)?,
        growth: solve(Phase::Growth)?,
        legacy: solve(Phase::Legacy)?,
    })
}
