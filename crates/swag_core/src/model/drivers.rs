//! Stochastic models for the economic drivers.
//!
//! Each driver owns its parameters and knows how to sample a full horizon
//! path from a caller-supplied RNG. Drivers never share or create RNG state;
//! the generation engine hands each one an independently seeded stream so
//! that changing one driver's internals can never perturb another's output.

use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn standard_normal<R: Rng + ?Sized>(
    driver: &'static str,
    mean: f64,
    std_dev: f64,
    rng: &mut R,
) -> Result<f64, ConfigError> {
    // `Normal::new` accepts a negative sigma, so the sign check is ours.
    if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
        return Err(ConfigError::InvalidDistributionParameters {
            driver,
            mean,
            std_dev,
        });
    }
    rand_distr::Normal::new(mean, std_dev)
        .map(|d| d.sample(rng))
        .map_err(|_| ConfigError::InvalidDistributionParameters {
            driver,
            mean,
            std_dev,
        })
}

// ============================================================================
// Inflation
// ============================================================================

/// Mean-reverting AR(1) inflation model.
///
/// `rate[t] = long_run_mean + persistence * (rate[t-1] - long_run_mean) + noise`
///
/// Output is deliberately unclamped; under the default parameters the
/// stationary distribution keeps annual rates within roughly -5%..+15%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationParams {
    pub long_run_mean: f64,
    /// AR(1) coefficient in [0, 1); higher values decay shocks more slowly.
    pub persistence: f64,
    pub volatility: f64,
    /// Rate in effect the year before the simulation starts.
    pub initial_rate: f64,
}

impl InflationParams {
    /// Post-2000 US CPI behaviour, loosely fitted.
    pub const US_BASELINE: InflationParams = InflationParams {
        long_run_mean: 0.025,
        persistence: 0.70,
        volatility: 0.010,
        initial_rate: 0.030,
    };

    pub fn sample_path<R: Rng + ?Sized>(
        &self,
        horizon_years: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, ConfigError> {
        let mut rates = Vec::with_capacity(horizon_years);
        let mut prev = self.initial_rate;
        for _ in 0..horizon_years {
            let shock = standard_normal("inflation", 0.0, self.volatility, rng)?;
            let rate = self.long_run_mean + self.persistence * (prev - self.long_run_mean) + shock;
            rates.push(rate);
            prev = rate;
        }
        Ok(rates)
    }
}

impl Default for InflationParams {
    fn default() -> Self {
        Self::US_BASELINE
    }
}

// ============================================================================
// Short rates
// ============================================================================

/// Mean-reverting short-rate model anchored at the current policy rate.
///
/// `r[t] = r[t-1] + reversion_speed * (long_run_rate - r[t-1]) + noise`,
/// floored at zero so rates never go meaningfully negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParams {
    pub current_rate: f64,
    pub long_run_rate: f64,
    pub reversion_speed: f64,
    pub volatility: f64,
}

impl RateParams {
    pub const US_BASELINE: RateParams = RateParams {
        current_rate: 0.042,
        long_run_rate: 0.035,
        reversion_speed: 0.15,
        volatility: 0.008,
    };

    pub fn sample_path<R: Rng + ?Sized>(
        &self,
        horizon_years: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, ConfigError> {
        let mut rates = Vec::with_capacity(horizon_years);
        let mut prev = self.current_rate;
        for _ in 0..horizon_years {
            let shock = standard_normal("rates", 0.0, self.volatility, rng)?;
            let rate = (prev + self.reversion_speed * (self.long_run_rate - prev) + shock).max(0.0);
            rates.push(rate);
            prev = rate;
        }
        Ok(rates)
    }
}

impl Default for RateParams {
    fn default() -> Self {
        Self::US_BASELINE
    }
}

// ============================================================================
// Equity
// ============================================================================

/// Mean/volatility pair for one equity regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeParams {
    pub mean: f64,
    pub volatility: f64,
}

/// Two-regime (bull/bear) switching model for annual equity returns.
///
/// Paths start in the bull regime. After each draw the regime flips with the
/// configured transition probability, so bear clusters emerge naturally.
/// Single-year draws are clamped to `[min_return, max_return]`; the default
/// bounds (-50%..+100%) are part of the model contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityParams {
    pub bull: RegimeParams,
    pub bear: RegimeParams,
    pub bull_to_bear: f64,
    pub bear_to_bull: f64,
    pub min_return: f64,
    pub max_return: f64,
}

impl EquityParams {
    /// Broad US equity, post-war annual behaviour split into expansion and
    /// drawdown regimes.
    pub const US_BASELINE: EquityParams = EquityParams {
        bull: RegimeParams {
            mean: 0.14,
            volatility: 0.13,
        },
        bear: RegimeParams {
            mean: -0.12,
            volatility: 0.22,
        },
        bull_to_bear: 0.18,
        bear_to_bull: 0.45,
        min_return: -0.50,
        max_return: 1.00,
    };

    pub fn sample_path<R: Rng + ?Sized>(
        &self,
        horizon_years: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, ConfigError> {
        let mut returns = Vec::with_capacity(horizon_years);
        let mut in_bull = true;
        for _ in 0..horizon_years {
            let regime = if in_bull { &self.bull } else { &self.bear };
            let draw = standard_normal("equity", regime.mean, regime.volatility, rng)?;
            returns.push(draw.clamp(self.min_return, self.max_return));

            let transition_prob = if in_bull {
                self.bull_to_bear
            } else {
                self.bear_to_bull
            };
            if rng.random::<f64>() < transition_prob {
                in_bull = !in_bull;
            }
        }
        Ok(returns)
    }
}

impl Default for EquityParams {
    fn default() -> Self {
        Self::US_BASELINE
    }
}

// ============================================================================
// Credit
// ============================================================================

/// I.i.d. credit return model: base yield plus noise, net of expected
/// default losses (`default_rate * (1 - recovery_rate)`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditParams {
    pub base_yield: f64,
    pub volatility: f64,
    pub default_rate: f64,
    pub recovery_rate: f64,
}

impl CreditParams {
    pub const US_BASELINE: CreditParams = CreditParams {
        base_yield: 0.052,
        volatility: 0.060,
        default_rate: 0.015,
        recovery_rate: 0.40,
    };

    /// Expected annual loss from defaults.
    #[must_use]
    pub fn expected_default_loss(&self) -> f64 {
        self.default_rate * (1.0 - self.recovery_rate)
    }

    pub fn sample_path<R: Rng + ?Sized>(
        &self,
        horizon_years: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, ConfigError> {
        let loss = self.expected_default_loss();
        (0..horizon_years)
            .map(|_| {
                standard_normal("credit", self.base_yield, self.volatility, rng)
                    .map(|draw| draw - loss)
            })
            .collect()
    }
}

impl Default for CreditParams {
    fn default() -> Self {
        Self::US_BASELINE
    }
}

// ============================================================================
// Infrastructure
// ============================================================================

/// Infrastructure return model: base yield with a partial inflation
/// pass-through plus i.i.d. noise.
///
/// The inflation linkage consumes the already generated inflation *values*;
/// its own noise stream stays independent of the inflation driver's RNG.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureParams {
    pub base_yield: f64,
    pub volatility: f64,
    /// Fraction of inflation surprises passed through to returns.
    pub inflation_beta: f64,
}

impl InfrastructureParams {
    pub const US_BASELINE: InfrastructureParams = InfrastructureParams {
        base_yield: 0.070,
        volatility: 0.090,
        inflation_beta: 0.35,
    };

    pub fn sample_path<R: Rng + ?Sized>(
        &self,
        inflation: &[f64],
        inflation_anchor: f64,
        rng: &mut R,
    ) -> Result<Vec<f64>, ConfigError> {
        inflation
            .iter()
            .map(|rate| {
                standard_normal("infrastructure", self.base_yield, self.volatility, rng)
                    .map(|draw| draw + self.inflation_beta * (rate - inflation_anchor))
            })
            .collect()
    }
}

impl Default for InfrastructureParams {
    fn default() -> Self {
        Self::US_BASELINE
    }
}

// ============================================================================
// Crypto
// ============================================================================

/// High-volatility i.i.d. crypto return model, floored at a total-loss bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CryptoParams {
    pub expected_return: f64,
    pub volatility: f64,
    /// Worst admissible single-year return (an asset cannot lose more than
    /// everything).
    pub floor: f64,
}

impl CryptoParams {
    pub const BASELINE: CryptoParams = CryptoParams {
        expected_return: 0.12,
        volatility: 0.70,
        floor: -0.95,
    };

    pub fn sample_path<R: Rng + ?Sized>(
        &self,
        horizon_years: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, ConfigError> {
        (0..horizon_years)
            .map(|_| {
                standard_normal("crypto", self.expected_return, self.volatility, rng)
                    .map(|draw| draw.max(self.floor))
            })
            .collect()
    }
}

impl Default for CryptoParams {
    fn default() -> Self {
        Self::BASELINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn inflation_rejects_negative_volatility() {
        let params = InflationParams {
            volatility: -0.01,
            ..InflationParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(matches!(
            params.sample_path(10, &mut rng),
            Err(ConfigError::InvalidDistributionParameters { driver: "inflation", .. })
        ));
    }

    #[test]
    fn rates_never_negative() {
        let params = RateParams {
            current_rate: 0.005,
            long_run_rate: 0.001,
            reversion_speed: 0.5,
            volatility: 0.02,
        };
        let mut rng = SmallRng::seed_from_u64(11);
        let path = params.sample_path(200, &mut rng).unwrap();
        assert!(path.iter().all(|r| *r >= 0.0));
    }

    #[test]
    fn equity_draws_respect_model_bounds() {
        let params = EquityParams::default();
        let mut rng = SmallRng::seed_from_u64(13);
        let path = params.sample_path(500, &mut rng).unwrap();
        assert!(
            path.iter()
                .all(|r| *r >= params.min_return && *r <= params.max_return)
        );
    }

    #[test]
    fn credit_nets_out_expected_default_loss() {
        let params = CreditParams {
            volatility: 0.0,
            ..CreditParams::default()
        };
        let mut rng = SmallRng::seed_from_u64(17);
        let path = params.sample_path(3, &mut rng).unwrap();
        let expected = params.base_yield - params.expected_default_loss();
        for r in path {
            assert!(
                (r - expected).abs() < 1e-12,
                "expected {expected}, got {r}"
            );
        }
    }

    #[test]
    fn infrastructure_tracks_inflation_surprises() {
        let params = InfrastructureParams {
            volatility: 0.0,
            ..InfrastructureParams::default()
        };
        let inflation = [0.025, 0.065];
        let mut rng = SmallRng::seed_from_u64(19);
        let path = params.sample_path(&inflation, 0.025, &mut rng).unwrap();
        assert!((path[0] - params.base_yield).abs() < 1e-12);
        assert!(path[1] > path[0]);
    }
}
