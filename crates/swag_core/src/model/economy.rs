//! Generated economic scenarios and the asset-class vector type shared by
//! allocations, returns, and dollar snapshots.

use serde::{Deserialize, Serialize};

/// The closed set of asset classes the engine models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Credit,
    Infrastructure,
    Crypto,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Equity,
        AssetClass::Credit,
        AssetClass::Infrastructure,
        AssetClass::Crypto,
        AssetClass::Cash,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Equity => "equity",
            AssetClass::Credit => "credit",
            AssetClass::Infrastructure => "infrastructure",
            AssetClass::Crypto => "crypto",
            AssetClass::Cash => "cash",
        }
    }
}

/// One `f64` per asset class. Used for allocation weights (sum ≈ 1.0),
/// single-year return vectors, and dollar snapshots, so weighted returns are
/// a single dot product.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetVector {
    pub equity: f64,
    pub credit: f64,
    pub infrastructure: f64,
    pub crypto: f64,
    pub cash: f64,
}

impl AssetVector {
    #[must_use]
    pub fn get(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Equity => self.equity,
            AssetClass::Credit => self.credit,
            AssetClass::Infrastructure => self.infrastructure,
            AssetClass::Crypto => self.crypto,
            AssetClass::Cash => self.cash,
        }
    }

    pub fn set(&mut self, class: AssetClass, value: f64) {
        match class {
            AssetClass::Equity => self.equity = value,
            AssetClass::Credit => self.credit = value,
            AssetClass::Infrastructure => self.infrastructure = value,
            AssetClass::Crypto => self.crypto = value,
            AssetClass::Cash => self.cash = value,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.equity + self.credit + self.infrastructure + self.crypto + self.cash
    }

    #[must_use]
    pub fn dot(&self, other: &AssetVector) -> f64 {
        self.equity * other.equity
            + self.credit * other.credit
            + self.infrastructure * other.infrastructure
            + self.crypto * other.crypto
            + self.cash * other.cash
    }

    #[must_use]
    pub fn scale(&self, factor: f64) -> AssetVector {
        AssetVector {
            equity: self.equity * factor,
            credit: self.credit * factor,
            infrastructure: self.infrastructure * factor,
            crypto: self.crypto * factor,
            cash: self.cash * factor,
        }
    }

    /// Clamp each component at zero and rescale so the components sum to 1.
    /// A vector with no positive mass falls back to all cash.
    #[must_use]
    pub fn normalized(&self) -> AssetVector {
        let mut v = *self;
        for class in AssetClass::ALL {
            if v.get(class) < 0.0 {
                v.set(class, 0.0);
            }
        }
        let total = v.sum();
        if total <= f64::EPSILON {
            return AssetVector {
                cash: 1.0,
                ..AssetVector::default()
            };
        }
        v.scale(1.0 / total)
    }
}

/// One simulated future: per-year sequences for inflation, short rates, and
/// per-asset-class returns, all of equal length (the horizon).
///
/// Scenarios are immutable once generated. Stress variants are built through
/// the `with_*` copy-with-override constructors below rather than by mutating
/// or serialize-cloning a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicScenario {
    pub inflation: Vec<f64>,
    pub short_rates: Vec<f64>,
    pub equity: Vec<f64>,
    pub credit: Vec<f64>,
    pub infrastructure: Vec<f64>,
    pub crypto: Vec<f64>,
}

impl EconomicScenario {
    /// Number of simulation years this scenario covers.
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.inflation.len()
    }

    /// Return vector for one simulation year. The cash leg earns that year's
    /// short rate.
    #[must_use]
    pub fn year_returns(&self, year: usize) -> AssetVector {
        AssetVector {
            equity: self.equity.get(year).copied().unwrap_or(0.0),
            credit: self.credit.get(year).copied().unwrap_or(0.0),
            infrastructure: self.infrastructure.get(year).copied().unwrap_or(0.0),
            crypto: self.crypto.get(year).copied().unwrap_or(0.0),
            cash: self.short_rates.get(year).copied().unwrap_or(0.0),
        }
    }

    /// Compound inflation factor accumulated over years `0..year`
    /// (1.0 for year 0).
    #[must_use]
    pub fn cumulative_inflation(&self, year: usize) -> f64 {
        self.inflation
            .iter()
            .take(year)
            .fold(1.0, |acc, rate| acc * (1.0 + rate))
    }

    /// Copy with the equity return of one year overridden.
    #[must_use]
    pub fn with_equity_return(&self, year: usize, rate: f64) -> EconomicScenario {
        let mut scenario = self.clone();
        if let Some(slot) = scenario.equity.get_mut(year) {
            *slot = rate;
        }
        scenario
    }

    /// Copy with every inflation rate shifted by a fixed amount.
    #[must_use]
    pub fn with_inflation_shift(&self, shift: f64) -> EconomicScenario {
        let mut scenario = self.clone();
        for rate in &mut scenario.inflation {
            *rate += shift;
        }
        scenario
    }

    /// Copy with the first `years` equity returns in reverse order, the
    /// remainder unchanged.
    #[must_use]
    pub fn with_reversed_equity_prefix(&self, years: usize) -> EconomicScenario {
        let mut scenario = self.clone();
        let prefix = years.min(scenario.equity.len());
        scenario.equity[..prefix].reverse();
        scenario
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> EconomicScenario {
        EconomicScenario {
            inflation: vec![0.02, 0.03, 0.04],
            short_rates: vec![0.04, 0.035, 0.03],
            equity: vec![0.10, -0.05, 0.07],
            credit: vec![0.05, 0.04, 0.05],
            infrastructure: vec![0.07, 0.06, 0.07],
            crypto: vec![0.30, -0.40, 0.10],
        }
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let v = AssetVector {
            equity: 3.0,
            credit: 1.0,
            infrastructure: 1.0,
            crypto: -0.5,
            cash: 1.0,
        };
        let n = v.normalized();
        assert!((n.sum() - 1.0).abs() < 1e-12);
        assert_eq!(n.crypto, 0.0);
    }

    #[test]
    fn cash_leg_earns_the_short_rate() {
        let s = scenario();
        assert_eq!(s.year_returns(1).cash, 0.035);
    }

    #[test]
    fn cumulative_inflation_is_exclusive_of_the_current_year() {
        let s = scenario();
        assert!((s.cumulative_inflation(0) - 1.0).abs() < 1e-12);
        assert!((s.cumulative_inflation(2) - 1.02 * 1.03).abs() < 1e-12);
    }

    #[test]
    fn overrides_leave_the_source_scenario_untouched() {
        let s = scenario();
        let crashed = s.with_equity_return(0, -0.35);
        assert_eq!(crashed.equity[0], -0.35);
        assert_eq!(s.equity[0], 0.10);

        let shifted = s.with_inflation_shift(0.025);
        assert!((shifted.inflation[2] - 0.065).abs() < 1e-12);
        assert_eq!(s.inflation[2], 0.04);

        let reversed = s.with_reversed_equity_prefix(2);
        assert_eq!(reversed.equity, vec![-0.05, 0.10, 0.07]);
        assert_eq!(s.equity, vec![0.10, -0.05, 0.07]);
    }

    #[test]
    fn reversal_longer_than_the_path_reverses_everything() {
        let s = scenario();
        let reversed = s.with_reversed_equity_prefix(10);
        assert_eq!(reversed.equity, vec![0.07, -0.05, 0.10]);
    }
}
