//! Scenario generation tests.

use crate::config::ScenarioConfig;
use crate::error::ConfigError;
use crate::generate::{generate_ensemble, generate_scenario, generate_scenario_with_horizon};

fn test_config() -> ScenarioConfig {
    ScenarioConfig {
        horizon_years: 30,
        master_seed: "generation-tests".to_string(),
        ..ScenarioConfig::default()
    }
}

#[test]
fn same_seed_reproduces_a_path() {
    let config = test_config();
    let a = generate_scenario(&config, 3).unwrap();
    let b = generate_scenario(&config, 3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_paths_differ() {
    let config = test_config();
    let a = generate_scenario(&config, 0).unwrap();
    let b = generate_scenario(&config, 1).unwrap();
    assert_ne!(a.equity, b.equity);
    assert_ne!(a.inflation, b.inflation);
}

#[test]
fn different_master_seeds_diverge() {
    let config = test_config();
    let reseeded = ScenarioConfig {
        master_seed: "generation-tests-alt".to_string(),
        ..test_config()
    };
    let a = generate_scenario(&config, 0).unwrap();
    let b = generate_scenario(&reseeded, 0).unwrap();
    assert_ne!(a.equity, b.equity);
}

#[test]
fn drivers_are_independently_seeded() {
    // Changing the equity model must not perturb any other driver's draws.
    let config = test_config();
    let mut riskier = test_config();
    riskier.equity.bull.volatility = 0.30;

    let base = generate_scenario(&config, 0).unwrap();
    let alt = generate_scenario(&riskier, 0).unwrap();

    assert_ne!(base.equity, alt.equity);
    assert_eq!(base.inflation, alt.inflation);
    assert_eq!(base.short_rates, alt.short_rates);
    assert_eq!(base.credit, alt.credit);
    assert_eq!(base.crypto, alt.crypto);
}

#[test]
fn inflation_stays_in_a_plausible_band() {
    let config = test_config();
    for path_index in 0..20 {
        let scenario = generate_scenario(&config, path_index).unwrap();
        for &rate in &scenario.inflation {
            assert!((-0.10..=0.20).contains(&rate), "inflation {rate}");
        }
    }
}

#[test]
fn short_rates_are_floored_at_zero() {
    let config = test_config();
    for path_index in 0..20 {
        let scenario = generate_scenario(&config, path_index).unwrap();
        assert!(scenario.short_rates.iter().all(|&r| r >= 0.0));
    }
}

#[test]
fn equity_respects_model_bounds() {
    let config = test_config();
    for path_index in 0..20 {
        let scenario = generate_scenario(&config, path_index).unwrap();
        for &r in &scenario.equity {
            assert!(r >= config.equity.min_return);
            assert!(r <= config.equity.max_return);
        }
    }
}

#[test]
fn ensemble_has_requested_shape() {
    let config = test_config();
    let scenarios = generate_ensemble(&config, 25).unwrap();
    assert_eq!(scenarios.len(), 25);
    assert!(scenarios.iter().all(|s| s.horizon() == 30));
}

#[test]
fn zero_horizon_is_a_config_error() {
    let mut config = test_config();
    config.horizon_years = 0;
    assert!(matches!(
        generate_scenario(&config, 0),
        Err(ConfigError::InvalidHorizon { horizon_years: 0 })
    ));
    assert!(matches!(
        generate_ensemble(&config, 10),
        Err(ConfigError::InvalidHorizon { horizon_years: 0 })
    ));
}

#[test]
fn zero_paths_is_a_config_error() {
    let config = test_config();
    assert!(matches!(
        generate_ensemble(&config, 0),
        Err(ConfigError::InvalidPathCount { n_paths: 0 })
    ));
}

#[test]
fn extended_horizon_keeps_the_base_prefix() {
    let config = test_config();
    let base = generate_scenario(&config, 4).unwrap();
    let extended = generate_scenario_with_horizon(&config, 4, 35).unwrap();

    assert_eq!(extended.horizon(), 35);
    assert_eq!(&extended.equity[..30], &base.equity[..]);
    assert_eq!(&extended.inflation[..30], &base.inflation[..]);
    assert_eq!(&extended.short_rates[..30], &base.short_rates[..]);
    assert_eq!(&extended.infrastructure[..30], &base.infrastructure[..]);
}

#[test]
fn negative_volatility_is_a_config_error() {
    let mut config = test_config();
    config.inflation.volatility = -0.01;
    assert!(matches!(
        generate_scenario(&config, 0),
        Err(ConfigError::InvalidDistributionParameters { .. })
    ));
}
