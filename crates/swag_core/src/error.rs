use std::fmt;

use crate::model::Phase;

/// Errors raised by boundary validation of a [`HouseholdInput`](crate::config::HouseholdInput).
///
/// All of these are fatal and surface before any simulation work begins.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingHouseholdId,
    AgeOutOfRange {
        current_age: u32,
    },
    RetirementNotAfterCurrentAge {
        current_age: u32,
        retirement_age: u32,
    },
    NonPositivePortfolio {
        initial_portfolio: f64,
    },
    InsufficientPaths {
        n_paths: usize,
        minimum: usize,
    },
    MissingPhaseEpsilon(Phase),
    MissingPhaseBudget(Phase),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingHouseholdId => write!(f, "household id is missing or empty"),
            ValidationError::AgeOutOfRange { current_age } => {
                write!(f, "current age {current_age} is outside the supported range [18, 100]")
            }
            ValidationError::RetirementNotAfterCurrentAge {
                current_age,
                retirement_age,
            } => {
                write!(
                    f,
                    "retirement age {retirement_age} must be after current age {current_age}"
                )
            }
            ValidationError::NonPositivePortfolio { initial_portfolio } => {
                write!(f, "initial portfolio must be positive (got {initial_portfolio})")
            }
            ValidationError::InsufficientPaths { n_paths, minimum } => {
                write!(f, "path count {n_paths} is below the minimum of {minimum}")
            }
            ValidationError::MissingPhaseEpsilon(phase) => {
                write!(f, "risk config has no epsilon entry for phase {}", phase.label())
            }
            ValidationError::MissingPhaseBudget(phase) => {
                write!(f, "risk config has no budget entry for phase {}", phase.label())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors related to scenario/model configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Horizon must cover at least one simulation year
    InvalidHorizon {
        horizon_years: usize,
    },
    /// At least one scenario path must be generated
    InvalidPathCount {
        n_paths: usize,
    },
    InvalidDistributionParameters {
        driver: &'static str,
        mean: f64,
        std_dev: f64,
    },
    /// A phase identifier supplied at the boundary did not parse
    UnknownPhase(String),
    /// A stress scenario name supplied at the boundary did not parse
    UnknownStressScenario(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHorizon { horizon_years } => {
                write!(f, "horizon of {horizon_years} years is invalid (must be >= 1)")
            }
            ConfigError::InvalidPathCount { n_paths } => {
                write!(f, "path count {n_paths} is invalid (must be >= 1)")
            }
            ConfigError::InvalidDistributionParameters {
                driver,
                mean,
                std_dev,
            } => {
                write!(
                    f,
                    "invalid {driver} distribution parameters (mean={mean}, std_dev={std_dev})"
                )
            }
            ConfigError::UnknownPhase(name) => write!(f, "unknown phase identifier: {name:?}"),
            ConfigError::UnknownStressScenario(name) => {
                write!(f, "unknown stress scenario: {name:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error returned by the analyzer boundary API
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    Validation(ValidationError),
    Config(ConfigError),
    /// Analysis was cancelled by user request between path runs
    Cancelled,
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::Validation(e) => write!(f, "{e}"),
            AnalyzerError::Config(e) => write!(f, "{e}"),
            AnalyzerError::Cancelled => write!(f, "analysis cancelled"),
        }
    }
}

impl std::error::Error for AnalyzerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzerError::Validation(e) => Some(e),
            AnalyzerError::Config(e) => Some(e),
            AnalyzerError::Cancelled => None,
        }
    }
}

impl From<ValidationError> for AnalyzerError {
    fn from(e: ValidationError) -> Self {
        AnalyzerError::Validation(e)
    }
}

impl From<ConfigError> for AnalyzerError {
    fn from(e: ConfigError) -> Self {
        AnalyzerError::Config(e)
    }
}
