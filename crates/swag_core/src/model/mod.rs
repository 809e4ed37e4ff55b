//! Core domain types: phases, economic drivers and scenarios, allocations,
//! and per-path/aggregate results.

pub mod allocation;
pub mod drivers;
pub mod economy;
pub mod phase;
pub mod records;
pub mod results;

pub use allocation::{PhaseAllocation, PhaseAllocations};
pub use drivers::{
    CreditParams, CryptoParams, EquityParams, InflationParams, InfrastructureParams, RateParams,
    RegimeParams,
};
pub use economy::{AssetClass, AssetVector, EconomicScenario};
pub use phase::{Phase, PhaseBoundaryOffsets, PhaseSchedule};
pub use records::{CashflowRecord, FinalMetrics, PathResult, ScenarioKind};
pub use results::{
    AnalysisResult, PhaseMetrics, Recommendation, RecommendationPriority, StressSummary,
};
