//! Engine tests, grouped by concern:
//!
//! - `generate`: driver seeding and scenario generation
//! - `allocation`: phase mixes, risk tilts, and descriptors
//! - `simulation`: yearly cashflow mechanics and depletion
//! - `stress`: scenario transforms and cohort orchestration
//! - `objective`: phase metrics, transitions, and recommendations
//! - `analyzer`: input validation and end-to-end analysis

mod generate;
mod objective;
