//! Phase metric, transition, and recommendation tests.

use rustc_hash::FxHashMap;

use crate::config::{HouseholdBuilder, HouseholdInput};
use crate::model::{
    AssetVector, CashflowRecord, FinalMetrics, PathResult, Phase, PhaseMetrics, PhaseSchedule,
    RecommendationPriority, ScenarioKind,
};
use crate::objective::{
    TransitionPolicy, compute_phase_metrics, evaluate_phase_transition, outcome_score,
    rebalancing_recommendations, summarize_scenarios,
};

// A 10-year plan: ages 60/62/70, so the income-later window spans years
// 2..10 and holds every scheduled need.
fn fixture_input() -> HouseholdInput {
    HouseholdBuilder::new("objective-tests")
        .ages(60, 62, 70)
        .essential_need(Phase::IncomeLater, 2..=9, 50_000.0)
        .build()
}

fn fixture_schedule(input: &HouseholdInput) -> PhaseSchedule {
    PhaseSchedule::new(
        input.current_age,
        input.retirement_age,
        &input.scenario.phase_offsets,
    )
}

fn record(year: usize, scheduled: f64, withdrawals: f64, balance: f64) -> CashflowRecord {
    CashflowRecord {
        year,
        age: 60 + year as u32,
        phase: if year < 2 { Phase::IncomeNow } else { Phase::IncomeLater },
        beginning_balance: balance,
        contributions: 0.0,
        scheduled_need: scheduled,
        withdrawals,
        taxes: scheduled * 0.1,
        ltc_costs: 0.0,
        investment_return: withdrawals + scheduled * 0.1,
        ending_balance: balance,
        // Dollar snapshot: the whole balance split evenly across the
        // liquid sleeves.
        allocation: AssetVector {
            cash: balance * 0.5,
            credit: balance * 0.5,
            ..AssetVector::default()
        },
    }
}

/// Flat-balance path; `meets` controls whether every scheduled need is met.
fn steady_path(path_index: usize, meets: bool, balance: f64) -> PathResult {
    let records: Vec<CashflowRecord> = (0..10)
        .map(|year| {
            let scheduled = if (2..=9).contains(&year) { 50_000.0 } else { 0.0 };
            let withdrawals = if meets { scheduled } else { scheduled * 0.8 };
            record(year, scheduled, withdrawals, balance)
        })
        .collect();
    let total_withdrawals = records.iter().map(|r| r.withdrawals).sum();

    PathResult {
        scenario: ScenarioKind::BaseCase,
        path_index,
        records,
        final_metrics: FinalMetrics {
            terminal_value: balance,
            total_withdrawals,
            success: true,
            years_to_depletion: None,
        },
    }
}

/// Path depleted after `years` records.
fn depleted_path(path_index: usize, years: usize) -> PathResult {
    let mut records: Vec<CashflowRecord> = (0..years)
        .map(|year| record(year, 0.0, 0.0, 500_000.0))
        .collect();
    if let Some(last) = records.last_mut() {
        last.ending_balance = 0.0;
    }

    PathResult {
        scenario: ScenarioKind::BaseCase,
        path_index,
        records,
        final_metrics: FinalMetrics {
            terminal_value: 0.0,
            total_withdrawals: 0.0,
            success: false,
            years_to_depletion: Some(years),
        },
    }
}

fn metrics_for(results: &[PathResult], phase: Phase) -> PhaseMetrics {
    let input = fixture_input();
    let schedule = fixture_schedule(&input);
    let metrics = compute_phase_metrics(&input, &schedule, results);
    *metrics.iter().find(|m| m.phase == phase).unwrap()
}

// =============================================================================
// Income sufficiency
// =============================================================================

#[test]
fn sufficiency_is_one_when_every_path_meets_needs() {
    let results: Vec<PathResult> = (0..4).map(|i| steady_path(i, true, 1_000_000.0)).collect();
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.income_sufficiency, 1.0);
    assert_eq!(later.qualifying_paths, 4);
}

#[test]
fn sufficiency_is_zero_when_no_path_meets_needs() {
    let results: Vec<PathResult> = (0..4).map(|i| steady_path(i, false, 1_000_000.0)).collect();
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.income_sufficiency, 0.0);
    assert_eq!(later.qualifying_paths, 4);
}

#[test]
fn sufficiency_is_half_when_half_meet_needs() {
    let results = vec![
        steady_path(0, true, 1_000_000.0),
        steady_path(1, true, 1_000_000.0),
        steady_path(2, false, 1_000_000.0),
        steady_path(3, false, 1_000_000.0),
    ];
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.income_sufficiency, 0.5);
}

#[test]
fn window_without_scheduled_needs_scores_zero_sufficiency() {
    let results: Vec<PathResult> = (0..4).map(|i| steady_path(i, true, 1_000_000.0)).collect();
    let now = metrics_for(&results, Phase::IncomeNow);
    assert_eq!(now.income_sufficiency, 0.0);
    assert_eq!(now.qualifying_paths, 0);
}

#[test]
fn truncated_paths_fail_sufficiency() {
    let results = vec![steady_path(0, true, 1_000_000.0), depleted_path(1, 3)];
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.income_sufficiency, 0.5);
}

// =============================================================================
// Drawdown breaches
// =============================================================================

#[test]
fn flat_paths_never_breach() {
    let results: Vec<PathResult> = (0..3).map(|i| steady_path(i, true, 800_000.0)).collect();
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.drawdown_breach_probability, 0.0);
}

#[test]
fn deep_drawdowns_breach() {
    let mut crashing = steady_path(0, true, 1_000_000.0);
    for record in crashing.records.iter_mut().filter(|r| r.year >= 5) {
        record.beginning_balance = 450_000.0;
        record.ending_balance = 450_000.0;
    }

    let results = vec![crashing, steady_path(1, true, 1_000_000.0)];
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.drawdown_breach_probability, 0.5);
}

#[test]
fn paths_depleted_before_the_window_breach() {
    // Two records only, so nothing reaches the income-later window.
    let results = vec![depleted_path(0, 2), steady_path(1, true, 1_000_000.0)];
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.drawdown_breach_probability, 0.5);
}

#[test]
fn depletion_inside_the_window_breaches() {
    let results = vec![depleted_path(0, 6), steady_path(1, true, 1_000_000.0)];
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.drawdown_breach_probability, 0.5);
}

// =============================================================================
// Legacy confidence and tax efficiency
// =============================================================================

#[test]
fn legacy_confidence_boundaries() {
    let above: Vec<PathResult> = (0..2).map(|i| steady_path(i, true, 600_000.0)).collect();
    assert_eq!(metrics_for(&above, Phase::Legacy).legacy_confidence, 1.0);

    let below: Vec<PathResult> = (0..2).map(|i| steady_path(i, true, 100_000.0)).collect();
    assert_eq!(metrics_for(&below, Phase::Legacy).legacy_confidence, 0.0);

    let mixed = vec![
        steady_path(0, true, 600_000.0),
        steady_path(1, true, 100_000.0),
    ];
    assert_eq!(metrics_for(&mixed, Phase::Legacy).legacy_confidence, 0.5);
}

#[test]
fn tax_efficiency_reflects_the_drag() {
    let results = vec![steady_path(0, true, 1_000_000.0)];
    let later = metrics_for(&results, Phase::IncomeLater);
    // 10% tax on every met need: 1 - 5k / 55k per year.
    assert!((later.after_tax_efficiency - 10.0 / 11.0).abs() < 1e-9);

    let now = metrics_for(&results, Phase::IncomeNow);
    assert_eq!(now.after_tax_efficiency, 1.0);
}

#[test]
fn liquidity_is_capped_and_defaults_to_one() {
    let results = vec![steady_path(0, true, 1_000_000.0)];
    // Liquid sleeve dwarfs outflows, so the cap binds.
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(later.liquidity_coverage, 10.0);

    // No outflows at all in the income-now window.
    let now = metrics_for(&results, Phase::IncomeNow);
    assert_eq!(now.liquidity_coverage, 1.0);
}

#[test]
fn outcome_score_matches_its_components() {
    let results: Vec<PathResult> = (0..4).map(|i| steady_path(i, true, 1_000_000.0)).collect();
    let later = metrics_for(&results, Phase::IncomeLater);
    assert_eq!(
        later.outcome_score,
        outcome_score(
            Phase::IncomeLater,
            later.income_sufficiency,
            later.drawdown_breach_probability,
            later.liquidity_coverage,
            later.after_tax_efficiency,
            later.legacy_confidence,
        )
    );
    assert!((0.0..=100.0).contains(&later.outcome_score));
}

// =============================================================================
// Transitions
// =============================================================================

fn transition_metrics(phase: Phase, isp: f64, dgbp: f64, os: f64) -> PhaseMetrics {
    PhaseMetrics {
        phase,
        income_sufficiency: isp,
        drawdown_breach_probability: dgbp,
        liquidity_coverage: 1.5,
        legacy_confidence: 0.6,
        after_tax_efficiency: 0.9,
        outcome_score: os,
        qualifying_paths: 10,
    }
}

#[test]
fn transition_within_policy_is_recommended() {
    let current = transition_metrics(Phase::IncomeNow, 0.90, 0.10, 70.0);
    let projected = transition_metrics(Phase::IncomeLater, 0.86, 0.13, 76.0);

    let assessment =
        evaluate_phase_transition(&current, &projected, &TransitionPolicy::default());
    assert!(assessment.recommended);
    assert!(assessment.blocking.is_empty());
}

#[test]
fn non_improving_score_blocks() {
    let current = transition_metrics(Phase::IncomeNow, 0.90, 0.10, 70.0);
    let projected = transition_metrics(Phase::IncomeLater, 0.90, 0.10, 70.0);

    let assessment =
        evaluate_phase_transition(&current, &projected, &TransitionPolicy::default());
    assert!(!assessment.recommended);
    assert_eq!(assessment.blocking.len(), 1);
    assert_eq!(assessment.blocking[0].metric, "outcome_score");
}

#[test]
fn breach_increase_beyond_policy_blocks() {
    let current = transition_metrics(Phase::IncomeNow, 0.90, 0.10, 70.0);
    let projected = transition_metrics(Phase::IncomeLater, 0.90, 0.20, 78.0);

    let assessment =
        evaluate_phase_transition(&current, &projected, &TransitionPolicy::default());
    assert!(!assessment.recommended);
    assert_eq!(assessment.blocking.len(), 1);
    assert_eq!(assessment.blocking[0].metric, "drawdown_breach_probability");
    assert!((assessment.blocking[0].delta - 0.10).abs() < 1e-12);
}

#[test]
fn sufficiency_drop_beyond_policy_blocks() {
    let current = transition_metrics(Phase::IncomeNow, 0.90, 0.10, 70.0);
    let projected = transition_metrics(Phase::IncomeLater, 0.70, 0.10, 78.0);

    let assessment =
        evaluate_phase_transition(&current, &projected, &TransitionPolicy::default());
    assert!(!assessment.recommended);
    assert_eq!(assessment.blocking[0].metric, "income_sufficiency");
}

// =============================================================================
// Rebalancing
// =============================================================================

fn scored(phase: Phase, outcome_score: f64) -> PhaseMetrics {
    PhaseMetrics {
        phase,
        income_sufficiency: 0.8,
        drawdown_breach_probability: 0.1,
        liquidity_coverage: 1.0,
        legacy_confidence: 0.5,
        after_tax_efficiency: 0.9,
        outcome_score,
        qualifying_paths: 10,
    }
}

#[test]
fn rebalancing_flags_lagging_phases_in_gap_order() {
    let metrics = vec![
        scored(Phase::IncomeNow, 52.0),
        scored(Phase::IncomeLater, 67.0),
        scored(Phase::Growth, 80.0),
        scored(Phase::Legacy, 77.0),
    ];

    let recs = rebalancing_recommendations(&metrics, None);
    assert_eq!(recs.len(), 2);

    assert_eq!(recs[0].phase, Phase::IncomeNow);
    assert_eq!(recs[0].priority, RecommendationPriority::High);
    assert!((recs[0].gap - 23.0).abs() < 1e-9);

    assert_eq!(recs[1].phase, Phase::IncomeLater);
    assert_eq!(recs[1].priority, RecommendationPriority::Low);
    assert!((recs[1].gap - 8.0).abs() < 1e-9);
}

#[test]
fn no_recommendations_when_every_phase_hits_target() {
    let metrics = vec![
        scored(Phase::IncomeNow, 75.0),
        scored(Phase::IncomeLater, 82.0),
        scored(Phase::Growth, 91.0),
        scored(Phase::Legacy, 75.0),
    ];
    assert!(rebalancing_recommendations(&metrics, None).is_empty());
}

#[test]
fn custom_targets_override_the_default() {
    let metrics = vec![scored(Phase::Growth, 80.0)];
    let targets: FxHashMap<Phase, f64> = [(Phase::Growth, 90.0)].into_iter().collect();

    let recs = rebalancing_recommendations(&metrics, Some(&targets));
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].target_score, 90.0);
    assert!((recs[0].gap - 10.0).abs() < 1e-9);
    assert_eq!(recs[0].priority, RecommendationPriority::Low);
}

#[test]
fn a_gap_of_exactly_fifteen_stays_low_priority() {
    let metrics = vec![scored(Phase::Growth, 60.0)];
    let recs = rebalancing_recommendations(&metrics, None);
    assert_eq!(recs[0].priority, RecommendationPriority::Low);
}

// =============================================================================
// Summaries
// =============================================================================

#[test]
fn summaries_group_by_scenario_with_base_first() {
    let mut crashed = depleted_path(3, 2);
    crashed.scenario = ScenarioKind::MarketCrashEarly;

    let results = vec![
        steady_path(0, true, 100_000.0),
        steady_path(1, true, 300_000.0),
        steady_path(2, true, 200_000.0),
        crashed,
    ];

    let summaries = summarize_scenarios(&results);
    assert_eq!(summaries.len(), 2);

    let base = &summaries[0];
    assert_eq!(base.scenario, ScenarioKind::BaseCase);
    assert_eq!(base.paths, 3);
    assert_eq!(base.success_rate, 1.0);
    assert_eq!(base.median_terminal_value, 200_000.0);
    assert_eq!(base.p5_terminal_value, 100_000.0);
    assert_eq!(base.p95_terminal_value, 300_000.0);
    assert_eq!(base.mean_years_to_depletion, None);

    let crash = &summaries[1];
    assert_eq!(crash.scenario, ScenarioKind::MarketCrashEarly);
    assert_eq!(crash.paths, 1);
    assert_eq!(crash.success_rate, 0.0);
    assert_eq!(crash.mean_years_to_depletion, Some(2.0));
}
