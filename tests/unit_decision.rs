// Decision policy and percentage formatting through the public API.

use fakenews::scoring::decision::{DecisionPolicy, Verdict, DEFAULT_THRESHOLD};
use fakenews::scoring::predictor::to_percent;

// ============================================================
// Threshold boundary
// ============================================================

#[test]
fn default_threshold_is_065() {
    assert_eq!(DEFAULT_THRESHOLD, 0.65);
    assert_eq!(DecisionPolicy::default().threshold(), 0.65);
}

#[test]
fn exactly_at_threshold_keeps_the_label() {
    let policy = DecisionPolicy::default();
    assert_eq!(policy.decide([0.65, 0.35]).verdict, Verdict::Fake);
    assert_eq!(policy.decide([0.35, 0.65]).verdict, Verdict::Real);
}

#[test]
fn just_below_threshold_is_uncertain() {
    let policy = DecisionPolicy::default();
    assert_eq!(policy.decide([0.6499, 0.3501]).verdict, Verdict::Uncertain);
    assert_eq!(policy.decide([0.3501, 0.6499]).verdict, Verdict::Uncertain);
    assert_eq!(policy.decide([0.5, 0.5]).verdict, Verdict::Uncertain);
}

#[test]
fn confidence_is_the_winning_probability() {
    let decision = DecisionPolicy::default().decide([0.1, 0.9]);
    assert_eq!(decision.verdict, Verdict::Real);
    assert_eq!(decision.confidence, 0.9);
}

#[test]
fn custom_threshold_moves_the_boundary() {
    let strict = DecisionPolicy::new(0.9).unwrap();
    assert_eq!(strict.decide([0.2, 0.8]).verdict, Verdict::Uncertain);
    let lax = DecisionPolicy::new(0.5).unwrap();
    assert_eq!(lax.decide([0.45, 0.55]).verdict, Verdict::Real);
}

// ============================================================
// Percentages
// ============================================================

#[test]
fn percentages_round_to_two_decimals() {
    assert_eq!(to_percent(0.87654), 87.65);
    assert_eq!(to_percent(0.5), 50.0);
    assert_eq!(to_percent(0.000049), 0.0);
    assert_eq!(to_percent(0.999999), 100.0);
}
