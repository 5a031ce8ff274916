//! Tests for fitness scoring

use super::*;
use crate::structural::append_unit;
use proptest::prelude::*;

/// Executor returning a fixed outcome
struct FixedExecutor(ExecutionOutcome);

impl CodeExecutor for FixedExecutor {
    fn execute(&self, _source: &str) -> ExecutionOutcome {
        self.0.clone()
    }
}

fn oracle(outcome: ExecutionOutcome) -> ProgramFitness {
    ProgramFitness::new(FitnessConfig::default(), Arc::new(FixedExecutor(outcome))).unwrap()
}

fn instant_success() -> ExecutionOutcome {
    ExecutionOutcome::Success {
        elapsed: Duration::ZERO,
    }
}

fn function_with_lines(name: &str, body_lines: usize) -> String {
    let mut code = format!("def {}():\n", name);
    for i in 0..body_lines {
        code.push_str(&format!("    v{} = {}\n", i, i));
    }
    code.push_str("    return 0\n");
    code
}

fn two_function_source() -> String {
    // 2 x (header + 10 body + return) = 24 non-blank lines
    format!(
        "{}\n\n{}",
        function_with_lines("alpha", 10),
        function_with_lines("beta", 10)
    )
}

#[test]
fn test_worked_example_scores_140() {
    let source = two_function_source();
    let features = SourceFeatures::of(&source);
    assert_eq!(features.functions, 2);
    assert_eq!(features.containers, 0);
    assert_eq!(features.lines, 24);

    let fitness = oracle(instant_success());
    let breakdown = fitness.breakdown(&source);
    assert_eq!(breakdown.execution, 100.0);
    assert_eq!(breakdown.timing, 20.0);
    assert_eq!(breakdown.complexity, 10.0);
    assert_eq!(breakdown.size, 10.0);
    assert_eq!(fitness.score(&source), 140.0);
}

#[test]
fn test_appending_function_adds_weight() {
    let fitness = oracle(instant_success());
    let source = two_function_source();
    let grown = append_unit(&source, "def gamma():\n    return 1\n");

    assert_eq!(SourceFeatures::of(&grown).functions, 3);
    assert!(fitness.score(&grown) >= fitness.score(&source) + 5.0);
}

#[test]
fn test_containers_weigh_double() {
    let fitness = oracle(instant_success());
    let breakdown = fitness.breakdown("class Alpha:\n    pass\n\ndef beta():\n    return 1\n");
    assert_eq!(breakdown.complexity, 15.0);
}

#[test]
fn test_failure_credit_ordering() {
    let source = "x = 1\n";
    let division = oracle(ExecutionOutcome::RecoverableFault {
        message: "division by zero".into(),
    })
    .score(source);
    let syntax = oracle(ExecutionOutcome::SyntaxFault {
        message: "invalid syntax".into(),
    })
    .score(source);
    let other = oracle(ExecutionOutcome::OtherFault {
        message: "NameError".into(),
    })
    .score(source);
    let success = oracle(instant_success()).score(source);

    assert_eq!(division, 30.0);
    assert_eq!(syntax, 20.0);
    assert_eq!(other, 10.0);
    assert!(success > division && division > syntax && syntax > other);
}

#[test]
fn test_timing_bonus_decreases() {
    let config = FitnessConfig::default();
    assert_eq!(config.timing_bonus(Duration::ZERO), 20.0);
    assert_eq!(config.timing_bonus(Duration::from_millis(9)), 20.0);
    assert_eq!(config.timing_bonus(Duration::from_millis(55)), 15.0);
    assert_eq!(config.timing_bonus(Duration::from_millis(200)), 0.0);
    assert_eq!(config.timing_bonus(Duration::from_secs(60)), 0.0);
}

#[test]
fn test_length_band_edges() {
    let fitness = oracle(instant_success());
    let lines = |n: usize| (0..n).map(|i| format!("x{} = {}\n", i, i)).collect::<String>();
    assert_eq!(fitness.breakdown(&lines(19)).size, 0.0);
    assert_eq!(fitness.breakdown(&lines(20)).size, 10.0);
    assert_eq!(fitness.breakdown(&lines(50)).size, 10.0);
    assert_eq!(fitness.breakdown(&lines(51)).size, 0.0);
}

#[test]
fn test_rescoring_is_idempotent() {
    let fitness = oracle(instant_success());
    let source = two_function_source();
    assert_eq!(fitness.score(&source), fitness.score(&source));
}

#[test]
fn test_config_validation() {
    assert!(FitnessConfig::default().validate().is_ok());

    let config = FitnessConfig {
        other_fault_credit: 25.0,
        ..FitnessConfig::default()
    };
    assert!(config.validate().is_err());

    let config = FitnessConfig {
        function_weight: -1.0,
        ..FitnessConfig::default()
    };
    assert!(config.validate().is_err());

    let config = FitnessConfig {
        length_band: (60, 10),
        ..FitnessConfig::default()
    };
    assert!(config.validate().is_err());
}

fn any_outcome() -> impl Strategy<Value = ExecutionOutcome> {
    prop_oneof![
        (0u64..10_000).prop_map(|ms| ExecutionOutcome::Success {
            elapsed: Duration::from_millis(ms)
        }),
        Just(ExecutionOutcome::RecoverableFault {
            message: String::new()
        }),
        Just(ExecutionOutcome::SyntaxFault {
            message: String::new()
        }),
        Just(ExecutionOutcome::OtherFault {
            message: String::new()
        }),
    ]
}

proptest! {
    #[test]
    fn prop_score_is_non_negative(source in ".{0,400}", outcome in any_outcome()) {
        let fitness = oracle(outcome);
        prop_assert!(fitness.score(&source) >= 0.0);
    }
}
