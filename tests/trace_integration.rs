//! Integration tests for the trace-driven cluster environment.

mod common;

use bess_env::config::EnvConfig;
use bess_env::env::{ClusterAction, EnvError, RewardFn, TraceClusterEnv};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_action(rng: &mut StdRng) -> ClusterAction {
    ClusterAction::try_from(rng.random_range(0..4u8)).expect("0..4 are valid actions")
}

#[test]
fn consumes_the_whole_trace_exactly_once() {
    let n = 48;
    let mut env = common::baseline_trace_env(n);
    let mut rng = common::default_rng();
    env.reset();

    let mut steps = 0;
    loop {
        let outcome = env
            .step(random_action(&mut rng))
            .expect("mid-trace step should succeed");
        steps += 1;
        if outcome.done {
            assert!(outcome.observation.is_none());
            break;
        }
        assert!(outcome.observation.is_some());
    }
    // one transition per row until the last valid index
    assert_eq!(steps, n - 1);

    let past_end = env.step(random_action(&mut rng));
    assert!(matches!(past_end, Err(EnvError::ExhaustedTrace)));
}

#[test]
fn reset_replays_the_trace_from_the_start() {
    let mut env = common::baseline_trace_env(5);
    let first = env.reset().to_vec();
    env.step(ClusterAction::ChargeMain).expect("step 1");
    env.step(ClusterAction::ChargeMain).expect("step 2");

    let replay = env.reset().to_vec();
    assert_eq!(first, replay);
    assert_eq!(env.main_soc(), 0.5);

    let outcome = env.step(ClusterAction::DischargeMain).expect("step 1 again");
    assert_eq!(outcome.observation.as_deref(), Some(&common::trace_rows(5)[1][..]));
}

#[test]
fn soc_stays_normalized_over_random_rollout() {
    let mut env = common::baseline_trace_env(200);
    let mut rng = StdRng::seed_from_u64(9);
    env.reset();
    loop {
        let outcome = env
            .step(random_action(&mut rng))
            .expect("mid-trace step should succeed");
        assert!((0.0..=1.0).contains(&env.main_soc()));
        assert!((0.0..=1.0).contains(&env.support_soc()));
        if outcome.done {
            break;
        }
    }
}

#[test]
fn injected_reward_function_sees_trace_rows_in_order() {
    struct RowSum;
    impl RewardFn for RowSum {
        fn reward(&self, obs: &[f32], _a: ClusterAction, _m: f32, _s: f32) -> f32 {
            obs.iter().sum()
        }
    }

    let data = common::trace_rows(4);
    let expected: Vec<f32> = data[..3].iter().map(|r| r.iter().sum()).collect();
    let mut env =
        TraceClusterEnv::new(EnvConfig::baseline(), data, RowSum).expect("config should be valid");
    env.reset();

    let mut rewards = Vec::new();
    loop {
        let outcome = env
            .step(ClusterAction::ChargeSupport)
            .expect("mid-trace step should succeed");
        rewards.push(outcome.reward);
        if outcome.done {
            break;
        }
    }
    assert_eq!(rewards, expected);
}

#[test]
fn builtin_reward_penalizes_leaving_the_band() {
    let mut env = common::baseline_trace_env(20);
    env.reset();
    // drive the main cluster to full charge
    let mut last = 0.0;
    for _ in 0..6 {
        last = env
            .step(ClusterAction::ChargeMain)
            .expect("mid-trace step should succeed")
            .reward;
    }
    assert!(last < 0.0, "full charge sits above the safe band");
}

#[test]
fn two_row_trace_is_done_after_one_step() {
    let mut env = common::baseline_trace_env(2);
    env.reset();
    let outcome = env
        .step(ClusterAction::DischargeMain)
        .expect("single step should succeed");
    assert!(outcome.done);
    assert!(outcome.observation.is_none());
}

#[test]
fn single_row_trace_rejects_any_step() {
    let mut env = common::baseline_trace_env(1);
    env.reset();
    let result = env.step(ClusterAction::ChargeMain);
    assert!(matches!(result, Err(EnvError::ExhaustedTrace)));
}

#[test]
fn invalid_raw_action_is_rejected_at_the_boundary() {
    let result = ClusterAction::try_from(4);
    assert!(matches!(result, Err(EnvError::InvalidAction { value: 4 })));
    // a rejected raw value never touches the environment
    let mut env = common::baseline_trace_env(3);
    env.reset();
    assert_eq!(env.main_soc(), 0.5);
}
