//! Shared fixtures for integration tests.

use bess_env::config::EnvConfig;
use bess_env::env::{SocBandReward, TraceClusterEnv, TwoAgentPowerEnv};
use rand::{SeedableRng, rngs::StdRng};

/// Default seeded generator used across integration tests.
pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Baseline two-agent environment.
pub fn baseline_env() -> TwoAgentPowerEnv {
    TwoAgentPowerEnv::new(EnvConfig::baseline()).expect("baseline config should be valid")
}

/// Baseline config with a shortened episode horizon.
pub fn short_episode_config(max_steps: u32) -> EnvConfig {
    let mut cfg = EnvConfig::baseline();
    cfg.episode.max_steps = max_steps;
    cfg
}

/// A monotone feature trace with `n` rows of two columns.
pub fn trace_rows(n: usize) -> Vec<Vec<f32>> {
    (0..n).map(|i| vec![i as f32, (n - i) as f32]).collect()
}

/// Baseline trace environment over `n` rows with the built-in reward.
pub fn baseline_trace_env(n: usize) -> TraceClusterEnv<SocBandReward> {
    TraceClusterEnv::new(EnvConfig::baseline(), trace_rows(n), SocBandReward)
        .expect("baseline trace config should be valid")
}
