//! Simulation environments exposing a step/reset contract.

/// Shared reward-shaping helpers.
pub mod reward;
/// Trace-driven cluster environment.
pub mod trace;
/// Two-agent power environment.
pub mod two_agent;
pub mod types;

// Re-export the main types for convenience
pub use trace::{RewardFn, SocBandReward, TraceClusterEnv};
pub use two_agent::TwoAgentPowerEnv;
pub use types::{AgentAction, ClusterAction, EnvError, RewardPair, TwoAgentObs};
