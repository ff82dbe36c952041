//! Fixed-horizon environment with two battery agents over a shared pool.

use rand::Rng;

use crate::config::EnvConfig;
use crate::env::reward::shaped_reward;
use crate::env::types::{AgentAction, EnvError, RewardPair, StepInfo, TwoAgentObs, TwoAgentStep};

/// State of charge both batteries start an episode at.
const INITIAL_SOC: f32 = 50.0;
/// Shared resource pool level at episode start.
const INITIAL_RES: f32 = 50.0;
/// Initial demand is drawn uniformly from this integer range.
const DEMAND_INIT_RANGE: std::ops::Range<u32> = 10..30;
/// Fixed renewable allowance credited against grid draw in the cost reward.
const RENEWABLE_USAGE: f32 = 10.0;
/// SoH lost per support discharge action, independent of discharge magnitude.
const SOH_DISCHARGE_DECREMENT: f32 = 0.001;
/// Weight of the support agent's explicit health-degradation penalty.
const SOH_PENALTY_WEIGHT: f32 = 2.0;

/// Mutable episode state; exists only between `reset` and the next `reset`.
#[derive(Debug, Clone)]
struct EpisodeState {
    main_soc: f32,
    support_soc: f32,
    support_soh: f32,
    energy_demand: f32,
    res_amount: f32,
    step_count: u32,
    prev_main_soc: f32,
    prev_support_soc: f32,
}

/// A two-agent power environment: a main and a support battery share a
/// renewable resource pool and an energy demand both can help satisfy.
///
/// Each agent picks a binary charge/discharge action per step; the
/// environment advances the physical state one time unit and returns a
/// per-agent reward pair. Episodes are fixed-horizon; there is no early
/// termination.
///
/// The environment exclusively owns its state. Concurrent use of one
/// instance must be serialized by the caller; `&mut self` on `reset` and
/// `step` enforces this at compile time.
///
/// # Examples
///
/// ```
/// use bess_env::config::EnvConfig;
/// use bess_env::env::{AgentAction, TwoAgentPowerEnv};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut env = TwoAgentPowerEnv::new(EnvConfig::baseline()).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let obs = env.reset(&mut rng);
/// assert_eq!(obs.main[0], 50.0);
///
/// let step = env
///     .step((AgentAction::Discharge, AgentAction::Charge))
///     .unwrap();
/// assert!(!step.done);
/// ```
#[derive(Debug, Clone)]
pub struct TwoAgentPowerEnv {
    config: EnvConfig,
    state: Option<EpisodeState>,
}

impl TwoAgentPowerEnv {
    /// Creates an environment from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Config` for the first constraint the
    /// configuration violates (e.g. `cycle_life = 0`).
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        let mut errors = config.validate();
        if !errors.is_empty() {
            return Err(EnvError::Config(errors.remove(0)));
        }
        Ok(Self {
            config,
            state: None,
        })
    }

    /// Returns a reference to the environment configuration.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Number of steps taken in the current episode, if one is running.
    pub fn step_count(&self) -> Option<u32> {
        self.state.as_ref().map(|s| s.step_count)
    }

    /// Starts a new episode and returns the initial observation pair.
    ///
    /// Both SoCs start at 50, support SoH at 1.0, and the resource pool at
    /// 50; the initial energy demand is drawn uniformly from the integer
    /// range `[10, 30)` using the injected generator, so episodes are
    /// reproducible under a fixed seed.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TwoAgentObs {
        let demand = rng.random_range(DEMAND_INIT_RANGE) as f32;
        let state = EpisodeState {
            main_soc: INITIAL_SOC,
            support_soc: INITIAL_SOC,
            support_soh: self.config.bounds.max_soh,
            energy_demand: demand,
            res_amount: INITIAL_RES,
            step_count: 0,
            prev_main_soc: INITIAL_SOC,
            prev_support_soc: INITIAL_SOC,
        };
        let obs = Self::observation(&state);
        self.state = Some(state);
        obs
    }

    /// Advances the simulation by one time unit.
    ///
    /// Each agent acts independently: discharging moves up to the discharge
    /// rate limit from the battery into the shared demand (and costs the
    /// support battery a fixed SoH decrement); charging draws up to the
    /// charge rate limit from the shared pool, accounted as grid usage.
    /// All physical quantities are clamped to their declared bounds before
    /// rewards are computed.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::UninitializedEpisode` if called before `reset`.
    pub fn step(&mut self, actions: (AgentAction, AgentAction)) -> Result<TwoAgentStep, EnvError> {
        let bounds = &self.config.bounds;
        let limits = &self.config.limits;
        let state = self.state.as_mut().ok_or(EnvError::UninitializedEpisode)?;
        let (main_action, support_action) = actions;

        state.prev_main_soc = state.main_soc;
        state.prev_support_soc = state.support_soc;

        let mut info = StepInfo::default();

        match main_action {
            AgentAction::Discharge => {
                let amount = limits.discharge_rate.min(state.main_soc);
                state.main_soc -= amount;
                state.energy_demand -= amount;
            }
            AgentAction::Charge => {
                let amount = limits.main_charge_rate.min(state.res_amount);
                state.main_soc = (state.main_soc + amount).min(bounds.max_soc);
                state.res_amount -= amount;
                info.main_grid_usage += amount;
            }
        }

        match support_action {
            AgentAction::Discharge => {
                let amount = limits.discharge_rate.min(state.support_soc);
                state.support_soc -= amount;
                state.energy_demand -= amount;
                // Cycling wear is per discharge event, not per unit moved.
                state.support_soh -= SOH_DISCHARGE_DECREMENT;
            }
            AgentAction::Charge => {
                let amount = limits.support_charge_rate.min(state.res_amount);
                state.support_soc = (state.support_soc + amount).min(bounds.max_soc);
                state.res_amount -= amount;
                info.support_grid_usage += amount;
            }
        }

        state.energy_demand = state.energy_demand.clamp(0.0, bounds.max_demand);
        state.res_amount = state.res_amount.clamp(0.0, bounds.max_res);
        state.support_soh = state.support_soh.clamp(0.0, bounds.max_soh);
        state.main_soc = state.main_soc.clamp(bounds.min_soc, bounds.max_soc);
        state.support_soc = state.support_soc.clamp(bounds.min_soc, bounds.max_soc);

        let econ = &self.config.economics;
        let reward_main = shaped_reward(
            econ,
            state.main_soc,
            state.prev_main_soc,
            info.main_grid_usage,
            RENEWABLE_USAGE,
        );
        let mut reward_support = shaped_reward(
            econ,
            state.support_soc,
            state.prev_support_soc,
            info.support_grid_usage,
            RENEWABLE_USAGE,
        );
        reward_support -= (self.config.bounds.max_soh - state.support_soh) * SOH_PENALTY_WEIGHT;

        state.step_count += 1;
        let done = state.step_count >= self.config.episode.max_steps;

        Ok(TwoAgentStep {
            observation: Self::observation(state),
            rewards: RewardPair {
                main: reward_main,
                support: reward_support,
            },
            done,
            info,
        })
    }

    fn observation(state: &EpisodeState) -> TwoAgentObs {
        TwoAgentObs {
            main: [state.main_soc, state.energy_demand, state.res_amount],
            support: [
                state.support_soc,
                state.energy_demand,
                state.res_amount,
                state.support_soh,
            ],
        }
    }
}
