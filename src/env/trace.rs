//! Trace-driven environment over an externally supplied feature series.

use crate::config::{ConfigError, EnvConfig};
use crate::env::reward::soc_band_penalty;
use crate::env::types::{ClusterAction, EnvError, TraceStep};

/// Reward strategy injected into [`TraceClusterEnv`] at construction.
///
/// Called once per step with the pre-action observation row, the chosen
/// action, and the two post-action cluster SoC values. The environment
/// treats the returned scalar as opaque.
pub trait RewardFn {
    fn reward(&self, obs: &[f32], action: ClusterAction, main_soc: f32, support_soc: f32) -> f32;
}

impl<F> RewardFn for F
where
    F: Fn(&[f32], ClusterAction, f32, f32) -> f32,
{
    fn reward(&self, obs: &[f32], action: ClusterAction, main_soc: f32, support_soc: f32) -> f32 {
        self(obs, action, main_soc, support_soc)
    }
}

/// Built-in reward keeping both normalized SoCs near the middle of their
/// range, reusing the shaped-band penalty on a 0–100 scale.
#[derive(Debug, Default, Clone, Copy)]
pub struct SocBandReward;

impl RewardFn for SocBandReward {
    fn reward(&self, _obs: &[f32], _action: ClusterAction, main_soc: f32, support_soc: f32) -> f32 {
        soc_band_penalty(main_soc * 100.0, 1.0) + soc_band_penalty(support_soc * 100.0, 1.0)
    }
}

/// An environment replaying an ordered sequence of observation rows while a
/// single 4-way action charges or discharges one of two clusters.
///
/// The data series is consumed read-only; rows pass through to the caller
/// unvalidated. Generic over `R: RewardFn` for static dispatch of the
/// injected reward strategy.
///
/// # Examples
///
/// ```
/// use bess_env::config::EnvConfig;
/// use bess_env::env::{ClusterAction, SocBandReward, TraceClusterEnv};
///
/// let data = vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]];
/// let mut env = TraceClusterEnv::new(EnvConfig::baseline(), data, SocBandReward).unwrap();
/// let first = env.reset();
/// assert_eq!(first, &[0.1, 0.2]);
///
/// let step = env.step(ClusterAction::ChargeMain).unwrap();
/// assert!(!step.done);
/// ```
pub struct TraceClusterEnv<R: RewardFn> {
    soc_rate: f32,
    initial_soc: f32,
    data: Vec<Vec<f32>>,
    reward_fn: R,
    main_soc: f32,
    support_soc: f32,
    current_step: Option<usize>,
}

impl<R: RewardFn> TraceClusterEnv<R> {
    /// Creates an environment over the supplied data series and reward
    /// strategy.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Config` if the configuration is invalid or the
    /// data series is empty.
    pub fn new(config: EnvConfig, data: Vec<Vec<f32>>, reward_fn: R) -> Result<Self, EnvError> {
        let mut errors = config.validate();
        if !errors.is_empty() {
            return Err(EnvError::Config(errors.remove(0)));
        }
        if data.is_empty() {
            return Err(EnvError::Config(ConfigError {
                field: "data".into(),
                message: "trace data series must not be empty".into(),
            }));
        }
        let trace = &config.trace;
        Ok(Self {
            soc_rate: trace.soc_rate,
            initial_soc: trace.initial_soc,
            data,
            reward_fn,
            main_soc: trace.initial_soc,
            support_soc: trace.initial_soc,
            current_step: None,
        })
    }

    /// Number of rows in the data series.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the data series is empty (never true after construction).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Normalized SoC of the main cluster.
    pub fn main_soc(&self) -> f32 {
        self.main_soc
    }

    /// Normalized SoC of the support cluster.
    pub fn support_soc(&self) -> f32 {
        self.support_soc
    }

    /// Starts a new episode at the first row and returns it.
    pub fn reset(&mut self) -> &[f32] {
        self.main_soc = self.initial_soc;
        self.support_soc = self.initial_soc;
        self.current_step = Some(0);
        &self.data[0]
    }

    /// Advances one row through the trace.
    ///
    /// The action moves only its own cluster's SoC by the configured rate,
    /// clamped to [0, 1]; the reward is delegated to the injected strategy
    /// with the pre-action row and the post-action SoC values. The returned
    /// observation is `None` exactly when the trace's last valid row has
    /// been reached.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::UninitializedEpisode` before the first `reset`
    /// and `EnvError::ExhaustedTrace` when stepping past the end of the
    /// data series.
    pub fn step(&mut self, action: ClusterAction) -> Result<TraceStep, EnvError> {
        let current = self.current_step.ok_or(EnvError::UninitializedEpisode)?;
        if current + 1 >= self.data.len() {
            return Err(EnvError::ExhaustedTrace);
        }

        match action {
            ClusterAction::ChargeMain => {
                self.main_soc = (self.main_soc + self.soc_rate).clamp(0.0, 1.0);
            }
            ClusterAction::DischargeMain => {
                self.main_soc = (self.main_soc - self.soc_rate).clamp(0.0, 1.0);
            }
            ClusterAction::ChargeSupport => {
                self.support_soc = (self.support_soc + self.soc_rate).clamp(0.0, 1.0);
            }
            ClusterAction::DischargeSupport => {
                self.support_soc = (self.support_soc - self.soc_rate).clamp(0.0, 1.0);
            }
        }

        let reward =
            self.reward_fn
                .reward(&self.data[current], action, self.main_soc, self.support_soc);

        let next = current + 1;
        self.current_step = Some(next);
        let done = next >= self.data.len() - 1;
        let observation = if done {
            None
        } else {
            Some(self.data[next].clone())
        };

        Ok(TraceStep {
            observation,
            reward,
            done,
        })
    }
}
