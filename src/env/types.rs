//! Actions, observations, step outcomes, and the environment error taxonomy.

use std::fmt;

use crate::config::ConfigError;

/// Binary charge/discharge action for one agent of the two-agent environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentAction {
    /// Draw from the shared resource pool into the battery.
    Charge,
    /// Release stored energy against the shared demand.
    Discharge,
}

impl TryFrom<u8> for AgentAction {
    type Error = EnvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Charge),
            1 => Ok(Self::Discharge),
            _ => Err(EnvError::InvalidAction { value }),
        }
    }
}

/// Four-way discrete action of the trace-driven cluster environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterAction {
    ChargeMain,
    DischargeMain,
    ChargeSupport,
    DischargeSupport,
}

impl TryFrom<u8> for ClusterAction {
    type Error = EnvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ChargeMain),
            1 => Ok(Self::DischargeMain),
            2 => Ok(Self::ChargeSupport),
            3 => Ok(Self::DischargeSupport),
            _ => Err(EnvError::InvalidAction { value }),
        }
    }
}

/// Observation pair returned by the two-agent environment.
///
/// The main agent sees `[soc, energy_demand, res_amount]`; the support agent
/// additionally sees its state of health.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoAgentObs {
    /// `[main_soc, energy_demand, res_amount]`
    pub main: [f32; 3],
    /// `[support_soc, energy_demand, res_amount, support_soh]`
    pub support: [f32; 4],
}

/// Per-agent reward pair for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardPair {
    pub main: f32,
    pub support: f32,
}

/// Grid-draw diagnostics for one two-agent step.
///
/// Charging draw from the shared pool is accounted as grid usage; no
/// separate renewable-vs-grid split is tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInfo {
    /// Amount the main agent drew from the pool this step.
    pub main_grid_usage: f32,
    /// Amount the support agent drew from the pool this step.
    pub support_grid_usage: f32,
}

/// Complete record of one two-agent environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoAgentStep {
    /// Observation pair after the step.
    pub observation: TwoAgentObs,
    /// Per-agent rewards for the step.
    pub rewards: RewardPair,
    /// Whether the episode horizon has been reached.
    pub done: bool,
    /// Grid-draw diagnostics.
    pub info: StepInfo,
}

impl fmt::Display for TwoAgentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "main SoC={:>6.2} | support SoC={:>6.2} SoH={:.3} | demand={:>5.1} res={:>5.1} | \
             r_main={:>8.3} r_support={:>8.3} done={}",
            self.observation.main[0],
            self.observation.support[0],
            self.observation.support[3],
            self.observation.main[1],
            self.observation.main[2],
            self.rewards.main,
            self.rewards.support,
            self.done,
        )
    }
}

/// Complete record of one trace-driven environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    /// Row at the new trace position, or `None` exactly when `done`.
    pub observation: Option<Vec<f32>>,
    /// Scalar from the injected reward function.
    pub reward: f32,
    /// Whether the trace has been consumed.
    pub done: bool,
}

/// Errors surfaced by environment construction and stepping.
///
/// Physical-quantity clamping is silent invariant enforcement and is never
/// reported through this type.
#[derive(Debug, Clone)]
pub enum EnvError {
    /// Constructor configuration rejected by validation.
    Config(ConfigError),
    /// Discrete action value outside the declared domain.
    InvalidAction { value: u8 },
    /// `step` called before any `reset`.
    UninitializedEpisode,
    /// Trace-driven environment stepped past the end of its data.
    ExhaustedTrace,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::InvalidAction { value } => {
                write!(f, "action {value} is outside the discrete action domain")
            }
            Self::UninitializedEpisode => {
                write!(f, "step called before reset; call reset to start an episode")
            }
            Self::ExhaustedTrace => {
                write!(f, "trace exhausted; call reset to start a new episode")
            }
        }
    }
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EnvError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_action_from_valid_values() {
        assert_eq!(AgentAction::try_from(0).ok(), Some(AgentAction::Charge));
        assert_eq!(AgentAction::try_from(1).ok(), Some(AgentAction::Discharge));
    }

    #[test]
    fn agent_action_rejects_out_of_domain() {
        let err = AgentAction::try_from(2);
        assert!(matches!(err, Err(EnvError::InvalidAction { value: 2 })));
    }

    #[test]
    fn cluster_action_from_valid_values() {
        assert_eq!(
            ClusterAction::try_from(0).ok(),
            Some(ClusterAction::ChargeMain)
        );
        assert_eq!(
            ClusterAction::try_from(3).ok(),
            Some(ClusterAction::DischargeSupport)
        );
    }

    #[test]
    fn cluster_action_rejects_out_of_domain() {
        let err = ClusterAction::try_from(4);
        assert!(matches!(err, Err(EnvError::InvalidAction { value: 4 })));
    }

    #[test]
    fn step_display_does_not_panic() {
        let step = TwoAgentStep {
            observation: TwoAgentObs {
                main: [50.0, 20.0, 50.0],
                support: [50.0, 20.0, 50.0, 1.0],
            },
            rewards: RewardPair {
                main: 1.38,
                support: 1.378,
            },
            done: false,
            info: StepInfo::default(),
        };
        let s = format!("{step}");
        assert!(!s.is_empty());
    }
}
