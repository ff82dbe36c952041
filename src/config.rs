//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level environment configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`EnvConfig::from_toml_file`] or use [`EnvConfig::baseline`]
/// for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    /// Physical-quantity bounds for clamping.
    #[serde(default)]
    pub bounds: BoundsConfig,
    /// Economic constants of the reward function.
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Charge/discharge rate limits per step.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Episode horizon parameters.
    #[serde(default)]
    pub episode: EpisodeConfig,
    /// Trace-driven cluster environment parameters.
    #[serde(default)]
    pub trace: TraceConfig,
}

/// Physical-quantity bounds for clamping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundsConfig {
    /// Maximum battery state of charge (absolute units).
    pub max_soc: f32,
    /// Minimum battery state of charge (absolute units).
    pub min_soc: f32,
    /// Maximum shared resource pool level.
    pub max_res: f32,
    /// Maximum energy demand.
    pub max_demand: f32,
    /// Maximum state of health (1.0 = pristine).
    pub max_soh: f32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            max_soc: 100.0,
            min_soc: 0.0,
            max_res: 100.0,
            max_demand: 50.0,
            max_soh: 1.0,
        }
    }
}

/// Economic constants of the reward function.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    /// Nominal battery capacity, scales the out-of-band SoC penalty.
    pub capacity: f32,
    /// Grid energy price per unit.
    pub grid_price: f32,
    /// Battery replacement price, amortized over cycle life.
    pub battery_price: f32,
    /// Assumed full charge/discharge cycles before end-of-life (must be > 0).
    pub cycle_life: f32,
    /// Weight of the grid-cost reward term.
    pub alpha: f32,
    /// Weight of the battery-aging penalty term.
    pub lambda: f32,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            capacity: 50.0,
            grid_price: 0.3,
            battery_price: 200.0,
            cycle_life: 5000.0,
            alpha: 0.5,
            lambda: 0.3,
        }
    }
}

/// Charge/discharge rate limits per step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum charge amount per step for the main battery.
    pub main_charge_rate: f32,
    /// Maximum charge amount per step for the support battery.
    pub support_charge_rate: f32,
    /// Maximum discharge amount per step (both batteries).
    pub discharge_rate: f32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            main_charge_rate: 5.0,
            support_charge_rate: 3.0,
            discharge_rate: 10.0,
        }
    }
}

/// Episode horizon parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpisodeConfig {
    /// Number of steps before the episode terminates (must be > 0).
    pub max_steps: u32,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self { max_steps: 100 }
    }
}

/// Trace-driven cluster environment parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Normalized SoC movement per charge/discharge action (0.0–1.0).
    pub soc_rate: f32,
    /// Normalized SoC both clusters start an episode at (0.0–1.0).
    pub initial_soc: f32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            soc_rate: 0.1,
            initial_soc: 0.5,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"economics.cycle_life"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl EnvConfig {
    /// Returns the baseline scenario (the original hardcoded constants).
    pub fn baseline() -> Self {
        Self {
            bounds: BoundsConfig::default(),
            economics: EconomicsConfig::default(),
            limits: LimitsConfig::default(),
            episode: EpisodeConfig::default(),
            trace: TraceConfig::default(),
        }
    }

    /// Returns the harsh-aging preset: expensive battery, short cycle life.
    pub fn harsh_aging() -> Self {
        Self {
            economics: EconomicsConfig {
                battery_price: 400.0,
                cycle_life: 2000.0,
                lambda: 0.5,
                ..EconomicsConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the fast-cycling preset: higher rate limits, longer episodes.
    pub fn fast_cycling() -> Self {
        Self {
            limits: LimitsConfig {
                main_charge_rate: 8.0,
                support_charge_rate: 5.0,
                discharge_rate: 15.0,
            },
            episode: EpisodeConfig { max_steps: 200 },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "harsh_aging", "fast_cycling"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "harsh_aging" => Ok(Self::harsh_aging()),
            "fast_cycling" => Ok(Self::fast_cycling()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let b = &self.bounds;
        if b.min_soc >= b.max_soc {
            errors.push(ConfigError {
                field: "bounds.min_soc".into(),
                message: "must be < bounds.max_soc".into(),
            });
        }
        if b.max_res <= 0.0 {
            errors.push(ConfigError {
                field: "bounds.max_res".into(),
                message: "must be > 0".into(),
            });
        }
        if b.max_demand <= 0.0 {
            errors.push(ConfigError {
                field: "bounds.max_demand".into(),
                message: "must be > 0".into(),
            });
        }
        if b.max_soh <= 0.0 {
            errors.push(ConfigError {
                field: "bounds.max_soh".into(),
                message: "must be > 0".into(),
            });
        }

        let e = &self.economics;
        if e.capacity <= 0.0 {
            errors.push(ConfigError {
                field: "economics.capacity".into(),
                message: "must be > 0".into(),
            });
        }
        if e.cycle_life <= 0.0 {
            errors.push(ConfigError {
                field: "economics.cycle_life".into(),
                message: "must be > 0 (aging penalty divides by cycle life)".into(),
            });
        }
        if e.grid_price < 0.0 {
            errors.push(ConfigError {
                field: "economics.grid_price".into(),
                message: "must be >= 0".into(),
            });
        }
        if e.battery_price < 0.0 {
            errors.push(ConfigError {
                field: "economics.battery_price".into(),
                message: "must be >= 0".into(),
            });
        }
        if e.alpha < 0.0 {
            errors.push(ConfigError {
                field: "economics.alpha".into(),
                message: "must be >= 0".into(),
            });
        }
        if e.lambda < 0.0 {
            errors.push(ConfigError {
                field: "economics.lambda".into(),
                message: "must be >= 0".into(),
            });
        }

        let l = &self.limits;
        if l.main_charge_rate <= 0.0 {
            errors.push(ConfigError {
                field: "limits.main_charge_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if l.support_charge_rate <= 0.0 {
            errors.push(ConfigError {
                field: "limits.support_charge_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if l.discharge_rate <= 0.0 {
            errors.push(ConfigError {
                field: "limits.discharge_rate".into(),
                message: "must be > 0".into(),
            });
        }

        if self.episode.max_steps == 0 {
            errors.push(ConfigError {
                field: "episode.max_steps".into(),
                message: "must be > 0".into(),
            });
        }

        let t = &self.trace;
        if !(t.soc_rate > 0.0 && t.soc_rate <= 1.0) {
            errors.push(ConfigError {
                field: "trace.soc_rate".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if !(0.0..=1.0).contains(&t.initial_soc) {
            errors.push(ConfigError {
                field: "trace.initial_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        errors
    }
}
