//! Shared reward-shaping helpers used by both environments.

use crate::config::EconomicsConfig;

/// Upper edge of the safe SoC band; the penalty slope starts above it.
pub const SOC_SAFE_HIGH: f32 = 90.0;
/// Lower edge of the safe SoC band; the penalty slope starts below it.
pub const SOC_SAFE_LOW: f32 = 20.0;

/// Out-of-band state-of-charge penalty.
///
/// Zero anywhere inside `[SOC_SAFE_LOW, SOC_SAFE_HIGH]` and at both
/// breakpoints; negative with slope `capacity` per unit of distance outside
/// the band on either side.
pub fn soc_band_penalty(soc: f32, capacity: f32) -> f32 {
    if soc > SOC_SAFE_HIGH {
        (SOC_SAFE_HIGH - soc) * capacity
    } else if soc < SOC_SAFE_LOW {
        (soc - SOC_SAFE_LOW) * capacity
    } else {
        0.0
    }
}

/// Battery-aging penalty: replacement cost amortized over cycle life,
/// charged per unit of SoC movement this step.
pub fn aging_penalty(soc: f32, soc_prev: f32, battery_price: f32, cycle_life: f32) -> f32 {
    (soc - soc_prev).abs() * battery_price / cycle_life
}

/// Combined shaped reward for one agent and one step.
///
/// `grid_usage` is whatever the agent drew from the shared pool while
/// charging; `renewable_usage` is the fixed renewable allowance credited
/// against it.
pub fn shaped_reward(
    econ: &EconomicsConfig,
    soc: f32,
    soc_prev: f32,
    grid_usage: f32,
    renewable_usage: f32,
) -> f32 {
    let r_cost = -econ.alpha * econ.grid_price * (grid_usage - renewable_usage);
    let r_health = -econ.lambda * aging_penalty(soc, soc_prev, econ.battery_price, econ.cycle_life);
    let r_soc = soc_band_penalty(soc, econ.capacity);
    r_cost + r_health + r_soc
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn econ() -> EconomicsConfig {
        EconomicsConfig::default()
    }

    #[test]
    fn penalty_zero_inside_safe_band() {
        for soc in [20.0, 35.0, 50.0, 77.5, 90.0] {
            assert_eq!(soc_band_penalty(soc, 50.0), 0.0, "soc={soc}");
        }
    }

    #[test]
    fn penalty_negative_above_band() {
        let p = soc_band_penalty(95.0, 50.0);
        assert!((p - (-250.0)).abs() < EPS);
    }

    #[test]
    fn penalty_negative_below_band() {
        let p = soc_band_penalty(10.0, 50.0);
        assert!((p - (-500.0)).abs() < EPS);
    }

    #[test]
    fn penalty_continuous_at_breakpoints() {
        assert!(soc_band_penalty(90.0 + 1e-4, 50.0).abs() < 0.01);
        assert!(soc_band_penalty(20.0 - 1e-4, 50.0).abs() < 0.01);
        assert_eq!(soc_band_penalty(90.0, 50.0), 0.0);
        assert_eq!(soc_band_penalty(20.0, 50.0), 0.0);
    }

    #[test]
    fn penalty_slope_scales_with_capacity() {
        let narrow = soc_band_penalty(95.0, 10.0);
        let wide = soc_band_penalty(95.0, 50.0);
        assert!((wide - narrow * 5.0).abs() < EPS);
    }

    #[test]
    fn aging_penalty_is_magnitude_symmetric() {
        let up = aging_penalty(60.0, 50.0, 200.0, 5000.0);
        let down = aging_penalty(40.0, 50.0, 200.0, 5000.0);
        assert!((up - down).abs() < EPS);
        assert!((up - 0.4).abs() < EPS);
    }

    #[test]
    fn pure_discharge_reward_matches_formula() {
        // Both agents discharging from 50: grid_usage 0, renewable credit 10.
        // r_cost = -0.5 * 0.3 * (0 - 10) = 1.5
        // r_health = -0.3 * (10 * 200 / 5000) = -0.12
        // r_soc = 0 (40 is inside the band)
        let r = shaped_reward(&econ(), 40.0, 50.0, 0.0, 10.0);
        assert!((r - 1.38).abs() < EPS);
    }

    #[test]
    fn charging_draw_reduces_cost_reward() {
        let idle = shaped_reward(&econ(), 50.0, 50.0, 0.0, 10.0);
        let charging = shaped_reward(&econ(), 50.0, 50.0, 5.0, 10.0);
        assert!(charging < idle);
    }
}
