//! Backlight level tracking and ambient auto-dimming.
//!
//! The dash illumination line (0-12 V) is scaled down by an R1/R2 divider
//! onto an ADC pin. [`BrightnessController::update`] maps the recovered
//! input voltage linearly onto the configured duty range, at most once per
//! `update_ms`, and only commits when the new duty differs from the current
//! one by at least `hysteresis` steps.

use crate::config::{BrightnessConfig, SensorConfig};
use crate::converter::adc_to_voltage;

/// Anything that can set a backlight duty (0 = off, 255 = full).
pub trait Backlight {
    fn set_brightness(
        &mut self,
        level: u8,
    );
}

impl<T: Backlight + ?Sized> Backlight for &mut T {
    fn set_brightness(
        &mut self,
        level: u8,
    ) {
        (**self).set_brightness(level);
    }
}

// =============================================================================
// Telemetry
// =============================================================================

/// Brightness-sense values shown in the debug overlay.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct BrightnessTelemetry {
    /// Averaged raw count.
    pub raw: u16,
    /// Input voltage before the divider.
    pub voltage: f32,
    /// Position of `voltage` inside `v_min..=v_max`, in percent.
    pub percent: f32,
}

impl BrightnessTelemetry {
    pub fn from_raw(
        raw: u16,
        sensor: &SensorConfig,
        config: &BrightnessConfig,
    ) -> Self {
        let pin_voltage = adc_to_voltage(raw.min(sensor.adc_max), sensor.vref, sensor.adc_max);
        let voltage = pin_voltage * config.divider_gain();
        Self {
            raw,
            voltage,
            percent: voltage_position(voltage, config) * 100.0,
        }
    }
}

/// `0.0..=1.0` position of `voltage` inside the configured range.
fn voltage_position(
    voltage: f32,
    config: &BrightnessConfig,
) -> f32 {
    let span = config.v_max - config.v_min;
    if span <= 0.0 || voltage <= config.v_min {
        return 0.0;
    }
    if voltage >= config.v_max {
        return 1.0;
    }
    (voltage - config.v_min) / span
}

// =============================================================================
// Controller
// =============================================================================

/// Current backlight level plus the auto-dimming rate limiter.
pub struct BrightnessController {
    config: BrightnessConfig,
    level: u8,
    last_update_ms: Option<u64>,
}

impl BrightnessController {
    /// Starts at full output.
    pub const fn new(config: BrightnessConfig) -> Self {
        Self {
            level: config.out_max,
            config,
            last_update_ms: None,
        }
    }

    /// Record a manually chosen level.
    #[inline]
    pub fn set(
        &mut self,
        level: u8,
    ) {
        self.level = level;
    }

    #[inline]
    pub const fn get(&self) -> u8 { self.level }

    #[inline]
    pub const fn auto_enabled(&self) -> bool { self.config.auto }

    #[inline]
    pub const fn config(&self) -> &BrightnessConfig { &self.config }

    /// Whether `update` would evaluate a reading at `now_ms`.
    pub fn is_due(
        &self,
        now_ms: u64,
    ) -> bool {
        if !self.config.auto {
            return false;
        }
        match self.last_update_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.config.update_ms,
            None => true,
        }
    }

    /// Duty for an input voltage, clamped outside `v_min..=v_max`.
    pub fn level_for_voltage(
        &self,
        voltage: f32,
    ) -> u8 {
        let (lo, hi) = (self.config.out_min, self.config.out_max);
        if voltage <= self.config.v_min {
            return lo;
        }
        if voltage >= self.config.v_max {
            return hi;
        }
        let ratio = voltage_position(voltage, &self.config);
        lo.saturating_add((ratio * f32::from(hi.saturating_sub(lo))) as u8)
    }

    /// Re-evaluate the ambient level.
    ///
    /// Returns the new level when it was committed, `None` when auto mode
    /// is off, the rate limit has not elapsed, or the change is inside the
    /// hysteresis band.
    pub fn update(
        &mut self,
        now_ms: u64,
        input_voltage: f32,
    ) -> Option<u8> {
        if !self.is_due(now_ms) {
            return None;
        }
        self.last_update_ms = Some(now_ms);

        let target = self.level_for_voltage(input_voltage);
        if target.abs_diff(self.level) >= self.config.hysteresis {
            self.level = target;
            return Some(target);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> BrightnessController { BrightnessController::new(BrightnessConfig::DEFAULT) }

    #[test]
    fn test_starts_at_full() {
        assert_eq!(controller().get(), 255);
    }

    #[test]
    fn test_set_get() {
        let mut c = controller();
        c.set(100);
        assert_eq!(c.get(), 100);
    }

    #[test]
    fn test_level_mapping() {
        let c = controller();
        assert_eq!(c.level_for_voltage(0.0), 20);
        assert_eq!(c.level_for_voltage(1.0), 20);
        assert_eq!(c.level_for_voltage(12.0), 255);
        assert_eq!(c.level_for_voltage(20.0), 255);
        // Halfway: 20 + trunc(0.5 * 235)
        assert_eq!(c.level_for_voltage(6.5), 137);
    }

    #[test]
    fn test_update_rate_limited() {
        let mut c = controller();
        assert_eq!(c.update(0, 0.0), Some(20));
        assert_eq!(c.update(100, 12.0), None);
        assert_eq!(c.update(499, 12.0), None);
        assert_eq!(c.update(500, 12.0), Some(255));
    }

    #[test]
    fn test_update_hysteresis() {
        let mut c = controller();
        // 11.9 V -> 252, only 3 below the current 255
        assert_eq!(c.level_for_voltage(11.9), 252);
        assert_eq!(c.update(0, 11.9), None);
        assert_eq!(c.get(), 255);
        // 11.7 V -> 248, far enough to commit
        assert_eq!(c.update(500, 11.7), Some(248));
    }

    #[test]
    fn test_update_disabled() {
        let mut c = BrightnessController::new(BrightnessConfig {
            auto: false,
            ..BrightnessConfig::DEFAULT
        });
        assert!(!c.is_due(0));
        assert_eq!(c.update(0, 0.0), None);
        assert_eq!(c.get(), 255);
    }

    #[test]
    fn test_is_due_follows_rate_limit() {
        let mut c = controller();
        assert!(c.is_due(0));
        c.update(0, 12.0);
        assert!(!c.is_due(499));
        assert!(c.is_due(500));
    }

    #[test]
    fn test_telemetry() {
        let sensor = SensorConfig::DEFAULT;
        let config = BrightnessConfig::DEFAULT;
        // 12 V input -> 2.977 V at the pin -> raw ≈ 3694
        let t = BrightnessTelemetry::from_raw(3694, &sensor, &config);
        assert!((t.voltage - 12.0).abs() < 0.05);
        assert!(t.percent > 99.0);

        let zero = BrightnessTelemetry::from_raw(0, &sensor, &config);
        assert!(zero.voltage.abs() < f32::EPSILON);
        assert!(zero.percent.abs() < f32::EPSILON);
    }
}
