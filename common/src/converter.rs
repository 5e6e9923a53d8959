//! ADC counts → voltage → sender resistance → fuel percent.
//!
//! Pure functions with no hardware or state. Nothing here fails: an
//! undefined divider state yields the [`INVALID_RESISTANCE`] sentinel and
//! every percent is clamped to `0.0..=100.0`.
//!
//! # Sentinel Polarity
//!
//! With the default sender (`r_full < r_empty`) the sentinel sits below
//! `r_full` and therefore reads as a full tank. A disconnected sender wire
//! looks like a full tank on the display; the reading's `valid` flag is the
//! only hint. With a reversed sender the same sentinel reads as empty.

use crate::config::{MIN_DIVIDER_VOLTS, SensorConfig};

/// Resistance reported when the divider equation has no solution.
pub const INVALID_RESISTANCE: f32 = -1.0;

/// Convert a raw ADC count to the pin voltage.
///
/// `raw` is expected in `0..=adc_max`; callers clamp it.
#[inline]
pub fn adc_to_voltage(
    raw: u16,
    vref: f32,
    adc_max: u16,
) -> f32 {
    if adc_max == 0 {
        return 0.0;
    }
    f32::from(raw) / f32::from(adc_max) * vref
}

/// Solve the divider for the sender resistance.
///
/// `v_adc = vref * r / (r_ref + r)`, so `r = v_adc * r_ref / (vref - v_adc)`.
/// Returns [`INVALID_RESISTANCE`] for an open circuit (`v_adc >= vref`) or a
/// short (`v_adc` below 1 mV).
pub fn voltage_to_resistance(
    v_adc: f32,
    vref: f32,
    r_ref: f32,
) -> f32 {
    if v_adc >= vref || v_adc < MIN_DIVIDER_VOLTS {
        return INVALID_RESISTANCE;
    }
    v_adc * r_ref / (vref - v_adc)
}

/// Linear interpolation of the sender position, clamped to `0..=100`.
///
/// Works for either ordering of `r_empty` and `r_full`.
pub fn resistance_to_percent(
    resistance: f32,
    r_empty: f32,
    r_full: f32,
) -> f32 {
    let span = r_empty - r_full;
    if span == 0.0 {
        return 0.0;
    }
    clamp_percent(100.0 * (r_empty - resistance) / span)
}

/// Clamp to `0..=100`, mapping NaN to 0.
#[inline]
pub fn clamp_percent(percent: f32) -> f32 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Inverse chain: the raw count a sender at `percent` would produce.
///
/// Used by the sender simulation. The result is rounded half-up and
/// clamped to `0..=adc_max`.
pub fn percent_to_raw(
    percent: f32,
    config: &SensorConfig,
) -> u16 {
    let p = clamp_percent(percent);
    let resistance = config.r_empty - p / 100.0 * (config.r_empty - config.r_full);
    let total = config.r_ref + resistance;
    if total <= 0.0 {
        return 0;
    }
    let voltage = config.vref * resistance / total;
    let raw = voltage / config.vref * f32::from(config.adc_max) + 0.5;
    if raw <= 0.0 {
        0
    } else if raw >= f32::from(config.adc_max) {
        config.adc_max
    } else {
        raw as u16
    }
}
