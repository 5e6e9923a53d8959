//! Fuel sender reading: oversampling, conversion and EMA damping.
//!
//! The reader never touches hardware directly. It pulls raw counts through
//! the [`AdcSource`] capability, which the firmware implements on the RP2350
//! ADC and the simulator implements on synthetic senders.
//!
//! # Pipeline
//!
//! ```text
//! read_raw ×N ──mean──> raw ──> voltage ──> resistance ──> percent ──EMA──> percent
//!                                                 └─> valid (tolerance band)
//! ```

use crate::config::{ADC_MAX_SAMPLES, SensorConfig};
use crate::converter::{adc_to_voltage, resistance_to_percent, voltage_to_resistance};

// =============================================================================
// Identifiers
// =============================================================================

/// One of the two fuel tanks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TankId {
    Tank1,
    Tank2,
}

impl TankId {
    pub const ALL: [Self; 2] = [Self::Tank1, Self::Tank2];

    /// Zero-based slot for per-tank arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Tank1 => 0,
            Self::Tank2 => 1,
        }
    }

    /// One-based number used in labels ("T1", "T2").
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            Self::Tank1 => 1,
            Self::Tank2 => 2,
        }
    }

    /// ADC channel wired to this tank's sender.
    #[inline]
    pub const fn channel(self) -> AdcChannel {
        match self {
            Self::Tank1 => AdcChannel::Tank1,
            Self::Tank2 => AdcChannel::Tank2,
        }
    }
}

/// Analog inputs the application samples.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AdcChannel {
    Tank1,
    Tank2,
    /// Dash illumination voltage, through its own divider.
    Brightness,
}

// =============================================================================
// Hardware Capability
// =============================================================================

/// Raw analog reads.
pub trait AdcSource {
    /// One conversion in `0..=adc_max`.
    fn read_raw(
        &mut self,
        channel: AdcChannel,
    ) -> u16;

    /// Short pause between oversampled reads (about 100 µs on hardware).
    fn settle(&mut self) {}
}

impl<T: AdcSource + ?Sized> AdcSource for &mut T {
    fn read_raw(
        &mut self,
        channel: AdcChannel,
    ) -> u16 {
        (**self).read_raw(channel)
    }

    fn settle(&mut self) { (**self).settle() }
}

/// Mean of `num_samples` reads (clamped to `1..=100`), rounded down.
pub fn read_raw_averaged<A: AdcSource + ?Sized>(
    adc: &mut A,
    channel: AdcChannel,
    num_samples: usize,
    adc_max: u16,
) -> u16 {
    let n = num_samples.clamp(1, ADC_MAX_SAMPLES);
    let mut sum: u32 = 0;
    for i in 0..n {
        sum += u32::from(adc.read_raw(channel).min(adc_max));
        if i + 1 < n {
            adc.settle();
        }
    }
    (sum / n as u32) as u16
}

// =============================================================================
// Reading
// =============================================================================

/// One converted sample. Created fresh every cycle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FuelReading {
    pub raw_adc: u16,
    pub voltage: f32,
    /// Sender resistance, or `-1.0` when the divider equation has no solution.
    pub resistance: f32,
    pub percent: f32,
    /// Resistance lies within the sender range plus tolerance.
    pub valid: bool,
}

impl FuelReading {
    /// Run one averaged raw count through the conversion chain.
    pub fn from_raw(
        raw: u16,
        config: &SensorConfig,
    ) -> Self {
        let raw = raw.min(config.adc_max);
        let voltage = adc_to_voltage(raw, config.vref, config.adc_max);
        let resistance = voltage_to_resistance(voltage, config.vref, config.r_ref);
        let percent = resistance_to_percent(resistance, config.r_empty, config.r_full);
        Self {
            raw_adc: raw,
            voltage,
            resistance,
            percent,
            valid: within_tolerance(resistance, config),
        }
    }
}

/// Tolerance band check, independent of sender ordering.
fn within_tolerance(
    resistance: f32,
    config: &SensorConfig,
) -> bool {
    let low = config.r_full.min(config.r_empty) - config.tolerance;
    let high = config.r_full.max(config.r_empty) + config.tolerance;
    resistance >= low && resistance <= high
}

// =============================================================================
// EMA
// =============================================================================

/// Exponential moving average of one tank's percent.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct EmaState {
    smoothed_percent: f32,
    initialized: bool,
}

impl EmaState {
    pub const fn new() -> Self {
        Self {
            smoothed_percent: 0.0,
            initialized: false,
        }
    }

    /// Blend in a new sample. The first sample seeds the filter.
    pub fn apply(
        &mut self,
        alpha: f32,
        value: f32,
    ) -> f32 {
        if self.initialized {
            self.smoothed_percent = alpha * value + (1.0 - alpha) * self.smoothed_percent;
        } else {
            self.smoothed_percent = value;
            self.initialized = true;
        }
        self.smoothed_percent
    }

    #[inline]
    pub const fn is_initialized(&self) -> bool { self.initialized }

    #[inline]
    pub const fn value(&self) -> f32 { self.smoothed_percent }

    pub fn reset(&mut self) { *self = Self::new(); }
}

// =============================================================================
// Fuel Sensor
// =============================================================================

/// Reads both tanks and keeps their damping state.
pub struct FuelSensor {
    config: SensorConfig,
    ema: [EmaState; 2],
    damping: bool,
}

impl FuelSensor {
    pub const fn new(config: SensorConfig) -> Self {
        Self {
            damping: config.damping,
            config,
            ema: [EmaState::new(); 2],
        }
    }

    /// Averaged, undamped reading.
    pub fn read_averaged<A: AdcSource + ?Sized>(
        &self,
        adc: &mut A,
        tank: TankId,
        num_samples: usize,
    ) -> FuelReading {
        let raw = read_raw_averaged(adc, tank.channel(), num_samples, self.config.adc_max);
        FuelReading::from_raw(raw, &self.config)
    }

    /// Averaged reading with the tank's EMA applied to `percent`.
    ///
    /// Passes through unchanged while damping is disabled.
    pub fn read_damped<A: AdcSource + ?Sized>(
        &mut self,
        adc: &mut A,
        tank: TankId,
        num_samples: usize,
    ) -> FuelReading {
        let mut reading = self.read_averaged(adc, tank, num_samples);
        if self.damping {
            reading.percent = self.ema[tank.index()].apply(self.config.alpha, reading.percent);
        }
        reading
    }

    /// Read a tank with the configured sample count and damping policy.
    pub fn read<A: AdcSource + ?Sized>(
        &mut self,
        adc: &mut A,
        tank: TankId,
    ) -> FuelReading {
        self.read_damped(adc, tank, self.config.samples)
    }

    #[inline]
    pub const fn damping_enabled(&self) -> bool { self.damping }

    /// Toggle damping. Re-enabling starts from a fresh seed.
    pub fn set_damping(
        &mut self,
        enabled: bool,
    ) {
        if enabled && !self.damping {
            self.reset_damping();
        }
        self.damping = enabled;
    }

    /// Forget both filters; the next reading of each tank seeds again.
    pub fn reset_damping(&mut self) {
        for ema in &mut self.ema {
            ema.reset();
        }
    }

    #[inline]
    pub const fn config(&self) -> &SensorConfig { &self.config }
}
