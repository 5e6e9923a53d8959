//! Application configuration.
//!
//! - `layout`: Display dimensions and gauge/overlay geometry
//! - `sensor`: ADC, sender and brightness-sense constants
//! - `timing`: Rate limits and demo parameters
//!
//! The constants are grouped into small `Copy` structs so components take
//! their settings by value. Each struct has a `DEFAULT` built from the
//! constants; tests and the simulator override single fields with struct
//! update syntax:
//!
//! ```ignore
//! let config = FuelGaugeConfig {
//!     initial_mode: OperatingMode::Demo,
//!     ..FuelGaugeConfig::DEFAULT
//! };
//! ```

pub mod layout;
pub mod sensor;
pub mod timing;

pub use layout::*;
pub use sensor::*;
pub use timing::*;

use crate::modes::OperatingMode;
use crate::thresholds::{FUEL_RED, FUEL_YELLOW};

// =============================================================================
// Sensor Configuration
// =============================================================================

/// Divider, sender and filtering parameters for the tank inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorConfig {
    pub adc_max: u16,
    pub vref: f32,
    pub r_ref: f32,
    pub r_full: f32,
    pub r_empty: f32,
    pub tolerance: f32,
    pub samples: usize,
    pub alpha: f32,
    pub damping: bool,
    /// GPIO number of each tank input, for the overlay headers.
    pub tank_gpio: [u8; 2],
}

impl SensorConfig {
    pub const DEFAULT: Self = Self {
        adc_max: ADC_MAX,
        vref: ADC_VREF,
        r_ref: R_REF_OHMS,
        r_full: SENDER_FULL_OHMS,
        r_empty: SENDER_EMPTY_OHMS,
        tolerance: SENDER_TOLERANCE_OHMS,
        samples: ADC_SAMPLES,
        alpha: SMOOTHING_ALPHA,
        damping: DAMPING_ENABLED,
        tank_gpio: TANK_GPIO,
    };
}

impl Default for SensorConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Gauge Configuration
// =============================================================================

/// Bar geometry, zone thresholds and tank size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeConfig {
    pub width: u32,
    pub segment_count: u32,
    pub segment_height: u32,
    pub segment_gap: u32,
    pub red_threshold: f32,
    pub yellow_threshold: f32,
    pub capacity_gallons: f32,
    /// Left edge of each bar.
    pub x: [i32; 2],
    /// Top of both bars.
    pub y: i32,
}

impl GaugeConfig {
    pub const DEFAULT: Self = Self {
        width: GAUGE_WIDTH,
        segment_count: SEGMENT_COUNT,
        segment_height: SEGMENT_HEIGHT,
        segment_gap: SEGMENT_GAP,
        red_threshold: FUEL_RED,
        yellow_threshold: FUEL_YELLOW,
        capacity_gallons: TANK_CAPACITY_GALLONS,
        x: [TANK1_X, TANK2_X],
        y: GAUGE_TOP,
    };

    /// Bar height including gaps.
    #[inline]
    pub const fn bar_height(&self) -> u32 {
        if self.segment_count == 0 {
            return 0;
        }
        self.segment_count * (self.segment_height + self.segment_gap) - self.segment_gap
    }

    /// Pixels that can carry fill.
    #[inline]
    pub const fn fill_pixels(&self) -> u32 { self.segment_count * self.segment_height }
}

impl Default for GaugeConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Brightness Configuration
// =============================================================================

/// Ambient-light mapping for the backlight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrightnessConfig {
    pub auto: bool,
    pub samples: usize,
    pub r1: f32,
    pub r2: f32,
    pub v_min: f32,
    pub v_max: f32,
    pub out_min: u8,
    pub out_max: u8,
    pub hysteresis: u8,
    pub update_ms: u64,
    pub gpio: u8,
}

impl BrightnessConfig {
    pub const DEFAULT: Self = Self {
        auto: BRIGHTNESS_AUTO_ENABLED,
        samples: BRIGHTNESS_SAMPLES,
        r1: BRIGHTNESS_R1_OHMS,
        r2: BRIGHTNESS_R2_OHMS,
        v_min: BRIGHTNESS_VOLTAGE_MIN,
        v_max: BRIGHTNESS_VOLTAGE_MAX,
        out_min: BRIGHTNESS_OUTPUT_MIN,
        out_max: BRIGHTNESS_OUTPUT_MAX,
        hysteresis: BRIGHTNESS_HYSTERESIS,
        update_ms: BRIGHTNESS_UPDATE_MS,
        gpio: BRIGHTNESS_GPIO,
    };

    /// Scale factor from ADC pin voltage back to the divider input.
    #[inline]
    pub fn divider_gain(&self) -> f32 {
        if self.r2 <= 0.0 {
            return 1.0;
        }
        (self.r1 + self.r2) / self.r2
    }
}

impl Default for BrightnessConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Demo Configuration
// =============================================================================

/// Parameters of the bouncing demo and its backlight sub-cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemoConfig {
    pub interval_ms: u64,
    pub step: f32,
    pub start: [f32; 2],
    pub levels: &'static [u8],
}

impl DemoConfig {
    pub const DEFAULT: Self = Self {
        interval_ms: DEMO_INTERVAL_MS,
        step: DEMO_STEP,
        start: [DEMO_START_TANK1, DEMO_START_TANK2],
        levels: &DEMO_BRIGHTNESS_LEVELS,
    };
}

impl Default for DemoConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Timing Configuration
// =============================================================================

/// Loop-level rate limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub loop_ms: u64,
    pub debounce_ms: u64,
    pub telemetry_ms: u64,
}

impl TimingConfig {
    pub const DEFAULT: Self = Self {
        loop_ms: MAIN_LOOP_MS,
        debounce_ms: BUTTON_DEBOUNCE_MS,
        telemetry_ms: TELEMETRY_LOG_MS,
    };
}

impl Default for TimingConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Complete Configuration
// =============================================================================

/// Everything the application loop needs, in one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelGaugeConfig {
    pub sensor: SensorConfig,
    pub gauge: GaugeConfig,
    pub brightness: BrightnessConfig,
    pub demo: DemoConfig,
    pub timing: TimingConfig,
    pub initial_mode: OperatingMode,
}

impl FuelGaugeConfig {
    pub const DEFAULT: Self = Self {
        sensor: SensorConfig::DEFAULT,
        gauge: GaugeConfig::DEFAULT,
        brightness: BrightnessConfig::DEFAULT,
        demo: DemoConfig::DEFAULT,
        timing: TimingConfig::DEFAULT,
        initial_mode: OperatingMode::Normal,
    };
}

impl Default for FuelGaugeConfig {
    fn default() -> Self { Self::DEFAULT }
}
