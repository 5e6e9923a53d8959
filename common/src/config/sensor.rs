//! Sender, ADC and brightness-sense constants.
//!
//! # Sender Circuit
//!
//! ```text
//!  VREF ──[ R_REF 100Ω ]──┬── ADC pin
//!                         │
//!                     [ sender ]  33Ω full … 240Ω empty
//!                         │
//!                        GND
//! ```
//!
//! The ADC sees `VREF * R_s / (R_REF + R_s)`, so a full tank reads about
//! 0.82 V (raw ≈ 1016) and an empty tank about 2.33 V (raw ≈ 2890).

// =============================================================================
// ADC
// =============================================================================

/// Resolution of the SAR ADC.
pub const ADC_BITS: u32 = 12;

/// Largest raw reading.
pub const ADC_MAX: u16 = (1 << ADC_BITS) - 1;

/// ADC reference voltage (also the divider supply).
pub const ADC_VREF: f32 = 3.3;

/// Samples averaged per tank reading.
pub const ADC_SAMPLES: usize = 10;

/// Upper bound accepted by the oversampling reader.
pub const ADC_MAX_SAMPLES: usize = 100;

/// Settle time between two oversampled reads.
pub const ADC_SETTLE_US: u32 = 100;

const _: () = assert!(ADC_SAMPLES >= 1 && ADC_SAMPLES <= ADC_MAX_SAMPLES);

// =============================================================================
// Sender
// =============================================================================

/// Fixed resistor on the supply side of the divider.
pub const R_REF_OHMS: f32 = 100.0;

/// Sender resistance with a full tank.
pub const SENDER_FULL_OHMS: f32 = 33.0;

/// Sender resistance with an empty tank.
pub const SENDER_EMPTY_OHMS: f32 = 240.0;

/// Slack outside the nominal sender range before a reading is flagged invalid.
pub const SENDER_TOLERANCE_OHMS: f32 = 10.0;

/// Usable volume of one tank.
pub const TANK_CAPACITY_GALLONS: f32 = 50.0;

/// Below this the divider voltage is treated as a short.
pub const MIN_DIVIDER_VOLTS: f32 = 0.001;

/// EMA weight of a new sample (lower is smoother).
pub const SMOOTHING_ALPHA: f32 = 0.15;

/// Whether readings are damped at boot.
pub const DAMPING_ENABLED: bool = true;

const _: () = assert!(SMOOTHING_ALPHA > 0.0 && SMOOTHING_ALPHA <= 1.0);
const _: () = assert!(TANK_CAPACITY_GALLONS > 0.0);

// =============================================================================
// Brightness Sense
// =============================================================================

/// Auto-dimming from the dash illumination line.
pub const BRIGHTNESS_AUTO_ENABLED: bool = true;

/// Samples averaged per brightness reading.
pub const BRIGHTNESS_SAMPLES: usize = 4;

/// Upper resistor of the 12 V sense divider.
pub const BRIGHTNESS_R1_OHMS: f32 = 10_000.0;

/// Lower resistor of the 12 V sense divider (ADC side).
pub const BRIGHTNESS_R2_OHMS: f32 = 3_300.0;

/// Input voltage mapped to the dimmest level.
pub const BRIGHTNESS_VOLTAGE_MIN: f32 = 1.0;

/// Input voltage mapped to full brightness.
pub const BRIGHTNESS_VOLTAGE_MAX: f32 = 12.0;

/// Dimmest backlight duty reached automatically.
pub const BRIGHTNESS_OUTPUT_MIN: u8 = 20;

/// Full backlight duty.
pub const BRIGHTNESS_OUTPUT_MAX: u8 = 255;

/// Minimum duty change before the backlight is touched.
pub const BRIGHTNESS_HYSTERESIS: u8 = 5;

const _: () = assert!(BRIGHTNESS_VOLTAGE_MIN < BRIGHTNESS_VOLTAGE_MAX);
const _: () = assert!(BRIGHTNESS_OUTPUT_MIN <= BRIGHTNESS_OUTPUT_MAX);
const _: () = assert!(BRIGHTNESS_SAMPLES >= 1 && BRIGHTNESS_SAMPLES <= ADC_MAX_SAMPLES);

// =============================================================================
// Pin Labels
// =============================================================================

/// GPIO numbers shown in the overlay headers (RP2350 ADC0/ADC1).
pub const TANK_GPIO: [u8; 2] = [26, 27];

/// GPIO of the brightness sense input (RP2350 ADC2).
pub const BRIGHTNESS_GPIO: u8 = 28;
