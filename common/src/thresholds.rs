//! Fuel zone thresholds.
//!
//! A percentage at or below [`FUEL_RED`] is in the red zone, at or below
//! [`FUEL_YELLOW`] in the yellow zone, and anything above is green. The
//! lower zone owns the boundary value.

/// Upper bound (inclusive) of the red zone, in percent.
pub const FUEL_RED: f32 = 20.0;

/// Upper bound (inclusive) of the yellow zone, in percent.
pub const FUEL_YELLOW: f32 = 40.0;

// Compile-time validation: thresholds must be in ascending order
const _: () = assert!(FUEL_RED < FUEL_YELLOW);
const _: () = assert!(FUEL_RED >= 0.0 && FUEL_YELLOW <= 100.0);
