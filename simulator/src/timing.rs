//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` core does not have.

use std::time::Duration;

/// Target frame time. The app's own loop gate decides when to redraw, so
/// the window is polled faster than `MAIN_LOOP_MS` to keep the button
/// responsive.
pub const FRAME_TIME: Duration = Duration::from_millis(10);

/// Dash voltage change per key press.
pub const DASH_VOLTAGE_STEP: f32 = 0.5;
