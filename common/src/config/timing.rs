//! Rate limits and demo parameters.
//!
//! Every interval here is checked as "time since last event ≥ threshold"
//! against a monotonic millisecond clock supplied by the caller.

/// Minimum time between two sample-and-render passes.
pub const MAIN_LOOP_MS: u64 = 50;

/// Button settling window.
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Auto-brightness re-evaluation period.
pub const BRIGHTNESS_UPDATE_MS: u64 = 500;

/// Period of the tank telemetry report in Demo and Debug.
pub const TELEMETRY_LOG_MS: u64 = 1000;

// =============================================================================
// Demo
// =============================================================================

/// Time between two demo steps.
pub const DEMO_INTERVAL_MS: u64 = 150;

/// Percent moved per demo step.
pub const DEMO_STEP: f32 = 1.0;

/// Tank 1 starts half full and rises.
pub const DEMO_START_TANK1: f32 = 50.0;

/// Tank 2 starts full and falls.
pub const DEMO_START_TANK2: f32 = 100.0;

/// Backlight levels stepped through while in Demo.
pub const DEMO_BRIGHTNESS_LEVELS: [u8; 4] = [255, 180, 100, 40];

const _: () = assert!(DEMO_STEP > 0.0 && DEMO_STEP <= 100.0);
const _: () = assert!(DEMO_START_TANK1 >= 0.0 && DEMO_START_TANK1 <= 100.0);
const _: () = assert!(DEMO_START_TANK2 >= 0.0 && DEMO_START_TANK2 <= 100.0);
const _: () = assert!(DEMO_BRIGHTNESS_LEVELS.len() > 0);
