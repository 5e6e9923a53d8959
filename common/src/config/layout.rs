//! Display and layout configuration constants.
//!
//! The panel is a 170x320 ST7789 mounted in portrait. Both gauges sit side
//! by side and are centered horizontally:
//!
//! ```text
//!  x: 15          75   95          155
//!     +-- 60 --+  20  +-- 60 --+
//!     |  "25G" |      |  "50G" |     <- gallons, above the bar
//!     |########|      |########|     <- 20 segments, bottom-up
//!     |  "50%" |      | "100%" |     <- percent, below the bar
//! ```
//!
//! The debug overlay takes a full-width band across the middle of the bars.
//! Segments that would land inside it are skipped while Debug mode is active.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (portrait).
pub const SCREEN_WIDTH: u32 = 170;

/// Display height in pixels (portrait).
pub const SCREEN_HEIGHT: u32 = 320;

// =============================================================================
// Gauge Geometry
// =============================================================================

/// Bar width in pixels.
pub const GAUGE_WIDTH: u32 = 60;

/// Number of discrete segments per bar.
pub const SEGMENT_COUNT: u32 = 20;

/// Height of one segment in pixels.
pub const SEGMENT_HEIGHT: u32 = 13;

/// Background gap between neighbouring segments.
pub const SEGMENT_GAP: u32 = 1;

/// Horizontal gap between the two bars.
pub const GAUGE_GAP: u32 = 20;

/// Distance between the bar and its frame.
pub const BORDER_PAD: u32 = 2;

/// Vertical space between the frame and the readout text.
pub const TEXT_GAP: u32 = 1;

/// Y coordinate of the top segment (leaves room for the gallons readout).
pub const GAUGE_TOP: i32 = 20;

/// Total bar height including inter-segment gaps.
pub const BAR_HEIGHT: u32 = SEGMENT_COUNT * (SEGMENT_HEIGHT + SEGMENT_GAP) - SEGMENT_GAP;

/// Pixels that can carry fill (gaps excluded).
pub const FILL_PIXELS: u32 = SEGMENT_COUNT * SEGMENT_HEIGHT;

/// Left edge of the first bar.
pub const TANK1_X: i32 = ((SCREEN_WIDTH - (GAUGE_WIDTH * 2 + GAUGE_GAP)) / 2) as i32;

/// Left edge of the second bar.
pub const TANK2_X: i32 = TANK1_X + (GAUGE_WIDTH + GAUGE_GAP) as i32;

const _: () = assert!(GAUGE_WIDTH * 2 + GAUGE_GAP + BORDER_PAD * 2 <= SCREEN_WIDTH);
const _: () = assert!(GAUGE_TOP as u32 + BAR_HEIGHT + BORDER_PAD < SCREEN_HEIGHT);
const _: () = assert!(SEGMENT_COUNT > 0 && SEGMENT_HEIGHT > 0);

// =============================================================================
// Debug Overlay Geometry
// =============================================================================

/// Top of the overlay band.
pub const OVERLAY_Y: i32 = 110;

/// Height of the overlay band.
pub const OVERLAY_HEIGHT: u32 = 80;

/// Row pitch for overlay text (FONT_6X10).
pub const OVERLAY_LINE_HEIGHT: i32 = 10;

/// Left column (tank 1).
pub const OVERLAY_COL1_X: i32 = 5;

/// Right column (tank 2).
pub const OVERLAY_COL2_X: i32 = (SCREEN_WIDTH / 2) as i32 + 5;

const _: () = assert!(OVERLAY_Y >= 0);
const _: () = assert!(OVERLAY_Y as u32 + OVERLAY_HEIGHT <= SCREEN_HEIGHT);
// Header, ADC, V, R, %, brightness, mode line
const _: () = assert!(OVERLAY_LINE_HEIGHT * 7 + 2 <= OVERLAY_HEIGHT as i32);
