//! Color constants for the fuel gauge.
//!
//! All colors are `Rgb565`, the native pixel format of the ST7789 panel.
//! Standard colors come from the `RgbColor` trait constants; the gauge's
//! own shades are built with `Rgb565::new(r, g, b)` using 5/6/5-bit
//! channel values.
//!
//! | Name | Raw | Used for |
//! |------|-----|----------|
//! | [`BACKGROUND`] | `0x0000` | Screen and text-cell clears |
//! | [`BORDER`] | `0xFFFF` | Gauge frame, overlay divider |
//! | [`SEGMENT_EMPTY`] | `0x2104` | Unfilled part of the bar |
//! | [`RED`] / [`YELLOW`] / [`GREEN`] | | Fuel zones |
//! | [`DEBUG_TEXT`] | `0x07FF` | Overlay labels and values |

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Screen background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Readout text and borders.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Low-fuel zone.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure yellow (31, 63, 0). Reserve zone and the overlay's mode line.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Pure green (0, 63, 0). Normal fuel zone.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Cyan (0, 63, 31). Debug overlay text.
pub const CYAN: Rgb565 = Rgb565::CYAN;

// =============================================================================
// Gauge Colors
// =============================================================================

/// Very dark gray for segments above the fill line.
/// RGB565: (4, 8, 4) = `0x2104`.
pub const SEGMENT_EMPTY: Rgb565 = Rgb565::new(4, 8, 4);

/// Dim gray used for the static overlay labels.
/// RGB565: (7, 15, 7) = `0x39E7`.
pub const DIM_GRAY: Rgb565 = Rgb565::new(7, 15, 7);

// =============================================================================
// Semantic Aliases
// =============================================================================

pub const BACKGROUND: Rgb565 = BLACK;
pub const BORDER: Rgb565 = WHITE;
pub const TEXT: Rgb565 = WHITE;
pub const DEBUG_TEXT: Rgb565 = CYAN;
