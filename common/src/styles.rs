//! Pre-computed static text styles.
//!
//! `MonoTextStyle` and `TextStyle` values are `const` so draw functions
//! reference them directly instead of building styles on every redraw.
//! Every style draws with a transparent background: text cells are cleared
//! with a filled rectangle before each redraw, which also wipes glyphs left
//! over from a longer previous string.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_12_POINT;

use crate::colors::{DEBUG_TEXT, DIM_GRAY, TEXT, YELLOW};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered horizontally, positioned by the glyph top. Gauge readouts.
pub const CENTERED_TOP: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

/// Left-aligned, positioned by the glyph top. Overlay rows.
pub const LEFT_TOP: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Gallons and percent readouts.
pub const READOUT_FONT: &MonoFont<'static> = &PROFONT_12_POINT;

/// Debug overlay text.
pub const DEBUG_FONT: &MonoFont<'static> = &FONT_6X10;

// =============================================================================
// Text Styles
// =============================================================================

/// White readout text above and below the bars.
pub const READOUT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(READOUT_FONT, TEXT);

/// Overlay value text.
pub const DEBUG_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(DEBUG_FONT, DEBUG_TEXT);

/// Overlay static labels.
pub const DEBUG_LABEL_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(DEBUG_FONT, DIM_GRAY);

/// Overlay mode line.
pub const DEBUG_MODE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(DEBUG_FONT, YELLOW);
