//! Segmented bar gauge with differential redraw.
//!
//! Each tank is a vertical bar of `segment_count` segments, filled
//! bottom-up, with the gallons readout above and the percent readout below.
//! Segment colors are fixed by position, so the bar is a static
//! red → yellow → green gradient and the fill level reveals it.
//!
//! # Minimal Redraw
//!
//! A redraw happens only when one of the three visible quantities changes:
//!
//! | Quantity | Derived as |
//! |----------|-----------|
//! | Filled pixels | `trunc(p / 100 * segment_count * segment_height + 0.5)` |
//! | Gallons | `trunc(p / 100 * capacity + 0.5)` |
//! | Whole percent | `trunc(p + 0.5)` |
//!
//! A 0.4% drift that moves none of them draws nothing.
//!
//! # Reserved Regions
//!
//! Every fill is checked against [`ReservedRegions`] before it is issued.
//! Fills whose row span touches a reserved band are skipped, and the frame's
//! vertical edges are split around it, so nothing lands inside the debug
//! overlay while it is visible.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{BACKGROUND, BORDER, GREEN, RED, SEGMENT_EMPTY, YELLOW};
use crate::config::{BORDER_PAD, GaugeConfig, TEXT_GAP};
use crate::converter::clamp_percent;
use crate::regions::ReservedRegions;
use crate::sensor::TankId;
use crate::styles::{CENTERED_TOP, READOUT_FONT, READOUT_STYLE};

// =============================================================================
// Zones
// =============================================================================

/// Fuel level band.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FuelZone {
    Red,
    Yellow,
    Green,
}

impl FuelZone {
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Red => RED,
            Self::Yellow => YELLOW,
            Self::Green => GREEN,
        }
    }
}

/// Zone of a percentage. The lower zone owns each boundary.
pub fn zone_for_percent(
    percent: f32,
    config: &GaugeConfig,
) -> FuelZone {
    let p = clamp_percent(percent);
    if p <= config.red_threshold {
        FuelZone::Red
    } else if p <= config.yellow_threshold {
        FuelZone::Yellow
    } else {
        FuelZone::Green
    }
}

/// Display color for a percentage.
#[inline]
pub fn color_for_percent(
    percent: f32,
    config: &GaugeConfig,
) -> Rgb565 {
    zone_for_percent(percent, config).color()
}

// =============================================================================
// Derived Quantities
// =============================================================================

/// `trunc(fraction * scale + 0.5)` for a clamped percent, capped at `scale`.
#[inline]
fn scaled_round(
    percent: f32,
    scale: f32,
) -> u32 {
    let p = clamp_percent(percent);
    let value = (p / 100.0 * scale + 0.5) as u32;
    value.min(scale as u32)
}

/// Segments lit at `percent`, rounded half-up.
pub fn filled_segments(
    percent: f32,
    segment_count: u32,
) -> u32 {
    scaled_round(percent, segment_count as f32)
}

/// Pixel rows lit at `percent`, out of `total` fillable rows.
pub fn filled_pixels(
    percent: f32,
    total: u32,
) -> u32 {
    scaled_round(percent, total as f32)
}

/// Whole gallons shown at `percent`.
pub fn gallons(
    percent: f32,
    capacity: f32,
) -> u32 {
    if capacity <= 0.0 {
        return 0;
    }
    scaled_round(percent, capacity)
}

/// Whole percent shown at `percent`.
#[inline]
pub fn whole_percent(percent: f32) -> u32 { scaled_round(percent, 100.0) }

/// The three values that decide whether a gauge needs redrawing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GaugeDigest {
    pub pixels: u32,
    pub gallons: u32,
    pub percent: u32,
}

impl GaugeDigest {
    pub fn of(
        percent: f32,
        config: &GaugeConfig,
    ) -> Self {
        Self {
            pixels: filled_pixels(percent, config.fill_pixels()),
            gallons: gallons(percent, config.capacity_gallons),
            percent: whole_percent(percent),
        }
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Draws bars and readouts for a given geometry.
pub struct GaugeRenderer {
    config: GaugeConfig,
}

impl GaugeRenderer {
    pub const fn new(config: GaugeConfig) -> Self { Self { config } }

    #[inline]
    pub const fn config(&self) -> &GaugeConfig { &self.config }

    /// Position-fixed color of segment `index` (0 = bottom).
    pub fn segment_color(
        &self,
        index: u32,
    ) -> Rgb565 {
        let n = self.config.segment_count.max(1);
        color_for_percent(index as f32 / n as f32 * 100.0, &self.config)
    }

    /// Top row of segment `index` (0 = bottom).
    #[inline]
    fn segment_top(
        &self,
        y: i32,
        index: u32,
    ) -> i32 {
        let from_top = self.config.segment_count - 1 - index;
        y + (from_top * (self.config.segment_height + self.config.segment_gap)) as i32
    }

    /// Redraw the frame and every segment for `percent`.
    pub fn redraw_bar<D>(
        &self,
        display: &mut D,
        x: i32,
        y: i32,
        percent: f32,
        reserved: &ReservedRegions,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        self.draw_frame(display, x, y, reserved);

        let seg_h = self.config.segment_height;
        let width = self.config.width;
        let mut remaining = filled_pixels(percent, self.config.fill_pixels());

        for seg in 0..self.config.segment_count {
            let top = self.segment_top(y, seg);
            let color = self.segment_color(seg);

            if remaining >= seg_h {
                fill_unreserved(display, x, top, width, seg_h, color, reserved);
                remaining -= seg_h;
            } else if remaining > 0 {
                // Split segment: empty above the fill line, zone color below
                let empty = seg_h - remaining;
                fill_unreserved(display, x, top, width, empty, SEGMENT_EMPTY, reserved);
                fill_unreserved(display, x, top + empty as i32, width, remaining, color, reserved);
                remaining = 0;
            } else {
                fill_unreserved(display, x, top, width, seg_h, SEGMENT_EMPTY, reserved);
            }
        }
    }

    /// One-pixel frame `BORDER_PAD` pixels outside the bar.
    fn draw_frame<D>(
        &self,
        display: &mut D,
        x: i32,
        y: i32,
        reserved: &ReservedRegions,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let pad = BORDER_PAD as i32;
        let left = x - pad;
        let right = x + self.config.width as i32 + pad - 1;
        let top = y - pad;
        let bottom = y + self.config.bar_height() as i32 + pad - 1;
        let style = PrimitiveStyle::with_stroke(BORDER, 1);

        for row in [top, bottom] {
            if !reserved.blocks_rows(row, 1) {
                Line::new(Point::new(left, row), Point::new(right, row))
                    .into_styled(style)
                    .draw(display)
                    .ok();
            }
        }

        for (span_top, span_h) in reserved.free_spans(top, (bottom - top + 1) as u32) {
            let span_bottom = span_top + span_h as i32 - 1;
            for col in [left, right] {
                Line::new(Point::new(col, span_top), Point::new(col, span_bottom))
                    .into_styled(style)
                    .draw(display)
                    .ok();
            }
        }
    }

    /// Top row of the gallons readout.
    #[inline]
    pub fn gallons_text_top(
        &self,
        y: i32,
    ) -> i32 {
        let offset = (BORDER_PAD + TEXT_GAP + READOUT_FONT.character_size.height) as i32;
        (y - offset).max(0)
    }

    /// Top row of the percent readout.
    #[inline]
    pub fn percent_text_top(
        &self,
        y: i32,
    ) -> i32 {
        y + (self.config.bar_height() + BORDER_PAD + TEXT_GAP) as i32
    }

    /// Gallons readout above the bar, e.g. `" 7G"` or `"50G"`.
    pub fn draw_gallons<D>(
        &self,
        display: &mut D,
        x: i32,
        y: i32,
        percent: f32,
        reserved: &ReservedRegions,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut text: String<8> = String::new();
        write!(text, "{:>2}G", gallons(percent, self.config.capacity_gallons)).ok();
        self.draw_readout(display, x, self.gallons_text_top(y), &text, reserved);
    }

    /// Percent readout below the bar, e.g. `"  7%"` or `"100%"`.
    pub fn draw_percentage<D>(
        &self,
        display: &mut D,
        x: i32,
        y: i32,
        percent: f32,
        reserved: &ReservedRegions,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut text: String<8> = String::new();
        write!(text, "{:>3}%", whole_percent(percent)).ok();
        self.draw_readout(display, x, self.percent_text_top(y), &text, reserved);
    }

    /// Clear the text cell across the bar width, then draw centered text.
    /// A cell overlapping a reserved region is skipped whole.
    fn draw_readout<D>(
        &self,
        display: &mut D,
        x: i32,
        top: i32,
        text: &str,
        reserved: &ReservedRegions,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let height = READOUT_FONT.character_size.height;
        if reserved.blocks_rows(top, height) {
            return;
        }
        Rectangle::new(Point::new(x, top), Size::new(self.config.width, height))
            .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
            .draw(display)
            .ok();

        let center = x + (self.config.width / 2) as i32;
        Text::with_text_style(text, Point::new(center, top), READOUT_STYLE, CENTERED_TOP)
            .draw(display)
            .ok();
    }

    /// Bar plus both readouts, unconditionally.
    pub fn draw_full<D>(
        &self,
        display: &mut D,
        x: i32,
        y: i32,
        percent: f32,
        reserved: &ReservedRegions,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        self.draw_gallons(display, x, y, percent, reserved);
        self.redraw_bar(display, x, y, percent, reserved);
        self.draw_percentage(display, x, y, percent, reserved);
    }

    /// Redraw only if pixels, gallons or whole percent differ.
    ///
    /// Returns whether anything was drawn.
    pub fn update_if_changed<D>(
        &self,
        display: &mut D,
        x: i32,
        y: i32,
        old_percent: f32,
        new_percent: f32,
        reserved: &ReservedRegions,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if GaugeDigest::of(old_percent, &self.config) == GaugeDigest::of(new_percent, &self.config) {
            return false;
        }
        self.draw_full(display, x, y, new_percent, reserved);
        true
    }
}

/// Fill a rectangle unless its rows touch a reserved band.
fn fill_unreserved<D>(
    display: &mut D,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    color: Rgb565,
    reserved: &ReservedRegions,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if h == 0 || reserved.blocks_rows(y, h) {
        return;
    }
    Rectangle::new(Point::new(x, y), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();
}

// =============================================================================
// Per-Tank Display State
// =============================================================================

/// Position and last-rendered value of one tank's gauge.
#[derive(Clone, Copy, Debug)]
pub struct TankGauge {
    tank: TankId,
    x: i32,
    y: i32,
    /// `None` until the first draw (or after invalidation).
    last_percent: Option<f32>,
}

impl TankGauge {
    pub const fn new(
        tank: TankId,
        x: i32,
        y: i32,
    ) -> Self {
        Self {
            tank,
            x,
            y,
            last_percent: None,
        }
    }

    #[inline]
    pub const fn tank(&self) -> TankId { self.tank }

    #[inline]
    pub const fn last_percent(&self) -> Option<f32> { self.last_percent }

    /// Force a full draw on the next [`render`](Self::render).
    pub fn invalidate(&mut self) { self.last_percent = None; }

    /// Draw in full the first time, differentially afterwards.
    ///
    /// The remembered value only moves when something was drawn, so slow
    /// drift accumulates until it crosses a visible boundary.
    pub fn render<D>(
        &mut self,
        display: &mut D,
        renderer: &GaugeRenderer,
        percent: f32,
        reserved: &ReservedRegions,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let percent = clamp_percent(percent);
        let changed = match self.last_percent {
            None => {
                renderer.draw_full(display, self.x, self.y, percent, reserved);
                true
            }
            Some(old) => renderer.update_if_changed(display, self.x, self.y, old, percent, reserved),
        };
        if changed {
            self.last_percent = Some(percent);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, TEXT};
    use crate::config::{GAUGE_TOP, OVERLAY_HEIGHT, OVERLAY_Y, SCREEN_HEIGHT, SCREEN_WIDTH, TANK1_X};
    use crate::testing::RecordingDisplay;

    const CONFIG: GaugeConfig = GaugeConfig::DEFAULT;

    fn overlay_band() -> Rectangle {
        Rectangle::new(Point::new(0, OVERLAY_Y), Size::new(SCREEN_WIDTH, OVERLAY_HEIGHT))
    }

    #[test]
    fn test_color_zones() {
        for p in [0.0, 10.0, 20.0] {
            assert_eq!(zone_for_percent(p, &CONFIG), FuelZone::Red, "{p}");
        }
        for p in [20.1, 30.0, 40.0] {
            assert_eq!(zone_for_percent(p, &CONFIG), FuelZone::Yellow, "{p}");
        }
        for p in [40.1, 75.0, 100.0] {
            assert_eq!(zone_for_percent(p, &CONFIG), FuelZone::Green, "{p}");
        }
        assert_eq!(color_for_percent(-10.0, &CONFIG), RED);
        assert_eq!(color_for_percent(150.0, &CONFIG), GREEN);
    }

    #[test]
    fn test_filled_segments() {
        assert_eq!(filled_segments(0.0, 20), 0);
        assert_eq!(filled_segments(100.0, 20), 20);
        assert_eq!(filled_segments(50.0, 20), 10);
        assert_eq!(filled_segments(5.0, 20), 1);
        assert_eq!(filled_segments(2.5, 20), 1);
        assert_eq!(filled_segments(2.4, 20), 0);
        assert_eq!(filled_segments(-10.0, 20), 0);
        assert_eq!(filled_segments(150.0, 20), 20);
    }

    #[test]
    fn test_filled_segments_monotonic() {
        let mut prev = 0;
        let mut p = -5.0f32;
        while p <= 105.0 {
            let n = filled_segments(p, 20);
            assert!(n >= prev);
            prev = n;
            p += 0.25;
        }
    }

    #[test]
    fn test_digest() {
        let d = GaugeDigest::of(50.0, &CONFIG);
        assert_eq!(d.pixels, 130);
        assert_eq!(d.gallons, 25);
        assert_eq!(d.percent, 50);
        assert_eq!(GaugeDigest::of(120.0, &CONFIG), GaugeDigest::of(100.0, &CONFIG));
    }

    #[test]
    fn test_segment_colors_are_positional() {
        let renderer = GaugeRenderer::new(CONFIG);
        assert_eq!(renderer.segment_color(0), RED);
        assert_eq!(renderer.segment_color(4), RED);
        assert_eq!(renderer.segment_color(5), YELLOW);
        assert_eq!(renderer.segment_color(8), YELLOW);
        assert_eq!(renderer.segment_color(9), GREEN);
        assert_eq!(renderer.segment_color(19), GREEN);
    }

    #[test]
    fn test_redraw_bar_pixels() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let reserved = ReservedRegions::new();
        let x = TANK1_X;
        let y = GAUGE_TOP;
        let bottom = y + CONFIG.bar_height() as i32 - 1;

        // 50% of 260 rows = 130 rows = 10 full segments
        renderer.redraw_bar(&mut display, x, y, 50.0, &reserved);
        assert_eq!(display.pixel(x + 5, bottom), Some(RED));
        assert_eq!(display.pixel(x + 5, y), Some(SEGMENT_EMPTY));
        // Segment 9 (green) is the top lit one
        let seg9_top = y + (10 * 14);
        assert_eq!(display.pixel(x, seg9_top), Some(GREEN));
        // Gap rows are left untouched
        assert_eq!(display.pixel(x, seg9_top - 1), Some(BLACK));
        // Frame
        assert_eq!(display.pixel(x - 2, y - 2), Some(BORDER));
        assert_eq!(display.pixel(x + 61, bottom + 2), Some(BORDER));
    }

    #[test]
    fn test_redraw_bar_partial_segment() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let reserved = ReservedRegions::new();
        let x = TANK1_X;
        let y = GAUGE_TOP;

        // 2% of 260 = 5.2 -> 5 rows in the bottom segment
        renderer.redraw_bar(&mut display, x, y, 2.0, &reserved);
        let seg0_top = y + 19 * 14;
        assert_eq!(display.pixel(x, seg0_top), Some(SEGMENT_EMPTY));
        assert_eq!(display.pixel(x, seg0_top + 7), Some(SEGMENT_EMPTY));
        assert_eq!(display.pixel(x, seg0_top + 8), Some(RED));
        assert_eq!(display.pixel(x, seg0_top + 12), Some(RED));
    }

    #[test]
    fn test_redraw_bar_skips_reserved_rows() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let mut reserved = ReservedRegions::new();
        reserved.reserve(overlay_band());

        renderer.draw_full(&mut display, TANK1_X, GAUGE_TOP, 100.0, &reserved);
        assert!(!display.touched_in(&overlay_band()));
        // Frame still drawn outside the band
        assert_eq!(display.pixel(TANK1_X - 2, OVERLAY_Y - 1), Some(BORDER));
        assert_eq!(display.pixel(TANK1_X - 2, OVERLAY_Y + OVERLAY_HEIGHT as i32), Some(BORDER));
        // Segments outside the band still drawn
        assert_eq!(display.pixel(TANK1_X, GAUGE_TOP), Some(GREEN));
    }

    #[test]
    fn test_update_if_changed() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let reserved = ReservedRegions::new();
        let (x, y) = (TANK1_X, GAUGE_TOP);

        assert!(!renderer.update_if_changed(&mut display, x, y, 50.0, 50.0, &reserved));
        assert_eq!(display.ops(), 0);

        // 50.0 -> 50.1: pixels 130 -> 130, gallons 25 -> 25, percent 50 -> 50
        assert!(!renderer.update_if_changed(&mut display, x, y, 50.0, 50.1, &reserved));
        assert_eq!(display.ops(), 0);

        // Crosses the whole-percent boundary
        assert!(renderer.update_if_changed(&mut display, x, y, 50.0, 50.6, &reserved));
        assert!(display.ops() > 0);
    }

    #[test]
    fn test_update_if_changed_each_boundary() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let reserved = ReservedRegions::new();
        let (x, y) = (TANK1_X, GAUGE_TOP);

        // Pixel row only: 260 * 0.4019 = 104.49 vs 260 * 0.4021 = 104.55
        let (a, b) = (40.19, 40.21);
        assert_eq!(whole_percent(a), whole_percent(b));
        assert_eq!(gallons(a, 50.0), gallons(b, 50.0));
        assert_ne!(filled_pixels(a, 260), filled_pixels(b, 260));
        assert!(renderer.update_if_changed(&mut display, x, y, a, b, &reserved));

        // Gallons only: 50 * 0.4099 = 20.495 vs 50 * 0.4101 = 20.505
        let (a, b) = (40.99, 41.01);
        assert_eq!(whole_percent(a), whole_percent(b));
        assert_ne!(gallons(a, 50.0), gallons(b, 50.0));
        assert!(renderer.update_if_changed(&mut display, x, y, a, b, &reserved));
    }

    #[test]
    fn test_readout_text_is_fixed_width() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let (x, y) = (TANK1_X, GAUGE_TOP);
        let top = renderer.percent_text_top(y);
        let height = READOUT_FONT.character_size.height;
        let cell = Rectangle::new(Point::new(x, top), Size::new(CONFIG.width, height));

        let reserved = ReservedRegions::new();

        renderer.draw_percentage(&mut display, x, y, 100.0, &reserved);
        let wide = display.count_in(&cell, TEXT);
        renderer.draw_percentage(&mut display, x, y, 7.0, &reserved);
        let narrow = display.count_in(&cell, TEXT);
        assert!(wide > narrow);
        assert!(narrow > 0);
    }

    #[test]
    fn test_readouts_skip_reserved_rows() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let (x, y) = (TANK1_X, GAUGE_TOP);
        let mut reserved = ReservedRegions::new();
        let band = Rectangle::new(Point::new(0, renderer.percent_text_top(y)), Size::new(SCREEN_WIDTH, 4));
        assert!(reserved.reserve(band));

        renderer.draw_percentage(&mut display, x, y, 55.0, &reserved);
        assert_eq!(display.ops(), 0);

        // The gallons row is clear of the band and still drawn
        renderer.draw_gallons(&mut display, x, y, 55.0, &reserved);
        assert!(display.ops() > 0);
        assert!(!display.touched_in(&band));
    }

    #[test]
    fn test_readouts_stay_on_screen() {
        let renderer = GaugeRenderer::new(CONFIG);
        assert!(renderer.gallons_text_top(GAUGE_TOP) >= 0);
        let bottom = renderer.percent_text_top(GAUGE_TOP) + READOUT_FONT.character_size.height as i32;
        assert!(bottom <= SCREEN_HEIGHT as i32);
        // Gallons text ends above the frame
        let gallons_bottom = renderer.gallons_text_top(GAUGE_TOP) + READOUT_FONT.character_size.height as i32;
        assert!(gallons_bottom <= GAUGE_TOP - BORDER_PAD as i32);
    }

    #[test]
    fn test_tank_gauge_render() {
        let renderer = GaugeRenderer::new(CONFIG);
        let mut display = RecordingDisplay::new();
        let reserved = ReservedRegions::new();
        let mut gauge = TankGauge::new(TankId::Tank1, TANK1_X, GAUGE_TOP);

        assert!(gauge.render(&mut display, &renderer, 30.0, &reserved));
        display.reset_ops();
        assert!(!gauge.render(&mut display, &renderer, 30.0, &reserved));
        assert_eq!(display.ops(), 0);

        // Sub-threshold drift accumulates against the last drawn value
        assert!(!gauge.render(&mut display, &renderer, 30.05, &reserved));
        assert!(!gauge.render(&mut display, &renderer, 30.1, &reserved));
        assert_eq!(gauge.last_percent(), Some(30.0));

        gauge.invalidate();
        assert!(gauge.render(&mut display, &renderer, 30.1, &reserved));
        assert_eq!(gauge.last_percent(), Some(30.1));
    }
}
