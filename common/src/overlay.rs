//! Debug overlay with per-cell dirty tracking.
//!
//! A full-width panel across the middle of the bars, shown in Debug mode:
//!
//! ```text
//! ──────────────────────────────────────  y = 110 (divider)
//!  T1 GPIO26            T2 GPIO27
//!  ADC: 2363            ADC: 2363
//!  V:   1.90            V:   1.90
//!  R:   136             R:   OPEN
//!  %:   50.0            %:   100.0
//!  BRT 3694 12.0V 99%
//!  MODE: DEBUG
//! ```
//!
//! The first draw after [`DebugOverlay::invalidate`] clears the panel and
//! draws every static label. Later draws compare each value cell against
//! the value it last showed, at display precision, and only redraw cells
//! that differ. The brightness row is redrawn on every call.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::brightness::BrightnessTelemetry;
use crate::colors::{BACKGROUND, BORDER};
use crate::config::{OVERLAY_COL1_X, OVERLAY_COL2_X, OVERLAY_HEIGHT, OVERLAY_LINE_HEIGHT, OVERLAY_Y, SCREEN_WIDTH};
use crate::sensor::{FuelReading, TankId};
use crate::styles::{DEBUG_FONT, DEBUG_LABEL_STYLE, DEBUG_MODE_STYLE, DEBUG_STYLE, LEFT_TOP};

// =============================================================================
// Geometry
// =============================================================================

/// Offset of a value from its label column.
const VALUE_OFFSET: i32 = 30;

/// Width cleared behind a value before it is redrawn.
const VALUE_WIDTH: u32 = 50;

/// Gap between the divider line and the first text row.
const TOP_PAD: i32 = 2;

const ROW_HEADER: i32 = 0;
const ROW_ADC: i32 = 1;
const ROW_VOLTS: i32 = 2;
const ROW_OHMS: i32 = 3;
const ROW_PERCENT: i32 = 4;
const ROW_BRIGHTNESS: i32 = 5;
const ROW_MODE: i32 = 6;

const _: () = assert!(OVERLAY_COL2_X + VALUE_OFFSET + VALUE_WIDTH as i32 <= SCREEN_WIDTH as i32);
const _: () = assert!(OVERLAY_COL1_X + VALUE_OFFSET + VALUE_WIDTH as i32 <= OVERLAY_COL2_X);

/// Top of text row `row`.
#[inline]
const fn row_y(row: i32) -> i32 { OVERLAY_Y + TOP_PAD + row * OVERLAY_LINE_HEIGHT }

/// Label column of a tank.
#[inline]
const fn column_x(tank: TankId) -> i32 {
    match tank {
        TankId::Tank1 => OVERLAY_COL1_X,
        TankId::Tank2 => OVERLAY_COL2_X,
    }
}

// =============================================================================
// Cached Values
// =============================================================================

/// Values one tank's column currently shows, at display precision.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
struct ColumnCache {
    raw: Option<u16>,
    centivolts: Option<u32>,
    /// Whole ohms, `-1` for `OPEN`.
    ohms: Option<i32>,
    decipercent: Option<u32>,
}

/// Round a non-negative value at a fixed scale.
#[inline]
fn scaled(
    value: f32,
    scale: f32,
) -> u32 {
    if value <= 0.0 {
        return 0;
    }
    (value * scale + 0.5) as u32
}

#[inline]
fn ohms_key(resistance: f32) -> i32 {
    if resistance < 0.0 {
        return -1;
    }
    (resistance + 0.5) as i32
}

/// `"136"` or `"OPEN"` for the sentinel.
fn resistance_text(resistance: f32) -> String<8> {
    let mut text = String::new();
    let ohms = ohms_key(resistance);
    if ohms < 0 {
        text.push_str("OPEN").ok();
    } else {
        write!(text, "{ohms}").ok();
    }
    text
}

// =============================================================================
// Overlay
// =============================================================================

/// Diagnostic panel state.
pub struct DebugOverlay {
    tank_gpio: [u8; 2],
    drawn: bool,
    columns: [ColumnCache; 2],
}

impl DebugOverlay {
    /// Screen band the overlay owns.
    pub const REGION: Rectangle = Rectangle::new(Point::new(0, OVERLAY_Y), Size::new(SCREEN_WIDTH, OVERLAY_HEIGHT));

    pub const fn new(tank_gpio: [u8; 2]) -> Self {
        Self {
            tank_gpio,
            drawn: false,
            columns: [ColumnCache {
                raw: None,
                centivolts: None,
                ohms: None,
                decipercent: None,
            }; 2],
        }
    }

    #[inline]
    pub const fn region(&self) -> Rectangle { Self::REGION }

    /// Whether the static frame is on screen.
    #[inline]
    pub const fn is_drawn(&self) -> bool { self.drawn }

    /// Force a full redraw on the next [`draw`](Self::draw).
    pub fn invalidate(&mut self) {
        self.drawn = false;
        self.columns = [ColumnCache::default(); 2];
    }

    /// Fill the region with the background and forget what was shown.
    pub fn clear<D>(
        &mut self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        Self::REGION
            .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
            .draw(display)
            .ok();
        self.invalidate();
    }

    /// Draw the panel. Returns the number of tank value cells redrawn.
    pub fn draw<D>(
        &mut self,
        display: &mut D,
        readings: &[FuelReading; 2],
        telemetry: &BrightnessTelemetry,
    ) -> usize
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.drawn {
            self.clear(display);
            self.draw_static(display);
            self.drawn = true;
        }

        let mut redrawn = 0;
        for tank in TankId::ALL {
            redrawn += self.draw_column(display, tank, &readings[tank.index()]);
        }
        draw_brightness(display, telemetry);
        redrawn
    }

    /// Divider, headers, labels and the mode line.
    fn draw_static<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        Line::new(Point::new(0, OVERLAY_Y), Point::new(SCREEN_WIDTH as i32 - 1, OVERLAY_Y))
            .into_styled(PrimitiveStyle::with_stroke(BORDER, 1))
            .draw(display)
            .ok();

        for tank in TankId::ALL {
            let x = column_x(tank);
            let mut header: String<12> = String::new();
            write!(header, "T{} GPIO{}", tank.number(), self.tank_gpio[tank.index()]).ok();
            Text::with_text_style(&header, Point::new(x, row_y(ROW_HEADER)), DEBUG_STYLE, LEFT_TOP)
                .draw(display)
                .ok();

            for (row, label) in [(ROW_ADC, "ADC:"), (ROW_VOLTS, "V:"), (ROW_OHMS, "R:"), (ROW_PERCENT, "%:")] {
                Text::with_text_style(label, Point::new(x, row_y(row)), DEBUG_LABEL_STYLE, LEFT_TOP)
                    .draw(display)
                    .ok();
            }
        }

        Text::with_text_style("MODE: DEBUG", Point::new(OVERLAY_COL1_X, row_y(ROW_MODE)), DEBUG_MODE_STYLE, LEFT_TOP)
            .draw(display)
            .ok();
    }

    /// Redraw the cells of one column whose displayed value changed.
    fn draw_column<D>(
        &mut self,
        display: &mut D,
        tank: TankId,
        reading: &FuelReading,
    ) -> usize
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let x = column_x(tank) + VALUE_OFFSET;
        let cache = &mut self.columns[tank.index()];
        let mut redrawn = 0;

        if cache.raw != Some(reading.raw_adc) {
            let mut text: String<8> = String::new();
            write!(text, "{}", reading.raw_adc).ok();
            draw_value(display, x, row_y(ROW_ADC), &text);
            cache.raw = Some(reading.raw_adc);
            redrawn += 1;
        }

        let centivolts = scaled(reading.voltage, 100.0);
        if cache.centivolts != Some(centivolts) {
            let mut text: String<8> = String::new();
            write!(text, "{}.{:02}", centivolts / 100, centivolts % 100).ok();
            draw_value(display, x, row_y(ROW_VOLTS), &text);
            cache.centivolts = Some(centivolts);
            redrawn += 1;
        }

        let ohms = ohms_key(reading.resistance);
        if cache.ohms != Some(ohms) {
            draw_value(display, x, row_y(ROW_OHMS), &resistance_text(reading.resistance));
            cache.ohms = Some(ohms);
            redrawn += 1;
        }

        let decipercent = scaled(reading.percent, 10.0);
        if cache.decipercent != Some(decipercent) {
            let mut text: String<8> = String::new();
            write!(text, "{}.{}", decipercent / 10, decipercent % 10).ok();
            draw_value(display, x, row_y(ROW_PERCENT), &text);
            cache.decipercent = Some(decipercent);
            redrawn += 1;
        }

        redrawn
    }
}

/// Clear one value cell and draw `text` into it.
fn draw_value<D>(
    display: &mut D,
    x: i32,
    y: i32,
    text: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::new(x, y), Size::new(VALUE_WIDTH, DEBUG_FONT.character_size.height))
        .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
        .draw(display)
        .ok();
    Text::with_text_style(text, Point::new(x, y), DEBUG_STYLE, LEFT_TOP)
        .draw(display)
        .ok();
}

/// Brightness-sense row: raw count, input volts, position in range.
fn draw_brightness<D>(
    display: &mut D,
    telemetry: &BrightnessTelemetry,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let y = row_y(ROW_BRIGHTNESS);
    let width = SCREEN_WIDTH - 2 * OVERLAY_COL1_X as u32;
    Rectangle::new(Point::new(OVERLAY_COL1_X, y), Size::new(width, DEBUG_FONT.character_size.height))
        .into_styled(PrimitiveStyle::with_fill(BACKGROUND))
        .draw(display)
        .ok();

    let decivolts = scaled(telemetry.voltage, 10.0);
    let mut text: String<32> = String::new();
    write!(
        text,
        "BRT {:>4} {:>2}.{}V {:>3}%",
        telemetry.raw,
        decivolts / 10,
        decivolts % 10,
        scaled(telemetry.percent, 1.0)
    )
    .ok();
    Text::with_text_style(&text, Point::new(OVERLAY_COL1_X, y), DEBUG_STYLE, LEFT_TOP)
        .draw(display)
        .ok();
}
