//! Test doubles shared by the unit tests.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

use crate::brightness::Backlight;
use crate::colors::BLACK;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sensor::{AdcChannel, AdcSource};

/// Framebuffer that records which pixels were written and how many draw
/// calls reached it.
pub struct RecordingDisplay {
    pixels: Vec<Rgb565>,
    touched: Vec<bool>,
    ops: usize,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        let len = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;
        Self {
            pixels: vec![BLACK; len],
            touched: vec![false; len],
            ops: 0,
        }
    }

    fn index(
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
            return None;
        }
        Some(y as usize * SCREEN_WIDTH as usize + x as usize)
    }

    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        Self::index(x, y).map(|i| self.pixels[i])
    }

    /// Draw calls since the last reset.
    pub const fn ops(&self) -> usize { self.ops }

    /// Forget draw calls and touched pixels, keep the image.
    pub fn reset_ops(&mut self) {
        self.ops = 0;
        self.touched.iter_mut().for_each(|t| *t = false);
    }

    /// Whether any pixel inside `area` was written since the last reset.
    pub fn touched_in(
        &self,
        area: &Rectangle,
    ) -> bool {
        area.points()
            .filter_map(|p| Self::index(p.x, p.y))
            .any(|i| self.touched[i])
    }

    /// Pixels of `color` inside `area`.
    pub fn count_in(
        &self,
        area: &Rectangle,
        color: Rgb565,
    ) -> usize {
        area.points()
            .filter_map(|p| Self::index(p.x, p.y))
            .filter(|&i| self.pixels[i] == color)
            .count()
    }
}

impl OriginDimensions for RecordingDisplay {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for RecordingDisplay {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.ops += 1;
        for Pixel(point, color) in pixels {
            if let Some(i) = Self::index(point.x, point.y) {
                self.pixels[i] = color;
                self.touched[i] = true;
            }
        }
        Ok(())
    }
}

/// Constant raw counts per channel plus a log of backlight writes.
pub struct FixedSenders {
    /// Tank 1, tank 2, brightness.
    pub raw: [u16; 3],
    /// Conversions performed per channel.
    pub reads: [usize; 3],
    pub backlight: Vec<u8>,
}

impl FixedSenders {
    /// Both tanks about half full, dash lights at 12 V.
    pub fn new() -> Self {
        Self {
            raw: [2363, 2363, 3694],
            reads: [0; 3],
            backlight: Vec::new(),
        }
    }

    pub fn last_backlight(&self) -> Option<u8> { self.backlight.last().copied() }
}

impl AdcSource for FixedSenders {
    fn read_raw(
        &mut self,
        channel: AdcChannel,
    ) -> u16 {
        let slot = match channel {
            AdcChannel::Tank1 => 0,
            AdcChannel::Tank2 => 1,
            AdcChannel::Brightness => 2,
        };
        self.reads[slot] += 1;
        self.raw[slot]
    }
}

impl Backlight for FixedSenders {
    fn set_brightness(
        &mut self,
        level: u8,
    ) {
        self.backlight.push(level);
    }
}
