//! Screen areas that belong to someone else.
//!
//! The debug overlay publishes the rectangles it draws into; the gauge
//! renderer checks every fill against this set before issuing it. Keeping
//! the contract in one place means the overlay geometry is defined once
//! instead of being mirrored as offsets inside the gauge code.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

/// Maximum number of simultaneously reserved rectangles.
pub const MAX_RESERVED: usize = 4;

/// Set of reserved rectangles, queried by vertical span.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservedRegions {
    rects: Vec<Rectangle, MAX_RESERVED>,
}

impl ReservedRegions {
    pub const fn new() -> Self { Self { rects: Vec::new() } }

    /// Reserve a rectangle. Returns `false` when the set is full.
    pub fn reserve(
        &mut self,
        rect: Rectangle,
    ) -> bool {
        if self.rects.contains(&rect) {
            return true;
        }
        self.rects.push(rect).is_ok()
    }

    /// Give a rectangle back.
    pub fn release(
        &mut self,
        rect: &Rectangle,
    ) {
        self.rects.retain(|r| r != rect);
    }

    pub fn clear(&mut self) { self.rects.clear(); }

    #[inline]
    pub fn is_empty(&self) -> bool { self.rects.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Rectangle> { self.rects.iter() }

    /// Whether rows `y..y + height` touch any reserved rectangle.
    ///
    /// Only the vertical span is compared: the overlay spans the full
    /// screen width, so any draw in an overlapping row band is withheld.
    pub fn blocks_rows(
        &self,
        y: i32,
        height: u32,
    ) -> bool {
        if height == 0 {
            return false;
        }
        let bottom = y + height as i32;
        self.rects.iter().any(|r| {
            let r_top = r.top_left.y;
            let r_bottom = r_top + r.size.height as i32;
            r.size.height > 0 && y < r_bottom && r_top < bottom
        })
    }

    /// Whether `area` overlaps any reserved rectangle vertically.
    #[inline]
    pub fn blocks(
        &self,
        area: &Rectangle,
    ) -> bool {
        self.blocks_rows(area.top_left.y, area.size.height)
    }

    /// Split the row band `y..y + height` into the pieces outside all
    /// reservations. At most `MAX_RESERVED + 1` pieces result.
    pub fn free_spans(
        &self,
        y: i32,
        height: u32,
    ) -> Vec<(i32, u32), { MAX_RESERVED + 1 }> {
        let mut spans: Vec<(i32, u32), { MAX_RESERVED + 1 }> = Vec::new();
        let bottom = y + height as i32;
        let mut cursor = y;

        // Reserved bands sorted by top edge
        let mut bands: Vec<(i32, i32), MAX_RESERVED> = self
            .rects
            .iter()
            .filter(|r| r.size.height > 0)
            .map(|r| (r.top_left.y, r.top_left.y + r.size.height as i32))
            .collect();
        bands.sort_unstable_by_key(|b| b.0);

        for (top, end) in bands {
            if end <= cursor || top >= bottom {
                continue;
            }
            if top > cursor {
                spans.push((cursor, (top - cursor) as u32)).ok();
            }
            cursor = cursor.max(end);
        }
        if cursor < bottom {
            spans.push((cursor, (bottom - cursor) as u32)).ok();
        }
        spans
    }
}
