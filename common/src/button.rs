//! Button debounce handling.
//!
//! Provides time-based edge detection with debouncing to prevent
//! multiple triggers from contact bounce. The caller passes the current
//! millisecond timestamp, so the same logic runs on the RP2350 (Embassy
//! `Instant`) and in the simulator (`std::time::Instant`).

use crate::config::BUTTON_DEBOUNCE_MS;

/// Button debounce state with time-based edge detection.
pub struct ButtonState {
    debounce_ms: u64,
    /// Debounced level, `true` while pressed.
    stable_low: bool,
    /// Last level seen on the pin, settled or not.
    raw_low: bool,
    raw_since_ms: u64,
}

impl ButtonState {
    /// Create a new button state (not pressed) with the default window.
    pub const fn new() -> Self { Self::with_debounce(BUTTON_DEBOUNCE_MS) }

    pub const fn with_debounce(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            stable_low: false,
            raw_low: false,
            raw_since_ms: 0,
        }
    }

    /// Returns true only on the debounced edge to pressed.
    ///
    /// Buttons are active-low, so `is_low` means pressed. A new level is
    /// committed once the raw input has held it for the debounce window
    /// since its last transition; shorter glitches are dropped.
    pub fn just_pressed(
        &mut self,
        is_low: bool,
        now_ms: u64,
    ) -> bool {
        if is_low != self.raw_low {
            self.raw_low = is_low;
            self.raw_since_ms = now_ms;
        }

        if self.raw_low == self.stable_low || now_ms.saturating_sub(self.raw_since_ms) < self.debounce_ms {
            return false;
        }

        self.stable_low = self.raw_low;
        self.stable_low
    }

    #[inline]
    pub const fn is_pressed(&self) -> bool { self.stable_low }
}

impl Default for ButtonState {
    fn default() -> Self { Self::new() }
}
