//! Operating modes and the single-button cycle between them.
//!
//! # Cycle
//!
//! ```text
//! Normal ──press──> Debug ──press──> Demo[0] ──press──> Demo[1] … Demo[n-1] ──press──> Normal
//! ```
//!
//! Entering Demo selects the first backlight level; each further press in
//! Demo steps to the next level until the list runs out, then returns to
//! Normal. A full round takes `2 + levels` presses.
//!
//! The controller only decides. Each press returns a [`ModeChange`] that
//! the application loop applies (backlight, demo reset, overlay redraw).

use crate::config::BRIGHTNESS_OUTPUT_MAX;

/// What the gauge is currently showing.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum OperatingMode {
    /// Live sender readings.
    #[default]
    Normal,
    /// Simulated bouncing values.
    Demo,
    /// Live readings plus the diagnostic overlay.
    Debug,
}

impl OperatingMode {
    /// Short label used in logs and the overlay.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Demo => "DEMO",
            Self::Debug => "DEBUG",
        }
    }

    /// Whether this mode samples the real senders.
    #[inline]
    pub const fn reads_sensors(self) -> bool { !matches!(self, Self::Demo) }
}

/// Side effects of one button press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModeChange {
    pub from: OperatingMode,
    pub to: OperatingMode,
    /// Backlight level to apply.
    pub backlight: u8,
    /// Demo generator must restart from its start values.
    pub reset_demo: bool,
    /// Overlay must redraw (or clear) from scratch.
    pub invalidate_overlay: bool,
    /// Active Demo brightness step, if in Demo after the press.
    pub demo_step: Option<usize>,
}

impl ModeChange {
    #[inline]
    pub fn mode_changed(&self) -> bool { self.from != self.to }

    #[inline]
    pub const fn entered_debug(&self) -> bool { matches!(self.to, OperatingMode::Debug) }

    #[inline]
    pub const fn left_debug(&self) -> bool {
        matches!(self.from, OperatingMode::Debug) && !matches!(self.to, OperatingMode::Debug)
    }
}

/// Mode state machine with the nested Demo brightness sub-cycle.
pub struct ModeController {
    mode: OperatingMode,
    levels: &'static [u8],
    demo_step: usize,
}

impl ModeController {
    pub const fn new(
        initial: OperatingMode,
        levels: &'static [u8],
    ) -> Self {
        Self {
            mode: initial,
            levels,
            demo_step: 0,
        }
    }

    #[inline]
    pub const fn mode(&self) -> OperatingMode { self.mode }

    #[inline]
    pub const fn demo_step(&self) -> usize { self.demo_step }

    /// Backlight level of the current Demo step.
    pub fn demo_level(&self) -> u8 { self.levels.get(self.demo_step).copied().unwrap_or(BRIGHTNESS_OUTPUT_MAX) }

    /// Advance the cycle by one debounced press.
    pub fn on_press(&mut self) -> ModeChange {
        let from = self.mode;
        match from {
            OperatingMode::Normal => {
                self.mode = OperatingMode::Debug;
                ModeChange {
                    from,
                    to: self.mode,
                    backlight: BRIGHTNESS_OUTPUT_MAX,
                    reset_demo: false,
                    invalidate_overlay: true,
                    demo_step: None,
                }
            }
            OperatingMode::Debug => {
                self.mode = OperatingMode::Demo;
                self.demo_step = 0;
                ModeChange {
                    from,
                    to: self.mode,
                    backlight: self.demo_level(),
                    reset_demo: true,
                    invalidate_overlay: true,
                    demo_step: Some(0),
                }
            }
            OperatingMode::Demo if self.demo_step + 1 < self.levels.len() => {
                self.demo_step += 1;
                ModeChange {
                    from,
                    to: self.mode,
                    backlight: self.demo_level(),
                    reset_demo: false,
                    invalidate_overlay: false,
                    demo_step: Some(self.demo_step),
                }
            }
            OperatingMode::Demo => {
                self.mode = OperatingMode::Normal;
                self.demo_step = 0;
                ModeChange {
                    from,
                    to: self.mode,
                    backlight: BRIGHTNESS_OUTPUT_MAX,
                    reset_demo: false,
                    invalidate_overlay: false,
                    demo_step: None,
                }
            }
        }
    }
}
