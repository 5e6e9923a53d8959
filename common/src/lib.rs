//! Core of the dual-tank fuel gauge.
//!
//! Platform-agnostic code shared between the desktop simulator and the
//! RP2350 firmware:
//!
//! - [`converter`]: ADC count → voltage → resistance → percent
//! - [`sensor`]: Oversampling, validity and EMA damping per tank
//! - [`gauge`]: Segmented bars with differential redraw
//! - [`regions`]: Screen areas the gauges must not draw into
//! - [`overlay`]: Debug panel with per-cell dirty tracking
//! - [`modes`]: Normal / Debug / Demo button cycle
//! - [`button`]: Debounce with an injected clock
//! - [`demo`]: Bouncing values for Demo mode
//! - [`brightness`]: Backlight level and ambient auto-dimming
//! - [`app`]: The main loop tying everything together
//! - [`sim`]: Simulated senders for running without hardware
//! - [`colors`], [`styles`], [`thresholds`], [`config`]: Constants
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` outside of tests. Time is always passed in as
//! milliseconds and hardware is reached only through the [`AdcSource`],
//! [`Backlight`] and `DrawTarget` traits, so the same code runs on the
//! microcontroller and on the desktop.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod app;
pub mod brightness;
pub mod button;
pub mod colors;
pub mod config;
pub mod converter;
pub mod demo;
pub mod gauge;
pub mod modes;
pub mod overlay;
pub mod regions;
pub mod sensor;
pub mod sim;
pub mod styles;
pub mod thresholds;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use app::{FuelGaugeApp, Telemetry, TickReport};
pub use brightness::{Backlight, BrightnessTelemetry};
pub use config::FuelGaugeConfig;
pub use modes::{ModeChange, OperatingMode};
pub use sensor::{AdcChannel, AdcSource, FuelReading, TankId};
pub use sim::SimulatedSenders;
