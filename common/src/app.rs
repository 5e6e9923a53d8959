//! Application loop shared by the firmware and the simulator.
//!
//! [`FuelGaugeApp`] owns every piece of runtime state. The caller provides
//! the clock, the raw button level, a draw target and one hardware value
//! implementing both [`AdcSource`] and [`Backlight`], then calls
//! [`FuelGaugeApp::tick`] as often as it likes.
//!
//! # Tick Order
//!
//! 1. Button: polled on every call, before the loop gate, so no press is
//!    lost while the loop is idle.
//! 2. Loop gate: the rest runs at most once per `loop_ms`.
//! 3. Sample: both senders in Normal and Debug, the demo generator in Demo.
//! 4. Brightness: ambient sense for the overlay; auto-dimming in Normal.
//! 5. Gauges: full draw on the first frame, differential afterwards.
//! 6. Overlay: Debug only.
//!
//! Nothing here logs. Events come back in a [`TickReport`] and the binary
//! decides how to print them.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::brightness::{Backlight, BrightnessController, BrightnessTelemetry};
use crate::button::ButtonState;
use crate::colors::BACKGROUND;
use crate::config::FuelGaugeConfig;
use crate::demo::DemoGenerator;
use crate::gauge::{GaugeRenderer, TankGauge};
use crate::modes::{ModeChange, ModeController, OperatingMode};
use crate::overlay::DebugOverlay;
use crate::regions::ReservedRegions;
use crate::sensor::{AdcChannel, AdcSource, FuelReading, FuelSensor, TankId, read_raw_averaged};

/// Periodic status line for Demo and Debug.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Telemetry {
    pub mode: OperatingMode,
    pub percents: [f32; 2],
    pub valid: [bool; 2],
    pub backlight: u8,
}

/// What happened during one [`FuelGaugeApp::tick`].
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct TickReport {
    /// The loop gate opened and a frame was processed.
    pub ran: bool,
    pub mode_change: Option<ModeChange>,
    /// Tanks whose reading turned invalid on this tick.
    pub invalid_tanks: [bool; 2],
    /// Level committed by auto-dimming.
    pub brightness: Option<u8>,
    pub telemetry: Option<Telemetry>,
    /// Gauges that drew anything.
    pub redrawn: [bool; 2],
}

/// The whole fuel gauge.
pub struct FuelGaugeApp {
    config: FuelGaugeConfig,
    sensor: FuelSensor,
    renderer: GaugeRenderer,
    gauges: [TankGauge; 2],
    overlay: DebugOverlay,
    regions: ReservedRegions,
    modes: ModeController,
    button: ButtonState,
    demo: DemoGenerator,
    brightness: BrightnessController,
    readings: [FuelReading; 2],
    percents: [f32; 2],
    invalid: [bool; 2],
    last_tick_ms: Option<u64>,
    last_telemetry_ms: Option<u64>,
    started: bool,
}

impl FuelGaugeApp {
    pub fn new(config: FuelGaugeConfig) -> Self {
        let modes = ModeController::new(config.initial_mode, config.demo.levels);
        let mut brightness = BrightnessController::new(config.brightness);
        let mut regions = ReservedRegions::new();
        match config.initial_mode {
            OperatingMode::Demo => brightness.set(modes.demo_level()),
            OperatingMode::Debug => {
                regions.reserve(DebugOverlay::REGION);
            }
            OperatingMode::Normal => {}
        }

        let gauge = config.gauge;
        let empty = FuelReading::from_raw(0, &config.sensor);
        Self {
            sensor: FuelSensor::new(config.sensor),
            renderer: GaugeRenderer::new(gauge),
            gauges: [
                TankGauge::new(TankId::Tank1, gauge.x[0], gauge.y),
                TankGauge::new(TankId::Tank2, gauge.x[1], gauge.y),
            ],
            overlay: DebugOverlay::new(config.sensor.tank_gpio),
            regions,
            modes,
            button: ButtonState::with_debounce(config.timing.debounce_ms),
            demo: DemoGenerator::new(config.demo),
            brightness,
            readings: [empty; 2],
            percents: [0.0; 2],
            invalid: [false; 2],
            last_tick_ms: None,
            last_telemetry_ms: None,
            started: false,
            config,
        }
    }

    #[inline]
    pub const fn config(&self) -> &FuelGaugeConfig { &self.config }

    #[inline]
    pub const fn mode(&self) -> OperatingMode { self.modes.mode() }

    /// Percent each gauge was last fed.
    #[inline]
    pub const fn percents(&self) -> [f32; 2] { self.percents }

    /// Last sender readings (stale while in Demo).
    #[inline]
    pub const fn readings(&self) -> &[FuelReading; 2] { &self.readings }

    #[inline]
    pub const fn backlight(&self) -> u8 { self.brightness.get() }

    #[inline]
    pub const fn regions(&self) -> &ReservedRegions { &self.regions }

    /// Run one iteration of the main loop.
    pub fn tick<D, H>(
        &mut self,
        now_ms: u64,
        button_low: bool,
        display: &mut D,
        hw: &mut H,
    ) -> TickReport
    where
        D: DrawTarget<Color = Rgb565>,
        H: AdcSource + Backlight,
    {
        let mut report = TickReport::default();

        if !self.started {
            hw.set_brightness(self.brightness.get());
            self.demo.reset(now_ms);
        }

        if self.button.just_pressed(button_low, now_ms) {
            let change = self.modes.on_press();
            self.apply_mode_change(&change, now_ms, display, hw);
            report.mode_change = Some(change);
        }

        if let Some(last) = self.last_tick_ms
            && now_ms.saturating_sub(last) < self.config.timing.loop_ms
        {
            return report;
        }
        self.last_tick_ms = Some(now_ms);
        report.ran = true;

        let mode = self.modes.mode();
        if mode.reads_sensors() {
            self.sample_senders(hw, &mut report);
        } else {
            let (t1, t2) = self.demo.update(now_ms);
            self.percents = [t1, t2];
        }

        let telemetry = self.sample_brightness(mode, now_ms, hw);
        if mode == OperatingMode::Normal
            && let Some(level) = self.brightness.update(now_ms, telemetry.voltage)
        {
            hw.set_brightness(level);
            report.brightness = Some(level);
        }

        if !self.started {
            display.clear(BACKGROUND).ok();
            self.started = true;
        }

        for gauge in &mut self.gauges {
            let i = gauge.tank().index();
            report.redrawn[i] = gauge.render(display, &self.renderer, self.percents[i], &self.regions);
        }

        if mode == OperatingMode::Debug {
            self.overlay.draw(display, &self.readings, &telemetry);
        }

        if mode != OperatingMode::Normal && self.telemetry_due(now_ms) {
            self.last_telemetry_ms = Some(now_ms);
            report.telemetry = Some(Telemetry {
                mode,
                percents: self.percents,
                valid: [!self.invalid[0], !self.invalid[1]],
                backlight: self.brightness.get(),
            });
        }

        report
    }

    fn apply_mode_change<D, H>(
        &mut self,
        change: &ModeChange,
        now_ms: u64,
        display: &mut D,
        hw: &mut H,
    ) where
        D: DrawTarget<Color = Rgb565>,
        H: Backlight,
    {
        self.brightness.set(change.backlight);
        hw.set_brightness(change.backlight);

        if change.reset_demo {
            self.demo.reset(now_ms);
        }

        if change.entered_debug() {
            self.regions.reserve(DebugOverlay::REGION);
            self.overlay.invalidate();
        }

        if change.left_debug() {
            self.regions.release(&DebugOverlay::REGION);
            if self.started {
                self.overlay.clear(display);
            } else {
                self.overlay.invalidate();
            }
            for gauge in &mut self.gauges {
                gauge.invalidate();
            }
        }

        // Filters went stale while Demo owned the bars
        if change.from == OperatingMode::Demo && change.to != OperatingMode::Demo {
            self.sensor.reset_damping();
        }
    }

    fn sample_senders<H: AdcSource>(
        &mut self,
        hw: &mut H,
        report: &mut TickReport,
    ) {
        for tank in TankId::ALL {
            let i = tank.index();
            let reading = self.sensor.read(hw, tank);
            if !reading.valid && !self.invalid[i] {
                report.invalid_tanks[i] = true;
            }
            self.invalid[i] = !reading.valid;
            self.readings[i] = reading;
            self.percents[i] = reading.percent;
        }
    }

    /// Ambient sense, read only when something consumes it.
    fn sample_brightness<H: AdcSource>(
        &self,
        mode: OperatingMode,
        now_ms: u64,
        hw: &mut H,
    ) -> BrightnessTelemetry {
        let needed = match mode {
            OperatingMode::Normal => self.brightness.is_due(now_ms),
            OperatingMode::Debug => true,
            OperatingMode::Demo => false,
        };
        if !needed {
            return BrightnessTelemetry::default();
        }
        let sensor = &self.config.sensor;
        let brightness = &self.config.brightness;
        let raw = read_raw_averaged(hw, AdcChannel::Brightness, brightness.samples, sensor.adc_max);
        BrightnessTelemetry::from_raw(raw, sensor, brightness)
    }

    fn telemetry_due(
        &self,
        now_ms: u64,
    ) -> bool {
        match self.last_telemetry_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.config.timing.telemetry_ms,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BORDER, DEBUG_TEXT, GREEN, RED, SEGMENT_EMPTY};
    use crate::config::{OVERLAY_Y, TimingConfig};
    use crate::testing::{FixedSenders, RecordingDisplay};

    fn setup(config: FuelGaugeConfig) -> (FuelGaugeApp, RecordingDisplay, FixedSenders) {
        (FuelGaugeApp::new(config), RecordingDisplay::new(), FixedSenders::new())
    }

    /// Hold the button for one debounce window, then release it for one.
    /// Returns the report of the tick that committed the press.
    fn press(
        app: &mut FuelGaugeApp,
        display: &mut RecordingDisplay,
        hw: &mut FixedSenders,
        at: u64,
    ) -> TickReport {
        let window = app.config().timing.debounce_ms;
        app.tick(at, true, display, hw);
        let report = app.tick(at + window, true, display, hw);
        app.tick(at + 2 * window, false, display, hw);
        app.tick(at + 3 * window, false, display, hw);
        report
    }

    #[test]
    fn test_first_tick_draws_everything() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        let report = app.tick(0, false, &mut display, &mut hw);

        assert!(report.ran);
        assert_eq!(report.redrawn, [true, true]);
        assert_eq!(report.invalid_tanks, [false, false]);
        assert_eq!(hw.backlight, vec![255]);
        assert!((app.percents()[0] - 50.0).abs() < 1.0);
        // Bottom segment of tank 1 is lit
        let bottom = app.config().gauge.y + app.config().gauge.bar_height() as i32 - 1;
        assert_eq!(display.pixel(app.config().gauge.x[0], bottom), Some(RED));
    }

    #[test]
    fn test_unchanged_tick_draws_nothing() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        app.tick(0, false, &mut display, &mut hw);
        display.reset_ops();

        let report = app.tick(50, false, &mut display, &mut hw);
        assert!(report.ran);
        assert_eq!(report.redrawn, [false, false]);
        assert_eq!(display.ops(), 0);
    }

    #[test]
    fn test_loop_gate() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        assert!(app.tick(0, false, &mut display, &mut hw).ran);
        assert!(!app.tick(20, false, &mut display, &mut hw).ran);
        assert!(!app.tick(49, false, &mut display, &mut hw).ran);
        assert!(app.tick(50, false, &mut display, &mut hw).ran);
    }

    #[test]
    fn test_press_is_seen_while_gated() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig {
            timing: TimingConfig {
                debounce_ms: 20,
                ..TimingConfig::DEFAULT
            },
            ..FuelGaugeConfig::DEFAULT
        });
        app.tick(0, false, &mut display, &mut hw);
        let settling = app.tick(10, true, &mut display, &mut hw);
        assert!(settling.mode_change.is_none());
        let report = app.tick(30, true, &mut display, &mut hw);
        assert!(!report.ran);
        assert_eq!(report.mode_change.map(|c| c.to), Some(OperatingMode::Debug));
        assert_eq!(app.mode(), OperatingMode::Debug);
    }

    #[test]
    fn test_button_cycle() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        app.tick(0, false, &mut display, &mut hw);

        // Normal -> Debug: region reserved, overlay drawn
        press(&mut app, &mut display, &mut hw, 50);
        assert_eq!(app.mode(), OperatingMode::Debug);
        assert!(app.regions().blocks(&DebugOverlay::REGION));
        assert_eq!(display.pixel(0, OVERLAY_Y), Some(BORDER));
        assert!(display.count_in(&DebugOverlay::REGION, DEBUG_TEXT) > 0);

        // Debug -> Demo: region released, overlay gone, gauges redrawn
        let report = press(&mut app, &mut display, &mut hw, 250);
        assert_eq!(app.mode(), OperatingMode::Demo);
        assert!(app.regions().is_empty());
        assert_eq!(report.redrawn, [true, true]);
        assert_eq!(display.count_in(&DebugOverlay::REGION, DEBUG_TEXT), 0);
        assert_eq!(app.percents(), [50.0, 100.0]);
        assert_eq!(hw.last_backlight(), Some(255));

        // Demo brightness sub-cycle
        for level in [180, 100, 40] {
            let t = hw.backlight.len() as u64 * 1000;
            press(&mut app, &mut display, &mut hw, t);
            assert_eq!(app.mode(), OperatingMode::Demo);
            assert_eq!(hw.last_backlight(), Some(level));
        }

        press(&mut app, &mut display, &mut hw, 20_000);
        assert_eq!(app.mode(), OperatingMode::Normal);
        assert_eq!(app.backlight(), 255);
        assert_eq!(hw.last_backlight(), Some(255));
    }

    #[test]
    fn test_bounce_is_one_press() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        app.tick(0, false, &mut display, &mut hw);
        let edges = [
            (50, true),
            (55, false),
            (60, true),
            (70, false),
            (80, true),
            (100, true),
            (130, true),
            (180, true),
        ];
        let presses = edges
            .into_iter()
            .filter(|&(t, low)| app.tick(t, low, &mut display, &mut hw).mode_change.is_some())
            .count();
        assert_eq!(presses, 1);
        assert_eq!(app.mode(), OperatingMode::Debug);
    }

    #[test]
    fn test_short_glitch_keeps_mode() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        app.tick(0, false, &mut display, &mut hw);
        assert!(app.tick(5000, true, &mut display, &mut hw).mode_change.is_none());
        assert!(app.tick(5005, false, &mut display, &mut hw).mode_change.is_none());
        assert!(app.tick(5100, false, &mut display, &mut hw).mode_change.is_none());
        assert_eq!(app.mode(), OperatingMode::Normal);
        assert!(app.regions().is_empty());
    }

    #[test]
    fn test_gauges_skip_overlay_region() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        app.tick(0, false, &mut display, &mut hw);
        press(&mut app, &mut display, &mut hw, 50);
        assert_eq!(app.mode(), OperatingMode::Debug);

        // Tank 1 fills up through the band while the overlay is shown
        hw.raw[0] = 1016;
        let mut redraws = 0;
        for i in 5..60 {
            let report = app.tick(i * 50, false, &mut display, &mut hw);
            if report.redrawn[0] {
                redraws += 1;
            }
        }
        assert!(redraws > 0);
        let region = DebugOverlay::REGION;
        assert_eq!(display.count_in(&region, GREEN), 0);
        assert_eq!(display.count_in(&region, SEGMENT_EMPTY), 0);
        assert_eq!(display.count_in(&region, RED), 0);
    }

    #[test]
    fn test_invalid_reported_on_transition() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        hw.raw[0] = 4095;
        assert_eq!(app.tick(0, false, &mut display, &mut hw).invalid_tanks, [true, false]);
        assert_eq!(app.tick(50, false, &mut display, &mut hw).invalid_tanks, [false, false]);

        hw.raw[0] = 2363;
        assert_eq!(app.tick(100, false, &mut display, &mut hw).invalid_tanks, [false, false]);
        hw.raw[0] = 4095;
        assert_eq!(app.tick(150, false, &mut display, &mut hw).invalid_tanks, [true, false]);
    }

    #[test]
    fn test_auto_brightness_normal_only() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        hw.raw[2] = 0;
        let report = app.tick(0, false, &mut display, &mut hw);
        assert_eq!(report.brightness, Some(20));
        assert_eq!(hw.last_backlight(), Some(20));

        // Debug forces full and holds it
        press(&mut app, &mut display, &mut hw, 50);
        assert_eq!(hw.last_backlight(), Some(255));
        for i in 5..40 {
            assert_eq!(app.tick(i * 50, false, &mut display, &mut hw).brightness, None);
        }
        assert_eq!(app.backlight(), 255);
    }

    #[test]
    fn test_ambient_sampled_only_when_due() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        let samples = app.config().brightness.samples;
        for i in 0..10 {
            app.tick(i * 50, false, &mut display, &mut hw);
        }
        assert_eq!(hw.reads[2], samples);
        app.tick(500, false, &mut display, &mut hw);
        assert_eq!(hw.reads[2], 2 * samples);
        assert_eq!(hw.reads[0], hw.reads[1]);
    }

    #[test]
    fn test_telemetry_rate() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig {
            initial_mode: OperatingMode::Demo,
            ..FuelGaugeConfig::DEFAULT
        });
        let first = app.tick(0, false, &mut display, &mut hw).telemetry;
        assert_eq!(first.map(|t| t.mode), Some(OperatingMode::Demo));
        assert_eq!(first.map(|t| t.percents), Some([50.0, 100.0]));
        assert!(app.tick(500, false, &mut display, &mut hw).telemetry.is_none());
        assert!(app.tick(1000, false, &mut display, &mut hw).telemetry.is_some());
    }

    #[test]
    fn test_no_telemetry_in_normal() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig::DEFAULT);
        for i in 0..50 {
            assert!(app.tick(i * 50, false, &mut display, &mut hw).telemetry.is_none());
        }
    }

    #[test]
    fn test_starts_in_debug() {
        let (mut app, mut display, mut hw) = setup(FuelGaugeConfig {
            initial_mode: OperatingMode::Debug,
            ..FuelGaugeConfig::DEFAULT
        });
        app.tick(0, false, &mut display, &mut hw);
        assert!(app.regions().blocks(&DebugOverlay::REGION));
        assert_eq!(display.pixel(0, OVERLAY_Y), Some(BORDER));
        assert_eq!(display.count_in(&DebugOverlay::REGION, GREEN), 0);
    }
}
