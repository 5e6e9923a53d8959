//! Simulated senders and backlight for running without hardware.
//!
//! Each tank follows a slow triangle wave between empty and full, with a
//! different period per tank so the bars drift apart. A sender can be
//! "disconnected", which reads as an open circuit (full-scale count). The
//! dash illumination voltage is a plain setting.
//!
//! The clock is injected with [`SimulatedSenders::set_time`], so the same
//! type drives the desktop simulator and the application tests.

use crate::brightness::Backlight;
use crate::config::{BrightnessConfig, SensorConfig};
use crate::converter::percent_to_raw;
use crate::sensor::{AdcChannel, AdcSource, TankId};

/// Full sweep period of each tank, empty → full → empty.
pub const SWEEP_PERIOD_MS: [u64; 2] = [60_000, 90_000];

/// Highest dash voltage the simulation accepts.
pub const DASH_VOLTAGE_MAX: f32 = 14.0;

/// Fake ADC inputs plus a recorded backlight level.
pub struct SimulatedSenders {
    sensor: SensorConfig,
    brightness: BrightnessConfig,
    now_ms: u64,
    period_ms: [u64; 2],
    disconnected: [bool; 2],
    dash_voltage: f32,
    backlight: Option<u8>,
}

impl SimulatedSenders {
    pub const fn new(
        sensor: SensorConfig,
        brightness: BrightnessConfig,
    ) -> Self {
        Self {
            sensor,
            brightness,
            now_ms: 0,
            period_ms: SWEEP_PERIOD_MS,
            disconnected: [false; 2],
            dash_voltage: brightness.v_max,
            backlight: None,
        }
    }

    pub fn set_time(
        &mut self,
        now_ms: u64,
    ) {
        self.now_ms = now_ms;
    }

    /// True sender position of `tank` at the current time.
    ///
    /// Tank 1 starts half full and rising, tank 2 starts full and falling.
    pub fn tank_percent(
        &self,
        tank: TankId,
    ) -> f32 {
        let period = self.period_ms[tank.index()].max(2);
        let phase = match tank {
            TankId::Tank1 => period / 4,
            TankId::Tank2 => period / 2,
        };
        triangle(self.now_ms + phase, period)
    }

    #[inline]
    pub const fn is_disconnected(
        &self,
        tank: TankId,
    ) -> bool {
        self.disconnected[tank.index()]
    }

    /// Flip the sender wire of `tank`. Returns the new disconnected state.
    pub fn toggle_disconnected(
        &mut self,
        tank: TankId,
    ) -> bool {
        let slot = &mut self.disconnected[tank.index()];
        *slot = !*slot;
        *slot
    }

    #[inline]
    pub const fn dash_voltage(&self) -> f32 { self.dash_voltage }

    /// Move the dash voltage by `delta`, kept within `0..=DASH_VOLTAGE_MAX`.
    pub fn adjust_dash_voltage(
        &mut self,
        delta: f32,
    ) -> f32 {
        self.dash_voltage = (self.dash_voltage + delta).clamp(0.0, DASH_VOLTAGE_MAX);
        self.dash_voltage
    }

    /// Last level written through [`Backlight`], if any.
    #[inline]
    pub const fn backlight(&self) -> Option<u8> { self.backlight }

    fn dash_raw(&self) -> u16 {
        let adc_max = f32::from(self.sensor.adc_max);
        let pin = self.dash_voltage / self.brightness.divider_gain();
        let raw = pin / self.sensor.vref * adc_max + 0.5;
        if raw <= 0.0 {
            0
        } else if raw >= adc_max {
            self.sensor.adc_max
        } else {
            raw as u16
        }
    }
}

/// `0 → 100 → 0` over `period` milliseconds.
fn triangle(
    t_ms: u64,
    period: u64,
) -> f32 {
    let half = period / 2;
    let t = t_ms % period;
    let rising = if t < half { t } else { period - t };
    rising as f32 / half as f32 * 100.0
}

impl AdcSource for SimulatedSenders {
    fn read_raw(
        &mut self,
        channel: AdcChannel,
    ) -> u16 {
        match channel {
            AdcChannel::Tank1 | AdcChannel::Tank2 => {
                let tank = match channel {
                    AdcChannel::Tank1 => TankId::Tank1,
                    _ => TankId::Tank2,
                };
                if self.is_disconnected(tank) {
                    self.sensor.adc_max
                } else {
                    percent_to_raw(self.tank_percent(tank), &self.sensor)
                }
            }
            AdcChannel::Brightness => self.dash_raw(),
        }
    }
}

impl Backlight for SimulatedSenders {
    fn set_brightness(
        &mut self,
        level: u8,
    ) {
        self.backlight = Some(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brightness::BrightnessTelemetry;
    use crate::sensor::FuelReading;

    fn senders() -> SimulatedSenders { SimulatedSenders::new(SensorConfig::DEFAULT, BrightnessConfig::DEFAULT) }

    #[test]
    fn test_start_positions() {
        let sim = senders();
        assert!((sim.tank_percent(TankId::Tank1) - 50.0).abs() < 0.01);
        assert!((sim.tank_percent(TankId::Tank2) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_sweep_stays_in_range() {
        let mut sim = senders();
        for t in (0..200_000).step_by(777) {
            sim.set_time(t);
            for tank in TankId::ALL {
                let p = sim.tank_percent(tank);
                assert!((0.0..=100.0).contains(&p), "{tank:?} at {t}: {p}");
            }
        }
    }

    #[test]
    fn test_reads_back_through_the_chain() {
        let mut sim = senders();
        sim.set_time(5_000);
        let raw = sim.read_raw(AdcChannel::Tank1);
        let reading = FuelReading::from_raw(raw, &SensorConfig::DEFAULT);
        assert!(reading.valid);
        assert!((reading.percent - sim.tank_percent(TankId::Tank1)).abs() < 0.5);
    }

    #[test]
    fn test_disconnected_is_open_circuit() {
        let mut sim = senders();
        assert!(sim.toggle_disconnected(TankId::Tank2));
        let raw = sim.read_raw(AdcChannel::Tank2);
        assert_eq!(raw, 4095);
        assert!(!FuelReading::from_raw(raw, &SensorConfig::DEFAULT).valid);
        assert!(!sim.toggle_disconnected(TankId::Tank2));
    }

    #[test]
    fn test_dash_voltage_round_trip() {
        let mut sim = senders();
        sim.adjust_dash_voltage(-5.5);
        let raw = sim.read_raw(AdcChannel::Brightness);
        let telemetry = BrightnessTelemetry::from_raw(raw, &SensorConfig::DEFAULT, &BrightnessConfig::DEFAULT);
        assert!((telemetry.voltage - 6.5).abs() < 0.02);

        assert!((sim.adjust_dash_voltage(100.0) - DASH_VOLTAGE_MAX).abs() < f32::EPSILON);
        assert!(sim.adjust_dash_voltage(-100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_records_backlight() {
        let mut sim = senders();
        assert_eq!(sim.backlight(), None);
        sim.set_brightness(40);
        assert_eq!(sim.backlight(), Some(40));
    }
}
