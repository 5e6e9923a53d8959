//! RP2350 implementations of the sensor and backlight capabilities.

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Duration, block_for};
use fuel_gauge_common::config::ADC_SETTLE_US;
use fuel_gauge_common::{AdcChannel, AdcSource, Backlight};
use fuel_gauge_pico2::backlight::backlight_compare;

/// Analog inputs in `AdcChannel` order: tank 1, tank 2, brightness.
pub type AnalogInputs<'d> = [Channel<'d>; 3];

/// ADC with its three channels plus the backlight PWM slice.
pub struct BoardIo<'d> {
    adc: Adc<'d, Blocking>,
    channels: AnalogInputs<'d>,
    pwm: Pwm<'d>,
    pwm_config: PwmConfig,
}

impl<'d> BoardIo<'d> {
    pub fn new(
        adc: Adc<'d, Blocking>,
        channels: AnalogInputs<'d>,
        pwm: Pwm<'d>,
        pwm_config: PwmConfig,
    ) -> Self {
        Self {
            adc,
            channels,
            pwm,
            pwm_config,
        }
    }
}

impl AdcSource for BoardIo<'_> {
    fn read_raw(
        &mut self,
        channel: AdcChannel,
    ) -> u16 {
        let slot = match channel {
            AdcChannel::Tank1 => 0,
            AdcChannel::Tank2 => 1,
            AdcChannel::Brightness => 2,
        };
        // A failed conversion reads as a short, which the sensor flags invalid
        self.adc.blocking_read(&mut self.channels[slot]).unwrap_or(0)
    }

    fn settle(&mut self) { block_for(Duration::from_micros(u64::from(ADC_SETTLE_US))); }
}

impl Backlight for BoardIo<'_> {
    fn set_brightness(
        &mut self,
        level: u8,
    ) {
        self.pwm_config.compare_b = backlight_compare(level, self.pwm_config.top);
        self.pwm.set_config(&self.pwm_config);
    }
}
