//! Dual-tank fuel gauge firmware for Raspberry Pi Pico 2 (RP2350).
//!
//! Drives a 1.9" ST7789 170x320 panel from two resistive fuel senders and
//! dims the backlight with the dash illumination line.
//!
//! # Architecture
//!
//! A single task polls the mode button and hands the hardware to the shared
//! `FuelGaugeApp` every `POLL_INTERVAL_MS`. The app gates its own work at
//! the main loop period, reads the ADC synchronously and redraws only the
//! gauge segments that changed, so no framebuffer or flush task is needed.
//!
//! # Button
//!
//! A debounced press advances Normal -> Debug -> Demo -> Normal. Inside
//! Demo each press first steps through the demo backlight levels; the press
//! after the last level returns to Normal at full brightness.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod display;
mod hw;
mod logging;

use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::Spi;
use embassy_time::{Instant, Timer};
use fuel_gauge_common::{FuelGaugeApp, FuelGaugeConfig, TankId, TickReport};
use fuel_gauge_pico2::config::{BACKLIGHT_PWM_TOP, DISPLAY_BUFFER_LEN, POLL_INTERVAL_MS, pin_summary};
use {defmt_rtt as _, panic_probe as _};

use crate::display::{display_spi_config, init_display};
use crate::hw::BoardIo;
use crate::logging::{dump_logs, problem_count};

// =============================================================================
// Binary Info (for picotool)
// =============================================================================

#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"fuel-gauge"),
    embassy_rp::binary_info::rp_program_description!(c"Dual-tank fuel gauge on ST7789 170x320"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

// =============================================================================
// Entry Point
// =============================================================================

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(embassy_rp::config::Config::default());
    log_info!("Fuel gauge starting");
    log_info!("{}", pin_summary().as_str());

    // Backlight off until the app sets its first level
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = BACKLIGHT_PWM_TOP;
    pwm_config.compare_b = 0;
    let pwm = Pwm::new_output_b(p.PWM_SLICE6, p.PIN_13, pwm_config.clone());

    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, display_spi_config());
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let mut buffer = [0u8; DISPLAY_BUFFER_LEN];

    let mut display = match init_display(spi, cs, dc, rst, &mut buffer) {
        Ok(display) => display,
        Err(e) => {
            log_error!("Display init failed: {}", e.label());
            dump_logs();
            loop {
                Timer::after_secs(1).await;
            }
        }
    };
    log_info!("Display ready");

    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let channels = [
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
        Channel::new_pin(p.PIN_28, Pull::None),
    ];
    let mut io = BoardIo::new(adc, channels, pwm, pwm_config);

    let button = Input::new(p.PIN_15, Pull::Up);

    let mut app = FuelGaugeApp::new(FuelGaugeConfig::DEFAULT);
    log_info!("Starting in {} mode", app.mode().label());

    loop {
        let now_ms = Instant::now().as_millis();
        let report = app.tick(now_ms, button.is_low(), &mut display, &mut io);
        log_report(&app, &report);
        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Split a percentage into whole and tenth digits for integer-only logging.
fn tenths(percent: f32) -> (u32, u32) {
    let t = (percent * 10.0 + 0.5) as u32;
    (t / 10, t % 10)
}

const fn validity(valid: bool) -> &'static str {
    if valid { "" } else { " (invalid)" }
}

/// Log the events of one tick.
fn log_report(
    app: &FuelGaugeApp,
    report: &TickReport,
) {
    if let Some(change) = report.mode_change {
        if change.mode_changed() {
            log_info!("Mode {} -> {}, backlight {}", change.from.label(), change.to.label(), change.backlight);
        } else if let Some(step) = change.demo_step {
            log_info!("Demo brightness step {}: {}", step as u32, change.backlight);
        }
    }

    for tank in TankId::ALL {
        if report.invalid_tanks[tank.index()] {
            let reading = app.readings()[tank.index()];
            if reading.resistance < 0.0 {
                log_warn!("T{} sender open: raw={}", tank.number(), reading.raw_adc);
            } else {
                let ohms = (reading.resistance + 0.5) as u32;
                log_warn!("T{} reading out of range: raw={} R={} ohm", tank.number(), reading.raw_adc, ohms);
            }
        }
    }

    if let Some(level) = report.brightness {
        log_debug!("Auto brightness -> {}", level);
    }

    if let Some(t) = report.telemetry {
        let (w1, d1) = tenths(t.percents[0]);
        let (w2, d2) = tenths(t.percents[1]);
        log_info!(
            "[{}] T1={}.{}%{} T2={}.{}%{} BL={}",
            t.mode.label(),
            w1,
            d1,
            validity(t.valid[0]),
            w2,
            d2,
            validity(t.valid[1]),
            t.backlight
        );
        if let Some(problems) = problem_count()
            && problems > 0
        {
            log_debug!("{} warnings since boot", problems);
        }
    }
}
