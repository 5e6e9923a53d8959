//! Dual-tank fuel gauge simulator for desktop platforms.
//!
//! Runs the shared application loop against simulated senders in an
//! `embedded-graphics-simulator` window.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | `B` (hold) | Mode button |
//! | `Q` / `W` | Disconnect or reconnect the tank 1 / tank 2 sender |
//! | `U` / `D` | Dash illumination voltage up / down |
//!
//! Logging goes through `env_logger`; the default level is `info` and
//! `RUST_LOG` overrides it.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]

mod timing;

use std::thread;
use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use fuel_gauge_common::colors::BACKGROUND;
use fuel_gauge_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use fuel_gauge_common::{FuelGaugeApp, FuelGaugeConfig, SimulatedSenders, TankId, TickReport};
use log::{debug, info, warn};

use crate::timing::{DASH_VOLTAGE_STEP, FRAME_TIME};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = FuelGaugeConfig::DEFAULT;
    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Fuel Gauge Sim", &output_settings);

    display.clear(BACKGROUND).ok();
    window.update(&display);

    let mut app = FuelGaugeApp::new(config);
    let mut senders = SimulatedSenders::new(config.sensor, config.brightness);
    let mut button_low = false;

    info!("Fuel gauge simulator started in {} mode", app.mode().label());

    let start = Instant::now();
    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => {
                    info!("Window closed, shutting down");
                    return;
                }
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::B => button_low = true,
                        Keycode::Q => toggle_sender(&mut senders, TankId::Tank1),
                        Keycode::W => toggle_sender(&mut senders, TankId::Tank2),
                        Keycode::U => adjust_dash(&mut senders, DASH_VOLTAGE_STEP),
                        Keycode::D => adjust_dash(&mut senders, -DASH_VOLTAGE_STEP),
                        _ => {}
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if keycode == Keycode::B {
                        button_low = false;
                    }
                }
                _ => {}
            }
        }

        let now_ms = start.elapsed().as_millis() as u64;
        senders.set_time(now_ms);
        let report = app.tick(now_ms, button_low, &mut display, &mut senders);
        log_report(&app, &report);

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            thread::sleep(FRAME_TIME - elapsed);
        }
    }
}

fn toggle_sender(
    senders: &mut SimulatedSenders,
    tank: TankId,
) {
    let open = senders.toggle_disconnected(tank);
    info!("T{} sender {}", tank.number(), if open { "disconnected" } else { "reconnected" });
}

fn adjust_dash(
    senders: &mut SimulatedSenders,
    delta: f32,
) {
    let volts = senders.adjust_dash_voltage(delta);
    info!("Dash illumination {volts:.1} V");
}

/// Print the events of one tick.
fn log_report(
    app: &FuelGaugeApp,
    report: &TickReport,
) {
    if let Some(change) = report.mode_change {
        if change.mode_changed() {
            info!("Mode {} -> {}, backlight {}", change.from.label(), change.to.label(), change.backlight);
        } else if let Some(step) = change.demo_step {
            info!("Demo brightness step {step}: {}", change.backlight);
        }
    }

    for tank in TankId::ALL {
        if report.invalid_tanks[tank.index()] {
            let reading = app.readings()[tank.index()];
            warn!(
                "T{} reading out of range: raw={} R={:.1} ohm",
                tank.number(),
                reading.raw_adc,
                reading.resistance
            );
        }
    }

    if let Some(level) = report.brightness {
        debug!("Auto brightness -> {level}");
    }

    if let Some(t) = report.telemetry {
        info!(
            "[{}] T1={:.1}%{} T2={:.1}%{} BL={}",
            t.mode.label(),
            t.percents[0],
            if t.valid[0] { "" } else { " (invalid)" },
            t.percents[1],
            if t.valid[1] { "" } else { " (invalid)" },
            t.backlight
        );
    }
}
