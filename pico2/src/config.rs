//! Board configuration for the RP2350 build.
//!
//! Pin map (Raspberry Pi Pico 2 with a 1.9" ST7789 170x320 module):
//!
//! | Signal | GPIO | Peripheral |
//! |--------|------|------------|
//! | Tank 1 sender | 26 | ADC0 |
//! | Tank 2 sender | 27 | ADC1 |
//! | Dash illumination sense | 28 | ADC2 |
//! | Mode button (active low) | 15 | Input, pull-up |
//! | LCD DC | 8 | Output |
//! | LCD CS | 9 | Output |
//! | LCD CLK | 10 | SPI1 SCK |
//! | LCD MOSI | 11 | SPI1 TX |
//! | LCD RST | 12 | Output |
//! | LCD backlight | 13 | PWM6 B |
//!
//! The analog pin numbers come from the shared sensor configuration so the
//! debug overlay headers always match the wiring.

use core::fmt::Write;

use fuel_gauge_common::config::{BRIGHTNESS_GPIO, SCREEN_HEIGHT, SCREEN_WIDTH, TANK_GPIO};
use heapless::String;

// =============================================================================
// Pins
// =============================================================================

pub const BUTTON_GPIO: u8 = 15;
pub const LCD_DC_GPIO: u8 = 8;
pub const LCD_CS_GPIO: u8 = 9;
pub const LCD_CLK_GPIO: u8 = 10;
pub const LCD_MOSI_GPIO: u8 = 11;
pub const LCD_RST_GPIO: u8 = 12;
pub const BACKLIGHT_GPIO: u8 = 13;

// =============================================================================
// Display
// =============================================================================

/// SPI clock for the panel. The ST7789 is rated to 62.5 MHz; 40 MHz leaves
/// margin for flying leads.
pub const DISPLAY_SPI_HZ: u32 = 40_000_000;

/// Native controller RAM is 240 wide; the 170 px glass sits in the middle.
pub const DISPLAY_OFFSET_X: u16 = 35;

pub const DISPLAY_WIDTH: u16 = SCREEN_WIDTH as u16;
pub const DISPLAY_HEIGHT: u16 = SCREEN_HEIGHT as u16;

/// Pixel staging buffer handed to the display interface.
pub const DISPLAY_BUFFER_LEN: usize = 512;

const _: () = assert!(DISPLAY_OFFSET_X as u32 * 2 + SCREEN_WIDTH == 240);

// =============================================================================
// Backlight PWM
// =============================================================================

/// PWM wrap value. 150 MHz / 6250 = 24 kHz, above the audible range.
pub const BACKLIGHT_PWM_TOP: u16 = 6_249;

// =============================================================================
// Loop
// =============================================================================

/// Sleep between ticks. The app gates its own work at `MAIN_LOOP_MS`; this
/// only bounds button latency.
pub const POLL_INTERVAL_MS: u64 = 5;

/// One-line wiring summary for the boot log, e.g.
/// `"T1=GPIO26 T2=GPIO27 BRT=GPIO28 BTN=GPIO15 BL=GPIO13"`.
pub fn pin_summary() -> String<64> {
    let mut text = String::new();
    write!(
        text,
        "T1=GPIO{} T2=GPIO{} BRT=GPIO{} BTN=GPIO{} BL=GPIO{}",
        TANK_GPIO[0], TANK_GPIO[1], BRIGHTNESS_GPIO, BUTTON_GPIO, BACKLIGHT_GPIO
    )
    .ok();
    text
}
