//! ST7789 170x320 panel on SPI1 through `mipidsi`.
//!
//! The controller RAM is 240x320; the 170 px glass is centered in it, so
//! every column address is shifted by `DISPLAY_OFFSET_X`. Drawing goes
//! straight to the panel with no framebuffer: the gauge only redraws what
//! changed, which keeps SPI traffic small.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use fuel_gauge_pico2::config::{DISPLAY_HEIGHT, DISPLAY_OFFSET_X, DISPLAY_SPI_HZ, DISPLAY_WIDTH};
use mipidsi::Builder;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;

/// Display type for the gauge panel.
pub type GaugeDisplay<'d, 'b> =
    mipidsi::Display<SpiInterface<'b, ExclusiveDevice<Spi<'d, SPI1, Blocking>, Output<'d>, NoDelay>, Output<'d>>, ST7789, Output<'d>>;

/// Why the panel could not be brought up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DisplayError {
    /// Chip select could not be driven.
    ChipSelect,
    /// Reset or the controller init sequence failed.
    Init,
}

impl DisplayError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChipSelect => "chip select",
            Self::Init => "controller init",
        }
    }
}

/// SPI configuration for the ST7789 display.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = DISPLAY_SPI_HZ;
    config
}

/// Reset and initialize the panel.
///
/// `buffer` stages pixel data for each SPI burst and must outlive the
/// returned display.
pub fn init_display<'d, 'b>(
    spi: Spi<'d, SPI1, Blocking>,
    cs: Output<'d>,
    dc: Output<'d>,
    rst: Output<'d>,
    buffer: &'b mut [u8],
) -> Result<GaugeDisplay<'d, 'b>, DisplayError> {
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| DisplayError::ChipSelect)?;
    let di = SpiInterface::new(spi_device, dc, buffer);

    Builder::new(ST7789, di)
        .reset_pin(rst)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .display_offset(DISPLAY_OFFSET_X, 0)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut embassy_time::Delay)
        .map_err(|_| DisplayError::Init)
}
