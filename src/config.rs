use core::time::Duration;

use embedded_hal::spi::{Mode, MODE_1};

/// The ADS1256 samples DIN on the falling SCLK edge: CPOL = 0, CPHA = 1.
pub const SPI_MODE: Mode = MODE_1;

/// Driver and wiring configuration.
///
/// The bus and pin fields describe how the chip is wired so the caller can
/// open the matching handles; the driver itself only consumes
/// `clock_frequency`, `v_ref` and the data-ready timings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub spi_bus: u8,
    pub spi_device: u8,
    /// SCLK must stay within 1/10 .. 1/4 of CLKIN. 250 MHz / 256 is the
    /// fastest power-of-two division of a Raspberry Pi core clock inside
    /// that window for a 7.68 MHz crystal.
    pub spi_frequency: u32,
    pub data_ready_pin: u32,
    pub sync_pin: u32,
    pub chip_select_pin: u32,
    /// Master clock (CLKIN) in Hz, the base of every datasheet timing.
    pub clock_frequency: u32,
    /// Reference voltage in volts. `init` and `set_gain` reject values that
    /// are not positive and finite.
    pub v_ref: f64,
    pub data_ready_timeout: Duration,
    pub data_ready_poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            spi_bus: 0,
            spi_device: 0,
            spi_frequency: 976_563,
            data_ready_pin: 22,
            sync_pin: 27,
            chip_select_pin: 21,
            clock_frequency: 7_680_000,
            v_ref: 2.5,
            data_ready_timeout: Duration::from_secs(2),
            data_ready_poll_interval: Duration::from_micros(1),
        }
    }
}
