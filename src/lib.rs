//! Driver for the TI ADS1256 24-bit delta-sigma ADC, built on the
//! [`embedded_hal`] 1.0 traits.
//!
//! The driver owns an [`SpiDevice`](embedded_hal::spi::SpiDevice) configured
//! in [`SPI_MODE`], a [`ChipSelect`] strategy, the DRDY input, the
//! SYNC/PDWN output and a delay provider. After [`Ads1256::init`] the chip
//! has been reset, its identity checked and the gain set to 1.
//!
//! Changing the input pair, gain or data rate only affects the next
//! conversion cycle; call [`Ads1256::sync`] or [`Ads1256::synchronize`]
//! before reading.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod config;
mod constants;
mod driver;
mod error;
mod frame;
mod scale;
mod timing;

#[cfg(test)]
mod testing;

pub use config::{Config, SPI_MODE};
pub use constants::{
    Channel, ChannelPair, Command, DataRate, Gain, REG_ADCON, REG_DRATE, REG_FSC0, REG_FSC1,
    REG_FSC2, REG_IO, REG_MUX, REG_OFC0, REG_OFC1, REG_OFC2, REG_STATUS,
};
pub use driver::{Ads1256, DeviceState};
pub use error::Ads1256Error;
pub use frame::{ChipSelect, DeviceChipSelect, ManualChipSelect};
pub use scale::decode_code;
