//! Chip-select strategies.
//!
//! The driver sends every exchange (command bytes, the t6 pause, response
//! bytes) as a single [`SpiDevice::transaction`](embedded_hal::spi::SpiDevice),
//! which keeps the device selected across the write and read phases. The
//! ADS1256 drops the exchange if CS toggles in between, so a platform whose
//! SPI driver cannot honor that should hand the bus in with a dummy CS and
//! let [`ManualChipSelect`] drive the real line.

use core::marker::PhantomData;

use embedded_hal::digital::OutputPin;

/// Brackets one exchange with the chip selected.
pub trait ChipSelect {
    type Error;

    fn select(&mut self) -> Result<(), Self::Error>;
    fn deselect(&mut self) -> Result<(), Self::Error>;
}

/// Drives an active-low CS line around every exchange.
pub struct ManualChipSelect<P> {
    pin: P,
}

impl<P: OutputPin> ManualChipSelect<P> {
    pub fn new(pin: P) -> Self {
        ManualChipSelect { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ChipSelect for ManualChipSelect<P> {
    type Error = P::Error;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

/// Leaves CS to the [`SpiDevice`](embedded_hal::spi::SpiDevice).
///
/// `E` only has to match the error type of the other GPIO lines.
pub struct DeviceChipSelect<E> {
    _error: PhantomData<fn() -> E>,
}

impl<E> DeviceChipSelect<E> {
    pub fn new() -> Self {
        DeviceChipSelect {
            _error: PhantomData,
        }
    }
}

impl<E> Default for DeviceChipSelect<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ChipSelect for DeviceChipSelect<E> {
    type Error = E;

    fn select(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
