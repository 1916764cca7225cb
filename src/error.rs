use core::fmt;

#[derive(Debug)]
pub enum Ads1256Error<SpiError, GpioError> {
    Spi(SpiError),
    Gpio(GpioError),
    /// Register address outside 0x00..=0x0A. Raised before any bus activity.
    InvalidRegisterAddress(u8),
    /// Gain outside {1, 2, 4, 8, 16, 32, 64}. Chip state is untouched.
    InvalidGain(u8),
    /// STATUS identity nibble did not match a genuine ADS1256.
    ChipIdentityMismatch { expected: u8, found: u8 },
    /// DRDY stayed high for the whole configured timeout.
    DataReadyTimeout,
    /// `Config::v_ref` is zero, negative or not finite. Raised before any
    /// bus activity.
    InvalidReferenceVoltage,
}

impl<SpiError: fmt::Debug, GpioError: fmt::Debug> fmt::Display
    for Ads1256Error<SpiError, GpioError>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ads1256Error::Spi(e) => write!(f, "SPI transport error: {e:?}"),
            Ads1256Error::Gpio(e) => write!(f, "GPIO line error: {e:?}"),
            Ads1256Error::InvalidRegisterAddress(address) => {
                write!(f, "register address 0x{address:02X} is outside 0x00..=0x0A")
            }
            Ads1256Error::InvalidGain(gain) => {
                write!(f, "gain {gain} is not one of 1, 2, 4, 8, 16, 32, 64")
            }
            Ads1256Error::ChipIdentityMismatch { expected, found } => {
                write!(f, "wrong chip ID: expected {expected}, got {found}")
            }
            Ads1256Error::DataReadyTimeout => write!(f, "DRDY did not go low before the timeout"),
            Ads1256Error::InvalidReferenceVoltage => {
                write!(f, "reference voltage must be positive and finite")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<SpiError: fmt::Debug, GpioError: fmt::Debug> std::error::Error
    for Ads1256Error<SpiError, GpioError>
{
}
