use crate::config::Config;
use crate::constants::*;
use crate::error::Ads1256Error;
use crate::frame::ChipSelect;
use crate::scale::{decode_code, Scale};
use crate::timing::{Deadline, Timing};
use core::result::Result;
use core::result::Result::Ok;
use core::time::Duration;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::{Operation, SpiDevice},
};

/// Where the device is in its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceState {
    /// Constructed, `init` has not completed yet.
    Uninitialized,
    /// Ready for register, command and read operations.
    Idle,
    /// Polling DRDY.
    AwaitingDataReady,
}

/// ADS1256 driver
///
/// Owns the SPI device, the chip-select strategy, the DRDY input, the
/// SYNC/PDWN output and a delay provider for its whole lifetime. Taking
/// `&mut self` on every exchange keeps framed exchanges from interleaving;
/// share a device between threads by wrapping it in a mutex.
pub struct Ads1256<SPI, CS, DRDY, SYNC, DELAY> {
    spi: SPI,
    cs: CS,
    drdy: DRDY,
    sync: SYNC,
    delay: DELAY,
    config: Config,
    timing: Timing,
    scale: Scale,
    channels: ChannelPair,
    state: DeviceState,
}

impl<SPI, CS, DRDY, SYNC, DELAY, SpiError, GpioError> Ads1256<SPI, CS, DRDY, SYNC, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: ChipSelect<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    SYNC: OutputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    /// Creates a new ADS1256 driver instance. No bus activity happens until
    /// [`init`](Self::init).
    pub fn new(spi: SPI, cs: CS, drdy: DRDY, sync: SYNC, delay: DELAY, config: Config) -> Self {
        Ads1256 {
            spi,
            cs,
            drdy,
            sync,
            delay,
            timing: Timing::from_config(&config),
            scale: Scale::new(Gain::Gain1, config.v_ref),
            channels: ChannelPair::default(),
            state: DeviceState::Uninitialized,
            config,
        }
    }

    /// Resets the chip, verifies its identity and programs gain 1.
    ///
    /// On a wrong chip ID nothing past the STATUS read is written. The
    /// handles stay owned by the driver either way; use
    /// [`release`](Self::release) to get them back.
    pub fn init(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.check_reference()?;

        // Idle levels: CS deselected, SYNC/PDWN high (running)
        self.cs.deselect().map_err(Ads1256Error::Gpio)?;
        self.sync.set_high().map_err(Ads1256Error::Gpio)?;

        self.reset()?;
        self.check_chip_id()?;
        self.set_gain(Gain::Gain1)?;

        self.state = DeviceState::Idle;
        log::info!(
            "ADS1256 ready, {:.3e} V per digit",
            self.scale.volts_per_digit()
        );
        Ok(())
    }

    /// Gives back the owned handles.
    pub fn release(self) -> (SPI, CS, DRDY, SYNC, DELAY) {
        (self.spi, self.cs, self.drdy, self.sync, self.delay)
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gain(&self) -> Gain {
        self.scale.gain()
    }

    pub fn volts_per_digit(&self) -> f64 {
        self.scale.volts_per_digit()
    }

    /// Input pair most recently written with [`set_input`](Self::set_input).
    pub fn channels(&self) -> ChannelPair {
        self.channels
    }

    /// Runs one exchange with the chip selected.
    ///
    /// CS is released even when the transfer fails so selects and deselects
    /// always pair up.
    fn exchange(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.cs.select().map_err(Ads1256Error::Gpio)?;
        let transferred = self.spi.transaction(operations).map_err(Ads1256Error::Spi);
        self.delay.delay_ns(self.timing.cs_hold_ns);
        self.cs.deselect().map_err(Ads1256Error::Gpio)?;
        transferred?;
        self.delay.delay_ns(self.timing.command_settle_ns);
        Ok(())
    }

    /// Sends a command to the ADS1256
    ///
    /// RESET and SELFCAL block until DRDY has gone high and back low, so a
    /// stale result left from before the command is not mistaken for the
    /// end of calibration. SYNC and RESET are followed by their longer
    /// settle time.
    pub fn send_command(
        &mut self,
        command: Command,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        log::debug!("Sending command: 0x{:02X}", command.opcode());
        self.exchange(&mut [Operation::Write(&[command.opcode()])])?;

        match command {
            Command::Reset => {
                self.delay.delay_ns(self.timing.reset_settle_ns);
                self.wait_for_fresh_data(self.config.data_ready_timeout)
            }
            Command::SelfCalibrate => self.wait_for_fresh_data(self.config.data_ready_timeout),
            Command::Sync => {
                self.delay.delay_ns(self.timing.sync_settle_ns);
                Ok(())
            }
            Command::Wakeup | Command::StopReadContinuous => Ok(()),
        }
    }

    fn check_reference(&self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let v_ref = self.config.v_ref;
        if !(v_ref.is_finite() && v_ref > 0.0) {
            return Err(Ads1256Error::InvalidReferenceVoltage);
        }
        Ok(())
    }

    fn check_address(address: u8) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        if address > REG_LAST {
            return Err(Ads1256Error::InvalidRegisterAddress(address));
        }
        Ok(())
    }

    /// Reads one register.
    pub fn read_register(&mut self, address: u8) -> Result<u8, Ads1256Error<SpiError, GpioError>> {
        Self::check_address(address)?;

        let command = [CMD_RREG | address, 0x00];
        let mut buffer = [0u8; 1];
        let data_output_delay = self.timing.data_output_delay_ns;
        self.exchange(&mut [
            Operation::Write(&command),
            Operation::DelayNs(data_output_delay),
            Operation::Read(&mut buffer),
        ])?;
        Ok(buffer[0])
    }

    /// Writes one register.
    pub fn write_register(
        &mut self,
        address: u8,
        value: u8,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        Self::check_address(address)?;

        log::debug!("Writing register 0x{:02X}: 0x{:02X}", address, value);
        self.exchange(&mut [Operation::Write(&[CMD_WREG | address, 0x00, value])])
    }

    /// Replaces the bits selected by `mask`, keeping the rest of the register.
    fn update_register(
        &mut self,
        address: u8,
        mask: u8,
        bits: u8,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let current = self.read_register(address)?;
        self.write_register(address, (current & !mask) | (bits & mask))
    }

    pub fn log_registers(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let registers = [
            (REG_STATUS, "STATUS"),
            (REG_MUX, "MUX"),
            (REG_ADCON, "ADCON"),
            (REG_DRATE, "DRATE"),
            (REG_IO, "IO"),
            (REG_OFC0, "OFC0"),
            (REG_OFC1, "OFC1"),
            (REG_OFC2, "OFC2"),
            (REG_FSC0, "FSC0"),
            (REG_FSC1, "FSC1"),
            (REG_FSC2, "FSC2"),
        ];

        for (reg, name) in registers.iter() {
            let value = self.read_register(*reg)?;
            log::debug!("Register {}: 0x{:02X}", name, value);
        }

        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.send_command(Command::Reset)
    }

    /// Identity nibble from the top of STATUS.
    pub fn read_chip_id(&mut self) -> Result<u8, Ads1256Error<SpiError, GpioError>> {
        Ok(self.read_register(REG_STATUS)? >> STATUS_ID_SHIFT)
    }

    fn check_chip_id(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let found = self.read_chip_id()?;
        if found != CHIP_ID {
            log::error!("Wrong chip ID: expected {}, got {}", CHIP_ID, found);
            return Err(Ads1256Error::ChipIdentityMismatch {
                expected: CHIP_ID,
                found,
            });
        }
        Ok(())
    }

    /// Perform a full self-calibration (both offset and gain)
    pub fn self_calibrate(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.send_command(Command::SelfCalibrate)
    }

    pub fn stop_continuous_read(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.send_command(Command::StopReadContinuous)
    }

    /// Sets the PGA gain.
    ///
    /// Only the PGA field of ADCON changes. The new gain applies from the
    /// next conversion cycle, so [`sync`](Self::sync) before trusting the
    /// next result.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.check_reference()?;
        self.update_register(REG_ADCON, ADCON_PGA_MASK, gain.code())?;
        self.scale = Scale::new(gain, self.config.v_ref);
        log::debug!(
            "Gain set to {}, {:.3e} V per digit",
            gain.multiplier(),
            self.scale.volts_per_digit()
        );
        Ok(())
    }

    /// [`set_gain`](Self::set_gain) from a numeric gain.
    pub fn set_gain_multiplier(
        &mut self,
        multiplier: u8,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let gain =
            Gain::from_multiplier(multiplier).ok_or(Ads1256Error::InvalidGain(multiplier))?;
        self.set_gain(gain)
    }

    /// Sets the data rate for the ADC
    pub fn set_data_rate(
        &mut self,
        data_rate: DataRate,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.write_register(REG_DRATE, data_rate.code())
    }

    /// Switches the analog input buffer and recalibrates, since the buffer
    /// shifts offset and gain.
    pub fn set_buffer_enabled(
        &mut self,
        enabled: bool,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let bits = if enabled { STATUS_BUFEN } else { 0 };
        self.update_register(REG_STATUS, STATUS_BUFEN, bits)?;
        self.self_calibrate()
    }

    /// Lets the chip self-calibrate after every gain, data rate or buffer change.
    pub fn set_auto_calibration(
        &mut self,
        enabled: bool,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let bits = if enabled { STATUS_ACAL } else { 0 };
        self.update_register(REG_STATUS, STATUS_ACAL, bits)
    }

    /// Routes `positive` and `negative` to the converter.
    ///
    /// The chip keeps converting the previous pair for the rest of the
    /// current cycle. Call [`sync`](Self::sync) before reading.
    pub fn set_input(
        &mut self,
        positive: Channel,
        negative: Channel,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let channels = ChannelPair::new(positive, negative);
        self.write_register(REG_MUX, channels.mux())?;
        self.channels = channels;
        Ok(())
    }

    /// Restarts the conversion cycle with a pulse on the SYNC/PDWN pin.
    pub fn sync(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.sync.set_low().map_err(Ads1256Error::Gpio)?;
        self.delay.delay_ns(self.timing.sync_pulse_ns);
        self.sync.set_high().map_err(Ads1256Error::Gpio)
    }

    /// Restarts the conversion cycle with the SYNC and WAKEUP commands.
    pub fn synchronize(&mut self) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.send_command(Command::Sync)?;
        self.send_command(Command::Wakeup)
    }

    /// Polls DRDY until the chip drives it low or `timeout` has elapsed.
    ///
    /// An already-low DRDY (an unread result) returns at once. Elapsed time
    /// is taken from the wall clock with `std`, otherwise from the poll
    /// delays alone. A timeout leaves the device usable.
    pub fn wait_for_data_ready(
        &mut self,
        timeout: Duration,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.await_data_ready(timeout, false)
    }

    /// Like [`wait_for_data_ready`](Self::wait_for_data_ready), but first
    /// waits for DRDY to go high, all within one `timeout`.
    fn wait_for_fresh_data(
        &mut self,
        timeout: Duration,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        self.await_data_ready(timeout, true)
    }

    fn await_data_ready(
        &mut self,
        timeout: Duration,
        fresh: bool,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let resume = self.state;
        self.state = DeviceState::AwaitingDataReady;
        let mut deadline = Deadline::start(timeout);
        let outcome = if fresh {
            self.poll_drdy(&mut deadline, false)
        } else {
            Ok(())
        }
        .and_then(|()| self.poll_drdy(&mut deadline, true));
        self.state = resume;
        outcome
    }

    fn poll_drdy(
        &mut self,
        deadline: &mut Deadline,
        low: bool,
    ) -> Result<(), Ads1256Error<SpiError, GpioError>> {
        let interval_ns = self.timing.poll_interval_ns;
        loop {
            if self.drdy.is_low().map_err(Ads1256Error::Gpio)? == low {
                return Ok(());
            }
            if deadline.expired() {
                log::warn!(
                    "DRDY pin did not go {} within {:?}",
                    if low { "low" } else { "high" },
                    deadline.timeout()
                );
                return Err(Ads1256Error::DataReadyTimeout);
            }
            self.delay.delay_ns(interval_ns);
            deadline.record_delay(interval_ns);
        }
    }

    /// Reads the next conversion result as a signed 24-bit code.
    pub fn read_value(&mut self) -> Result<i32, Ads1256Error<SpiError, GpioError>> {
        self.wait_for_data_ready(self.config.data_ready_timeout)?;

        let mut buffer = [0u8; 3];
        let data_output_delay = self.timing.data_output_delay_ns;
        self.exchange(&mut [
            Operation::Write(&[CMD_RDATA]),
            Operation::DelayNs(data_output_delay),
            Operation::Read(&mut buffer),
        ])?;

        log::debug!(
            "Raw data: {:02X} {:02X} {:02X}",
            buffer[0],
            buffer[1],
            buffer[2]
        );
        Ok(decode_code(buffer))
    }

    /// Reads the next conversion result in volts.
    pub fn read_voltage(&mut self) -> Result<f64, Ads1256Error<SpiError, GpioError>> {
        let code = self.read_value()?;
        Ok(self.scale.to_voltage(code))
    }
}
