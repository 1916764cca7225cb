//! Simulated ADS1256 behind the embedded-hal traits.

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

use crate::constants::*;
use crate::frame::ManualChipSelect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Select,
    Deselect,
    /// One SPI transaction. `read_delay_ns` is the pause issued inside the
    /// transaction before the first read.
    Transfer { opcode: u8, read_delay_ns: u32 },
    SyncLow,
    SyncHigh,
}

#[derive(Clone, Copy, Debug)]
pub enum DataReady {
    Always,
    Never,
    AfterPolls(u32),
}

pub struct ChipState {
    pub registers: [u8; 11],
    pub conversion: [u8; 3],
    pub data_ready: DataReady,
    /// DRDY profile after RESET/SELFCAL: polls that still see the stale
    /// low level, then polls that see the chip busy (high).
    pub calibration: (u32, u32),
    stale_polls: u32,
    busy_polls: u32,
    pub events: Vec<Event>,
    pub polls: u32,
    pub delayed_ns: u64,
    pub fail_spi: bool,
}

#[derive(Clone)]
pub struct FakeChip(Rc<RefCell<ChipState>>);

pub type FakeAds1256 =
    crate::Ads1256<FakeSpi, ManualChipSelect<FakeCs>, FakeDrdy, FakeSync, FakeDelay>;

impl FakeChip {
    pub fn new() -> Self {
        FakeChip(Rc::new(RefCell::new(ChipState {
            // Power-up values, chip ID 3 in the STATUS high nibble
            registers: [
                0x30, 0x01, 0x20, 0xF0, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40,
            ],
            conversion: [0; 3],
            data_ready: DataReady::Always,
            calibration: (1, 2),
            stale_polls: 0,
            busy_polls: 0,
            events: Vec::new(),
            polls: 0,
            delayed_ns: 0,
            fail_spi: false,
        })))
    }

    pub fn with_chip_id(id: u8) -> Self {
        let chip = FakeChip::new();
        chip.state().registers[REG_STATUS as usize] = (id << 4) | 0x01;
        chip
    }

    pub fn state(&self) -> std::cell::RefMut<'_, ChipState> {
        self.0.borrow_mut()
    }

    pub fn register(&self, address: u8) -> u8 {
        self.0.borrow().registers[address as usize]
    }

    pub fn set_conversion(&self, code: i32) {
        let bytes = code.to_be_bytes();
        self.state().conversion = [bytes[1], bytes[2], bytes[3]];
    }

    pub fn set_data_ready(&self, data_ready: DataReady) {
        let mut state = self.state();
        state.data_ready = data_ready;
        state.polls = 0;
    }

    pub fn take_events(&self) -> Vec<Event> {
        core::mem::take(&mut self.state().events)
    }

    pub fn opcodes(&self) -> Vec<u8> {
        self.0
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Transfer { opcode, .. } => Some(*opcode),
                _ => None,
            })
            .collect()
    }

    pub fn delayed_ns(&self) -> u64 {
        self.0.borrow().delayed_ns
    }

    pub fn set_calibration(&self, stale_polls: u32, busy_polls: u32) {
        self.state().calibration = (stale_polls, busy_polls);
    }

    pub fn device(&self, config: crate::Config) -> FakeAds1256 {
        self.device_with_delay(FakeDelay(self.clone()), config)
    }

    pub fn device_with_delay<D: DelayNs>(
        &self,
        delay: D,
        config: crate::Config,
    ) -> crate::Ads1256<FakeSpi, ManualChipSelect<FakeCs>, FakeDrdy, FakeSync, D> {
        crate::Ads1256::new(
            FakeSpi(self.clone()),
            ManualChipSelect::new(FakeCs(self.clone())),
            FakeDrdy(self.clone()),
            FakeSync(self.clone()),
            delay,
            config,
        )
    }
}

pub struct FakeSpi(FakeChip);
pub struct FakeCs(FakeChip);
pub struct FakeDrdy(FakeChip);
pub struct FakeSync(FakeChip);
pub struct FakeDelay(FakeChip);

impl spi::ErrorType for FakeSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut state = self.0.state();
        if state.fail_spi {
            return Err(spi::ErrorKind::Other);
        }

        let mut sent: Vec<u8> = Vec::new();
        let mut pending_delay = 0;
        let mut read_delay_ns = 0;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(words) => sent.extend_from_slice(words),
                Operation::DelayNs(ns) => pending_delay += *ns,
                Operation::Read(words) => {
                    read_delay_ns = pending_delay;
                    let opcode = sent[0];
                    if opcode & 0xF0 == CMD_RREG {
                        let start = (opcode & 0x0F) as usize;
                        for (offset, word) in words.iter_mut().enumerate() {
                            *word = state.registers[start + offset];
                        }
                    } else if opcode == CMD_RDATA {
                        words.copy_from_slice(&state.conversion);
                    } else {
                        panic!("read after opcode 0x{opcode:02X}");
                    }
                }
                _ => panic!("unexpected SPI operation"),
            }
        }

        let opcode = sent[0];
        if opcode & 0xF0 == CMD_WREG {
            let start = (opcode & 0x0F) as usize;
            let count = sent[1] as usize + 1;
            assert_eq!(sent.len(), 2 + count, "WREG payload length");
            state.registers[start..start + count].copy_from_slice(&sent[2..]);
        }
        if opcode == CMD_RESET || opcode == CMD_SELFCAL {
            let (stale, busy) = state.calibration;
            state.stale_polls = stale;
            state.busy_polls = busy;
        }
        state.events.push(Event::Transfer {
            opcode,
            read_delay_ns,
        });
        Ok(())
    }
}

impl digital::ErrorType for FakeCs {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakeCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.state().events.push(Event::Select);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.state().events.push(Event::Deselect);
        Ok(())
    }
}

impl digital::ErrorType for FakeSync {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakeSync {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.state().events.push(Event::SyncLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.state().events.push(Event::SyncHigh);
        Ok(())
    }
}

impl digital::ErrorType for FakeDrdy {
    type Error = digital::ErrorKind;
}

impl InputPin for FakeDrdy {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let mut state = self.0.state();
        state.polls += 1;
        if state.stale_polls > 0 {
            state.stale_polls -= 1;
            return Ok(true);
        }
        if state.busy_polls > 0 {
            state.busy_polls -= 1;
            return Ok(false);
        }
        Ok(match state.data_ready {
            DataReady::Always => true,
            DataReady::Never => false,
            DataReady::AfterPolls(polls) => state.polls > polls,
        })
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.state().delayed_ns += u64::from(ns);
    }
}
