/// ADS1256 Commands
pub const CMD_WAKEUP: u8 = 0x00;
pub const CMD_RDATA: u8 = 0x01;
pub const CMD_SDATAC: u8 = 0x0F;
pub const CMD_RREG: u8 = 0x10;
pub const CMD_WREG: u8 = 0x50;
pub const CMD_SELFCAL: u8 = 0xF0;
pub const CMD_SYNC: u8 = 0xFC;
pub const CMD_RESET: u8 = 0xFE;

/// ADS1256 Registers
pub const REG_STATUS: u8 = 0x00;
pub const REG_MUX: u8 = 0x01;
pub const REG_ADCON: u8 = 0x02;
pub const REG_DRATE: u8 = 0x03;
pub const REG_IO: u8 = 0x04;
pub const REG_OFC0: u8 = 0x05;
pub const REG_OFC1: u8 = 0x06;
pub const REG_OFC2: u8 = 0x07;
pub const REG_FSC0: u8 = 0x08;
pub const REG_FSC1: u8 = 0x09;
pub const REG_FSC2: u8 = 0x0A;

/// Highest addressable register.
pub const REG_LAST: u8 = REG_FSC2;

/// STATUS register fields
pub const STATUS_BUFEN: u8 = 0x02;
pub const STATUS_ACAL: u8 = 0x04;
pub const STATUS_ID_SHIFT: u8 = 4;

/// ADCON programmable gain field (bits 2:0)
pub const ADCON_PGA_MASK: u8 = 0x07;

/// Value of the STATUS identity nibble on a genuine ADS1256.
pub const CHIP_ID: u8 = 3;

/// Largest positive conversion result, 2^23 - 1.
pub const MAX_CODE: i32 = 0x7F_FFFF;

/// Single-byte control commands.
///
/// RREG/WREG carry a register address and are issued through
/// `read_register`/`write_register`; RDATA is only sent by `read_value`,
/// which also clocks out the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Wakeup = CMD_WAKEUP as isize,
    StopReadContinuous = CMD_SDATAC as isize,
    SelfCalibrate = CMD_SELFCAL as isize,
    Sync = CMD_SYNC as isize,
    Reset = CMD_RESET as isize,
}

impl Command {
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

/// Gain settings for the ADS1256 programmable gain amplifier (PGA)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gain {
    #[default]
    Gain1 = 0b000,
    Gain2 = 0b001,
    Gain4 = 0b010,
    Gain8 = 0b011,
    Gain16 = 0b100,
    Gain32 = 0b101,
    Gain64 = 0b110,
}

impl Gain {
    pub const ALL: [Gain; 7] = [
        Gain::Gain1,
        Gain::Gain2,
        Gain::Gain4,
        Gain::Gain8,
        Gain::Gain16,
        Gain::Gain32,
        Gain::Gain64,
    ];

    /// Looks up the setting for a numeric gain of 1, 2, 4, 8, 16, 32 or 64.
    pub fn from_multiplier(multiplier: u8) -> Option<Gain> {
        Gain::ALL
            .into_iter()
            .find(|gain| gain.multiplier() == multiplier)
    }

    /// ADCON PGA field code, log2 of the gain.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn multiplier(self) -> u8 {
        1 << self.code()
    }

    /// Returns the gain value as a floating-point number
    pub fn value(self) -> f64 {
        f64::from(self.multiplier())
    }
}

/// Data rates for the ADS1256
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    Sps30000 = 0xF0,
    Sps15000 = 0xE0,
    Sps7500 = 0xD0,
    Sps3750 = 0xC0,
    Sps2000 = 0xB0,
    Sps1000 = 0xA1,
    Sps500 = 0x92,
    Sps100 = 0x82,
    Sps60 = 0x72,
    Sps50 = 0x63,
    Sps30 = 0x53,
    Sps25 = 0x43,
    Sps15 = 0x33,
    Sps10 = 0x23,
    Sps5 = 0x13,
    Sps2_5 = 0x03,
}

impl DataRate {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Analog input pins selectable by the multiplexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Ain0 = 0,
    Ain1 = 1,
    Ain2 = 2,
    Ain3 = 3,
    Ain4 = 4,
    Ain5 = 5,
    Ain6 = 6,
    Ain7 = 7,
    AinCom = 8,
}

impl Channel {
    /// MUX code when used as the positive input (PSEL, bits 7:4).
    pub fn positive(self) -> u8 {
        (self as u8) << 4
    }

    /// MUX code when used as the negative input (NSEL, bits 3:0).
    pub fn negative(self) -> u8 {
        self as u8
    }

    fn from_nibble(nibble: u8) -> Option<Channel> {
        Some(match nibble {
            0 => Channel::Ain0,
            1 => Channel::Ain1,
            2 => Channel::Ain2,
            3 => Channel::Ain3,
            4 => Channel::Ain4,
            5 => Channel::Ain5,
            6 => Channel::Ain6,
            7 => Channel::Ain7,
            8 => Channel::AinCom,
            _ => return None,
        })
    }
}

/// Differential input pair routed to the converter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelPair {
    pub positive: Channel,
    pub negative: Channel,
}

impl ChannelPair {
    pub fn new(positive: Channel, negative: Channel) -> Self {
        ChannelPair { positive, negative }
    }

    /// Single-ended measurement of `channel` against AINCOM.
    pub fn single_ended(channel: Channel) -> Self {
        ChannelPair::new(channel, Channel::AinCom)
    }

    pub fn mux(self) -> u8 {
        self.positive.positive() | self.negative.negative()
    }

    /// Decodes a MUX register value. Returns `None` for the reserved codes
    /// 9..=15 in either nibble.
    pub fn from_mux(mux: u8) -> Option<Self> {
        Some(ChannelPair::new(
            Channel::from_nibble(mux >> 4)?,
            Channel::from_nibble(mux & 0x0F)?,
        ))
    }
}

impl Default for ChannelPair {
    /// Power-up MUX value 0x01: AIN0 against AIN1.
    fn default() -> Self {
        ChannelPair::new(Channel::Ain0, Channel::Ain1)
    }
}
