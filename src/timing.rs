//! Datasheet timing minimums, counted in master clock periods (tCLKIN),
//! and the deadline used while polling DRDY.

use core::time::Duration;

use crate::config::Config;

/// t6: end of the last command byte to the first DOUT bit of RREG/RDATA.
const DATA_OUTPUT_DELAY_CYCLES: u64 = 50;
/// t10: last SCLK edge to CS going high.
const CS_HOLD_CYCLES: u64 = 8;
/// t11: after RREG, WREG and RDATA before the next command.
const COMMAND_SETTLE_CYCLES: u64 = 4;
/// t11: after SYNC before WAKEUP.
const SYNC_SETTLE_CYCLES: u64 = 24;
/// t11: after RESET before the next command.
const RESET_SETTLE_CYCLES: u64 = 24;
/// t16: minimum low pulse on the SYNC/PDWN pin.
const SYNC_PULSE_CYCLES: u64 = 4;

/// Delays in nanoseconds for one clock frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Timing {
    pub data_output_delay_ns: u32,
    pub cs_hold_ns: u32,
    pub command_settle_ns: u32,
    pub sync_settle_ns: u32,
    pub reset_settle_ns: u32,
    pub sync_pulse_ns: u32,
    pub poll_interval_ns: u32,
}

impl Timing {
    pub fn from_config(config: &Config) -> Self {
        let clock = u64::from(config.clock_frequency.max(1));
        Timing {
            data_output_delay_ns: cycles_to_ns(DATA_OUTPUT_DELAY_CYCLES, clock),
            cs_hold_ns: cycles_to_ns(CS_HOLD_CYCLES, clock),
            command_settle_ns: cycles_to_ns(COMMAND_SETTLE_CYCLES, clock),
            sync_settle_ns: cycles_to_ns(SYNC_SETTLE_CYCLES, clock),
            reset_settle_ns: cycles_to_ns(RESET_SETTLE_CYCLES, clock),
            sync_pulse_ns: cycles_to_ns(SYNC_PULSE_CYCLES, clock),
            poll_interval_ns: config
                .data_ready_poll_interval
                .as_nanos()
                .clamp(1, u128::from(u32::MAX)) as u32,
        }
    }
}

/// Time budget for one DRDY wait.
///
/// Elapsed time is the larger of the delays handed to the delay provider and,
/// with `std`, the wall clock. Both undercount real time, never overcount it,
/// so the budget runs out no earlier than `timeout` and, with a wall clock,
/// not much later either.
pub(crate) struct Deadline {
    timeout: Duration,
    delayed_ns: u128,
    #[cfg(feature = "std")]
    started: std::time::Instant,
}

impl Deadline {
    pub fn start(timeout: Duration) -> Self {
        Deadline {
            timeout,
            delayed_ns: 0,
            #[cfg(feature = "std")]
            started: std::time::Instant::now(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn record_delay(&mut self, ns: u32) {
        self.delayed_ns += u128::from(ns);
    }

    pub fn expired(&self) -> bool {
        self.delayed_ns >= self.timeout.as_nanos() || self.wall_clock_expired()
    }

    #[cfg(feature = "std")]
    fn wall_clock_expired(&self) -> bool {
        self.started.elapsed() >= self.timeout
    }

    #[cfg(not(feature = "std"))]
    fn wall_clock_expired(&self) -> bool {
        false
    }
}

// Rounds up: these are lower bounds.
fn cycles_to_ns(cycles: u64, clock_hz: u64) -> u32 {
    let ns = (cycles * 1_000_000_000).div_ceil(clock_hz);
    ns.min(u64::from(u32::MAX)) as u32
}
