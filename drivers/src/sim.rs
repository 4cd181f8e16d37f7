//! In-memory stand-ins for the hardware seams.
//!
//! [`SimRegisters`] behaves like a Mini UART whose transmitter drains
//! instantly onto a captured wire and whose receiver is fed by the test.
//! Every register write and barrier is logged in order. [`ManualClock`]
//! only moves when slept on, so bounded waits finish immediately.

use crate::hal::timer::Clock;
use crate::hw::aux::{self, ExtraStatus, FifoClear, LineStatus};
use crate::hw::{Register, RegisterAccess};
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use common::sync::SpinLock;
use core::sync::atomic::{AtomicU64, Ordering};

const FIFO_DEPTH: usize = 8;

/// One entry of the write-order log.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Write(Register, u32),
    Barrier,
    /// A settle delay of the given cycle count, see [`SimRegisters::record_settle`].
    Settle(u32),
}

struct State {
    regs: [u32; Register::COUNT],
    log: Vec<Access>,
    wire: Vec<u8>,
    rx: VecDeque<u8>,
    /// Bytes that arrive after the given number of further LSR reads.
    scheduled: VecDeque<(u32, Vec<u8>)>,
    tx_stalled: bool,
    overrun: bool,
}

impl State {
    fn line_status(&mut self) -> LineStatus {
        if let Some((polls, _)) = self.scheduled.front_mut() {
            *polls = polls.saturating_sub(1);
            if *polls == 0 {
                if let Some((_, bytes)) = self.scheduled.pop_front() {
                    self.rx.extend(bytes);
                }
            }
        }

        let mut lsr = LineStatus::empty();
        if !self.rx.is_empty() {
            lsr |= LineStatus::DATA_READY;
        }
        if core::mem::take(&mut self.overrun) {
            lsr |= LineStatus::RX_OVERRUN;
        }
        if !self.tx_stalled {
            lsr |= LineStatus::TX_EMPTY | LineStatus::TX_IDLE;
        }
        lsr
    }

    fn extra_status(&self) -> u32 {
        let mut stat = ExtraStatus::empty();
        if !self.rx.is_empty() {
            stat |= ExtraStatus::SYMBOL_AVAILABLE;
        }
        let tx_level = if self.tx_stalled {
            stat |= ExtraStatus::TX_FIFO_FULL;
            FIFO_DEPTH
        } else {
            stat |= ExtraStatus::SPACE_AVAILABLE | ExtraStatus::TX_EMPTY | ExtraStatus::TX_DONE;
            0
        };
        let rx_level = self.rx.len().min(FIFO_DEPTH);

        stat.bits()
            | (tx_level as u32) << aux::STAT_TX_LEVEL_SHIFT
            | (rx_level as u32) << aux::STAT_RX_LEVEL_SHIFT
    }
}

/// Simulated AUX + GPIO register bank.
pub struct SimRegisters {
    state: SpinLock<State>,
}

impl SimRegisters {
    pub fn new() -> Self {
        Self {
            state: SpinLock::new(State {
                regs: [0; Register::COUNT],
                log: Vec::new(),
                wire: Vec::new(),
                rx: VecDeque::new(),
                scheduled: VecDeque::new(),
                tx_stalled: false,
                overrun: false,
            }),
        }
    }

    /// Set a register's stored value without logging a write.
    pub fn preset(&self, reg: Register, value: u32) {
        self.state.lock().regs[reg.index()] = value;
    }

    /// Last value written to (or preset into) a plain storage register.
    pub fn value(&self, reg: Register) -> u32 {
        self.state.lock().regs[reg.index()]
    }

    pub fn log(&self) -> Vec<Access> {
        self.state.lock().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }

    /// Values written to `reg`, oldest first.
    pub fn writes_to(&self, reg: Register) -> Vec<u32> {
        self.state
            .lock()
            .log
            .iter()
            .filter_map(|access| match *access {
                Access::Write(r, value) if r == reg => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Every byte transmitted so far.
    pub fn wire(&self) -> Vec<u8> {
        self.state.lock().wire.clone()
    }

    pub fn take_wire(&self) -> Vec<u8> {
        core::mem::take(&mut self.state.lock().wire)
    }

    /// Make bytes available to the receiver immediately.
    pub fn push_rx(&self, bytes: &[u8]) {
        self.state.lock().rx.extend(bytes.iter().copied());
    }

    /// Deliver `bytes` once the line status has been read `polls` more times
    /// (after any earlier scheduled delivery).
    pub fn schedule_rx(&self, polls: u32, bytes: &[u8]) {
        self.state
            .lock()
            .scheduled
            .push_back((polls.max(1), bytes.to_vec()));
    }

    pub fn rx_pending(&self) -> usize {
        self.state.lock().rx.len()
    }

    /// Hold the transmit FIFO full (`true`) or let it drain (`false`).
    pub fn set_tx_stalled(&self, stalled: bool) {
        self.state.lock().tx_stalled = stalled;
    }

    /// Log a settle delay in line with the register writes. Clocks that
    /// want their settles ordered against writes call this.
    pub fn record_settle(&self, cycles: u32) {
        self.state.lock().log.push(Access::Settle(cycles));
    }

    /// Flag a receive overrun on the next line-status read.
    pub fn raise_overrun(&self) {
        self.state.lock().overrun = true;
    }
}

impl Default for SimRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterAccess for SimRegisters {
    fn read32(&self, reg: Register) -> u32 {
        let mut state = self.state.lock();
        match reg {
            Register::MuLsr => state.line_status().bits(),
            Register::MuStat => state.extra_status(),
            Register::MuIo => state.rx.pop_front().map_or(0, u32::from),
            _ => state.regs[reg.index()],
        }
    }

    fn write32(&self, reg: Register, value: u32) {
        let mut state = self.state.lock();
        state.log.push(Access::Write(reg, value));
        match reg {
            Register::MuIo => state.wire.push(value as u8),
            Register::MuIir => {
                if FifoClear::from_bits_truncate(value).contains(FifoClear::RX) {
                    state.rx.clear();
                    state.overrun = false;
                }
                state.regs[reg.index()] = value;
            }
            _ => state.regs[reg.index()] = value,
        }
    }

    fn barrier(&self) {
        self.state.lock().log.push(Access::Barrier);
    }
}

/// Clock whose time advances only when something sleeps on it.
///
/// Each sleep advances by its lower bound (at least 1 µs). Settle delays are
/// counted but take no simulated time.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
    sleeps: AtomicU64,
    settles: AtomicU64,
    settle_cycles: AtomicU64,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self {
            now: AtomicU64::new(0),
            sleeps: AtomicU64::new(0),
            settles: AtomicU64::new(0),
            settle_cycles: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, us: u64) {
        self.now.fetch_add(us, Ordering::SeqCst);
    }

    pub fn sleeps(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }

    pub fn settles(&self) -> u64 {
        self.settles.load(Ordering::SeqCst)
    }

    pub fn settle_cycles(&self) -> u64 {
        self.settle_cycles.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep_us(&self, min_us: u32, _max_us: u32) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(u64::from(min_us.max(1)));
        #[cfg(test)]
        std::thread::yield_now();
    }

    fn settle(&self, cycles: u32) {
        self.settles.fetch_add(1, Ordering::SeqCst);
        self.settle_cycles
            .fetch_add(u64::from(cycles), Ordering::SeqCst);
    }
}
