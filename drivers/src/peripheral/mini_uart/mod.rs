//! Broadcom auxiliary Mini UART driver.
//!
//! A polled driver for the Mini UART found in the BCM2835/BCM2711 auxiliary
//! block. The whole device state lives in one [`Device`] created by
//! [`attach`] (or [`Device::new`] over any [`RegisterAccess`]) and destroyed
//! by [`detach`].
//!
//! # Features
//!
//! - Runtime-selectable baud rate and 7/8-bit data width
//! - Bounded, sleep-based transmit and receive polling
//! - FIFO clearing and receive overrun accounting
//! - Lock-free statistics counters
//!
//! # Concurrency
//!
//! Three independent sections guard the device: configuration, transmit and
//! receive. They are never nested. A contended caller sleeps on the clock
//! between attempts instead of spinning.

mod baud;
mod config;
mod fifo;
mod pins;
mod rx;
mod stats;
mod tx;

pub use baud::compute_divisor;
pub use rx::RX_BUFFER_LEN;
pub use stats::{DeviceStats, StatsCollector};
pub use tx::{NewlineTranslation, TxReport};

use crate::hal::serial::{DeviceConfig, Region, UartError};
use crate::hal::timer::{Clock, PollStep};
use crate::hw::aux::{self, ExtraStatus, LineStatus};
use crate::hw::gpio::{self, PullScheme};
use crate::hw::{Register, RegisterAccess};
use crate::platform::{self, IoMapper, MmioRegisters};
use common::sync::{SpinLock, SpinLockGuard};
use core::sync::atomic::{AtomicU8, Ordering};
use log::{error, info, warn};

/// Transmitted once the device is up.
pub const LOAD_BANNER: &[u8] = b"Mini UART driver loaded successfully!\r\n";
/// Transmitted just before the register windows are released.
pub const UNLOAD_BANNER: &[u8] = b"Mini UART driver unloading...\r\n";

/// Lifecycle of a [`Device`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceState {
    Uninitialized = 0,
    PinsConfigured = 1,
    /// Transmitter and receiver enabled.
    Running = 2,
    /// Transient while the configuration section reprograms the device.
    Reconfiguring = 3,
    Detached = 4,
}

impl DeviceState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => DeviceState::Uninitialized,
            1 => DeviceState::PinsConfigured,
            2 => DeviceState::Running,
            3 => DeviceState::Reconfiguring,
            _ => DeviceState::Detached,
        }
    }
}

/// Timing and policy knobs. Tests and unusual boards may tighten the
/// defaults.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Longest wait for transmit FIFO space per byte.
    pub tx_timeout_us: u64,
    pub tx_poll: PollStep,
    /// Longest wait for the first received byte.
    pub rx_first_byte_timeout_us: u64,
    /// Sleep between receive polls, both before the first byte and while idle.
    pub rx_poll: PollStep,
    /// Consecutive idle polls after which a read returns what it has.
    pub rx_idle_limit: u32,
    /// Sleep after issuing the FIFO clear commands.
    pub fifo_clear_delay: PollStep,
    pub pin_settle_cycles: u32,
    /// Sleep between attempts to enter a contended section.
    pub section_retry: PollStep,
    pub newline: NewlineTranslation,
    pub pull_scheme: PullScheme,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            tx_timeout_us: 10_000,
            tx_poll: PollStep::new(1, 2),
            rx_first_byte_timeout_us: 1_000_000,
            rx_poll: PollStep::new(1000, 1500),
            rx_idle_limit: 300,
            fifo_clear_delay: PollStep::new(100, 150),
            pin_settle_cycles: 150,
            section_retry: PollStep::new(50, 100),
            newline: NewlineTranslation::default(),
            pull_scheme: platform::PULL_SCHEME,
        }
    }
}

/// Live line-status and FIFO levels, read fresh from the hardware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub tx_empty: bool,
    pub tx_full: bool,
    pub rx_has_data: bool,
    pub rx_overrun: bool,
    pub tx_level: u32,
    pub rx_level: u32,
}

/// The attached Mini UART.
pub struct Device<R, C> {
    regs: R,
    clock: C,
    options: DriverOptions,
    state: AtomicU8,
    config: SpinLock<DeviceConfig>,
    tx: SpinLock<()>,
    rx: SpinLock<[u8; RX_BUFFER_LEN]>,
    stats: StatsCollector,
}

impl<R: RegisterAccess, C: Clock> Device<R, C> {
    /// Route the pins, program `config` and enable the transmitter and
    /// receiver.
    ///
    /// Fails without enabling anything if `config` has no valid divisor.
    pub fn new(
        regs: R,
        clock: C,
        config: DeviceConfig,
        options: DriverOptions,
    ) -> Result<Self, UartError> {
        let device = Self {
            regs,
            clock,
            options,
            state: AtomicU8::new(DeviceState::Uninitialized as u8),
            config: SpinLock::new(config),
            tx: SpinLock::new(()),
            rx: SpinLock::new([0; RX_BUFFER_LEN]),
            stats: StatsCollector::new(),
        };

        device.configure_pins();
        device.init_hardware()?;
        Ok(device)
    }

    pub fn state(&self) -> DeviceState {
        DeviceState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: DeviceState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Snapshot of the configuration currently programmed into the device.
    pub fn config(&self) -> DeviceConfig {
        *self.enter(&self.config)
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Read MU_LSR. The read clears the overrun flag, so it is counted here
    /// whichever path did the read.
    fn line_status(&self) -> LineStatus {
        let lsr = LineStatus::from_bits_truncate(self.regs.read32(Register::MuLsr));
        if lsr.contains(LineStatus::RX_OVERRUN) {
            self.stats.record_overrun();
            warn!("UART RX FIFO overrun detected");
        }
        lsr
    }

    /// Read line status and extra status.
    pub fn status(&self) -> StatusSnapshot {
        let lsr = self.line_status();
        let stat = self.regs.read32(Register::MuStat);
        let flags = ExtraStatus::from_bits_truncate(stat);

        StatusSnapshot {
            tx_empty: lsr.contains(LineStatus::TX_EMPTY),
            tx_full: flags.contains(ExtraStatus::TX_FIFO_FULL),
            rx_has_data: lsr.contains(LineStatus::DATA_READY),
            rx_overrun: lsr.contains(LineStatus::RX_OVERRUN),
            tx_level: aux::tx_fifo_level(stat),
            rx_level: aux::rx_fifo_level(stat),
        }
    }

    /// Enter one of the device's sections, sleeping between attempts.
    fn enter<'a, T>(&'a self, section: &'a SpinLock<T>) -> SpinLockGuard<'a, T> {
        let step = self.options.section_retry;
        section.lock_relaxed(|| self.clock.sleep_us(step.min_us, step.max_us))
    }

    /// Tear the device down and hand back its register access and clock.
    pub fn into_parts(self) -> (R, C) {
        self.set_state(DeviceState::Detached);
        (self.regs, self.clock)
    }
}

/// Map the register windows, bring the Mini UART up and announce it on the
/// line.
///
/// Any failure unmaps whatever was already mapped before returning.
pub fn attach<M: IoMapper, C: Clock>(
    mapper: &mut M,
    clock: C,
    config: DeviceConfig,
    options: DriverOptions,
) -> Result<Device<MmioRegisters, C>, UartError> {
    let Some(gpio_base) = mapper.map(platform::GPIO_BASE, gpio::GPIO_SPAN) else {
        error!("Failed to map GPIO registers");
        return Err(UartError::AttachFailure(Region::Gpio));
    };

    let Some(aux_base) = mapper.map(platform::AUX_BASE, aux::AUX_SPAN) else {
        error!("Failed to map UART registers");
        mapper.unmap(gpio_base, gpio::GPIO_SPAN);
        return Err(UartError::AttachFailure(Region::Aux));
    };

    // SAFETY: both windows were just mapped and stay mapped until `detach`.
    let regs = unsafe { MmioRegisters::new(aux_base, gpio_base) };

    let device = match Device::new(regs, clock, config, options) {
        Ok(device) => device,
        Err(err) => {
            error!("Failed to initialize UART hardware: {err}");
            mapper.unmap(aux_base, aux::AUX_SPAN);
            mapper.unmap(gpio_base, gpio::GPIO_SPAN);
            return Err(err);
        }
    };

    device.send_buffer(LOAD_BANNER);
    info!("UART driver loaded on {}", platform::NAME);
    Ok(device)
}

/// Say goodbye on the line and release the register windows.
pub fn detach<M: IoMapper, C: Clock>(device: Device<MmioRegisters, C>, mapper: &mut M) {
    device.send_buffer(UNLOAD_BANNER);

    let (regs, _clock) = device.into_parts();
    mapper.unmap(regs.aux_base(), aux::AUX_SPAN);
    mapper.unmap(regs.gpio_base(), gpio::GPIO_SPAN);

    info!("UART driver unloaded.");
}
