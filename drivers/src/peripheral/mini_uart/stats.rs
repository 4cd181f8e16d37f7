use core::sync::atomic::{AtomicU64, Ordering};
use log::info;

/// Point-in-time copy of the device counters.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DeviceStats {
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub tx_errors: u64,
    pub rx_errors: u64,
    pub fifo_overruns: u64,
}

/// Monotonic transfer and error counters.
///
/// Transmit, receive and the control plane update these from different
/// sections, so every counter is an independent atomic.
#[derive(Debug, Default)]
pub struct StatsCollector {
    tx_bytes: AtomicU64,
    rx_bytes: AtomicU64,
    tx_errors: AtomicU64,
    rx_errors: AtomicU64,
    fifo_overruns: AtomicU64,
}

impl StatsCollector {
    pub const fn new() -> Self {
        Self {
            tx_bytes: AtomicU64::new(0),
            rx_bytes: AtomicU64::new(0),
            tx_errors: AtomicU64::new(0),
            rx_errors: AtomicU64::new(0),
            fifo_overruns: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> DeviceStats {
        DeviceStats {
            tx_bytes: self.tx_bytes.load(Ordering::Relaxed),
            rx_bytes: self.rx_bytes.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
            rx_errors: self.rx_errors.load(Ordering::Relaxed),
            fifo_overruns: self.fifo_overruns.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in self.counters() {
            counter.store(0, Ordering::Relaxed);
        }
        info!("Statistics reset");
    }

    fn counters(&self) -> [&AtomicU64; 5] {
        [
            &self.tx_bytes,
            &self.rx_bytes,
            &self.tx_errors,
            &self.rx_errors,
            &self.fifo_overruns,
        ]
    }

    pub(crate) fn record_tx_byte(&self) {
        self.tx_bytes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rx_byte(&self) {
        self.rx_bytes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tx_error(&self) {
        self.tx_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rx_error(&self) {
        self.rx_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_overrun(&self) {
        self.fifo_overruns.fetch_add(1, Ordering::Relaxed);
    }
}
