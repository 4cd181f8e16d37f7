use super::Device;
use crate::hal::timer::{Clock, wait_until};
use crate::hw::aux::LineStatus;
use crate::hw::{Register, RegisterAccess};
use alloc::vec::Vec;
use log::debug;

/// Size of the receive staging buffer; no single read returns more.
pub const RX_BUFFER_LEN: usize = 512;

impl<R: RegisterAccess, C: Clock> Device<R, C> {
    /// Collect up to `max_len` received bytes.
    ///
    /// Waits for the first byte for at most the configured first-byte
    /// timeout, returning nothing if none arrives. After that, keeps draining
    /// the FIFO and returns once the buffer is full or the line has been idle
    /// for `rx_idle_limit` consecutive polls.
    pub fn receive(&self, max_len: usize) -> Vec<u8> {
        let mut buf = self.enter(&self.rx);
        let limit = max_len.min(RX_BUFFER_LEN);
        if limit == 0 {
            return Vec::new();
        }

        let opts = &self.options;
        if !wait_until(
            &self.clock,
            opts.rx_first_byte_timeout_us,
            opts.rx_poll,
            || self.rx_ready(),
        ) {
            debug!("UART RX: nothing received");
            return Vec::new();
        }

        let mut len = 0;
        let mut idle = 0;
        while len < limit {
            while len < limit && self.rx_ready() {
                buf[len] = self.read_data();
                len += 1;
                idle = 0;
            }
            if len == limit {
                break;
            }

            self.clock.sleep_us(opts.rx_poll.min_us, opts.rx_poll.max_us);
            idle += 1;
            if idle >= opts.rx_idle_limit {
                break;
            }
        }

        buf[..len].to_vec()
    }

    fn rx_ready(&self) -> bool {
        self.line_status().contains(LineStatus::DATA_READY)
    }

    fn read_data(&self) -> u8 {
        let byte = (self.regs.read32(Register::MuIo) & 0xFF) as u8;
        self.stats.record_rx_byte();
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripheral::mini_uart::tests::sim_device;
    use crate::sim::ManualClock;

    #[test]
    fn returns_available_bytes_after_idle_drain() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.registers().push_rx(b"hello");
        let start = clock.now_us();

        assert_eq!(device.receive(512), b"hello");

        // 300 idle polls of 1 ms each; well inside the 450 ms bound.
        let elapsed = clock.now_us() - start;
        assert_eq!(elapsed, 300 * 1000);
        assert!(elapsed <= 450_000);
        assert_eq!(device.stats().snapshot().rx_bytes, 5);
    }

    #[test]
    fn nothing_arrives_within_a_second() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        let start = clock.now_us();

        assert!(device.receive(64).is_empty());
        assert_eq!(clock.now_us() - start, 1_000_000);
        assert_eq!(device.stats().snapshot().rx_bytes, 0);
    }

    #[test]
    fn never_returns_more_than_requested_or_buffered() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        let incoming: Vec<u8> = (0..700u32).map(|i| i as u8).collect();
        device.registers().push_rx(&incoming);

        let first = device.receive(10);
        assert_eq!(first, &incoming[..10]);

        let second = device.receive(4096);
        assert_eq!(second.len(), RX_BUFFER_LEN);
        assert_eq!(second, &incoming[10..10 + RX_BUFFER_LEN]);

        assert_eq!(device.registers().rx_pending(), 700 - 10 - RX_BUFFER_LEN);
    }

    #[test]
    fn zero_length_read_returns_immediately() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.registers().push_rx(b"x");
        let sleeps = clock.sleeps();

        assert!(device.receive(0).is_empty());
        assert_eq!(clock.sleeps(), sleeps);
        assert_eq!(device.registers().rx_pending(), 1);
    }

    #[test]
    fn bytes_arriving_during_the_idle_window_are_collected() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.registers().push_rx(b"ab");
        device.registers().schedule_rx(50, b"cd");

        assert_eq!(device.receive(512), b"abcd");
    }

    #[test]
    fn late_first_byte_is_still_received() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.registers().schedule_rx(200, b"z");

        assert_eq!(device.receive(8), b"z");
    }

    #[test]
    fn overrun_is_counted_without_losing_data() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.registers().push_rx(b"data");
        device.registers().raise_overrun();

        assert_eq!(device.receive(512), b"data");
        let stats = device.stats().snapshot();
        assert_eq!(stats.fifo_overruns, 1);
        assert_eq!(stats.rx_errors, 0);
    }

    #[test]
    fn nul_bytes_are_kept() {
        let clock = ManualClock::new();
        let device = sim_device(&clock);
        device.registers().push_rx(&[b'a', 0, b'b']);

        assert_eq!(device.receive(16), [b'a', 0, b'b']);
    }
}
