//! Text control plane over an attached Mini UART.
//!
//! [`ControlPlane`] is the command/report surface: byte transmit and receive
//! plus `key=value` configuration and human-readable snapshots. The
//! [`endpoint`] module publishes it as five named files.

pub mod command;
pub mod endpoint;
mod report;

pub use command::Command;
pub use endpoint::{Endpoint, EndpointInfo, EndpointTable, UserReader, UserWriter};

use crate::hal::serial::UartError;
use crate::hal::timer::Clock;
use crate::hw::RegisterAccess;
use crate::peripheral::mini_uart::{Device, RX_BUFFER_LEN};
use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, info, warn};

/// Largest payload accepted by one [`ControlPlane::write_data`] call.
pub const TX_CHUNK_LEN: usize = 512;

/// Command and report surface of a running device.
pub struct ControlPlane<R, C> {
    device: Device<R, C>,
}

impl<R: RegisterAccess, C: Clock> ControlPlane<R, C> {
    pub fn new(device: Device<R, C>) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Device<R, C> {
        &self.device
    }

    pub fn into_device(self) -> Device<R, C> {
        self.device
    }

    /// Transmit up to [`TX_CHUNK_LEN`] bytes and return how many were taken.
    ///
    /// Bytes past the limit are dropped. Fails only when there was something
    /// to send and none of it made it into the FIFO.
    pub fn write_data(&self, bytes: &[u8]) -> Result<usize, UartError> {
        let accepted = &bytes[..bytes.len().min(TX_CHUNK_LEN)];
        let report = self.device.send_buffer(accepted);

        if !accepted.is_empty() && report.written == 0 {
            return Err(UartError::TxTimeout);
        }

        debug!("UART TX: sent {} bytes", accepted.len());
        Ok(accepted.len())
    }

    /// Receive up to `max_len` bytes (capped at [`RX_BUFFER_LEN`]).
    pub fn read_data(&self, max_len: usize) -> Vec<u8> {
        let data = self.device.receive(max_len.min(RX_BUFFER_LEN));
        if !data.is_empty() {
            debug!("UART RX: received {} bytes", data.len());
        }
        data
    }

    pub fn get_config_text(&self) -> String {
        report::config_text(&self.device.config())
    }

    /// Parse and apply one command.
    ///
    /// Nothing changes when the command is rejected.
    pub fn set_config(&self, input: &str) -> Result<(), UartError> {
        let command = input.parse::<Command>().inspect_err(|_| {
            warn!("Invalid command: {}", input.trim());
        })?;

        match command {
            Command::Baud(rate) => {
                self.device.set_baud_rate(rate)?;
            }
            Command::Bits(bits) => {
                self.device.set_data_bits(bits)?;
            }
            Command::ClearFifo => self.device.clear_fifos(),
            Command::ResetStats => self.device.stats().reset(),
        }

        info!("Applied {command:?}");
        Ok(())
    }

    /// Line and FIFO state, read fresh from the hardware.
    pub fn get_status_text(&self) -> String {
        report::status_text(&self.device.status())
    }

    pub fn get_stats_text(&self) -> String {
        report::stats_text(&self.device.stats().snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::serial::{BaudRate, DataBits, DeviceConfig};
    use crate::hw::Register;
    use crate::peripheral::mini_uart::tests::sim_device;
    use crate::sim::ManualClock;

    fn plane(clock: &ManualClock) -> ControlPlane<crate::sim::SimRegisters, &ManualClock> {
        ControlPlane::new(sim_device(clock))
    }

    #[test]
    fn unsupported_baud_leaves_configuration_alone() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        let before = plane.device().config();
        let before_text = plane.get_config_text();

        assert_eq!(plane.set_config("baud=57601"), Err(UartError::InvalidCommand));
        assert_eq!(plane.device().config(), before);
        assert_eq!(plane.get_config_text(), before_text);
        assert!(plane.device().registers().log().is_empty());
    }

    #[test]
    fn rejected_divisor_leaves_config_text_alone() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        plane.set_config("baud=57600").unwrap();
        plane.device().registers().clear_log();
        let before_text = plane.get_config_text();

        let unreachable = DeviceConfig::new(BaudRate::B115200, DataBits::Seven, 100_000);
        assert_eq!(
            plane.device().apply_config(unreachable),
            Err(UartError::InvalidBaudRate)
        );

        assert_eq!(plane.get_config_text(), before_text);
        assert!(plane.get_config_text().contains("Baudrate: 57600\n"));
        assert!(plane.device().registers().log().is_empty());
    }

    #[test]
    fn baud_and_bits_commands_reprogram_the_device() {
        let clock = ManualClock::new();
        let plane = plane(&clock);

        plane.set_config("baud=115200\n").unwrap();
        plane.set_config("bits=7\n").unwrap();

        let config = plane.device().config();
        assert_eq!(config.baud_rate, BaudRate::B115200);
        assert_eq!(config.data_bits, DataBits::Seven);
        assert_eq!(plane.device().registers().value(Register::MuBaud), 541);
        assert_eq!(plane.device().registers().value(Register::MuLcr), 0);
        assert!(plane.get_config_text().contains("Baudrate: 115200\n"));
    }

    #[test]
    fn clear_fifo_command_flushes_pending_input() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        plane.device().registers().push_rx(b"stale");

        plane.set_config("clear_fifo").unwrap();

        assert_eq!(plane.device().registers().rx_pending(), 0);
        assert_eq!(
            plane.device().registers().writes_to(Register::MuIir),
            [0x02, 0x04]
        );
    }

    #[test]
    fn reset_stats_zeroes_every_counter() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        plane.write_data(b"abc").unwrap();
        plane.device().registers().push_rx(b"xy");
        plane.read_data(16);

        plane.set_config("reset_stats\n").unwrap();

        assert_eq!(plane.device().stats().snapshot(), Default::default());
        assert!(plane.get_stats_text().contains("TX bytes: 0\nRX bytes: 0\n"));
    }

    #[test]
    fn byte_counters_match_traffic() {
        let clock = ManualClock::new();
        let plane = plane(&clock);

        assert_eq!(plane.write_data(b"hello"), Ok(5));
        plane.device().registers().push_rx(b"0123456789");
        assert_eq!(plane.read_data(64), b"0123456789");

        let stats = plane.device().stats().snapshot();
        assert_eq!(stats.tx_bytes, 5);
        assert_eq!(stats.rx_bytes, 10);
        assert_eq!(plane.device().registers().take_wire(), b"hello");
    }

    #[test]
    fn write_data_caps_each_call() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        let payload = [b'z'; 600];

        assert_eq!(plane.write_data(&payload), Ok(TX_CHUNK_LEN));
        assert_eq!(plane.device().registers().take_wire().len(), TX_CHUNK_LEN);
        assert_eq!(plane.write_data(&[]), Ok(0));
    }

    #[test]
    fn write_data_fails_when_nothing_reaches_the_wire() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        plane.device().registers().set_tx_stalled(true);

        assert_eq!(plane.write_data(b"ab"), Err(UartError::TxTimeout));
        assert_eq!(plane.device().stats().snapshot().tx_errors, 2);
    }

    #[test]
    fn status_text_reflects_live_registers() {
        let clock = ManualClock::new();
        let plane = plane(&clock);

        assert!(plane.get_status_text().contains("RX FIFO has data: No\n"));

        plane.device().registers().push_rx(b"abc");
        let text = plane.get_status_text();
        assert!(text.contains("RX FIFO has data: Yes\n"));
        assert!(text.contains("RX FIFO level: 3\n"));
        assert!(text.contains("TX FIFO empty: Yes\n"));
    }

    #[test]
    fn status_text_reports_overrun() {
        let clock = ManualClock::new();
        let plane = plane(&clock);
        plane.device().registers().raise_overrun();

        assert!(plane.get_status_text().contains("RX FIFO overrun: Yes (ERROR!)\n"));
        assert!(plane.get_status_text().contains("RX FIFO overrun: No\n"));
    }
}
