use super::Device;
use crate::hal::serial::UartError;
use crate::hal::timer::{Clock, wait_until};
use crate::hw::aux::LineStatus;
use crate::hw::{Register, RegisterAccess};
use log::warn;

/// Carriage returns emitted for each line feed in a buffer.
///
/// Every line feed is preceded by a carriage return at the byte level. With
/// `Doubled`, buffer transmission adds one more in front of it, giving
/// CR CR LF on the wire. Legacy hosts were written against that framing, so
/// it stays the default.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum NewlineTranslation {
    /// LF is sent as CR CR LF.
    #[default]
    Doubled,
    /// LF is sent as CR LF.
    Single,
}

/// Outcome of a transmit call.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TxReport {
    /// Bytes placed in the transmit FIFO, including inserted carriage returns.
    pub written: usize,
    /// Bytes dropped because no FIFO space appeared in time.
    pub timeouts: usize,
}

impl<R: RegisterAccess, C: Clock> Device<R, C> {
    /// Transmit one byte (CR LF for a line feed) as a single unit.
    pub fn send_byte(&self, byte: u8) -> Result<(), UartError> {
        let _tx = self.enter(&self.tx);
        let mut report = TxReport::default();
        self.transmit(byte, &mut report);
        if report.timeouts > 0 {
            return Err(UartError::TxTimeout);
        }
        Ok(())
    }

    /// Transmit `bytes` without interleaving with any other sender.
    ///
    /// A byte that times out is dropped and counted; the rest of the buffer
    /// is still attempted.
    pub fn send_buffer(&self, bytes: &[u8]) -> TxReport {
        let _tx = self.enter(&self.tx);
        let mut report = TxReport::default();

        for &byte in bytes {
            if byte == b'\n' && self.options.newline == NewlineTranslation::Doubled {
                self.transmit(b'\r', &mut report);
            }
            self.transmit(byte, &mut report);
        }

        report
    }

    /// Caller must be inside the transmit section.
    fn transmit(&self, byte: u8, report: &mut TxReport) {
        if byte == b'\n' {
            self.transmit(b'\r', report);
        }

        let space = wait_until(
            &self.clock,
            self.options.tx_timeout_us,
            self.options.tx_poll,
            || self.line_status().contains(LineStatus::TX_EMPTY),
        );

        if !space {
            self.stats.record_tx_error();
            report.timeouts += 1;
            warn!("TX timeout occurred");
            return;
        }

        self.regs.write32(Register::MuIo, u32::from(byte));
        self.stats.record_tx_byte();
        report.written += 1;
    }
}
