//! Commands accepted by the config endpoint.

use crate::hal::serial::{BaudRate, DataBits, UartError};
use core::str::FromStr;

/// One parsed config write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `baud=<rate>`, one of [`BaudRate::ALL`].
    Baud(BaudRate),
    /// `bits=7` or `bits=8`.
    Bits(DataBits),
    /// `clear_fifo`.
    ClearFifo,
    /// `reset_stats`.
    ResetStats,
}

impl FromStr for Command {
    type Err = UartError;

    /// Surrounding whitespace (such as the newline `echo` appends) is
    /// ignored; everything else must match exactly.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();

        if let Some(value) = input.strip_prefix("baud=") {
            return value
                .parse::<u32>()
                .ok()
                .and_then(BaudRate::from_bps)
                .map(Command::Baud)
                .ok_or(UartError::InvalidCommand);
        }

        if let Some(value) = input.strip_prefix("bits=") {
            return value
                .parse::<u8>()
                .ok()
                .and_then(DataBits::from_count)
                .map(Command::Bits)
                .ok_or(UartError::InvalidCommand);
        }

        match input {
            "clear_fifo" => Ok(Command::ClearFifo),
            "reset_stats" => Ok(Command::ResetStats),
            _ => Err(UartError::InvalidCommand),
        }
    }
}
