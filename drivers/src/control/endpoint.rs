//! Named file endpoints over a [`ControlPlane`].
//!
//! | name          | mode | read              | write              |
//! |---------------|------|-------------------|--------------------|
//! | `uart_tx`     | 0666 | -                 | transmit bytes     |
//! | `uart_rx`     | 0666 | received bytes    | -                  |
//! | `uart_config` | 0666 | config snapshot   | one command        |
//! | `uart_status` | 0444 | status snapshot   | -                  |
//! | `uart_stats`  | 0444 | stats snapshot    | -                  |
//!
//! Every read is one-shot: a read at a non-zero offset is end-of-file.

use super::{ControlPlane, TX_CHUNK_LEN};
use crate::hal::serial::UartError;
use crate::hal::timer::Clock;
use crate::hw::RegisterAccess;
use alloc::string::String;
use alloc::sync::Arc;
use log::warn;

/// Largest command accepted by a config write.
pub const COMMAND_MAX_LEN: usize = 127;

/// Caller-owned destination of a read. Copies into it may fault.
pub trait UserWriter {
    /// Bytes the caller asked for.
    fn capacity(&self) -> usize;

    /// Copy `bytes` (at most `capacity()` long) to the start of the buffer.
    fn copy_out(&mut self, bytes: &[u8]) -> Result<(), UartError>;
}

/// Caller-owned source of a write. Copies out of it may fault.
pub trait UserReader {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `dst` from the start of the buffer.
    fn copy_in(&self, dst: &mut [u8]) -> Result<(), UartError>;
}

impl UserWriter for &mut [u8] {
    fn capacity(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_out(&mut self, bytes: &[u8]) -> Result<(), UartError> {
        self.get_mut(..bytes.len())
            .ok_or(UartError::TransferFault)?
            .copy_from_slice(bytes);
        Ok(())
    }
}

impl UserReader for &[u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_in(&self, dst: &mut [u8]) -> Result<(), UartError> {
        dst.copy_from_slice(self.get(..dst.len()).ok_or(UartError::TransferFault)?);
        Ok(())
    }
}

/// File operations offered by an endpoint.
pub trait Endpoint: Send + Sync {
    /// Read into `out`, returning the bytes produced.
    fn read(&self, _out: &mut dyn UserWriter, _offset: usize) -> Result<usize, UartError> {
        Err(UartError::Unsupported)
    }

    /// Consume `input`, returning the bytes accepted.
    fn write(&self, _input: &dyn UserReader, _offset: usize) -> Result<usize, UartError> {
        Err(UartError::Unsupported)
    }
}

/// Name and permission bits of a published endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub name: &'static str,
    pub mode: u16,
}

pub const ENDPOINTS: [EndpointInfo; 5] = [
    EndpointInfo { name: "uart_tx", mode: 0o666 },
    EndpointInfo { name: "uart_rx", mode: 0o666 },
    EndpointInfo { name: "uart_config", mode: 0o666 },
    EndpointInfo { name: "uart_status", mode: 0o444 },
    EndpointInfo { name: "uart_stats", mode: 0o444 },
];

/// Copy a snapshot to the caller, truncated to what they asked for.
fn serve_snapshot(
    text: String,
    out: &mut dyn UserWriter,
    offset: usize,
) -> Result<usize, UartError> {
    if offset > 0 {
        return Ok(0);
    }
    let len = text.len().min(out.capacity());
    out.copy_out(&text.as_bytes()[..len])?;
    Ok(len)
}

/// `uart_tx`: bytes written here are transmitted.
pub struct TxEndpoint<R, C>(Arc<ControlPlane<R, C>>);

impl<R: RegisterAccess, C: Clock> Endpoint for TxEndpoint<R, C> {
    fn write(&self, input: &dyn UserReader, _offset: usize) -> Result<usize, UartError> {
        let mut chunk = [0u8; TX_CHUNK_LEN];
        let len = input.len().min(TX_CHUNK_LEN);

        if let Err(err) = input.copy_in(&mut chunk[..len]) {
            self.0.device().stats().record_tx_error();
            return Err(err);
        }

        self.0.write_data(&chunk[..len])
    }
}

/// `uart_rx`: reading waits for and returns received bytes.
pub struct RxEndpoint<R, C>(Arc<ControlPlane<R, C>>);

impl<R: RegisterAccess, C: Clock> Endpoint for RxEndpoint<R, C> {
    fn read(&self, out: &mut dyn UserWriter, offset: usize) -> Result<usize, UartError> {
        if offset > 0 {
            return Ok(0);
        }

        let data = self.0.read_data(out.capacity());
        if let Err(err) = out.copy_out(&data) {
            self.0.device().stats().record_rx_error();
            return Err(err);
        }
        Ok(data.len())
    }
}

/// `uart_config`: configuration snapshot and command input.
pub struct ConfigEndpoint<R, C>(Arc<ControlPlane<R, C>>);

impl<R: RegisterAccess, C: Clock> Endpoint for ConfigEndpoint<R, C> {
    fn read(&self, out: &mut dyn UserWriter, offset: usize) -> Result<usize, UartError> {
        serve_snapshot(self.0.get_config_text(), out, offset)
    }

    fn write(&self, input: &dyn UserReader, _offset: usize) -> Result<usize, UartError> {
        let mut buf = [0u8; COMMAND_MAX_LEN];
        let len = input.len().min(COMMAND_MAX_LEN);
        input.copy_in(&mut buf[..len])?;

        let command = core::str::from_utf8(&buf[..len]).map_err(|_| {
            warn!("Invalid command: not UTF-8");
            UartError::InvalidCommand
        })?;
        self.0.set_config(command)?;
        Ok(input.len())
    }
}

/// `uart_status`: live line and FIFO state.
pub struct StatusEndpoint<R, C>(Arc<ControlPlane<R, C>>);

impl<R: RegisterAccess, C: Clock> Endpoint for StatusEndpoint<R, C> {
    fn read(&self, out: &mut dyn UserWriter, offset: usize) -> Result<usize, UartError> {
        serve_snapshot(self.0.get_status_text(), out, offset)
    }
}

/// `uart_stats`: traffic and error counters.
pub struct StatsEndpoint<R, C>(Arc<ControlPlane<R, C>>);

impl<R: RegisterAccess, C: Clock> Endpoint for StatsEndpoint<R, C> {
    fn read(&self, out: &mut dyn UserWriter, offset: usize) -> Result<usize, UartError> {
        serve_snapshot(self.0.get_stats_text(), out, offset)
    }
}

/// The published endpoints of one device.
pub struct EndpointTable<R, C> {
    plane: Arc<ControlPlane<R, C>>,
}

impl<R: RegisterAccess, C: Clock> EndpointTable<R, C> {
    pub fn new(plane: Arc<ControlPlane<R, C>>) -> Self {
        Self { plane }
    }

    pub fn plane(&self) -> &Arc<ControlPlane<R, C>> {
        &self.plane
    }

    pub fn list(&self) -> &'static [EndpointInfo] {
        &ENDPOINTS
    }

    /// Open an endpoint by name.
    pub fn open<'a>(&'a self, name: &str) -> Option<Arc<dyn Endpoint + 'a>>
    where
        R: 'a,
        C: 'a,
    {
        let plane = Arc::clone(&self.plane);
        let endpoint: Arc<dyn Endpoint + 'a> = match name {
            "uart_tx" => Arc::new(TxEndpoint(plane)),
            "uart_rx" => Arc::new(RxEndpoint(plane)),
            "uart_config" => Arc::new(ConfigEndpoint(plane)),
            "uart_status" => Arc::new(StatusEndpoint(plane)),
            "uart_stats" => Arc::new(StatsEndpoint(plane)),
            _ => return None,
        };
        Some(endpoint)
    }
}
