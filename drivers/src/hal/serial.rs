//! Serial line configuration and error types.
//!
//! These types are platform-independent: they describe what the line should
//! look like, not how a particular UART encodes it.

use core::fmt;

/// Supported line rates. No other rate is accepted by the control plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum BaudRate {
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    /// All supported rates, slowest first.
    pub const ALL: [BaudRate; 5] = [
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B115200,
    ];

    pub const fn bps(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }

    /// Look up an enumerated rate by its bits-per-second value.
    pub fn from_bps(bps: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|rate| rate.bps() == bps)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bps())
    }
}

/// Number of data bits per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

impl DataBits {
    pub const fn count(self) -> u8 {
        match self {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }

    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            7 => Some(DataBits::Seven),
            8 => Some(DataBits::Eight),
            _ => None,
        }
    }
}

/// Line configuration owned by the device.
///
/// The divisor derived from `baud_rate` and `system_clock_hz` must fit the
/// 16-bit baud register; this is checked every time the configuration is
/// programmed, never assumed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub baud_rate: BaudRate,
    pub data_bits: DataBits,
    pub system_clock_hz: u32,
}

impl DeviceConfig {
    pub const fn new(baud_rate: BaudRate, data_bits: DataBits, system_clock_hz: u32) -> Self {
        Self {
            baud_rate,
            data_bits,
            system_clock_hz,
        }
    }

    pub const fn with_baud_rate(self, baud_rate: BaudRate) -> Self {
        Self { baud_rate, ..self }
    }

    pub const fn with_data_bits(self, data_bits: DataBits) -> Self {
        Self { data_bits, ..self }
    }
}

impl Default for DeviceConfig {
    /// 9600 baud, 8 data bits, clocked from the selected platform's core clock.
    fn default() -> Self {
        Self::new(
            BaudRate::B9600,
            DataBits::Eight,
            crate::platform::SYSTEM_CLOCK_HZ,
        )
    }
}

/// Register region that an attach step failed to map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Region {
    /// GPIO function-select and pull registers.
    Gpio,
    /// Auxiliary peripheral block holding the Mini UART.
    Aux,
}

/// Errors reported by the Mini UART driver and its control plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UartError {
    /// Baud rate is zero or faster than `clock / 8`.
    InvalidBaudRate,
    /// Derived divisor does not fit the 16-bit baud register.
    BaudOverflow,
    /// No transmit FIFO space appeared before the deadline.
    TxTimeout,
    /// Hardware reported a receive overrun. Counted, never fatal.
    RxOverrun,
    /// Control command could not be parsed or names an unsupported value.
    InvalidCommand,
    /// Copy between an endpoint and the caller's buffer failed.
    TransferFault,
    /// Register mapping was unavailable; the device never came up.
    AttachFailure(Region),
    /// The endpoint does not offer this operation.
    Unsupported,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::InvalidBaudRate => f.write_str("invalid baud rate"),
            UartError::BaudOverflow => f.write_str("baud divisor exceeds 16 bits"),
            UartError::TxTimeout => f.write_str("transmit timeout"),
            UartError::RxOverrun => f.write_str("receive FIFO overrun"),
            UartError::InvalidCommand => f.write_str("invalid command"),
            UartError::TransferFault => f.write_str("user buffer transfer fault"),
            UartError::AttachFailure(region) => write!(f, "failed to map {region:?} registers"),
            UartError::Unsupported => f.write_str("operation not supported"),
        }
    }
}
