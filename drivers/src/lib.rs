//! BCM Mini UART Driver
//!
//! Polled driver for the auxiliary "Mini UART" of the BCM2711 / BCM2835,
//! organised in layers:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent types and the clock seam
//! - [`hw`]: Register map and bit definitions
//! - [`platform`]: SoC selection, MMIO access and the system timer
//! - [`peripheral`]: The Mini UART driver itself
//! - [`control`]: Text control plane and named endpoints
//!
//! # Usage Example
//!
//! ```no_run
//! use miniuart::control::ControlPlane;
//! use miniuart::hal::serial::DeviceConfig;
//! use miniuart::peripheral::mini_uart::{self, DriverOptions};
//! use miniuart::platform::{self, IdentityMapper, SystemTimerClock};
//!
//! let clock = unsafe { SystemTimerClock::new(platform::SYSTEM_TIMER_BASE) };
//! let device = mini_uart::attach(
//!     &mut IdentityMapper,
//!     clock,
//!     DeviceConfig::default(),
//!     DriverOptions::default(),
//! )?;
//! let plane = ControlPlane::new(device);
//! plane.write_data(b"Hello, world!\n")?;
//! # Ok::<(), miniuart::hal::serial::UartError>(())
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod control;
pub mod hal;
pub mod hw;
pub mod peripheral;
pub mod platform;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

// Re-export commonly used types
pub use control::{ControlPlane, Endpoint, EndpointTable};
pub use hal::serial::{BaudRate, DataBits, DeviceConfig, UartError};
pub use hal::timer::Clock;
pub use peripheral::mini_uart::{Device, DeviceState, DriverOptions};
