//! Platform Abstraction Layer
//!
//! Compile-time SoC selection plus the production implementations of the
//! driver's hardware seams: volatile MMIO register access, region mapping
//! and the system-timer clock.
//!
//! # Usage
//!
//! ```no_run
//! use miniuart::platform::{IdentityMapper, SystemTimerClock};
//! use miniuart::peripheral::mini_uart::{self, DriverOptions};
//! use miniuart::hal::serial::DeviceConfig;
//!
//! let clock = unsafe { SystemTimerClock::new(miniuart::platform::SYSTEM_TIMER_BASE) };
//! let device = mini_uart::attach(
//!     &mut IdentityMapper,
//!     clock,
//!     DeviceConfig::default(),
//!     DriverOptions::default(),
//! )?;
//! device.send_buffer(b"hello\n");
//! # Ok::<(), miniuart::hal::serial::UartError>(())
//! ```

mod mmio;
mod timer;

pub use mmio::{IdentityMapper, IoMapper, MmioRegisters};
pub use timer::SystemTimerClock;

use crate::hw::{aux, gpio};

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2711")] {
        mod bcm2711;
        pub use bcm2711::*;
    } else if #[cfg(feature = "bcm2835")] {
        mod bcm2835;
        pub use bcm2835::*;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features bcm2711\n\
            Or:  cargo build --no-default-features --features bcm2835"
        );
    }
}

// Ensure only one platform is selected
#[cfg(all(feature = "bcm2835", feature = "bcm2711"))]
compile_error!("Multiple platforms selected! Choose only one: bcm2835 OR bcm2711");

/// Physical address of the auxiliary block holding the Mini UART.
pub const AUX_BASE: usize = PERIPHERAL_BASE + aux::AUX_OFFSET;

/// Physical address of the GPIO block.
pub const GPIO_BASE: usize = PERIPHERAL_BASE + gpio::GPIO_OFFSET;

/// Physical address of the free-running system timer.
pub const SYSTEM_TIMER_BASE: usize = PERIPHERAL_BASE + 0x3000;
