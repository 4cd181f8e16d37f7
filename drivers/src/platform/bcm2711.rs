//! BCM2711 (Raspberry Pi 4) constants.

use crate::hw::gpio::PullScheme;

pub const NAME: &str = "BCM2711 (Raspberry Pi 4)";

/// Low-peripheral-mode base address.
pub const PERIPHERAL_BASE: usize = 0xFE00_0000;

/// Core clock feeding the Mini UART baud generator.
pub const SYSTEM_CLOCK_HZ: u32 = 500_000_000;

pub const PULL_SCHEME: PullScheme = PullScheme::Direct;
