//! BCM2835 (Raspberry Pi 1/Zero) constants.

use crate::hw::gpio::PullScheme;

pub const NAME: &str = "BCM2835 (Raspberry Pi 1/Zero)";

pub const PERIPHERAL_BASE: usize = 0x2000_0000;

/// Core clock feeding the Mini UART baud generator.
pub const SYSTEM_CLOCK_HZ: u32 = 250_000_000;

pub const PULL_SCHEME: PullScheme = PullScheme::Clocked;
