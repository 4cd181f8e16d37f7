//! Peripheral Drivers
//!
//! # Available Peripherals
//!
//! - [`mini_uart`]: BCM auxiliary Mini UART

pub mod mini_uart;
