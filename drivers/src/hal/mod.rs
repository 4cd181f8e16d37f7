//! Hardware Abstraction Layer (HAL) - Platform-Independent Types
//!
//! Nothing in here touches a register. The driver is written against these
//! definitions so it can run over real MMIO or the simulator alike.
//!
//! # Available Interfaces
//!
//! - [`serial`]: Line settings and driver errors
//! - [`timer`]: Monotonic clock, sleeps and bounded polling

pub mod serial;
pub mod timer;
