//! Shared `no_std` building blocks for the driver workspace.

#![cfg_attr(not(test), no_std)]

pub mod sync;
