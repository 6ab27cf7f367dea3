//! Composed peripherals for the talos MCU framework
//!
//! This crate turns the chip traits from `talos-hal` into ergonomic,
//! conflict-checked peripheral objects:
//!
//! - [`bus::Bus`] - logical multi-pin buses over scattered ports
//! - [`pin::Pin`] - single-pad projection speaking `embedded-hal`
//! - [`uart::Uart`] - uniform reader/writer front-end over any chip UART
//! - [`jtag::Jtag`] - bit-banged IEEE 1149.1 TAP adapter
//!
//! Every peripheral records the pads it takes in the process-wide ledger
//! on `init` and releases them on `deinit`, so two subsystems configured
//! onto the same pad fail loudly at bring-up instead of corrupting each
//! other at runtime.

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod jtag;
pub mod pin;
pub mod uart;

// Re-export the main peripheral types at crate root for convenience
pub use bus::Bus;
pub use jtag::{Jtag, TapState};
pub use pin::Pin;
pub use uart::Uart;
