//! Talos Hardware Abstraction Layer
//!
//! This crate defines the traits a chip crate implements to plug its
//! peripherals into the framework. Everything above it (the peripheral
//! composition layer, application code) is written against these traits
//! and runs unchanged on any chip that provides them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application firmware                   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  talos-drivers (bus, UART, JTAG)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  talos-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  chip crate A │       │  chip crate B │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PadId`], [`gpio::Gpio`] - pad identity and port-level I/O
//! - [`uart::UartRx`], [`uart::UartTx`], [`uart::UartImpl`] - serial
//!   capabilities and lifecycle
//! - [`clocks::Clocks`] - tick sources and clock-tree frequencies
//! - [`interrupts::Interrupts`] - per-interrupt control
//! - [`dma::DmaChannel`] - DMA channel identity

#![no_std]
#![deny(unsafe_code)]

pub mod clocks;
pub mod dma;
pub mod gpio;
pub mod interrupts;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clocks::Clocks;
pub use dma::DmaChannel;
pub use gpio::{Gpio, PadId};
pub use uart::{UartImpl, UartRx, UartTx};
