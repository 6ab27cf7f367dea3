//! Chip-agnostic core services for the talos MCU framework
//!
//! This crate contains the leaf services every other part of the framework
//! builds on, none of which depend on a specific chip:
//!
//! - Monotonic time value types and duration folding
//! - Scoped critical sections
//! - Typed volatile MMIO register cells
//! - Pad and DMA channel ownership ledgers
//! - Frequency rendering
//! - The post-reset startup sequence

#![no_std]

#[cfg(test)]
extern crate std;

pub mod critical;
pub mod frequency;
pub mod ledger;
pub mod mmio;
pub mod runtime;
pub mod time;

// Re-export key types at crate root for convenience
pub use frequency::Hertz;
pub use time::{Duration, Microtick, Tick};
