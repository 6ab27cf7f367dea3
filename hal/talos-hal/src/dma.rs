//! DMA channel identity
//!
//! The framework does not program DMA transfers itself; it only arbitrates
//! channel ownership through the process-wide ledger, exactly as it does
//! for pads.

use talos_core::ledger;

/// Identity of a DMA channel, supplied by the chip crate.
pub trait DmaChannel: Copy + Eq {
    /// Stable human-readable channel name, e.g. `"DMA1_CH3"`.
    fn name(&self) -> &'static str;

    /// Dense index keying the channel ledger. Unique per channel and less
    /// than [`ledger::DMA_CAPACITY`].
    fn index(&self) -> usize;
}

/// Reserve `channels` in the process-wide channel ledger under `owner`.
///
/// Panics if any channel is already reserved.
pub fn reserve_channels<C: DmaChannel, const N: usize>(channels: &[C; N], owner: &'static str) {
    let mut indices = [0usize; N];
    for (slot, channel) in indices.iter_mut().zip(channels.iter()) {
        *slot = channel.index();
    }
    ledger::dma_channels().reserve(&indices, owner);
}

/// Release `channels` previously reserved under `owner`.
pub fn release_channels<C: DmaChannel, const N: usize>(channels: &[C; N], owner: &'static str) {
    let mut indices = [0usize; N];
    for (slot, channel) in indices.iter_mut().zip(channels.iter()) {
        *slot = channel.index();
    }
    ledger::dma_channels().release(&indices, owner);
}

pub fn channel_is_reserved<C: DmaChannel>(channel: C) -> bool {
    ledger::dma_channels().is_reserved(channel.index())
}
