//! Interrupt controller access
//!
//! Per-interrupt control for the chip's controller. Global
//! disable/restore is not here: it flows through the `critical-section`
//! implementation the chip registers, wrapped by `talos_core::critical`.

/// Per-interrupt control, implemented over the chip's interrupt
/// controller.
pub trait Interrupts {
    /// Interrupt identifiers of this chip.
    type Kind: Copy;

    fn set_enabled(&mut self, interrupt: Self::Kind, enabled: bool);

    fn set_priority(&mut self, interrupt: Self::Kind, priority: u8);

    fn is_pending(&self, interrupt: Self::Kind) -> bool;

    fn set_pending(&mut self, interrupt: Self::Kind, pending: bool);

    /// Sleep until any enabled interrupt fires. Chips without a wait
    /// instruction keep the default busy return.
    fn wait_for_interrupt(&mut self) {}
}
