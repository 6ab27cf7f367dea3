//! Pad and DMA channel ownership ledgers
//!
//! Bare-metal code cannot negotiate peripheral ownership at runtime, so
//! every subsystem that takes exclusive use of a pad or DMA channel records
//! the claim here when it initialises and clears it when it deinitialises.
//! A conflicting claim is a programmer error and panics immediately.
//!
//! Debug builds additionally record the owner's name, so a conflict names
//! both the prior and the attempted owner. Release builds keep only the
//! reservation set.
//!
//! Entries are dense indices supplied by the chip layer's identifier types
//! (`PadId::index`, `DmaChannel::index`); the typed wrappers over these
//! ledgers live next to those traits.

use core::cell::RefCell;

use critical_section::Mutex;

/// Capacity of the process-wide pad ledger.
pub const PAD_CAPACITY: usize = 128;

/// Capacity of the process-wide DMA channel ledger.
pub const DMA_CAPACITY: usize = 32;

struct Entries<const CAP: usize> {
    reserved: [bool; CAP],
    #[cfg(debug_assertions)]
    owners: [&'static str; CAP],
}

/// A fixed-capacity ownership registry.
///
/// The process-wide instances are [`pads`] and [`dma_channels`]; separate
/// instances exist only in tests.
pub struct Ledger<const CAP: usize> {
    entries: Mutex<RefCell<Entries<CAP>>>,
}

impl<const CAP: usize> Ledger<CAP> {
    pub const fn new() -> Ledger<CAP> {
        Ledger {
            entries: Mutex::new(RefCell::new(Entries {
                reserved: [false; CAP],
                #[cfg(debug_assertions)]
                owners: [""; CAP],
            })),
        }
    }

    /// Mark every index in `set` as owned by `owner`, atomically.
    ///
    /// Panics if any index is already reserved; nothing is marked in that
    /// case.
    pub fn reserve(&self, set: &[usize], owner: &'static str) {
        crate::critical::with(|cs| {
            let mut entries = self.entries.borrow_ref_mut(cs);
            for &index in set {
                if entries.reserved[index] {
                    #[cfg(debug_assertions)]
                    panic!(
                        "resource {} already reserved by \"{}\", attempted by \"{}\"",
                        index, entries.owners[index], owner
                    );
                    #[cfg(not(debug_assertions))]
                    panic!("resource {} already reserved, attempted by \"{}\"", index, owner);
                }
            }
            for &index in set {
                entries.reserved[index] = true;
                #[cfg(debug_assertions)]
                {
                    entries.owners[index] = owner;
                }
            }
        })
    }

    /// Clear the reservation of every index in `set`.
    ///
    /// Panics if any index is not reserved, or (in debug builds) is
    /// reserved by a different owner.
    pub fn release(&self, set: &[usize], owner: &'static str) {
        crate::critical::with(|cs| {
            let mut entries = self.entries.borrow_ref_mut(cs);
            for &index in set {
                if !entries.reserved[index] {
                    panic!(
                        "resource {} released by \"{}\" but was never reserved",
                        index, owner
                    );
                }
                #[cfg(debug_assertions)]
                if entries.owners[index] != owner {
                    panic!(
                        "resource {} reserved by \"{}\" but released by \"{}\"",
                        index, entries.owners[index], owner
                    );
                }
            }
            for &index in set {
                entries.reserved[index] = false;
                #[cfg(debug_assertions)]
                {
                    entries.owners[index] = "";
                }
            }
        })
    }

    pub fn is_reserved(&self, index: usize) -> bool {
        crate::critical::with(|cs| self.entries.borrow_ref(cs).reserved[index])
    }

    /// The recorded owner name, or `""` if unowned. Debug builds only.
    #[cfg(debug_assertions)]
    pub fn owner(&self, index: usize) -> &'static str {
        crate::critical::with(|cs| self.entries.borrow_ref(cs).owners[index])
    }
}

static PAD_LEDGER: Ledger<PAD_CAPACITY> = Ledger::new();
static DMA_LEDGER: Ledger<DMA_CAPACITY> = Ledger::new();

/// The process-wide pad ownership ledger, keyed by `PadId::index`.
pub fn pads() -> &'static Ledger<PAD_CAPACITY> {
    &PAD_LEDGER
}

/// The process-wide DMA channel ownership ledger, keyed by
/// `DmaChannel::index`.
pub fn dma_channels() -> &'static Ledger<DMA_CAPACITY> {
    &DMA_LEDGER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_release_round_trip() {
        let ledger = Ledger::<8>::new();

        ledger.reserve(&[1, 3], "Bus status_leds");
        assert!(ledger.is_reserved(1));
        assert!(ledger.is_reserved(3));
        assert!(!ledger.is_reserved(2));
        assert_eq!(ledger.owner(1), "Bus status_leds");

        ledger.release(&[1, 3], "Bus status_leds");
        assert!(!ledger.is_reserved(1));
        assert!(!ledger.is_reserved(3));
        assert_eq!(ledger.owner(1), "");
    }

    #[test]
    #[should_panic(expected = "already reserved")]
    fn test_double_reserve_panics() {
        let ledger = Ledger::<8>::new();
        ledger.reserve(&[2], "JTAG");
        ledger.reserve(&[2], "Bus misc");
    }

    #[test]
    #[should_panic(expected = "already reserved")]
    fn test_partial_overlap_panics() {
        let ledger = Ledger::<8>::new();
        ledger.reserve(&[4], "JTAG");
        ledger.reserve(&[3, 4], "Bus misc");
    }

    #[test]
    #[should_panic(expected = "never reserved")]
    fn test_release_unreserved_panics() {
        let ledger = Ledger::<8>::new();
        ledger.release(&[5], "Bus misc");
    }

    #[test]
    #[should_panic(expected = "released by")]
    fn test_release_by_non_owner_panics() {
        let ledger = Ledger::<8>::new();
        ledger.reserve(&[6], "JTAG");
        ledger.release(&[6], "Bus misc");
    }

    #[test]
    fn test_failed_reserve_marks_nothing() {
        let ledger = Ledger::<8>::new();
        ledger.reserve(&[1], "JTAG");

        // Run the conflicting reserve on the same thread's ledger and
        // confirm the non-conflicting index stayed unmarked.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ledger.reserve(&[0, 1], "Bus misc");
        }));
        assert!(result.is_err());
        assert!(!ledger.is_reserved(0));
        assert!(ledger.is_reserved(1));
        assert_eq!(ledger.owner(1), "JTAG");
    }

    #[test]
    fn test_process_wide_ledgers_are_distinct() {
        pads().reserve(&[120], "test pad");
        dma_channels().reserve(&[20], "test channel");

        assert!(pads().is_reserved(120));
        assert!(!pads().is_reserved(121));
        assert!(dma_channels().is_reserved(20));

        pads().release(&[120], "test pad");
        dma_channels().release(&[20], "test channel");
    }
}
