//! GPIO pad and port primitives
//!
//! A *pad* is one physical pin of the package; a *port* is the register
//! word a group of pads is accessed through. The chip crate implements
//! [`Gpio`] over its port registers and supplies a [`PadId`] enum naming
//! every pad of the package.

use talos_core::ledger;

/// Identity of a single physical I/O pin, supplied by the chip crate.
pub trait PadId: Copy + Eq {
    /// Stable human-readable pad name, e.g. `"PA0"`.
    fn name(&self) -> &'static str;

    /// Dense index keying the pad ledger. Unique per pad and less than
    /// [`ledger::PAD_CAPACITY`].
    fn index(&self) -> usize;
}

/// Whether `pad` appears in a set given by pad *names*.
///
/// Comparison is by name rather than enum identity so chip-family generic
/// code can probe sets that mention pads absent from the current package.
pub fn is_in_set<P: PadId>(pad: P, names: &[&str]) -> bool {
    names.iter().any(|name| *name == pad.name())
}

/// Output edge-rate setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlewRate {
    Slow,
    Fast,
}

/// Output driver topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    PushPull,
    OpenDrain,
}

/// Input termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Termination {
    Float,
    PullUp,
    PullDown,
}

/// Integer types usable as a port register word.
pub trait PortWord:
    Copy
    + Eq
    + core::ops::BitAnd<Output = Self>
    + core::ops::BitOr<Output = Self>
    + core::ops::Not<Output = Self>
{
    const ZERO: Self;

    /// The word with only bit `offset` set.
    fn bit(offset: u8) -> Self;

    fn is_set(self, offset: u8) -> bool {
        self & Self::bit(offset) != Self::ZERO
    }
}

macro_rules! port_word {
    ($($t:ty),*) => {$(
        impl PortWord for $t {
            const ZERO: Self = 0;

            fn bit(offset: u8) -> Self {
                (1 as $t) << offset
            }
        }
    )*};
}

port_word!(u8, u16, u32);

/// Port-level GPIO access, implemented by the chip crate.
///
/// Pad-granular configuration calls exist alongside whole-port data access
/// so composed peripherals can configure scattered pads individually but
/// still move data one register word at a time.
pub trait Gpio {
    type Pad: PadId;
    type Port: Copy + Eq;
    type PortWord: PortWord;

    /// Enable clocks/power for every port covering `pads`. Idempotent.
    fn ensure_ports_enabled(&mut self, pads: &[Self::Pad]);

    fn configure_as_input(&mut self, pad: Self::Pad);
    fn configure_as_output(&mut self, pad: Self::Pad);

    /// Return the pad to its reset (unused, high-impedance) state.
    fn configure_as_unused(&mut self, pad: Self::Pad);

    fn configure_slew_rate(&mut self, pad: Self::Pad, slew: SlewRate);
    fn configure_drive_mode(&mut self, pad: Self::Pad, drive: DriveMode);
    fn configure_termination(&mut self, pad: Self::Pad, termination: Termination);

    fn read_input(&self, pad: Self::Pad) -> bool;
    fn write_output(&mut self, pad: Self::Pad, high: bool);
    fn is_output(&self, pad: Self::Pad) -> bool;

    /// The port containing `pad` and the bit position of `pad` within it.
    fn port(&self, pad: Self::Pad) -> Self::Port;
    fn offset(&self, pad: Self::Pad) -> u8;

    fn read_input_port(&self, port: Self::Port) -> Self::PortWord;

    /// Read back the last value written to the port's output register.
    fn read_output_port(&self, port: Self::Port) -> Self::PortWord;

    /// Clear then set bits of the port's output register in one access.
    fn modify_output_port(
        &mut self,
        port: Self::Port,
        clear: Self::PortWord,
        set: Self::PortWord,
    );
}

/// Reserve `pads` in the process-wide pad ledger under `owner`.
///
/// Panics if any pad is already reserved.
pub fn reserve_pads<P: PadId, const N: usize>(pads: &[P; N], owner: &'static str) {
    let mut indices = [0usize; N];
    for (slot, pad) in indices.iter_mut().zip(pads.iter()) {
        *slot = pad.index();
    }
    ledger::pads().reserve(&indices, owner);
}

/// Release `pads` previously reserved under `owner`.
pub fn release_pads<P: PadId, const N: usize>(pads: &[P; N], owner: &'static str) {
    let mut indices = [0usize; N];
    for (slot, pad) in indices.iter_mut().zip(pads.iter()) {
        *slot = pad.index();
    }
    ledger::pads().release(&indices, owner);
}

pub fn pad_is_reserved<P: PadId>(pad: P) -> bool {
    ledger::pads().is_reserved(pad.index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Pad {
        A0,
        A1,
        B7,
    }

    impl PadId for Pad {
        fn name(&self) -> &'static str {
            match self {
                Pad::A0 => "A0",
                Pad::A1 => "A1",
                Pad::B7 => "B7",
            }
        }

        fn index(&self) -> usize {
            match self {
                Pad::A0 => 0,
                Pad::A1 => 1,
                Pad::B7 => 15,
            }
        }
    }

    #[test]
    fn test_is_in_set_matches_by_name() {
        // The set may name pads this package does not have.
        assert!(is_in_set(Pad::A0, &["A0", "C4"]));
        assert!(!is_in_set(Pad::A1, &["A0", "C4"]));
        assert!(!is_in_set(Pad::B7, &[]));
    }

    #[test]
    fn test_port_word_bits() {
        assert_eq!(u8::bit(3), 0b0000_1000);
        assert!(0b0000_1000u8.is_set(3));
        assert!(!0b0000_1000u8.is_set(2));
        assert_eq!(u32::bit(31), 0x8000_0000);
    }

    #[test]
    fn test_pad_reservation_round_trip() {
        reserve_pads(&[Pad::A0, Pad::B7], "Bus keypad");
        assert!(pad_is_reserved(Pad::A0));
        assert!(pad_is_reserved(Pad::B7));
        assert!(!pad_is_reserved(Pad::A1));

        release_pads(&[Pad::A0, Pad::B7], "Bus keypad");
        assert!(!pad_is_reserved(Pad::A0));
        assert!(!pad_is_reserved(Pad::B7));
    }
}
