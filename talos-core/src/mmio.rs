//! Typed volatile MMIO register cells
//!
//! Peripheral register blocks are described as `#[repr(C)]` structs whose
//! fields are these cell types, so the access class of every register is
//! part of its type:
//!
//! ```
//! use talos_core::mmio::{ReadOnly, ReadWrite, WriteOnly};
//!
//! #[repr(C)]
//! struct UartRegisters {
//!     control: ReadWrite<u32>,
//!     status: ReadOnly<u32>,
//!     data: WriteOnly<u8>,
//! }
//! ```
//!
//! All accesses are volatile. `modify` is a read-modify-write and is not
//! atomic with respect to interrupts; callers that share a register with
//! an ISR wrap it in [`crate::critical::with`].

use core::cell::UnsafeCell;
use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Integer types usable as a register word. Sealed: registers are 8, 16,
/// 32 or 64 bits wide.
pub trait RegisterWidth:
    private::Sealed
    + Copy
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    const ZERO: Self;
}

macro_rules! register_width {
    ($($t:ty),*) => {$(
        impl RegisterWidth for $t {
            const ZERO: Self = 0;
        }
    )*};
}

register_width!(u8, u16, u32, u64);

/// A named bit-field of a register: a positioned mask plus its shift.
#[derive(Debug, Clone, Copy)]
pub struct Field<T: RegisterWidth> {
    mask: T,
    shift: u32,
}

impl<T: RegisterWidth> Field<T> {
    /// `mask` is already positioned within the register word; `shift` is
    /// the offset of its least significant bit.
    pub const fn new(mask: T, shift: u32) -> Field<T> {
        Field { mask, shift }
    }

    pub const fn mask(self) -> T {
        self.mask
    }

    /// A value for this field, ready to combine and apply.
    pub fn val(self, value: T) -> FieldValue<T> {
        FieldValue {
            mask: self.mask,
            value: (value << self.shift) & self.mask,
        }
    }
}

/// One or more field values to be written together by [`ReadWrite::modify`].
///
/// Combine with `+`: `CTRL_EN.val(1) + CTRL_MODE.val(2)`.
#[derive(Debug, Clone, Copy)]
pub struct FieldValue<T: RegisterWidth> {
    mask: T,
    value: T,
}

impl<T: RegisterWidth> FieldValue<T> {
    /// Overwrite the covered fields of `word`, leaving other bits intact.
    pub fn apply(self, word: T) -> T {
        (word & !self.mask) | self.value
    }
}

impl<T: RegisterWidth> core::ops::Add for FieldValue<T> {
    type Output = FieldValue<T>;

    fn add(self, other: FieldValue<T>) -> FieldValue<T> {
        FieldValue {
            mask: self.mask | other.mask,
            value: self.value | other.value,
        }
    }
}

/// Read-write register cell.
#[repr(transparent)]
pub struct ReadWrite<T: RegisterWidth> {
    value: UnsafeCell<T>,
}

/// Read-only register cell.
#[repr(transparent)]
pub struct ReadOnly<T: RegisterWidth> {
    value: UnsafeCell<T>,
}

/// Write-only register cell.
#[repr(transparent)]
pub struct WriteOnly<T: RegisterWidth> {
    value: UnsafeCell<T>,
}

impl<T: RegisterWidth> ReadWrite<T> {
    /// A memory-backed cell. Register blocks aliased onto hardware are
    /// never constructed; this exists for initialised statics and tests.
    pub const fn new(value: T) -> ReadWrite<T> {
        ReadWrite { value: UnsafeCell::new(value) }
    }

    pub fn read(&self) -> T {
        // SAFETY: the cell is either memory-backed or aliased onto a
        // readable register of matching width.
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    pub fn write(&self, value: T) {
        // SAFETY: as in `read`, for a writable register.
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }

    /// Read, overwrite the supplied fields, write back. Not atomic.
    pub fn modify(&self, fields: FieldValue<T>) {
        self.write(fields.apply(self.read()));
    }

    /// Invert the bits covered by `field`. Not atomic.
    pub fn toggle(&self, field: Field<T>) {
        self.write(self.read() ^ field.mask());
    }

    pub fn set_bits(&self, mask: T) {
        self.write(self.read() | mask);
    }

    pub fn clear_bits(&self, mask: T) {
        self.write(self.read() & !mask);
    }

    pub fn is_set(&self, field: Field<T>) -> bool {
        self.read() & field.mask() != T::ZERO
    }
}

impl<T: RegisterWidth> ReadOnly<T> {
    pub const fn new(value: T) -> ReadOnly<T> {
        ReadOnly { value: UnsafeCell::new(value) }
    }

    pub fn read(&self) -> T {
        // SAFETY: as in `ReadWrite::read`.
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    pub fn is_set(&self, field: Field<T>) -> bool {
        self.read() & field.mask() != T::ZERO
    }
}

impl<T: RegisterWidth> WriteOnly<T> {
    pub const fn new(value: T) -> WriteOnly<T> {
        WriteOnly { value: UnsafeCell::new(value) }
    }

    pub fn write(&self, value: T) {
        // SAFETY: as in `ReadWrite::write`.
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }
}
