//! Monotonic time value types
//!
//! The chip layer maintains two free-running counters: a coarse tick
//! advanced by a periodic interrupt and an optional fine-grained microtick,
//! typically a hardware counter. Both are exposed here as opaque signed
//! values whose ordering is defined by the sign of the wrapping difference,
//! so they stay comparable across counter wrap.
//!
//! Comparisons are only reliable while the two values are less than half
//! the representable range apart. For a 32-bit tick at 1 kHz that is about
//! 35 minutes; callers should not compare ticks separated by more than
//! ~15 minutes.

/// A span of wall-clock time, folded to counter ticks at a given frequency.
///
/// Construct with struct-update syntax so only the fields you need appear
/// at the call site:
///
/// ```
/// use talos_core::time::Duration;
///
/// let d = Duration { millis: 5, ticks: 3, ..Duration::ZERO };
/// assert_eq!(d.to_ticks(1_000), 8);
/// ```
///
/// A field the type does not define is rejected by the compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Duration {
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
    pub micros: u32,
    /// Raw counter ticks, added to the total unscaled.
    pub ticks: u32,
}

impl Duration {
    pub const ZERO: Duration = Duration {
        minutes: 0,
        seconds: 0,
        millis: 0,
        micros: 0,
        ticks: 0,
    };

    /// Fold this duration to a tick count at `hz` ticks per second.
    ///
    /// Sub-second fields are rounded half-up. The result is clamped to at
    /// least one tick: a zero-length wait is meaningless.
    pub const fn to_ticks(self, hz: u64) -> i64 {
        let hz = hz as i64;
        let mut total = self.ticks as i64;
        total += self.minutes as i64 * 60 * hz;
        total += self.seconds as i64 * hz;
        total += (self.millis as i64 * hz + 500) / 1_000;
        total += (self.micros as i64 * hz + 500_000) / 1_000_000;
        if total < 1 {
            1
        } else {
            total
        }
    }
}

/// Coarse monotonic counter value, advanced by the chip's tick interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(i32);

impl Tick {
    pub const fn from_raw(raw: i32) -> Tick {
        Tick(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// `true` iff `self` is later than `other`, tolerating counter wrap.
    pub const fn is_after(self, other: Tick) -> bool {
        self.0.wrapping_sub(other.0) > 0
    }

    /// `true` iff `self` is earlier than `other`, tolerating counter wrap.
    pub const fn is_before(self, other: Tick) -> bool {
        self.0.wrapping_sub(other.0) < 0
    }

    /// The tick `duration` later than `self`, at `tick_hz` ticks per second.
    pub const fn plus(self, duration: Duration, tick_hz: u32) -> Tick {
        Tick(self.0.wrapping_add(duration.to_ticks(tick_hz as u64) as i32))
    }

    /// Offset by a raw tick count.
    pub const fn offset(self, ticks: i32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }
}

/// Fine-grained monotonic counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microtick(i64);

impl Microtick {
    pub const fn from_raw(raw: i64) -> Microtick {
        Microtick(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn is_after(self, other: Microtick) -> bool {
        self.0.wrapping_sub(other.0) > 0
    }

    pub const fn is_before(self, other: Microtick) -> bool {
        self.0.wrapping_sub(other.0) < 0
    }

    /// The microtick `duration` later than `self`, at `microtick_hz` ticks
    /// per second.
    pub const fn plus(self, duration: Duration, microtick_hz: u64) -> Microtick {
        Microtick(self.0.wrapping_add(duration.to_ticks(microtick_hz)))
    }

    /// Offset by a raw microtick count.
    pub const fn offset(self, ticks: i64) -> Microtick {
        Microtick(self.0.wrapping_add(ticks))
    }
}

/// Busy-wait until `now()` reaches `deadline`.
pub fn block_until_tick(mut now: impl FnMut() -> Tick, deadline: Tick) {
    while now().is_before(deadline) {
        core::hint::spin_loop();
    }
}

/// Busy-wait until `now()` reaches `deadline`.
pub fn block_until_microtick(mut now: impl FnMut() -> Microtick, deadline: Microtick) {
    while now().is_before(deadline) {
        core::hint::spin_loop();
    }
}
