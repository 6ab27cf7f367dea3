//! Clock-tree queries and tick sources
//!
//! The chip crate owns the clock tree and the timer interrupt that
//! advances the coarse tick; the framework only reads the counters and the
//! configured frequencies.

use talos_core::time::{self, Duration, Microtick, Tick};

/// Chip clock services.
///
/// `TICK_HZ` and `MICROTICK_HZ` are compile-time constants so duration
/// folding happens in const context. A chip without a fine-grained counter
/// derives the microtick from the tick and sets `MICROTICK_HZ`
/// accordingly.
pub trait Clocks {
    /// Coarse tick frequency in Hz.
    const TICK_HZ: u32;

    /// Fine-grained microtick frequency in Hz.
    const MICROTICK_HZ: u64;

    /// Clock domain identifiers of this chip (core, bus, peripheral, ...).
    type Domain: Copy;

    /// Clock-tree configuration. `Default` is the reset configuration.
    type Config: Default;

    fn current_tick(&self) -> Tick;

    fn current_microtick(&self) -> Microtick;

    /// The configured frequency of `domain` in Hz.
    fn frequency(&self, domain: Self::Domain) -> u64;

    /// The tick `duration` from now.
    fn tick_after(&self, duration: Duration) -> Tick {
        self.current_tick().plus(duration, Self::TICK_HZ)
    }

    /// The microtick `duration` from now.
    fn microtick_after(&self, duration: Duration) -> Microtick {
        self.current_microtick().plus(duration, Self::MICROTICK_HZ)
    }

    /// Busy-wait until `deadline`.
    fn block_until_tick(&self, deadline: Tick) {
        time::block_until_tick(|| self.current_tick(), deadline);
    }

    /// Busy-wait until `deadline`.
    fn block_until_microtick(&self, deadline: Microtick) {
        time::block_until_microtick(|| self.current_microtick(), deadline);
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    struct SimClocks {
        microticks: Cell<i64>,
    }

    impl Clocks for SimClocks {
        const TICK_HZ: u32 = 1_000;
        const MICROTICK_HZ: u64 = 1_000_000;

        type Domain = ();
        type Config = ();

        fn current_tick(&self) -> Tick {
            Tick::from_raw((self.microticks.get() / 1_000) as i32)
        }

        fn current_microtick(&self) -> Microtick {
            // A read of the free-running counter; time advances between
            // reads.
            let now = self.microticks.get();
            self.microticks.set(now + 250);
            Microtick::from_raw(now)
        }

        fn frequency(&self, _domain: ()) -> u64 {
            48_000_000
        }
    }

    #[test]
    fn test_tick_after_folds_at_tick_rate() {
        let clocks = SimClocks { microticks: Cell::new(0) };
        let deadline = clocks.tick_after(Duration { millis: 25, ..Duration::ZERO });
        assert_eq!(deadline.raw(), 25);
    }

    #[test]
    fn test_microtick_after_folds_at_microtick_rate() {
        let clocks = SimClocks { microticks: Cell::new(0) };
        let deadline = clocks.microtick_after(Duration { millis: 25, ..Duration::ZERO });
        assert_eq!(deadline.raw(), 25_000);
    }

    #[test]
    fn test_block_until_microtick_waits_out_the_deadline() {
        let clocks = SimClocks { microticks: Cell::new(0) };
        let deadline = Microtick::from_raw(2_000);
        clocks.block_until_microtick(deadline);
        assert!(!clocks.current_microtick().is_before(deadline));
    }
}
