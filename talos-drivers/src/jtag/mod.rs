//! JTAG bit-banged adapter
//!
//! Drives an IEEE 1149.1 Test Access Port over four GPIO pads (TCK, TMS,
//! TDI, TDO), tracking the target TAP controller's state locally so moves
//! between states cost exactly the TMS sequence the standard graph
//! requires. Multi-TAP scan chains are addressed through [`Jtag::tap`],
//! which keeps every non-selected TAP in its one-bit BYPASS register.
//!
//! The clock is software-timed: each TCK phase busy-waits a compile-time
//! number of microticks derived from the adapter's maximum frequency.

mod state;

pub use state::TapState;

use talos_core::critical;
use talos_core::time::Tick;
use talos_hal::clocks::Clocks;
use talos_hal::gpio::{self, DriveMode, Gpio, SlewRate};

/// The four pads of a JTAG port.
#[derive(Debug, Clone, Copy)]
pub struct JtagPads<P> {
    pub tck: P,
    pub tms: P,
    pub tdi: P,
    pub tdo: P,
}

/// Bit-banged JTAG adapter.
///
/// `MAX_FREQUENCY_HZ` bounds the TCK rate; the realised rate is the
/// nearest whole number of microticks per half period at or below it.
pub struct Jtag<G: Gpio, C: Clocks, const MAX_FREQUENCY_HZ: u32> {
    gpio: G,
    clocks: C,
    pads: JtagPads<G::Pad>,
    chain: &'static [u8],
    state: TapState,
}

impl<G: Gpio, C: Clocks, const MAX_FREQUENCY_HZ: u32> Jtag<G, C, MAX_FREQUENCY_HZ> {
    /// Microticks per TCK half period, rounded up so the realised clock
    /// never exceeds `MAX_FREQUENCY_HZ`.
    pub const CLOCK_HALF_PERIOD: i64 = {
        let divisor = 2 * MAX_FREQUENCY_HZ as u64;
        ((C::MICROTICK_HZ + divisor - 1) / divisor) as i64
    };

    /// Describe an adapter. `chain` lists the instruction-register width
    /// of every TAP on the scan chain, in chain order.
    pub fn new(gpio: G, clocks: C, pads: JtagPads<G::Pad>, chain: &'static [u8]) -> Self {
        debug_assert!(!chain.is_empty());
        Self {
            gpio,
            clocks,
            pads,
            chain,
            state: TapState::Unknown,
        }
    }

    /// Reserve the four pads and configure the port.
    ///
    /// TCK, TMS and TDI become slow push-pull outputs (idle levels: clock
    /// high, TMS high), TDO an input. The tracked state starts out
    /// unknown; the first [`Jtag::change_state`] walks the target into
    /// `Reset` with TMS held high.
    pub fn init(&mut self) {
        critical::with(|_cs| {
            let pads = [self.pads.tck, self.pads.tms, self.pads.tdi, self.pads.tdo];
            gpio::reserve_pads(&pads, "JTAG");
            self.gpio.ensure_ports_enabled(&pads);
            for pad in [self.pads.tck, self.pads.tms, self.pads.tdi] {
                self.gpio.configure_slew_rate(pad, SlewRate::Slow);
                self.gpio.configure_drive_mode(pad, DriveMode::PushPull);
            }
            self.gpio.write_output(self.pads.tck, true);
            self.gpio.write_output(self.pads.tms, true);
            self.gpio.write_output(self.pads.tdi, false);
            for pad in [self.pads.tck, self.pads.tms, self.pads.tdi] {
                self.gpio.configure_as_output(pad);
            }
            self.gpio.configure_as_input(self.pads.tdo);
            self.state = TapState::Unknown;
        });
    }

    /// Return the pads to their reset state and release them.
    pub fn deinit(&mut self) {
        critical::with(|_cs| {
            let pads = [self.pads.tck, self.pads.tms, self.pads.tdi, self.pads.tdo];
            for pad in pads {
                self.gpio.configure_as_unused(pad);
            }
            gpio::release_pads(&pads, "JTAG");
        });
    }

    /// The TAP state the adapter believes the target is in.
    pub fn state(&self) -> TapState {
        self.state
    }

    pub fn chain(&self) -> &'static [u8] {
        self.chain
    }

    pub fn chip(&self) -> &G {
        &self.gpio
    }

    pub fn chip_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    fn wait_half_period(&self) {
        let deadline = self.clocks.current_microtick().offset(Self::CLOCK_HALF_PERIOD);
        self.clocks.block_until_microtick(deadline);
    }

    /// One TCK cycle: drive low, wait, sample TDO, drive high, wait.
    /// Returns the sampled bit.
    fn pulse(&mut self) -> bool {
        self.gpio.write_output(self.pads.tck, false);
        self.wait_half_period();
        let tdo = self.gpio.read_input(self.pads.tdo);
        self.gpio.write_output(self.pads.tck, true);
        self.wait_half_period();
        tdo
    }

    /// Clock TMS decisions until the target sits in `target`.
    ///
    /// Moving out of `DrExit2`/`IrExit2` toward the exit-1 or pause state
    /// of the same column passes back through the shift state and clocks
    /// one extra bit through the selected register; that path is
    /// best-effort.
    pub fn change_state(&mut self, target: TapState) {
        debug_assert!(!target.is_unknown());
        while self.state != target {
            let (tms, next) = self.state.step_toward(target);
            self.gpio.write_output(self.pads.tms, tms);
            self.pulse();
            self.state = next;
        }
    }

    /// Shift `bits` bits of `value` through the register selected by
    /// `shift_state` (LSB first), returning the bits sampled from TDO
    /// (first sample in the LSB).
    ///
    /// `exit_state` must be `shift_state` itself, to keep shifting across
    /// several calls, or its exit-1 state; in the latter case TMS rises
    /// together with the final bit. A zero-width shift is a no-op.
    pub fn shift(&mut self, value: u64, bits: u32, shift_state: TapState, exit_state: TapState) -> u64 {
        debug_assert!(matches!(shift_state, TapState::DrShift | TapState::IrShift));
        debug_assert!(exit_state == shift_state || exit_state == shift_state.exit_one());
        debug_assert!(bits <= 64);
        if bits == 0 {
            return 0;
        }

        self.change_state(shift_state);
        self.gpio.write_output(self.pads.tms, false);

        let mut captured = 0u64;
        let mut remaining = value;
        let exits = exit_state != shift_state;
        for i in 0..bits {
            if exits && i == bits - 1 {
                self.gpio.write_output(self.pads.tms, true);
            }
            self.gpio.write_output(self.pads.tdi, remaining & 1 != 0);
            remaining >>= 1;
            if self.pulse() {
                captured |= 1 << i;
            }
        }
        self.state = if exits { shift_state.exit_one() } else { shift_state };
        captured
    }

    /// Shift through the instruction register, ending in `IrExit1`.
    pub fn shift_ir(&mut self, value: u64, bits: u32) -> u64 {
        self.shift(value, bits, TapState::IrShift, TapState::IrExit1)
    }

    /// Shift through the data register, ending in `DrExit1`.
    pub fn shift_dr(&mut self, value: u64, bits: u32) -> u64 {
        self.shift(value, bits, TapState::DrShift, TapState::DrExit1)
    }

    /// Strobe TCK `clocks` times in the `Idle` state.
    pub fn idle(&mut self, clocks: u32) {
        self.change_state(TapState::Idle);
        self.gpio.write_output(self.pads.tms, false);
        for _ in 0..clocks {
            self.pulse();
        }
    }

    /// Strobe TCK in `Idle` until `deadline` passes, then keep strobing
    /// until at least `min_clocks` pulses have been emitted in total.
    pub fn idle_until(&mut self, deadline: Tick, min_clocks: u32) {
        self.change_state(TapState::Idle);
        self.gpio.write_output(self.pads.tms, false);
        let mut count: u32 = 0;
        while self.clocks.current_tick().is_before(deadline) {
            self.pulse();
            count = count.saturating_add(1);
        }
        while count < min_clocks {
            self.pulse();
            count += 1;
        }
    }

    /// Address one TAP of the scan chain.
    pub fn tap(&mut self, index: usize) -> Tap<'_, G, C, MAX_FREQUENCY_HZ> {
        debug_assert!(index < self.chain.len());
        Tap { jtag: self, index }
    }
}

fn ones(bits: u32) -> u64 {
    if bits >= 64 {
        !0
    } else {
        (1u64 << bits) - 1
    }
}

/// One TAP of a multi-TAP scan chain.
///
/// Every operation keeps the non-selected TAPs transparent: all-ones
/// instructions select their one-bit BYPASS registers, so data shifts
/// need exactly `index` padding bits ahead of the selected TAP and
/// `chain.len() - index - 1` behind it.
pub struct Tap<'a, G: Gpio, C: Clocks, const MAX_FREQUENCY_HZ: u32> {
    jtag: &'a mut Jtag<G, C, MAX_FREQUENCY_HZ>,
    index: usize,
}

impl<G: Gpio, C: Clocks, const MAX_FREQUENCY_HZ: u32> Tap<'_, G, C, MAX_FREQUENCY_HZ> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Shift `instruction` into the selected TAP's instruction register
    /// and BYPASS into every other TAP, then move to `end`.
    pub fn instruction(&mut self, instruction: u64, end: TapState) {
        let chain = self.jtag.chain;
        let last = chain.len() - 1;
        for (i, &width) in chain.iter().enumerate() {
            let bits = width as u32;
            let value = if i == self.index { instruction } else { ones(bits) };
            let exit = if i == last { TapState::IrExit1 } else { TapState::IrShift };
            self.jtag.shift(value, bits, TapState::IrShift, exit);
        }
        self.jtag.change_state(end);
    }

    /// Shift `bits` bits of `value` through the selected TAP's data
    /// register, padding for the other TAPs' BYPASS bits, then move to
    /// `end`. Returns the bits the selected TAP shifted out.
    pub fn data(&mut self, value: u64, bits: u32, end: TapState) -> u64 {
        let before = self.index as u32;
        let after = (self.jtag.chain.len() - self.index - 1) as u32;

        if bits == 0 {
            let padding = before + after;
            if padding > 0 {
                self.jtag.shift(0, padding, TapState::DrShift, TapState::DrExit1);
            }
            self.jtag.change_state(end);
            return 0;
        }

        if before > 0 {
            self.jtag.shift(0, before, TapState::DrShift, TapState::DrShift);
        }
        let exit = if after == 0 { TapState::DrExit1 } else { TapState::DrShift };
        let captured = self.jtag.shift(value, bits, TapState::DrShift, exit);
        if after > 0 {
            self.jtag.shift(0, after, TapState::DrShift, TapState::DrExit1);
        }
        self.jtag.change_state(end);
        captured
    }
}
