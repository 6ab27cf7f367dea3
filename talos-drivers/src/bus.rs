//! Multi-pin GPIO buses
//!
//! A bus is a fixed-order tuple of pads exposed as one logical state word:
//! bit *i* of the word is pad *i* in declaration order, no matter which
//! physical port each pad lives on. Port groupings are computed once at
//! construction, so runtime reads and writes touch each covered port
//! register exactly once.

use core::marker::PhantomData;

use heapless::Vec;
use talos_core::critical;
use talos_hal::gpio::{self, DriveMode, Gpio, PortWord, SlewRate, Termination};

mod private {
    pub trait Sealed {}
}

/// Data direction of a bus, fixed at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    Input,
    Output,
    Bidirectional,
}

/// Type-level bus mode marker.
pub trait Mode: private::Sealed {
    const MODE: BusMode;
}

/// Read-only bus.
pub struct Input;

/// Write-only bus (with output read-back).
pub struct Output;

/// Bus whose direction is switched at runtime; starts as input.
pub struct Bidirectional;

impl private::Sealed for Input {}
impl private::Sealed for Output {}
impl private::Sealed for Bidirectional {}

impl Mode for Input {
    const MODE: BusMode = BusMode::Input;
}

impl Mode for Output {
    const MODE: BusMode = BusMode::Output;
}

impl Mode for Bidirectional {
    const MODE: BusMode = BusMode::Bidirectional;
}

/// Modes that can sample the pads.
pub trait InputMode: Mode {}
impl InputMode for Input {}
impl InputMode for Bidirectional {}

/// Modes that can drive the pads.
pub trait OutputMode: Mode {}
impl OutputMode for Output {}
impl OutputMode for Bidirectional {}

/// Runtime direction of a [`Bidirectional`] bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// Electrical configuration applied to every pad of the bus.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub slew: SlewRate,
    pub drive: DriveMode,
    pub termination: Termination,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slew: SlewRate::Slow,
            drive: DriveMode::PushPull,
            termination: Termination::Float,
        }
    }
}

/// A logical bus over up to 32 scattered pads.
///
/// `N` is the pad count and the width of the state word. The mode
/// parameter selects which operations exist: an [`Input`] bus has no
/// `modify`, an [`Output`] bus no `read`, and only a [`Bidirectional`]
/// bus can switch direction.
pub struct Bus<G: Gpio, M, const N: usize> {
    gpio: G,
    name: &'static str,
    config: Config,
    pads: [G::Pad; N],
    ports: Vec<G::Port, N>,
    port_index: [usize; N],
    offsets: [u8; N],
    _mode: PhantomData<M>,
}

impl<G: Gpio, M: Mode, const N: usize> Bus<G, M, N> {
    // Evaluated at monomorphisation; rejects buses wider than the state
    // word.
    const WIDTH_CHECK: () = assert!(N >= 1 && N <= 32, "a bus holds 1..=32 pads");

    /// Logical bits that exist on this bus.
    pub const MASK: u32 = (((1u64) << N) - 1) as u32;

    /// Describe a bus. `name` becomes the ledger owner descriptor once
    /// [`Bus::init`] reserves the pads.
    pub fn new(gpio: G, name: &'static str, pads: [G::Pad; N], config: Config) -> Self {
        let _: () = Self::WIDTH_CHECK;

        let mut ports: Vec<G::Port, N> = Vec::new();
        let mut port_index = [0usize; N];
        let mut offsets = [0u8; N];
        for i in 0..N {
            let port = gpio.port(pads[i]);
            port_index[i] = match ports.iter().position(|known| *known == port) {
                Some(position) => position,
                None => {
                    // Cannot overflow: at most one distinct port per pad.
                    ports.push(port).ok();
                    ports.len() - 1
                }
            };
            offsets[i] = gpio.offset(pads[i]);
        }

        Self {
            gpio,
            name,
            config,
            pads,
            ports,
            port_index,
            offsets,
            _mode: PhantomData,
        }
    }

    /// Reserve the pads and configure them for this bus.
    ///
    /// Runs inside a critical section so an interrupt never observes a
    /// half-configured bus. Panics if any pad is already reserved.
    pub fn init(&mut self) {
        critical::with(|_cs| {
            gpio::reserve_pads(&self.pads, self.name);
            self.gpio.ensure_ports_enabled(&self.pads);
            for i in 0..N {
                self.gpio.configure_termination(self.pads[i], self.config.termination);
            }
            match M::MODE {
                BusMode::Input => {
                    for i in 0..N {
                        self.gpio.configure_as_input(self.pads[i]);
                    }
                }
                BusMode::Output => {
                    for i in 0..N {
                        self.gpio.configure_slew_rate(self.pads[i], self.config.slew);
                        self.gpio.configure_drive_mode(self.pads[i], self.config.drive);
                        self.gpio.configure_as_output(self.pads[i]);
                    }
                }
                BusMode::Bidirectional => {
                    // Output settings are applied up front so direction
                    // flips touch only the direction registers.
                    for i in 0..N {
                        self.gpio.configure_slew_rate(self.pads[i], self.config.slew);
                        self.gpio.configure_drive_mode(self.pads[i], self.config.drive);
                        self.gpio.configure_as_input(self.pads[i]);
                    }
                }
            }
        });
    }

    /// Return the pads to their reset state and release them.
    pub fn deinit(&mut self) {
        critical::with(|_cs| {
            for i in 0..N {
                self.gpio.configure_termination(self.pads[i], Termination::Float);
                self.gpio.configure_as_unused(self.pads[i]);
            }
            gpio::release_pads(&self.pads, self.name);
        });
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn chip(&self) -> &G {
        &self.gpio
    }

    pub fn chip_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Project port words onto the logical state word.
    fn gather(&self, words: &[G::PortWord]) -> u32 {
        let mut state = 0u32;
        for i in 0..N {
            if words[self.port_index[i]].is_set(self.offsets[i]) {
                state |= 1 << i;
            }
        }
        state
    }

    /// Push logical set/clear masks out to the covered ports, one
    /// modify per port.
    fn scatter(&mut self, to_set: u32, to_clear: u32) {
        for port in 0..self.ports.len() {
            let mut set = G::PortWord::ZERO;
            let mut clear = G::PortWord::ZERO;
            for i in 0..N {
                if self.port_index[i] != port {
                    continue;
                }
                let bit = G::PortWord::bit(self.offsets[i]);
                if to_set & (1 << i) != 0 {
                    set = set | bit;
                }
                if to_clear & (1 << i) != 0 {
                    clear = clear | bit;
                }
            }
            if set != G::PortWord::ZERO || clear != G::PortWord::ZERO {
                self.gpio.modify_output_port(self.ports[port], clear, set);
            }
        }
    }
}

impl<G: Gpio, M: InputMode, const N: usize> Bus<G, M, N> {
    /// Sample the pads. Each covered port's input register is read once.
    #[inline]
    pub fn read(&self) -> u32 {
        let mut words: Vec<G::PortWord, N> = Vec::new();
        for &port in &self.ports {
            words.push(self.gpio.read_input_port(port)).ok();
        }
        self.gather(&words)
    }
}

impl<G: Gpio, M: OutputMode, const N: usize> Bus<G, M, N> {
    /// Read back the last driven state word.
    #[inline]
    pub fn get(&self) -> u32 {
        let mut words: Vec<G::PortWord, N> = Vec::new();
        for &port in &self.ports {
            words.push(self.gpio.read_output_port(port)).ok();
        }
        self.gather(&words)
    }

    /// Drive the whole state word.
    #[inline]
    pub fn modify(&mut self, state: u32) {
        self.scatter(state & Self::MASK, !state & Self::MASK);
    }

    /// Drive high every pad whose bit is set in `state`; leave the rest.
    #[inline]
    pub fn set_bits(&mut self, state: u32) {
        self.scatter(state & Self::MASK, 0);
    }

    /// Drive low every pad whose bit is set in `state`; leave the rest.
    #[inline]
    pub fn clear_bits(&mut self, state: u32) {
        self.scatter(0, state & Self::MASK);
    }

    /// [`Bus::modify`], forced inline for latency-critical call sites.
    #[inline(always)]
    pub fn modify_inline(&mut self, state: u32) {
        self.scatter(state & Self::MASK, !state & Self::MASK);
    }

    /// [`Bus::set_bits`], forced inline for latency-critical call sites.
    #[inline(always)]
    pub fn set_bits_inline(&mut self, state: u32) {
        self.scatter(state & Self::MASK, 0);
    }

    /// [`Bus::clear_bits`], forced inline for latency-critical call sites.
    #[inline(always)]
    pub fn clear_bits_inline(&mut self, state: u32) {
        self.scatter(0, state & Self::MASK);
    }
}

impl<G: Gpio, const N: usize> Bus<G, Bidirectional, N> {
    /// Reconfigure every pad of the bus at once.
    pub fn set_direction(&mut self, direction: Direction) {
        for i in 0..N {
            match direction {
                Direction::Input => self.gpio.configure_as_input(self.pads[i]),
                Direction::Output => self.gpio.configure_as_output(self.pads[i]),
            }
        }
    }

    /// The current direction. Pad 0 is authoritative; the pads always
    /// move together.
    pub fn direction(&self) -> Direction {
        if self.gpio.is_output(self.pads[0]) {
            Direction::Output
        } else {
            Direction::Input
        }
    }
}
