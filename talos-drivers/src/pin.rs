//! Single-pad projections
//!
//! [`Pin`] wraps one pad with the same reserve/configure/release lifecycle
//! as a bus, and speaks the `embedded-hal` digital traits so drivers from
//! the wider ecosystem can run on a talos pad unchanged.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
use talos_core::critical;
use talos_hal::gpio::{self, DriveMode, Gpio, PortWord, SlewRate, Termination};

/// One owned pad.
pub struct Pin<G: Gpio> {
    gpio: G,
    pad: G::Pad,
    name: &'static str,
}

impl<G: Gpio> Pin<G> {
    pub fn new(gpio: G, pad: G::Pad, name: &'static str) -> Self {
        Self { gpio, pad, name }
    }

    /// Reserve the pad and configure it as an output.
    pub fn init_as_output(&mut self, slew: SlewRate, drive: DriveMode) {
        critical::with(|_cs| {
            gpio::reserve_pads(&[self.pad], self.name);
            self.gpio.ensure_ports_enabled(&[self.pad]);
            self.gpio.configure_slew_rate(self.pad, slew);
            self.gpio.configure_drive_mode(self.pad, drive);
            self.gpio.configure_as_output(self.pad);
        });
    }

    /// Reserve the pad and configure it as an input.
    pub fn init_as_input(&mut self, termination: Termination) {
        critical::with(|_cs| {
            gpio::reserve_pads(&[self.pad], self.name);
            self.gpio.ensure_ports_enabled(&[self.pad]);
            self.gpio.configure_termination(self.pad, termination);
            self.gpio.configure_as_input(self.pad);
        });
    }

    /// Return the pad to its reset state and release it.
    pub fn deinit(&mut self) {
        critical::with(|_cs| {
            self.gpio.configure_termination(self.pad, Termination::Float);
            self.gpio.configure_as_unused(self.pad);
            gpio::release_pads(&[self.pad], self.name);
        });
    }

    pub fn pad(&self) -> G::Pad {
        self.pad
    }

    pub fn chip(&self) -> &G {
        &self.gpio
    }

    pub fn chip_mut(&mut self) -> &mut G {
        &mut self.gpio
    }
}

impl<G: Gpio> ErrorType for Pin<G> {
    type Error = Infallible;
}

impl<G: Gpio> OutputPin for Pin<G> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.gpio.write_output(self.pad, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.gpio.write_output(self.pad, true);
        Ok(())
    }
}

impl<G: Gpio> StatefulOutputPin for Pin<G> {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        let port = self.gpio.port(self.pad);
        let offset = self.gpio.offset(self.pad);
        Ok(self.gpio.read_output_port(port).is_set(offset))
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.is_set_high()?)
    }
}

impl<G: Gpio> InputPin for Pin<G> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.gpio.read_input(self.pad))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.gpio.read_input(self.pad))
    }
}

#[cfg(test)]
mod tests {
    use talos_core::ledger;
    use talos_hal::gpio::PadId;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Led;

    impl PadId for Led {
        fn name(&self) -> &'static str {
            "C2"
        }

        fn index(&self) -> usize {
            8
        }
    }

    #[derive(Default)]
    struct SimGpio {
        output: u8,
        input: u8,
        is_output: bool,
    }

    impl Gpio for SimGpio {
        type Pad = Led;
        type Port = ();
        type PortWord = u8;

        fn ensure_ports_enabled(&mut self, _pads: &[Led]) {}

        fn configure_as_input(&mut self, _pad: Led) {
            self.is_output = false;
        }

        fn configure_as_output(&mut self, _pad: Led) {
            self.is_output = true;
        }

        fn configure_as_unused(&mut self, _pad: Led) {
            self.is_output = false;
        }

        fn configure_slew_rate(&mut self, _pad: Led, _slew: SlewRate) {}
        fn configure_drive_mode(&mut self, _pad: Led, _drive: DriveMode) {}
        fn configure_termination(&mut self, _pad: Led, _termination: Termination) {}

        fn read_input(&self, _pad: Led) -> bool {
            self.input & 0x04 != 0
        }

        fn write_output(&mut self, _pad: Led, high: bool) {
            if high {
                self.output |= 0x04;
            } else {
                self.output &= !0x04;
            }
        }

        fn is_output(&self, _pad: Led) -> bool {
            self.is_output
        }

        fn port(&self, _pad: Led) {}

        fn offset(&self, _pad: Led) -> u8 {
            2
        }

        fn read_input_port(&self, _port: ()) -> u8 {
            self.input
        }

        fn read_output_port(&self, _port: ()) -> u8 {
            self.output
        }

        fn modify_output_port(&mut self, _port: (), clear: u8, set: u8) {
            self.output = (self.output & !clear) | set;
        }
    }

    #[test]
    fn test_pin_lifecycle_and_hal_traits() {
        let mut pin = Pin::new(SimGpio::default(), Led, "status led");

        pin.init_as_output(SlewRate::Slow, DriveMode::PushPull);
        assert!(ledger::pads().is_reserved(Led.index()));

        pin.set_high().unwrap();
        assert!(pin.is_set_high().unwrap());
        pin.set_low().unwrap();
        assert!(pin.is_set_low().unwrap());

        pin.chip_mut().input = 0x04;
        assert!(pin.is_high().unwrap());

        pin.deinit();
        assert!(!ledger::pads().is_reserved(Led.index()));
    }
}
