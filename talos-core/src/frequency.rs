//! Human-readable frequency rendering

use core::fmt;

/// A frequency in hertz, displayed scaled to MHz, kHz or Hz.
///
/// MHz values carry up to six fractional digits and kHz values up to
/// three; trailing zeros are trimmed and an empty fraction drops the
/// decimal point entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u64);

impl fmt::Display for Hertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000 {
            write_scaled(f, hz, 1_000_000, 6, "MHz")
        } else if hz >= 1_000 {
            write_scaled(f, hz, 1_000, 3, "kHz")
        } else {
            write!(f, "{} Hz", hz)
        }
    }
}

fn write_scaled(
    f: &mut fmt::Formatter<'_>,
    hz: u64,
    scale: u64,
    max_digits: usize,
    unit: &str,
) -> fmt::Result {
    let whole = hz / scale;
    let mut frac = hz % scale;
    if frac == 0 {
        return write!(f, "{} {}", whole, unit);
    }
    let mut digits = max_digits;
    while frac % 10 == 0 {
        frac /= 10;
        digits -= 1;
    }
    write!(f, "{}.{:0width$} {}", whole, frac, unit, width = digits)
}

#[cfg(test)]
mod tests {
    use core::fmt::Write;

    use super::*;

    fn render(hz: u64) -> heapless::String<32> {
        let mut out = heapless::String::new();
        write!(out, "{}", Hertz(hz)).unwrap();
        out
    }

    #[test]
    fn test_whole_megahertz() {
        assert_eq!(render(12_000_000).as_str(), "12 MHz");
    }

    #[test]
    fn test_fractional_megahertz_trims_zeros() {
        assert_eq!(render(12_345_000).as_str(), "12.345 MHz");
        assert_eq!(render(1_000_500).as_str(), "1.0005 MHz");
        assert_eq!(render(8_000_001).as_str(), "8.000001 MHz");
    }

    #[test]
    fn test_kilohertz() {
        assert_eq!(render(1_234).as_str(), "1.234 kHz");
        assert_eq!(render(32_000).as_str(), "32 kHz");
        assert_eq!(render(1_500).as_str(), "1.5 kHz");
    }

    #[test]
    fn test_plain_hertz() {
        assert_eq!(render(999).as_str(), "999 Hz");
        assert_eq!(render(1).as_str(), "1 Hz");
        assert_eq!(render(0).as_str(), "0 Hz");
    }
}
