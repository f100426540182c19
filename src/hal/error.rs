//! Common error type for hardware operations

use core::fmt;

/// A hardware fault reported by a [`Board`](super::Board) or one of its handles.
///
/// Kept small and `Copy` so it can travel through `no_std` error chains.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The pin does not exist on this board or cannot take the requested role.
    Unsupported,
    /// The pin or peripheral is already claimed elsewhere.
    Busy,
    /// A conversion did not complete.
    Conversion,
    /// The requested PWM frequency cannot be generated.
    Frequency,
    /// Any other peripheral fault.
    Fault,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Error::Unsupported => "pin not supported in this role",
            Error::Busy => "peripheral busy",
            Error::Conversion => "conversion failed",
            Error::Frequency => "frequency out of range",
            Error::Fault => "hardware fault",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Unsupported => defmt::write!(f, "Unsupported"),
            Error::Busy => defmt::write!(f, "Busy"),
            Error::Conversion => defmt::write!(f, "Conversion"),
            Error::Frequency => defmt::write!(f, "Frequency"),
            Error::Fault => defmt::write!(f, "Fault"),
        }
    }
}
