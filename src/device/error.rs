//! Error types for device registration and access

use core::fmt;

use super::{DeviceKind, DeviceMode, DeviceName};
use crate::hal;

/// An error raised by the [`DeviceManager`](super::DeviceManager).
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// The pin is kept by the shell itself.
    ReservedPin {
        /// Requested GPIO.
        pin: u8,
        /// Why it is reserved.
        reason: &'static str,
    },
    /// The pin cannot serve the requested mode (e.g. ADC on a non-ADC pin).
    InvalidPin {
        /// Requested GPIO.
        pin: u8,
        /// Requested mode.
        mode: DeviceMode,
    },
    /// Another device already owns the pin.
    PinInUse {
        /// Requested GPIO.
        pin: u8,
        /// Name of the device holding it.
        owner: DeviceName,
    },
    /// The name is already registered, in any mode.
    DuplicateName(DeviceName),
    /// No device of the required kind carries this name.
    NotFound {
        /// Map that was searched.
        kind: DeviceKind,
        /// Name that was looked up (truncated to the name capacity).
        name: DeviceName,
    },
    /// The name is empty or longer than [`MAX_NAME_LEN`](super::MAX_NAME_LEN).
    InvalidName,
    /// The mode token is not one of `out`, `in`, `adc`, `pwm`.
    UnknownMode,
    /// The map for this device kind is full.
    Full,
    /// The board refused or failed the operation.
    Hardware(hal::Error),
}

impl Error {
    /// Whether the failure came from the hardware rather than from the request.
    pub fn is_hardware(&self) -> bool {
        matches!(self, Error::Hardware(_))
    }
}

impl From<hal::Error> for Error {
    fn from(err: hal::Error) -> Self {
        Error::Hardware(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReservedPin { pin, reason } => {
                write!(f, "Pin {} is reserved for {}", pin, reason)
            }
            Error::InvalidPin {
                pin,
                mode: DeviceMode::AnalogInput,
            } => write!(f, "Pin {} is not an ADC pin", pin),
            Error::InvalidPin { pin, mode } => {
                write!(f, "Pin {} cannot be used as {}", pin, mode)
            }
            Error::PinInUse { pin, owner } => {
                write!(f, "Pin {} is already used by '{}'", pin, owner)
            }
            Error::DuplicateName(name) => write!(f, "Device '{}' already exists", name),
            Error::NotFound { kind, name } => write!(f, "{} '{}' not found", kind, name),
            Error::InvalidName => f.write_str("Device name must be 1 to 16 characters"),
            Error::UnknownMode => f.write_str("Unknown mode (expected in, out, adc or pwm)"),
            Error::Full => f.write_str("No room for more devices of this kind"),
            Error::Hardware(err) => write!(f, "Hardware error: {}", err),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::ReservedPin { pin, .. } => defmt::write!(f, "ReservedPin({})", pin),
            Error::InvalidPin { pin, .. } => defmt::write!(f, "InvalidPin({})", pin),
            Error::PinInUse { pin, .. } => defmt::write!(f, "PinInUse({})", pin),
            Error::DuplicateName(name) => defmt::write!(f, "DuplicateName({})", name.as_str()),
            Error::NotFound { name, .. } => defmt::write!(f, "NotFound({})", name.as_str()),
            Error::InvalidName => defmt::write!(f, "InvalidName"),
            Error::UnknownMode => defmt::write!(f, "UnknownMode"),
            Error::Full => defmt::write!(f, "Full"),
            Error::Hardware(err) => defmt::write!(f, "Hardware({})", err),
        }
    }
}
