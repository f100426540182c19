//! Hardware abstraction for the board the shell runs on.
//!
//! The shell never touches registers. A firmware image (or the host
//! simulator) implements these traits once and hands them to the shell:
//!
//! - [`Board`] claims pins by number and returns owned handles
//! - [`DigitalPin`], [`AdcChannel`], [`PwmChannel`] drive those handles
//! - [`Indicator`] is the activity LED, [`Delay`] a blocking millisecond delay
//! - [`Platform`] covers the chip-level services (temperature, memory, reset)
//!
//! Pin numbers are plain `u8` GPIO numbers as printed on the board.

pub mod error;

pub use error::Error;

/// Logic level of a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0.
    Low,
    /// Logic 1.
    High,
}

impl Level {
    /// Numeric form used on the command line (0 or 1).
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Pull resistor policy for a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input.
    #[default]
    None,
    /// Internal pull-up enabled.
    Up,
    /// Internal pull-down enabled.
    Down,
}

impl Pull {
    /// Resolve a pull policy from an optional command-line token.
    ///
    /// `up` and `down` (any case) select the resistor; anything else,
    /// including no token at all, leaves the input floating.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("up") => Pull::Up,
            Some(t) if t.eq_ignore_ascii_case("down") => Pull::Down,
            _ => Pull::None,
        }
    }
}

/// A claimed GPIO line, configured as output or input.
pub trait DigitalPin {
    /// Drive the line. On an input this only latches the output register.
    fn set_level(&mut self, level: Level) -> Result<(), Error>;

    /// Current level of the line.
    fn level(&self) -> Result<Level, Error>;
}

/// A claimed ADC input.
pub trait AdcChannel {
    /// One raw conversion, scaled to the full `u16` range.
    fn read_u16(&mut self) -> Result<u16, Error>;
}

/// A claimed PWM output.
pub trait PwmChannel {
    /// Set the duty cycle, `0` is always low and `65535` always high.
    fn set_duty_u16(&mut self, duty: u16) -> Result<(), Error>;

    /// Set the output frequency in hertz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), Error>;

    /// Stop the output and release the slice.
    fn deinit(&mut self);
}

/// Pin factory for one board.
///
/// Every successful call claims the hardware until the returned handle is
/// dropped (or, for PWM, deinitialized).
pub trait Board {
    /// Handle type for digital inputs and outputs.
    type Digital: DigitalPin;
    /// Handle type for ADC inputs.
    type Adc: AdcChannel;
    /// Handle type for PWM outputs.
    type Pwm: PwmChannel;

    /// Claim `pin` as a push-pull output.
    fn output(&mut self, pin: u8) -> Result<Self::Digital, Error>;

    /// Claim `pin` as an input with the given pull policy.
    fn input(&mut self, pin: u8, pull: Pull) -> Result<Self::Digital, Error>;

    /// Claim `pin` as an ADC input.
    fn adc(&mut self, pin: u8) -> Result<Self::Adc, Error>;

    /// Claim `pin` as a PWM output running at `hz`.
    fn pwm(&mut self, pin: u8, hz: u32) -> Result<Self::Pwm, Error>;
}

/// The activity LED.
pub trait Indicator {
    /// Assert (`true`) or deassert the indicator.
    fn set(&mut self, on: bool);
}

/// Blocking delay.
pub trait Delay {
    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Heap statistics reported by `memory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryStats {
    /// Bytes available for allocation.
    pub free: u32,
    /// Bytes currently allocated.
    pub allocated: u32,
}

impl MemoryStats {
    /// Free plus allocated.
    pub fn total(&self) -> u32 {
        self.free.saturating_add(self.allocated)
    }

    /// Allocated share of the total, in percent.
    pub fn used_percent(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.allocated as f32 * 100.0 / total as f32,
        }
    }
}

/// Chip-level services that are not pins.
pub trait Platform {
    /// Raw reading of the internal temperature sensor channel.
    fn core_temperature_raw(&mut self) -> Result<u16, Error>;

    /// Collect garbage (if the platform has any) and report heap usage.
    fn memory_stats(&mut self) -> MemoryStats;

    /// Reset the chip. Never returns.
    fn reset(&mut self) -> !;
}
