//! Named devices on top of raw board pins.
//!
//! The [`DeviceManager`] owns every pin handle the user has registered and
//! keeps them in three maps, one per kind of access:
//!
//! ```text
//!   register(name, pin, mode)
//!            │
//!            ├── out / in  ──▶ digital  (set_pin, read_pin)
//!            ├── adc       ──▶ analog   (read_adc)
//!            └── pwm       ──▶ pwm      (set_pwm, set_pwm_freq)
//! ```
//!
//! A name lives in exactly one map, a pin backs at most one device, and
//! reserved pins (the LED, the temperature channel) are never handed out.
//! Nothing is removed individually; [`DeviceControl::cleanup`] releases
//! everything at once.
//!
//! # Example
//!
//! ```rust,ignore
//! use angusto::device::{DeviceControl, DeviceManager, DeviceMode};
//! use angusto::hal::Level;
//!
//! let mut devices = DeviceManager::new(board, angusto::config::PICO);
//! devices.register("heater", 15, DeviceMode::DigitalOutput)?;
//! devices.set_pin("heater", Level::High)?;
//! assert_eq!(devices.read_pin("heater")?, Level::High);
//! ```

#![deny(unsafe_code)]

use core::fmt;

use heapless::{FnvIndexMap, String};

use crate::config::BoardConfig;
use crate::hal::{AdcChannel, Board, DigitalPin, Level, Pull, PwmChannel};

/// Device error types
pub mod error;


pub use error::Error;

/// Longest accepted device name, in bytes.
pub const MAX_NAME_LEN: usize = 16;

/// Capacity of each of the three device maps (must be a power of two).
pub const MAX_DEVICES: usize = 16;

/// Owned device name.
pub type DeviceName = String<MAX_NAME_LEN>;

/// How a pin is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// Push-pull output.
    DigitalOutput,
    /// Input with a pull policy.
    DigitalInput(Pull),
    /// ADC input.
    AnalogInput,
    /// PWM output.
    PwmOutput,
}

impl DeviceMode {
    /// Parse a mode token as typed after `device register`.
    ///
    /// Accepts the short forms `out`, `in`, `adc`, `pwm` and the long forms
    /// `digital-output`, `digital-input`, `analog-input`, `pwm-output`.
    /// `pull` only matters for inputs.
    pub fn parse(mode: &str, pull: Option<&str>) -> Result<Self, Error> {
        let mode = match mode {
            m if m.eq_ignore_ascii_case("out") || m.eq_ignore_ascii_case("digital-output") => {
                DeviceMode::DigitalOutput
            }
            m if m.eq_ignore_ascii_case("in") || m.eq_ignore_ascii_case("digital-input") => {
                DeviceMode::DigitalInput(Pull::from_token(pull))
            }
            m if m.eq_ignore_ascii_case("adc") || m.eq_ignore_ascii_case("analog-input") => {
                DeviceMode::AnalogInput
            }
            m if m.eq_ignore_ascii_case("pwm") || m.eq_ignore_ascii_case("pwm-output") => {
                DeviceMode::PwmOutput
            }
            _ => return Err(Error::UnknownMode),
        };
        Ok(mode)
    }

    /// Which map a device of this mode lives in.
    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceMode::DigitalOutput | DeviceMode::DigitalInput(_) => DeviceKind::Digital,
            DeviceMode::AnalogInput => DeviceKind::Analog,
            DeviceMode::PwmOutput => DeviceKind::Pwm,
        }
    }
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceMode::DigitalOutput => f.write_str("out"),
            DeviceMode::DigitalInput(Pull::None) => f.write_str("in"),
            DeviceMode::DigitalInput(Pull::Up) => f.write_str("in, pull-up"),
            DeviceMode::DigitalInput(Pull::Down) => f.write_str("in, pull-down"),
            DeviceMode::AnalogInput => f.write_str("adc"),
            DeviceMode::PwmOutput => f.write_str("pwm"),
        }
    }
}

/// The three device maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceKind {
    /// Digital inputs and outputs.
    Digital,
    /// ADC inputs.
    Analog,
    /// PWM outputs.
    Pwm,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Digital => f.write_str("Pin"),
            DeviceKind::Analog => f.write_str("ADC"),
            DeviceKind::Pwm => f.write_str("PWM"),
        }
    }
}

/// Read-only view of one registered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo<'a> {
    /// Device name.
    pub name: &'a str,
    /// GPIO number.
    pub pin: u8,
    /// Registered mode.
    pub mode: DeviceMode,
}

/// Operations the shell performs on registered devices.
///
/// Object safe, so command handlers can reach the manager without knowing
/// the concrete board type.
pub trait DeviceControl {
    /// Claim `pin` in `mode` under `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::ReservedPin`] if the pin is reserved, whatever the mode
    /// - [`Error::InvalidPin`] for an ADC request off the board's ADC pins
    /// - [`Error::DuplicateName`] / [`Error::PinInUse`] on conflicts
    /// - [`Error::InvalidName`], [`Error::Full`], [`Error::Hardware`]
    fn register(&mut self, name: &str, pin: u8, mode: DeviceMode) -> Result<(), Error>;

    /// Drive a digital device.
    fn set_pin(&mut self, name: &str, level: Level) -> Result<(), Error>;

    /// Read a digital device.
    fn read_pin(&self, name: &str) -> Result<Level, Error>;

    /// Sample an ADC device, `0..=65535`.
    fn read_adc(&mut self, name: &str) -> Result<u16, Error>;

    /// Set a PWM device's duty cycle, `0..=65535` for 0 to 100 %.
    fn set_pwm(&mut self, name: &str, duty: u16) -> Result<(), Error>;

    /// Set a PWM device's frequency in hertz.
    fn set_pwm_freq(&mut self, name: &str, hz: u32) -> Result<(), Error>;

    /// Which map holds `name`, if any.
    fn kind_of(&self, name: &str) -> Option<DeviceKind>;

    /// Write the human-readable device listing.
    fn list_devices(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Deinitialize every PWM output and forget all devices.
    fn cleanup(&mut self);

    /// Number of registered devices across all maps.
    fn len(&self) -> usize;

    /// Whether no device is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One registered device and its live handle.
#[derive(Debug)]
struct Device<H> {
    pin: u8,
    mode: DeviceMode,
    handle: H,
}

/// Registry of named devices for one board.
pub struct DeviceManager<B: Board> {
    board: B,
    config: BoardConfig,
    digital: FnvIndexMap<DeviceName, Device<B::Digital>, MAX_DEVICES>,
    analog: FnvIndexMap<DeviceName, Device<B::Adc>, MAX_DEVICES>,
    pwm: FnvIndexMap<DeviceName, Device<B::Pwm>, MAX_DEVICES>,
}

impl<B: Board> fmt::Debug for DeviceManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceManager")
            .field("digital", &self.digital.len())
            .field("analog", &self.analog.len())
            .field("pwm", &self.pwm.len())
            .finish()
    }
}

impl<B: Board> DeviceManager<B> {
    /// Create an empty registry for `board`.
    pub fn new(board: B, config: BoardConfig) -> Self {
        Self {
            board,
            config,
            digital: FnvIndexMap::new(),
            analog: FnvIndexMap::new(),
            pwm: FnvIndexMap::new(),
        }
    }

    /// The board the handles were claimed from.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Iterate over every registered device, digital first, then ADC, then PWM.
    pub fn devices(&self) -> impl Iterator<Item = DeviceInfo<'_>> + '_ {
        let digital = self.digital.iter().map(|(name, d)| info(name, d));
        let analog = self.analog.iter().map(|(name, d)| info(name, d));
        let pwm = self.pwm.iter().map(|(name, d)| info(name, d));
        digital.chain(analog).chain(pwm)
    }

    fn owner_of(&self, pin: u8) -> Option<&DeviceName> {
        self.digital
            .iter()
            .find(|(_, d)| d.pin == pin)
            .map(|(name, _)| name)
            .or_else(|| {
                self.analog
                    .iter()
                    .find(|(_, d)| d.pin == pin)
                    .map(|(name, _)| name)
            })
            .or_else(|| {
                self.pwm
                    .iter()
                    .find(|(_, d)| d.pin == pin)
                    .map(|(name, _)| name)
            })
    }

    fn has_room(&self, kind: DeviceKind) -> bool {
        match kind {
            DeviceKind::Digital => self.digital.len() < self.digital.capacity(),
            DeviceKind::Analog => self.analog.len() < self.analog.capacity(),
            DeviceKind::Pwm => self.pwm.len() < self.pwm.capacity(),
        }
    }
}

fn info<'a, H>(name: &'a DeviceName, device: &Device<H>) -> DeviceInfo<'a> {
    DeviceInfo {
        name: name.as_str(),
        pin: device.pin,
        mode: device.mode,
    }
}

/// Exact key for a lookup, `None` if the name cannot be a registered one.
fn key(name: &str) -> Option<DeviceName> {
    if name.is_empty() {
        return None;
    }
    DeviceName::try_from(name).ok()
}

/// Name as shown in a "not found" error, cut to capacity on a char boundary.
fn shown(name: &str) -> DeviceName {
    let mut shown = DeviceName::new();
    for ch in name.chars() {
        if shown.push(ch).is_err() {
            break;
        }
    }
    shown
}

fn not_found(kind: DeviceKind, name: &str) -> Error {
    Error::NotFound {
        kind,
        name: shown(name),
    }
}

impl<B: Board> DeviceControl for DeviceManager<B> {
    fn register(&mut self, name: &str, pin: u8, mode: DeviceMode) -> Result<(), Error> {
        if let Some(reserved) = self.config.reservation(pin) {
            return Err(Error::ReservedPin {
                pin,
                reason: reserved.reason,
            });
        }
        if mode == DeviceMode::AnalogInput && !self.config.is_adc_pin(pin) {
            return Err(Error::InvalidPin { pin, mode });
        }

        let name = key(name).ok_or(Error::InvalidName)?;
        if self.kind_of(&name).is_some() {
            return Err(Error::DuplicateName(name));
        }
        if let Some(owner) = self.owner_of(pin) {
            return Err(Error::PinInUse {
                pin,
                owner: owner.clone(),
            });
        }
        if !self.has_room(mode.kind()) {
            return Err(Error::Full);
        }

        // Capacity is checked above, so the inserts cannot hand a live handle back.
        match mode {
            DeviceMode::DigitalOutput => {
                let handle = self.board.output(pin)?;
                let _ = self.digital.insert(name.clone(), Device { pin, mode, handle });
            }
            DeviceMode::DigitalInput(pull) => {
                let handle = self.board.input(pin, pull)?;
                let _ = self.digital.insert(name.clone(), Device { pin, mode, handle });
            }
            DeviceMode::AnalogInput => {
                let handle = self.board.adc(pin)?;
                let _ = self.analog.insert(name.clone(), Device { pin, mode, handle });
            }
            DeviceMode::PwmOutput => {
                let handle = self.board.pwm(pin, self.config.default_pwm_frequency)?;
                let _ = self.pwm.insert(name.clone(), Device { pin, mode, handle });
            }
        }

        log_info!("registered '{}' on pin {}", name.as_str(), pin);
        Ok(())
    }

    fn set_pin(&mut self, name: &str, level: Level) -> Result<(), Error> {
        let device = key(name)
            .and_then(|k| self.digital.get_mut(&k))
            .ok_or_else(|| not_found(DeviceKind::Digital, name))?;
        device.handle.set_level(level)?;
        Ok(())
    }

    fn read_pin(&self, name: &str) -> Result<Level, Error> {
        let device = key(name)
            .and_then(|k| self.digital.get(&k))
            .ok_or_else(|| not_found(DeviceKind::Digital, name))?;
        Ok(device.handle.level()?)
    }

    fn read_adc(&mut self, name: &str) -> Result<u16, Error> {
        let device = key(name)
            .and_then(|k| self.analog.get_mut(&k))
            .ok_or_else(|| not_found(DeviceKind::Analog, name))?;
        Ok(device.handle.read_u16()?)
    }

    fn set_pwm(&mut self, name: &str, duty: u16) -> Result<(), Error> {
        let device = key(name)
            .and_then(|k| self.pwm.get_mut(&k))
            .ok_or_else(|| not_found(DeviceKind::Pwm, name))?;
        device.handle.set_duty_u16(duty)?;
        Ok(())
    }

    fn set_pwm_freq(&mut self, name: &str, hz: u32) -> Result<(), Error> {
        let device = key(name)
            .and_then(|k| self.pwm.get_mut(&k))
            .ok_or_else(|| not_found(DeviceKind::Pwm, name))?;
        device.handle.set_frequency(hz)?;
        Ok(())
    }

    fn kind_of(&self, name: &str) -> Option<DeviceKind> {
        let name = key(name)?;
        if self.digital.contains_key(&name) {
            Some(DeviceKind::Digital)
        } else if self.analog.contains_key(&name) {
            Some(DeviceKind::Analog)
        } else if self.pwm.contains_key(&name) {
            Some(DeviceKind::Pwm)
        } else {
            None
        }
    }

    fn list_devices(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "\nRegistered Devices:")?;
        if self.is_empty() {
            return writeln!(out, "  (none)");
        }
        if !self.digital.is_empty() {
            writeln!(out, "\nDigital Pins:")?;
            for (name, d) in &self.digital {
                writeln!(out, "  {}: GPIO {} ({})", name, d.pin, d.mode)?;
            }
        }
        if !self.analog.is_empty() {
            writeln!(out, "\nADC Pins:")?;
            for (name, d) in &self.analog {
                writeln!(out, "  {}: ADC {}", name, d.pin)?;
            }
        }
        if !self.pwm.is_empty() {
            writeln!(out, "\nPWM Pins:")?;
            for (name, d) in &self.pwm {
                writeln!(out, "  {}: PWM {}", name, d.pin)?;
            }
        }
        Ok(())
    }

    fn cleanup(&mut self) {
        for (_, device) in self.pwm.iter_mut() {
            device.handle.deinit();
        }
        let released = self.len();
        self.digital.clear();
        self.analog.clear();
        self.pwm.clear();
        if released > 0 {
            log_info!("released {} devices", released);
        }
    }

    fn len(&self) -> usize {
        self.digital.len() + self.analog.len() + self.pwm.len()
    }
}
