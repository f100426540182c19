//! Host simulator for running the shell on a development machine.
//!
//! Pins are kept in memory, the filesystem is a host directory, the console
//! is stdin/stdout and the LED is an atomic flag that the idle thread can
//! share with the shell. Enabled by the `std` feature; used by the
//! `angusto-sim` binary.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Read, Write as _};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use core::fmt;

use crate::hal::{
    AdcChannel, Board, Delay, DigitalPin, Error, Indicator, Level, MemoryStats, Platform, Pull,
    PwmChannel,
};
use crate::system::Console;

mod fs;

pub use fs::HostFs;

type Levels = Rc<RefCell<BTreeMap<u8, Level>>>;

/// In-memory GPIO bank.
///
/// Outputs and inputs on the same pin number share a level, so a test
/// script can loop an output back into an input.
#[derive(Debug, Default, Clone)]
pub struct SimBoard {
    levels: Levels,
}

impl SimBoard {
    /// Current level of `pin`, if anything drove it.
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.levels.borrow().get(&pin).copied()
    }
}

/// Simulated digital pin.
#[derive(Debug)]
pub struct SimPin {
    pin: u8,
    pull: Pull,
    levels: Levels,
}

impl DigitalPin for SimPin {
    fn set_level(&mut self, level: Level) -> Result<(), Error> {
        self.levels.borrow_mut().insert(self.pin, level);
        Ok(())
    }

    fn level(&self) -> Result<Level, Error> {
        let idle = Level::from(self.pull == Pull::Up);
        Ok(self.levels.borrow().get(&self.pin).copied().unwrap_or(idle))
    }
}

/// Simulated ADC input: a slow triangle wave around mid-scale.
#[derive(Debug)]
pub struct SimAdc {
    started: Instant,
    offset: u16,
}

impl AdcChannel for SimAdc {
    fn read_u16(&mut self) -> Result<u16, Error> {
        let ms = (self.started.elapsed().as_millis() % 8000) as u32;
        let ramp = if ms < 4000 { ms } else { 8000 - ms };
        let swing = (ramp * 16_384 / 4000) as u16;
        Ok(24_576u16.wrapping_add(swing).wrapping_add(self.offset))
    }
}

/// Simulated PWM output.
#[derive(Debug)]
pub struct SimPwm {
    duty: u16,
    hz: u32,
    active: bool,
}

impl SimPwm {
    /// Last duty cycle set.
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Current frequency.
    pub fn frequency(&self) -> u32 {
        self.hz
    }
}

impl PwmChannel for SimPwm {
    fn set_duty_u16(&mut self, duty: u16) -> Result<(), Error> {
        if !self.active {
            return Err(Error::Fault);
        }
        self.duty = duty;
        Ok(())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), Error> {
        // RP2040 PWM reaches about 7.6 Hz at the slowest divider
        if !(8..=62_500_000).contains(&hz) {
            return Err(Error::Frequency);
        }
        self.hz = hz;
        Ok(())
    }

    fn deinit(&mut self) {
        self.active = false;
        self.duty = 0;
    }
}

impl Board for SimBoard {
    type Digital = SimPin;
    type Adc = SimAdc;
    type Pwm = SimPwm;

    fn output(&mut self, pin: u8) -> Result<SimPin, Error> {
        self.levels.borrow_mut().insert(pin, Level::Low);
        Ok(SimPin {
            pin,
            pull: Pull::None,
            levels: self.levels.clone(),
        })
    }

    fn input(&mut self, pin: u8, pull: Pull) -> Result<SimPin, Error> {
        Ok(SimPin {
            pin,
            pull,
            levels: self.levels.clone(),
        })
    }

    fn adc(&mut self, pin: u8) -> Result<SimAdc, Error> {
        Ok(SimAdc {
            started: Instant::now(),
            offset: pin as u16 * 512,
        })
    }

    fn pwm(&mut self, _pin: u8, hz: u32) -> Result<SimPwm, Error> {
        let mut pwm = SimPwm {
            duty: 0,
            hz: 0,
            active: true,
        };
        pwm.set_frequency(hz)?;
        Ok(pwm)
    }
}

/// stdin/stdout console.
///
/// The host terminal already echoes and edits lines, so pair this with
/// [`Shell::set_echo(false)`](crate::system::Shell::set_echo).
#[derive(Debug, Default)]
pub struct StdConsole;

impl fmt::Write for StdConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut out = io::stdout().lock();
        out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        out.flush().map_err(|_| fmt::Error)
    }
}

impl Console for StdConsole {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

/// LED state shared between the shell and the idle thread.
#[derive(Debug, Default, Clone)]
pub struct SharedIndicator {
    lit: Arc<AtomicBool>,
}

impl SharedIndicator {
    /// Whether the LED is on.
    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::Relaxed)
    }
}

impl Indicator for SharedIndicator {
    fn set(&mut self, on: bool) {
        self.lit.store(on, Ordering::Relaxed);
    }
}

/// `thread::sleep` delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Fixed memory figures and a sensor reading near room temperature.
#[derive(Debug)]
pub struct SimPlatform {
    started: Instant,
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Platform for SimPlatform {
    fn core_temperature_raw(&mut self) -> Result<u16, Error> {
        // 0.706 V (27 °C) with a little drift
        let drift = (self.started.elapsed().as_secs() % 20) as u16;
        Ok(14_021 + drift)
    }

    fn memory_stats(&mut self) -> MemoryStats {
        MemoryStats {
            free: 187_392,
            allocated: 45_056,
        }
    }

    fn reset(&mut self) -> ! {
        println!("(simulated reset)");
        std::process::exit(0)
    }
}
