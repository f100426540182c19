//! Board description and shell constants.
//!
//! Everything here is fixed at build time. Runtime settings that live in
//! `config.json` on the board are handled by [`crate::boot::BootConfig`].

/// A pin the shell keeps for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReservedPin {
    /// GPIO number.
    pub pin: u8,
    /// What the pin is used for, shown in error messages.
    pub reason: &'static str,
}

/// Static description of a board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardConfig {
    /// Host name shown in the prompt (`pico:/> `).
    pub hostname: &'static str,
    /// GPIO driving the status LED. Never registrable as a device.
    pub led_pin: u8,
    /// Other pins that can never be registered as devices.
    pub reserved: &'static [ReservedPin],
    /// Pins wired to the ADC.
    pub adc_pins: &'static [u8],
    /// ADC reference voltage in volts.
    pub reference_voltage: f32,
    /// Frequency a PWM device starts at.
    pub default_pwm_frequency: u32,
    /// Period of the idle blink.
    pub idle_period_ms: u32,
    /// On-time of a single idle blink.
    pub idle_pulse_ms: u32,
}

impl BoardConfig {
    /// Look up the reservation covering `pin`, if any.
    pub fn reservation(&self, pin: u8) -> Option<ReservedPin> {
        if pin == self.led_pin {
            return Some(ReservedPin { pin, reason: "LED" });
        }
        self.reserved.iter().find(|r| r.pin == pin).copied()
    }

    /// Whether `pin` can be claimed as an ADC input.
    pub fn is_adc_pin(&self, pin: u8) -> bool {
        self.adc_pins.contains(&pin)
    }

    /// Convert a raw `u16` ADC sample to volts.
    pub fn adc_to_volts(&self, raw: u16) -> f32 {
        raw as f32 * self.reference_voltage / u16::MAX as f32
    }
}

/// Raspberry Pi Pico (RP2040).
///
/// GPIO 25 drives the on-board LED; channel 4 is the internal temperature
/// sensor. GPIO 26 to 28 are the user ADC inputs.
pub const PICO: BoardConfig = BoardConfig {
    hostname: "pico",
    led_pin: 25,
    reserved: &[ReservedPin {
        pin: 4,
        reason: "ADC_TEMP",
    }],
    adc_pins: &[26, 27, 28],
    reference_voltage: 3.3,
    default_pwm_frequency: 1000,
    idle_period_ms: 5000,
    idle_pulse_ms: 100,
};

impl Default for BoardConfig {
    fn default() -> Self {
        PICO
    }
}

/// Shell release, shown by `about` and at boot.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
