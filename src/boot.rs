//! Boot sequence and `config.json`.
//!
//! On power-up the firmware loads [`BootConfig`], runs [`run`] and then
//! enters the shell loop. `run` blinks the power light, counts down
//! `BOOT_DELAY` seconds and executes the startup script, if there is one.
//!
//! ```json
//! { "LED_PIN": 25, "BOOT_DELAY": 3, "MAIN_SCRIPT": "startup.txt" }
//! ```
//!
//! Every key is optional. A missing or unreadable file means defaults.

use core::fmt::{self, Write};

use heapless::String;
use serde::Deserialize;

use crate::config::{BoardConfig, VERSION};
use crate::fs::FileSystem;
use crate::system::indicator::{self, FlashPattern};
use crate::system::{ShellContext, ShellError, script};

/// Location of the boot configuration.
pub const CONFIG_FILE: &str = "/config.json";

/// Longest startup script name accepted.
pub const MAX_SCRIPT_NAME: usize = 64;

/// Largest `config.json` read.
const MAX_CONFIG_SIZE: usize = 512;

const POWER_LIGHT: FlashPattern = FlashPattern {
    count: 3,
    duration_ms: 500,
};

const COUNTDOWN_BLINK: FlashPattern = FlashPattern {
    count: 1,
    duration_ms: 100,
};

/// Why `config.json` was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Reading the file failed.
    Fs(crate::fs::Error),
    /// The file is not valid JSON or a value has the wrong type.
    Json,
    /// `MAIN_SCRIPT` is longer than [`MAX_SCRIPT_NAME`].
    ScriptNameTooLong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Fs(err) => write!(f, "{}", err),
            ConfigError::Json => f.write_str("invalid JSON"),
            ConfigError::ScriptNameTooLong => f.write_str("MAIN_SCRIPT is too long"),
        }
    }
}

#[derive(Deserialize)]
struct RawBootConfig<'a> {
    #[serde(rename = "LED_PIN")]
    led_pin: Option<u8>,
    #[serde(rename = "BOOT_DELAY")]
    boot_delay: Option<u8>,
    #[serde(rename = "MAIN_SCRIPT", borrow)]
    main_script: Option<&'a str>,
}

/// Runtime settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootConfig {
    /// GPIO of the status LED.
    pub led_pin: u8,
    /// Seconds to count down before the startup script.
    pub boot_delay: u8,
    /// Startup script, relative to `/`. Empty disables it.
    pub main_script: String<MAX_SCRIPT_NAME>,
}

impl Default for BootConfig {
    fn default() -> Self {
        let mut main_script = String::new();
        let _ = main_script.push_str("startup.txt");
        Self {
            led_pin: 25,
            boot_delay: 3,
            main_script,
        }
    }
}

impl BootConfig {
    /// Parse the JSON text of `config.json`. Absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let (raw, _) = serde_json_core::from_str::<RawBootConfig<'_>>(json)
            .map_err(|_| ConfigError::Json)?;

        let mut config = Self::default();
        if let Some(pin) = raw.led_pin {
            config.led_pin = pin;
        }
        if let Some(delay) = raw.boot_delay {
            config.boot_delay = delay;
        }
        if let Some(script) = raw.main_script {
            config.main_script.clear();
            config
                .main_script
                .push_str(script)
                .map_err(|_| ConfigError::ScriptNameTooLong)?;
        }
        Ok(config)
    }

    /// `board` with the status LED moved to [`BootConfig::led_pin`].
    pub fn apply(&self, board: BoardConfig) -> BoardConfig {
        BoardConfig {
            led_pin: self.led_pin,
            ..board
        }
    }

    /// Read [`CONFIG_FILE`].
    pub fn read(fs: &mut dyn FileSystem) -> Result<Self, ConfigError> {
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let text = fs
            .read_to_str(CONFIG_FILE, &mut buf)
            .map_err(ConfigError::Fs)?;
        Self::from_json(text)
    }

    /// Read [`CONFIG_FILE`], falling back to defaults and saying so on `out`.
    pub fn load(fs: &mut dyn FileSystem, out: &mut dyn Write) -> Self {
        match Self::read(fs) {
            Ok(config) => {
                let _ = writeln!(out, "Loaded {}", CONFIG_FILE);
                log_info!("boot config from {}", CONFIG_FILE);
                config
            }
            Err(err) => {
                let _ = writeln!(out, "Configuration not loaded ({}). Using defaults.", err);
                log_warn!("boot config defaults: {}", err);
                Self::default()
            }
        }
    }
}

/// Power light, countdown, startup script.
///
/// A missing startup script is reported and skipped; a failing one is
/// reported like any failed command. Neither stops the boot.
pub fn run(ctx: &mut ShellContext<'_>, config: &BootConfig) {
    let _ = writeln!(ctx.console, "Bootloader {}", VERSION);
    indicator::flash(&mut *ctx.indicator, &mut *ctx.delay, POWER_LIGHT);
    ctx.delay.delay_ms(1000);

    let _ = writeln!(
        ctx.console,
        "Waiting {} seconds before loading {}...",
        config.boot_delay, config.main_script
    );
    for remaining in (1..=config.boot_delay).rev() {
        let _ = writeln!(ctx.console, "Loading in {} seconds...", remaining);
        indicator::flash(&mut *ctx.indicator, &mut *ctx.delay, COUNTDOWN_BLINK);
        ctx.delay.delay_ms(800);
    }

    if config.main_script.is_empty() {
        return;
    }
    let path = match ctx.resolve(&config.main_script) {
        Ok(path) => path,
        Err(err) => {
            ctx.report(&err);
            return;
        }
    };
    if !ctx.fs.exists(&path) {
        let _ = writeln!(ctx.console, "No startup script at {}", path);
        return;
    }
    match script::run_file(ctx, &path) {
        Ok(()) | Err(ShellError::Interrupted) => {}
        Err(err) => ctx.report(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config =
            BootConfig::from_json(r#"{"LED_PIN": 15, "BOOT_DELAY": 0, "MAIN_SCRIPT": "boot.txt"}"#)
                .unwrap();
        assert_eq!(config.led_pin, 15);
        assert_eq!(config.boot_delay, 0);
        assert_eq!(config.main_script, "boot.txt");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = BootConfig::from_json(r#"{"BOOT_DELAY": 5}"#).unwrap();
        assert_eq!(config.boot_delay, 5);
        assert_eq!(config.led_pin, 25);
        assert_eq!(config.main_script, "startup.txt");
    }

    #[test]
    fn test_apply_moves_led_pin() {
        let config = BootConfig::from_json(r#"{"LED_PIN": 16}"#).unwrap();
        let board = config.apply(crate::config::PICO);
        assert_eq!(board.led_pin, 16);
        assert_eq!(board.hostname, "pico");
        assert_eq!(BootConfig::default().apply(crate::config::PICO), crate::config::PICO);
    }

    #[test]
    fn test_empty_script_disables() {
        let config = BootConfig::from_json(r#"{"MAIN_SCRIPT": ""}"#).unwrap();
        assert!(config.main_script.is_empty());
    }

    #[test]
    fn test_malformed() {
        assert_eq!(BootConfig::from_json("{"), Err(ConfigError::Json));
        assert_eq!(
            BootConfig::from_json(r#"{"LED_PIN": "twenty"}"#),
            Err(ConfigError::Json)
        );
        let long = std::format!(r#"{{"MAIN_SCRIPT": "{}"}}"#, "s".repeat(MAX_SCRIPT_NAME + 1));
        assert_eq!(
            BootConfig::from_json(&long),
            Err(ConfigError::ScriptNameTooLong)
        );
    }
}
