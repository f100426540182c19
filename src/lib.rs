//! # angusto - interactive shell for microcontroller boards
//!
//! A line-oriented shell for boards like the Raspberry Pi Pico: browse and
//! edit files, run scripts of shell commands, and drive GPIO, ADC and PWM
//! pins by name. The crate is `no_std` and allocation-free; the board
//! support code plugs in through a handful of traits.
//!
//! ## Overview
//!
//! - **[`device`]**: named devices on physical pins, with reserved-pin and
//!   pin-conflict checks
//! - **[`system`]**: the shell loop, the command router and the built-in
//!   commands
//! - **[`fs`]**: the filesystem interface the file commands use
//! - **[`hal`]**: pins, LED, delay and chip services the board provides
//! - **[`boot`]**: `config.json` and the power-on sequence
//! - **[`config`]**: the static board description
//!
//! ## Usage
//!
//! ```rust,no_run
//! use angusto::config::PICO;
//! use angusto::device::DeviceManager;
//! use angusto::system::{Shell, ShellContext};
//! # use angusto::{fs::FileSystem, hal::{Board, Delay, Indicator, Platform}, system::Console};
//! # fn firmware<B: Board>(
//! #     board: B,
//! #     console: &mut dyn Console,
//! #     fs: &mut dyn FileSystem,
//! #     platform: &mut dyn Platform,
//! #     led: &mut dyn Indicator,
//! #     delay: &mut dyn Delay,
//! # ) {
//! let mut devices = DeviceManager::new(board, PICO);
//! let ctx = ShellContext::new(console, fs, &mut devices, platform, led, delay);
//! let mut shell = Shell::new(ctx);
//! shell.welcome();
//! shell.run();
//! # }
//! ```
//!
//! ```text
//! pico:/> device register heater 15 out
//! Registered device 'heater' on pin 15 (out)
//! pico:/> device control heater 1
//! Set pin 'heater' to 1
//! pico:/> device register sensor 26 adc
//! Registered device 'sensor' on pin 26 (adc)
//! pico:/> device read sensor
//! ADC 'sensor': 31744 (1.60V)
//! ```
//!
//! ## Optional Features
//!
//! - `std`: host simulator ([`sim`]) and the `angusto-sim` binary
//! - `defmt`: defmt logging and `defmt::Format` on public types

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod logging;

/// Boot sequence and runtime configuration.
pub mod boot;

/// Static board description.
pub mod config;

/// Device registry on top of the HAL.
pub mod device;

/// Filesystem interface and path handling.
pub mod fs;

/// Hardware abstraction traits.
pub mod hal;

/// Shell, router and commands.
pub mod system;

/// Host simulator.
#[cfg(feature = "std")]
pub mod sim;
