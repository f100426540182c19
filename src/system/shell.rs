//! Interactive shell loop.
//!
//! The shell reads one line at a time from the [`Console`], edits it in a
//! fixed buffer, and hands it to the [router](super::router). Failures are
//! printed and flashed on the indicator; nothing a command does ends the
//! loop. Only an operator break (Ctrl-C, or the console closing) does, and
//! it leaves the indicator off and every device released. A break typed
//! while a command is reading input (the notepad) ends the loop too.
//!
//! There is one [`LineEditor`] per session, held by the [`ShellContext`],
//! so a CR LF split across the prompt and a command's own input still
//! counts as a single line end.
//!
//! # Input handling
//!
//! - **CR/LF**: ends the line (a CR LF pair counts once)
//! - **Backspace/Delete**: removes the last character, echoing `"\x08 \x08"`
//! - **Printable ASCII**: appended and echoed; input past the buffer is dropped
//! - **Ctrl-C**: operator break
//! - **Other control characters**: ignored
//!
//! ```rust,no_run
//! use angusto::system::{Shell, ShellContext};
//! # fn ctx() -> ShellContext<'static> { unimplemented!() }
//!
//! let mut shell = Shell::new(ctx());
//! shell.welcome();
//! shell.run();
//! ```

use core::fmt::Write;
use core::str;

use heapless::String;

use crate::config::VERSION;

use super::context::{Console, ShellContext};
use super::error::ShellError;
use super::router;

/// Maximum buffer size for input command lines.
pub const MAX_BUFFER_SIZE: usize = 256;

/// One line of input, copied out of the editor.
pub type InputLine = String<MAX_BUFFER_SIZE>;

/// ASCII end-of-text, sent by Ctrl-C.
pub const ASCII_ETX: u8 = 0x03;
/// ASCII backspace character (0x08).
pub const ASCII_BACKSPACE: u8 = 0x08;
/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;
/// ASCII delete character (0x7F).
pub const ASCII_DEL: u8 = 0x7F;

/// The operator asked to stop, or the console closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interrupted;

/// Fixed-buffer line editor with echo.
#[derive(Debug)]
pub struct LineEditor {
    buffer: [u8; MAX_BUFFER_SIZE],
    len: usize,
    echo: bool,
    after_cr: bool,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    /// Editor with echo enabled.
    pub fn new() -> Self {
        Self {
            buffer: [0; MAX_BUFFER_SIZE],
            len: 0,
            echo: true,
            after_cr: false,
        }
    }

    /// Enable or disable echoing typed characters back.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo = enabled;
    }

    /// Block until a full line has been typed.
    pub fn read_line(&mut self, console: &mut dyn Console) -> Result<&str, Interrupted> {
        self.len = 0;
        loop {
            let byte = console.read_byte().ok_or(Interrupted)?;
            let after_cr = core::mem::replace(&mut self.after_cr, byte == ASCII_CR);
            match byte {
                ASCII_ETX => return Err(Interrupted),
                ASCII_LF if after_cr => {}
                ASCII_CR | ASCII_LF => {
                    if self.echo {
                        let _ = console.write_str("\n");
                    }
                    break;
                }
                ASCII_BACKSPACE | ASCII_DEL => {
                    if self.len > 0 {
                        self.len -= 1;
                        if self.echo {
                            let _ = console.write_str("\x08 \x08");
                        }
                    }
                }
                0x20..=0x7E => {
                    if self.len < MAX_BUFFER_SIZE {
                        self.buffer[self.len] = byte;
                        self.len += 1;
                        if self.echo {
                            let _ = console.write_char(byte as char);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(str::from_utf8(&self.buffer[..self.len]).unwrap_or_default())
    }
}

/// The read-dispatch loop around a [`ShellContext`].
#[derive(Debug)]
pub struct Shell<'a> {
    ctx: ShellContext<'a>,
}

impl<'a> Shell<'a> {
    /// Wrap a context.
    pub fn new(ctx: ShellContext<'a>) -> Self {
        Self { ctx }
    }

    /// The wrapped context.
    pub fn context(&mut self) -> &mut ShellContext<'a> {
        &mut self.ctx
    }

    /// Enable or disable input echo.
    pub fn set_echo(&mut self, enabled: bool) {
        self.ctx.set_echo(enabled);
    }

    /// Print the banner and storage usage.
    pub fn welcome(&mut self) {
        let _ = writeln!(self.ctx.console, "\nWelcome to Angusto Shell v{}", VERSION);
        let _ = writeln!(self.ctx.console, "Type 'help' for a list of commands.");
        super::commands::info::print_storage_usage(&mut self.ctx);
    }

    /// Run one line and report its failure, if any.
    ///
    /// Returns `false` when the operator broke out of the command; the shell
    /// has then already shut down.
    pub fn execute(&mut self, line: &str) -> bool {
        match router::execute(&mut self.ctx, line) {
            Ok(()) => true,
            Err(ShellError::Interrupted) => {
                self.shutdown();
                false
            }
            Err(err) => {
                self.ctx.report(&err);
                true
            }
        }
    }

    /// Prompt, read and execute until the operator breaks.
    pub fn run(&mut self) {
        loop {
            self.ctx.prompt();
            let line = match self.ctx.read_line() {
                Ok(line) => line,
                Err(Interrupted) => {
                    self.shutdown();
                    return;
                }
            };
            if !self.execute(&line) {
                return;
            }
        }
    }

    /// Leave the board quiet: indicator off, devices released.
    pub fn shutdown(&mut self) {
        self.ctx.indicator.set(false);
        self.ctx.devices.cleanup();
        let _ = writeln!(self.ctx.console, "\nExiting...");
        log_info!("shell stopped");
    }
}
