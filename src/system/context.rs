//! Everything a command handler may touch.

use core::fmt::{self, Write};

use crate::config::{BoardConfig, PICO};
use crate::device::DeviceControl;
use crate::fs::{self, FileSystem, Path};
use crate::hal::{Delay, Indicator, Platform};

use super::commands::COMMANDS;
use super::error::{Severity, ShellError};
use super::indicator;
use super::router::Command;
use super::shell::{InputLine, Interrupted, LineEditor};

/// Operator terminal: formatted output plus blocking byte input.
///
/// Output uses plain `\n` line endings; a UART implementation that needs
/// `\r\n` translates in `write_str`.
pub trait Console: fmt::Write {
    /// Block for the next input byte. `None` means the input is closed.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Hands a console to APIs that take `&mut dyn fmt::Write`.
pub struct ConsoleWriter<'c>(pub &'c mut dyn Console);

impl fmt::Write for ConsoleWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s)
    }
}

/// State and collaborators passed to every command handler.
///
/// There is no global shell state; the router, the script runner and the
/// notepad all work through this value.
pub struct ShellContext<'a> {
    /// Terminal.
    pub console: &'a mut dyn Console,
    /// Board filesystem.
    pub fs: &'a mut dyn FileSystem,
    /// Registered devices.
    pub devices: &'a mut dyn DeviceControl,
    /// Temperature, memory and reset.
    pub platform: &'a mut dyn Platform,
    /// Status LED.
    pub indicator: &'a mut dyn Indicator,
    /// Blocking delay used by the LED patterns.
    pub delay: &'a mut dyn Delay,
    /// Static board description.
    pub board: BoardConfig,
    cwd: Path,
    commands: &'static [Command],
    editor: LineEditor,
    pub(crate) script_depth: u8,
}

impl<'a> ShellContext<'a> {
    /// Context for a Pico with the built-in command table, starting at `/`.
    pub fn new(
        console: &'a mut dyn Console,
        fs: &'a mut dyn FileSystem,
        devices: &'a mut dyn DeviceControl,
        platform: &'a mut dyn Platform,
        indicator: &'a mut dyn Indicator,
        delay: &'a mut dyn Delay,
    ) -> Self {
        let mut cwd = Path::new();
        let _ = cwd.push('/');
        Self {
            console,
            fs,
            devices,
            platform,
            indicator,
            delay,
            board: PICO,
            cwd,
            commands: &COMMANDS,
            editor: LineEditor::new(),
            script_depth: 0,
        }
    }

    /// Use a different board description.
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    /// Dispatch against a different command table.
    pub fn with_commands(mut self, commands: &'static [Command]) -> Self {
        self.commands = commands;
        self
    }

    /// The table the router resolves against.
    pub fn commands(&self) -> &'static [Command] {
        self.commands
    }

    /// Current working directory.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub(crate) fn set_cwd(&mut self, path: Path) {
        self.cwd = path;
    }

    /// Resolve user input against the current directory.
    pub fn resolve(&self, input: &str) -> Result<Path, ShellError> {
        fs::path::resolve(&self.cwd, input).map_err(|err| ShellError::fs(input, err))
    }

    /// Enable or disable input echo for every line read in this session.
    pub fn set_echo(&mut self, enabled: bool) {
        self.editor.set_echo(enabled);
    }

    /// Read one line from the console.
    ///
    /// The shell prompt and commands that take their own input (`notepad`)
    /// share this editor.
    pub fn read_line(&mut self) -> Result<InputLine, Interrupted> {
        let line = self.editor.read_line(&mut *self.console)?;
        let mut owned = InputLine::new();
        // same capacity as the editor buffer
        let _ = owned.push_str(line);
        Ok(owned)
    }

    /// Whether the current line came from the operator rather than a script.
    pub fn is_interactive(&self) -> bool {
        self.script_depth == 0
    }

    /// Print the prompt, e.g. `pico:/lib> `.
    pub fn prompt(&mut self) {
        let _ = write!(self.console, "{}:{}> ", self.board.hostname, self.cwd);
    }

    /// Print a failed command's diagnostic and flash its fault pattern.
    pub fn report(&mut self, err: &ShellError) {
        let _ = writeln!(self.console, "Error: {}", err);
        match err.severity() {
            Some(severity) => {
                log_warn!("command failed ({}): {}", severity_name(severity), err);
                indicator::signal_fault(&mut *self.indicator, &mut *self.delay, severity);
            }
            None => log_debug!("{}", err),
        }
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Minor => "minor",
        Severity::Critical => "critical",
    }
}

impl fmt::Debug for ShellContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellContext")
            .field("board", &self.board.hostname)
            .field("cwd", &self.cwd.as_str())
            .field("commands", &self.commands.len())
            .field("script_depth", &self.script_depth)
            .finish()
    }
}
