//! Line-based text editor.
//!
//! ```text
//! pico:/> notepad todo.txt
//! Editing todo.txt ('exit' to save, 'undo' to drop the last line, a line number to replace it)
//!   3> water the plants
//!   4> 2
//! New text for line 2: buy coffee
//!   4> exit
//! ```

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::fs::FileSystem;

use super::context::ShellContext;
use super::error::ShellError;
use super::router::CommandResult;
use super::shell::Interrupted;

/// Lines a file may have.
pub const MAX_LINES: usize = 48;

/// Characters kept per line.
pub const MAX_LINE_LEN: usize = 80;

const DEFAULT_FILE: &str = "notepad.txt";

type Line = String<MAX_LINE_LEN>;

/// The buffer is at [`MAX_LINES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Full;

/// What an input line means to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// Save and leave.
    Exit,
    /// Drop the last line added this session.
    Undo,
    /// Replace the given 1-based line.
    Edit(usize),
    /// Append this text.
    Text(&'a str),
}

impl<'a> Input<'a> {
    /// Classify a typed line.
    pub fn parse(line: &'a str) -> Self {
        let word = line.trim();
        if word.eq_ignore_ascii_case("exit") {
            Input::Exit
        } else if word.eq_ignore_ascii_case("undo") {
            Input::Undo
        } else if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
            // all digits; too many of them is simply out of range
            Input::Edit(word.parse().unwrap_or(usize::MAX))
        } else {
            Input::Text(line)
        }
    }
}

/// In-memory text buffer.
#[derive(Debug, Default)]
pub struct Notepad {
    lines: Vec<Line, MAX_LINES>,
    added: usize,
}

fn clip(text: &str) -> Line {
    let mut line = Line::new();
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

impl Notepad {
    /// Buffer holding `text`, clipped to the line limits.
    pub fn load(text: &str) -> Self {
        let mut lines = Vec::new();
        for line in text.lines() {
            if lines.push(clip(line)).is_err() {
                break;
            }
        }
        Self { lines, added: 0 }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line `number` (1-based).
    pub fn line(&self, number: usize) -> Option<&str> {
        let index = number.checked_sub(1)?;
        self.lines.get(index).map(|l| l.as_str())
    }

    /// Append a line.
    pub fn append(&mut self, text: &str) -> Result<(), Full> {
        self.lines.push(clip(text)).map_err(|_| Full)?;
        self.added += 1;
        Ok(())
    }

    /// Remove the last line appended this session. Loaded lines stay.
    pub fn undo(&mut self) -> Option<Line> {
        if self.added == 0 {
            return None;
        }
        self.added -= 1;
        self.lines.pop()
    }

    /// Replace line `number` (1-based). `false` when there is no such line.
    pub fn replace(&mut self, number: usize, text: &str) -> bool {
        match number.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
            Some(line) => {
                *line = clip(text);
                true
            }
            None => false,
        }
    }

    /// Print the buffer with line numbers.
    pub fn render(&self, out: &mut dyn Write) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            writeln!(out, "{:>3}: {}", index + 1, line)?;
        }
        Ok(())
    }

    /// Write the buffer to `path`, one `\n` after each line.
    pub fn save(&self, fs: &mut dyn FileSystem, path: &str) -> Result<(), crate::fs::Error> {
        let mut data: Vec<u8, { MAX_LINES * (MAX_LINE_LEN + 1) }> = Vec::new();
        for line in &self.lines {
            // capacity covers every line at full length
            let _ = data.extend_from_slice(line.as_bytes());
            let _ = data.push(b'\n');
        }
        fs.write(path, &data)
    }
}

/// `notepad [file]`
pub fn notepad(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let file = match args {
        [] => DEFAULT_FILE,
        [file] => *file,
        _ => {
            return Err(ShellError::InvalidArgumentCount {
                usage: "notepad [file]",
            });
        }
    };
    let path = ctx.resolve(file)?;

    let mut pad = {
        let mut buf = [0u8; MAX_LINES * (MAX_LINE_LEN + 1)];
        match ctx.fs.read_to_str(&path, &mut buf) {
            Ok(text) => Notepad::load(text),
            Err(crate::fs::Error::NotFound) => Notepad::default(),
            Err(err) => return Err(ShellError::fs(&path, err)),
        }
    };

    let _ = writeln!(
        ctx.console,
        "Editing {} ('exit' to save, 'undo' to drop the last line, a line number to replace it)",
        path
    );
    let _ = pad.render(&mut super::ConsoleWriter(&mut *ctx.console));

    loop {
        let _ = write!(ctx.console, "{:>3}> ", pad.len() + 1);
        let line = match ctx.read_line() {
            Ok(line) => line,
            Err(Interrupted) => return Err(closed_without_saving(ctx)),
        };
        match Input::parse(&line) {
            Input::Exit => break,
            Input::Undo => match pad.undo() {
                Some(removed) => {
                    let _ = writeln!(ctx.console, "Removed: {}", removed);
                }
                None => {
                    let _ = writeln!(ctx.console, "Nothing to undo.");
                }
            },
            Input::Edit(number) if pad.line(number).is_some() => {
                let _ = write!(ctx.console, "New text for line {}: ", number);
                let text = match ctx.read_line() {
                    Ok(text) => text,
                    Err(Interrupted) => return Err(closed_without_saving(ctx)),
                };
                pad.replace(number, &text);
            }
            Input::Edit(_) => {
                let _ = writeln!(ctx.console, "Invalid line number.");
            }
            Input::Text(text) => {
                if pad.append(text).is_err() {
                    let _ = writeln!(ctx.console, "Buffer full ({} lines).", MAX_LINES);
                }
            }
        }
    }

    let _ = writeln!(ctx.console, "\n--- {} ---", path);
    let _ = pad.render(&mut super::ConsoleWriter(&mut *ctx.console));
    pad.save(&mut *ctx.fs, &path)
        .map_err(|err| ShellError::fs(&path, err))?;
    let _ = writeln!(ctx.console, "Saved {}.", path);
    Ok(())
}

fn closed_without_saving(ctx: &mut ShellContext<'_>) -> ShellError {
    let _ = writeln!(ctx.console, "\nNotepad closed without saving.");
    ShellError::Interrupted
}
