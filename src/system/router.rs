//! Command tables and dispatch.
//!
//! A table is a static slice of [`Command`]s. Each entry is either a leaf
//! handler or a group holding another table, so `device register ...` is a
//! `device` group whose `register` entry is a leaf. Resolution walks groups
//! for as long as the next token names a subcommand.
//!
//! ```text
//! "device list"   -> Dispatch(list, args = [])
//! "device"        -> Subcommands(device)
//! "device bogus"  -> Subcommands(device)
//! "bogus"         -> Unknown
//! ```
//!
//! Tables are plain statics. Nested tables are separate statics referenced
//! from the group entry:
//!
//! ```rust
//! use angusto::system::{Command, CommandResult, ShellContext};
//!
//! fn list(_ctx: &mut ShellContext<'_>, _args: &[&str]) -> CommandResult {
//!     Ok(())
//! }
//!
//! static DEVICE: [Command; 1] = [Command::leaf("list", "device list", list)];
//! static TABLE: [Command; 1] = [Command::group("device", "device <subcommand>", &DEVICE)];
//! # assert_eq!(TABLE[0].name, "device");
//! ```

use core::fmt::Write;

use heapless::Vec;

use super::context::ShellContext;
use super::error::ShellError;

/// Maximum number of whitespace-separated tokens on one line.
pub const MAX_ARGS: usize = 16;

/// What every handler returns.
pub type CommandResult = Result<(), ShellError>;

/// A leaf command. Receives the tokens after the command path.
pub type Handler = fn(&mut ShellContext<'_>, &[&str]) -> CommandResult;

/// What a table entry resolves to.
#[derive(Clone, Copy)]
pub enum CommandEntry {
    /// Run this handler.
    Leaf(Handler),
    /// Look the next token up in this table.
    Group(&'static [Command]),
}

/// A named table entry.
#[derive(Clone, Copy)]
pub struct Command {
    /// Lowercase name the user types.
    pub name: &'static str,
    /// One-line usage shown by `help` and on arity errors.
    pub usage: &'static str,
    /// Handler or nested table.
    pub entry: CommandEntry,
}

impl Command {
    /// Leaf entry.
    pub const fn leaf(name: &'static str, usage: &'static str, handler: Handler) -> Self {
        Self {
            name,
            usage,
            entry: CommandEntry::Leaf(handler),
        }
    }

    /// Group entry.
    pub const fn group(name: &'static str, usage: &'static str, table: &'static [Command]) -> Self {
        Self {
            name,
            usage,
            entry: CommandEntry::Group(table),
        }
    }

    /// Subcommands, if this is a group.
    pub fn subcommands(&self) -> Option<&'static [Command]> {
        match self.entry {
            CommandEntry::Group(table) => Some(table),
            CommandEntry::Leaf(_) => None,
        }
    }
}

impl core::fmt::Debug for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = match self.entry {
            CommandEntry::Leaf(_) => "leaf",
            CommandEntry::Group(_) => "group",
        };
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("entry", &kind)
            .finish()
    }
}

/// Outcome of resolving a token list against a table.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'t, 'a> {
    /// A leaf was found.
    Dispatch {
        /// The matched entry.
        command: &'t Command,
        /// Its handler.
        handler: Handler,
        /// Tokens after the command path.
        args: &'a [&'a str],
    },
    /// A group was reached without a matching subcommand.
    Subcommands {
        /// The group entry.
        group: &'t Command,
    },
    /// The first token names nothing.
    Unknown,
}

/// Case-insensitive lookup of one token.
pub fn find<'t>(table: &'t [Command], token: &str) -> Option<&'t Command> {
    table.iter().find(|c| c.name.eq_ignore_ascii_case(token))
}

/// Resolve `tokens` against `table`.
pub fn resolve<'t, 'a>(table: &'t [Command], tokens: &'a [&'a str]) -> Resolution<'t, 'a> {
    let Some((first, _)) = tokens.split_first() else {
        return Resolution::Unknown;
    };
    let Some(mut command) = find(table, first) else {
        return Resolution::Unknown;
    };

    let mut depth = 1;
    loop {
        match command.entry {
            CommandEntry::Leaf(handler) => {
                return Resolution::Dispatch {
                    command,
                    handler,
                    args: &tokens[depth..],
                };
            }
            CommandEntry::Group(sub) => match tokens.get(depth).and_then(|t| find(sub, t)) {
                Some(next) => {
                    command = next;
                    depth += 1;
                }
                None => return Resolution::Subcommands { group: command },
            },
        }
    }
}

/// Split a line into at most [`MAX_ARGS`] tokens.
pub fn tokenize(line: &str) -> Result<Vec<&str, MAX_ARGS>, ShellError> {
    let mut tokens = Vec::new();
    for token in line.split_whitespace() {
        tokens.push(token).map_err(|_| ShellError::TooManyArguments)?;
    }
    Ok(tokens)
}

/// Tokenize, resolve and run one line.
///
/// Empty lines do nothing. When the line comes from the operator, the
/// indicator is lit for the duration of a resolved command and cleared
/// afterwards whatever the outcome. Errors are returned, not reported.
pub fn execute(ctx: &mut ShellContext<'_>, line: &str) -> CommandResult {
    let tokens = tokenize(line)?;
    let Some(first) = tokens.first() else {
        return Ok(());
    };

    let resolution = resolve(ctx.commands(), &tokens);
    if let Resolution::Unknown = resolution {
        log_warn!("unknown command: {}", *first);
        return Err(ShellError::unknown(first));
    }

    let interactive = ctx.is_interactive();
    if interactive {
        ctx.indicator.set(true);
    }
    let result = match resolution {
        Resolution::Dispatch { handler, args, .. } => handler(ctx, args),
        Resolution::Subcommands { group } => {
            list_subcommands(ctx, group);
            Ok(())
        }
        Resolution::Unknown => Ok(()),
    };
    if interactive {
        ctx.indicator.set(false);
    }
    result
}

/// Print the subcommands of `group` with their usage lines.
pub fn list_subcommands(ctx: &mut ShellContext<'_>, group: &Command) {
    let _ = writeln!(ctx.console, "Available {} subcommands:", group.name);
    for sub in group.subcommands().unwrap_or(&[]) {
        let _ = writeln!(ctx.console, "  {:<10} {}", sub.name, sub.usage);
    }
}
