//! The interactive shell.
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ LineEditor  │───▶│   Router    │───▶│  Handlers   │
//! │ (Console)   │    │ (tables)    │    │ (commands)  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Shell     │    │  Indicator  │    │ShellContext │
//! │   loop      │    │  (LED)      │    │ fs, devices │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! - **[`shell`]**: line editing and the read-dispatch loop
//! - **[`router`]**: nested command tables and resolution
//! - **[`context`]**: the state every handler receives
//! - **[`commands`]**: the built-in command table
//! - **[`script`]** and **[`notepad`]**: `run` and `notepad`
//! - **[`indicator`]**: activity, fault and idle LED patterns

/// Built-in commands.
pub mod commands;

/// Handler context and console trait.
pub mod context;

/// Shell error type.
pub mod error;

/// LED patterns.
pub mod indicator;

/// `notepad` editor.
pub mod notepad;

/// Command tables and dispatch.
pub mod router;

/// `run` script runner.
pub mod script;

/// Line editor and shell loop.
pub mod shell;

pub use context::{Console, ConsoleWriter, ShellContext};
pub use error::{Severity, ShellError};
pub use indicator::IdleBlink;
pub use router::{Command, CommandEntry, CommandResult, Handler};
pub use shell::{LineEditor, Shell};
