//! Script runner.
//!
//! A script is a text file of shell command lines. Each line goes through
//! the same router and context as an interactive line, so a script can do
//! exactly what the operator can and nothing more. Blank lines and lines
//! starting with `#` are skipped. The first failing line is reported and
//! stops the script.

use core::fmt::Write;

use crate::fs::Path;

use super::context::ShellContext;
use super::error::ShellError;
use super::router::{self, CommandResult};

/// Largest script the runner loads, in bytes.
pub const MAX_SCRIPT_SIZE: usize = 2048;

/// How many `run` commands may be active at once.
pub const MAX_SCRIPT_DEPTH: u8 = 4;

const USAGE: &str = "run <script> [--dry-run]";

/// `run <script> [--dry-run]`
pub fn run(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let mut dry_run = false;
    let mut script = None;
    for arg in args {
        match *arg {
            "--dry-run" => dry_run = true,
            name if script.is_none() && !name.starts_with("--") => script = Some(name),
            _ => return Err(ShellError::InvalidArgumentCount { usage: USAGE }),
        }
    }
    let script = script.ok_or(ShellError::InvalidArgumentCount { usage: USAGE })?;
    let path = ctx.resolve(script)?;

    if dry_run {
        let mut buf = [0u8; MAX_SCRIPT_SIZE];
        let text = ctx
            .fs
            .read_to_str(&path, &mut buf)
            .map_err(|err| ShellError::fs(&path, err))?;
        let _ = writeln!(ctx.console, "Dry run of {}:", path);
        let _ = ctx.console.write_str(text);
        if !text.ends_with('\n') {
            let _ = ctx.console.write_str("\n");
        }
        return Ok(());
    }

    run_file(ctx, &path)
}

/// Execute the script at the absolute `path`.
pub fn run_file(ctx: &mut ShellContext<'_>, path: &Path) -> CommandResult {
    if ctx.script_depth >= MAX_SCRIPT_DEPTH {
        return Err(ShellError::ScriptDepth);
    }

    let mut buf = [0u8; MAX_SCRIPT_SIZE];
    let text = ctx
        .fs
        .read_to_str(path, &mut buf)
        .map_err(|err| ShellError::fs(path, err))?;

    log_info!("running script {}", path.as_str());
    let _ = writeln!(ctx.console, "Running {}", path);

    ctx.script_depth += 1;
    let result = run_lines(ctx, text);
    ctx.script_depth -= 1;
    result
}

fn run_lines(ctx: &mut ShellContext<'_>, text: &str) -> CommandResult {
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = router::execute(ctx, line) {
            if matches!(err, ShellError::Interrupted) {
                return Err(err);
            }
            // a nested script already reported its own failing line
            if !matches!(err, ShellError::ScriptAborted { .. }) {
                ctx.report(&err);
            }
            let line = index + 1;
            log_warn!("script aborted at line {}", line);
            return Err(ShellError::ScriptAborted { line });
        }
    }
    Ok(())
}
