//! System commands: `memory`, `reboot`, `temp`, `about`, `help`.

use core::fmt::Write;

use crate::config::VERSION;
use crate::system::router::{self, Command};
use crate::system::{CommandResult, ShellContext, ShellError};

/// Internal sensor voltage at 27 °C.
const TEMP_SENSOR_V27: f32 = 0.706;
/// Internal sensor slope, volts per °C.
const TEMP_SENSOR_SLOPE: f32 = 0.001721;

/// Die temperature from a raw sample of the internal sensor.
pub fn celsius_from_raw(raw: u16, reference_voltage: f32) -> f32 {
    let volts = raw as f32 * reference_voltage / u16::MAX as f32;
    27.0 - (volts - TEMP_SENSOR_V27) / TEMP_SENSOR_SLOPE
}

fn no_args(args: &[&str], usage: &'static str) -> CommandResult {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ShellError::InvalidArgumentCount { usage })
    }
}

fn megabytes(bytes: u64) -> f32 {
    bytes as f32 / (1024.0 * 1024.0)
}

/// Print total, used and free space of the filesystem.
///
/// A failing `statvfs` is printed but does not flash the LED; the caller is
/// the welcome banner, not a command.
pub fn print_storage_usage(ctx: &mut ShellContext<'_>) {
    match ctx.fs.usage() {
        Ok(usage) => {
            let _ = writeln!(ctx.console, "Storage:");
            let _ = writeln!(ctx.console, "  Total: {:.2} MB", megabytes(usage.total_bytes()));
            let _ = writeln!(ctx.console, "  Used:  {:.2} MB", megabytes(usage.used_bytes()));
            let _ = writeln!(ctx.console, "  Free:  {:.2} MB", megabytes(usage.free_bytes()));
        }
        Err(err) => {
            log_warn!("storage usage unavailable: {}", err);
            let _ = writeln!(ctx.console, "Storage: unavailable ({})", err);
        }
    }
}

/// `memory`
pub fn memory(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    no_args(args, "memory")?;
    let stats = ctx.platform.memory_stats();
    let out = &mut *ctx.console;
    let _ = writeln!(out, "Memory:");
    let _ = writeln!(out, "  Free:      {} bytes", stats.free);
    let _ = writeln!(out, "  Allocated: {} bytes", stats.allocated);
    let _ = writeln!(out, "  Total:     {} bytes", stats.total());
    let _ = writeln!(out, "  Used:      {:.1}%", stats.used_percent());
    Ok(())
}

/// `reboot`: release devices, wait a second, reset. Does not return.
pub fn reboot(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    no_args(args, "reboot")?;
    let _ = writeln!(ctx.console, "Rebooting...");
    log_info!("reboot requested");
    ctx.devices.cleanup();
    ctx.indicator.set(false);
    ctx.delay.delay_ms(1000);
    ctx.platform.reset()
}

/// `temp`
pub fn temperature(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    no_args(args, "temp")?;
    let raw = ctx.platform.core_temperature_raw()?;
    let celsius = celsius_from_raw(raw, ctx.board.reference_voltage);
    let _ = writeln!(ctx.console, "CPU temperature: {:.2} C", celsius);
    Ok(())
}

/// `about`
pub fn about(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    no_args(args, "about")?;
    let _ = writeln!(ctx.console, "Angusto Shell v{}", VERSION);
    let _ = writeln!(
        ctx.console,
        "Interactive shell for {} boards: files, scripts and GPIO/ADC/PWM devices.",
        ctx.board.hostname
    );
    Ok(())
}

/// `help [command [subcommand ...]]`
pub fn help(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let table = ctx.commands();
    let Some((first, rest)) = args.split_first() else {
        let _ = writeln!(ctx.console, "Available commands:");
        for command in table {
            let _ = writeln!(ctx.console, "  {}", command.usage);
        }
        return Ok(());
    };

    let Some(mut command) = router::find(table, first) else {
        let _ = writeln!(ctx.console, "No help available for '{}'.", first);
        return Ok(());
    };
    for token in rest {
        match command.subcommands().and_then(|sub| router::find(sub, token)) {
            Some(next) => command = next,
            None => break,
        }
    }

    show(ctx, command);
    Ok(())
}

fn show(ctx: &mut ShellContext<'_>, command: &Command) {
    let _ = writeln!(ctx.console, "Usage: {}", command.usage);
    if command.subcommands().is_some() {
        router::list_subcommands(ctx, command);
    }
}
