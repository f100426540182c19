//! `device` subcommands.

use core::fmt::Write;

use crate::device::{DeviceKind, DeviceMode};
use crate::hal::Level;
use crate::system::{CommandResult, ConsoleWriter, ShellContext, ShellError};

/// Convert a duty cycle in percent to the 16-bit PWM range.
///
/// `None` outside `0.0..=100.0` (NaN included).
pub fn percent_to_duty(percent: f32) -> Option<u16> {
    if !(0.0..=100.0).contains(&percent) {
        return None;
    }
    Some((percent * u16::MAX as f32 / 100.0 + 0.5) as u16)
}

/// Parse a digital value: `1`/`on`/`high` or `0`/`off`/`low`.
pub fn parse_level(value: &str) -> Option<Level> {
    const HIGH: [&str; 3] = ["1", "on", "high"];
    const LOW: [&str; 3] = ["0", "off", "low"];
    if HIGH.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        Some(Level::High)
    } else if LOW.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        Some(Level::Low)
    } else {
        None
    }
}

/// `device register <name> <pin> <mode> [pull]`
pub fn register(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let (name, pin, mode, pull) = match args {
        [name, pin, mode] => (*name, *pin, *mode, None),
        [name, pin, mode, pull] => (*name, *pin, *mode, Some(*pull)),
        _ => {
            return Err(ShellError::InvalidArgumentCount {
                usage: "device register <name> <pin> <in|out|adc|pwm> [up|down]",
            });
        }
    };
    let pin: u8 = pin.parse().map_err(|_| ShellError::invalid("pin", pin))?;
    let mode = DeviceMode::parse(mode, pull)?;

    ctx.devices.register(name, pin, mode)?;
    let _ = writeln!(
        ctx.console,
        "Registered device '{}' on pin {} ({})",
        name, pin, mode
    );
    Ok(())
}

/// `device control <name> <value>`
///
/// PWM devices take a duty cycle in percent; digital outputs take a level.
pub fn control(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [name, value] = args else {
        return Err(ShellError::InvalidArgumentCount {
            usage: "device control <name> <value>",
        });
    };

    if ctx.devices.kind_of(name) == Some(DeviceKind::Pwm) {
        let duty = value
            .parse::<f32>()
            .ok()
            .and_then(percent_to_duty)
            .ok_or_else(|| ShellError::invalid("duty cycle (0-100)", value))?;
        ctx.devices.set_pwm(name, duty)?;
        let _ = writeln!(ctx.console, "Set PWM '{}' duty to {}%", name, value);
    } else {
        let level = parse_level(value).ok_or_else(|| ShellError::invalid("level", value))?;
        ctx.devices.set_pin(name, level)?;
        let _ = writeln!(ctx.console, "Set pin '{}' to {}", name, level.as_u8());
    }
    Ok(())
}

/// `device read <name>`: digital level, or ADC sample with its voltage.
pub fn read(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [name] = args else {
        return Err(ShellError::InvalidArgumentCount {
            usage: "device read <name>",
        });
    };

    if ctx.devices.kind_of(name) == Some(DeviceKind::Analog) {
        let raw = ctx.devices.read_adc(name)?;
        let volts = ctx.board.adc_to_volts(raw);
        let _ = writeln!(ctx.console, "ADC '{}': {} ({:.2}V)", name, raw, volts);
    } else {
        let level = ctx.devices.read_pin(name)?;
        let _ = writeln!(ctx.console, "Pin '{}': {}", name, level.as_u8());
    }
    Ok(())
}

/// `device list`
pub fn list(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(ShellError::InvalidArgumentCount {
            usage: "device list",
        });
    }
    let _ = ctx
        .devices
        .list_devices(&mut ConsoleWriter(&mut *ctx.console));
    Ok(())
}

/// `device freq <name> <hz>`
pub fn freq(ctx: &mut ShellContext<'_>, args: &[&str]) -> CommandResult {
    let [name, hz] = args else {
        return Err(ShellError::InvalidArgumentCount {
            usage: "device freq <name> <hz>",
        });
    };
    let hz: u32 = hz
        .parse()
        .ok()
        .filter(|hz| *hz > 0)
        .ok_or_else(|| ShellError::invalid("frequency", hz))?;
    ctx.devices.set_pwm_freq(name, hz)?;
    let _ = writeln!(ctx.console, "Set PWM '{}' frequency to {} Hz", name, hz);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_duty() {
        assert_eq!(percent_to_duty(0.0), Some(0));
        assert_eq!(percent_to_duty(50.0), Some(32768));
        assert_eq!(percent_to_duty(100.0), Some(u16::MAX));
        assert_eq!(percent_to_duty(-0.1), None);
        assert_eq!(percent_to_duty(100.5), None);
        assert_eq!(percent_to_duty(f32::NAN), None);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("1"), Some(Level::High));
        assert_eq!(parse_level("ON"), Some(Level::High));
        assert_eq!(parse_level("low"), Some(Level::Low));
        assert_eq!(parse_level("2"), None);
    }
}
