mod common;

use angusto::device::DeviceControl;
use angusto::hal::{Level, Pull};
use angusto::system::Shell;
use common::Rig;
use rand::Rng;

/// LED switch-ons for one failed, dispatched command: the activity bracket
/// plus the fault pattern.
fn bracket_and(flashes: usize) -> usize {
    1 + flashes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_drives_pin() {
        let mut rig = Rig::new();

        assert_eq!(
            rig.exec("device register heater 15 out"),
            "Registered device 'heater' on pin 15 (out)\n"
        );
        assert_eq!(rig.exec("device control heater 1"), "Set pin 'heater' to 1\n");
        assert_eq!(rig.board.level(15), Some(Level::High));
        assert_eq!(rig.exec("device read heater"), "Pin 'heater': 1\n");

        assert_eq!(rig.exec("device control heater off"), "Set pin 'heater' to 0\n");
        assert_eq!(rig.board.level(15), Some(Level::Low));
    }

    #[test]
    fn test_input_keeps_pull() {
        let mut rig = Rig::new();

        assert_eq!(
            rig.exec("device register button 14 in up"),
            "Registered device 'button' on pin 14 (in, pull-up)\n"
        );
        assert_eq!(rig.board.pull(14), Some(Pull::Up));

        rig.exec("device register switch 13 in down");
        assert_eq!(rig.board.pull(13), Some(Pull::Down));
        rig.exec("device register door 12 in");
        assert_eq!(rig.board.pull(12), Some(Pull::None));
    }

    #[test]
    fn test_adc_reports_voltage() {
        let mut rig = Rig::new();
        rig.board.set_sample(26, 31_744);

        rig.exec("device register sensor 26 adc");
        assert_eq!(rig.exec("device read sensor"), "ADC 'sensor': 31744 (1.60V)\n");
    }

    #[test]
    fn test_adc_on_plain_pin_is_refused() {
        let mut rig = Rig::new();

        let out = rig.exec("device register sensor 15 adc");
        assert_eq!(out, "Error: Pin 15 is not an ADC pin\n");
        assert_eq!(rig.devices.len(), 0);
    }

    #[test]
    fn test_reserved_pin_is_minor_fault() {
        let mut rig = Rig::new();

        let out = rig.exec("device register led 25 out");
        assert_eq!(out, "Error: Pin 25 is reserved for LED\n");
        assert_eq!(rig.devices.len(), 0);
        assert_eq!(rig.led.flashes(), bracket_and(5));
        assert!(!rig.led.is_lit());
    }

    #[test]
    fn test_reserved_pin_refused_in_every_mode() {
        let mut rig = Rig::new();

        for mode in ["out", "in", "adc", "pwm"] {
            let out = rig.exec(&format!("device register t {} {}", 4, mode));
            assert!(out.contains("reserved"), "mode {}: {}", mode, out);
        }
        assert!(rig.devices.is_empty());
    }

    #[test]
    fn test_conflicts() {
        let mut rig = Rig::new();
        rig.exec("device register heater 15 out");

        assert_eq!(
            rig.exec("device register fan 15 pwm"),
            "Error: Pin 15 is already used by 'heater'\n"
        );
        assert_eq!(
            rig.exec("device register heater 16 out"),
            "Error: Device 'heater' already exists\n"
        );
        assert_eq!(rig.devices.len(), 1);
    }

    #[test]
    fn test_bad_arguments() {
        let mut rig = Rig::new();

        assert_eq!(
            rig.exec("device register heater fifteen out"),
            "Error: Invalid pin: 'fifteen'\n"
        );
        assert_eq!(
            rig.exec("device register heater 15"),
            "Error: Usage: device register <name> <pin> <in|out|adc|pwm> [up|down]\n"
        );
        assert!(rig.exec("device register heater 15 sideways").starts_with("Error: Unknown mode"));

        rig.exec("device register heater 15 out");
        assert_eq!(
            rig.exec("device control heater maybe"),
            "Error: Invalid level: 'maybe'\n"
        );
    }

    #[test]
    fn test_unknown_device() {
        let mut rig = Rig::new();

        assert_eq!(rig.exec("device read ghost"), "Error: Pin 'ghost' not found\n");
        assert_eq!(rig.exec("device freq ghost 50"), "Error: PWM 'ghost' not found\n");
    }

    #[test]
    fn test_pwm_duty_and_frequency() {
        let mut rig = Rig::new();

        rig.exec("device register fan 16 pwm");
        assert_eq!(rig.board.frequency(16), Some(1000));

        assert_eq!(rig.exec("device control fan 50"), "Set PWM 'fan' duty to 50%\n");
        assert_eq!(rig.board.duty(16), Some(32768));

        assert_eq!(
            rig.exec("device freq fan 2000"),
            "Set PWM 'fan' frequency to 2000 Hz\n"
        );
        assert_eq!(rig.board.frequency(16), Some(2000));

        assert_eq!(rig.exec("device freq fan 0"), "Error: Invalid frequency: '0'\n");
        assert_eq!(rig.board.frequency(16), Some(2000));
    }

    #[test]
    fn test_pwm_duty_tracks_percent() {
        let mut rig = Rig::new();
        let mut rng = rand::thread_rng();
        rig.exec("device register fan 16 pwm");

        for _ in 0..50 {
            let percent: u8 = rng.gen_range(0..=100);
            rig.exec(&format!("device control fan {}", percent));
            let expected = (percent as u32 * 65_535 + 50) / 100;
            assert_eq!(rig.board.duty(16), Some(expected as u16), "{}%", percent);
        }
    }

    #[test]
    fn test_pwm_duty_out_of_range() {
        let mut rig = Rig::new();
        rig.exec("device register fan 16 pwm");
        rig.exec("device control fan 25");

        assert_eq!(
            rig.exec("device control fan 150"),
            "Error: Invalid duty cycle (0-100): '150'\n"
        );
        assert_eq!(rig.board.duty(16), Some(16384));
    }

    #[test]
    fn test_hardware_fault_is_critical() {
        let mut rig = Rig::new();
        rig.board.break_pin(17);

        let out = rig.exec("device register motor 17 out");
        assert_eq!(out, "Error: Hardware error: hardware fault\n");
        assert_eq!(rig.led.flashes(), bracket_and(3));
        assert_eq!(rig.delay.waited_ms, 3 * 2 * 500);
        assert!(rig.devices.is_empty());
    }

    #[test]
    fn test_list() {
        let mut rig = Rig::new();
        assert_eq!(rig.exec("device list"), "\nRegistered Devices:\n  (none)\n");

        rig.exec("device register heater 15 out");
        rig.exec("device register sensor 26 adc");
        rig.exec("device register fan 16 pwm");
        let out = rig.exec("device list");
        assert!(out.contains("Digital Pins:\n  heater: GPIO 15 (out)\n"));
        assert!(out.contains("ADC Pins:\n  sensor: ADC 26\n"));
        assert!(out.contains("PWM Pins:\n  fan: PWM 16\n"));
    }

    #[test]
    fn test_shutdown_releases_pwm_once() {
        let mut rig = Rig::new();
        rig.exec("device register fan 16 pwm");
        rig.exec("device register heater 15 out");

        let mut shell = Shell::new(rig.ctx());
        shell.shutdown();
        drop(shell);

        assert_eq!(rig.board.deinit_count(16), 1);
        assert_eq!(rig.board.deinit_count(15), 0);
        assert!(rig.devices.is_empty());
        assert!(rig.console.output.ends_with("\nExiting...\n"));
        assert!(!rig.led.is_lit());
    }

    #[test]
    fn test_ctrl_c_runs_shutdown() {
        let mut rig = Rig::new().input("device register fan 16 pwm\r\n\x03");

        let mut shell = Shell::new(rig.ctx());
        shell.run();
        drop(shell);

        assert_eq!(rig.board.deinit_count(16), 1);
        assert!(rig.console.output.contains("Registered device 'fan' on pin 16 (pwm)"));
        assert!(rig.console.output.ends_with("Exiting...\n"));
    }
}
