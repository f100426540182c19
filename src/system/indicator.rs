//! Status LED patterns.
//!
//! The LED is lit while a command runs, flashes a fault pattern when one
//! fails, and gives a short idle pulse every few seconds so a stalled board
//! is easy to spot.

use crate::config::BoardConfig;
use crate::hal::{Delay, Indicator};

use super::error::Severity;

/// A run of identical flashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashPattern {
    /// Number of flashes.
    pub count: u8,
    /// On-time, also used as the off-time after each flash.
    pub duration_ms: u32,
}

impl Severity {
    /// The flash pattern for this severity.
    pub const fn pattern(self) -> FlashPattern {
        match self {
            Severity::Minor => FlashPattern {
                count: 5,
                duration_ms: 100,
            },
            Severity::Critical => FlashPattern {
                count: 3,
                duration_ms: 500,
            },
        }
    }
}

/// Play `pattern` on the indicator. Leaves it off.
pub fn flash(indicator: &mut dyn Indicator, delay: &mut dyn Delay, pattern: FlashPattern) {
    for _ in 0..pattern.count {
        indicator.set(true);
        delay.delay_ms(pattern.duration_ms);
        indicator.set(false);
        delay.delay_ms(pattern.duration_ms);
    }
}

/// Signal a failed command.
pub fn signal_fault(indicator: &mut dyn Indicator, delay: &mut dyn Delay, severity: Severity) {
    flash(indicator, delay, severity.pattern());
}

/// Schedule for the idle pulse.
///
/// The firmware calls [`IdleBlink::poll`] from its periodic timer or main
/// loop with a monotonic millisecond clock; when it returns `true` the
/// caller runs [`IdleBlink::pulse`]. The schedule only ever touches the
/// indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleBlink {
    period_ms: u32,
    pulse_ms: u32,
    next_due_ms: u64,
}

impl IdleBlink {
    /// Schedule from the board's idle timing, first pulse one period from `now_ms`.
    pub fn new(config: &BoardConfig, now_ms: u64) -> Self {
        Self {
            period_ms: config.idle_period_ms,
            pulse_ms: config.idle_pulse_ms,
            next_due_ms: now_ms + config.idle_period_ms as u64,
        }
    }

    /// Milliseconds between pulses.
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Whether a pulse is due at `now_ms`. Advances the schedule when it is.
    ///
    /// Missed periods are skipped rather than replayed in a burst.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        let period = self.period_ms.max(1) as u64;
        let missed = (now_ms - self.next_due_ms) / period;
        self.next_due_ms += (missed + 1) * period;
        true
    }

    /// One idle pulse.
    pub fn pulse(&self, indicator: &mut dyn Indicator, delay: &mut dyn Delay) {
        indicator.set(true);
        delay.delay_ms(self.pulse_ms);
        indicator.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PICO;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        states: Vec<bool>,
    }

    impl Indicator for Recorder {
        fn set(&mut self, on: bool) {
            self.states.push(on);
        }
    }

    struct Waits<'a>(&'a mut Vec<u32>);

    impl Delay for Waits<'_> {
        fn delay_ms(&mut self, ms: u32) {
            self.0.push(ms);
        }
    }

    #[test]
    fn test_minor_pattern() {
        let mut led = Recorder::default();
        let mut waited = Vec::new();
        signal_fault(&mut led, &mut Waits(&mut waited), Severity::Minor);

        assert_eq!(led.states.len(), 10);
        assert_eq!(led.states.iter().filter(|on| **on).count(), 5);
        assert_eq!(led.states.last(), Some(&false));
        assert!(waited.iter().all(|ms| *ms == 100));
    }

    #[test]
    fn test_critical_pattern() {
        let mut led = Recorder::default();
        let mut waited = Vec::new();
        signal_fault(&mut led, &mut Waits(&mut waited), Severity::Critical);

        assert_eq!(led.states.iter().filter(|on| **on).count(), 3);
        assert_eq!(waited.iter().sum::<u32>(), 3000);
    }

    #[test]
    fn test_idle_schedule() {
        let mut idle = IdleBlink::new(&PICO, 0);
        assert!(!idle.poll(4999));
        assert!(idle.poll(5000));
        assert!(!idle.poll(5001));
        assert!(idle.poll(10_000));
    }

    #[test]
    fn test_idle_skips_missed_periods() {
        let mut idle = IdleBlink::new(&PICO, 0);
        assert!(idle.poll(23_000));
        assert!(!idle.poll(24_999));
        assert!(idle.poll(25_000));
    }

    #[test]
    fn test_idle_pulse() {
        let idle = IdleBlink::new(&PICO, 0);
        let mut led = Recorder::default();
        let mut waited = Vec::new();
        idle.pulse(&mut led, &mut Waits(&mut waited));
        assert_eq!(led.states, [true, false]);
        assert_eq!(waited, [100]);
    }
}
