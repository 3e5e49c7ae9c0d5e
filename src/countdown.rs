use crate::error::{FocusError, Result};

pub const TICK_INTERVAL_MS: u64 = 1000;

/// Pure countdown step: `(next_seconds, completed)`.
///
/// Anything at or below one second collapses straight to `(0, true)`.
pub fn tick(seconds_remaining: u32) -> (u32, bool) {
    if seconds_remaining <= 1 {
        (0, true)
    } else {
        (seconds_remaining - 1, false)
    }
}

/// Format seconds as `MM:SS`; minutes are not wrapped at an hour
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    Remaining(u32),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    total_seconds: u32,
    seconds_remaining: u32,
    completed: bool,
}

impl Countdown {
    pub fn new(duration_minutes: u32) -> Result<Self> {
        if duration_minutes == 0 {
            return Err(FocusError::InvalidDuration(duration_minutes));
        }
        let total_seconds = duration_minutes
            .checked_mul(60)
            .ok_or_else(|| FocusError::InvalidArgument("focus duration too long".to_string()))?;

        Ok(Self {
            total_seconds,
            seconds_remaining: total_seconds,
            completed: false,
        })
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn seconds_elapsed(&self) -> u32 {
        self.total_seconds - self.seconds_remaining
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advance by one second. Returns `None` once completion has already fired.
    pub fn tick(&mut self) -> Option<CountdownStep> {
        if self.completed {
            return None;
        }

        let (next, completed) = tick(self.seconds_remaining);
        self.seconds_remaining = next;
        if completed {
            self.completed = true;
            Some(CountdownStep::Completed)
        } else {
            Some(CountdownStep::Remaining(next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tick_from_two() {
        assert_eq!(tick(2), (1, false));
        assert_eq!(tick(1), (0, true));
    }

    #[test]
    fn test_tick_at_zero_stays_zero() {
        assert_eq!(tick(0), (0, true));
    }

    #[test]
    fn test_countdown_new_rejects_zero() {
        assert_eq!(Countdown::new(0), Err(FocusError::InvalidDuration(0)));
    }

    #[test]
    fn test_countdown_completes_once() {
        let mut countdown = Countdown::new(1).unwrap();
        assert_eq!(countdown.seconds_remaining(), 60);

        for expected in (1..60).rev() {
            assert_eq!(countdown.tick(), Some(CountdownStep::Remaining(expected)));
        }
        assert_eq!(countdown.tick(), Some(CountdownStep::Completed));
        assert!(countdown.is_completed());
        assert_eq!(countdown.seconds_remaining(), 0);
        assert_eq!(countdown.seconds_elapsed(), 60);

        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.seconds_remaining(), 0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(17 * 60), "17:00");
        assert_eq!(format_clock(50 * 60 + 9), "50:09");
        assert_eq!(format_clock(100 * 60), "100:00");
    }

    proptest! {
        #[test]
        fn reaches_zero_after_exactly_duration_ticks(minutes in 1u32..=50) {
            let mut countdown = Countdown::new(minutes).unwrap();
            let mut ticks = 0u32;
            let mut completions = 0u32;

            while let Some(step) = countdown.tick() {
                ticks += 1;
                if step == CountdownStep::Completed {
                    completions += 1;
                }
            }

            prop_assert_eq!(ticks, minutes * 60);
            prop_assert_eq!(completions, 1);
            prop_assert_eq!(countdown.seconds_remaining(), 0);
        }
    }
}
