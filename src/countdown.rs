use std::fmt;
use std::time::{Duration, Instant};

use tracing::info;

/// What the overlay should be showing right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Remaining(u64),
    GameOver,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Frame::Remaining(secs) => write!(
                f,
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ),
            Frame::GameOver => write!(f, "GAME OVER"),
        }
    }
}

#[derive(Debug)]
pub struct Countdown {
    start: Instant,
    initial: u64,
    expired: bool,
}

impl Countdown {
    pub fn new(initial_seconds: u64) -> Countdown {
        Countdown {
            start: Instant::now(),
            initial: initial_seconds,
            expired: false,
        }
    }

    pub fn initial_seconds(&self) -> u64 {
        self.initial
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Time since the countdown started, on the monotonic clock
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// The frame after `elapsed` has passed since the start. Once the
    /// countdown has hit zero it stays expired, whatever `elapsed` says.
    pub fn frame_at(&mut self, elapsed: Duration) -> Frame {
        let remaining = self.initial.saturating_sub(elapsed.as_secs());
        if remaining == 0 && !self.expired {
            self.expired = true;
            info!("countdown of {}s expired", self.initial);
        }
        if self.expired {
            Frame::GameOver
        } else {
            Frame::Remaining(remaining)
        }
    }

    /// Wall-clock time at which we'll hit zero, if it's representable
    pub fn deadline(&self) -> Option<chrono::DateTime<chrono::Local>> {
        let left = Duration::from_secs(self.initial).checked_sub(self.start.elapsed())?;
        let left = chrono::Duration::from_std(left).ok()?;
        chrono::Local::now().checked_add_signed(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(Frame::Remaining(3661).to_string(), "01:01:01");
        assert_eq!(Frame::Remaining(59).to_string(), "00:00:59");
        assert_eq!(Frame::Remaining(3600).to_string(), "01:00:00");
        assert_eq!(Frame::Remaining(0).to_string(), "00:00:00");
    }

    #[test]
    fn hours_are_not_truncated() {
        assert_eq!(Frame::Remaining(100 * 3600 + 5).to_string(), "100:00:05");
    }

    #[test]
    fn game_over_text() {
        assert_eq!(Frame::GameOver.to_string(), "GAME OVER");
    }

    #[test]
    fn counts_down_by_whole_seconds() {
        let mut c = Countdown::new(90);
        assert_eq!(c.frame_at(Duration::from_millis(0)), Frame::Remaining(90));
        assert_eq!(c.frame_at(Duration::from_millis(999)), Frame::Remaining(90));
        assert_eq!(c.frame_at(Duration::from_millis(1000)), Frame::Remaining(89));
        assert_eq!(c.frame_at(Duration::from_secs(89)), Frame::Remaining(1));
        assert!(!c.is_expired());
    }

    #[test]
    fn expires_at_zero_and_stays_expired() {
        let mut c = Countdown::new(10);
        assert_eq!(c.frame_at(Duration::from_secs(10)), Frame::GameOver);
        assert!(c.is_expired());
        assert_eq!(c.frame_at(Duration::from_secs(500)), Frame::GameOver);
        // a smaller elapsed never brings it back
        assert_eq!(c.frame_at(Duration::from_secs(3)), Frame::GameOver);
        assert!(c.is_expired());
    }

    #[test]
    fn zero_length_countdown_is_over_immediately() {
        let mut c = Countdown::new(0);
        assert_eq!(c.frame_at(Duration::from_secs(0)), Frame::GameOver);
    }

    #[test]
    fn fresh_countdown_has_a_deadline() {
        let c = Countdown::new(3600);
        assert_eq!(c.initial_seconds(), 3600);
        let deadline = c.deadline().unwrap();
        assert!(deadline > chrono::Local::now());
    }
}
