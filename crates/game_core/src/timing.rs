use std::time::Duration;

use shared::domain::RoundSize;

pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);
const SCRAMBLE_PAUSE_UNITS: u32 = 2;
const WIN_NOTICE_DIVISOR: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTiming {
    time_unit: Duration,
}

impl RoundTiming {
    pub fn new(time_unit: Duration) -> Self {
        Self { time_unit }
    }

    pub fn time_unit(&self) -> Duration {
        self.time_unit
    }

    pub fn memorize_delay(&self, size: RoundSize) -> Duration {
        self.time_unit.saturating_mul(size.get())
    }

    pub fn scramble_pause(&self) -> Duration {
        self.time_unit.saturating_mul(SCRAMBLE_PAUSE_UNITS)
    }

    pub fn win_notice_delay(&self) -> Duration {
        self.time_unit / WIN_NOTICE_DIVISOR
    }
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_UNIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_scale_with_time_unit() {
        let timing = RoundTiming::new(Duration::from_millis(200));
        let size = RoundSize::new(4).expect("size");
        assert_eq!(timing.memorize_delay(size), Duration::from_millis(800));
        assert_eq!(timing.scramble_pause(), Duration::from_millis(400));
        assert_eq!(timing.win_notice_delay(), Duration::from_millis(20));
    }

    #[test]
    fn huge_time_unit_saturates() {
        let timing = RoundTiming::new(Duration::from_millis(u64::MAX));
        let size = RoundSize::new(7).expect("size");
        assert_eq!(timing.memorize_delay(size), Duration::MAX);
        assert_eq!(timing.scramble_pause(), Duration::MAX);
        assert_eq!(
            timing.win_notice_delay(),
            Duration::from_millis(u64::MAX) / 10
        );
    }
}
