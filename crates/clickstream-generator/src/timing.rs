//! Random dates and the per-session clock.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use clickstream_core::GenerationWindow;
use rand::Rng;
use std::ops::RangeInclusive;

/// Draw a random moment in the window: a uniform day in `[start, end)`,
/// then a uniform time of day at second granularity.
pub fn random_datetime<R: Rng + ?Sized>(rng: &mut R, window: &GenerationWindow) -> NaiveDateTime {
    let day = window.start() + Duration::days(rng.gen_range(0..window.days()));
    let hour = rng.gen_range(0..=23);
    let minute = rng.gen_range(0..=59);
    let second = rng.gen_range(0..=59);
    // hour/minute/second are always in range, so the fallback is unreachable
    let time = NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN);
    day.and_time(time)
}

/// Simulated clock for one session's journey.
///
/// The clock only moves forward. Every emitted event is stamped with the
/// current time, and the latest stamp is remembered so the session's end
/// can be stretched to cover it.
#[derive(Debug, Clone)]
pub struct SessionClock {
    now: NaiveDateTime,
    end: NaiveDateTime,
    last_stamp: Option<NaiveDateTime>,
}

impl SessionClock {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            now: start,
            end,
            last_stamp: None,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Stamp an event at the current time.
    pub fn stamp(&mut self) -> NaiveDateTime {
        self.last_stamp = Some(self.now);
        self.now
    }

    /// Move the clock forward by a uniform number of seconds.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, seconds: RangeInclusive<i64>) {
        self.now += Duration::seconds(rng.gen_range(seconds));
    }

    /// True once the clock has reached the session's nominal end.
    pub fn past_end(&self) -> bool {
        self.now >= self.end
    }

    /// Timestamp of the most recent event, if any.
    pub fn last_stamp(&self) -> Option<NaiveDateTime> {
        self.last_stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn window() -> GenerationWindow {
        GenerationWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_random_datetime_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let window = window();
        let start = window.start().and_time(NaiveTime::MIN);
        let end = window.end().and_time(NaiveTime::MIN);

        for _ in 0..500 {
            let dt = random_datetime(&mut rng, &window);
            assert!(dt >= start && dt < end, "{dt} outside window");
            assert_eq!(dt.nanosecond(), 0);
        }
    }

    #[test]
    fn test_single_day_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let window = GenerationWindow::new(day, day.succ_opt().unwrap()).unwrap();
        for _ in 0..50 {
            assert_eq!(random_datetime(&mut rng, &window).date(), day);
        }
    }

    #[test]
    fn test_clock_advances_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = window().start().and_time(NaiveTime::MIN);
        let mut clock = SessionClock::new(start, start + Duration::minutes(1));

        assert_eq!(clock.last_stamp(), None);
        assert_eq!(clock.stamp(), start);

        clock.advance(&mut rng, 5..=30);
        let elapsed = (clock.now() - start).num_seconds();
        assert!((5..=30).contains(&elapsed));
        assert_eq!(clock.last_stamp(), Some(start));
        assert!(!clock.past_end());

        clock.advance(&mut rng, 60..=60);
        assert!(clock.past_end());
    }
}
