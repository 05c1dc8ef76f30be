//! Wait-gate scheduling: the mandatory randomized pause between grading one
//! answer and serving the next question. Expiry is polled by the client
//! re-calling `next_question`; no background timer exists.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::AdaptiveSettings;

/// Samples a uniform wait in `[wait_time_min, wait_time_max]` inclusive and
/// returns it with the absolute deadline `now + wait`.
pub fn schedule(settings: &AdaptiveSettings, now: DateTime<Utc>) -> (u32, DateTime<Utc>) {
    let min = settings.wait_time_min;
    let max = settings.wait_time_max.max(min);
    let wait = rand::rng().random_range(min..=max);
    (wait, now + Duration::seconds(i64::from(wait)))
}

/// Whole seconds until `wait_until`, rounded up, never negative.
pub fn remaining_seconds(wait_until: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (wait_until - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        ((millis + 999) / 1000) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_window_is_exact() {
        let settings = AdaptiveSettings {
            wait_time_min: 1,
            wait_time_max: 1,
            ..Default::default()
        };
        let now = Utc::now();
        let (wait, until) = schedule(&settings, now);
        assert_eq!(wait, 1);
        assert_eq!(until, now + Duration::seconds(1));
    }

    #[test]
    fn samples_stay_inside_inclusive_bounds() {
        let settings = AdaptiveSettings {
            wait_time_min: 5,
            wait_time_max: 10,
            ..Default::default()
        };
        let now = Utc::now();
        for _ in 0..200 {
            let (wait, _) = schedule(&settings, now);
            assert!((5..=10).contains(&wait));
        }
    }

    #[test]
    fn inverted_bounds_fall_back_to_min() {
        let settings = AdaptiveSettings {
            wait_time_min: 7,
            wait_time_max: 3,
            ..Default::default()
        };
        let (wait, _) = schedule(&settings, Utc::now());
        assert_eq!(wait, 7);
    }

    #[test]
    fn remaining_rounds_up() {
        let now = Utc::now();
        assert_eq!(
            remaining_seconds(now + Duration::milliseconds(1500), now),
            2
        );
        assert_eq!(remaining_seconds(now + Duration::seconds(3), now), 3);
    }

    #[test]
    fn remaining_never_negative() {
        let now = Utc::now();
        assert_eq!(remaining_seconds(now - Duration::seconds(5), now), 0);
        assert_eq!(remaining_seconds(now, now), 0);
    }
}
