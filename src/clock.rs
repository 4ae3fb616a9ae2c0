use chrono::{Duration, NaiveDateTime};

pub fn minutes_between(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}

pub fn add_minutes(instant: NaiveDateTime, minutes: f64) -> NaiveDateTime {
    instant + Duration::milliseconds((minutes * 60_000.0).round() as i64)
}
