//! Daily wall-clock schedule in a fixed UTC offset
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveTime, TimeZone, Utc};
use log::info;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Fires once per day at `time` in `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    time: NaiveTime,
    offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// First firing strictly after `now`
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_date = now.with_timezone(&self.offset).date_naive();
        let today = self.to_utc(local_date.and_time(self.time));
        if today > now {
            today
        } else {
            today + ChronoDuration::days(1)
        }
    }

    /// Time left until the next firing after `now`
    pub fn until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    fn to_utc(&self, local: chrono::NaiveDateTime) -> DateTime<Utc> {
        let utc = local - ChronoDuration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc)
    }

    /// Run `job` at every firing, forever
    pub async fn run<F, Fut>(self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut next = self.next_after(Utc::now());
        loop {
            info!("⏰ Next daily delivery at {next}");
            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;

            job().await;

            // Anchor on the planned time so an early wake-up cannot fire twice
            next = self.next_after(next.max(Utc::now()));
        }
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "daily at {} (UTC{})", self.time.format("%H:%M"), self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moscow_1130() -> DailySchedule {
        DailySchedule::new(
            NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            FixedOffset::east_opt(3 * 3600).unwrap(),
        )
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_next_after_same_day() {
        let next = moscow_1130().next_after(utc("2024-03-10T06:00:00Z"));
        assert_eq!(next, utc("2024-03-10T08:30:00Z"));
    }

    #[test]
    fn test_next_after_rolls_to_tomorrow() {
        let next = moscow_1130().next_after(utc("2024-03-10T09:00:00Z"));
        assert_eq!(next, utc("2024-03-11T08:30:00Z"));
    }

    #[test]
    fn test_exact_time_goes_to_next_day() {
        let next = moscow_1130().next_after(utc("2024-03-10T08:30:00Z"));
        assert_eq!(next, utc("2024-03-11T08:30:00Z"));
    }

    #[test]
    fn test_local_date_differs_from_utc_date() {
        // 22:00 UTC is already 01:00 next day in +03:00
        let next = moscow_1130().next_after(utc("2024-12-31T22:00:00Z"));
        assert_eq!(next, utc("2025-01-01T08:30:00Z"));
    }

    #[test]
    fn test_negative_offset() {
        let schedule = DailySchedule::new(
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            FixedOffset::west_opt(5 * 3600).unwrap(),
        );
        // 23:00 local on March 9th
        let next = schedule.next_after(utc("2024-03-10T04:00:00Z"));
        assert_eq!(next, utc("2024-03-11T01:00:00Z"));
    }

    #[test]
    fn test_until_next() {
        let wait = moscow_1130().until_next(utc("2024-03-10T08:00:00Z"));
        assert_eq!(wait, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_display() {
        assert_eq!(moscow_1130().to_string(), "daily at 11:30 (UTC+03:00)");
    }
}
