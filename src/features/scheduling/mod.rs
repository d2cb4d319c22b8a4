//! # Scheduling Feature
//!
//! Wall-clock daily schedule and cancellable one-shot delayed jobs.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Delayed jobs keyed by subscriber, cancellable on opt-out
//! - 1.0.0: Daily schedule with fixed UTC offset

pub mod daily;
pub mod delayed;

pub use daily::DailySchedule;
pub use delayed::DelayedJobs;
