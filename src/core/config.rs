//! # Configuration
//!
//! Environment-driven configuration for the courier bot. Values are read once
//! at startup (after `.env` is loaded) and validated before anything connects.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add per-send timeout and reviewer display name
//! - 1.0.0: Initial release with schedule, batch and storage settings

use anyhow::{anyhow, Context, Result};
use chrono::{FixedOffset, NaiveTime};
use std::path::PathBuf;
use std::time::Duration;

use crate::features::scheduling::DailySchedule;

const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_SUBSCRIBERS_PATH: &str = "subscribers.json";
const DEFAULT_BATCH_SIZE: usize = 3;
const DEFAULT_WELCOME_DELAY_SECS: u64 = 30;
const DEFAULT_DAILY_TIME: &str = "11:30";
const DEFAULT_DAILY_UTC_OFFSET: &str = "+03:00";
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REVIEWER_NAME: &str = "the reviewer";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    /// Discord user id that receives relayed replies
    pub reviewer_id: u64,
    pub reviewer_name: String,
    pub content_dir: PathBuf,
    pub subscribers_path: PathBuf,
    /// Items drawn per category for every delivery
    pub batch_size: usize,
    pub welcome_delay: Duration,
    pub daily_schedule: DailySchedule,
    pub send_timeout: Duration,
    pub log_level: String,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token =
            get("DISCORD_TOKEN").ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let reviewer_id = get("REVIEWER_ID")
            .ok_or_else(|| anyhow!("REVIEWER_ID must be set"))?
            .trim()
            .parse::<u64>()
            .context("REVIEWER_ID must be a Discord user id")?;

        let batch_size = match get("BATCH_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("BATCH_SIZE must be a positive integer")?,
            None => DEFAULT_BATCH_SIZE,
        };
        if batch_size == 0 {
            return Err(anyhow!("BATCH_SIZE must be at least 1"));
        }

        let welcome_delay = Duration::from_secs(parse_secs(
            get("WELCOME_DELAY_SECS"),
            "WELCOME_DELAY_SECS",
            DEFAULT_WELCOME_DELAY_SECS,
        )?);
        let send_timeout = Duration::from_secs(parse_secs(
            get("SEND_TIMEOUT_SECS"),
            "SEND_TIMEOUT_SECS",
            DEFAULT_SEND_TIMEOUT_SECS,
        )?);
        if send_timeout.is_zero() {
            return Err(anyhow!("SEND_TIMEOUT_SECS must be at least 1"));
        }

        let time_raw = get("DAILY_TIME").unwrap_or_else(|| DEFAULT_DAILY_TIME.to_string());
        let time = NaiveTime::parse_from_str(time_raw.trim(), "%H:%M")
            .with_context(|| format!("DAILY_TIME must be HH:MM, got '{time_raw}'"))?;

        let offset_raw =
            get("DAILY_UTC_OFFSET").unwrap_or_else(|| DEFAULT_DAILY_UTC_OFFSET.to_string());
        let offset = parse_utc_offset(&offset_raw)?;

        Ok(Self {
            discord_token,
            discord_guild_id: get("DISCORD_GUILD_ID"),
            reviewer_id,
            reviewer_name: get("REVIEWER_NAME")
                .unwrap_or_else(|| DEFAULT_REVIEWER_NAME.to_string()),
            content_dir: PathBuf::from(
                get("CONTENT_DIR").unwrap_or_else(|| DEFAULT_CONTENT_DIR.to_string()),
            ),
            subscribers_path: PathBuf::from(
                get("SUBSCRIBERS_PATH").unwrap_or_else(|| DEFAULT_SUBSCRIBERS_PATH.to_string()),
            ),
            batch_size,
            welcome_delay,
            daily_schedule: DailySchedule::new(time, offset),
            send_timeout,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
        None => Ok(default),
    }
}

/// Parse a fixed UTC offset such as `+03:00`, `-0530` or `Z`
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow!("invalid UTC offset"));
    }

    let (sign, rest) = match raw.chars().next() {
        Some('+') => (1, &raw[1..]),
        Some('-') => (-1, &raw[1..]),
        _ => return Err(anyhow!("UTC offset must start with '+' or '-': '{raw}'")),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("UTC offset must look like +HH:MM: '{raw}'"));
    }

    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = digits[2..].parse()?;
    if hours > 14 || minutes > 59 {
        return Err(anyhow!("UTC offset out of range: '{raw}'"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow!("UTC offset out of range: '{raw}'"))
}
