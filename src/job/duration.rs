// src/job/duration.rs

//! Non-negative time spans used for walltime and cpu-time.
//!
//! Two textual forms are accepted:
//! - `HH:MM:SS`, the form every scheduler directive is rendered in;
//! - `<integer><unit>` shorthand with unit `d`, `h`, `m` or nothing.
//!   A missing unit means hours (`"24"` is 24 hours), kept for compatibility
//!   with existing job files.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::errors::{BatchsubError, Result};

static SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+)\s*([dhm]?)$").expect("valid shorthand regex"));

static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2})$").expect("valid clock regex"));

/// Whole-second, non-negative duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct JobDuration {
    seconds: u64,
}

impl JobDuration {
    pub const fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self {
            seconds: hours * 3600,
        }
    }

    pub const fn as_secs(self) -> u64 {
        self.seconds
    }

    /// Scale by an integer factor, saturating on overflow.
    pub fn scaled(self, factor: u64) -> Self {
        Self {
            seconds: self.seconds.saturating_mul(factor),
        }
    }

    /// Render as zero-padded `HH:MM:SS`. Hours are not capped at 24.
    pub fn to_hms(self) -> String {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl fmt::Display for JobDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hms())
    }
}

impl FromStr for JobDuration {
    type Err = BatchsubError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(caps) = CLOCK.captures(s) {
            let hours = parse_component(&caps[1], s)?;
            let minutes = parse_component(&caps[2], s)?;
            let seconds = parse_component(&caps[3], s)?;
            if minutes >= 60 || seconds >= 60 {
                return Err(BatchsubError::InvalidDuration(format!(
                    "minutes and seconds must be below 60 in {s:?}"
                )));
            }
            return hours
                .checked_mul(3600)
                .and_then(|h| h.checked_add(minutes * 60 + seconds))
                .map(JobDuration::from_secs)
                .ok_or_else(|| BatchsubError::InvalidDuration(format!("{s:?} is too large")));
        }

        let caps = SHORTHAND.captures(s).ok_or_else(|| {
            BatchsubError::InvalidDuration(format!(
                "{s:?} is neither HH:MM:SS nor <integer><d|h|m>"
            ))
        })?;

        let amount: i64 = caps[1]
            .parse()
            .map_err(|_| BatchsubError::InvalidDuration(format!("{s:?} is out of range")))?;

        let unit_seconds: i64 = match &caps[2] {
            "d" => 86_400,
            "m" => 60,
            // "h" and the bare number both mean hours.
            _ => 3_600,
        };

        let total = amount
            .checked_mul(unit_seconds)
            .ok_or_else(|| BatchsubError::InvalidDuration(format!("{s:?} is out of range")))?;

        total.into_job_duration()
    }
}

fn parse_component(digits: &str, whole: &str) -> Result<u64> {
    digits
        .parse()
        .map_err(|_| BatchsubError::InvalidDuration(format!("{whole:?} is out of range")))
}

/// Anything that can be turned into a [`JobDuration`], possibly failing.
///
/// Lets the job setters accept `JobDuration`, `std::time::Duration`, signed
/// second counts and shorthand strings through one signature.
pub trait IntoJobDuration {
    fn into_job_duration(self) -> Result<JobDuration>;
}

impl IntoJobDuration for JobDuration {
    fn into_job_duration(self) -> Result<JobDuration> {
        Ok(self)
    }
}

impl IntoJobDuration for Duration {
    fn into_job_duration(self) -> Result<JobDuration> {
        Ok(JobDuration::from_secs(self.as_secs()))
    }
}

impl IntoJobDuration for i64 {
    fn into_job_duration(self) -> Result<JobDuration> {
        u64::try_from(self)
            .map(JobDuration::from_secs)
            .map_err(|_| BatchsubError::InvalidDuration(format!("negative duration: {self}s")))
    }
}

impl IntoJobDuration for &str {
    fn into_job_duration(self) -> Result<JobDuration> {
        self.parse()
    }
}

impl IntoJobDuration for String {
    fn into_job_duration(self) -> Result<JobDuration> {
        self.as_str().parse()
    }
}

impl IntoJobDuration for &String {
    fn into_job_duration(self) -> Result<JobDuration> {
        self.as_str().parse()
    }
}
