//! JQL construction for incremental change queries.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{JiraError, Result};

/// Date pattern accepted by JQL date comparisons (minute precision)
pub const JQL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Timezone in which JQL dates are written.
///
/// Jira interprets JQL dates in the timezone of the querying user, so this has
/// to match that user's profile setting for the window to line up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JqlTimezone {
    #[default]
    Utc,
    /// Timezone of the machine running the poller
    Local,
    Fixed(FixedOffset),
}

impl JqlTimezone {
    /// Fixed offset from UTC in hours and minutes (minutes carry the sign of hours)
    pub fn offset(hours: i32, minutes: i32) -> Result<Self> {
        let seconds = hours * 3600 + minutes * 60;
        FixedOffset::east_opt(seconds)
            .map(JqlTimezone::Fixed)
            .ok_or_else(|| {
                JiraError::Configuration(format!("Timezone offset out of range: {}s", seconds))
            })
    }
}

impl fmt::Display for JqlTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JqlTimezone::Utc => f.write_str("UTC"),
            JqlTimezone::Local => f.write_str("local"),
            JqlTimezone::Fixed(offset) => write!(f, "UTC{}", offset),
        }
    }
}

impl FromStr for JqlTimezone {
    type Err = JiraError;

    /// Accepts `UTC`, `GMT`, `Z`, `local`, and offsets such as `GMT+1:00`,
    /// `UTC-05:30`, `+02:00` or `-0330`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        match lower.as_str() {
            "utc" | "gmt" | "z" => return Ok(JqlTimezone::Utc),
            "local" => return Ok(JqlTimezone::Local),
            _ => {}
        }

        let offset = lower
            .strip_prefix("utc")
            .or_else(|| lower.strip_prefix("gmt"))
            .unwrap_or(&lower);

        let seconds = parse_offset_seconds(offset)
            .ok_or_else(|| JiraError::Configuration(format!("Unknown timezone '{}'", trimmed)))?;

        if seconds == 0 {
            return Ok(JqlTimezone::Utc);
        }
        FixedOffset::east_opt(seconds)
            .map(JqlTimezone::Fixed)
            .ok_or_else(|| JiraError::Configuration(format!("Timezone out of range '{}'", trimmed)))
    }
}

impl TryFrom<String> for JqlTimezone {
    type Error = JiraError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<JqlTimezone> for String {
    fn from(tz: JqlTimezone) -> Self {
        tz.to_string()
    }
}

/// Parse `+H`, `+H:MM`, `+HH:MM` or `+HHMM` (sign required) into seconds
fn parse_offset_seconds(s: &str) -> Option<i32> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if !rest.is_ascii() {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() > 2 => rest.split_at(rest.len() - 2),
        None => (rest, "0"),
    };

    if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(sign * (hours * 3600 + minutes * 60))
}

/// Render an instant as a JQL date in the given timezone
pub fn format_jql_date(instant: &DateTime<Utc>, timezone: JqlTimezone) -> String {
    match timezone {
        JqlTimezone::Utc => instant.format(JQL_DATE_FORMAT).to_string(),
        JqlTimezone::Local => instant
            .with_timezone(&Local)
            .format(JQL_DATE_FORMAT)
            .to_string(),
        JqlTimezone::Fixed(offset) => instant
            .with_timezone(&offset)
            .format(JQL_DATE_FORMAT)
            .to_string(),
    }
}

/// Build the JQL selecting issues of a project updated within a window.
///
/// Results are always ordered by ascending update time, so walking pages
/// with increasing offsets never skips an issue that is updated again while
/// the sweep runs (it simply moves to the end).
pub fn build_changed_issues_jql(
    project_key: &str,
    updated_after: Option<DateTime<Utc>>,
    updated_before: Option<DateTime<Utc>>,
    timezone: JqlTimezone,
) -> Result<String> {
    if project_key.trim().is_empty() {
        return Err(JiraError::InvalidArgument(
            "projectKey must be defined".to_string(),
        ));
    }

    let mut jql = format!("project='{}'", project_key);

    if let Some(after) = updated_after {
        jql.push_str(&format!(
            " and updatedDate >= \"{}\"",
            format_jql_date(&after, timezone)
        ));
    }
    if let Some(before) = updated_before {
        jql.push_str(&format!(
            " and updatedDate <= \"{}\"",
            format_jql_date(&before, timezone)
        ));
    }

    jql.push_str(" ORDER BY updated ASC");
    Ok(jql)
}
