//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct for the dates a sitemap
//! run deals with: git header timestamps, `lastmod` values and the
//! lookback cutoff passed to `git log --after`.
//!
//! # Examples
//!
//! ```ignore
//! // Parse a git header timestamp
//! let dt = DateTimeUtc::parse_git_timestamp("2023-06-01T09:15:00")?;
//! assert_eq!(dt.to_date(), "2023-06-01");
//!
//! // Lookback cutoff
//! let after = DateTimeUtc::now().sub_hours(48);
//! ```

use anyhow::{Result, bail};
use std::fmt;
use std::time::SystemTime;

const SECS_PER_DAY: i64 = 86_400;

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    /// `0001-01-01T00:00:00`, the timestamp of a change line seen before any header.
    pub const MIN: Self = Self::from_ymd(1, 1, 1);

    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Current UTC time from the system clock.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Build from seconds since the Unix epoch.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // components are range-bound
    pub fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(SECS_PER_DAY);
        let rem = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        Self::new(
            year.clamp(1, 9999) as u16,
            month,
            day,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix(self) -> i64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        days * SECS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Move back in time by `hours`.
    pub fn sub_hours(self, hours: u32) -> Self {
        Self::from_unix(self.to_unix() - i64::from(hours) * 3600)
    }

    /// Parse a git header timestamp: `YYYY-MM-DDTHH:MM:SS`.
    ///
    /// The hour may have one or two digits, minute and second exactly two.
    pub fn parse_git_timestamp(s: &str) -> Result<Self> {
        let Some((date, time)) = s.split_once('T') else {
            bail!("missing time separator in `{s}`");
        };

        let bytes = date.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            bail!("date is malformed: `{date}`");
        }
        let (Some(year), Some(month), Some(day)) = (
            parse_u16(&bytes[0..4]),
            parse_u8(&bytes[5..7]),
            parse_u8(&bytes[8..10]),
        ) else {
            bail!("date is malformed: `{date}`");
        };

        let mut parts = time.split(':');
        let (Some(hour), Some(minute), Some(second), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            bail!("time is malformed: `{time}`");
        };
        let hour = match hour.len() {
            1 => parse_digit(hour.as_bytes()[0]),
            2 => parse_u8(hour.as_bytes()),
            _ => None,
        };
        let (Some(hour), Some(minute), Some(second)) =
            (hour, parse_u8(minute.as_bytes()), parse_u8(second.as_bytes()))
        else {
            bail!("time is malformed: `{time}`");
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate()?;
        Ok(dt)
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if year == 0 {
            bail!("year is invalid: {year}");
        }
        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as a sitemap `lastmod` date: `YYYY-MM-DD`.
    pub fn to_date(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Inverse of `civil_from_days`.
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year.rem_euclid(400);
    let month = i64::from(month);
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[inline]
fn parse_digit(b: u8) -> Option<u8> {
    let d = b.wrapping_sub(b'0');
    (d <= 9).then_some(d)
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    Some(parse_digit(bytes[0])? * 10 + parse_digit(bytes[1])?)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        result = result * 10 + u16::from(parse_digit(b)?);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_git_timestamp() {
        let dt = DateTimeUtc::parse_git_timestamp("2023-06-01T09:15:42").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2023, 6, 1, 9, 15, 42));
    }

    #[test]
    fn test_parse_git_timestamp_single_digit_hour() {
        let dt = DateTimeUtc::parse_git_timestamp("2023-06-01T9:15:42").unwrap();
        assert_eq!(dt.hour, 9);
    }

    #[test]
    fn test_parse_git_timestamp_rejects_short_minute() {
        assert!(DateTimeUtc::parse_git_timestamp("2023-06-01T09:1:42").is_err());
        assert!(DateTimeUtc::parse_git_timestamp("2023-06-01T09:15:4").is_err());
    }

    #[test]
    fn test_parse_git_timestamp_rejects_calendar_errors() {
        assert!(DateTimeUtc::parse_git_timestamp("2023-13-01T00:00:00").is_err());
        assert!(DateTimeUtc::parse_git_timestamp("2023-02-29T00:00:00").is_err());
        assert!(DateTimeUtc::parse_git_timestamp("2023-06-01T24:00:00").is_err());
        assert!(DateTimeUtc::parse_git_timestamp("2023-06-01T23:60:00").is_err());
    }

    #[test]
    fn test_parse_git_timestamp_leap_day() {
        assert!(DateTimeUtc::parse_git_timestamp("2024-02-29T12:00:00").is_ok());
    }

    #[test]
    fn test_parse_git_timestamp_malformed() {
        assert!(DateTimeUtc::parse_git_timestamp("2023-06-01").is_err());
        assert!(DateTimeUtc::parse_git_timestamp("2023/06/01T00:00:00").is_err());
        assert!(DateTimeUtc::parse_git_timestamp("2023-06-01T00:00:00:00").is_err());
    }

    #[test]
    fn test_to_date() {
        assert_eq!(DateTimeUtc::new(2023, 6, 1, 23, 59, 59).to_date(), "2023-06-01");
        assert_eq!(DateTimeUtc::MIN.to_date(), "0001-01-01");
    }

    #[test]
    fn test_display() {
        let dt = DateTimeUtc::new(2023, 6, 1, 9, 5, 0);
        assert_eq!(dt.to_string(), "2023-06-01T09:05:00");
    }

    #[test]
    fn test_unix_epoch() {
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::from_ymd(1970, 1, 1));
        assert_eq!(DateTimeUtc::from_ymd(1970, 1, 1).to_unix(), 0);
    }

    #[test]
    fn test_unix_known_value() {
        // 2024-02-29T12:30:15Z
        let dt = DateTimeUtc::from_unix(1_709_209_815);
        assert_eq!(dt, DateTimeUtc::new(2024, 2, 29, 12, 30, 15));
        assert_eq!(dt.to_unix(), 1_709_209_815);
    }

    #[test]
    fn test_sub_hours_crosses_month() {
        let dt = DateTimeUtc::new(2023, 3, 1, 10, 0, 0).sub_hours(48);
        assert_eq!(dt, DateTimeUtc::new(2023, 2, 27, 10, 0, 0));
    }

    #[test]
    fn test_sub_hours_crosses_year() {
        let dt = DateTimeUtc::new(2024, 1, 1, 1, 0, 0).sub_hours(2);
        assert_eq!(dt, DateTimeUtc::new(2023, 12, 31, 23, 0, 0));
    }

    #[test]
    fn test_ordering() {
        let a = DateTimeUtc::new(2023, 6, 1, 0, 0, 0);
        let b = DateTimeUtc::new(2023, 6, 1, 0, 0, 1);
        assert!(a < b);
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTimeUtc::new(2000, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(DateTimeUtc::new(1900, 2, 29, 12, 0, 0).validate().is_err());
    }
}
