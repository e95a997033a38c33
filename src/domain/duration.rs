//! Timeout value object
//!
//! Written as `<n>m`, `<n>s`, `<n>ms` segments in that order, e.g. `10s`,
//! `1m30s`, `2s500ms`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default bound on a clipboard helper process (10 seconds)
pub const DEFAULT_HELPER_TIMEOUT_SECS: u64 = 10;

/// Default bound on an interface enumeration command (5 seconds)
pub const DEFAULT_ENUMERATION_TIMEOUT_SECS: u64 = 5;

/// A strictly positive span of time, millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self::from_millis(secs.saturating_mul(1000))
    }

    /// Bound on each clipboard helper process
    pub const fn default_helper_timeout() -> Self {
        Self::from_secs(DEFAULT_HELPER_TIMEOUT_SECS)
    }

    /// Bound on each interface enumeration command
    pub const fn default_enumeration_timeout() -> Self {
        Self::from_secs(DEFAULT_ENUMERATION_TIMEOUT_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl From<Duration> for StdDuration {
    fn from(d: Duration) -> Self {
        d.as_std()
    }
}

/// Unit suffixes, largest first; each may appear at most once
const UNITS: [(&str, u64); 3] = [("m", 60_000), ("s", 1000), ("ms", 1)];

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };

        let text = s.trim().to_ascii_lowercase();
        let mut rest = text.as_str();
        let mut total: u64 = 0;
        let mut next_unit = 0;

        while !rest.is_empty() {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return Err(invalid());
            }
            let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
            rest = &rest[digits..];

            let suffix_len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
            let suffix = &rest[..suffix_len];
            rest = &rest[suffix_len..];

            let position = UNITS[next_unit..]
                .iter()
                .position(|(unit, _)| *unit == suffix)
                .ok_or_else(invalid)?;
            let (_, factor) = UNITS[next_unit + position];
            next_unit += position + 1;

            total = value
                .checked_mul(factor)
                .and_then(|ms| total.checked_add(ms))
                .ok_or_else(invalid)?;
        }

        if total == 0 {
            return Err(invalid());
        }
        Ok(Self::from_millis(total))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.milliseconds / 60_000;
        let seconds = (self.milliseconds / 1000) % 60;
        let millis = self.milliseconds % 1000;

        let mut wrote = false;
        for (value, unit) in [(minutes, "m"), (seconds, "s"), (millis, "ms")] {
            if value > 0 {
                write!(f, "{}{}", value, unit)?;
                wrote = true;
            }
        }
        if !wrote {
            write!(f, "0s")?;
        }
        Ok(())
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_helper_timeout()
    }
}
