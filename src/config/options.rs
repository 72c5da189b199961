//! Applies scanned entries to a [`Session`].
//!
//! Nothing in here can fail the parse: a bad value is logged together with
//! its line number, then either replaced by a fallback or ignored.
use std::path::PathBuf;

use super::lexer::Entry;
use super::patterns::{build_pattern_list, normalize};
use super::ParserLimits;
use crate::session::{Session, DEFAULT_CHECK_INTERVAL};
use crate::util::validate_feed_url;

/// Options understood by the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigOption {
    Url,
    LogFile,
    TransmissionHome,
    StateFile,
    Interval,
    UseTransmission,
    Patterns,
    MaxHistory,
}

impl ConfigOption {
    pub const ALL: [ConfigOption; 8] = [
        Self::Url,
        Self::LogFile,
        Self::TransmissionHome,
        Self::StateFile,
        Self::Interval,
        Self::UseTransmission,
        Self::Patterns,
        Self::MaxHistory,
    ];

    /// Looks up an option by the exact (case-sensitive) name used in the file.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.key() == key)
    }

    /// Name of the option in the configuration file.
    pub fn key(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::LogFile => "logfile",
            Self::TransmissionHome => "transmission-home",
            Self::StateFile => "statefile",
            Self::Interval => "interval",
            Self::UseTransmission => "use-transmission",
            Self::Patterns => "patterns",
            Self::MaxHistory => "max-history",
        }
    }
}

/// Applies one entry to `session`.
pub fn apply(session: &mut Session, entry: &Entry, limits: &ParserLimits) {
    tracing::debug!(
        line = entry.line,
        option = %entry.option,
        value = %entry.value,
        kind = ?entry.kind,
        "Applying option"
    );

    let Some(option) = ConfigOption::from_key(&entry.option) else {
        tracing::warn!(line = entry.line, option = %entry.option, "Unknown option");
        return;
    };

    let value = entry.value.as_str();
    match option {
        ConfigOption::Url => {
            if let Err(e) = validate_feed_url(value) {
                tracing::warn!(
                    line = entry.line,
                    url = %value,
                    error = %e,
                    "Feed URL looks invalid"
                );
            }
            session.feed_url = Some(value.to_owned());
        }
        ConfigOption::LogFile => {
            if let Some(path) = checked_path(entry, limits) {
                session.log_file = Some(path);
            }
        }
        ConfigOption::TransmissionHome => {
            if let Some(path) = checked_path(entry, limits) {
                session.transmission_home = Some(path);
            }
        }
        ConfigOption::StateFile => {
            if let Some(path) = checked_path(entry, limits) {
                session.state_file = Some(path);
            }
        }
        ConfigOption::Interval => {
            session.check_interval = match parse_positive::<u32>(value) {
                Some(minutes) => minutes,
                None => {
                    tracing::warn!(
                        line = entry.line,
                        value = %value,
                        default = DEFAULT_CHECK_INTERVAL,
                        "Interval must be a whole number of minutes (1 or more), using default"
                    );
                    DEFAULT_CHECK_INTERVAL
                }
            };
        }
        ConfigOption::UseTransmission => match parse_flag(value) {
            Some(flag) => session.use_transmission = flag,
            None => {
                tracing::warn!(
                    line = entry.line,
                    option = %entry.option,
                    value = %value,
                    "Unknown parameter"
                );
            }
        },
        ConfigOption::Patterns => match normalize(value, limits.max_value_len) {
            Ok(canonical) => {
                session.patterns = build_pattern_list(&canonical);
                tracing::debug!(
                    line = entry.line,
                    count = session.patterns.len(),
                    "Replaced filter patterns"
                );
            }
            Err(e) => {
                tracing::error!(line = entry.line, error = %e, "Keeping previous filter patterns");
            }
        },
        ConfigOption::MaxHistory => match parse_positive::<usize>(value) {
            Some(max_items) => session.set_max_history(max_items),
            None => {
                tracing::warn!(
                    line = entry.line,
                    value = %value,
                    "max-history must be a positive number, ignoring"
                );
            }
        },
    }
}

/// Accepts the value as a path if it is shorter than the platform path limit.
fn checked_path(entry: &Entry, limits: &ParserLimits) -> Option<PathBuf> {
    if entry.value.len() < limits.max_path_len {
        Some(PathBuf::from(&entry.value))
    } else {
        tracing::warn!(
            line = entry.line,
            option = %entry.option,
            len = entry.value.len(),
            max = limits.max_path_len,
            "Path too long, ignoring"
        );
        None
    }
}

/// Parses a string made only of ASCII digits into a number greater than zero.
fn parse_positive<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<T>().ok().filter(|n| *n > T::default())
}

/// `0`/`no` and `1`/`yes`, matched as prefixes.
fn parse_flag(value: &str) -> Option<bool> {
    if value.starts_with('0') || value.starts_with("no") {
        Some(false)
    } else if value.starts_with('1') || value.starts_with("yes") {
        Some(true)
    } else {
        None
    }
}
