//! Durability log record grammar.
//!
//! Two record kinds, one per line:
//!
//! ```text
//! Registering an alarm: <title> on <YYYY-MM-DD HH:MM>, include news: <True|False>, include weather: <True|False>
//! Canceling an alarm: <title>
//! ```
//!
//! A line may carry a `LEVEL:logger:` prefix. Registration lines are
//! parsed from the right: the tail after the title has a fixed shape, so
//! a title containing ` on <date>` is still recovered intact.

use chrono::NaiveDateTime;

use super::model::{Alarm, TIME_FORMAT};

const REGISTER_TAG: &str = "Registering an alarm: ";
const CANCEL_TAG: &str = "Canceling an alarm: ";
const NEWS_FIELD: &str = ", include news: ";
const WEATHER_FIELD: &str = ", include weather: ";
const TIME_SEPARATOR: &str = " on ";
/// `YYYY-MM-DD HH:MM`
const TIME_WIDTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Registered(Alarm),
    Cancelled { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Record(LogRecord),
    Unparsable,
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered(alarm) => write!(
                f,
                "{REGISTER_TAG}{} on {}{NEWS_FIELD}{}{WEATHER_FIELD}{}",
                alarm.title,
                alarm.fire_time.format(TIME_FORMAT),
                format_flag(alarm.include_news),
                format_flag(alarm.include_weather),
            ),
            Self::Cancelled { title } => write!(f, "{CANCEL_TAG}{title}"),
        }
    }
}

/// Whether `title` can be written as a record and read back unchanged.
pub fn is_recordable_title(title: &str) -> bool {
    !title.trim().is_empty() && !title.contains(['\n', '\r'])
}

pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim_end_matches(['\n', '\r']);
    let body = strip_level_prefix(line);

    if let Some(rest) = body.strip_prefix(REGISTER_TAG) {
        return match parse_registration(rest) {
            Some(alarm) => ParsedLine::Record(LogRecord::Registered(alarm)),
            None => ParsedLine::Unparsable,
        };
    }

    if let Some(title) = body.strip_prefix(CANCEL_TAG) {
        if !title.is_empty() {
            return ParsedLine::Record(LogRecord::Cancelled {
                title: title.to_string(),
            });
        }
    }

    ParsedLine::Unparsable
}

fn parse_registration(rest: &str) -> Option<Alarm> {
    let (rest, include_weather) = split_flag(rest, WEATHER_FIELD)?;
    let (rest, include_news) = split_flag(rest, NEWS_FIELD)?;

    let time_at = rest.len().checked_sub(TIME_WIDTH)?;
    if !rest.is_char_boundary(time_at) {
        return None;
    }
    let (head, time) = rest.split_at(time_at);
    let fire_time = NaiveDateTime::parse_from_str(time, TIME_FORMAT).ok()?;

    let title = head.strip_suffix(TIME_SEPARATOR)?;
    if title.is_empty() {
        return None;
    }

    Some(Alarm::new(title, fire_time, include_news, include_weather))
}

/// Split `<rest><field><True|False>` into `rest` and the flag.
fn split_flag<'a>(text: &'a str, field: &str) -> Option<(&'a str, bool)> {
    if let Some(rest) = text.strip_suffix("True") {
        return rest.strip_suffix(field).map(|r| (r, true));
    }
    if let Some(rest) = text.strip_suffix("False") {
        return rest.strip_suffix(field).map(|r| (r, false));
    }
    None
}

fn format_flag(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Drop a leading `LEVEL:logger:` tag such as `INFO:root:`.
fn strip_level_prefix(line: &str) -> &str {
    let Some((level, rest)) = line.split_once(':') else {
        return line;
    };
    if level.is_empty() || !level.chars().all(|c| c.is_ascii_uppercase()) {
        return line;
    }
    match rest.split_once(':') {
        Some((logger, body))
            if !logger.is_empty()
                && logger
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '.') =>
        {
            body
        }
        _ => line,
    }
}
