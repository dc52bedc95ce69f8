use chrono::NaiveDateTime;

/// Format used for alarm times in the durability log and in display text.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format of the `alarm` request parameter (HTML `datetime-local`).
pub const REQUEST_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// One scheduled, one-shot alarm.
///
/// Equality covers every field, which is what duplicate detection keys on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    pub title: String,
    pub fire_time: NaiveDateTime,
    pub include_news: bool,
    pub include_weather: bool,
}

/// Weak reference to a pending alarm, as held by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlarmKey {
    pub fire_time: NaiveDateTime,
    pub title: String,
    pub include_news: bool,
    pub include_weather: bool,
}

impl Alarm {
    pub fn new(
        title: impl Into<String>,
        fire_time: NaiveDateTime,
        include_news: bool,
        include_weather: bool,
    ) -> Self {
        Self {
            title: title.into(),
            fire_time: crate::clock::to_minute(fire_time),
            include_news,
            include_weather,
        }
    }

    pub fn key(&self) -> AlarmKey {
        AlarmKey {
            fire_time: self.fire_time,
            title: self.title.clone(),
            include_news: self.include_news,
            include_weather: self.include_weather,
        }
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.fire_time <= now
    }

    /// Human-readable summary, e.g. `Alarm on 2026-10-17 07:00 with news and with weather`.
    pub fn display_text(&self) -> String {
        let mut extras = Vec::new();
        if self.include_news {
            extras.push("with news");
        }
        if self.include_weather {
            extras.push("with weather");
        }

        let time = self.fire_time.format(TIME_FORMAT);
        if extras.is_empty() {
            format!("Alarm on {time}")
        } else {
            format!("Alarm on {time} {}", extras.join(" and "))
        }
    }
}

impl std::fmt::Display for AlarmKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.title, self.fire_time.format(TIME_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    #[test]
    fn display_text_lists_briefings() {
        assert_eq!(
            Alarm::new("Wake", morning(), true, true).display_text(),
            "Alarm on 2026-10-17 07:00 with news and with weather"
        );
        assert_eq!(
            Alarm::new("Wake", morning(), false, true).display_text(),
            "Alarm on 2026-10-17 07:00 with weather"
        );
        assert_eq!(
            Alarm::new("Wake", morning(), false, false).display_text(),
            "Alarm on 2026-10-17 07:00"
        );
    }

    #[test]
    fn fire_time_is_truncated_to_minute() {
        let alarm = Alarm::new("Wake", morning() + chrono::Duration::seconds(42), false, false);
        assert_eq!(alarm.fire_time, morning());
        assert!(alarm.is_due(morning()));
        assert!(!alarm.is_due(morning() - chrono::Duration::minutes(1)));
    }
}
