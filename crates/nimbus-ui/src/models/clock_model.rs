use chrono::{DateTime, Local, TimeZone};

/// Date on the first line, time on the second
pub const CLOCK_FORMAT: &str = "%A, %B %d, %Y\n%H:%M:%S";

pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(CLOCK_FORMAT).to_string()
}

/// Clock text, updated once per tick
#[derive(Debug, Clone)]
pub struct ClockModel {
    text: String,
}

impl ClockModel {
    pub fn new() -> Self {
        Self {
            text: format_clock(&Local::now()),
        }
    }

    pub fn tick(&mut self, now: DateTime<Local>) {
        self.text = format_clock(&now);
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for ClockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn clock_format() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let time = offset.with_ymd_and_hms(2026, 10, 19, 9, 5, 3).unwrap();
        assert_eq!(format_clock(&time), "Monday, October 19, 2026\n09:05:03");
    }

    #[test]
    fn tick_replaces_text() {
        let mut clock = ClockModel::new();
        let time = Local.with_ymd_and_hms(2026, 1, 2, 23, 59, 59).unwrap();
        clock.tick(time);
        assert_eq!(clock.text(), "Friday, January 02, 2026\n23:59:59");
    }
}
