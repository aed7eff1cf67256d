//! Live timezone clock.
//!
//! The clock is independent of the countdown: its time is refreshed from the
//! wall clock once per second and rendered as `HH:MM:SS` in the selected
//! IANA zone. Unknown zone names fall back to the system's local time.

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

/// Zones offered by the timezone picker.
pub const TIMEZONES: [&str; 17] = [
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Anchorage",
    "Pacific/Honolulu",
    "Europe/London",
    "Europe/Paris",
    "Europe/Berlin",
    "Europe/Moscow",
    "Asia/Dubai",
    "Asia/Kolkata",
    "Asia/Shanghai",
    "Asia/Tokyo",
    "Asia/Seoul",
    "Australia/Sydney",
    "Pacific/Auckland",
];

/// Returns true if `timezone` is one of [`TIMEZONES`].
pub fn is_listed(timezone: &str) -> bool {
    TIMEZONES.contains(&timezone)
}

/// Resolves an IANA zone name.
pub fn resolve_timezone(timezone: &str) -> Option<Tz> {
    timezone.trim().parse::<Tz>().ok()
}

/// Formats `now` as 24-hour `HH:MM:SS` in `timezone`.
///
/// An unrecognized zone formats in the system's local time instead.
pub fn format_clock(now: DateTime<Utc>, timezone: &str) -> String {
    match resolve_timezone(timezone) {
        Some(tz) => now.with_timezone(&tz).format("%H:%M:%S").to_string(),
        None => {
            tracing::debug!(timezone, "unknown timezone, using local time");
            now.with_timezone(&Local).format("%H:%M:%S").to_string()
        }
    }
}

/// Selected zone and the last wall-clock reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    timezone: String,
    now: DateTime<Utc>,
}

impl ClockState {
    /// Creates a clock reading the wall clock now.
    pub fn new(timezone: impl Into<String>) -> Self {
        Self::at(timezone, Utc::now())
    }

    /// Creates a clock at a fixed instant.
    pub fn at(timezone: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            timezone: timezone.into(),
            now,
        }
    }

    /// Returns the selected zone name.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Returns the last reading.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Selects a zone.
    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        self.timezone = timezone.into();
    }

    /// Stores a new wall-clock reading.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Formats the last reading in the selected zone.
    pub fn display(&self) -> String {
        format_clock(self.now, &self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 5).unwrap()
    }

    fn is_hms(text: &str) -> bool {
        let parts: Vec<&str> = text.split(':').collect();
        parts.len() == 3
            && parts
                .iter()
                .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn test_zone_list_resolves() {
        assert!(TIMEZONES.len() >= 17);
        for zone in TIMEZONES {
            assert!(resolve_timezone(zone).is_some(), "{zone} should resolve");
        }
    }

    #[test]
    fn test_is_listed() {
        assert!(is_listed("Europe/Berlin"));
        assert!(!is_listed("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_format_in_zone() {
        assert_eq!(format_clock(noon_utc(), "Asia/Tokyo"), "21:00:05");
        assert_eq!(format_clock(noon_utc(), "America/New_York"), "07:00:05");
        assert_eq!(format_clock(noon_utc(), "Asia/Kolkata"), "17:30:05");
    }

    #[test]
    fn test_format_is_24_hour() {
        let evening = Utc.with_ymd_and_hms(2024, 7, 1, 21, 4, 9).unwrap();
        assert_eq!(format_clock(evening, "Europe/London"), "22:04:09");
    }

    #[test]
    fn test_unknown_zone_falls_back_to_local() {
        let text = format_clock(noon_utc(), "Not/AZone");
        let local = noon_utc().with_timezone(&Local).format("%H:%M:%S").to_string();
        assert_eq!(text, local);
        assert!(is_hms(&text));
    }

    #[test]
    fn test_empty_zone_falls_back_to_local() {
        assert!(is_hms(&format_clock(noon_utc(), "")));
    }

    #[test]
    fn test_clock_state_refresh_and_zone() {
        let mut clock = ClockState::at("Europe/Paris", noon_utc());
        assert_eq!(clock.display(), "13:00:05");

        clock.set_timezone("Asia/Dubai");
        assert_eq!(clock.timezone(), "Asia/Dubai");
        assert_eq!(clock.display(), "16:00:05");

        let later = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 6).unwrap();
        clock.refresh(later);
        assert_eq!(clock.now(), later);
        assert_eq!(clock.display(), "16:00:06");
    }
}
