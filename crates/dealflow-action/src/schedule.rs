//! Scheduling phrase resolution.
//!
//! Maps date expressions (absolute timestamps or phrases like
//! "Thursday at 4pm") to absolute instants, relative to an injected `now`.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("Invalid weekday regex")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?::(\d{2}))?\s*([aApP][mM])?").expect("Invalid time regex")
});

/// Resolve a scheduling expression to an absolute instant.
///
/// Absolute inputs (containing the `T` date separator and parseable as a
/// timestamp) pass through unchanged. Phrase inputs need a weekday name and
/// an hour token; the result is the weekday's next occurrence strictly after
/// `now`. Naming today's weekday rolls a full week forward, so same-day is
/// never selected. Returns `None` when either token is absent; callers apply
/// their own fallback policy.
pub fn resolve(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(absolute) = parse_absolute(text) {
        return Some(absolute);
    }

    let day_caps = WEEKDAY_RE.captures(text)?;
    let time_caps = TIME_RE.captures(text)?;

    let target_day = weekday_index(&day_caps[1].to_lowercase())?;
    let hour: u32 = time_caps[1].parse().ok()?;
    let minute: u32 = time_caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let meridiem = time_caps.get(3).map(|m| m.as_str().to_lowercase());

    let hour24 = match meridiem.as_deref() {
        Some("pm") if hour != 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };

    // 0 = Sunday, matching weekday_index
    let current_day = now.weekday().num_days_from_sunday() as i64;
    let mut days_until = target_day as i64 - current_day;
    if days_until <= 0 {
        days_until += 7;
    }

    let date = now.date_naive() + Duration::days(days_until);
    let naive = date.and_hms_opt(hour24, minute, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Pass-through parsing for inputs that already carry an absolute timestamp.
fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if !text.contains('T') {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive timestamps are interpreted as UTC.
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn weekday_index(name: &str) -> Option<u32> {
    match name {
        "sunday" => Some(0),
        "monday" => Some(1),
        "tuesday" => Some(2),
        "wednesday" => Some(3),
        "thursday" => Some(4),
        "friday" => Some(5),
        "saturday" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    /// 2026-03-04 is a Wednesday.
    fn wednesday_noon() -> DateTime<Utc> {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap();
        assert_eq!(now.weekday(), Weekday::Wed);
        now
    }

    /// 2026-03-02 is a Monday.
    fn monday_noon() -> DateTime<Utc> {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(now.weekday(), Weekday::Mon);
        now
    }

    // ---- natural language path ----

    #[test]
    fn test_next_day_resolution() {
        let resolved = resolve("Thursday at 4pm", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_same_weekday_rolls_a_full_week() {
        // Asking for Monday on a Monday never resolves to today.
        let resolved = resolve("Monday at 9am", monday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 9, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_earlier_weekday_rolls_into_next_week() {
        // Tuesday seen from Wednesday is six days out.
        let resolved = resolve("Tuesday at 10am", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_minutes_are_honored() {
        let resolved = resolve("Friday at 2:30pm", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 6, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_case_insensitive_weekday_and_meridiem() {
        let resolved = resolve("THURSDAY AT 4PM", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_noon_and_midnight_conversion() {
        let noon = resolve("Thursday at 12pm", wednesday_noon()).unwrap();
        assert_eq!(noon.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap());

        let midnight = resolve("Thursday at 12am", wednesday_noon()).unwrap();
        assert_eq!(midnight.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_am_hours_unchanged() {
        let resolved = resolve("Thursday at 9am", wednesday_noon()).unwrap();
        assert_eq!(resolved.time(), chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_24h_token_without_meridiem() {
        let resolved = resolve("Thursday at 16:00", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_seconds_are_zeroed() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 12, 45, 33).unwrap();
        let resolved = resolve("Thursday at 4pm", now).unwrap();
        assert_eq!(resolved.timestamp() % 60, 0);
    }

    // ---- missing tokens ----

    #[test]
    fn test_missing_weekday_returns_none() {
        assert!(resolve("at 4pm", wednesday_noon()).is_none());
        assert!(resolve("tomorrow at 4pm", wednesday_noon()).is_none());
    }

    #[test]
    fn test_missing_hour_returns_none() {
        assert!(resolve("Thursday", wednesday_noon()).is_none());
        assert!(resolve("Thursday afternoon", wednesday_noon()).is_none());
    }

    #[test]
    fn test_empty_and_prose_return_none() {
        assert!(resolve("", wednesday_noon()).is_none());
        assert!(resolve("   ", wednesday_noon()).is_none());
        assert!(resolve("sometime soon", wednesday_noon()).is_none());
    }

    #[test]
    fn test_out_of_range_hour_returns_none() {
        assert!(resolve("Thursday at 99", wednesday_noon()).is_none());
    }

    // ---- absolute passthrough ----

    #[test]
    fn test_rfc3339_passthrough() {
        let resolved = resolve("2026-03-05T16:00:00Z", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_iso_passthrough_as_utc() {
        let resolved = resolve("2026-03-05T16:00:00", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_passthrough_unchanged_even_in_the_past() {
        // Absolute inputs are passed through, not rolled forward.
        let resolved = resolve("2020-01-01T08:30:00", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2020, 1, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_weekday_capital_t_is_not_mistaken_for_iso() {
        // "Thursday" contains a capital T but is not an absolute timestamp.
        let resolved = resolve("Thursday at 4pm", wednesday_noon()).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 5, 16, 0, 0).unwrap());
    }

    // ---- determinism ----

    #[test]
    fn test_resolution_is_deterministic() {
        let now = wednesday_noon();
        assert_eq!(resolve("Thursday at 4pm", now), resolve("Thursday at 4pm", now));
    }

    #[test]
    fn test_every_weekday_resolves_strictly_after_now() {
        let now = wednesday_noon();
        for day in [
            "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        ] {
            let resolved = resolve(&format!("{} at 8am", day), now).unwrap();
            assert!(resolved > now, "{} resolved to {} which is not after now", day, resolved);
            let gap = resolved.date_naive() - now.date_naive();
            assert!(gap.num_days() >= 1 && gap.num_days() <= 7);
        }
    }
}
