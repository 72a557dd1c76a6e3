use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Full-date formats tried in order after RFC 3339.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y %b %d", "%d %b %Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Best-effort parse of a `publish_time` cell.
///
/// Accepts full dates, timestamps, and partial dates (`2020 Mar`, `2020-03`,
/// `2020`) which resolve to the first day of the period. Anything else is
/// `None`; this never fails.
pub fn parse_publish_time(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    parse_partial(value)
}

/// `YYYY Mon`, `YYYY-MM` and bare `YYYY`.
fn parse_partial(value: &str) -> Option<NaiveDate> {
    // chrono refuses formats without a day, so supply one.
    for fmt in ["%Y %b %d", "%Y-%m-%d"] {
        let sep = if fmt.contains('-') { "-" } else { " " };
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}{sep}01"), fmt) {
            return Some(date);
        }
    }

    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = value.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::parse_publish_time;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn parses_iso_dates_and_timestamps() {
        assert_eq!(parse_publish_time("2020-03-27"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time(" 2020-03-27 "), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("2020-03-27T10:00:00Z"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("2020-03-27 10:00:00"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("2020-03-27T10:00:00"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("2020/03/27"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("03/27/2020"), ymd(2020, 3, 27));
    }

    #[test]
    fn parses_month_name_forms() {
        assert_eq!(parse_publish_time("2020 Mar 27"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("27 Mar 2020"), ymd(2020, 3, 27));
        assert_eq!(parse_publish_time("2020 Mar"), ymd(2020, 3, 1));
    }

    #[test]
    fn partial_dates_resolve_to_period_start() {
        assert_eq!(parse_publish_time("2020"), ymd(2020, 1, 1));
        assert_eq!(parse_publish_time("2020-07"), ymd(2020, 7, 1));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_publish_time(""), None);
        assert_eq!(parse_publish_time("unknown"), None);
        assert_eq!(parse_publish_time("2020-13-45"), None);
        assert_eq!(parse_publish_time("20"), None);
        assert_eq!(parse_publish_time("12345"), None);
    }
}
