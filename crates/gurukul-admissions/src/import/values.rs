use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Accepts `7` as well as spreadsheet-style `7.0`.
pub(crate) fn parse_whole_number(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return Some(number);
    }

    let float = trimmed.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float >= 0.0 && float <= f64::from(u32::MAX) {
        Some(float as u32)
    } else {
        None
    }
}

pub(crate) fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => Some(true),
        "false" | "f" | "no" | "n" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_accept_float_notation() {
        assert_eq!(parse_whole_number("12"), Some(12));
        assert_eq!(parse_whole_number(" 12.0 "), Some(12));
        assert_eq!(parse_whole_number("12.5"), None);
        assert_eq!(parse_whole_number("-1"), None);
        assert_eq!(parse_whole_number("twelve"), None);
    }

    #[test]
    fn flags_cover_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("y"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn timestamps_support_rfc3339_datetime_and_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-02T08:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02 08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T08:30:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-02"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn decimals_reject_non_finite_values() {
        assert_eq!(parse_decimal("88.5"), Some(88.5));
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
    }
}
