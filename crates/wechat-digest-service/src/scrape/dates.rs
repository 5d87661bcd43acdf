use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const HOURS_AGO: &str = "小时前";
const MINUTES_AGO: &str = "分钟前";
const DAYS_AGO: &str = "天前";
const YESTERDAY: &str = "昨天";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

/// Turns a listing date token into an instant. Tokens it cannot read become `now`.
pub fn normalize_publish_date(token: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let token = token.trim();

    let relative = if token.contains(HOURS_AGO) {
        Some(first_number(token).and_then(TimeDelta::try_hours))
    } else if token.contains(MINUTES_AGO) {
        Some(first_number(token).and_then(TimeDelta::try_minutes))
    } else if token.contains(DAYS_AGO) {
        Some(first_number(token).and_then(TimeDelta::try_days))
    } else if token == YESTERDAY {
        Some(TimeDelta::try_hours(24))
    } else {
        None
    };

    match relative {
        Some(offset) => offset
            .and_then(|delta| now.checked_sub_signed(delta))
            .unwrap_or(now),
        None => parse_absolute(token).unwrap_or(now),
    }
}

/// First run of ASCII digits in the token; whatever precedes it is ignored.
fn first_number(token: &str) -> Option<i64> {
    let start = token.find(|c: char| c.is_ascii_digit())?;
    let digits: String = token[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn parse_absolute(token: &str) -> Option<DateTime<Utc>> {
    if token.is_empty() {
        return None;
    }

    // Unix seconds, as carried by the listing's `t` attribute
    if token.len() == 10 && token.bytes().all(|b| b.is_ascii_digit()) {
        return DateTime::from_timestamp(token.parse().ok()?, 0);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
