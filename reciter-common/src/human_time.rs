//! Track duration parsing and human-readable formatting
//!
//! archive.org publishes `AudioObject` durations as ISO 8601 durations
//! (`PT0M182S`, `PT1H2M3.5S`); some mirrors use clock notation (`3:02`).
//! Parsed durations are summed and displayed in the formats below.

/// Time display format selection thresholds (seconds)
const SHORT_FORMAT_MAX: i64 = 100;        // < 100s → X.XXs
const MEDIUM_FORMAT_MAX: i64 = 6000;      // < 100m → M:SS.Xs
                                           // >= 100m → H:MM:SS

/// Parse a duration string into seconds.
///
/// Accepts ISO 8601 time durations (`PT#H#M#S`, optional `P#D` day part,
/// fractional seconds), clock notation (`H:MM:SS`, `M:SS`) and plain
/// seconds. Returns `None` for anything else.
///
/// # Examples
///
/// ```
/// use reciter_common::human_time::parse_duration;
///
/// assert_eq!(parse_duration("PT0M182S"), Some(182.0));
/// assert_eq!(parse_duration("PT1H2M3S"), Some(3723.0));
/// assert_eq!(parse_duration("3:02"), Some(182.0));
/// assert_eq!(parse_duration("nonsense"), None);
/// ```
pub fn parse_duration(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(rest) = text.strip_prefix('P').or_else(|| text.strip_prefix('p')) {
        return parse_iso8601(rest);
    }

    if text.contains(':') {
        return parse_clock(text);
    }

    text.parse::<f64>().ok().filter(|secs| secs.is_finite() && *secs >= 0.0)
}

fn parse_iso8601(rest: &str) -> Option<f64> {
    let (date_part, time_part) = match rest.find(['T', 't']) {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
        None => (rest, None),
    };

    let mut total = 0.0;
    let mut matched = false;

    // Only days are meaningful for track lengths; years/months are rejected
    let mut number = String::new();
    for c in date_part.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'D' | 'd' => {
                total += number.parse::<f64>().ok()? * 86400.0;
                number.clear();
                matched = true;
            }
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }

    if let Some(time_part) = time_part {
        for c in time_part.chars() {
            let unit = match c {
                '0'..='9' | '.' => {
                    number.push(c);
                    continue;
                }
                'H' | 'h' => 3600.0,
                'M' | 'm' => 60.0,
                'S' | 's' => 1.0,
                _ => return None,
            };
            total += number.parse::<f64>().ok()? * unit;
            number.clear();
            matched = true;
        }
        if !number.is_empty() {
            return None;
        }
    }

    matched.then_some(total)
}

fn parse_clock(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut total = 0.0;
    for part in parts {
        let value: f64 = part.trim().parse().ok()?;
        if value < 0.0 {
            return None;
        }
        total = total * 60.0 + value;
    }
    Some(total)
}

/// Format seconds as human-readable time.
///
/// Format selection by typical maximum value:
/// - Short format (`X.XXs`): typical max < 100 seconds
/// - Medium format (`M:SS.Xs`): typical max 100s to 100m
/// - Long format (`H:MM:SS`): typical max >= 100m
///
/// # Examples
///
/// ```
/// use reciter_common::human_time::format_human_time;
///
/// assert_eq!(format_human_time(45, 100), "45.00s");
/// assert_eq!(format_human_time(330, 6000), "5:30.0s");
/// assert_eq!(format_human_time(3661, 14400), "1:01:01");
/// ```
pub fn format_human_time(seconds: i64, typical_max: i64) -> String {
    let is_negative = seconds < 0;
    let abs_seconds = seconds.abs();

    let formatted = if typical_max <= SHORT_FORMAT_MAX {
        format!("{:.2}s", abs_seconds as f64)
    } else if typical_max <= MEDIUM_FORMAT_MAX {
        let minutes = abs_seconds / 60;
        let secs = abs_seconds % 60;
        format!("{}:{:04.1}s", minutes, secs as f64)
    } else {
        // Whole recitations run for tens of hours; hours are not wrapped into days
        let hours = abs_seconds / 3600;
        let mins = (abs_seconds % 3600) / 60;
        let secs = abs_seconds % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Sum the parseable durations, or `None` if none of them parse.
pub fn total_duration<'a, I>(durations: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a str>,
{
    durations
        .into_iter()
        .filter_map(parse_duration)
        .fold(None, |acc, secs| Some(acc.unwrap_or(0.0) + secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso8601() {
        assert_eq!(parse_duration("PT0M182S"), Some(182.0));
        assert_eq!(parse_duration("PT3M2S"), Some(182.0));
        assert_eq!(parse_duration("PT1H"), Some(3600.0));
        assert_eq!(parse_duration("PT2.5S"), Some(2.5));
        assert_eq!(parse_duration("P1DT1S"), Some(86401.0));
        assert_eq!(parse_duration(" PT10S "), Some(10.0));
    }

    #[test]
    fn test_parse_iso8601_rejects_malformed() {
        assert_eq!(parse_duration("PT"), None);
        assert_eq!(parse_duration("P"), None);
        assert_eq!(parse_duration("PT12"), None);
        assert_eq!(parse_duration("P1Y"), None);
        assert_eq!(parse_duration("PTxS"), None);
    }

    #[test]
    fn test_parse_clock_and_seconds() {
        assert_eq!(parse_duration("3:02"), Some(182.0));
        assert_eq!(parse_duration("1:00:01"), Some(3601.0));
        assert_eq!(parse_duration("182.25"), Some(182.25));
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-5"), None);
    }

    #[test]
    fn test_short_format() {
        assert_eq!(format_human_time(0, 100), "0.00s");
        assert_eq!(format_human_time(99, 100), "99.00s");
    }

    #[test]
    fn test_medium_format() {
        assert_eq!(format_human_time(100, 6000), "1:40.0s");
        assert_eq!(format_human_time(5999, 6000), "99:59.0s");
    }

    #[test]
    fn test_long_format_does_not_wrap_days() {
        assert_eq!(format_human_time(6000, 90000), "1:40:00");
        assert_eq!(format_human_time(180000, 200000), "50:00:00");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_human_time(-5, 100), "-5.00s");
        assert_eq!(format_human_time(-7200, 14400), "-2:00:00");
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(total_duration(["PT1M", "PT30S", "garbage"]), Some(90.0));
        assert_eq!(total_duration(["garbage"]), None);
        assert_eq!(total_duration(Vec::<&str>::new()), None);
    }
}
