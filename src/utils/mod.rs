use chrono::Duration;
use regex::Regex;
use std::sync::OnceLock;

/// Base URL for a single video's watch page
pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Build the canonical watch URL for a video ID
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

fn unsafe_path_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\/*?:"<>|]"#).expect("valid regex"))
}

/// Make a video title usable inside a file name
///
/// Characters that are illegal in Windows or POSIX paths become `_`, newlines
/// become spaces and carriage returns are dropped.
pub fn sanitize_title(title: &str) -> String {
    unsafe_path_chars()
        .replace_all(title, "_")
        .replace('\n', " ")
        .replace('\r', "")
}

/// Parse an ISO-8601 duration as returned by the YouTube Data API (`PT1H2M3S`, `P1DT4S`, `P0D`)
///
/// Year and month designators are rejected since they have no fixed length.
pub fn parse_iso8601_duration(iso: &str) -> Option<Duration> {
    let rest = iso.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut seconds: i64 = 0;
    let mut seen_any = false;

    for (value, unit) in designators(date_part)? {
        let unit_secs = match unit {
            'W' => 7 * 86_400,
            'D' => 86_400,
            _ => return None,
        };
        seconds = seconds.checked_add(value.checked_mul(unit_secs)?)?;
        seen_any = true;
    }

    if let Some(time_part) = time_part {
        if time_part.is_empty() {
            return None;
        }
        for (value, unit) in designators(time_part)? {
            let unit_secs = match unit {
                'H' => 3_600,
                'M' => 60,
                'S' => 1,
                _ => return None,
            };
            seconds = seconds.checked_add(value.checked_mul(unit_secs)?)?;
            seen_any = true;
        }
    }

    if !seen_any {
        return None;
    }
    Duration::try_seconds(seconds)
}

/// Split `12H3M` into `[(12, 'H'), (3, 'M')]`
fn designators(part: &str) -> Option<Vec<(i64, char)>> {
    let mut out = Vec::new();
    let mut number = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            number.push(c);
        } else if c == '.' || c == ',' {
            // fractional seconds are truncated
            number.push('.');
        } else {
            if number.is_empty() {
                return None;
            }
            let value = number.split('.').next()?.parse::<i64>().ok()?;
            out.push((value, c));
            number.clear();
        }
    }

    if !number.is_empty() {
        return None;
    }

    Some(out)
}

/// Format an elapsed time as `H:MM:SS`, with a leading `N day(s), ` when needed
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    let clock = format!("{}:{:02}:{:02}", hours, minutes, secs);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Display form of an ISO-8601 duration; unparseable input is returned as-is
pub fn display_duration(iso: &str) -> String {
    if iso.is_empty() {
        return String::new();
    }
    match parse_iso8601_duration(iso) {
        Some(duration) => format_elapsed(duration),
        None => {
            tracing::warn!(duration = iso, "Unrecognized ISO-8601 duration");
            iso.to_string()
        }
    }
}
