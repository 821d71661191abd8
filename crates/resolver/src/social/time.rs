use std::{fmt::Write, time::Duration};

use chrono::{DateTime, Utc};

/// Posts older than this show a calendar date instead of a relative age.
const RELATIVE_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const UNITS: &[(u128, &str)] = &[
    (365 * 24 * 60 * 60 * 1000, "y"),
    (24 * 60 * 60 * 1000, "d"),
    (60 * 60 * 1000, "h"),
    (60 * 1000, "m"),
    (1000, "s"),
    (1, "ms"),
];

/// `"1d3h ago"` for recent posts, `"2024-01-02"` for anything older than a week.
pub fn display_post_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // Clock skew can put the post in the future; treat that as "just now".
    let elapsed = (now - created_at).to_std().unwrap_or_default();
    if elapsed > RELATIVE_WINDOW {
        created_at.format("%Y-%m-%d").to_string()
    } else {
        format!("{} ago", human_duration(elapsed))
    }
}

/// The two largest non-zero units of `elapsed`, e.g. `"1h30m"`.
pub fn human_duration(elapsed: Duration) -> String {
    let mut rest = elapsed.as_millis();
    let mut out = String::new();
    let mut shown = 0;

    for &(unit, suffix) in UNITS {
        if shown == 2 {
            break;
        }
        let count = rest / unit;
        if count > 0 {
            let _ = write!(out, "{count}{suffix}");
            shown += 1;
            rest %= unit;
        }
    }

    if out.is_empty() {
        out.push_str("0s");
    }
    out
}
