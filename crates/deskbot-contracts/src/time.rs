// Relative timestamps for list rows

use chrono::{DateTime, Utc};

/// Compact age string for a list row ("Just now", "3h ago", "Yesterday",
/// then a plain date). `now` is passed in so views and tests share a clock.
pub fn format_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - at).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if hours < 48 {
        "Yesterday".to_string()
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}
