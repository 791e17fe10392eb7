use chrono::{DateTime, Utc};

/// Returns an output like this: `August 15, 2025`
pub fn format_long_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Human friendly distance between `date` and `now` (e.g. `2 hours ago`).
///
/// Anything older than a week falls back to [`format_long_date`]. Dates in the
/// future read as `Just now`.
pub fn format_relative_time(date: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = *now - *date;
    let days = diff.num_days();
    let hours = diff.num_hours();
    let minutes = diff.num_minutes();

    if days > 7 {
        format_long_date(date)
    } else if days > 0 {
        format!("{days} {} ago", plural(days, "day"))
    } else if hours > 0 {
        format!("{hours} {} ago", plural(hours, "hour"))
    } else if minutes > 0 {
        format!("{minutes} {} ago", plural(minutes, "minute"))
    } else {
        "Just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{unit}s")
    } else {
        unit.to_string()
    }
}
