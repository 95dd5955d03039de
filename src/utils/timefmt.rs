use chrono::{DateTime, Utc};

/// Render how long ago `then` was, relative to `now`.
///
/// Buckets: under 5 seconds is "Just now", under a minute "{N}s ago", under
/// an hour "{N}min ago", anything longer "{N}h ago". Exactly 5 seconds
/// falls on the "5s ago" side. A `then` in the future is treated as now.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let mins = secs / 60;
    let hours = mins / 60;

    if secs < 5 {
        "Just now".to_string()
    } else if secs < 60 {
        format!("{secs}s ago")
    } else if mins < 60 {
        format!("{mins}min ago")
    } else {
        format!("{hours}h ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at_offset(secs: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::seconds(secs), now)
    }

    #[test]
    fn test_just_now_under_five_seconds() {
        let (then, now) = at_offset(3);
        assert_eq!(relative_time(then, now), "Just now");

        let (then, now) = at_offset(0);
        assert_eq!(relative_time(then, now), "Just now");
    }

    #[test]
    fn test_five_second_boundary_reports_seconds() {
        let (then, now) = at_offset(5);
        assert_eq!(relative_time(then, now), "5s ago");
    }

    #[test]
    fn test_seconds_bucket() {
        let (then, now) = at_offset(45);
        assert_eq!(relative_time(then, now), "45s ago");
    }

    #[test]
    fn test_minutes_bucket() {
        let (then, now) = at_offset(125);
        assert_eq!(relative_time(then, now), "2min ago");

        let (then, now) = at_offset(60);
        assert_eq!(relative_time(then, now), "1min ago");
    }

    #[test]
    fn test_hours_bucket() {
        let (then, now) = at_offset(7300);
        assert_eq!(relative_time(then, now), "2h ago");
    }

    #[test]
    fn test_future_timestamp_clamps_to_now() {
        let now = Utc::now();
        assert_eq!(relative_time(now + Duration::seconds(30), now), "Just now");
    }
}
