use chrono::{DateTime, Utc};

use crate::models::Sensor;

// Render the current fleet as fixed-width console lines
pub(crate) fn render_lines(sensors: &[Sensor], now: DateTime<Utc>) -> Vec<String> {
    sensors
        .iter()
        .map(|s| {
            format!(
                "{:<8} {:<12} {:>12}  {:<7} {:<20} {}",
                s.name,
                s.kind.label(),
                s.value,
                s.status,
                s.location,
                s.last_updated_display(now)
            )
        })
        .collect()
}
