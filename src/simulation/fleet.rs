use crate::models::SensorDraft;

fn draft(
    name: &str,
    kind: &str,
    min: f64,
    max: f64,
    frequency_secs: u64,
    location: &str,
) -> SensorDraft {
    SensorDraft {
        name: Some(name.to_string()),
        kind: Some(kind.to_string()),
        unit: None,
        min: Some(min),
        max: Some(max),
        frequency: Some(frequency_secs),
        location: Some(location.to_string()),
    }
}

/// The factory floor the simulation boots with: a handful of sensors with
/// realistic ranges and staggered update rates.
pub fn default_fleet() -> Vec<SensorDraft> {
    vec![
        draft("T-101", "Temperature", 18.0, 28.0, 5, "Main Assembly"),
        draft("P-201", "Pressure", 1.8, 3.2, 10, "Hydraulic System"),
        draft("T-103", "Temperature", 20.0, 40.0, 5, "Production Line 2"),
        draft("H-301", "Humidity", 40.0, 80.0, 30, "Storage Area"),
        draft("P-102", "Power", 30.0, 60.0, 1, "Main Assembly"),
        draft("F-201", "Flow", 8.0, 18.0, 2, "Cooling System"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SensorKind;
    use chrono::Utc;

    #[test]
    fn test_default_fleet_builds_valid_sensors() {
        let fleet = default_fleet();
        assert_eq!(fleet.len(), 6);

        for (i, draft) in fleet.into_iter().enumerate() {
            let sensor = draft.into_sensor(i as u32 + 1, Utc::now());
            assert!(sensor.min < sensor.max);
            assert!(sensor.frequency_ms >= 1000);
            assert!(!sensor.unit.is_empty());
            assert_ne!(sensor.location, "Not specified");
        }
    }

    #[test]
    fn test_default_fleet_units_follow_kind() {
        let fleet = default_fleet();
        let flow = fleet[5].clone().into_sensor(6, Utc::now());
        assert_eq!(flow.kind, SensorKind::Flow);
        assert_eq!(flow.unit, "L/min");
    }
}
