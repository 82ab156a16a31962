mod common;

#[cfg(test)]
mod tests {
    use super::common::{charging_data, idle_data, VIN};
    use carwatch::libs::activity::{classify, Activity, DEFAULT_IDLE_SAMPLING_FREQUENCY};
    use carwatch::libs::snapshot::{ChargeSession, Snapshot};
    use carwatch::libs::vehicle::{ChargingState, ShiftState};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    #[test]
    fn test_in_gear_disconnected_has_no_charge_session() {
        let mut data = idle_data(VIN);
        data.drive_state.speed = Some(0.0);
        data.drive_state.shift_state = Some(ShiftState::Drive);
        data.charge_state.charging_state = Some(ChargingState::Disconnected);
        data.charge_state.charger_voltage = Some(2.0);

        let classification = classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        let snapshot = Snapshot::new(&data, &classification, Utc::now());

        assert_eq!(classification.activity, Activity::InGear);
        assert_eq!(classification.poll_interval, Duration::from_secs(2));
        assert_eq!(snapshot.charge_session, None);
        assert_eq!(snapshot.activity, "In gear");
    }

    #[test]
    fn test_charging_populates_charge_session_from_same_sample() {
        let mut data = charging_data(VIN);
        data.drive_state.speed = Some(0.0);
        data.drive_state.shift_state = None;

        let classification = classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        let snapshot = Snapshot::new(&data, &classification, Utc::now());

        assert_eq!(classification.activity, Activity::Charging);
        assert_eq!(classification.poll_interval, Duration::from_secs(3));
        assert_eq!(
            snapshot.charge_session,
            Some(ChargeSession {
                voltage: Some(240.0),
                actual_current: Some(32.0),
                pilot_current: Some(32.0),
                time_to_full_charge: Some(1.5),
                charge_miles_added: 12.0,
                charge_rate: 25.0,
            })
        );
    }

    #[test]
    fn test_starting_also_populates_charge_session() {
        let mut data = charging_data(VIN);
        data.charge_state.charging_state = Some(ChargingState::Starting);
        let snapshot = Snapshot::with_description(&data, "Charging", Utc::now());
        assert!(snapshot.charge_session.is_some());
    }

    #[test]
    fn test_unreported_charging_state_has_no_charge_session() {
        let mut data = charging_data(VIN);
        data.charge_state.charging_state = None;
        let snapshot = Snapshot::with_description(&data, "Idle", Utc::now());
        assert_eq!(snapshot.charge_session, None);
        assert_eq!(snapshot.charging_state, None);
    }

    #[test]
    fn test_snapshot_copies_identity_and_position() {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut data = idle_data(VIN);
        data.drive_state.speed = None;
        data.drive_state.shift_state = None;

        let snapshot = Snapshot::with_description(&data, "Idle", timestamp);

        assert_eq!(snapshot.timestamp, timestamp);
        assert_eq!(snapshot.vin, VIN);
        assert_eq!(snapshot.name, "Eve");
        assert_eq!(snapshot.wake_state.as_deref(), Some("online"));
        assert_eq!(snapshot.driving_state, None);
        assert_eq!(snapshot.bearings.latitude, 37.4);
        assert_eq!(snapshot.bearings.longitude, -122.1);
        assert_eq!(snapshot.bearings.speed, None);
        assert_eq!(snapshot.battery_level, 80);
        assert_eq!(snapshot.range_left, 240.5);
        assert_eq!(snapshot.charge_limit_soc, 90);
        assert_eq!(snapshot.odometer, 12_345.6);
    }
}
