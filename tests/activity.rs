mod common;

#[cfg(test)]
mod tests {
    use super::common::{charging_data, idle_data, moving_data, VIN};
    use carwatch::libs::activity::{classify, Activity, DEFAULT_IDLE_SAMPLING_FREQUENCY};
    use carwatch::libs::vehicle::{ChargingState, ShiftState};
    use std::time::Duration;

    #[test]
    fn test_speed_wins_over_everything_else() {
        let mut data = charging_data(VIN);
        data.drive_state.speed = Some(3.0);
        data.drive_state.shift_state = Some(ShiftState::Drive);
        data.vehicle_state.sentry_mode = Some(true);
        data.vehicle_state.center_display_state = Some(2);
        data.climate_state.is_climate_on = Some(true);

        let classification = classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        assert_eq!(classification.activity, Activity::Moving);
        assert_eq!(classification.poll_interval, Duration::from_secs(1));
        assert!(!classification.begin_idle_countdown);
    }

    #[test]
    fn test_in_gear_without_speed() {
        let mut data = idle_data(VIN);
        data.drive_state.speed = Some(0.0);
        data.drive_state.shift_state = Some(ShiftState::Drive);
        data.charge_state.charging_state = Some(ChargingState::Disconnected);

        let classification = classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        assert_eq!(classification.activity, Activity::InGear);
        assert_eq!(classification.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_reverse_and_neutral_count_as_in_gear_but_park_does_not() {
        for shift in [ShiftState::Reverse, ShiftState::Neutral] {
            let mut data = idle_data(VIN);
            data.drive_state.shift_state = Some(shift);
            assert_eq!(classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY).activity, Activity::InGear);
        }

        let mut parked = idle_data(VIN);
        parked.drive_state.shift_state = Some(ShiftState::Park);
        assert_eq!(classify(&parked, DEFAULT_IDLE_SAMPLING_FREQUENCY).activity, Activity::Idle);
    }

    #[test]
    fn test_charging_beats_sentry_mode() {
        let mut data = charging_data(VIN);
        data.vehicle_state.sentry_mode = Some(true);

        let classification = classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        assert_eq!(classification.activity, Activity::Charging);
        assert_eq!(classification.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_starting_charge_counts_as_charging() {
        let mut data = idle_data(VIN);
        data.charge_state.charging_state = Some(ChargingState::Starting);
        assert_eq!(classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY).activity, Activity::Charging);
    }

    #[test]
    fn test_complete_charge_is_not_activity() {
        let mut data = idle_data(VIN);
        data.charge_state.charging_state = Some(ChargingState::Complete);
        assert_eq!(classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY).activity, Activity::Idle);
    }

    #[test]
    fn test_lower_priority_rules() {
        let mut sentry = idle_data(VIN);
        sentry.vehicle_state.sentry_mode = Some(true);
        sentry.vehicle_state.center_display_state = Some(1);
        let classification = classify(&sentry, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        assert_eq!(classification.activity, Activity::SentryMode);
        assert_eq!(classification.poll_interval, Duration::from_secs(30));

        let mut display = idle_data(VIN);
        display.vehicle_state.center_display_state = Some(1);
        display.climate_state.is_climate_on = Some(true);
        let classification = classify(&display, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        assert_eq!(classification.activity, Activity::DisplayOn);
        assert_eq!(classification.poll_interval, Duration::from_secs(10));

        let mut climate = idle_data(VIN);
        climate.climate_state.is_climate_on = Some(true);
        let classification = classify(&climate, DEFAULT_IDLE_SAMPLING_FREQUENCY);
        assert_eq!(classification.activity, Activity::ClimateOn);
        assert_eq!(classification.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_idle_uses_sampling_frequency_and_starts_countdown() {
        let classification = classify(&idle_data(VIN), Duration::from_secs(45));
        assert_eq!(classification.activity, Activity::Idle);
        assert_eq!(classification.poll_interval, Duration::from_secs(45));
        assert!(classification.begin_idle_countdown);
    }

    #[test]
    fn test_only_idle_starts_countdown() {
        for data in [moving_data(VIN), charging_data(VIN)] {
            assert!(!classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY).begin_idle_countdown);
        }
    }

    #[test]
    fn test_missing_flags_are_treated_as_off() {
        let mut data = idle_data(VIN);
        data.vehicle_state.sentry_mode = None;
        data.vehicle_state.center_display_state = None;
        data.climate_state.is_climate_on = None;
        data.charge_state.charging_state = None;
        assert_eq!(classify(&data, DEFAULT_IDLE_SAMPLING_FREQUENCY).activity, Activity::Idle);
    }
}
