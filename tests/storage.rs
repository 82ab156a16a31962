mod common;

#[cfg(test)]
mod tests {
    use super::common::{charging_data, idle_data, moving_data, VIN};
    use carwatch::db::influx::{line_protocol, InfluxDb};
    use carwatch::db::snapshots::Snapshots;
    use carwatch::db::storage::{Storage, StorageBackend, StorageConfig, StorageError};
    use carwatch::libs::snapshot::Snapshot;
    use carwatch::libs::vehicle::VehicleData;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn at(data: &VehicleData, timestamp: DateTime<Utc>, activity: &str) -> Snapshot {
        Snapshot::with_description(data, activity, timestamp)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = Snapshots::in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(matches!(store.query_latest().await, Err(StorageError::Empty)));
    }

    #[tokio::test]
    async fn test_latest_is_by_timestamp() {
        let store = Snapshots::in_memory().unwrap();
        let newer = at(&charging_data(VIN), noon() + Duration::seconds(30), "Charging");
        let older = at(&idle_data(VIN), noon(), "Idle");

        store.insert(newer.clone()).await.unwrap();
        store.insert(older).await.unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.query_latest().await.unwrap(), newer);
    }

    #[tokio::test]
    async fn test_round_trips_optional_fields() {
        let store = Snapshots::in_memory().unwrap();

        let charging = at(&charging_data(VIN), noon(), "Charging");
        assert!(charging.charge_session.is_some());
        store.insert(charging.clone()).await.unwrap();
        assert_eq!(store.query_latest().await.unwrap(), charging);

        let mut data = moving_data(VIN);
        data.state = None;
        data.charge_state.charging_state = None;
        let moving = at(&data, noon() + Duration::milliseconds(1), "Moving");
        assert!(moving.charge_session.is_none());
        store.insert(moving.clone()).await.unwrap();

        let latest = store.query_latest().await.unwrap();
        assert_eq!(latest, moving);
        assert_eq!(latest.wake_state, None);
        assert_eq!(latest.bearings.speed, Some(42.0));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshots.db");

        {
            let store = Snapshots::open(Some(&path)).unwrap();
            store.insert(at(&idle_data(VIN), noon(), "Idle")).await.unwrap();
        }

        let store = Snapshots::open(Some(&path)).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.query_latest().await.unwrap().activity, "Idle");
    }

    #[tokio::test]
    async fn test_backend_from_config() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig::Sqlite {
            path: Some(dir.path().join("backend.db")),
        };
        let backend = StorageBackend::open(&config).unwrap();
        assert!(matches!(backend, StorageBackend::Sqlite(_)));

        let snapshot = at(&idle_data(VIN), noon(), "Idle");
        backend.insert(snapshot.clone()).await.unwrap();
        assert_eq!(backend.query_latest().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_influx_cannot_query() {
        let config = StorageConfig::Influxdb {
            address: "http://localhost:8086/".to_string(),
            username: String::new(),
            password: String::new(),
            database: "carwatch".to_string(),
        };
        let backend = StorageBackend::open(&config).unwrap();
        assert!(matches!(backend, StorageBackend::Influx(_)));
        assert!(matches!(
            backend.query_latest().await,
            Err(StorageError::Unsupported("query_latest"))
        ));

        let influx = InfluxDb::new("http://localhost:8086", "", "", "carwatch");
        assert!(matches!(influx.query_latest().await, Err(StorageError::Unsupported(_))));
    }

    #[test]
    fn test_line_protocol_parked() {
        let lines = line_protocol(&at(&idle_data(VIN), noon(), "Idle"));
        let expected = format!(
            "charge,car_name=Eve,vin={vin} batt_level=80i,range_left=240.5,charge_limit_soc=90i,state=\"Disconnected\" 1714566600\n\
             position,car_name=Eve,vin={vin} latitude=37.4,longitude=-122.1,odometer=12345.6 1714566600",
            vin = VIN
        );
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_line_protocol_charging_and_driving() {
        let mut data = charging_data(VIN);
        data.drive_state = moving_data(VIN).drive_state;
        let lines = line_protocol(&at(&data, noon(), "Moving"));
        let (charge, position) = lines.split_once('\n').unwrap();

        assert!(charge.contains("state=\"Charging\""));
        assert!(charge.contains("charge_miles_added=12,charge_rate=25"));
        assert!(charge.contains("voltage=240,actual_current=32,pilot_current=32,time_to_full_charge_hrs=1.5"));
        assert!(position.contains("speed=42,driving_state=\"D\""));
    }

    #[test]
    fn test_line_protocol_escapes_tags() {
        let mut data = idle_data(VIN);
        data.display_name = "My Car,1".to_string();
        let lines = line_protocol(&at(&data, noon(), "Idle"));
        assert!(lines.starts_with("charge,car_name=My\\ Car\\,1,vin="));
    }
}
