//! InfluxDB 1.x backend writing snapshots as line protocol.
//!
//! Each snapshot becomes two points, `charge` and `position`, tagged with
//! the car name and VIN and stamped with second precision. Reading back is
//! not supported: dashboards query InfluxDB directly.

use super::storage::{Storage, StorageError};
use crate::libs::messages::Message;
use crate::libs::snapshot::Snapshot;
use crate::msg_debug;
use reqwest::Client;
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct InfluxDb {
    client: Client,
    address: String,
    username: String,
    password: String,
    database: String,
}

impl InfluxDb {
    pub fn new(address: &str, username: &str, password: &str, database: &str) -> Self {
        Self {
            client: Client::new(),
            address: address.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            database: database.to_string(),
        }
    }
}

impl Storage for InfluxDb {
    async fn insert(&self, snapshot: Snapshot) -> Result<(), StorageError> {
        let url = format!("{}/write", self.address);
        let mut request = self
            .client
            .post(&url)
            .query(&[("db", self.database.as_str()), ("precision", "s")])
            .body(line_protocol(&snapshot));
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status { status, body });
        }

        msg_debug!(Message::InfluxWriteSucceeded);
        Ok(())
    }

    async fn query_latest(&self) -> Result<Snapshot, StorageError> {
        Err(StorageError::Unsupported("query_latest"))
    }
}

enum Field {
    Float(f64),
    Int(i64),
    Text(String),
}

/// Renders the `charge` and `position` points of `snapshot`, one per line.
pub fn line_protocol(snapshot: &Snapshot) -> String {
    let tags = format!("car_name={},vin={}", escape_tag(&snapshot.name), escape_tag(&snapshot.vin));
    let timestamp = snapshot.timestamp.timestamp();

    let mut charge = vec![
        ("batt_level", Field::Int(snapshot.battery_level)),
        ("range_left", Field::Float(snapshot.range_left)),
        ("charge_limit_soc", Field::Int(snapshot.charge_limit_soc)),
    ];
    if let Some(state) = &snapshot.charging_state {
        charge.push(("state", Field::Text(state.to_string())));
    }
    if let Some(session) = &snapshot.charge_session {
        charge.push(("charge_miles_added", Field::Float(session.charge_miles_added)));
        charge.push(("charge_rate", Field::Float(session.charge_rate)));
        let optional = [
            ("voltage", session.voltage),
            ("actual_current", session.actual_current),
            ("pilot_current", session.pilot_current),
            ("time_to_full_charge_hrs", session.time_to_full_charge),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                charge.push((key, Field::Float(value)));
            }
        }
    }

    let mut position = vec![
        ("latitude", Field::Float(snapshot.bearings.latitude)),
        ("longitude", Field::Float(snapshot.bearings.longitude)),
        ("odometer", Field::Float(snapshot.odometer)),
    ];
    if let Some(speed) = snapshot.bearings.speed {
        position.push(("speed", Field::Float(speed)));
    }
    if let Some(driving) = &snapshot.driving_state {
        position.push(("driving_state", Field::Text(driving.to_string())));
    }

    format!(
        "{}\n{}",
        point("charge", &tags, &charge, timestamp),
        point("position", &tags, &position, timestamp)
    )
}

fn point(measurement: &str, tags: &str, fields: &[(&str, Field)], timestamp: i64) -> String {
    let mut line = format!("{},{} ", measurement, tags);
    for (index, (key, value)) in fields.iter().enumerate() {
        if index > 0 {
            line.push(',');
        }
        let _ = match value {
            Field::Float(v) => write!(line, "{}={}", key, v),
            Field::Int(v) => write!(line, "{}={}i", key, v),
            Field::Text(v) => write!(line, "{}=\"{}\"", key, v.replace('\\', "\\\\").replace('"', "\\\"")),
        };
    }
    let _ = write!(line, " {}", timestamp);
    line
}

fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
