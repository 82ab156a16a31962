use super::snapshot::Snapshot;
use super::vehicle::VehicleSummary;
use prettytable::{row, Table};

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub struct View {}

impl View {
    pub fn vehicles(vehicles: &[VehicleSummary]) {
        let mut table = Table::new();
        table.add_row(row!["ID", "VIN", "NAME", "STATE"]);
        for vehicle in vehicles {
            table.add_row(row![vehicle.id, vehicle.vin, vehicle.display_name, vehicle.state_string()]);
        }
        table.printstd();
    }

    /// Prints one snapshot as a two-column field/value table.
    pub fn snapshot(snapshot: &Snapshot) {
        let mut table = Table::new();
        table.add_row(row!["FIELD", "VALUE"]);
        table.add_row(row!["Time", snapshot.timestamp.to_rfc3339()]);
        table.add_row(row!["Name", snapshot.name]);
        table.add_row(row!["VIN", snapshot.vin]);
        table.add_row(row!["Wake state", optional(&snapshot.wake_state)]);
        table.add_row(row!["Activity", snapshot.activity]);
        table.add_row(row!["Driving state", optional(&snapshot.driving_state)]);
        table.add_row(row![
            "Position",
            format!("{:.5}, {:.5}", snapshot.bearings.latitude, snapshot.bearings.longitude)
        ]);
        table.add_row(row!["Speed", optional(&snapshot.bearings.speed)]);
        table.add_row(row!["Charging state", optional(&snapshot.charging_state)]);
        table.add_row(row!["Battery", format!("{}% (limit {}%)", snapshot.battery_level, snapshot.charge_limit_soc)]);
        table.add_row(row!["Range", format!("{:.1}", snapshot.range_left)]);
        if let Some(session) = &snapshot.charge_session {
            table.add_row(row!["Voltage", optional(&session.voltage)]);
            table.add_row(row!["Current", optional(&session.actual_current)]);
            table.add_row(row!["Charge rate", session.charge_rate]);
            table.add_row(row!["Time to full", optional(&session.time_to_full_charge)]);
        }
        table.add_row(row!["Odometer", format!("{:.1}", snapshot.odometer)]);
        table.printstd();
    }
}
