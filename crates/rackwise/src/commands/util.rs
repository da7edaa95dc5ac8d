//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use rackwise_core::{EntityId, Inventory, RackPath};

use crate::error::CliError;

/// Resolve a rack ID to its full path via snapshot lookup.
pub fn resolve_rack(inv: &Inventory, rack_id: &str) -> Result<RackPath, CliError> {
    inv.find_rack(&EntityId::from(rack_id))
        .map(RackPath::from)
        .ok_or_else(|| CliError::not_found("rack", rack_id, "rack list"))
}

/// Resolve a room ID to `(data center ID, room ID)`.
pub fn resolve_room(inv: &Inventory, room_id: &str) -> Result<(EntityId, EntityId), CliError> {
    inv.data_centers()
        .iter()
        .find_map(|dc| {
            dc.rooms
                .iter()
                .find(|room| room.id == room_id)
                .map(|room| (dc.id.clone(), room.id.clone()))
        })
        .ok_or_else(|| CliError::not_found("room", room_id, "room list"))
}

/// The rack a device operation is addressed through: the device's own rack
/// when it is mounted, otherwise `--rack`.
pub fn device_rack(
    inv: &Inventory,
    device_id: &EntityId,
    rack_override: Option<&str>,
) -> Result<RackPath, CliError> {
    if inv.device(device_id).is_none() {
        return Err(CliError::not_found("device", device_id.as_str(), "device list"));
    }
    if let Some(rack_id) = rack_override {
        return resolve_rack(inv, rack_id);
    }
    match inv.device_location(device_id) {
        Some(loc) => Ok(RackPath::new(loc.data_center_id, loc.room_id, loc.rack_id)),
        None => Err(CliError::validation(
            "rack",
            format!("device {device_id} is not mounted; pass --rack <rack-id>"),
        )),
    }
}

/// Parse a case-insensitive enum value such as a status or criticality.
pub fn parse_value<T: FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value
        .parse()
        .map_err(|_| CliError::validation(field, format!("unrecognized value '{value}'")))
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| CliError::validation(field, format!("expected YYYY-MM-DD: {e}")))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// `-` for absent optional display values.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rackwise_core::DeviceStatus;

    #[test]
    fn resolves_demo_rack_and_room() {
        let inv = Inventory::demo();
        let path = resolve_rack(&inv, "rack-7").unwrap();
        assert_eq!(path, RackPath::new("dc-2", "room-3", "rack-7"));

        let (dc, room) = resolve_room(&inv, "room-2").unwrap();
        assert_eq!((dc.as_str(), room.as_str()), ("dc-1", "room-2"));

        assert!(matches!(
            resolve_rack(&inv, "rack-99").unwrap_err(),
            CliError::NotFound { .. }
        ));
    }

    #[test]
    fn parses_statuses_and_dates() {
        let status: DeviceStatus = parse_value("status", "maintenance").unwrap();
        assert_eq!(status, DeviceStatus::Maintenance);
        assert!(parse_value::<DeviceStatus>("status", "broken").is_err());
        assert_eq!(
            parse_date("installed", "2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("installed", "03/01/2024").is_err());
    }

    #[test]
    fn confirm_short_circuits_on_yes() {
        assert!(confirm("delete", "Really?", true).unwrap());
    }
}
