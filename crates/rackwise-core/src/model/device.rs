// ── Device domain types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::entity_id::EntityId;
use super::ipam::IpAddress;

/// Lifecycle state of a device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum DeviceStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Decommissioned,
}

impl DeviceStatus {
    pub fn is_in_service(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Source of truth for device attributes.
///
/// A device's rack placement is not stored here; it is represented only by
/// rack units carrying this device's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Height in rack units.
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ips: Vec<IpAddress>,
    #[serde(default)]
    pub status: DeviceStatus,
    /// Watts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_id: Option<EntityId>,
    /// Denormalized from the linked service.
    #[serde(default)]
    pub service_name: Option<String>,
}

impl Device {
    /// Address of the first IP, shown on rack units.
    pub fn primary_ip(&self) -> Option<&str> {
        self.ips.first().map(|ip| ip.address.as_str())
    }

    pub fn ip_by_id(&self, ip_id: &EntityId) -> Option<&IpAddress> {
        self.ips.iter().find(|ip| &ip.id == ip_id)
    }
}
