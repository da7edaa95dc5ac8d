// ── IP address management types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::entity_id::EntityId;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum IpStatus {
    #[default]
    Assigned,
    Available,
    Reserved,
    Deprecated,
}

/// An address embedded in a device's `ips` list, or held as a reservation.
///
/// Device and service names are denormalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAddress {
    pub id: EntityId,
    pub address: String,
    /// CIDR string of the owning subnet, matched exactly against `IpSubnet::subnet`.
    pub subnet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default)]
    pub status: IpStatus,
    #[serde(default)]
    pub device_id: Option<EntityId>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub service_id: Option<EntityId>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

/// Subnet with hand-maintained usage counters.
///
/// Counters are adjusted on every assign / release / reserve, never
/// recomputed from the underlying addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpSubnet {
    pub id: EntityId,
    pub subnet: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(rename = "totalIPs")]
    pub total_ips: u64,
    #[serde(rename = "usedIPs")]
    pub used_ips: u64,
    #[serde(rename = "availableIPs")]
    pub available_ips: u64,
    #[serde(rename = "reservedIPs")]
    pub reserved_ips: u64,
    #[serde(default)]
    pub service_id: Option<EntityId>,
}

impl IpSubnet {
    /// Usable host addresses for a prefix length: `2^(32 - prefix) - 2`,
    /// excluding network and broadcast, floored at zero.
    pub fn host_capacity(prefix_len: u8) -> u64 {
        let host_bits = 32u32.saturating_sub(u32::from(prefix_len));
        (1u64 << host_bits).saturating_sub(2)
    }

    pub(crate) fn record_assigned(&mut self) {
        self.used_ips += 1;
        self.available_ips = self.available_ips.saturating_sub(1);
    }

    pub(crate) fn record_released(&mut self) {
        self.used_ips = self.used_ips.saturating_sub(1);
        self.available_ips += 1;
    }

    pub(crate) fn record_reserved(&mut self) {
        self.reserved_ips += 1;
        self.available_ips = self.available_ips.saturating_sub(1);
    }

    pub(crate) fn record_unreserved(&mut self) {
        self.reserved_ips = self.reserved_ips.saturating_sub(1);
        self.available_ips += 1;
    }

    /// Share of host addresses in use or reserved, 0.0 – 100.0.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn utilization_pct(&self) -> f64 {
        if self.total_ips == 0 {
            return 0.0;
        }
        (self.used_ips + self.reserved_ips) as f64 / self.total_ips as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_capacity_excludes_network_and_broadcast() {
        assert_eq!(IpSubnet::host_capacity(24), 254);
        assert_eq!(IpSubnet::host_capacity(16), 65_534);
        assert_eq!(IpSubnet::host_capacity(30), 2);
        assert_eq!(IpSubnet::host_capacity(31), 0);
        assert_eq!(IpSubnet::host_capacity(32), 0);
        assert_eq!(IpSubnet::host_capacity(0), 4_294_967_294);
    }

    #[test]
    fn subnet_counters_use_original_field_names() {
        let subnet = IpSubnet {
            id: "subnet-1".into(),
            subnet: "10.0.0.0/24".into(),
            description: String::new(),
            gateway: None,
            total_ips: 254,
            used_ips: 1,
            available_ips: 253,
            reserved_ips: 0,
            service_id: None,
        };
        let json = serde_json::to_value(&subnet).unwrap_or_default();
        assert_eq!(json["totalIPs"], 254);
        assert_eq!(json["usedIPs"], 1);
        assert_eq!(json["availableIPs"], 253);
        assert_eq!(json["reservedIPs"], 0);
    }

    #[test]
    fn release_floors_used_at_zero() {
        let mut subnet = IpSubnet {
            id: "subnet-1".into(),
            subnet: "10.0.0.0/24".into(),
            description: String::new(),
            gateway: None,
            total_ips: 254,
            used_ips: 0,
            available_ips: 254,
            reserved_ips: 0,
            service_id: None,
        };
        subnet.record_released();
        assert_eq!(subnet.used_ips, 0);
        assert_eq!(subnet.available_ips, 255);
    }
}
