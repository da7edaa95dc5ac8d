// ── Typed request structs for store mutations ──
//
// Create requests carry everything needed to build a new entity; update
// requests are partial, with `None` meaning "leave unchanged".

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Criticality, DeviceStatus, EntityId, IpAddress, ServiceStatus};

/// Deserialize a present field (including `null`) as `Some(..)`, so a
/// missing field and an explicit `null` stay distinguishable.
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

// ── Device ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    /// Caller-supplied id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ips: Vec<IpAddress>,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<EntityId>,
}

impl NewDevice {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_service(mut self, service_id: impl Into<EntityId>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_ips(mut self, ips: Vec<IpAddress>) -> Self {
        self.ips = ips;
        self
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial device update. `service_id: Some(None)` unlinks the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ips: Option<Vec<IpAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_consumption: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_id: Option<Option<EntityId>>,
}

impl DeviceUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.device_type.is_none()
            && self.model.is_none()
            && self.size.is_none()
            && self.description.is_none()
            && self.ips.is_none()
            && self.status.is_none()
            && self.power_consumption.is_none()
            && self.installation_date.is_none()
            && self.service_id.is_none()
    }
}

// ── Service ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default)]
    pub criticality: Criticality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl NewService {
    pub fn new(name: impl Into<String>, status: ServiceStatus, criticality: Criticality) -> Self {
        Self {
            name: name.into(),
            status,
            criticality,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Criticality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

// ── Subnet ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubnet {
    /// Network address, e.g. `192.168.1.0`.
    pub network: String,
    /// CIDR prefix length, 0–32.
    pub prefix_len: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Addresses held back from the available pool at creation.
    #[serde(default)]
    pub reserved_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<EntityId>,
}

impl NewSubnet {
    pub fn new(network: impl Into<String>, description: impl Into<String>, prefix_len: u8) -> Self {
        Self {
            network: network.into(),
            prefix_len,
            description: description.into(),
            gateway: None,
            reserved_count: 0,
            service_id: None,
        }
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    pub fn with_reserved(mut self, reserved_count: u64) -> Self {
        self.reserved_count = reserved_count;
        self
    }

    pub fn with_service(mut self, service_id: impl Into<EntityId>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// `network/prefix` CIDR string.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.network, self.prefix_len)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_id: Option<Option<EntityId>>,
    #[serde(rename = "totalIPs", skip_serializing_if = "Option::is_none")]
    pub total_ips: Option<u64>,
    #[serde(rename = "usedIPs", skip_serializing_if = "Option::is_none")]
    pub used_ips: Option<u64>,
    #[serde(rename = "availableIPs", skip_serializing_if = "Option::is_none")]
    pub available_ips: Option<u64>,
    #[serde(rename = "reservedIPs", skip_serializing_if = "Option::is_none")]
    pub reserved_ips: Option<u64>,
}

// ── IP address ─────────────────────────────────────────────────────

/// Input for `assign_ip` / `reserve_ip`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub address: String,
    /// CIDR string of the target subnet.
    pub subnet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Owning device; required for assignment, ignored for reservations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<EntityId>,
}

impl NewIp {
    pub fn new(address: impl Into<String>, subnet: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            subnet: subnet.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn for_device(mut self, device_id: impl Into<EntityId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_update_distinguishes_null_from_missing_service() {
        let missing: DeviceUpdate = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(missing.service_id, None);

        let cleared: DeviceUpdate = serde_json::from_str(r#"{"serviceId":null}"#).unwrap();
        assert_eq!(cleared.service_id, Some(None));

        let set: DeviceUpdate = serde_json::from_str(r#"{"serviceId":"service-1"}"#).unwrap();
        assert_eq!(set.service_id, Some(Some(EntityId::from("service-1"))));
    }

    #[test]
    fn new_device_accepts_original_type_key() {
        let dev: NewDevice =
            serde_json::from_str(r#"{"name":"web-01","type":"Server","size":2}"#).unwrap();
        assert_eq!(dev.device_type, "Server");
        assert_eq!(dev.size, 2);
        assert!(dev.ips.is_empty());
    }

    #[test]
    fn new_subnet_formats_cidr() {
        let subnet = NewSubnet::new("192.168.1.0", "Office", 24);
        assert_eq!(subnet.cidr(), "192.168.1.0/24");
        assert_eq!(subnet.reserved_count, 0);
    }

    #[test]
    fn empty_update_reports_empty() {
        assert!(DeviceUpdate::default().is_empty());
        let update = DeviceUpdate {
            size: Some(2),
            ..DeviceUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
