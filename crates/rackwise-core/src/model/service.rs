// ── Service domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::entity_id::EntityId;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ServiceStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Planned,
}

/// Business-impact tier. Display and filtering only.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Source of truth for service attributes.
///
/// `devices` mirrors `Device::service_id`: a device id is listed here iff
/// that device points back at this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: EntityId,
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
    #[serde(default)]
    pub devices: Vec<EntityId>,
}

impl Service {
    pub fn has_device(&self, device_id: &EntityId) -> bool {
        self.devices.contains(device_id)
    }

    pub(crate) fn link(&mut self, device_id: &EntityId) {
        if !self.has_device(device_id) {
            self.devices.push(device_id.clone());
        }
    }

    pub(crate) fn unlink(&mut self, device_id: &EntityId) {
        self.devices.retain(|id| id != device_id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn criticality_parses_case_insensitively() {
        assert_eq!("critical".parse::<Criticality>().unwrap(), Criticality::Critical);
        assert_eq!("HIGH".parse::<Criticality>().unwrap(), Criticality::High);
        assert!(Criticality::Critical > Criticality::Low);
    }

    #[test]
    fn link_is_idempotent() {
        let mut svc = Service {
            id: "service-1".into(),
            name: "Web".into(),
            description: String::new(),
            status: ServiceStatus::Active,
            criticality: Criticality::High,
            owner: None,
            department: None,
            devices: Vec::new(),
        };
        let dev = EntityId::from("dev-1");
        svc.link(&dev);
        svc.link(&dev);
        assert_eq!(svc.devices.len(), 1);
        svc.unlink(&dev);
        assert!(svc.devices.is_empty());
    }
}
