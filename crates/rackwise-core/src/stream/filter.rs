// ── Filter predicates over inventory snapshots ──
//
// Read-side filtering for front ends; never touches the store.

use crate::model::{Criticality, Device, DeviceStatus, EntityId, Service, ServiceStatus};
use crate::store::Inventory;

/// Filter predicate for devices.
pub enum DeviceFilter {
    All,
    ByStatus(DeviceStatus),
    /// Case-insensitive match on the free-form device type.
    ByType(String),
    ByService(EntityId),
    /// Devices that occupy no rack unit.
    Unplaced,
    /// Case-insensitive substring match on the device name.
    NameContains(String),
    Custom(Box<dyn Fn(&Device) -> bool + Send + Sync>),
}

impl DeviceFilter {
    pub fn matches(&self, inventory: &Inventory, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::ByStatus(status) => device.status == *status,
            Self::ByType(device_type) => device.device_type.eq_ignore_ascii_case(device_type),
            Self::ByService(service_id) => device.service_id.as_ref() == Some(service_id),
            Self::Unplaced => inventory.device_location(&device.id).is_none(),
            Self::NameContains(needle) => device
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Self::Custom(f) => f(device),
        }
    }

    /// Matching devices in insertion order.
    pub fn apply<'a>(&self, inventory: &'a Inventory) -> Vec<&'a Device> {
        inventory
            .devices()
            .filter(|device| self.matches(inventory, device))
            .collect()
    }
}

/// Filter predicate for services.
pub enum ServiceFilter {
    All,
    ByStatus(ServiceStatus),
    /// Services at or above the given criticality.
    AtLeast(Criticality),
    Custom(Box<dyn Fn(&Service) -> bool + Send + Sync>),
}

impl ServiceFilter {
    pub fn matches(&self, service: &Service) -> bool {
        match self {
            Self::All => true,
            Self::ByStatus(status) => service.status == *status,
            Self::AtLeast(floor) => service.criticality >= *floor,
            Self::Custom(f) => f(service),
        }
    }

    pub fn apply<'a>(&self, inventory: &'a Inventory) -> Vec<&'a Service> {
        inventory.services().filter(|s| self.matches(s)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::requests::NewDevice;
    use crate::model::RackPath;

    fn names(devices: &[&Device]) -> Vec<String> {
        devices.iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn device_filters() {
        let mut inv = Inventory::demo();
        let rack = RackPath::new("dc-1", "room-1", "rack-1");
        inv.add_device(
            &rack,
            1,
            NewDevice::new("web-01", 1)
                .with_type("Server")
                .with_service("service-1"),
        )
        .unwrap();
        inv.add_device(
            &rack,
            2,
            NewDevice::new("core-sw", 1)
                .with_type("Switch")
                .with_status(DeviceStatus::Maintenance),
        )
        .unwrap();
        inv.delete_rack(&RackPath::new("dc-1", "room-1", "rack-1"))
            .unwrap();
        inv.add_device(
            &RackPath::new("dc-1", "room-1", "rack-2"),
            10,
            NewDevice::new("WEB-02", 2).with_type("server"),
        )
        .unwrap();

        assert_eq!(DeviceFilter::All.apply(&inv).len(), 3);
        assert_eq!(
            names(&DeviceFilter::ByType("SERVER".into()).apply(&inv)),
            vec!["web-01", "WEB-02"]
        );
        assert_eq!(
            names(&DeviceFilter::ByStatus(DeviceStatus::Maintenance).apply(&inv)),
            vec!["core-sw"]
        );
        assert_eq!(
            names(&DeviceFilter::ByService("service-1".into()).apply(&inv)),
            vec!["web-01"]
        );
        assert_eq!(
            names(&DeviceFilter::Unplaced.apply(&inv)),
            vec!["web-01", "core-sw"]
        );
        assert_eq!(
            names(&DeviceFilter::NameContains("web".into()).apply(&inv)),
            vec!["web-01", "WEB-02"]
        );
        let tall = DeviceFilter::Custom(Box::new(|d| d.size > 1));
        assert_eq!(names(&tall.apply(&inv)), vec!["WEB-02"]);
    }

    #[test]
    fn service_filters() {
        let inv = Inventory::demo();
        assert_eq!(ServiceFilter::All.apply(&inv).len(), 3);
        assert_eq!(ServiceFilter::AtLeast(Criticality::High).apply(&inv).len(), 2);
        let maintenance = ServiceFilter::ByStatus(ServiceStatus::Maintenance).apply(&inv);
        assert_eq!(maintenance[0].name, "Email Server");
    }
}
