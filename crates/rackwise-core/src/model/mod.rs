// ── Domain model ──
//
// Plain serde types for the persisted inventory graph. Field names
// serialize in camelCase so the blob layout stays stable across front ends.

pub mod device;
pub mod entity_id;
pub mod hierarchy;
pub mod ipam;
pub mod notification;
pub mod service;

pub use device::{Device, DeviceStatus};
pub use entity_id::EntityId;
pub use hierarchy::{
    DataCenter, DeviceLocation, Rack, RackLocation, RackPath, RackUtilization, Room, Unit,
};
pub use ipam::{IpAddress, IpStatus, IpSubnet};
pub use notification::{Notification, NotificationKind};
pub use service::{Criticality, Service, ServiceStatus};
