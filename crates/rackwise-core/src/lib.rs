//! Inventory state store for data centers, rooms, racks, devices, services
//! and IP subnets.
//!
//! - **[`Inventory`]**: the plain, serializable state graph. Data centers own
//!   rooms, rooms own racks, racks own 1-based units. Devices and services
//!   live in flat id-keyed maps and are cross-referenced by id; rack units
//!   and IP entries carry denormalized copies of device and service display
//!   fields that every operation keeps in sync.
//!
//! - **[`InventoryStore`]**: the explicit store handle. Each mutation runs as
//!   one transaction over a clone of the current state, is persisted through
//!   a [`StateBackend`], and is then published on a `tokio::sync::watch`
//!   channel. A failed operation publishes nothing.
//!
//! - **[`InventoryStream`]**: subscription handle vended by the store, with
//!   `current()` / `latest()` / `changed()` and a `Stream` adapter.
//!
//! - **Requests** ([`command::requests`]): typed inputs for creations and
//!   partial updates.

pub mod command;
pub mod error;
pub mod model;
pub mod persist;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use error::CoreError;
pub use persist::{DEFAULT_STORAGE_NAME, JsonFileBackend, MemoryBackend, StateBackend};
pub use store::{DEFAULT_MAX_NOTIFICATIONS, Inventory, InventoryStore, StoreOptions};
pub use stream::{DeviceFilter, InventoryStream, InventoryWatchStream, ServiceFilter};

pub use model::{
    Criticality, DataCenter, Device, DeviceLocation, DeviceStatus, EntityId, IpAddress, IpStatus,
    IpSubnet, Notification, NotificationKind, Rack, RackLocation, RackPath, RackUtilization, Room,
    Service, ServiceStatus, Unit,
};
