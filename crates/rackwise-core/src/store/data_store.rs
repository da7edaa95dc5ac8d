// ── Transactional inventory store ──
//
// One explicit handle owns the current state. Every mutation runs against
// a private clone; only a fully applied and persisted state is published
// to subscribers.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use super::inventory::Inventory;
use crate::command::requests::{
    DeviceUpdate, NewDevice, NewIp, NewService, NewSubnet, ServiceUpdate, SubnetUpdate,
};
use crate::error::CoreError;
use crate::model::{
    DataCenter, Device, DeviceLocation, EntityId, IpAddress, IpSubnet, Notification, Rack,
    RackPath, Room, Service,
};
use crate::persist::{MemoryBackend, StateBackend};
use crate::stream::InventoryStream;

/// Default cap on the activity feed.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 100;

/// Construction options for [`InventoryStore`].
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Oldest notifications beyond this count are dropped on every commit.
    pub max_notifications: usize,
    /// Start from [`Inventory::demo`] when the backend holds nothing.
    pub seed_demo: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_notifications: DEFAULT_MAX_NOTIFICATIONS,
            seed_demo: false,
        }
    }
}

/// Single source of truth for the inventory.
///
/// Reads are snapshots (`Arc<Inventory>`) and never block writers for
/// longer than a pointer clone. Writes are serialized through the backend
/// lock and broadcast via a `watch` channel.
pub struct InventoryStore {
    state: watch::Sender<Arc<Inventory>>,
    version: watch::Sender<u64>,
    backend: Mutex<Box<dyn StateBackend + Send>>,
    max_notifications: usize,
}

impl InventoryStore {
    /// Hydrate from `backend`, falling back to an empty inventory (or the
    /// demo inventory when `options.seed_demo` is set).
    pub fn open(
        backend: impl StateBackend + Send + 'static,
        options: StoreOptions,
    ) -> Result<Self, CoreError> {
        let mut backend = backend;
        let initial = match backend.load()? {
            Some(inventory) => {
                info!(
                    devices = inventory.device_count(),
                    data_centers = inventory.data_centers().len(),
                    "hydrated inventory"
                );
                inventory
            }
            None if options.seed_demo => {
                let demo = Inventory::demo();
                backend.save(&demo)?;
                info!("seeded demo inventory");
                demo
            }
            None => Inventory::new(),
        };
        Ok(Self::from_parts(initial, Box::new(backend), options))
    }

    /// An empty store backed by memory only.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Inventory::new(),
            Box::new(MemoryBackend::new()),
            StoreOptions::default(),
        )
    }

    /// A memory-backed store starting from `inventory`.
    pub fn with_inventory(inventory: Inventory) -> Self {
        Self::from_parts(
            inventory,
            Box::new(MemoryBackend::new()),
            StoreOptions::default(),
        )
    }

    fn from_parts(
        initial: Inventory,
        backend: Box<dyn StateBackend + Send>,
        options: StoreOptions,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        let (version, _) = watch::channel(0u64);
        Self {
            state,
            version,
            backend: Mutex::new(backend),
            max_notifications: options.max_notifications,
        }
    }

    // ── Snapshots and subscriptions ──────────────────────────────────

    /// The current committed state.
    pub fn snapshot(&self) -> Arc<Inventory> {
        self.state.borrow().clone()
    }

    /// Number of commits since the store was opened.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn subscribe(&self) -> InventoryStream {
        InventoryStream::new(self.state.subscribe())
    }

    pub fn subscribe_version(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    // ── Transactions ─────────────────────────────────────────────────

    /// Apply `apply` to a clone of the current state, persist the result
    /// and publish it. On any error nothing is published.
    pub fn transact<T>(
        &self,
        operation: &str,
        apply: impl FnOnce(&mut Inventory) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut backend = self
            .backend
            .lock()
            .map_err(|_| CoreError::Internal("state backend lock poisoned".into()))?;

        let mut next = Inventory::clone(&self.state.borrow());
        let output = apply(&mut next)?;
        next.trim_notifications(self.max_notifications);
        backend.save(&next)?;

        self.state.send_replace(Arc::new(next));
        self.version.send_modify(|v| *v += 1);
        debug!(operation, version = self.version(), "transaction committed");
        Ok(output)
    }

    /// Replace the whole inventory.
    pub fn replace_all(&self, inventory: Inventory) -> Result<(), CoreError> {
        self.transact("replace_all", move |state| {
            *state = inventory;
            Ok(())
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn device(&self, id: &EntityId) -> Option<Device> {
        self.snapshot().device(id).cloned()
    }

    pub fn devices(&self) -> Vec<Device> {
        self.snapshot().devices().cloned().collect()
    }

    pub fn service(&self, id: &EntityId) -> Option<Service> {
        self.snapshot().service(id).cloned()
    }

    pub fn services(&self) -> Vec<Service> {
        self.snapshot().services().cloned().collect()
    }

    pub fn subnets(&self) -> Vec<IpSubnet> {
        self.snapshot().subnets().to_vec()
    }

    /// Full path of the rack with this id, if any.
    pub fn find_rack(&self, rack_id: &EntityId) -> Option<RackPath> {
        self.snapshot().find_rack(rack_id).map(RackPath::from)
    }

    pub fn device_location(&self, device_id: &EntityId) -> Option<DeviceLocation> {
        self.snapshot().device_location(device_id)
    }

    // ── Hierarchy ────────────────────────────────────────────────────

    pub fn add_data_center(&self, name: &str) -> Result<EntityId, CoreError> {
        self.transact("add_data_center", |inv| Ok(inv.add_data_center(name)))
    }

    pub fn update_data_center(&self, id: &EntityId, name: &str) -> Result<(), CoreError> {
        self.transact("update_data_center", |inv| inv.update_data_center(id, name))
    }

    pub fn delete_data_center(&self, id: &EntityId) -> Result<DataCenter, CoreError> {
        self.transact("delete_data_center", |inv| inv.delete_data_center(id))
    }

    pub fn replace_data_centers(&self, data_centers: Vec<DataCenter>) -> Result<(), CoreError> {
        self.transact("replace_data_centers", move |inv| {
            inv.replace_data_centers(data_centers);
            Ok(())
        })
    }

    pub fn add_room(&self, data_center_id: &EntityId, name: &str) -> Result<EntityId, CoreError> {
        self.transact("add_room", |inv| inv.add_room(data_center_id, name))
    }

    pub fn update_room(
        &self,
        data_center_id: &EntityId,
        room_id: &EntityId,
        name: &str,
    ) -> Result<(), CoreError> {
        self.transact("update_room", |inv| {
            inv.update_room(data_center_id, room_id, name)
        })
    }

    pub fn delete_room(
        &self,
        data_center_id: &EntityId,
        room_id: &EntityId,
    ) -> Result<Room, CoreError> {
        self.transact("delete_room", |inv| inv.delete_room(data_center_id, room_id))
    }

    pub fn add_rack(
        &self,
        data_center_id: &EntityId,
        room_id: &EntityId,
        name: &str,
        total_units: u32,
    ) -> Result<EntityId, CoreError> {
        self.transact("add_rack", |inv| {
            inv.add_rack(data_center_id, room_id, name, total_units)
        })
    }

    pub fn update_rack(
        &self,
        path: &RackPath,
        name: &str,
        total_units: u32,
    ) -> Result<(), CoreError> {
        self.transact("update_rack", |inv| inv.update_rack(path, name, total_units))
    }

    pub fn delete_rack(&self, path: &RackPath) -> Result<Rack, CoreError> {
        self.transact("delete_rack", |inv| inv.delete_rack(path))
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub fn add_device(
        &self,
        path: &RackPath,
        start: u32,
        request: NewDevice,
    ) -> Result<EntityId, CoreError> {
        self.transact("add_device", move |inv| inv.add_device(path, start, request))
    }

    pub fn update_device(
        &self,
        path: &RackPath,
        device_id: &EntityId,
        update: DeviceUpdate,
    ) -> Result<(), CoreError> {
        self.transact("update_device", move |inv| {
            inv.update_device(path, device_id, update)
        })
    }

    pub fn delete_device(&self, path: &RackPath, device_id: &EntityId) -> Result<Device, CoreError> {
        self.transact("delete_device", |inv| inv.delete_device(path, device_id))
    }

    pub fn move_device(
        &self,
        source: &RackPath,
        device_id: &EntityId,
        destination: &RackPath,
        position: u32,
    ) -> Result<(), CoreError> {
        self.transact("move_device", |inv| {
            inv.move_device(source, device_id, destination, position)
        })
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn add_service(&self, request: NewService) -> Result<EntityId, CoreError> {
        self.transact("add_service", move |inv| Ok(inv.add_service(request)))
    }

    pub fn update_service(
        &self,
        service_id: &EntityId,
        update: ServiceUpdate,
    ) -> Result<(), CoreError> {
        self.transact("update_service", move |inv| {
            inv.update_service(service_id, update)
        })
    }

    pub fn delete_service(&self, service_id: &EntityId) -> Result<Service, CoreError> {
        self.transact("delete_service", |inv| inv.delete_service(service_id))
    }

    pub fn assign_device_to_service(
        &self,
        device_id: &EntityId,
        service_id: &EntityId,
    ) -> Result<(), CoreError> {
        self.transact("assign_device_to_service", |inv| {
            inv.assign_device_to_service(device_id, service_id)
        })
    }

    pub fn remove_device_from_service(
        &self,
        device_id: &EntityId,
        service_id: &EntityId,
    ) -> Result<bool, CoreError> {
        self.transact("remove_device_from_service", |inv| {
            inv.remove_device_from_service(device_id, service_id)
        })
    }

    // ── IPAM ─────────────────────────────────────────────────────────

    pub fn add_subnet(&self, request: NewSubnet) -> Result<EntityId, CoreError> {
        self.transact("add_subnet", move |inv| inv.add_subnet(request))
    }

    pub fn update_subnet(
        &self,
        subnet_id: &EntityId,
        update: SubnetUpdate,
    ) -> Result<(), CoreError> {
        self.transact("update_subnet", move |inv| inv.update_subnet(subnet_id, update))
    }

    pub fn delete_subnet(&self, subnet_id: &EntityId) -> Result<IpSubnet, CoreError> {
        self.transact("delete_subnet", |inv| inv.delete_subnet(subnet_id))
    }

    pub fn assign_ip(&self, request: NewIp) -> Result<EntityId, CoreError> {
        self.transact("assign_ip", move |inv| inv.assign_ip(request))
    }

    pub fn release_ip(&self, ip_id: &EntityId) -> Result<IpAddress, CoreError> {
        self.transact("release_ip", |inv| inv.release_ip(ip_id))
    }

    pub fn reserve_ip(&self, request: NewIp) -> Result<EntityId, CoreError> {
        self.transact("reserve_ip", move |inv| inv.reserve_ip(request))
    }

    // ── Notifications ────────────────────────────────────────────────

    pub fn notifications(&self) -> Vec<Notification> {
        self.snapshot().notifications().to_vec()
    }

    pub fn unread_count(&self) -> usize {
        self.snapshot().unread_count()
    }

    pub fn mark_notification_read(&self, id: &EntityId) -> Result<(), CoreError> {
        self.transact("mark_notification_read", |inv| {
            inv.mark_notification_read(id)
        })
    }

    pub fn mark_all_notifications_read(&self) -> Result<usize, CoreError> {
        self.transact("mark_all_notifications_read", |inv| {
            Ok(inv.mark_all_notifications_read())
        })
    }

    pub fn remove_notification(&self, id: &EntityId) -> Result<Notification, CoreError> {
        self.transact("remove_notification", |inv| inv.remove_notification(id))
    }

    pub fn clear_notifications(&self) -> Result<usize, CoreError> {
        self.transact("clear_notifications", |inv| Ok(inv.clear_notifications()))
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
