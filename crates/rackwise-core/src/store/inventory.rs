// ── Inventory state graph ──
//
// Plain, cloneable state: the hierarchy, the flat device and service maps,
// subnets, reservations and the activity feed. Mutations live in the
// sibling modules (`hierarchy`, `devices`, `services`, `ipam`,
// `notifications`); `InventoryStore` runs each one as a single transaction
// over a clone of this struct.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{
    DataCenter, Device, DeviceLocation, EntityId, IpAddress, IpSubnet, Notification, Rack,
    RackLocation, RackPath, RackUtilization, Room, Service, Unit,
};

/// The full inventory. Serializes to the persisted blob layout:
/// `{dataCenters, devices, ipSubnets, services, reservedIps, notifications}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default)]
    pub(crate) data_centers: Vec<DataCenter>,
    #[serde(default)]
    pub(crate) devices: IndexMap<EntityId, Device>,
    #[serde(default)]
    pub(crate) ip_subnets: Vec<IpSubnet>,
    #[serde(default)]
    pub(crate) services: IndexMap<EntityId, Service>,
    #[serde(default)]
    pub(crate) reserved_ips: Vec<IpAddress>,
    #[serde(default)]
    pub(crate) notifications: Vec<Notification>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Hierarchy reads ──────────────────────────────────────────────

    pub fn data_centers(&self) -> &[DataCenter] {
        &self.data_centers
    }

    pub fn data_center(&self, id: &EntityId) -> Option<&DataCenter> {
        self.data_centers.iter().find(|dc| &dc.id == id)
    }

    pub fn room(&self, data_center_id: &EntityId, room_id: &EntityId) -> Option<&Room> {
        self.data_center(data_center_id)?
            .rooms
            .iter()
            .find(|room| &room.id == room_id)
    }

    pub fn rack(&self, path: &RackPath) -> Option<&Rack> {
        self.room(&path.data_center_id, &path.room_id)?
            .racks
            .iter()
            .find(|rack| rack.id == path.rack_id)
    }

    /// Depth-first scan for a rack by id, returning it with its owners.
    pub fn find_rack(&self, rack_id: &EntityId) -> Option<RackLocation<'_>> {
        self.racks().find(|loc| &loc.rack.id == rack_id)
    }

    /// Every rack in the hierarchy with its owning room and data center.
    pub fn racks(&self) -> impl Iterator<Item = RackLocation<'_>> {
        self.data_centers.iter().flat_map(|data_center| {
            data_center.rooms.iter().flat_map(move |room| {
                room.racks.iter().map(move |rack| RackLocation {
                    data_center,
                    room,
                    rack,
                })
            })
        })
    }

    pub fn rack_utilization(&self, rack_id: &EntityId) -> Option<RackUtilization> {
        self.find_rack(rack_id).map(|loc| RackUtilization::from(loc.rack))
    }

    /// Occupied units across the whole hierarchy.
    pub fn occupied_unit_count(&self) -> usize {
        self.racks().map(|loc| loc.rack.occupied_units()).sum()
    }

    // ── Device reads ─────────────────────────────────────────────────

    pub fn device(&self, id: &EntityId) -> Option<&Device> {
        self.devices.get(id)
    }

    /// All devices in insertion order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Where a device currently sits, if it occupies any unit.
    pub fn device_location(&self, device_id: &EntityId) -> Option<DeviceLocation> {
        self.racks().find_map(|loc| {
            let start = loc.rack.device_start(device_id)?;
            let size = self
                .devices
                .get(device_id)
                .map_or(1, |device| device.size.max(1));
            Some(DeviceLocation {
                data_center_id: loc.data_center.id.clone(),
                data_center_name: loc.data_center.name.clone(),
                room_id: loc.room.id.clone(),
                room_name: loc.room.name.clone(),
                rack_id: loc.rack.id.clone(),
                rack_name: loc.rack.name.clone(),
                start_position: start,
                size,
            })
        })
    }

    /// Devices present in the device map but occupying no unit.
    pub fn unplaced_devices(&self) -> Vec<&Device> {
        self.devices
            .values()
            .filter(|device| !self.racks().any(|loc| loc.rack.holds_device(&device.id)))
            .collect()
    }

    // ── Service reads ────────────────────────────────────────────────

    pub fn service(&self, id: &EntityId) -> Option<&Service> {
        self.services.get(id)
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    // ── IPAM reads ───────────────────────────────────────────────────

    pub fn subnets(&self) -> &[IpSubnet] {
        &self.ip_subnets
    }

    pub fn subnet(&self, id: &EntityId) -> Option<&IpSubnet> {
        self.ip_subnets.iter().find(|s| &s.id == id)
    }

    pub fn subnet_by_cidr(&self, cidr: &str) -> Option<&IpSubnet> {
        self.ip_subnets.iter().find(|s| s.subnet == cidr)
    }

    /// Reserved addresses, held independent of any device.
    pub fn reservations(&self) -> &[IpAddress] {
        &self.reserved_ips
    }

    /// Look up an address by id among device IPs and reservations.
    pub fn ip(&self, ip_id: &EntityId) -> Option<&IpAddress> {
        self.devices
            .values()
            .flat_map(|device| device.ips.iter())
            .chain(self.reserved_ips.iter())
            .find(|ip| &ip.id == ip_id)
    }

    // ── Notification reads ───────────────────────────────────────────

    /// Activity feed, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    // ── Mutable lookups (crate-internal) ─────────────────────────────

    pub(crate) fn data_center_mut(&mut self, id: &EntityId) -> Result<&mut DataCenter, CoreError> {
        self.data_centers
            .iter_mut()
            .find(|dc| &dc.id == id)
            .ok_or_else(|| CoreError::not_found("data center", id))
    }

    pub(crate) fn room_mut(
        &mut self,
        data_center_id: &EntityId,
        room_id: &EntityId,
    ) -> Result<&mut Room, CoreError> {
        self.data_center_mut(data_center_id)?
            .rooms
            .iter_mut()
            .find(|room| &room.id == room_id)
            .ok_or_else(|| CoreError::not_found("room", room_id))
    }

    pub(crate) fn rack_mut(&mut self, path: &RackPath) -> Result<&mut Rack, CoreError> {
        self.room_mut(&path.data_center_id, &path.room_id)?
            .racks
            .iter_mut()
            .find(|rack| rack.id == path.rack_id)
            .ok_or_else(|| CoreError::not_found("rack", &path.rack_id))
    }

    /// Resolve a rack path or fail with the first missing segment.
    pub(crate) fn require_rack(&self, path: &RackPath) -> Result<&Rack, CoreError> {
        let data_center = self
            .data_center(&path.data_center_id)
            .ok_or_else(|| CoreError::not_found("data center", &path.data_center_id))?;
        let room = data_center
            .rooms
            .iter()
            .find(|room| room.id == path.room_id)
            .ok_or_else(|| CoreError::not_found("room", &path.room_id))?;
        room.racks
            .iter()
            .find(|rack| rack.id == path.rack_id)
            .ok_or_else(|| CoreError::not_found("rack", &path.rack_id))
    }

    pub(crate) fn require_device(&self, id: &EntityId) -> Result<&Device, CoreError> {
        self.devices
            .get(id)
            .ok_or_else(|| CoreError::not_found("device", id))
    }

    pub(crate) fn require_service(&self, id: &EntityId) -> Result<&Service, CoreError> {
        self.services
            .get(id)
            .ok_or_else(|| CoreError::not_found("service", id))
    }

    /// Every unit in the hierarchy.
    pub(crate) fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.data_centers
            .iter_mut()
            .flat_map(|dc| dc.rooms.iter_mut())
            .flat_map(|room| room.racks.iter_mut())
            .flat_map(|rack| rack.units.iter_mut())
    }

    // ── Denormalization ──────────────────────────────────────────────

    /// Rewrite every denormalized copy of a device's display data from the
    /// device and service maps: the device's `service_name`, its IPs'
    /// device/service fields, and every rack unit carrying its id.
    ///
    /// A device missing from the map leaves its units untouched; callers
    /// removing a device clear them with [`Self::clear_device_units`].
    pub(crate) fn sync_device(&mut self, device_id: &EntityId) {
        let Some(device) = self.devices.get_mut(device_id) else {
            return;
        };
        let service_name = device
            .service_id
            .as_ref()
            .and_then(|sid| self.services.get(sid))
            .map(|service| service.name.clone());

        let Device {
            id,
            name,
            ips,
            service_id,
            service_name: cached_service_name,
            size,
            ..
        } = device;
        cached_service_name.clone_from(&service_name);
        for ip in ips.iter_mut() {
            ip.device_id = Some(id.clone());
            ip.device_name = Some(name.clone());
            ip.service_id.clone_from(service_id);
            ip.service_name.clone_from(&service_name);
        }

        let name = name.clone();
        let primary_ip = ips.first().map(|ip| ip.address.clone());
        let size = *size;
        let service_id = service_id.clone();

        for unit in self.units_mut() {
            if unit.device_id.as_ref() != Some(device_id) {
                continue;
            }
            unit.device_name = Some(name.clone());
            unit.device_ip.clone_from(&primary_ip);
            unit.device_size = size;
            unit.service_id.clone_from(&service_id);
            unit.service_name.clone_from(&service_name);
        }
    }

    /// Reset every unit carrying `device_id` to an empty slot. Returns the
    /// number of units cleared.
    pub(crate) fn clear_device_units(&mut self, device_id: &EntityId) -> usize {
        let mut cleared = 0;
        for unit in self.units_mut() {
            if unit.device_id.as_ref() == Some(device_id) {
                unit.clear();
                cleared += 1;
            }
        }
        cleared
    }

    /// Device ids with at least one unit in the given racks.
    pub(crate) fn devices_in<'a>(racks: impl IntoIterator<Item = &'a Rack>) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = Vec::new();
        for rack in racks {
            for id in rack.units.iter().filter_map(|u| u.device_id.as_ref()) {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }
}
