// ── Hierarchy operations: data centers, rooms, racks ──
//
// Removing part of the hierarchy unlinks the devices placed in it: their
// records and service links stay, but no unit carries them anymore.

use tracing::info;

use super::inventory::Inventory;
use crate::error::CoreError;
use crate::model::{DataCenter, EntityId, NotificationKind, Rack, RackPath, Room};

impl Inventory {
    // ── Data centers ─────────────────────────────────────────────────

    pub fn add_data_center(&mut self, name: &str) -> EntityId {
        let id = EntityId::generate("dc");
        self.data_centers.push(DataCenter {
            id: id.clone(),
            name: name.to_owned(),
            rooms: Vec::new(),
        });
        self.notify(
            NotificationKind::Success,
            "Data Center Added",
            format!("{name} has been added"),
        );
        id
    }

    pub fn update_data_center(&mut self, id: &EntityId, name: &str) -> Result<(), CoreError> {
        self.data_center_mut(id)?.name = name.to_owned();
        self.notify(
            NotificationKind::Info,
            "Data Center Updated",
            format!("{name} has been updated"),
        );
        Ok(())
    }

    pub fn delete_data_center(&mut self, id: &EntityId) -> Result<DataCenter, CoreError> {
        let index = self
            .data_centers
            .iter()
            .position(|dc| &dc.id == id)
            .ok_or_else(|| CoreError::not_found("data center", id))?;
        let removed = self.data_centers.remove(index);
        let racks = removed.rooms.iter().flat_map(|room| room.racks.iter());
        self.unlink_orphans(&Self::devices_in(racks));
        self.notify(
            NotificationKind::Warning,
            "Data Center Removed",
            format!("{} has been removed", removed.name),
        );
        Ok(removed)
    }

    /// Replace the whole hierarchy. Devices left without a unit become
    /// unplaced; units pointing at unknown devices are cleared.
    pub fn replace_data_centers(&mut self, data_centers: Vec<DataCenter>) {
        self.data_centers = data_centers;
        let devices = &self.devices;
        let mut dangling = 0usize;
        for unit in self
            .data_centers
            .iter_mut()
            .flat_map(|dc| dc.rooms.iter_mut())
            .flat_map(|room| room.racks.iter_mut())
            .flat_map(|rack| rack.units.iter_mut())
        {
            if unit.device_id.as_ref().is_some_and(|id| !devices.contains_key(id)) {
                unit.clear();
                dangling += 1;
            }
        }
        if dangling > 0 {
            info!(dangling, "cleared units referencing unknown devices");
        }
        let ids: Vec<EntityId> = self.devices.keys().cloned().collect();
        for id in &ids {
            self.sync_device(id);
        }
        self.notify(
            NotificationKind::Info,
            "Data Centers Replaced",
            format!("{} data centers loaded", self.data_centers.len()),
        );
    }

    // ── Rooms ────────────────────────────────────────────────────────

    pub fn add_room(&mut self, data_center_id: &EntityId, name: &str) -> Result<EntityId, CoreError> {
        let id = EntityId::generate("room");
        self.data_center_mut(data_center_id)?.rooms.push(Room {
            id: id.clone(),
            name: name.to_owned(),
            racks: Vec::new(),
        });
        self.notify(
            NotificationKind::Success,
            "Room Added",
            format!("{name} has been added"),
        );
        Ok(id)
    }

    pub fn update_room(
        &mut self,
        data_center_id: &EntityId,
        room_id: &EntityId,
        name: &str,
    ) -> Result<(), CoreError> {
        self.room_mut(data_center_id, room_id)?.name = name.to_owned();
        self.notify(
            NotificationKind::Info,
            "Room Updated",
            format!("{name} has been updated"),
        );
        Ok(())
    }

    pub fn delete_room(
        &mut self,
        data_center_id: &EntityId,
        room_id: &EntityId,
    ) -> Result<Room, CoreError> {
        let data_center = self.data_center_mut(data_center_id)?;
        let index = data_center
            .rooms
            .iter()
            .position(|room| &room.id == room_id)
            .ok_or_else(|| CoreError::not_found("room", room_id))?;
        let removed = data_center.rooms.remove(index);
        self.unlink_orphans(&Self::devices_in(removed.racks.iter()));
        self.notify(
            NotificationKind::Warning,
            "Room Removed",
            format!("{} has been removed", removed.name),
        );
        Ok(removed)
    }

    // ── Racks ────────────────────────────────────────────────────────

    /// Append a rack with `total_units` empty units.
    pub fn add_rack(
        &mut self,
        data_center_id: &EntityId,
        room_id: &EntityId,
        name: &str,
        total_units: u32,
    ) -> Result<EntityId, CoreError> {
        let id = EntityId::generate("rack");
        self.room_mut(data_center_id, room_id)?
            .racks
            .push(Rack::new(id.clone(), name, total_units));
        self.notify(
            NotificationKind::Success,
            "Rack Added",
            format!("{name} ({total_units}U) has been added"),
        );
        Ok(id)
    }

    /// Rename and resize a rack. Shrinking is refused while any unit above
    /// the new height is occupied, so the surviving units never change.
    pub fn update_rack(
        &mut self,
        path: &RackPath,
        name: &str,
        total_units: u32,
    ) -> Result<(), CoreError> {
        let rack = self.rack_mut(path)?;
        let blocked = rack
            .units
            .iter()
            .filter(|u| u.position > total_units)
            .find_map(|u| u.device_id.as_ref().map(|id| (u.position, id)));
        if let Some((position, occupant)) = blocked {
            return Err(CoreError::Occupied {
                rack: rack.name.clone(),
                position,
                occupant: occupant.to_string(),
            });
        }
        rack.name = name.to_owned();
        rack.resize(total_units);
        self.notify(
            NotificationKind::Info,
            "Rack Updated",
            format!("{name} ({total_units}U) has been updated"),
        );
        Ok(())
    }

    pub fn delete_rack(&mut self, path: &RackPath) -> Result<Rack, CoreError> {
        let room = self.room_mut(&path.data_center_id, &path.room_id)?;
        let index = room
            .racks
            .iter()
            .position(|rack| rack.id == path.rack_id)
            .ok_or_else(|| CoreError::not_found("rack", &path.rack_id))?;
        let removed = room.racks.remove(index);
        self.unlink_orphans(&Self::devices_in(std::iter::once(&removed)));
        self.notify(
            NotificationKind::Warning,
            "Rack Removed",
            format!("{} has been removed", removed.name),
        );
        Ok(removed)
    }

    /// Clear any remaining units of devices whose rack went away, leaving
    /// them unplaced.
    fn unlink_orphans(&mut self, device_ids: &[EntityId]) {
        for id in device_ids {
            let cleared = self.clear_device_units(id);
            info!(device = %id, cleared, "device unplaced by hierarchy change");
        }
    }
}
