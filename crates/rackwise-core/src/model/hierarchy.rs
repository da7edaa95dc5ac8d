// ── Physical hierarchy: data center → room → rack → unit ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Root of the hierarchy. Owns its rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCenter {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub racks: Vec<Rack>,
}

/// A rack with a fixed number of unit slots.
///
/// `units.len() == total_units` after every store operation, and `units[i]`
/// always sits at position `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    pub id: EntityId,
    pub name: String,
    pub total_units: u32,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Rack {
    pub fn new(id: EntityId, name: impl Into<String>, total_units: u32) -> Self {
        Self {
            id,
            name: name.into(),
            total_units,
            units: (1..=total_units).map(Unit::empty).collect(),
        }
    }

    /// The unit at a 1-based position.
    pub fn unit(&self, position: u32) -> Option<&Unit> {
        let index = usize::try_from(position.checked_sub(1)?).ok()?;
        self.units.get(index)
    }

    /// First position occupied by `device_id`, scanning bottom-up.
    pub fn device_start(&self, device_id: &EntityId) -> Option<u32> {
        self.units
            .iter()
            .find(|u| u.device_id.as_ref() == Some(device_id))
            .map(|u| u.position)
    }

    pub fn holds_device(&self, device_id: &EntityId) -> bool {
        self.device_start(device_id).is_some()
    }

    pub fn occupied_units(&self) -> usize {
        self.units.iter().filter(|u| u.is_occupied()).count()
    }

    pub fn free_units(&self) -> usize {
        self.units.len() - self.occupied_units()
    }

    /// Resize the unit list to `total_units`, appending empty slots or
    /// truncating from the top.
    pub(crate) fn resize(&mut self, total_units: u32) {
        let target = usize::try_from(total_units).unwrap_or(usize::MAX);
        if target < self.units.len() {
            self.units.truncate(target);
        } else {
            let current = u32::try_from(self.units.len()).unwrap_or(u32::MAX);
            self.units
                .extend((current.saturating_add(1)..=total_units).map(Unit::empty));
        }
        self.total_units = total_units;
    }
}

/// One vertical slot of a rack.
///
/// The device and service fields are denormalized copies of the owning
/// [`Device`](super::Device) / [`Service`](super::Service); the store
/// rewrites them whenever the source changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub position: u32,
    pub device_id: Option<EntityId>,
    pub device_name: Option<String>,
    pub device_ip: Option<String>,
    #[serde(default)]
    pub device_size: u32,
    pub service_id: Option<EntityId>,
    pub service_name: Option<String>,
}

impl Unit {
    pub fn empty(position: u32) -> Self {
        Self {
            position,
            device_id: None,
            device_name: None,
            device_ip: None,
            device_size: 0,
            service_id: None,
            service_name: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.device_id.is_some()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::empty(self.position);
    }
}

/// Result of a rack lookup: the rack plus its owning room and data center.
#[derive(Debug, Clone, Copy)]
pub struct RackLocation<'a> {
    pub data_center: &'a DataCenter,
    pub room: &'a Room,
    pub rack: &'a Rack,
}

/// Where a placed device currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLocation {
    pub data_center_id: EntityId,
    pub data_center_name: String,
    pub room_id: EntityId,
    pub room_name: String,
    pub rack_id: EntityId,
    pub rack_name: String,
    pub start_position: u32,
    pub size: u32,
}

impl DeviceLocation {
    /// `DC / Room / Rack U<start>-U<end>` display form.
    pub fn label(&self) -> String {
        let end = self.start_position + self.size.saturating_sub(1);
        format!(
            "{} / {} / {} U{}-U{}",
            self.data_center_name, self.room_name, self.rack_name, self.start_position, end
        )
    }
}

/// Full path to a rack. Every hierarchy-scoped operation takes one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackPath {
    pub data_center_id: EntityId,
    pub room_id: EntityId,
    pub rack_id: EntityId,
}

impl RackPath {
    pub fn new(
        data_center_id: impl Into<EntityId>,
        room_id: impl Into<EntityId>,
        rack_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            data_center_id: data_center_id.into(),
            room_id: room_id.into(),
            rack_id: rack_id.into(),
        }
    }
}

impl From<RackLocation<'_>> for RackPath {
    fn from(loc: RackLocation<'_>) -> Self {
        Self {
            data_center_id: loc.data_center.id.clone(),
            room_id: loc.room.id.clone(),
            rack_id: loc.rack.id.clone(),
        }
    }
}

/// Used / free unit counts for one rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackUtilization {
    pub total_units: u32,
    pub used_units: u32,
    pub free_units: u32,
}

impl From<&Rack> for RackUtilization {
    fn from(rack: &Rack) -> Self {
        let used = u32::try_from(rack.occupied_units()).unwrap_or(u32::MAX);
        Self {
            total_units: rack.total_units,
            used_units: used,
            free_units: rack.total_units.saturating_sub(used),
        }
    }
}
