// ── Device operations: add, update, delete, move ──
//
// Every placement (add, move, resize through update) is validated here:
// the range must fit the rack and every target unit must be free or
// already held by the same device.

use tracing::debug;

use super::inventory::Inventory;
use crate::command::requests::{DeviceUpdate, NewDevice};
use crate::error::CoreError;
use crate::model::{Device, EntityId, NotificationKind, Rack, RackPath};

/// Check that `size` units starting at `start` fit in `rack` and are free
/// for `device_id`.
fn check_placement(
    rack: &Rack,
    device_id: &EntityId,
    start: u32,
    size: u32,
) -> Result<(), CoreError> {
    let out_of_range = || CoreError::OutOfRange {
        rack: rack.name.clone(),
        position: start,
        size,
        total_units: rack.total_units,
    };
    if start == 0 || size == 0 {
        return Err(out_of_range());
    }
    let end = start
        .checked_add(size - 1)
        .filter(|end| *end <= rack.total_units)
        .ok_or_else(out_of_range)?;

    for position in start..=end {
        let occupant = rack.unit(position).and_then(|u| u.device_id.as_ref());
        if let Some(occupant) = occupant.filter(|id| *id != device_id) {
            return Err(CoreError::Occupied {
                rack: rack.name.clone(),
                position,
                occupant: occupant.to_string(),
            });
        }
    }
    Ok(())
}

impl Inventory {
    /// Validate and claim `[start, start + size - 1]` in the rack at `path`,
    /// then refresh the denormalized unit fields.
    fn place_device(
        &mut self,
        path: &RackPath,
        device_id: &EntityId,
        start: u32,
        size: u32,
    ) -> Result<(), CoreError> {
        let rack = self.rack_mut(path)?;
        check_placement(rack, device_id, start, size)?;
        let end = start + (size - 1);
        for unit in rack
            .units
            .iter_mut()
            .filter(|u| (start..=end).contains(&u.position))
        {
            unit.device_id = Some(device_id.clone());
            unit.device_size = size;
        }
        self.sync_device(device_id);
        Ok(())
    }

    /// Store a new device and place it at `start` in the rack at `path`.
    pub fn add_device(
        &mut self,
        path: &RackPath,
        start: u32,
        request: NewDevice,
    ) -> Result<EntityId, CoreError> {
        if request.name.trim().is_empty() {
            return Err(CoreError::validation("device name must not be empty"));
        }
        if request.size == 0 {
            return Err(CoreError::validation("device size must be at least 1U"));
        }
        let id = request
            .id
            .unwrap_or_else(|| EntityId::generate("dev"));
        if self.devices.contains_key(&id) {
            return Err(CoreError::validation(format!("device {id} already exists")));
        }
        if let Some(service_id) = request.service_id.as_ref() {
            self.require_service(service_id)?;
        }
        self.ensure_addresses_free(&request.ips, None)?;
        let rack = self.require_rack(path)?;
        check_placement(rack, &id, start, request.size)?;
        let rack_name = rack.name.clone();

        let name = request.name;
        self.devices.insert(
            id.clone(),
            Device {
                id: id.clone(),
                name: name.clone(),
                device_type: request.device_type,
                model: request.model,
                size: request.size,
                description: request.description,
                ips: request.ips,
                status: request.status,
                power_consumption: request.power_consumption,
                installation_date: request.installation_date,
                service_id: None,
                service_name: None,
            },
        );
        self.set_device_service(&id, request.service_id.as_ref())?;
        self.place_device(path, &id, start, request.size)?;

        self.notify(
            NotificationKind::Success,
            "Device Added",
            format!("{name} has been added to {rack_name}"),
        );
        Ok(id)
    }

    /// Merge `update` into the device. A size change re-places the device at
    /// its current start position.
    pub fn update_device(
        &mut self,
        path: &RackPath,
        device_id: &EntityId,
        update: DeviceUpdate,
    ) -> Result<(), CoreError> {
        self.require_rack(path)?;
        let current_size = self.require_device(device_id)?.size;
        if let Some(Some(service_id)) = update.service_id.as_ref() {
            self.require_service(service_id)?;
        }
        if update.size == Some(0) {
            return Err(CoreError::validation("device size must be at least 1U"));
        }
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::validation("device name must not be empty"));
        }
        if let Some(ips) = update.ips.as_deref() {
            self.ensure_addresses_free(ips, Some(device_id))?;
        }
        let new_size = update.size.unwrap_or(current_size);
        let relocation = match self.device_location(device_id) {
            Some(loc) if new_size != current_size => {
                let rack_path = RackPath::new(
                    loc.data_center_id.clone(),
                    loc.room_id.clone(),
                    loc.rack_id.clone(),
                );
                check_placement(
                    self.require_rack(&rack_path)?,
                    device_id,
                    loc.start_position,
                    new_size,
                )?;
                Some((rack_path, loc.start_position))
            }
            _ => None,
        };

        let device = self
            .devices
            .get_mut(device_id)
            .ok_or_else(|| CoreError::not_found("device", device_id))?;
        if let Some(name) = update.name {
            device.name = name;
        }
        if let Some(device_type) = update.device_type {
            device.device_type = device_type;
        }
        if let Some(model) = update.model {
            device.model = Some(model);
        }
        if let Some(size) = update.size {
            device.size = size;
        }
        if let Some(description) = update.description {
            device.description = Some(description);
        }
        if let Some(ips) = update.ips {
            device.ips = ips;
        }
        if let Some(status) = update.status {
            device.status = status;
        }
        if let Some(power) = update.power_consumption {
            device.power_consumption = Some(power);
        }
        if let Some(date) = update.installation_date {
            device.installation_date = Some(date);
        }
        let name = device.name.clone();

        if let Some(service_id) = update.service_id {
            self.set_device_service(device_id, service_id.as_ref())?;
        }

        if let Some((rack_path, start)) = relocation {
            self.clear_device_units(device_id);
            self.place_device(&rack_path, device_id, start, new_size)?;
            debug!(device = %device_id, from = current_size, to = new_size, "device resized");
        }

        self.sync_device(device_id);
        self.notify(
            NotificationKind::Info,
            "Device Updated",
            format!("{name} has been updated"),
        );
        Ok(())
    }

    /// Remove a device, unlink it from its service and free its units.
    pub fn delete_device(
        &mut self,
        path: &RackPath,
        device_id: &EntityId,
    ) -> Result<Device, CoreError> {
        self.require_rack(path)?;
        self.require_device(device_id)?;
        self.set_device_service(device_id, None)?;
        let device = self
            .devices
            .shift_remove(device_id)
            .ok_or_else(|| CoreError::not_found("device", device_id))?;
        let cleared = self.clear_device_units(device_id);
        debug!(device = %device_id, cleared, "device units released");

        self.notify(
            NotificationKind::Warning,
            "Device Removed",
            format!("{} has been removed", device.name),
        );
        Ok(device)
    }

    /// Move a device from the rack at `source` to `position` in the rack at
    /// `destination`. The destination range is checked before anything
    /// changes; moving within one rack may overlap the device's own units.
    pub fn move_device(
        &mut self,
        source: &RackPath,
        device_id: &EntityId,
        destination: &RackPath,
        position: u32,
    ) -> Result<(), CoreError> {
        let device = self.require_device(device_id)?;
        let size = device.size;
        let name = device.name.clone();

        let source_rack = self.require_rack(source)?;
        if !source_rack.holds_device(device_id) {
            return Err(CoreError::not_found(
                "device placement",
                format!("{device_id} in rack {}", source.rack_id),
            ));
        }
        let destination_rack = self.require_rack(destination)?;
        check_placement(destination_rack, device_id, position, size)?;
        let destination_name = destination_rack.name.clone();

        for unit in self
            .rack_mut(source)?
            .units
            .iter_mut()
            .filter(|u| u.device_id.as_ref() == Some(device_id))
        {
            unit.clear();
        }
        self.place_device(destination, device_id, position, size)?;

        self.notify(
            NotificationKind::Info,
            "Device Moved",
            format!("{name} has been moved to {destination_name} U{position}"),
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::requests::NewService;
    use crate::model::{Criticality, IpAddress, IpStatus, ServiceStatus};
    use pretty_assertions::assert_eq;

    fn two_racks() -> (Inventory, RackPath, RackPath) {
        let mut inv = Inventory::new();
        let dc = inv.add_data_center("DC-1");
        let room = inv.add_room(&dc, "Room-1").unwrap();
        let a = inv.add_rack(&dc, &room, "Rack-A", 10).unwrap();
        let b = inv.add_rack(&dc, &room, "Rack-B", 10).unwrap();
        (
            inv,
            RackPath::new(dc.clone(), room.clone(), a),
            RackPath::new(dc, room, b),
        )
    }

    fn ip(address: &str) -> IpAddress {
        IpAddress {
            id: EntityId::generate("ip"),
            address: address.into(),
            subnet: "10.0.0.0/24".into(),
            gateway: None,
            status: IpStatus::Assigned,
            device_id: None,
            device_name: None,
            service_id: None,
            service_name: None,
            last_updated: None,
        }
    }

    #[test]
    fn add_device_fills_contiguous_units_only() {
        let (mut inv, rack, _) = two_racks();
        let id = inv
            .add_device(&rack, 3, NewDevice::new("Device-X", 2))
            .unwrap();

        let units = &inv.rack(&rack).unwrap().units;
        for (i, unit) in units.iter().enumerate() {
            if i == 2 || i == 3 {
                assert_eq!(unit.device_id.as_ref(), Some(&id));
                assert_eq!(unit.device_name.as_deref(), Some("Device-X"));
                assert_eq!(unit.device_size, 2);
            } else {
                assert!(!unit.is_occupied(), "unit {} should be empty", i + 1);
            }
        }
        assert_eq!(inv.notifications()[0].title, "Device Added");
    }

    #[test]
    fn add_device_copies_first_ip_to_units() {
        let (mut inv, rack, _) = two_racks();
        let id = inv
            .add_device(
                &rack,
                1,
                NewDevice::new("web", 1).with_ips(vec![ip("10.0.0.5"), ip("10.0.0.6")]),
            )
            .unwrap();
        let unit = &inv.rack(&rack).unwrap().units[0];
        assert_eq!(unit.device_ip.as_deref(), Some("10.0.0.5"));
        let device = inv.device(&id).unwrap();
        assert!(device.ips.iter().all(|ip| ip.device_id.as_ref() == Some(&id)));
        assert!(device.ips.iter().all(|ip| ip.device_name.as_deref() == Some("web")));
    }

    #[test]
    fn add_device_rejects_overlap_and_overflow() {
        let (mut inv, rack, _) = two_racks();
        inv.add_device(&rack, 4, NewDevice::new("a", 2)).unwrap();

        let err = inv.add_device(&rack, 5, NewDevice::new("b", 1)).unwrap_err();
        assert!(matches!(err, CoreError::Occupied { position: 5, .. }));

        let err = inv.add_device(&rack, 9, NewDevice::new("c", 3)).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { total_units: 10, .. }));

        let err = inv.add_device(&rack, 0, NewDevice::new("d", 1)).unwrap_err();
        assert!(err.is_placement_conflict());

        let err = inv.add_device(&rack, 1, NewDevice::new("e", 0)).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn add_device_with_unknown_rack_or_service_fails() {
        let (mut inv, rack, _) = two_racks();
        let missing = RackPath::new(
            rack.data_center_id.clone(),
            rack.room_id.clone(),
            "rack-missing",
        );
        assert!(inv.add_device(&missing, 1, NewDevice::new("x", 1)).unwrap_err().is_not_found());
        let err = inv
            .add_device(&rack, 1, NewDevice::new("x", 1).with_service("service-missing"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(inv.device_count(), 0);
    }

    #[test]
    fn add_device_keeps_caller_id_and_rejects_duplicates() {
        let (mut inv, rack, _) = two_racks();
        let request = NewDevice {
            id: Some(EntityId::from("dev-fixed")),
            ..NewDevice::new("fixed", 1)
        };
        let id = inv.add_device(&rack, 1, request.clone()).unwrap();
        assert_eq!(id, "dev-fixed");
        let err = inv.add_device(&rack, 5, request).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn move_between_racks() {
        let (mut inv, a, b) = two_racks();
        let id = inv.add_device(&a, 1, NewDevice::new("mover", 2)).unwrap();
        let before = inv.device(&id).unwrap().clone();
        let occupied = inv.occupied_unit_count();

        inv.move_device(&a, &id, &b, 5).unwrap();

        let rack_a = inv.rack(&a).unwrap();
        assert!(!rack_a.units[0].is_occupied());
        assert!(!rack_a.units[1].is_occupied());
        let rack_b = inv.rack(&b).unwrap();
        assert_eq!(rack_b.units[4].device_id.as_ref(), Some(&id));
        assert_eq!(rack_b.units[5].device_id.as_ref(), Some(&id));
        assert_eq!(rack_b.units[5].device_name.as_deref(), Some("mover"));
        assert_eq!(inv.device(&id).unwrap(), &before);
        assert_eq!(inv.occupied_unit_count(), occupied);
        assert_eq!(inv.device_location(&id).unwrap().start_position, 5);
    }

    #[test]
    fn move_within_rack_may_overlap_own_units() {
        let (mut inv, a, _) = two_racks();
        let id = inv.add_device(&a, 2, NewDevice::new("slide", 3)).unwrap();
        inv.move_device(&a, &id, &a, 3).unwrap();
        let rack = inv.rack(&a).unwrap();
        assert!(!rack.units[1].is_occupied());
        assert_eq!(rack.device_start(&id), Some(3));
        assert_eq!(rack.occupied_units(), 3);
    }

    #[test]
    fn failed_move_leaves_source_untouched() {
        let (mut inv, a, b) = two_racks();
        let id = inv.add_device(&a, 1, NewDevice::new("mover", 2)).unwrap();
        inv.add_device(&b, 6, NewDevice::new("blocker", 1)).unwrap();

        let err = inv.move_device(&a, &id, &b, 5).unwrap_err();
        assert!(matches!(err, CoreError::Occupied { position: 6, .. }));
        assert_eq!(inv.rack(&a).unwrap().device_start(&id), Some(1));

        let err = inv.move_device(&b, &id, &a, 5).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_device_clears_every_reference() {
        let (mut inv, a, _) = two_racks();
        let service = inv.add_service(NewService::new(
            "Web",
            ServiceStatus::Active,
            Criticality::High,
        ));
        let id = inv
            .add_device(&a, 2, NewDevice::new("gone", 3).with_service(service.clone()))
            .unwrap();

        let removed = inv.delete_device(&a, &id).unwrap();
        assert_eq!(removed.name, "gone");
        assert!(inv.device(&id).is_none());
        assert!(!inv.service(&service).unwrap().has_device(&id));
        assert!(inv.racks().all(|loc| !loc.rack.holds_device(&id)));
        assert!(inv.delete_device(&a, &id).unwrap_err().is_not_found());
    }

    #[test]
    fn update_device_rewrites_units() {
        let (mut inv, a, _) = two_racks();
        let id = inv.add_device(&a, 1, NewDevice::new("old", 2)).unwrap();
        inv.update_device(
            &a,
            &id,
            DeviceUpdate {
                name: Some("new".into()),
                ips: Some(vec![ip("10.0.0.9")]),
                ..DeviceUpdate::default()
            },
        )
        .unwrap();
        let rack = inv.rack(&a).unwrap();
        for unit in &rack.units[0..2] {
            assert_eq!(unit.device_name.as_deref(), Some("new"));
            assert_eq!(unit.device_ip.as_deref(), Some("10.0.0.9"));
        }
    }

    #[test]
    fn update_device_size_replaces_at_same_start() {
        let (mut inv, a, _) = two_racks();
        let id = inv.add_device(&a, 3, NewDevice::new("grow", 1)).unwrap();
        inv.add_device(&a, 6, NewDevice::new("wall", 1)).unwrap();

        let grow = DeviceUpdate {
            size: Some(3),
            ..DeviceUpdate::default()
        };
        inv.update_device(&a, &id, grow).unwrap();
        let rack = inv.rack(&a).unwrap();
        assert_eq!(rack.units.iter().filter(|u| u.device_id.as_ref() == Some(&id)).count(), 3);
        assert!(rack.units[2..5].iter().all(|u| u.device_size == 3));

        let too_big = DeviceUpdate {
            size: Some(4),
            ..DeviceUpdate::default()
        };
        let err = inv.update_device(&a, &id, too_big).unwrap_err();
        assert!(matches!(err, CoreError::Occupied { position: 6, .. }));
        assert_eq!(inv.device(&id).unwrap().size, 3);
    }

    #[test]
    fn update_device_rejects_address_held_elsewhere() {
        let (mut inv, a, _) = two_racks();
        inv.add_device(&a, 1, NewDevice::new("web", 1).with_ips(vec![ip("10.0.0.5")]))
            .unwrap();
        let id = inv
            .add_device(&a, 3, NewDevice::new("db", 1).with_ips(vec![ip("10.0.0.6")]))
            .unwrap();
        let before = inv.clone();

        let steal = DeviceUpdate {
            ips: Some(vec![ip("10.0.0.6"), ip("10.0.0.5")]),
            ..DeviceUpdate::default()
        };
        let err = inv.update_device(&a, &id, steal).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(inv, before);

        let twice = DeviceUpdate {
            ips: Some(vec![ip("10.0.0.7"), ip("10.0.0.7")]),
            ..DeviceUpdate::default()
        };
        assert!(inv.update_device(&a, &id, twice).is_err());

        // Resubmitting the device's own address is fine.
        let keep = DeviceUpdate {
            ips: Some(vec![ip("10.0.0.6"), ip("10.0.0.8")]),
            ..DeviceUpdate::default()
        };
        inv.update_device(&a, &id, keep).unwrap();
        assert_eq!(inv.device(&id).unwrap().ips.len(), 2);
    }

    #[test]
    fn add_device_rejects_address_already_assigned() {
        let (mut inv, a, _) = two_racks();
        inv.add_device(&a, 1, NewDevice::new("web", 1).with_ips(vec![ip("10.0.0.5")]))
            .unwrap();
        let err = inv
            .add_device(&a, 3, NewDevice::new("copy", 1).with_ips(vec![ip("10.0.0.5")]))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(inv.device_count(), 1);
    }
}
