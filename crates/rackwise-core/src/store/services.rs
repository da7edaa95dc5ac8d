// ── Service operations ──
//
// `Device::service_id` and `Service::devices` are kept in lockstep by
// `set_device_service`; every entry point that changes a device's service
// goes through it.

use super::inventory::Inventory;
use crate::command::requests::{NewService, ServiceUpdate};
use crate::error::CoreError;
use crate::model::{EntityId, NotificationKind, Service};

impl Inventory {
    /// Point `device_id` at `service_id` (or at nothing), updating both
    /// sides of the link and resyncing the device's denormalized fields.
    pub(crate) fn set_device_service(
        &mut self,
        device_id: &EntityId,
        service_id: Option<&EntityId>,
    ) -> Result<(), CoreError> {
        if let Some(service_id) = service_id {
            self.require_service(service_id)?;
        }
        let device = self
            .devices
            .get_mut(device_id)
            .ok_or_else(|| CoreError::not_found("device", device_id))?;
        let previous = std::mem::replace(&mut device.service_id, service_id.cloned());

        if let Some(previous) = previous.filter(|prev| Some(prev) != service_id) {
            if let Some(service) = self.services.get_mut(&previous) {
                service.unlink(device_id);
            }
        }
        if let Some(service) = service_id.and_then(|id| self.services.get_mut(id)) {
            service.link(device_id);
        }
        self.sync_device(device_id);
        Ok(())
    }

    pub fn add_service(&mut self, request: NewService) -> EntityId {
        let id = EntityId::generate("service");
        let name = request.name;
        self.services.insert(
            id.clone(),
            Service {
                id: id.clone(),
                name: name.clone(),
                description: request.description,
                status: request.status,
                criticality: request.criticality,
                owner: request.owner,
                department: request.department,
                devices: Vec::new(),
            },
        );
        self.notify(
            NotificationKind::Success,
            "Service Added",
            format!("{name} has been added"),
        );
        id
    }

    /// Merge `update`; a rename is pushed to every member device.
    pub fn update_service(
        &mut self,
        service_id: &EntityId,
        update: ServiceUpdate,
    ) -> Result<(), CoreError> {
        let service = self
            .services
            .get_mut(service_id)
            .ok_or_else(|| CoreError::not_found("service", service_id))?;
        let renamed = update.name.as_ref().is_some_and(|n| *n != service.name);
        if let Some(name) = update.name {
            service.name = name;
        }
        if let Some(description) = update.description {
            service.description = description;
        }
        if let Some(status) = update.status {
            service.status = status;
        }
        if let Some(criticality) = update.criticality {
            service.criticality = criticality;
        }
        if let Some(owner) = update.owner {
            service.owner = Some(owner);
        }
        if let Some(department) = update.department {
            service.department = Some(department);
        }
        let name = service.name.clone();

        if renamed {
            for device_id in self.service_member_ids(service_id) {
                self.sync_device(&device_id);
            }
        }
        self.notify(
            NotificationKind::Info,
            "Service Updated",
            format!("{name} has been updated"),
        );
        Ok(())
    }

    /// Remove a service after unlinking every device and subnet that
    /// points at it.
    pub fn delete_service(&mut self, service_id: &EntityId) -> Result<Service, CoreError> {
        self.require_service(service_id)?;
        for device_id in self.service_member_ids(service_id) {
            self.set_device_service(&device_id, None)?;
        }
        for subnet in self
            .ip_subnets
            .iter_mut()
            .filter(|s| s.service_id.as_ref() == Some(service_id))
        {
            subnet.service_id = None;
        }
        let removed = self
            .services
            .shift_remove(service_id)
            .ok_or_else(|| CoreError::not_found("service", service_id))?;
        self.notify(
            NotificationKind::Warning,
            "Service Removed",
            format!("{} has been removed", removed.name),
        );
        Ok(removed)
    }

    pub fn assign_device_to_service(
        &mut self,
        device_id: &EntityId,
        service_id: &EntityId,
    ) -> Result<(), CoreError> {
        self.require_device(device_id)?;
        self.set_device_service(device_id, Some(service_id))?;
        let device_name = self.require_device(device_id)?.name.clone();
        let service_name = self.require_service(service_id)?.name.clone();
        self.notify(
            NotificationKind::Info,
            "Service Updated",
            format!("{device_name} has been assigned to {service_name}"),
        );
        Ok(())
    }

    /// Unlink a device from `service_id`. A device linked to a different
    /// service (or none) is left alone; returns whether anything changed.
    pub fn remove_device_from_service(
        &mut self,
        device_id: &EntityId,
        service_id: &EntityId,
    ) -> Result<bool, CoreError> {
        let service_name = self.require_service(service_id)?.name.clone();
        let device = self.require_device(device_id)?;
        if device.service_id.as_ref() != Some(service_id) {
            return Ok(false);
        }
        let device_name = device.name.clone();
        self.set_device_service(device_id, None)?;
        self.notify(
            NotificationKind::Info,
            "Service Updated",
            format!("{device_name} has been removed from {service_name}"),
        );
        Ok(true)
    }

    /// Ids of devices linked to the service from either side of the link.
    fn service_member_ids(&self, service_id: &EntityId) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .devices
            .values()
            .filter(|d| d.service_id.as_ref() == Some(service_id))
            .map(|d| d.id.clone())
            .collect();
        if let Some(service) = self.services.get(service_id) {
            for id in &service.devices {
                if !ids.contains(id) && self.devices.contains_key(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }
}
