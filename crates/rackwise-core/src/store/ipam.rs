// ── Subnets and the IP address lifecycle ──
//
// Subnet counters are adjusted by assign / release / reserve and matched
// by exact CIDR string. Addresses are opaque strings; only duplicates
// within a subnet are rejected. Embedding IPs through `add_device` or
// `update_device` leaves the counters alone.

use std::net::Ipv4Addr;

use chrono::Utc;
use ipnet::Ipv4Net;
use tracing::warn;

use super::inventory::Inventory;
use crate::command::requests::{NewIp, NewSubnet, SubnetUpdate};
use crate::error::CoreError;
use crate::model::{EntityId, IpAddress, IpStatus, IpSubnet, NotificationKind};

impl Inventory {
    // ── Subnets ──────────────────────────────────────────────────────

    /// Register a subnet. `totalIPs` is the usable host count for the
    /// prefix; `availableIPs` starts at `totalIPs - reserved_count`.
    pub fn add_subnet(&mut self, request: NewSubnet) -> Result<EntityId, CoreError> {
        let address: Ipv4Addr = request.network.trim().parse().map_err(|_| {
            CoreError::validation(format!("{} is not an IPv4 address", request.network))
        })?;
        let net = Ipv4Net::new(address, request.prefix_len).map_err(|_| {
            CoreError::validation(format!(
                "prefix length {} is out of range (0-32)",
                request.prefix_len
            ))
        })?;
        if net.network() != address {
            return Err(CoreError::validation(format!(
                "{} has host bits set; network address is {}",
                request.cidr(),
                net.network()
            )));
        }
        let cidr = net.to_string();
        if self.subnet_by_cidr(&cidr).is_some() {
            return Err(CoreError::validation(format!("subnet {cidr} already exists")));
        }
        if let Some(service_id) = request.service_id.as_ref() {
            self.require_service(service_id)?;
        }

        let total_ips = IpSubnet::host_capacity(request.prefix_len);
        let id = EntityId::generate("subnet");
        self.ip_subnets.push(IpSubnet {
            id: id.clone(),
            subnet: cidr.clone(),
            description: request.description,
            gateway: request.gateway,
            total_ips,
            used_ips: 0,
            available_ips: total_ips.saturating_sub(request.reserved_count),
            reserved_ips: request.reserved_count,
            service_id: request.service_id,
        });
        self.notify(
            NotificationKind::Success,
            "Subnet Added",
            format!("{cidr} has been added"),
        );
        Ok(id)
    }

    pub fn update_subnet(
        &mut self,
        subnet_id: &EntityId,
        update: SubnetUpdate,
    ) -> Result<(), CoreError> {
        if let Some(Some(service_id)) = update.service_id.as_ref() {
            self.require_service(service_id)?;
        }
        let subnet = self.subnet_mut(subnet_id)?;
        if let Some(description) = update.description {
            subnet.description = description;
        }
        if let Some(gateway) = update.gateway {
            subnet.gateway = Some(gateway);
        }
        if let Some(service_id) = update.service_id {
            subnet.service_id = service_id;
        }
        if let Some(total) = update.total_ips {
            subnet.total_ips = total;
        }
        if let Some(used) = update.used_ips {
            subnet.used_ips = used;
        }
        if let Some(available) = update.available_ips {
            subnet.available_ips = available;
        }
        if let Some(reserved) = update.reserved_ips {
            subnet.reserved_ips = reserved;
        }
        let cidr = subnet.subnet.clone();
        self.notify(
            NotificationKind::Info,
            "Subnet Updated",
            format!("{cidr} has been updated"),
        );
        Ok(())
    }

    pub fn delete_subnet(&mut self, subnet_id: &EntityId) -> Result<IpSubnet, CoreError> {
        let index = self
            .ip_subnets
            .iter()
            .position(|s| &s.id == subnet_id)
            .ok_or_else(|| CoreError::not_found("subnet", subnet_id))?;
        let removed = self.ip_subnets.remove(index);
        self.notify(
            NotificationKind::Warning,
            "Subnet Removed",
            format!("{} has been removed", removed.subnet),
        );
        Ok(removed)
    }

    fn subnet_mut(&mut self, subnet_id: &EntityId) -> Result<&mut IpSubnet, CoreError> {
        self.ip_subnets
            .iter_mut()
            .find(|s| &s.id == subnet_id)
            .ok_or_else(|| CoreError::not_found("subnet", subnet_id))
    }

    /// Apply `record` to the subnet with this CIDR; unknown subnets only log.
    fn adjust_subnet(&mut self, cidr: &str, record: fn(&mut IpSubnet)) {
        match self.ip_subnets.iter_mut().find(|s| s.subnet == cidr) {
            Some(subnet) => record(subnet),
            None => warn!(subnet = cidr, "no subnet registered; counters unchanged"),
        }
    }

    /// Reject an address already assigned or reserved in the same subnet.
    /// IPs currently held by `owner` are ignored.
    fn ensure_address_free(
        &self,
        address: &str,
        cidr: &str,
        owner: Option<&EntityId>,
    ) -> Result<(), CoreError> {
        let taken = self
            .devices
            .values()
            .filter(|device| owner != Some(&device.id))
            .flat_map(|device| device.ips.iter())
            .chain(self.reserved_ips.iter())
            .any(|ip| ip.address == address && ip.subnet == cidr);
        if taken {
            return Err(CoreError::validation(format!(
                "{address} is already in use in {cidr}"
            )));
        }
        Ok(())
    }

    /// Check a whole IP list handed to `add_device` / `update_device`.
    pub(super) fn ensure_addresses_free(
        &self,
        ips: &[IpAddress],
        owner: Option<&EntityId>,
    ) -> Result<(), CoreError> {
        for (i, ip) in ips.iter().enumerate() {
            let repeated = ips
                .iter()
                .take(i)
                .any(|prev| prev.address == ip.address && prev.subnet == ip.subnet);
            if repeated {
                return Err(CoreError::validation(format!(
                    "{} is listed twice in {}",
                    ip.address, ip.subnet
                )));
            }
            self.ensure_address_free(&ip.address, &ip.subnet, owner)?;
        }
        Ok(())
    }

    // ── Address lifecycle ────────────────────────────────────────────

    /// Append an address to its device and count it as used.
    pub fn assign_ip(&mut self, request: NewIp) -> Result<EntityId, CoreError> {
        let device_id = request
            .device_id
            .ok_or_else(|| CoreError::validation("an IP assignment needs a device"))?;
        self.require_device(&device_id)?;
        self.ensure_address_free(&request.address, &request.subnet, None)?;

        let id = request.id.unwrap_or_else(|| EntityId::generate("ip"));
        let ip = IpAddress {
            id: id.clone(),
            address: request.address.clone(),
            subnet: request.subnet.clone(),
            gateway: request.gateway,
            status: IpStatus::Assigned,
            device_id: Some(device_id.clone()),
            device_name: None,
            service_id: None,
            service_name: None,
            last_updated: Some(Utc::now().date_naive()),
        };
        let device = self
            .devices
            .get_mut(&device_id)
            .ok_or_else(|| CoreError::not_found("device", &device_id))?;
        device.ips.push(ip);
        let device_name = device.name.clone();

        self.adjust_subnet(&request.subnet, IpSubnet::record_assigned);
        self.sync_device(&device_id);
        self.notify(
            NotificationKind::Success,
            "IP Assigned",
            format!("{} has been assigned to {device_name}", request.address),
        );
        Ok(id)
    }

    /// Release an address by id, whether assigned to a device or reserved.
    pub fn release_ip(&mut self, ip_id: &EntityId) -> Result<IpAddress, CoreError> {
        let owner = self
            .devices
            .values()
            .find(|device| device.ips.iter().any(|ip| &ip.id == ip_id))
            .map(|device| device.id.clone());

        let released = if let Some(device_id) = owner {
            let device = self
                .devices
                .get_mut(&device_id)
                .ok_or_else(|| CoreError::not_found("device", &device_id))?;
            let index = device
                .ips
                .iter()
                .position(|ip| &ip.id == ip_id)
                .ok_or_else(|| CoreError::not_found("ip", ip_id))?;
            let released = device.ips.remove(index);
            self.adjust_subnet(&released.subnet, IpSubnet::record_released);
            self.sync_device(&device_id);
            released
        } else {
            let index = self
                .reserved_ips
                .iter()
                .position(|ip| &ip.id == ip_id)
                .ok_or_else(|| CoreError::not_found("ip", ip_id))?;
            let released = self.reserved_ips.remove(index);
            self.adjust_subnet(&released.subnet, IpSubnet::record_unreserved);
            released
        };

        self.notify(
            NotificationKind::Warning,
            "IP Released",
            format!("{} has been released", released.address),
        );
        Ok(released)
    }

    /// Hold an address back from the pool without binding it to a device.
    pub fn reserve_ip(&mut self, request: NewIp) -> Result<EntityId, CoreError> {
        self.ensure_address_free(&request.address, &request.subnet, None)?;

        let id = request.id.unwrap_or_else(|| EntityId::generate("ip"));
        self.reserved_ips.push(IpAddress {
            id: id.clone(),
            address: request.address.clone(),
            subnet: request.subnet.clone(),
            gateway: request.gateway,
            status: IpStatus::Reserved,
            device_id: None,
            device_name: None,
            service_id: None,
            service_name: None,
            last_updated: Some(Utc::now().date_naive()),
        });
        self.adjust_subnet(&request.subnet, IpSubnet::record_reserved);
        self.notify(
            NotificationKind::Info,
            "IP Reserved",
            format!("{} has been reserved", request.address),
        );
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::requests::NewDevice;
    use crate::model::RackPath;
    use pretty_assertions::assert_eq;

    fn fixture() -> (Inventory, EntityId, EntityId) {
        let mut inv = Inventory::new();
        let dc = inv.add_data_center("DC-1");
        let room = inv.add_room(&dc, "Room-1").unwrap();
        let rack = inv.add_rack(&dc, &room, "Rack-1", 42).unwrap();
        let path = RackPath::new(dc, room, rack);
        let device = inv.add_device(&path, 1, NewDevice::new("web-01", 1)).unwrap();
        let subnet = inv
            .add_subnet(NewSubnet::new("192.168.1.0", "desc", 24))
            .unwrap();
        (inv, device, subnet)
    }

    #[test]
    fn subnet_scenario_assign_then_release() {
        let (mut inv, device, subnet) = fixture();
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!(s.subnet, "192.168.1.0/24");
        assert_eq!(s.total_ips, 254);
        assert_eq!(s.available_ips, 254);

        let ip = inv
            .assign_ip(NewIp::new("192.168.1.10", "192.168.1.0/24").for_device(device.clone()))
            .unwrap();
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!((s.used_ips, s.available_ips), (1, 253));

        let assigned = inv.ip(&ip).unwrap();
        assert_eq!(assigned.status, IpStatus::Assigned);
        assert_eq!(assigned.device_name.as_deref(), Some("web-01"));
        assert!(assigned.last_updated.is_some());

        let released = inv.release_ip(&ip).unwrap();
        assert_eq!(released.address, "192.168.1.10");
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!((s.used_ips, s.available_ips), (0, 254));
        assert!(inv.device(&device).unwrap().ips.is_empty());
    }

    #[test]
    fn used_count_tracks_assigns_minus_releases() {
        let (mut inv, device, subnet) = fixture();
        let mut ids = Vec::new();
        for host in 1..=5 {
            let request = NewIp::new(format!("192.168.1.{host}"), "192.168.1.0/24")
                .for_device(device.clone());
            ids.push(inv.assign_ip(request).unwrap());
        }
        for id in &ids[..2] {
            inv.release_ip(id).unwrap();
        }
        assert_eq!(inv.subnet(&subnet).unwrap().used_ips, 3);
        assert!(inv.release_ip(&ids[0]).unwrap_err().is_not_found());
        assert_eq!(inv.subnet(&subnet).unwrap().used_ips, 3);
    }

    #[test]
    fn first_ip_shows_on_rack_unit() {
        let (mut inv, device, _) = fixture();
        inv.assign_ip(NewIp::new("192.168.1.20", "192.168.1.0/24").for_device(device.clone()))
            .unwrap();
        let loc = inv.find_rack(&inv.device_location(&device).unwrap().rack_id).unwrap();
        assert_eq!(loc.rack.units[0].device_ip.as_deref(), Some("192.168.1.20"));
    }

    #[test]
    fn reservations_live_outside_devices() {
        let (mut inv, device, subnet) = fixture();
        let id = inv
            .reserve_ip(NewIp::new("192.168.1.250", "192.168.1.0/24"))
            .unwrap();
        assert!(inv.device(&device).unwrap().ips.is_empty());
        assert_eq!(inv.reservations().len(), 1);
        assert_eq!(inv.reservations()[0].status, IpStatus::Reserved);
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!((s.reserved_ips, s.available_ips), (1, 253));

        inv.release_ip(&id).unwrap();
        assert!(inv.reservations().is_empty());
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!((s.reserved_ips, s.available_ips), (0, 254));
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let (mut inv, device, _) = fixture();
        inv.reserve_ip(NewIp::new("192.168.1.5", "192.168.1.0/24")).unwrap();
        let err = inv
            .assign_ip(NewIp::new("192.168.1.5", "192.168.1.0/24").for_device(device))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn addresses_are_not_format_checked() {
        let (mut inv, device, _) = fixture();
        inv.assign_ip(NewIp::new("2001:db8::10", "2001:db8::/64").for_device(device.clone()))
            .unwrap();
        inv.reserve_ip(NewIp::new("2001:db8::1", "2001:db8::/64")).unwrap();
        assert_eq!(inv.device(&device).unwrap().ips[0].address, "2001:db8::10");
        assert_eq!(inv.reservations()[0].address, "2001:db8::1");

        let err = inv
            .reserve_ip(NewIp::new("2001:db8::10", "2001:db8::/64"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn assign_requires_existing_device() {
        let (mut inv, ..) = fixture();
        let err = inv
            .assign_ip(NewIp::new("192.168.1.7", "192.168.1.0/24"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        let err = inv
            .assign_ip(NewIp::new("192.168.1.7", "192.168.1.0/24").for_device("dev-ghost"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_subnet_leaves_counters_alone() {
        let (mut inv, device, subnet) = fixture();
        inv.assign_ip(NewIp::new("10.9.9.9", "10.9.9.0/24").for_device(device.clone()))
            .unwrap();
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!((s.used_ips, s.available_ips), (0, 254));
        assert_eq!(inv.device(&device).unwrap().ips.len(), 1);
    }

    #[test]
    fn add_subnet_validates_cidr() {
        let mut inv = Inventory::new();
        for (network, prefix) in [("300.1.1.0", 24), ("10.0.0.0", 33), ("10.0.0.5", 24)] {
            let err = inv
                .add_subnet(NewSubnet::new(network, "bad", prefix))
                .unwrap_err();
            assert!(matches!(err, CoreError::Validation { .. }), "{network}/{prefix}");
        }
        inv.add_subnet(NewSubnet::new("10.0.0.0", "ok", 24)).unwrap();
        let err = inv.add_subnet(NewSubnet::new("10.0.0.0", "dup", 24)).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn add_subnet_with_reserved_block() {
        let mut inv = Inventory::new();
        let id = inv
            .add_subnet(NewSubnet::new("10.1.0.0", "lab", 16).with_reserved(10))
            .unwrap();
        let s = inv.subnet(&id).unwrap();
        assert_eq!(s.total_ips, 65_534);
        assert_eq!(s.available_ips, 65_524);
        assert_eq!(s.reserved_ips, 10);
    }

    #[test]
    fn update_and_delete_subnet() {
        let (mut inv, _, subnet) = fixture();
        inv.update_subnet(
            &subnet,
            SubnetUpdate {
                description: Some("Office LAN".into()),
                gateway: Some("192.168.1.1".into()),
                used_ips: Some(4),
                ..SubnetUpdate::default()
            },
        )
        .unwrap();
        let s = inv.subnet(&subnet).unwrap();
        assert_eq!(s.description, "Office LAN");
        assert_eq!(s.gateway.as_deref(), Some("192.168.1.1"));
        assert_eq!(s.used_ips, 4);

        inv.delete_subnet(&subnet).unwrap();
        assert!(inv.subnets().is_empty());
        assert!(inv.delete_subnet(&subnet).unwrap_err().is_not_found());
    }
}
