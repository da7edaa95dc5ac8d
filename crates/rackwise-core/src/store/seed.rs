// ── Demo inventory ──

use indexmap::IndexMap;

use super::inventory::Inventory;
use crate::model::{
    Criticality, DataCenter, EntityId, IpSubnet, Rack, Room, Service, ServiceStatus,
};

const DEMO_RACK_UNITS: u32 = 42;

fn room(id: &str, name: &str, racks: &[(&str, &str)]) -> Room {
    Room {
        id: id.into(),
        name: name.into(),
        racks: racks
            .iter()
            .map(|(id, name)| Rack::new(EntityId::from(*id), *name, DEMO_RACK_UNITS))
            .collect(),
    }
}

fn subnet(id: &str, cidr: &str, description: &str, used: u64, available: u64) -> IpSubnet {
    IpSubnet {
        id: id.into(),
        subnet: cidr.into(),
        description: description.into(),
        gateway: None,
        total_ips: IpSubnet::host_capacity(24),
        used_ips: used,
        available_ips: available,
        reserved_ips: 10,
        service_id: None,
    }
}

fn service(
    id: &str,
    name: &str,
    description: &str,
    status: ServiceStatus,
    criticality: Criticality,
    owner: &str,
) -> Service {
    Service {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        status,
        criticality,
        owner: Some(owner.into()),
        department: Some("IT".into()),
        devices: Vec::new(),
    }
}

impl Inventory {
    /// A small populated inventory: two data centers with empty 42U racks,
    /// three /24 subnets and three services.
    pub fn demo() -> Self {
        let data_centers = vec![
            DataCenter {
                id: "dc-1".into(),
                name: "DC-A".into(),
                rooms: vec![
                    room(
                        "room-1",
                        "Room 1",
                        &[("rack-1", "Rack 1"), ("rack-2", "Rack 2"), ("rack-3", "Rack 3")],
                    ),
                    room(
                        "room-2",
                        "Room 2",
                        &[("rack-4", "Rack 1"), ("rack-5", "Rack 2"), ("rack-6", "Rack 3")],
                    ),
                ],
            },
            DataCenter {
                id: "dc-2".into(),
                name: "DC-B".into(),
                rooms: vec![
                    room("room-3", "Room A", &[("rack-7", "Rack 1"), ("rack-8", "Rack 2")]),
                    room("room-4", "Room B", &[("rack-9", "Rack 1")]),
                ],
            },
        ];

        let ip_subnets = vec![
            subnet("subnet-1", "192.168.1.0/24", "Primary Network", 120, 124),
            subnet("subnet-2", "192.168.2.0/24", "Secondary Network", 85, 159),
            subnet("subnet-3", "10.0.0.0/24", "Management Network", 45, 199),
        ];

        let services: IndexMap<EntityId, Service> = [
            service(
                "service-1",
                "Web Application",
                "Main company web application",
                ServiceStatus::Active,
                Criticality::High,
                "John Doe",
            ),
            service(
                "service-2",
                "Database Cluster",
                "Primary database cluster",
                ServiceStatus::Active,
                Criticality::Critical,
                "Jane Smith",
            ),
            service(
                "service-3",
                "Email Server",
                "Corporate email server",
                ServiceStatus::Maintenance,
                Criticality::Medium,
                "Mike Johnson",
            ),
        ]
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();

        Self {
            data_centers,
            ip_subnets,
            services,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RackPath;

    #[test]
    fn demo_has_expected_shape() {
        let inv = Inventory::demo();
        assert_eq!(inv.data_centers().len(), 2);
        assert_eq!(inv.racks().count(), 9);
        assert!(inv.racks().all(|loc| loc.rack.units.len() == 42));
        assert_eq!(inv.subnets().len(), 3);
        assert_eq!(inv.services().count(), 3);
        assert_eq!(inv.device_count(), 0);

        let loc = inv.find_rack(&EntityId::from("rack-8")).unwrap();
        assert_eq!(loc.data_center.name, "DC-B");
        assert_eq!(loc.room.name, "Room A");
        assert_eq!(
            RackPath::from(loc),
            RackPath::new("dc-2", "room-3", "rack-8")
        );

        let mgmt = inv.subnet_by_cidr("10.0.0.0/24").unwrap();
        assert_eq!(mgmt.description, "Management Network");
        assert_eq!(mgmt.used_ips + mgmt.available_ips + mgmt.reserved_ips, 254);
    }
}
