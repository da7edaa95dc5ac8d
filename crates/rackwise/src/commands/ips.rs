//! IP address command handlers.

use tabled::Tabled;

use rackwise_core::{EntityId, InventoryStore, IpAddress, NewIp};

use crate::cli::{IpArgs, IpCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct IpRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Service")]
    service: String,
}

impl From<&IpAddress> for IpRow {
    fn from(ip: &IpAddress) -> Self {
        Self {
            id: ip.id.to_string(),
            address: ip.address.clone(),
            subnet: ip.subnet.clone(),
            status: ip.status.to_string(),
            device: util::or_dash(ip.device_name.as_deref()),
            service: util::or_dash(ip.service_name.as_deref()),
        }
    }
}

fn print_ips(ips: &[IpAddress], ctx: &Context) -> Result<(), CliError> {
    let out = output::render_list(ctx.output, ips, |ip| IpRow::from(ip), |ip| ip.address.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub fn handle(store: &InventoryStore, args: IpArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        IpCommand::List { subnet } => {
            let snap = store.snapshot();
            let ips: Vec<IpAddress> = snap
                .devices()
                .flat_map(|d| d.ips.iter())
                .chain(snap.reservations())
                .filter(|ip| subnet.as_deref().is_none_or(|cidr| ip.subnet == cidr))
                .cloned()
                .collect();
            print_ips(&ips, ctx)
        }

        IpCommand::Assign {
            address,
            subnet,
            device,
            gateway,
        } => {
            let mut request = NewIp::new(address.clone(), subnet).for_device(device);
            request.gateway = gateway;
            let id = store.assign_ip(request)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Assigned {address}"), ctx.quiet);
            Ok(())
        }

        IpCommand::Release { id } => {
            let released = store.release_ip(&EntityId::from(id))?;
            output::print_status(&format!("Released {}", released.address), ctx.quiet);
            Ok(())
        }

        IpCommand::Reserve { address, subnet } => {
            let id = store.reserve_ip(NewIp::new(address.clone(), subnet))?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Reserved {address}"), ctx.quiet);
            Ok(())
        }

        IpCommand::Reservations => {
            let snap = store.snapshot();
            print_ips(snap.reservations(), ctx)
        }
    }
}
