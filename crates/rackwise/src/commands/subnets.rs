//! Subnet command handlers.

use tabled::Tabled;

use rackwise_core::{EntityId, InventoryStore, IpSubnet, NewSubnet, SubnetUpdate};

use crate::cli::{SubnetsArgs, SubnetsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SubnetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Used")]
    used: u64,
    #[tabled(rename = "Reserved")]
    reserved: u64,
    #[tabled(rename = "Available")]
    available: u64,
    #[tabled(rename = "Total")]
    total: u64,
    #[tabled(rename = "Util")]
    utilization: String,
}

fn row(s: &IpSubnet, color: bool) -> SubnetRow {
    SubnetRow {
        id: s.id.to_string(),
        subnet: s.subnet.clone(),
        description: s.description.clone(),
        gateway: util::or_dash(s.gateway.as_deref()),
        used: s.used_ips,
        reserved: s.reserved_ips,
        available: s.available_ips,
        total: s.total_ips,
        utilization: output::utilization(s.utilization_pct(), color),
    }
}

/// Split `a.b.c.d/len` into its network and prefix length.
fn split_cidr(cidr: &str) -> Result<(&str, u8), CliError> {
    let (network, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| CliError::validation("cidr", format!("'{cidr}' is not in a.b.c.d/len form")))?;
    let prefix = prefix
        .parse()
        .map_err(|_| CliError::validation("cidr", format!("invalid prefix length '{prefix}'")))?;
    Ok((network, prefix))
}

pub fn handle(store: &InventoryStore, args: SubnetsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        SubnetsCommand::List => {
            let subnets = store.subnets();
            let color = ctx.color;
            let out = output::render_list(
                ctx.output,
                &subnets,
                |s| row(s, color),
                |s| s.subnet.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        SubnetsCommand::Add {
            cidr,
            description,
            gateway,
            reserved,
            service,
        } => {
            let (network, prefix) = split_cidr(&cidr)?;
            let mut request = NewSubnet::new(network, description, prefix).with_reserved(reserved);
            if let Some(gateway) = gateway {
                request = request.with_gateway(gateway);
            }
            if let Some(service) = service {
                request = request.with_service(service);
            }
            let id = store.add_subnet(request)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Subnet {cidr} created"), ctx.quiet);
            Ok(())
        }

        SubnetsCommand::Update {
            id,
            description,
            gateway,
            service,
            no_service,
        } => {
            let service_id = if no_service {
                Some(None)
            } else {
                service.map(|s| Some(EntityId::from(s)))
            };
            let update = SubnetUpdate {
                description,
                gateway,
                service_id,
                ..SubnetUpdate::default()
            };
            store.update_subnet(&EntityId::from(id), update)?;
            output::print_status("Subnet updated", ctx.quiet);
            Ok(())
        }

        SubnetsCommand::Delete { id } => {
            let id = EntityId::from(id);
            let snap = store.snapshot();
            let subnet = snap
                .subnet(&id)
                .ok_or_else(|| CliError::not_found("subnet", id.as_str(), "subnet list"))?;
            let prompt = format!("Delete subnet {}?", subnet.subnet);
            if !util::confirm("subnet delete", &prompt, ctx.yes)? {
                return Ok(());
            }
            let removed = store.delete_subnet(&id)?;
            output::print_status(&format!("Subnet {} deleted", removed.subnet), ctx.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn splits_cidr_notation() {
        assert_eq!(split_cidr("10.0.0.0/24").unwrap(), ("10.0.0.0", 24));
        assert!(split_cidr("10.0.0.0").is_err());
        assert!(split_cidr("10.0.0.0/abc").is_err());
    }
}
