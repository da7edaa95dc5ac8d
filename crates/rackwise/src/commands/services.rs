//! Service command handlers.

use serde::Serialize;
use tabled::Tabled;

use rackwise_core::{
    Criticality, Device, EntityId, InventoryStore, NewService, Service, ServiceFilter,
    ServiceStatus, ServiceUpdate,
};

use crate::cli::{ServiceFields, ServicesArgs, ServicesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Criticality")]
    criticality: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

fn row(s: &Service, color: bool) -> ServiceRow {
    ServiceRow {
        id: s.id.to_string(),
        name: s.name.clone(),
        status: output::service_status(s.status, color),
        criticality: output::criticality(s.criticality, color),
        owner: util::or_dash(s.owner.as_deref()),
        devices: s.devices.len(),
    }
}

/// A service with its member devices resolved.
#[derive(Serialize)]
struct ServiceDetail<'a> {
    #[serde(flatten)]
    service: &'a Service,
    members: Vec<&'a Device>,
}

fn detail(d: &ServiceDetail<'_>, color: bool) -> String {
    let s = d.service;
    let mut lines = vec![
        format!("ID:          {}", s.id),
        format!("Name:        {}", s.name),
        format!("Status:      {}", output::service_status(s.status, color)),
        format!("Criticality: {}", output::criticality(s.criticality, color)),
        format!("Owner:       {}", util::or_dash(s.owner.as_deref())),
        format!("Department:  {}", util::or_dash(s.department.as_deref())),
    ];
    if !s.description.is_empty() {
        lines.push(format!("Description: {}", s.description));
    }
    if d.members.is_empty() {
        lines.push("Devices:     -".into());
    }
    for device in &d.members {
        lines.push(format!("Device:      {} ({})", device.name, device.id));
    }
    lines.join("\n")
}

// ── Request building ────────────────────────────────────────────────

fn parse_fields(
    fields: &ServiceFields,
) -> Result<(Option<ServiceStatus>, Option<Criticality>), CliError> {
    let status = fields
        .status
        .as_deref()
        .map(|value| util::parse_value("status", value))
        .transpose()?;
    let criticality = fields
        .criticality
        .as_deref()
        .map(|value| util::parse_value("criticality", value))
        .transpose()?;
    Ok((status, criticality))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(store: &InventoryStore, args: ServicesArgs, ctx: &Context) -> Result<(), CliError> {
    let color = ctx.color;
    match args.command {
        ServicesCommand::List {
            status,
            min_criticality,
        } => {
            let mut filters = Vec::new();
            if let Some(status) = status.as_deref() {
                filters.push(ServiceFilter::ByStatus(util::parse_value("status", status)?));
            }
            if let Some(floor) = min_criticality.as_deref() {
                filters.push(ServiceFilter::AtLeast(util::parse_value(
                    "min-criticality",
                    floor,
                )?));
            }
            let snap = store.snapshot();
            let services: Vec<&Service> = snap
                .services()
                .filter(|s| filters.iter().all(|f| f.matches(s)))
                .collect();
            let out = output::render_list(
                ctx.output,
                &services,
                |s| row(s, color),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ServicesCommand::Get { id } => {
            let snap = store.snapshot();
            let service = snap
                .service(&EntityId::from(id.as_str()))
                .ok_or_else(|| CliError::not_found("service", id.as_str(), "service list"))?;
            let view = ServiceDetail {
                service,
                members: service
                    .devices
                    .iter()
                    .filter_map(|device_id| snap.device(device_id))
                    .collect(),
            };
            let out = output::render_single(
                ctx.output,
                &view,
                |d| detail(d, color),
                |d| d.service.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ServicesCommand::Add { name, fields } => {
            let (status, criticality) = parse_fields(&fields)?;
            let mut request = NewService::new(
                name.clone(),
                status.unwrap_or_default(),
                criticality.unwrap_or_default(),
            );
            request.description = fields.description.unwrap_or_default();
            request.owner = fields.owner;
            request.department = fields.department;
            let id = store.add_service(request)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Service '{name}' created"), ctx.quiet);
            Ok(())
        }

        ServicesCommand::Update { id, name, fields } => {
            let (status, criticality) = parse_fields(&fields)?;
            let update = ServiceUpdate {
                name,
                description: fields.description,
                status,
                criticality,
                owner: fields.owner,
                department: fields.department,
            };
            store.update_service(&EntityId::from(id), update)?;
            output::print_status("Service updated", ctx.quiet);
            Ok(())
        }

        ServicesCommand::Delete { id } => {
            let id = EntityId::from(id);
            let snap = store.snapshot();
            let service = snap
                .service(&id)
                .ok_or_else(|| CliError::not_found("service", id.as_str(), "service list"))?;
            let prompt = format!(
                "Delete service '{}'? {} device(s) will be unlinked.",
                service.name,
                service.devices.len()
            );
            if !util::confirm("service delete", &prompt, ctx.yes)? {
                return Ok(());
            }
            let removed = store.delete_service(&id)?;
            output::print_status(&format!("Service '{}' deleted", removed.name), ctx.quiet);
            Ok(())
        }

        ServicesCommand::Assign { service, device } => {
            store.assign_device_to_service(&EntityId::from(device), &EntityId::from(service))?;
            output::print_status("Device assigned", ctx.quiet);
            Ok(())
        }

        ServicesCommand::Unassign { service, device } => {
            let changed = store
                .remove_device_from_service(&EntityId::from(device), &EntityId::from(service))?;
            let message = if changed {
                "Device unassigned"
            } else {
                "Device was not assigned to this service"
            };
            output::print_status(message, ctx.quiet);
            Ok(())
        }
    }
}
