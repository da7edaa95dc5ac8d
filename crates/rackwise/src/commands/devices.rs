//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use rackwise_core::{
    Device, DeviceFilter, DeviceLocation, DeviceUpdate, EntityId, Inventory, InventoryStore,
    NewDevice,
};

use crate::cli::{DeviceFields, DevicesArgs, DevicesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

/// A device with its current mount point, if any.
#[derive(Serialize)]
struct DeviceView<'a> {
    #[serde(flatten)]
    device: &'a Device,
    location: Option<DeviceLocation>,
}

impl<'a> DeviceView<'a> {
    fn new(inv: &Inventory, device: &'a Device) -> Self {
        Self {
            device,
            location: inv.device_location(&device.id),
        }
    }

    fn placement(&self) -> String {
        self.location
            .as_ref()
            .map_or_else(|| "unplaced".into(), DeviceLocation::label)
    }
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "IP")]
    ip: String,
}

fn row(view: &DeviceView<'_>, color: bool) -> DeviceRow {
    let d = view.device;
    DeviceRow {
        id: d.id.to_string(),
        name: d.name.clone(),
        device_type: d.device_type.clone(),
        size: format!("{}U", d.size),
        status: output::device_status(d.status, color),
        location: view.placement(),
        service: util::or_dash(d.service_name.as_deref()),
        ip: util::or_dash(d.primary_ip()),
    }
}

fn detail(view: &DeviceView<'_>, color: bool) -> String {
    let d = view.device;
    let mut lines = vec![
        format!("ID:          {}", d.id),
        format!("Name:        {}", d.name),
        format!("Type:        {}", d.device_type),
        format!("Model:       {}", util::or_dash(d.model.as_deref())),
        format!("Size:        {}U", d.size),
        format!("Status:      {}", output::device_status(d.status, color)),
        format!("Location:    {}", view.placement()),
        format!("Service:     {}", util::or_dash(d.service_name.as_deref())),
        format!(
            "Power:       {}",
            d.power_consumption
                .map_or_else(|| "-".into(), |w| format!("{w} W"))
        ),
        format!(
            "Installed:   {}",
            d.installation_date
                .map_or_else(|| "-".into(), |date| date.to_string())
        ),
    ];
    if let Some(description) = &d.description {
        lines.push(format!("Description: {description}"));
    }
    for ip in &d.ips {
        lines.push(format!("IP:          {} ({}, {})", ip.address, ip.subnet, ip.id));
    }
    lines.join("\n")
}

// ── Request building ────────────────────────────────────────────────

fn apply_fields(mut request: NewDevice, fields: DeviceFields) -> Result<NewDevice, CliError> {
    if let Some(device_type) = fields.device_type {
        request = request.with_type(device_type);
    }
    if let Some(model) = fields.model {
        request = request.with_model(model);
    }
    if let Some(status) = fields.status.as_deref() {
        request = request.with_status(util::parse_value("status", status)?);
    }
    if let Some(service) = fields.service {
        request = request.with_service(service);
    }
    request.description = fields.description;
    request.power_consumption = fields.power;
    request.installation_date = fields
        .installed
        .as_deref()
        .map(|value| util::parse_date("installed", value))
        .transpose()?;
    Ok(request)
}

fn build_update(
    name: Option<String>,
    size: Option<u32>,
    no_service: bool,
    fields: DeviceFields,
) -> Result<DeviceUpdate, CliError> {
    let service_id = if no_service {
        Some(None)
    } else {
        fields.service.map(|id| Some(EntityId::from(id)))
    };
    Ok(DeviceUpdate {
        name,
        device_type: fields.device_type,
        model: fields.model,
        size,
        description: fields.description,
        ips: None,
        status: fields
            .status
            .as_deref()
            .map(|value| util::parse_value("status", value))
            .transpose()?,
        power_consumption: fields.power,
        installation_date: fields
            .installed
            .as_deref()
            .map(|value| util::parse_date("installed", value))
            .transpose()?,
        service_id,
    })
}

fn filters(
    status: Option<&str>,
    device_type: Option<String>,
    service: Option<String>,
    unplaced: bool,
    name: Option<String>,
) -> Result<Vec<DeviceFilter>, CliError> {
    let mut filters = Vec::new();
    if let Some(status) = status {
        filters.push(DeviceFilter::ByStatus(util::parse_value("status", status)?));
    }
    if let Some(device_type) = device_type {
        filters.push(DeviceFilter::ByType(device_type));
    }
    if let Some(service) = service {
        filters.push(DeviceFilter::ByService(EntityId::from(service)));
    }
    if unplaced {
        filters.push(DeviceFilter::Unplaced);
    }
    if let Some(name) = name {
        filters.push(DeviceFilter::NameContains(name));
    }
    Ok(filters)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(store: &InventoryStore, args: DevicesArgs, ctx: &Context) -> Result<(), CliError> {
    let color = ctx.color;
    match args.command {
        DevicesCommand::List {
            status,
            device_type,
            service,
            unplaced,
            name,
        } => {
            let filters = filters(status.as_deref(), device_type, service, unplaced, name)?;
            let snap = store.snapshot();
            let views: Vec<DeviceView<'_>> = snap
                .devices()
                .filter(|d| filters.iter().all(|f| f.matches(&snap, d)))
                .map(|d| DeviceView::new(&snap, d))
                .collect();
            let out = output::render_list(
                ctx.output,
                &views,
                |v| row(v, color),
                |v| v.device.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let snap = store.snapshot();
            let device = snap
                .device(&EntityId::from(id.as_str()))
                .ok_or_else(|| CliError::not_found("device", id.as_str(), "device list"))?;
            let view = DeviceView::new(&snap, device);
            let out = output::render_single(
                ctx.output,
                &view,
                |v| detail(v, color),
                |v| v.device.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        DevicesCommand::Add {
            rack,
            position,
            from_file,
            name,
            size,
            fields,
        } => {
            let path = util::resolve_rack(&store.snapshot(), &rack)?;
            let request = match from_file {
                Some(file) => util::read_json_file::<NewDevice>(&file)?,
                None => apply_fields(
                    NewDevice::new(name.unwrap_or_default(), size.unwrap_or_default()),
                    fields,
                )?,
            };
            let device_name = request.name.clone();
            let id = store.add_device(&path, position, request)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Device '{device_name}' added"), ctx.quiet);
            Ok(())
        }

        DevicesCommand::Update {
            id,
            from_file,
            name,
            size,
            no_service,
            rack,
            fields,
        } => {
            let id = EntityId::from(id);
            let path = util::device_rack(&store.snapshot(), &id, rack.as_deref())?;
            let update = match from_file {
                Some(file) => util::read_json_file::<DeviceUpdate>(&file)?,
                None => build_update(name, size, no_service, fields)?,
            };
            if update.is_empty() {
                return Err(CliError::validation("update", "no fields to change"));
            }
            store.update_device(&path, &id, update)?;
            output::print_status("Device updated", ctx.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id, rack } => {
            let id = EntityId::from(id);
            let snap = store.snapshot();
            let path = util::device_rack(&snap, &id, rack.as_deref())?;
            let name = snap.device(&id).map(|d| d.name.clone()).unwrap_or_default();
            if !util::confirm("device delete", &format!("Delete device '{name}'?"), ctx.yes)? {
                return Ok(());
            }
            store.delete_device(&path, &id)?;
            output::print_status(&format!("Device '{name}' deleted"), ctx.quiet);
            Ok(())
        }

        DevicesCommand::Move { id, to, position } => {
            let id = EntityId::from(id);
            let snap = store.snapshot();
            let source = util::device_rack(&snap, &id, None)?;
            let destination = match to.as_deref() {
                Some(rack) => util::resolve_rack(&snap, rack)?,
                None => source.clone(),
            };
            store.move_device(&source, &id, &destination, position)?;
            if let Some(loc) = store.device_location(&id) {
                output::print_status(&format!("Device moved to {}", loc.label()), ctx.quiet);
            }
            Ok(())
        }

        DevicesCommand::Locate { id } => {
            let id = EntityId::from(id);
            let snap = store.snapshot();
            if snap.device(&id).is_none() {
                return Err(CliError::not_found("device", id.as_str(), "device list"));
            }
            let loc = snap.device_location(&id).ok_or_else(|| {
                CliError::not_found("device placement", id.as_str(), "device list --unplaced")
            })?;
            let out = output::render_single(ctx.output, &loc, DeviceLocation::label, |l| {
                l.rack_id.to_string()
            })?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
