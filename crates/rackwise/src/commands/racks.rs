//! Rack command handlers, including the unit map.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use rackwise_core::{EntityId, InventoryStore, Rack, RackLocation, RackUtilization};

use crate::cli::{RacksArgs, RacksCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RackSummary {
    id: String,
    name: String,
    room_id: String,
    room_name: String,
    data_center_id: String,
    data_center_name: String,
    #[serde(flatten)]
    utilization: RackUtilization,
}

impl From<RackLocation<'_>> for RackSummary {
    fn from(loc: RackLocation<'_>) -> Self {
        Self {
            id: loc.rack.id.to_string(),
            name: loc.rack.name.clone(),
            room_id: loc.room.id.to_string(),
            room_name: loc.room.name.clone(),
            data_center_id: loc.data_center.id.to_string(),
            data_center_name: loc.data_center.name.clone(),
            utilization: RackUtilization::from(loc.rack),
        }
    }
}

impl RackSummary {
    fn used_pct(&self) -> f64 {
        if self.utilization.total_units == 0 {
            return 0.0;
        }
        f64::from(self.utilization.used_units) / f64::from(self.utilization.total_units) * 100.0
    }
}

#[derive(Tabled)]
struct RackRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Units")]
    units: String,
    #[tabled(rename = "Used")]
    used: String,
}

/// Full rack with its location, for `rack show`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RackDetail<'a> {
    data_center_id: &'a str,
    data_center_name: &'a str,
    room_id: &'a str,
    room_name: &'a str,
    utilization: RackUtilization,
    rack: &'a Rack,
}

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "U")]
    position: u32,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Service")]
    service: String,
}

fn unit_map(detail: &RackDetail<'_>, color: bool) -> String {
    let rows: Vec<UnitRow> = detail
        .rack
        .units
        .iter()
        .rev()
        .map(|unit| {
            let device = match (&unit.device_name, unit.device_size) {
                (Some(name), size) if size > 1 => format!("{name} ({size}U)"),
                (Some(name), _) => name.clone(),
                (None, _) if color => "·".dimmed().to_string(),
                (None, _) => String::new(),
            };
            UnitRow {
                position: unit.position,
                device,
                ip: unit.device_ip.clone().unwrap_or_default(),
                service: unit.service_name.clone().unwrap_or_default(),
            }
        })
        .collect();
    let u = detail.utilization;
    format!(
        "{} / {} / {}  ({}U, {} used, {} free)\n{}",
        detail.data_center_name,
        detail.room_name,
        detail.rack.name,
        u.total_units,
        u.used_units,
        u.free_units,
        Table::new(rows).with(Style::rounded())
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(store: &InventoryStore, args: RacksArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        RacksCommand::List { room } => {
            let snap = store.snapshot();
            if let Some(room_id) = room.as_deref() {
                util::resolve_room(&snap, room_id)?;
            }
            let racks: Vec<RackSummary> = snap
                .racks()
                .filter(|loc| room.as_deref().is_none_or(|want| loc.room.id == want))
                .map(RackSummary::from)
                .collect();
            let color = ctx.color;
            let out = output::render_list(
                ctx.output,
                &racks,
                |r| RackRow {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    location: format!("{} / {}", r.data_center_name, r.room_name),
                    units: format!("{}/{}", r.utilization.used_units, r.utilization.total_units),
                    used: output::utilization(r.used_pct(), color),
                },
                |r| r.id.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        RacksCommand::Show { id } => {
            let snap = store.snapshot();
            let loc = snap
                .find_rack(&EntityId::from(id.as_str()))
                .ok_or_else(|| CliError::not_found("rack", id.as_str(), "rack list"))?;
            let detail = RackDetail {
                data_center_id: loc.data_center.id.as_str(),
                data_center_name: &loc.data_center.name,
                room_id: loc.room.id.as_str(),
                room_name: &loc.room.name,
                utilization: RackUtilization::from(loc.rack),
                rack: loc.rack,
            };
            let color = ctx.color;
            let out = output::render_single(
                ctx.output,
                &detail,
                |d| unit_map(d, color),
                |d| d.rack.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        RacksCommand::Find { id } => {
            let snap = store.snapshot();
            let path = util::resolve_rack(&snap, &id)?;
            let out = output::render_single(
                ctx.output,
                &path,
                |p| {
                    format!(
                        "Data center: {}\nRoom:        {}\nRack:        {}",
                        p.data_center_id, p.room_id, p.rack_id
                    )
                },
                |p| format!("{} {} {}", p.data_center_id, p.room_id, p.rack_id),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        RacksCommand::Add { room, units, name } => {
            let (dc_id, room_id) = util::resolve_room(&store.snapshot(), &room)?;
            let units = units.unwrap_or(ctx.store.default_rack_units);
            let id = store.add_rack(&dc_id, &room_id, &name, units)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Rack '{name}' created with {units}U"), ctx.quiet);
            Ok(())
        }

        RacksCommand::Update { id, name, units } => {
            let snap = store.snapshot();
            let path = util::resolve_rack(&snap, &id)?;
            let rack = snap
                .rack(&path)
                .ok_or_else(|| CliError::not_found("rack", id.as_str(), "rack list"))?;
            let name = name.unwrap_or_else(|| rack.name.clone());
            let units = units.unwrap_or(rack.total_units);
            store.update_rack(&path, &name, units)?;
            output::print_status("Rack updated", ctx.quiet);
            Ok(())
        }

        RacksCommand::Delete { id } => {
            let snap = store.snapshot();
            let path = util::resolve_rack(&snap, &id)?;
            let mounted = snap.rack(&path).map_or(0, Rack::occupied_units);
            let prompt = format!(
                "Delete rack {id} ({mounted} occupied unit(s))? Devices in it become unplaced."
            );
            if !util::confirm("rack delete", &prompt, ctx.yes)? {
                return Ok(());
            }
            let removed = store.delete_rack(&path)?;
            output::print_status(&format!("Rack '{}' deleted", removed.name), ctx.quiet);
            Ok(())
        }
    }
}
