//! Data center command handlers.

use serde::Serialize;
use tabled::Tabled;

use rackwise_core::{DataCenter, EntityId, InventoryStore};

use crate::cli::{DataCentersArgs, DataCentersCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Summary ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataCenterSummary {
    id: String,
    name: String,
    rooms: usize,
    racks: usize,
    total_units: u32,
    used_units: usize,
}

impl From<&DataCenter> for DataCenterSummary {
    fn from(dc: &DataCenter) -> Self {
        let racks = dc.rooms.iter().flat_map(|room| room.racks.iter());
        Self {
            id: dc.id.to_string(),
            name: dc.name.clone(),
            rooms: dc.rooms.len(),
            racks: dc.rooms.iter().map(|room| room.racks.len()).sum(),
            total_units: racks.clone().map(|rack| rack.total_units).sum(),
            used_units: racks.map(rackwise_core::Rack::occupied_units).sum(),
        }
    }
}

#[derive(Tabled)]
struct DataCenterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rooms")]
    rooms: usize,
    #[tabled(rename = "Racks")]
    racks: usize,
    #[tabled(rename = "Units Used")]
    units: String,
}

impl From<&DataCenterSummary> for DataCenterRow {
    fn from(s: &DataCenterSummary) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            rooms: s.rooms,
            racks: s.racks,
            units: format!("{}/{}", s.used_units, s.total_units),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(store: &InventoryStore, args: DataCentersArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        DataCentersCommand::List => {
            let snap = store.snapshot();
            let summaries: Vec<DataCenterSummary> =
                snap.data_centers().iter().map(DataCenterSummary::from).collect();
            let out = output::render_list(
                ctx.output,
                &summaries,
                |s| DataCenterRow::from(s),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        DataCentersCommand::Add { name } => {
            let id = store.add_data_center(&name)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Data center '{name}' created"), ctx.quiet);
            Ok(())
        }

        DataCentersCommand::Rename { id, name } => {
            store.update_data_center(&EntityId::from(id), &name)?;
            output::print_status("Data center renamed", ctx.quiet);
            Ok(())
        }

        DataCentersCommand::Delete { id } => {
            let id = EntityId::from(id);
            let snap = store.snapshot();
            let dc = snap
                .data_center(&id)
                .ok_or_else(|| CliError::not_found("data center", id.as_str(), "dc list"))?;
            let prompt = format!(
                "Delete data center '{}' with {} room(s)? Devices in it become unplaced.",
                dc.name,
                dc.rooms.len()
            );
            if !util::confirm("dc delete", &prompt, ctx.yes)? {
                return Ok(());
            }
            let removed = store.delete_data_center(&id)?;
            output::print_status(&format!("Data center '{}' deleted", removed.name), ctx.quiet);
            Ok(())
        }
    }
}
