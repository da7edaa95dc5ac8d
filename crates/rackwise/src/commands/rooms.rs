//! Room command handlers.

use serde::Serialize;
use tabled::Tabled;

use rackwise_core::{EntityId, InventoryStore};

use crate::cli::{RoomsArgs, RoomsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomSummary {
    id: String,
    name: String,
    data_center_id: String,
    data_center_name: String,
    racks: usize,
}

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Data Center")]
    data_center: String,
    #[tabled(rename = "Racks")]
    racks: usize,
}

impl From<&RoomSummary> for RoomRow {
    fn from(r: &RoomSummary) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            data_center: r.data_center_name.clone(),
            racks: r.racks,
        }
    }
}

pub fn handle(store: &InventoryStore, args: RoomsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List { dc } => {
            let snap = store.snapshot();
            if let Some(dc_id) = dc.as_deref() {
                if snap.data_center(&EntityId::from(dc_id)).is_none() {
                    return Err(CliError::not_found("data center", dc_id, "dc list"));
                }
            }
            let rooms: Vec<RoomSummary> = snap
                .data_centers()
                .iter()
                .filter(|d| dc.as_deref().is_none_or(|want| d.id == want))
                .flat_map(|d| {
                    d.rooms.iter().map(move |room| RoomSummary {
                        id: room.id.to_string(),
                        name: room.name.clone(),
                        data_center_id: d.id.to_string(),
                        data_center_name: d.name.clone(),
                        racks: room.racks.len(),
                    })
                })
                .collect();
            let out = output::render_list(ctx.output, &rooms, |r| RoomRow::from(r), |r| r.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        RoomsCommand::Add { dc, name } => {
            let id = store.add_room(&EntityId::from(dc), &name)?;
            output::print_output(id.as_str(), ctx.quiet);
            output::print_status(&format!("Room '{name}' created"), ctx.quiet);
            Ok(())
        }

        RoomsCommand::Rename { id, name } => {
            let (dc_id, room_id) = util::resolve_room(&store.snapshot(), &id)?;
            store.update_room(&dc_id, &room_id, &name)?;
            output::print_status("Room renamed", ctx.quiet);
            Ok(())
        }

        RoomsCommand::Delete { id } => {
            let (dc_id, room_id) = util::resolve_room(&store.snapshot(), &id)?;
            let prompt = format!("Delete room {room_id}? Devices in it become unplaced.");
            if !util::confirm("room delete", &prompt, ctx.yes)? {
                return Ok(());
            }
            let removed = store.delete_room(&dc_id, &room_id)?;
            output::print_status(&format!("Room '{}' deleted", removed.name), ctx.quiet);
            Ok(())
        }
    }
}
