//! `init`: reset the persisted inventory.

use rackwise_core::{Inventory, InventoryStore};

use crate::cli::InitArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(store: &InventoryStore, args: &InitArgs, ctx: &Context) -> Result<(), CliError> {
    let current = store.snapshot();
    let populated = !current.data_centers().is_empty()
        || current.device_count() > 0
        || current.services().next().is_some()
        || !current.subnets().is_empty();
    if populated {
        let prompt = "The inventory already holds data. Replace it?";
        if !util::confirm("init", prompt, ctx.yes)? {
            return Ok(());
        }
    }

    let (inventory, label) = if args.demo {
        (Inventory::demo(), "demo inventory")
    } else {
        (Inventory::new(), "empty inventory")
    };
    store.replace_all(inventory)?;
    output::print_status(
        &format!(
            "Initialized {label} in {}",
            ctx.store.state_file().display()
        ),
        ctx.quiet,
    );
    Ok(())
}
