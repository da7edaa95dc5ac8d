//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod config_cmd;
pub mod dc;
pub mod devices;
pub mod init;
pub mod ips;
pub mod notifications;
pub mod racks;
pub mod rooms;
pub mod services;
pub mod subnets;
pub mod util;

use rackwise_core::InventoryStore;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, store: &InventoryStore, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::DataCenters(args) => dc::handle(store, args, ctx),
        Command::Room(args) => rooms::handle(store, args, ctx),
        Command::Rack(args) => racks::handle(store, args, ctx),
        Command::Device(args) => devices::handle(store, args, ctx),
        Command::Service(args) => services::handle(store, args, ctx),
        Command::Subnet(args) => subnets::handle(store, args, ctx),
        Command::Ip(args) => ips::handle(store, args, ctx),
        Command::Notifications(args) => notifications::handle(store, args, ctx),
        Command::Init(args) => init::handle(store, &args, ctx),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are not store commands".into(),
        )),
    }
}
