// ── Inventory store ──
//
// `Inventory` is the plain state graph with its operations; `InventoryStore`
// wraps it in transactional, observable, persisted form.

mod data_store;
mod devices;
mod hierarchy;
mod inventory;
mod ipam;
mod notifications;
mod seed;
mod services;

pub use data_store::{DEFAULT_MAX_NOTIFICATIONS, InventoryStore, StoreOptions};
pub use inventory::Inventory;
