//! Clap derive structures for the `rackwise` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rackwise -- data center inventory from the command line
#[derive(Debug, Parser)]
#[command(
    name = "rackwise",
    version,
    about = "Track data centers, racks, devices, services and IP space",
    long_about = "A command-line inventory for physical infrastructure.\n\n\
        Models data centers, rooms, racks and rack units, the devices\n\
        mounted in them, the business services they support and the IP\n\
        subnets they draw addresses from. State is kept in a single JSON file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to load instead of the platform default
    #[arg(long, env = "RACKWISE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the inventory state file
    #[arg(long, env = "RACKWISE_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Output format (defaults to the configured format, then table)
    #[arg(long, short = 'o', env = "RACKWISE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage data centers
    #[command(name = "dc", alias = "datacenter")]
    DataCenters(DataCentersArgs),

    /// Manage rooms inside a data center
    Room(RoomsArgs),

    /// Manage racks and inspect their units
    Rack(RacksArgs),

    /// Manage devices mounted in racks
    #[command(alias = "dev", alias = "d")]
    Device(DevicesArgs),

    /// Manage business services and their devices
    #[command(alias = "svc")]
    Service(ServicesArgs),

    /// Manage IP subnets
    #[command(alias = "net")]
    Subnet(SubnetsArgs),

    /// Assign, release and reserve IP addresses
    Ip(IpArgs),

    /// View and manage the activity feed
    #[command(alias = "notif")]
    Notifications(NotificationsArgs),

    /// Reset the inventory, optionally to the demo data set
    Init(InitArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Data Centers ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DataCentersArgs {
    #[command(subcommand)]
    pub command: DataCentersCommand,
}

#[derive(Debug, Subcommand)]
pub enum DataCentersCommand {
    /// List data centers
    #[command(alias = "ls")]
    List,

    /// Create a data center
    Add {
        /// Display name
        name: String,
    },

    /// Rename a data center
    Rename {
        /// Data center ID
        id: String,
        /// New display name
        name: String,
    },

    /// Delete a data center (devices in it become unplaced)
    #[command(alias = "rm")]
    Delete {
        /// Data center ID
        id: String,
    },
}

// ── Rooms ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List {
        /// Only rooms in this data center
        #[arg(long)]
        dc: Option<String>,
    },

    /// Create a room in a data center
    Add {
        /// Owning data center ID
        #[arg(long)]
        dc: String,
        /// Display name
        name: String,
    },

    /// Rename a room
    Rename {
        /// Room ID
        id: String,
        /// New display name
        name: String,
    },

    /// Delete a room (devices in it become unplaced)
    #[command(alias = "rm")]
    Delete {
        /// Room ID
        id: String,
    },
}

// ── Racks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RacksArgs {
    #[command(subcommand)]
    pub command: RacksCommand,
}

#[derive(Debug, Subcommand)]
pub enum RacksCommand {
    /// List racks with utilization
    #[command(alias = "ls")]
    List {
        /// Only racks in this room
        #[arg(long)]
        room: Option<String>,
    },

    /// Show a rack's unit map, top unit first
    Show {
        /// Rack ID
        id: String,
    },

    /// Print the data center and room that hold a rack
    Find {
        /// Rack ID
        id: String,
    },

    /// Create a rack in a room
    Add {
        /// Owning room ID
        #[arg(long)]
        room: String,
        /// Height in units (defaults to store.default_rack_units)
        #[arg(long, short = 'u')]
        units: Option<u32>,
        /// Display name
        name: String,
    },

    /// Rename or resize a rack
    Update {
        /// Rack ID
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New height in units; cannot cut through an occupied unit
        #[arg(long, short = 'u')]
        units: Option<u32>,
    },

    /// Delete a rack (devices in it become unplaced)
    #[command(alias = "rm")]
    Delete {
        /// Rack ID
        id: String,
    },
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices
    #[command(alias = "ls")]
    List {
        /// Filter by status (active, inactive, maintenance, decommissioned)
        #[arg(long)]
        status: Option<String>,
        /// Filter by device type, case-insensitive
        #[arg(long = "type")]
        device_type: Option<String>,
        /// Only devices linked to this service ID
        #[arg(long)]
        service: Option<String>,
        /// Only devices not mounted in any rack
        #[arg(long)]
        unplaced: bool,
        /// Only devices whose name contains this text
        #[arg(long)]
        name: Option<String>,
    },

    /// Show device details
    Get {
        /// Device ID
        id: String,
    },

    /// Add a device and mount it in a rack
    Add {
        /// Target rack ID
        #[arg(long)]
        rack: String,
        /// Bottom unit the device occupies (1-based)
        #[arg(long, short = 'p')]
        position: u32,
        /// Read the device definition from a JSON file
        #[arg(long, conflicts_with_all = ["name", "size"])]
        from_file: Option<PathBuf>,
        /// Display name
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,
        /// Height in units
        #[arg(long, short = 's', required_unless_present = "from_file")]
        size: Option<u32>,
        #[command(flatten)]
        fields: DeviceFields,
    },

    /// Update device attributes; a new size keeps the start unit
    Update {
        /// Device ID
        id: String,
        /// Read the update from a JSON file
        #[arg(long)]
        from_file: Option<PathBuf>,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New height in units
        #[arg(long, short = 's')]
        size: Option<u32>,
        /// Unlink the device from its service
        #[arg(long, conflicts_with = "service")]
        no_service: bool,
        /// Rack to address an unplaced device through
        #[arg(long)]
        rack: Option<String>,
        #[command(flatten)]
        fields: DeviceFields,
    },

    /// Delete a device and free its units
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        id: String,
        /// Rack to address an unplaced device through
        #[arg(long)]
        rack: Option<String>,
    },

    /// Move a device to another position or rack
    #[command(alias = "mv")]
    Move {
        /// Device ID
        id: String,
        /// Destination rack ID (defaults to the current rack)
        #[arg(long)]
        to: Option<String>,
        /// Destination bottom unit
        #[arg(long, short = 'p')]
        position: u32,
    },

    /// Print where a device is mounted
    Locate {
        /// Device ID
        id: String,
    },
}

/// Optional device attributes shared by add and update.
#[derive(Debug, Args)]
pub struct DeviceFields {
    /// Device type, e.g. Server, Switch, Storage
    #[arg(long = "type")]
    pub device_type: Option<String>,
    /// Hardware model
    #[arg(long)]
    pub model: Option<String>,
    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
    /// Status (active, inactive, maintenance, decommissioned)
    #[arg(long)]
    pub status: Option<String>,
    /// Power draw in watts
    #[arg(long)]
    pub power: Option<f64>,
    /// Installation date (YYYY-MM-DD)
    #[arg(long)]
    pub installed: Option<String>,
    /// Link to this service ID
    #[arg(long)]
    pub service: Option<String>,
}

// ── Services ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// List services
    #[command(alias = "ls")]
    List {
        /// Filter by status (active, inactive, maintenance, planned)
        #[arg(long)]
        status: Option<String>,
        /// Only services at or above this criticality
        #[arg(long)]
        min_criticality: Option<String>,
    },

    /// Show a service and its devices
    Get {
        /// Service ID
        id: String,
    },

    /// Create a service
    Add {
        /// Display name
        name: String,
        #[command(flatten)]
        fields: ServiceFields,
    },

    /// Update service attributes
    Update {
        /// Service ID
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ServiceFields,
    },

    /// Delete a service (its devices and subnets are unlinked)
    #[command(alias = "rm")]
    Delete {
        /// Service ID
        id: String,
    },

    /// Link a device to a service, moving it off any previous service
    Assign {
        /// Service ID
        service: String,
        /// Device ID
        device: String,
    },

    /// Unlink a device from a service
    Unassign {
        /// Service ID
        service: String,
        /// Device ID
        device: String,
    },
}

/// Optional service attributes shared by add and update.
#[derive(Debug, Args)]
pub struct ServiceFields {
    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
    /// Status (active, inactive, maintenance, planned)
    #[arg(long)]
    pub status: Option<String>,
    /// Criticality (low, medium, high, critical)
    #[arg(long)]
    pub criticality: Option<String>,
    /// Responsible person
    #[arg(long)]
    pub owner: Option<String>,
    /// Owning department
    #[arg(long)]
    pub department: Option<String>,
}

// ── Subnets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SubnetsArgs {
    #[command(subcommand)]
    pub command: SubnetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubnetsCommand {
    /// List subnets with usage counters
    #[command(alias = "ls")]
    List,

    /// Create a subnet
    Add {
        /// Network in CIDR form, e.g. 192.168.1.0/24
        cidr: String,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
        /// Default gateway
        #[arg(long)]
        gateway: Option<String>,
        /// Addresses held back from the available pool
        #[arg(long, default_value = "0")]
        reserved: u64,
        /// Owning service ID
        #[arg(long)]
        service: Option<String>,
    },

    /// Update subnet metadata
    Update {
        /// Subnet ID
        id: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New gateway
        #[arg(long)]
        gateway: Option<String>,
        /// Owning service ID
        #[arg(long)]
        service: Option<String>,
        /// Clear the owning service
        #[arg(long, conflicts_with = "service")]
        no_service: bool,
    },

    /// Delete a subnet
    #[command(alias = "rm")]
    Delete {
        /// Subnet ID
        id: String,
    },
}

// ── IP Addresses ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IpArgs {
    #[command(subcommand)]
    pub command: IpCommand,
}

#[derive(Debug, Subcommand)]
pub enum IpCommand {
    /// List assigned addresses and reservations
    #[command(alias = "ls")]
    List {
        /// Only addresses in this subnet (CIDR)
        #[arg(long)]
        subnet: Option<String>,
    },

    /// Assign an address to a device
    Assign {
        /// IP address
        address: String,
        /// Subnet in CIDR form
        #[arg(long)]
        subnet: String,
        /// Receiving device ID
        #[arg(long)]
        device: String,
        /// Gateway for this address
        #[arg(long)]
        gateway: Option<String>,
    },

    /// Release an assigned address or drop a reservation
    Release {
        /// IP entry ID
        id: String,
    },

    /// Hold an address back without a device
    Reserve {
        /// IP address
        address: String,
        /// Subnet in CIDR form
        #[arg(long)]
        subnet: String,
    },

    /// List reservations
    Reservations,
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotificationsArgs {
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List notifications, newest first
    #[command(alias = "ls")]
    List {
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every notification as read
    ReadAll,

    /// Remove one notification
    #[command(alias = "rm")]
    Remove {
        /// Notification ID
        id: String,
    },

    /// Remove every notification
    Clear,
}

// ── Init ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Start from the demo data set instead of an empty inventory
    #[arg(long)]
    pub demo: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
