//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use rackwise_config::ConfigError;
use rackwise_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(rackwise::not_found),
        help("Run: rackwise {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(rackwise::placement),
        help("Check which units of {rack} are free with: rackwise rack show <rack-id>")
    )]
    Placement { rack: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rackwise::validation))]
    Validation { field: String, reason: String },

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Could not persist inventory: {message}")]
    #[diagnostic(
        code(rackwise::persistence),
        help("Check that the state directory is writable, or point --state-dir elsewhere.")
    )]
    Persistence {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Internal error: {0}")]
    #[diagnostic(code(rackwise::internal))]
    Internal(String),

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(rackwise::config),
        help("Inspect the file with: rackwise config show")
    )]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(rackwise::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(rackwise::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(rackwise::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Could not render TOML: {0}")]
    #[diagnostic(code(rackwise::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Placement { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Shorthand for a missing resource with its list command.
    pub fn not_found(resource_type: &str, identifier: impl Into<String>, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The list command that shows entities of a core entity type.
fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type {
        "data center" => "dc list",
        "room" => "room list",
        "rack" => "rack list",
        "service" => "service list",
        "subnet" => "subnet list",
        "notification" => "notifications list",
        "ip" => "ip list",
        _ => "device list",
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(&entity_type).into(),
                resource_type: entity_type,
                identifier,
            },

            ref placement @ (CoreError::Occupied { ref rack, .. }
            | CoreError::OutOfRange { ref rack, .. }) => CliError::Placement {
                rack: rack.clone(),
                message: placement.to_string(),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Persistence { message, source } => {
                CliError::Persistence { message, source }
            }

            CoreError::Serialization(e) => CliError::Json(e),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let not_found = CliError::from(CoreError::NotFound {
            entity_type: "rack".into(),
            identifier: "rack-9".into(),
        });
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(
            not_found,
            CliError::NotFound { ref list_command, .. } if list_command == "rack list"
        ));

        let occupied = CliError::from(CoreError::Occupied {
            rack: "Rack 1".into(),
            position: 3,
            occupant: "dev-1".into(),
        });
        assert_eq!(occupied.exit_code(), exit_code::CONFLICT);
        assert!(occupied.to_string().contains("occupied"));

        let invalid = CliError::from(CoreError::Validation {
            message: "device size must be at least 1U".into(),
        });
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let internal = CliError::from(CoreError::Internal("poisoned".into()));
        assert_eq!(internal.exit_code(), exit_code::GENERAL);
    }
}
