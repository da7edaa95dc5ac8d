// ── Core error types ──
//
// Every store operation either completes fully or returns one of these.
// Consumers (CLI, other front ends) map them to user-facing diagnostics.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Placement errors ─────────────────────────────────────────────
    #[error("Unit {position} of rack {rack} is occupied by device {occupant}")]
    Occupied {
        rack: String,
        position: u32,
        occupant: String,
    },

    #[error(
        "Rack {rack} cannot hold {size}U starting at unit {position} (rack has {total_units}U)"
    )]
    OutOfRange {
        rack: String,
        position: u32,
        size: u32,
        total_units: u32,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Persistence errors ───────────────────────────────────────────
    #[error("Persistence failed: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error reports a placement conflict (occupied or out of range).
    pub fn is_placement_conflict(&self) -> bool {
        matches!(self, Self::Occupied { .. } | Self::OutOfRange { .. })
    }
}
