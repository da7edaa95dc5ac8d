// ── Core identity type ──
//
// Every stored entity carries an opaque string id of the form
// `prefix-<unix millis>-<random>`. Ids coming back from a persisted blob
// or from a caller are accepted verbatim.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix appended to generated ids.
const SUFFIX_LEN: usize = 6;

/// Canonical identifier for any inventory entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh id: `prefix-<unix millis>-<6 lowercase alphanumerics>`.
    pub fn generate(prefix: &str) -> Self {
        let millis = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        let suffix: String = random.chars().take(SUFFIX_LEN).collect();
        Self(format!("{prefix}-{millis}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix segment (`dc`, `room`, `rack`, ...), if the id has one.
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once('-').map(|(prefix, _)| prefix)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_has_prefix_timestamp_and_suffix() {
        let id = EntityId::generate("rack");
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "rack");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert_eq!(id.prefix(), Some("rack"));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = EntityId::generate("dev");
        let b = EntityId::generate("dev");
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_from_str_is_verbatim() {
        let id: EntityId = "rack-1".parse().unwrap();
        assert_eq!(id.as_str(), "rack-1");
        assert_eq!(id, "rack-1");
    }

    #[test]
    fn entity_id_serializes_as_plain_string() {
        let id = EntityId::from("dc-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dc-1\"");
    }
}
