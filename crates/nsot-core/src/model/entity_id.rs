// ── Core identity type ──
//
// Every NSoT object is keyed by a server-assigned positive integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for any NSoT entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path segment that isn't a decimal id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid entity id: {0:?}")]
pub struct InvalidEntityId(pub String);

/// Anything but plain decimal digits is rejected, including a leading `+`.
impl FromStr for EntityId {
    type Err = InvalidEntityId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidEntityId(s.to_owned()));
        }
        s.parse()
            .map(Self)
            .map_err(|_| InvalidEntityId(s.to_owned()))
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_digits_only() {
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!("abc".parse::<EntityId>().is_err());
        assert!("+7".parse::<EntityId>().is_err());
        assert!("".parse::<EntityId>().is_err());
        assert!("-1".parse::<EntityId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&EntityId::new(7)).unwrap(), "7");
    }
}
