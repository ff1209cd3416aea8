//! Identity types for AssetDesk entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Common behavior of the numeric primary keys handed out by the server.
pub trait EntityIdType: Copy + Eq + std::hash::Hash + fmt::Display {
    fn new(raw: i64) -> Self;
    fn as_i64(&self) -> i64;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl EntityIdType for $name {
            fn new(raw: i64) -> Self {
                Self(raw)
            }

            fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Server primary key of an asset (distinct from its human-facing asset code).
    AssetId
);
entity_id!(BranchId);
entity_id!(TransferId);
entity_id!(UserId);
entity_id!(HistoryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let id = AssetId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: BranchId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.as_i64(), 7);
        assert_eq!(parsed.to_string(), "7");
    }
}
