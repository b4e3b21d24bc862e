use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of the short docket number shown to citizens.
pub const DOCKET_LEN: usize = 8;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ComplaintId, "Typed wrapper for complaint (docket) UUIDs.");

impl ComplaintId {
    /// Short uppercase docket number: the last eight hex digits of the UUID.
    pub fn docket(&self) -> String {
        let simple = self.0.simple().to_string();
        simple[simple.len() - DOCKET_LEN..].to_uppercase()
    }

    /// Whether this id is the one a citizen-facing docket number refers to.
    pub fn matches_docket(&self, docket: &str) -> bool {
        let docket = docket.trim();
        !docket.is_empty()
            && self
                .0
                .simple()
                .to_string()
                .ends_with(&docket.to_ascii_lowercase())
    }
}
