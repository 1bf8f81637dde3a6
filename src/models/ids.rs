//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates a UUID newtype with a short, prefixed display form
///
/// The display form (`evt-1a2b3c4d`) is what the CLI prints; `matches_ref`
/// lets users type it back in place of the full UUID.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Display prefix for this identifier kind
            pub const fn prefix() -> &'static str {
                $prefix
            }

            /// Check whether a user-supplied reference names this id
            ///
            /// Accepts the full UUID, the prefixed short form, or a bare hex
            /// prefix of at least four characters.
            pub fn matches_ref(&self, reference: &str) -> bool {
                let reference = reference.trim().to_lowercase();
                let reference = reference.strip_prefix($prefix).unwrap_or(&reference);
                if reference.len() < 4 {
                    return false;
                }
                self.0.to_string().starts_with(reference)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(EventId, "evt-");
define_id!(BudgetCategoryId, "bud-");
define_id!(ExpenseId, "exp-");
define_id!(InvitationId, "inv-");
define_id!(ReminderId, "rem-");
define_id!(CalendarIntegrationId, "cal-");
define_id!(UserId, "usr-");
