//! Typed identifiers for the habit tracker aggregates.
//!
//! Each identifier wraps a UUID so a habit id can never be passed where a
//! completion id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised while parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The input was empty once trimmed.
    #[error("identifier must not be empty")]
    Empty,
    /// The input was not a UUID.
    #[error("identifier must be a valid UUID")]
    Invalid,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its textual UUID form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = raw.as_ref();
                if raw.trim().is_empty() {
                    return Err(IdValidationError::Empty);
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::Invalid)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Stable user identifier.
    UserId
);
define_id!(
    /// Stable habit identifier.
    HabitId
);
define_id!(
    /// Stable completion identifier.
    CompletionId
);
define_id!(
    /// Stable badge identifier.
    BadgeId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdValidationError::Empty)]
    #[case("   ", IdValidationError::Empty)]
    #[case("not-a-uuid", IdValidationError::Invalid)]
    fn rejects_bad_input(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(HabitId::new(raw), Err(expected));
    }

    #[rstest]
    fn parses_and_displays_uuid() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id = UserId::new(raw).expect("valid uuid");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn serialises_as_bare_string() {
        let id = BadgeId::from_uuid(Uuid::nil());
        let json = serde_json::to_value(id).expect("serialise id");
        assert_eq!(json, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
