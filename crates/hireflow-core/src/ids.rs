//! Strongly typed identifiers.
//!
//! Newtype wrappers keep the ID kinds used across hireflow from being
//! mixed up at compile time.
//!
//! Two families exist:
//!
//! - UUID-backed ids ([`TenantId`]) for entities owned by the host platform.
//! - Prefixed ids ([`WebhookId`], [`EventId`]) whose wire form is a short
//!   prefix followed by hex-encoded random bytes, e.g. `wh_3f9c…`.
//!
//! # Example
//!
//! ```
//! use hireflow_core::{TenantId, WebhookId};
//!
//! let tenant = TenantId::new();
//! assert_eq!(tenant.to_string().len(), 36);
//!
//! let webhook = WebhookId::generate();
//! assert!(webhook.as_str().starts_with("wh_"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when an ID string fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// Name of the ID type that rejected the input.
    pub id_type: &'static str,
    /// What was wrong with the input.
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Identifier of the tenant owning a webhook configuration.
///
/// Hireflow is multi-tenant throughout; every registry and dispatch
/// operation is scoped by one of these. Backed by a UUID issued by the
/// host platform.
///
/// # Example
///
/// ```
/// use hireflow_core::TenantId;
/// use uuid::Uuid;
///
/// let uuid = Uuid::new_v4();
/// let tenant = TenantId::from_uuid(uuid);
/// assert_eq!(tenant.as_uuid(), &uuid);
///
/// let parsed: TenantId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
/// assert_ne!(parsed, tenant);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Creates a fresh random ID (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for TenantId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Uuid::parse_str(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(e) => Err(ParseIdError {
                id_type: "TenantId",
                message: e.to_string(),
            }),
        }
    }
}

/// Macro to define a strongly-typed prefixed ID type.
///
/// The wire form is `{prefix}{hex}` where `hex` encodes `$bytes` random
/// bytes drawn from the operating system CSPRNG.
macro_rules! define_prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $bytes:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// The prefix identifying this ID type on the wire.
            pub const PREFIX: &'static str = $prefix;

            /// Generates a new random ID.
            #[must_use]
            pub fn generate() -> Self {
                use rand::rngs::OsRng;
                use rand::RngCore;

                let mut bytes = [0u8; $bytes];
                OsRng.fill_bytes(&mut bytes);
                Self(format!("{}{}", $prefix, hex::encode(bytes)))
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::generate()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let hex_part = s.strip_prefix($prefix).ok_or_else(|| ParseIdError {
                    id_type: stringify!($name),
                    message: format!("missing `{}` prefix", $prefix),
                })?;

                if hex_part.len() != $bytes * 2
                    || !hex_part.bytes().all(|b| b.is_ascii_hexdigit())
                {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        message: format!(
                            "expected {} hex characters after the prefix",
                            $bytes * 2
                        ),
                    });
                }

                Ok(Self(s.to_string()))
            }
        }
    };
}

define_prefixed_id!(
    /// Strongly typed identifier for webhook configurations.
    ///
    /// Wire form: `wh_` followed by 24 hex characters, e.g.
    /// `wh_9f2e4c1a0b3d5e7f6a8c9b0d`.
    ///
    /// # Example
    ///
    /// ```
    /// use hireflow_core::WebhookId;
    ///
    /// let id = WebhookId::generate();
    /// assert!(id.as_str().starts_with("wh_"));
    /// ```
    WebhookId,
    "wh_",
    12
);

define_prefixed_id!(
    /// Strongly typed identifier for dispatched webhook events.
    ///
    /// Wire form: `evt_` followed by 24 hex characters. One event ID is
    /// shared by every endpoint a single dispatch fans out to.
    EventId,
    "evt_",
    12
);
