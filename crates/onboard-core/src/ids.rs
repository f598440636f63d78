//! Strongly-typed identifiers for dashboard resources.
//!
//! Dashboard identifiers are opaque strings (`N_1234`, `L_5678`, serial numbers).
//! Wrapping each kind in its own type prevents passing a template id where a
//! network id is expected.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Macro to generate strongly-typed string identifier types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// Identifiers arrive as JSON strings, except organization ids on older API
/// versions which are plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

id_type!(OrganizationId, "Organization identifier");
id_type!(NetworkId, "Network identifier");
id_type!(TemplateId, "Configuration template identifier");
id_type!(Serial, "Device serial number or license key");
