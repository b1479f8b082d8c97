//! Identifier newtypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new ID with a UUIDv7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The raw 128-bit value.
            pub fn as_u128(&self) -> u128 {
                self.0.as_u128()
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

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an uploaded sequencing file.
    UploadId
);
uuid_id!(
    /// Unique identifier for an alert.
    AlertId
);
uuid_id!(
    /// Unique identifier for an analysis result.
    AnalysisId
);

/// Synthetic ASV identifier, rendered as `ASV_0001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AsvId(u32);

impl AsvId {
    const PREFIX: &'static str = "ASV_";

    /// ID for the ASV at 1-based position `index`.
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// The 1-based position of this ASV in its upload.
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AsvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", Self::PREFIX, self.0)
    }
}

impl FromStr for AsvId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .filter(|digits| digits.len() >= 4 && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidAsvId(s.to_string()))
    }
}

impl TryFrom<String> for AsvId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AsvId> for String {
    fn from(id: AsvId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asv_id_is_zero_padded() {
        assert_eq!(AsvId::from_index(1).to_string(), "ASV_0001");
        assert_eq!(AsvId::from_index(42).to_string(), "ASV_0042");
        assert_eq!(AsvId::from_index(12345).to_string(), "ASV_12345");
    }

    #[test]
    fn asv_id_parses_its_display_form() {
        let id: AsvId = "ASV_0007".parse().unwrap();
        assert_eq!(id.index(), 7);
        assert!("ASV_7".parse::<AsvId>().is_err());
        assert!("OTU_0007".parse::<AsvId>().is_err());
    }

    #[test]
    fn asv_id_serializes_as_string() {
        let json = serde_json::to_string(&AsvId::from_index(3)).unwrap();
        assert_eq!(json, "\"ASV_0003\"");
    }

    #[test]
    fn upload_ids_are_unique_and_parse_back() {
        let a = UploadId::new();
        let b = UploadId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<UploadId>().unwrap(), a);
    }
}
