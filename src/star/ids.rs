//! Surrogate identifiers and how they are generated

use crate::source::{Coordinates, Taxonomy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! surrogate_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse a stored identifier
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

surrogate_id!(
    /// Surrogate key of a taxonomy dimension row
    TaxId
);
surrogate_id!(
    /// Surrogate key of a location dimension row
    LocId
);
surrogate_id!(
    /// Surrogate key of a taxonomy-location association row
    TaxLocId
);

/// How surrogate identifiers are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Fresh random UUIDs on every run
    #[default]
    Random,
    /// Name-based UUIDs derived from the natural key, stable across runs
    Deterministic,
}

impl IdStrategy {
    pub fn generate<K: NaturalKey>(&self, key: &K) -> Uuid {
        match self {
            Self::Random => Uuid::new_v4(),
            Self::Deterministic => Uuid::new_v5(&K::NAMESPACE, key.key_string().as_bytes()),
        }
    }
}

/// A natural key that can be deduplicated and named.
pub trait NaturalKey: Eq + std::hash::Hash + Clone {
    /// Namespace for name-based identifiers of this key type
    const NAMESPACE: Uuid;

    /// Unambiguous text form of the key
    fn key_string(&self) -> String;
}

/// Length-prefixed join, so no choice of field contents can collide.
fn encode_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(|p| format!("{}:{}", p.len(), p))
        .collect::<Vec<_>>()
        .join("|")
}

impl NaturalKey for Taxonomy {
    const NAMESPACE: Uuid = Uuid::from_u128(0x6a3c_0b1e_52f4_4d7a_9c1e_1f0a_7e21_d001);

    fn key_string(&self) -> String {
        encode_parts(self.fields())
    }
}

impl NaturalKey for Coordinates {
    const NAMESPACE: Uuid = Uuid::from_u128(0x6a3c_0b1e_52f4_4d7a_9c1e_1f0a_7e21_d002);

    fn key_string(&self) -> String {
        encode_parts([self.lat.as_str(), self.lon.as_str()])
    }
}

impl NaturalKey for (TaxId, LocId) {
    const NAMESPACE: Uuid = Uuid::from_u128(0x6a3c_0b1e_52f4_4d7a_9c1e_1f0a_7e21_d003);

    fn key_string(&self) -> String {
        format!("{}|{}", self.0, self.1)
    }
}
