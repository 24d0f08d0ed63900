use std::{fmt, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable key for a tract.
/// Keeps the original GEOID text (with leading zeros) but avoids repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TractId(Arc<str>);

/// Key of an administrative unit (e.g. a county) grouping several tracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(Arc<str>);

macro_rules! impl_str_key {
    ($ty:ident) => {
        impl $ty {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self { Self(Arc::from(value)) }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self { Self(Arc::from(value)) }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

impl_str_key!(TractId);
impl_str_key!(UnitId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_as_plain_strings() {
        let id = TractId::from("06001400100");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"06001400100\"");
        assert_eq!(serde_json::from_str::<TractId>(&json).unwrap(), id);
    }

    #[test]
    fn leading_zeros_are_kept() {
        let unit = UnitId::from(String::from("01001"));
        assert_eq!(unit.as_str(), "01001");
        assert_eq!(unit.to_string(), "01001");
    }
}
