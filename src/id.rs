//! Identifier types.
//!
//! Banners, steps, units and analyses are referenced by string ids assigned
//! by the editor (`"unit_1718..."`, `"step_3"`, ...). Each kind gets its own
//! newtype so a step id can never be passed where a unit id is expected.
//! All of them use `Arc<str>` for cheap cloning and fast comparison.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new id from a string slice.
            pub fn new(s: &str) -> Self {
                Self(Arc::from(s))
            }

            /// Get the string representation of this id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.as_ref().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a banner.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::BannerId;
    ///
    /// let a = BannerId::new("banner_1");
    /// let b: BannerId = "banner_1".into();
    /// assert_eq!(a, b);
    /// ```
    BannerId
);

interned_id!(
    /// Identifier of a purchase step within a banner.
    StepId
);

interned_id!(
    /// Identifier of a unit within a banner.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::UnitId;
    ///
    /// let unit = UnitId::new("unit_7");
    /// assert_eq!(unit.as_str(), "unit_7");
    /// assert_eq!(unit.to_string(), "unit_7");
    /// ```
    UnitId
);

interned_id!(
    /// Identifier of a custom analysis group.
    AnalysisId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        let id1 = UnitId::new("unit_1");
        let id2: UnitId = String::from("unit_1").into();
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "unit_1");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = StepId::new("step_2");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"step_2\"");

        let back: StepId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_ordering() {
        let a = BannerId::new("a");
        let b = BannerId::new("b");
        assert!(a < b);
    }
}
