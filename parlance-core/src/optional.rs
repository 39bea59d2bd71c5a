//! Tri-state optional values for request payloads
//!
//! JSON APIs distinguish between a field that is omitted, a field that is
//! explicitly `null`, and a field that carries a value. [`Optional`] makes
//! the three states explicit instead of overloading `Option<T>`.
//!
//! Request structs pair `Optional` with
//! `#[serde(default, skip_serializing_if = "Optional::is_absent")]`, so
//! `Absent` never touches the wire, `Null` serializes an explicit `null`,
//! and `Value(v)` serializes `v`.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A value that may be omitted, explicitly null, or present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optional<T> {
    /// Field is left off the wire entirely.
    #[default]
    Absent,
    /// Field is sent as an explicit JSON `null`.
    Null,
    /// Field is sent with a value.
    Value(T),
}

impl<T> Optional<T> {
    /// Returns true if the field would be omitted from serialization.
    pub fn is_absent(&self) -> bool {
        matches!(self, Optional::Absent)
    }

    /// Returns true if the field is an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Optional::Null)
    }

    /// Returns true if a value is present.
    pub fn is_value(&self) -> bool {
        matches!(self, Optional::Value(_))
    }

    /// Returns the contained value, if any.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Optional::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Converts into `Option`, collapsing `Absent` and `Null` to `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Optional::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the contained value, preserving `Absent`/`Null`.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        match self {
            Optional::Absent => Optional::Absent,
            Optional::Null => Optional::Null,
            Optional::Value(v) => Optional::Value(f(v)),
        }
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Optional::Value(value)
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Optional::Value(v),
            None => Optional::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Absent only reaches here when the enclosing field is not
            // annotated with skip_serializing_if; serialize null in that case.
            Optional::Absent | Optional::Null => serializer.serialize_none(),
            Optional::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<T>::deserialize(deserializer)? {
            Some(v) => Ok(Optional::Value(v)),
            None => Ok(Optional::Null),
        }
    }
}
