//! Three-state field for partial updates.
//!
//! `Option<T>` cannot tell "leave this alone" apart from "set it to empty"
//! once the empty value of `T` is meaningful (an empty description, an empty
//! tag list). Update inputs use `Patch<T>` instead:
//!
//! - `Unset` is skipped entirely (`#[serde(skip_serializing_if = "Patch::is_unset")]`),
//! - `Clear` is sent as `T::default()`,
//! - `Set(v)` is sent as `v`.
//!
//! Reading goes the other way: an explicit `null` is `Clear`, a value is
//! `Set`, and an absent field falls back to `Unset` through `#[serde(default)]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Unset,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset | Patch::Clear => None,
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Set(value)
    }
}

impl<T: Serialize + Default> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Only reachable when a field forgets `skip_serializing_if`.
            Patch::Unset => serializer.serialize_none(),
            Patch::Clear => T::default().serialize(serializer),
            Patch::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}
