//! Scalar codecs for fields whose wire type drifts between endpoints.
//!
//! Each type tries an ordered list of wire shapes on read and always writes
//! back a single canonical form:
//!
//! | type         | accepted on read                                  | written as        |
//! |--------------|---------------------------------------------------|-------------------|
//! | `FlexibleId` | string, integer                                   | string            |
//! | `Timestamp`  | RFC3339, naive with fraction, naive, `""`, null   | RFC3339 or null   |
//! | `Tag`        | string, `{"id", "label"}` object                  | id string         |

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Timelike, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// FlexibleId
// ---------------------------------------------------------------------------

/// An identifier that arrives as either a JSON string or a JSON integer.
///
/// Once decoded it is just a string: integers are stored in their decimal
/// form and the value is always written back as a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlexibleId(String);

impl FlexibleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for FlexibleId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FlexibleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FlexibleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FlexibleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FlexibleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for FlexibleId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for FlexibleId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for FlexibleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FlexibleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for FlexibleId {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

impl Serialize for FlexibleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FlexibleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        match Repr::deserialize(deserializer) {
            Ok(Repr::Text(id)) => Ok(Self(id)),
            Ok(Repr::Signed(id)) => Ok(Self::from(id)),
            Ok(Repr::Unsigned(id)) => Ok(Self::from(id)),
            Err(_) => Err(de::Error::custom("id must be a string or integer")),
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

const NAIVE_FRACTIONAL: &str = "%Y-%m-%dT%H:%M:%S%.f";
const NAIVE_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// A point in time that tolerates the three timestamp layouts the API emits.
///
/// Naive values (no offset) are taken to be UTC. The empty string and JSON
/// null decode to the unset value; unset serializes as null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(Option<DateTime<FixedOffset>>);

impl Timestamp {
    pub const UNSET: Timestamp = Timestamp(None);

    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(Some(at))
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<DateTime<FixedOffset>> {
        self.0
    }

    /// Parse RFC3339 first, then the naive layouts with and without a
    /// fractional part. The error of the last attempt is returned.
    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        if text.is_empty() {
            return Ok(Self::UNSET);
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self(Some(at)));
        }
        NaiveDateTime::parse_from_str(text, NAIVE_FRACTIONAL)
            .or_else(|_| NaiveDateTime::parse_from_str(text, NAIVE_SECONDS))
            .map(|naive| Self(Some(naive.and_utc().fixed_offset())))
    }

    /// RFC3339 rendering, `None` when unset.
    pub fn to_rfc3339(&self) -> Option<String> {
        self.0
            .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self(Some(at))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(Some(at.fixed_offset()))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Renders as `2006-01-02 15:04:05 +0000 UTC`, the layout used in error
/// messages. Unset renders as the zero instant.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(at) = self.0 else {
            return f.write_str("0001-01-01 00:00:00 +0000 UTC");
        };
        write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S"))?;
        let nanos = at.nanosecond();
        if nanos > 0 {
            let fraction = format!("{nanos:09}");
            write!(f, ".{}", fraction.trim_end_matches('0'))?;
        }
        let offset = at.format("%z").to_string();
        if at.offset().local_minus_utc() == 0 {
            write!(f, " {offset} UTC")
        } else {
            write!(f, " {offset} {offset}")
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_rfc3339() {
            Some(text) => serializer.serialize_str(&text),
            None => serializer.serialize_none(),
        }
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timestamp string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Timestamp, E> {
        Timestamp::parse(value).map_err(|err| E::custom(format!("invalid timestamp {value:?}: {err}")))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Timestamp, E> {
        Ok(Timestamp::UNSET)
    }

    fn visit_none<E: de::Error>(self) -> Result<Timestamp, E> {
        Ok(Timestamp::UNSET)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// A tag that is either a bare name or an `{"id", "label"}` object upstream.
///
/// Both forms decode to the same struct; only `id` is ever written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

impl Tag {
    /// A tag whose id and label are both `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let id = name.into();
        Self {
            label: id.clone(),
            id,
        }
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Object {
                id: String,
                #[serde(default)]
                label: String,
            },
        }

        match Repr::deserialize(deserializer) {
            Ok(Repr::Name(name)) => Ok(Self::new(name)),
            Ok(Repr::Object { id, label }) => Ok(Self { id, label }),
            Err(_) => Err(de::Error::custom(
                "tag must be a string or an object with an id",
            )),
        }
    }
}
