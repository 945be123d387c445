//! Decoding of Clubhouse JSON payloads into entities.
//!
//! The API is loosely typed, so decoding is lenient by default: a required
//! field that is missing or has the wrong JSON type falls back to its
//! default value, an optional field falls back to `None`, and a list field
//! that is not an array decodes to `None`. Callers that would rather see
//! those anomalies can opt into [`DecodePolicy::Strict`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::{ApiError, Result};

/// Timestamp format used by the API, e.g. `2016-03-20T12:30:00+0000`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// How strictly required entity fields are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Missing or mistyped required fields take their default value.
    #[default]
    Lenient,
    /// Missing or mistyped required fields fail with [`ApiError::Decode`].
    Strict,
}

/// JSON type expected for a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Str,
    Bool,
    Object,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Int => value.is_i64() || value.is_u64(),
            Kind::Str => value.is_string(),
            Kind::Bool => value.is_boolean(),
            Kind::Object => value.is_object(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Int => "an integer",
            Kind::Str => "a string",
            Kind::Bool => "a boolean",
            Kind::Object => "an object",
        }
    }
}

/// A required field: the wire keys it may appear under and its JSON type.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub keys: &'static [&'static str],
    pub kind: Kind,
}

impl Field {
    pub const fn new(keys: &'static [&'static str], kind: Kind) -> Self {
        Self { keys, kind }
    }
}

/// A record decoded from one JSON object.
pub trait Entity: DeserializeOwned {
    /// Name used in decode errors.
    const NAME: &'static str;
    /// Fields checked under [`DecodePolicy::Strict`].
    const REQUIRED: &'static [Field];
    /// Misspelled wire keys the API has been seen sending, each paired with
    /// the key it stands for. The correct key wins when both are present.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];
}

/// Decode a single entity from a JSON object.
pub fn decode<T: Entity>(value: Value, policy: DecodePolicy) -> Result<T> {
    if !value.is_object() {
        return Err(ApiError::InvalidResponse(format!(
            "expected a JSON object for {}, got {}",
            T::NAME,
            json_type(&value)
        )));
    }

    decode_object(value, policy)
}

/// Decode a list of entities from a JSON array.
///
/// Elements that are not JSON objects are skipped. An object element that
/// fails to decode fails the whole list.
pub fn decode_list<T: Entity>(value: Value, policy: DecodePolicy) -> Result<Vec<T>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ApiError::InvalidResponse(format!(
                "expected a JSON array of {}, got {}",
                T::NAME,
                json_type(&other)
            )))
        }
    };

    items
        .into_iter()
        .filter(|item| item.is_object())
        .map(|item| decode_object(item, policy))
        .collect()
}

/// Decode the objects of a nested list, or `None` if `value` is not an array.
///
/// Nested lists never fail their parent: non-objects and elements that
/// don't decode are skipped.
fn nested_list<T: Entity>(value: Value) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        return None;
    };

    let entities = items
        .into_iter()
        .filter(|item| item.is_object())
        .filter_map(|item| match decode_object(item, DecodePolicy::Lenient) {
            Ok(entity) => Some(entity),
            Err(e) => {
                debug!("Skipping nested {}: {}", T::NAME, e);
                None
            }
        })
        .collect();
    Some(entities)
}

fn decode_object<T: Entity>(mut value: Value, policy: DecodePolicy) -> Result<T> {
    if let Value::Object(object) = &mut value {
        resolve_aliases::<T>(object);
    }

    if policy == DecodePolicy::Strict {
        check_required::<T>(&value)?;
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("failed to decode {}: {}", T::NAME, e)))
}

fn resolve_aliases<T: Entity>(object: &mut Map<String, Value>) {
    for (alias, key) in T::ALIASES {
        let Some(value) = object.remove(*alias) else {
            continue;
        };
        if object.contains_key(*key) {
            debug!("{}: ignoring '{}' in favor of '{}'", T::NAME, alias, key);
        } else {
            object.insert(key.to_string(), value);
        }
    }
}

fn check_required<T: Entity>(value: &Value) -> Result<()> {
    for field in T::REQUIRED {
        let found = field.keys.iter().find_map(|key| value.get(*key));
        let reason = match found {
            None => "is missing".to_string(),
            Some(v) if !field.kind.matches(v) => {
                format!("expected {}, found {}", field.kind.name(), json_type(v))
            }
            Some(_) => continue,
        };
        return Err(ApiError::Decode {
            entity: T::NAME,
            field: field.keys[0],
            reason,
        });
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse an API timestamp. Anything that doesn't match yields `None`.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(s, DATE_FORMAT) {
        return Some(date.with_timezone(&Utc));
    }
    // "Z" is accepted as a zero offset.
    let naive = s.strip_suffix('Z')?;
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|date| date.and_utc())
}

/// `deserialize_with` helpers that never fail.
pub mod lenient {
    use chrono::{DateTime, Utc};

    use super::Entity;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    type Result<T, E> = std::result::Result<T, E>;

    /// A string; numbers and booleans are rendered, anything else is empty.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    /// An integer; numeric strings are parsed, anything else is zero.
    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            Value::Bool(b) => i64::from(b),
            _ => 0,
        })
    }

    /// A boolean; non-zero numbers and "true"/"yes"/"1" count as true.
    pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
            _ => false,
        })
    }

    /// Any value, falling back to its default when it doesn't decode.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// An optional value; `None` when null or of the wrong type.
    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }

    /// An optional list of entities; `None` unless the value is an array.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Entity,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::nested_list(value))
    }

    /// An optional timestamp in the API date format.
    pub fn date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().and_then(super::parse_date))
    }
}
