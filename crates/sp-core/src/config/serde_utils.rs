//! Shared serialization/deserialization utilities for configuration
//!
//! Server files are hand-written JSON, so optional fields accept more than
//! one spelling of the same value. A value of the wrong shape reads as
//! absent (with a warning) instead of failing the whole file.

use serde_json::Value;

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Helper module for optional ports written either as a number or a string
///
/// `22`, `"22"` and `" 22 "` all read as `Some(22)`; `null`, a missing key
/// and `""` read as `None`. Anything else, including numbers above 65535,
/// is ignored and reads as `None`.
///
/// # Example
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Host {
///     #[serde(default, with = "sp_core::config::serde_utils::lenient_port")]
///     port: Option<u16>,
/// }
/// ```
pub mod lenient_port {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    /// Serialize a port as a plain number
    pub fn serialize<S>(port: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match port {
            Some(p) => serializer.serialize_u16(*p),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize a port from a number or numeric string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let port = match &value {
            Value::Null => return Ok(None),
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<u16>().ok(),
            _ => None,
        };
        if port.is_none() {
            tracing::warn!("Ignoring invalid port: {}", value);
        }
        Ok(port)
    }
}

/// Helper module for optional flags read with loose truthiness
///
/// Booleans read as themselves. Numbers are true unless zero, strings
/// unless empty, and arrays and objects are always true. `null` and a
/// missing key read as `None`.
pub mod lenient_bool {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(flag: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match flag {
            Some(b) => serializer.serialize_bool(*b),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::Bool(b) => Some(b),
            Value::Number(n) => Some(n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan())),
            Value::String(s) => Some(!s.is_empty()),
            Value::Array(_) | Value::Object(_) => Some(true),
        })
    }
}

/// Helper module for optional text fields
///
/// Numbers and booleans are kept in their written form. Arrays and objects
/// read as `None`.
pub mod lenient_string {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(text: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match text {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                tracing::warn!("Ignoring {} where text was expected", super::describe(&other));
                None
            }
        })
    }
}

/// Helper module for optional command lists
///
/// A single string reads as a one-element list. Inside an array, entries
/// that are not strings are dropped.
pub mod lenient_string_list {
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(list: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(s) => Some(vec![s]),
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        other => {
                            tracing::warn!("Dropping {} from command list", super::describe(&other));
                            None
                        }
                    })
                    .collect(),
            ),
            other => {
                tracing::warn!("Ignoring {} where a command list was expected", super::describe(&other));
                None
            }
        })
    }
}

/// Helper module for optional nested tables
///
/// A value that does not deserialize as `T` reads as `None`.
pub mod lenient_nested {
    use serde::de::DeserializeOwned;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => match serde_json::from_value(value) {
                Ok(parsed) => Ok(Some(parsed)),
                Err(e) => {
                    tracing::warn!("Ignoring malformed nested value: {}", e);
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestHost {
        #[serde(default, with = "lenient_port")]
        port: Option<u16>,
        #[serde(default, with = "lenient_bool")]
        agent: Option<bool>,
        #[serde(default, with = "lenient_string")]
        host: Option<String>,
        #[serde(default, with = "lenient_string_list")]
        commands: Option<Vec<String>>,
    }

    fn parse(json: &str) -> TestHost {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_port_from_number() {
        assert_eq!(parse(r#"{"port":2222}"#).port, Some(2222));
    }

    #[test]
    fn test_port_from_string() {
        assert_eq!(parse(r#"{"port":" 2222 "}"#).port, Some(2222));
    }

    #[test]
    fn test_port_missing_or_empty() {
        assert_eq!(parse(r#"{}"#).port, None);
        assert_eq!(parse(r#"{"port":""}"#).port, None);
        assert_eq!(parse(r#"{"port":null}"#).port, None);
    }

    #[test]
    fn test_invalid_port_reads_as_none() {
        assert_eq!(parse(r#"{"port":70000}"#).port, None);
        assert_eq!(parse(r#"{"port":"ssh"}"#).port, None);
        assert_eq!(parse(r#"{"port":[22]}"#).port, None);
    }

    #[test]
    fn test_port_serializes_as_number() {
        let host = TestHost {
            port: Some(22),
            agent: None,
            host: None,
            commands: None,
        };
        let json = serde_json::to_string(&host).unwrap();
        assert!(json.contains(r#""port":22"#));
    }

    #[test]
    fn test_bool_truthiness() {
        assert_eq!(parse(r#"{"agent":true}"#).agent, Some(true));
        assert_eq!(parse(r#"{"agent":1}"#).agent, Some(true));
        assert_eq!(parse(r#"{"agent":0}"#).agent, Some(false));
        assert_eq!(parse(r#"{"agent":"yes"}"#).agent, Some(true));
        assert_eq!(parse(r#"{"agent":""}"#).agent, Some(false));
        assert_eq!(parse(r#"{"agent":{}}"#).agent, Some(true));
        assert_eq!(parse(r#"{"agent":null}"#).agent, None);
    }

    #[test]
    fn test_string_accepts_scalars() {
        assert_eq!(parse(r#"{"host":"h"}"#).host.as_deref(), Some("h"));
        assert_eq!(parse(r#"{"host":10}"#).host.as_deref(), Some("10"));
        assert_eq!(parse(r#"{"host":["h"]}"#).host, None);
    }

    #[test]
    fn test_string_list_shapes() {
        assert_eq!(parse(r#"{"commands":"ls"}"#).commands, Some(vec!["ls".to_string()]));
        assert_eq!(
            parse(r#"{"commands":["ls", 3, "pwd"]}"#).commands,
            Some(vec!["ls".to_string(), "pwd".to_string()])
        );
        assert_eq!(parse(r#"{"commands":{"a":"b"}}"#).commands, None);
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Knock {
        port: u16,
    }

    #[derive(Debug, Deserialize)]
    struct WithNested {
        #[serde(default, with = "lenient_nested")]
        knock: Option<Knock>,
    }

    #[test]
    fn test_nested_of_wrong_shape_is_none() {
        let ok: WithNested = serde_json::from_str(r#"{"knock":{"port":7000}}"#).unwrap();
        assert_eq!(ok.knock, Some(Knock { port: 7000 }));

        let bad: WithNested = serde_json::from_str(r#"{"knock":true}"#).unwrap();
        assert_eq!(bad.knock, None);
    }
}
