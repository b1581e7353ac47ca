use crate::error::NormalizeError;
use serde::de::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Placeholder shown for any configuration value that is missing or falsy.
pub const NOT_AVAILABLE: &str = "N/A";

/// Radio settings embedded in a station record as a JSON string.
///
/// Values are kept as raw JSON scalars since the remote service does not type them.
/// Keys not listed here are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModemConfig {
    pub mode: Option<Value>,
    pub freq: Option<Value>,
    #[serde(rename = "NORAD")]
    pub norad: Option<Value>,
    pub pwr: Option<Value>,
    pub gain: Option<Value>,
    pub crc: Option<Value>,
}

impl ModemConfig {
    /// Decodes the `modem_conf` text of a station record.
    ///
    /// Text that is not JSON, or is JSON `null`, is malformed. Any other document that
    /// is not an object carries none of the known keys and decodes as an empty config.
    pub fn decode(text: &str) -> Result<Self, NormalizeError> {
        let document: Value =
            serde_json::from_str(text).map_err(NormalizeError::MalformedConfiguration)?;
        match document {
            Value::Null => Err(NormalizeError::MalformedConfiguration(
                serde_json::Error::custom("modem configuration is null"),
            )),
            Value::Object(_) => {
                serde_json::from_value(document).map_err(NormalizeError::MalformedConfiguration)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// JavaScript truthiness, which is the rule the station endpoint's consumers expect.
///
/// `0`, `""`, `false` and `null` are all falsy, so a configured frequency of `0`
/// is reported the same as a missing one.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A display-ready configuration value: either the decoded scalar as-is, or the placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Present(Value),
    NotAvailable,
}

impl ConfigValue {
    pub fn resolve(value: Option<Value>) -> Self {
        match value {
            Some(v) if is_truthy(&v) => ConfigValue::Present(v),
            _ => ConfigValue::NotAvailable,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ConfigValue::Present(v) => Some(v),
            ConfigValue::NotAvailable => None,
        }
    }
}

impl Display for ConfigValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Present(Value::String(s)) => write!(f, "{s}"),
            ConfigValue::Present(v) => write!(f, "{v}"),
            ConfigValue::NotAvailable => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Present(v) => v.serialize(serializer),
            ConfigValue::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_keeps_known_keys_and_ignores_others() {
        let config =
            ModemConfig::decode(r#"{"mode":"LoRa","freq":436.7,"NORAD":33591,"sf":10,"crc":true}"#)
                .unwrap();
        assert_eq!(config.mode, Some(json!("LoRa")));
        assert_eq!(config.freq, Some(json!(436.7)));
        assert_eq!(config.norad, Some(json!(33591)));
        assert_eq!(config.pwr, None);
        assert_eq!(config.crc, Some(json!(true)));
    }

    #[test]
    fn decode_accepts_empty_object() {
        assert_eq!(ModemConfig::decode("{}").unwrap(), ModemConfig::default());
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = ModemConfig::decode("{bad json").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedConfiguration(_)));
    }

    #[test]
    fn decode_rejects_empty_and_null_documents() {
        assert!(ModemConfig::decode("").is_err());
        assert!(matches!(
            ModemConfig::decode("null").unwrap_err(),
            NormalizeError::MalformedConfiguration(_)
        ));
    }

    #[test]
    fn non_object_documents_decode_as_empty() {
        for text in ["5", "[1, 2]", "[1, 2, 3, 4, 5, 6]", "\"LoRa\"", "true"] {
            assert_eq!(
                ModemConfig::decode(text).unwrap(),
                ModemConfig::default(),
                "{text} should decode to an empty config"
            );
        }
    }

    #[test]
    fn truthiness_follows_javascript() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-3), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn config_value_display_and_serialize() {
        let mode = ConfigValue::resolve(Some(json!("FSK")));
        let freq = ConfigValue::resolve(Some(json!(0)));
        let pwr = ConfigValue::resolve(Some(json!(20)));

        assert_eq!(mode.to_string(), "FSK");
        assert_eq!(freq, ConfigValue::NotAvailable);
        assert_eq!(freq.to_string(), "N/A");
        assert_eq!(pwr.to_string(), "20");
        assert_eq!(pwr.as_value(), Some(&json!(20)));
        assert_eq!(serde_json::to_value(&freq).unwrap(), json!("N/A"));
        assert_eq!(serde_json::to_value(&pwr).unwrap(), json!(20));
    }
}
