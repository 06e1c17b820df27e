use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::attributes::{
    Item, float_attribute, float_to_attribute, json_attribute,
    json_to_attribute, string_attribute,
};
use crate::error::StoreError;
use aws_sdk_dynamodb::types::AttributeValue;

/// Item attribute names. They match the JSON field names of the API.
pub mod attr {
    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const TIMESTAMP: &str = "timestamp";
    pub const PM25: &str = "pm25";
    pub const CO2: &str = "co2";
    pub const TEMPERATURE: &str = "temperature";
    pub const PRESSURE: &str = "pressure";
    pub const HUMIDITY: &str = "humidity";
    pub const GAS: &str = "gas";
    pub const ALTITUDE: &str = "altitude";
    pub const R0: &str = "R0";
    pub const CORRECTED_R_ZERO: &str = "correctedRZero";
    pub const RESISTANCE: &str = "resistance";
    pub const PPM: &str = "ppm";
    pub const CORRECTED_PPM: &str = "correctedPPM";
}

/// Discriminator stored in the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Structured,
    Raw,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Structured => "structured",
            ReadingKind::Raw => "raw",
        }
    }
}

impl std::fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A PM2.5 / CO2 pair submitted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StructuredReading {
    #[schema(example = "01920c4e-6f4a-7cc2-9a4e-5f1f3c1d2b10")]
    pub id: String,
    /// Stored as received. Numbers beyond the DynamoDB range are stored as
    /// NULL.
    #[schema(value_type = f64, example = 12.5)]
    pub pm25: Value,
    /// Stored exactly as received.
    #[schema(value_type = f64, example = 640)]
    pub co2: Value,
    /// Server-assigned ingestion time.
    #[schema(example = "2024-01-01T00:00:00.000Z")]
    pub timestamp: String,
}

/// An 11-field microcontroller log line. Values that failed numeric
/// coercion are NaN and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawLogReading {
    pub id: String,
    /// Client-assigned, taken verbatim from the log line.
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub timestamp: String,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub gas: f64,
    pub altitude: f64,
    #[serde(rename = "R0")]
    pub r0: f64,
    pub corrected_r_zero: f64,
    pub resistance: f64,
    pub ppm: f64,
    #[serde(rename = "correctedPPM")]
    pub corrected_ppm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reading {
    Structured(StructuredReading),
    Raw(RawLogReading),
}

/// Time-ordered UUID v7 key. Millisecond timestamps collide under
/// concurrent ingestion.
pub fn new_reading_id() -> String {
    Uuid::now_v7().to_string()
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn ingestion_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl StructuredReading {
    pub fn new(pm25: Value, co2: Value) -> Self {
        Self {
            id: new_reading_id(),
            pm25,
            co2,
            timestamp: ingestion_timestamp(),
        }
    }
}

impl Reading {
    pub fn id(&self) -> &str {
        match self {
            Reading::Structured(r) => &r.id,
            Reading::Raw(r) => &r.id,
        }
    }

    pub fn kind(&self) -> ReadingKind {
        match self {
            Reading::Structured(_) => ReadingKind::Structured,
            Reading::Raw(_) => ReadingKind::Raw,
        }
    }

    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(attr::ID.to_string(), AttributeValue::S(self.id().into()));
        item.insert(
            attr::TYPE.to_string(),
            AttributeValue::S(self.kind().as_str().to_string()),
        );

        match self {
            Reading::Structured(r) => {
                item.insert(
                    attr::TIMESTAMP.to_string(),
                    AttributeValue::S(r.timestamp.clone()),
                );
                item.insert(attr::PM25.to_string(), json_to_attribute(&r.pm25));
                item.insert(attr::CO2.to_string(), json_to_attribute(&r.co2));
            }
            Reading::Raw(r) => {
                item.insert(
                    attr::TIMESTAMP.to_string(),
                    AttributeValue::S(r.timestamp.clone()),
                );
                for (name, value) in [
                    (attr::TEMPERATURE, r.temperature),
                    (attr::PRESSURE, r.pressure),
                    (attr::HUMIDITY, r.humidity),
                    (attr::GAS, r.gas),
                    (attr::ALTITUDE, r.altitude),
                    (attr::R0, r.r0),
                    (attr::CORRECTED_R_ZERO, r.corrected_r_zero),
                    (attr::RESISTANCE, r.resistance),
                    (attr::PPM, r.ppm),
                    (attr::CORRECTED_PPM, r.corrected_ppm),
                ] {
                    item.insert(name.to_string(), float_to_attribute(value));
                }
            }
        }

        item
    }

    pub fn from_item(item: &Item) -> Result<Self, StoreError> {
        let id = string_attribute(item, attr::ID)?;
        let kind = string_attribute(item, attr::TYPE)?;

        match kind.as_str() {
            "structured" => Ok(Reading::Structured(StructuredReading {
                id,
                pm25: json_attribute(item, attr::PM25)?,
                co2: json_attribute(item, attr::CO2)?,
                timestamp: string_attribute(item, attr::TIMESTAMP)?,
            })),
            "raw" => Ok(Reading::Raw(RawLogReading {
                id,
                timestamp: string_attribute(item, attr::TIMESTAMP)?,
                temperature: float_attribute(item, attr::TEMPERATURE)?,
                pressure: float_attribute(item, attr::PRESSURE)?,
                humidity: float_attribute(item, attr::HUMIDITY)?,
                gas: float_attribute(item, attr::GAS)?,
                altitude: float_attribute(item, attr::ALTITUDE)?,
                r0: float_attribute(item, attr::R0)?,
                corrected_r_zero: float_attribute(
                    item,
                    attr::CORRECTED_R_ZERO,
                )?,
                resistance: float_attribute(item, attr::RESISTANCE)?,
                ppm: float_attribute(item, attr::PPM)?,
                corrected_ppm: float_attribute(item, attr::CORRECTED_PPM)?,
            })),
            other => Err(StoreError::Decode(format!(
                "unknown reading type {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw_reading() -> RawLogReading {
        RawLogReading {
            id: "raw-1".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            temperature: 21.5,
            pressure: 1013.2,
            humidity: 45.0,
            gas: 400.0,
            altitude: 100.0,
            r0: 1000.0,
            corrected_r_zero: 950.0,
            resistance: 1100.0,
            ppm: 50.0,
            corrected_ppm: 48.0,
        }
    }

    #[test]
    fn test_structured_reading_serializes_with_type_tag() {
        let reading = Reading::Structured(StructuredReading {
            id: "s-1".to_string(),
            pm25: json!(0),
            co2: json!(null),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&reading).unwrap(),
            json!({
                "type": "structured",
                "id": "s-1",
                "pm25": 0,
                "co2": null,
                "timestamp": "2024-01-01T00:00:00.000Z",
            })
        );
    }

    #[test]
    fn test_raw_reading_uses_json_field_names() {
        let value = serde_json::to_value(Reading::Raw(raw_reading())).unwrap();
        assert_eq!(value["type"], "raw");
        assert_eq!(value["R0"], 1000.0);
        assert_eq!(value["correctedRZero"], 950.0);
        assert_eq!(value["correctedPPM"], 48.0);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let mut raw = raw_reading();
        raw.gas = f64::NAN;
        let value = serde_json::to_value(Reading::Raw(raw)).unwrap();
        assert!(value["gas"].is_null());
    }

    #[test]
    fn test_item_round_trip_for_both_variants() {
        let structured = Reading::Structured(StructuredReading::new(
            json!(12.5),
            json!(640),
        ));
        assert_eq!(
            Reading::from_item(&structured.to_item()).unwrap(),
            structured
        );

        let raw = Reading::Raw(raw_reading());
        let item = raw.to_item();
        assert_eq!(item.get(attr::TYPE), Some(&AttributeValue::S("raw".into())));
        assert_eq!(Reading::from_item(&item).unwrap(), raw);
    }

    #[test]
    fn test_from_item_rejects_unknown_type() {
        let mut item = Reading::Raw(raw_reading()).to_item();
        item.insert(attr::TYPE.to_string(), AttributeValue::S("other".into()));
        assert!(matches!(
            Reading::from_item(&item),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn test_ids_are_unique_and_timestamps_iso() {
        let a = StructuredReading::new(json!(1), json!(2));
        let b = StructuredReading::new(json!(1), json!(2));
        assert_ne!(a.id, b.id);
        assert!(a.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&a.timestamp).is_ok());
    }
}
