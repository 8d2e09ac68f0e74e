//! Snak data values.
//!
//! Only the value kinds this pipeline writes (strings, item references, and
//! year-precision times) get typed representations. Everything else that can
//! appear on a loaded item (quantities, coordinates, monolingual text, ...)
//! is carried verbatim so reserialization does not disturb it.

use crate::ids::ItemId;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wikibase precision code for "year".
pub const PRECISION_YEAR: u8 = 9;
/// Concept URI of the proleptic Gregorian calendar model.
pub const CALENDAR_GREGORIAN: &str = "http://www.wikidata.org/entity/Q1985727";

/// A `time` datavalue payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub time: String,
    pub timezone: i32,
    pub before: u32,
    pub after: u32,
    pub precision: u8,
    pub calendarmodel: String,
}

impl TimeValue {
    /// Year-precision Gregorian timestamp, `+1862-00-00T00:00:00Z` style.
    pub fn year(year: &str) -> Self {
        Self {
            time: format!("+{year}-00-00T00:00:00Z"),
            timezone: 0,
            before: 0,
            after: 0,
            precision: PRECISION_YEAR,
            calendarmodel: CALENDAR_GREGORIAN.to_string(),
        }
    }
}

/// Value carried by a [`crate::statement::Snak`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    String(String),
    Entity(ItemId),
    Time(TimeValue),
    /// Any datavalue shape this pipeline does not construct, kept verbatim.
    Other(Value),
}

impl DataValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&ItemId> {
        match self {
            Self::Entity(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&TimeValue> {
        match self {
            Self::Time(t) => Some(t),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::String(s) => json!({ "value": s, "type": "string" }),
            Self::Entity(id) => json!({
                "value": {
                    "entity-type": "item",
                    "numeric-id": id.numeric(),
                    "id": id.as_str(),
                },
                "type": "wikibase-entityid",
            }),
            Self::Time(t) => json!({ "value": t, "type": "time" }),
            Self::Other(raw) => raw.clone(),
        }
    }

    /// Recognizes the shapes this pipeline writes; anything else becomes
    /// [`DataValue::Other`]. Never fails.
    fn from_json(raw: Value) -> Self {
        match raw.get("type").and_then(Value::as_str) {
            Some("string") => {
                if let Some(s) = raw.get("value").and_then(Value::as_str) {
                    return Self::String(s.to_string());
                }
            }
            Some("wikibase-entityid") => {
                if let Some(id) = parse_item_value(raw.get("value")) {
                    return Self::Entity(id);
                }
            }
            Some("time") => {
                if let Some(value) = raw.get("value") {
                    if let Ok(t) = serde_json::from_value::<TimeValue>(value.clone()) {
                        return Self::Time(t);
                    }
                }
            }
            _ => {}
        }
        Self::Other(raw)
    }
}

fn parse_item_value(value: Option<&Value>) -> Option<ItemId> {
    let value = value?;
    if value.get("entity-type").and_then(Value::as_str) != Some("item") {
        return None;
    }
    if let Some(serial) = value.get("id").and_then(Value::as_str) {
        return ItemId::new(serial).ok();
    }
    // Older serializations carry only the numeric form.
    value
        .get("numeric-id")
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .map(ItemId::from_numeric)
}

impl Serialize for DataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_json(raw))
    }
}
