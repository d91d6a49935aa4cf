//! Inbound events as they arrive on the feed.
//!
//! Every field is optional and kept as raw JSON so that a frame with an
//! unexpected field type still decodes; only the display routine decides how
//! a value is shown.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DecodeError;

#[derive(Debug, Default, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub event_type: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub transaction_signature: Option<Value>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub token: Option<TokenDescriptor>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub pump_data: Option<PumpData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenDescriptor {
    #[serde(default)]
    pub mint_address: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub symbol: Option<Value>,
    #[serde(default)]
    pub creator: Option<Value>,
    #[serde(default)]
    pub supply: Option<Value>,
    #[serde(default)]
    pub decimals: Option<Value>,
}

/// Bonding curve state attached to pump.fun events.
#[derive(Debug, Default, Deserialize)]
pub struct PumpData {
    #[serde(default)]
    pub bonding_curve: Option<Value>,
    #[serde(default)]
    pub virtual_sol_reserves: Option<Value>,
    #[serde(default)]
    pub virtual_token_reserves: Option<Value>,
}

impl InboundEvent {
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(payload)?;
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn decode_bytes(payload: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(std::str::from_utf8(payload)?)
    }
}

// Nested sections only count when they are non-empty objects; anything else
// (null, a string, `{}`) means the section is absent.
fn object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) if !map.is_empty() => serde_json::from_value(Value::Object(map))
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
