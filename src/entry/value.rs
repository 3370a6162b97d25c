//! Attribute values.
//!
//! Values are either human-readable text or raw bytes. The schema decides which
//! representation an attribute should carry; the validator coerces values to
//! the representation their syntax expects.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Human-readable value stored as UTF-8 text
    Text(String),
    /// Binary value stored as raw bytes
    Binary(Vec<u8>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        Self::Binary(value.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// The value's canonical string form.
    ///
    /// Text is returned as is. Bytes that happen to be valid UTF-8 are returned
    /// as text; anything else is rendered as base64.
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Binary(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => text.to_string(),
                Err(_) => STANDARD.encode(bytes),
            },
        }
    }

    /// Convert to the text representation, failing on invalid UTF-8.
    pub fn into_text(self) -> Result<Self, Vec<u8>> {
        match self {
            Self::Text(_) => Ok(self),
            Self::Binary(bytes) => String::from_utf8(bytes)
                .map(Self::Text)
                .map_err(|e| e.into_bytes()),
        }
    }

    /// Convert to the binary representation.
    pub fn into_binary(self) -> Self {
        match self {
            Self::Text(text) => Self::Binary(text.into_bytes()),
            Self::Binary(_) => self,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

// Text serializes as a JSON string; bytes as {"binary": "<base64>"}.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireValue {
    Text(String),
    Binary { binary: String },
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => WireValue::Text(text.clone()),
            Self::Binary(bytes) => WireValue::Binary {
                binary: STANDARD.encode(bytes),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireValue::deserialize(deserializer)? {
            WireValue::Text(text) => Ok(Self::Text(text)),
            WireValue::Binary { binary } => STANDARD
                .decode(binary.as_bytes())
                .map(Self::Binary)
                .map_err(serde::de::Error::custom),
        }
    }
}
