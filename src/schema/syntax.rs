//! Syntax checkers for attribute values.
//!
//! Each [`SyntaxChecker`] is a predicate over one value. Text syntaxes check the
//! value's canonical string form; binary syntaxes look at the raw bytes.

use crate::entry::{Dn, Value};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Oid of the Octet String syntax, which accepts any value.
pub const OCTET_STRING_SYNTAX: &str = "1.3.6.1.4.1.1466.115.121.1.40";
/// Oid of the Integer syntax.
pub const INTEGER_SYNTAX: &str = "1.3.6.1.4.1.1466.115.121.1.27";

/// Value predicates for the syntaxes known to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyntaxChecker {
    DirectoryString,
    Ia5String,
    PrintableString,
    NumericString,
    Integer,
    Boolean,
    GeneralizedTime,
    Oid,
    DistinguishedName,
    TelephoneNumber,
    CountryString,
    PostalAddress,
    Uuid,
    OctetString,
    Jpeg,
    Binary,
}

impl SyntaxChecker {
    /// Check a single value.
    pub fn is_valid(&self, value: &Value) -> bool {
        match self {
            Self::OctetString | Self::Binary => true,
            Self::Jpeg => is_jpeg(value.as_bytes()),
            text_syntax => text_syntax.is_valid_str(&value.canonical_string()),
        }
    }

    /// Check the textual form of a value.
    pub fn is_valid_str(&self, value: &str) -> bool {
        match self {
            Self::DirectoryString => !value.is_empty(),
            Self::Ia5String => value.is_ascii(),
            Self::PrintableString => !value.is_empty() && value.chars().all(is_printable),
            Self::NumericString => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == ' ')
            }
            Self::Integer => is_integer(value),
            Self::Boolean => value == "TRUE" || value == "FALSE",
            Self::GeneralizedTime => is_generalized_time(value),
            Self::Oid => is_oid(value),
            Self::DistinguishedName => Dn::parse(value).is_ok(),
            Self::TelephoneNumber => {
                !value.trim().is_empty() && value.chars().all(|c| is_printable(c) || c == '#')
            }
            Self::CountryString => value.len() == 2 && value.chars().all(is_printable),
            Self::PostalAddress => {
                !value.is_empty() && value.split('$').all(|line| !line.trim().is_empty())
            }
            Self::Uuid => uuid::Uuid::parse_str(value).is_ok(),
            Self::OctetString | Self::Binary => true,
            Self::Jpeg => is_jpeg(value.as_bytes()),
        }
    }
}

fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric() || " '()+,-./:?=".contains(c)
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return false;
    }
    // "-0" is not a valid integer
    !(value.starts_with('-') && digits == "0")
}

fn is_oid(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => value
            .split('.')
            .all(|arc| !arc.is_empty() && arc.chars().all(|c| c.is_ascii_digit())),
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '-'),
        _ => false,
    }
}

/// `YYYYMMDDHH[MM[SS]][(.|,)fraction](Z|(+|-)HHMM)`
fn is_generalized_time(value: &str) -> bool {
    let base = if let Some(stripped) = value.strip_suffix('Z') {
        stripped
    } else if value.len() > 5 && matches!(value.as_bytes()[value.len() - 5], b'+' | b'-') {
        let offset = &value[value.len() - 4..];
        if !offset.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let hours: u32 = offset[..2].parse().unwrap_or(99);
        let minutes: u32 = offset[2..].parse().unwrap_or(99);
        if hours > 23 || minutes > 59 {
            return false;
        }
        &value[..value.len() - 5]
    } else {
        return false;
    };

    let base = base.replace(',', ".");
    let (whole, fraction) = match base.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (base.as_str(), None),
    };
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }

    let padded = match whole.len() {
        10 => format!("{whole}0000"),
        12 => format!("{whole}00"),
        14 => whole.to_string(),
        _ => return false,
    };
    NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M%S").is_ok()
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xFF, 0xD8, 0xFF])
}
