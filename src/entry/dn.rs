//! Distinguished names and relative distinguished names.
//!
//! A [`Dn`] is an ordered list of [`Rdn`]s, leftmost (most specific) first.
//! Each RDN holds one or more attribute/value assertions joined with `+`.
//! Comparison is case-insensitive on both attribute types and values, which
//! matches the case-ignore naming attributes of the stock schemas.

use crate::error::DirectoryError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A single `type=value` pair inside an RDN.
#[derive(Debug, Clone)]
pub struct Ava {
    attribute: String,
    value: String,
}

impl Ava {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// The attribute type as written by the user.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The unescaped value.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn normalized(&self) -> (String, String) {
        (
            self.attribute.trim().to_lowercase(),
            normalize_value(&self.value),
        )
    }
}

impl PartialEq for Ava {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Ava {}

impl fmt::Display for Ava {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attribute, escape_value(&self.value))
    }
}

/// A relative distinguished name: one or more AVAs.
#[derive(Debug, Clone)]
pub struct Rdn {
    avas: Vec<Ava>,
}

impl Rdn {
    /// Create a single-valued RDN.
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            avas: vec![Ava::new(attribute, value)],
        }
    }

    /// Create a multi-valued RDN from its assertions.
    pub fn from_avas(avas: Vec<Ava>) -> Result<Self, DirectoryError> {
        if avas.is_empty() {
            return Err(DirectoryError::InvalidDn {
                dn: String::new(),
                reason: "RDN must contain at least one assertion".to_string(),
            });
        }
        Ok(Self { avas })
    }

    pub fn avas(&self) -> &[Ava] {
        &self.avas
    }

    /// Attribute type of the first assertion.
    pub fn attribute(&self) -> &str {
        self.avas[0].attribute()
    }

    /// Value of the first assertion.
    pub fn value(&self) -> &str {
        self.avas[0].value()
    }

    fn normalized(&self) -> Vec<(String, String)> {
        let mut parts: Vec<_> = self.avas.iter().map(Ava::normalized).collect();
        parts.sort();
        parts
    }

    fn parse(input: &str, whole: &str) -> Result<Self, DirectoryError> {
        let mut avas = Vec::new();
        for part in split_unescaped(input, '+') {
            let (attribute, value) = split_once_unescaped(part, '=').ok_or_else(|| {
                DirectoryError::InvalidDn {
                    dn: whole.to_string(),
                    reason: format!("assertion '{}' has no '='", part.trim()),
                }
            })?;
            let attribute = attribute.trim();
            if attribute.is_empty() || !is_valid_descr_or_oid(attribute) {
                return Err(DirectoryError::InvalidDn {
                    dn: whole.to_string(),
                    reason: format!("invalid attribute type '{}'", attribute),
                });
            }
            avas.push(Ava::new(attribute, unescape_value(value.trim(), whole)?));
        }
        Rdn::from_avas(avas).map_err(|_| DirectoryError::InvalidDn {
            dn: whole.to_string(),
            reason: "empty RDN".to_string(),
        })
    }
}

impl PartialEq for Rdn {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Rdn {}

impl fmt::Display for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, ava) in self.avas.iter().enumerate() {
            if index > 0 {
                f.write_str("+")?;
            }
            write!(f, "{}", ava)?;
        }
        Ok(())
    }
}

impl FromStr for Rdn {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rdn::parse(s, s)
    }
}

/// A distinguished name.
///
/// The empty DN names the root DSE.
#[derive(Debug, Clone, Default)]
pub struct Dn {
    rdns: Vec<Rdn>,
}

impl Dn {
    /// The empty (root) DN.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a DN in its string form, e.g. `cn=John Doe,ou=people,dc=example,dc=com`.
    pub fn parse(input: &str) -> Result<Self, DirectoryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let rdns = split_unescaped(trimmed, ',')
            .into_iter()
            .map(|part| {
                if part.trim().is_empty() {
                    Err(DirectoryError::InvalidDn {
                        dn: input.to_string(),
                        reason: "empty RDN".to_string(),
                    })
                } else {
                    Rdn::parse(part, input)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rdns })
    }

    pub fn from_rdns(rdns: Vec<Rdn>) -> Self {
        Self { rdns }
    }

    pub fn is_root(&self) -> bool {
        self.rdns.is_empty()
    }

    pub fn rdns(&self) -> &[Rdn] {
        &self.rdns
    }

    /// The leftmost RDN, absent for the root DN.
    pub fn rdn(&self) -> Option<&Rdn> {
        self.rdns.first()
    }

    /// The DN of the immediate superior, absent for the root DN.
    pub fn parent(&self) -> Option<Dn> {
        if self.rdns.is_empty() {
            None
        } else {
            Some(Self {
                rdns: self.rdns[1..].to_vec(),
            })
        }
    }

    /// A child of this DN with the given RDN.
    pub fn child(&self, rdn: Rdn) -> Dn {
        let mut rdns = Vec::with_capacity(self.rdns.len() + 1);
        rdns.push(rdn);
        rdns.extend(self.rdns.iter().cloned());
        Self { rdns }
    }

    /// Number of RDNs.
    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Whether `self` is `ancestor` or lies underneath it.
    pub fn is_descendant_of(&self, ancestor: &Dn) -> bool {
        if ancestor.rdns.len() > self.rdns.len() {
            return false;
        }
        let offset = self.rdns.len() - ancestor.rdns.len();
        self.rdns[offset..] == ancestor.rdns[..]
    }

    /// Replace the `old_base` suffix of this DN with `new_base`.
    pub fn rebase(&self, old_base: &Dn, new_base: &Dn) -> Option<Dn> {
        if !self.is_descendant_of(old_base) {
            return None;
        }
        let keep = self.rdns.len() - old_base.rdns.len();
        let mut rdns = self.rdns[..keep].to_vec();
        rdns.extend(new_base.rdns.iter().cloned());
        Some(Self { rdns })
    }

    /// Case-folded string form used as a lookup key.
    pub fn normalized(&self) -> String {
        self.rdns
            .iter()
            .map(|rdn| {
                rdn.normalized()
                    .into_iter()
                    .map(|(attribute, value)| format!("{}={}", attribute, escape_value(&value)))
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl PartialEq for Dn {
    fn eq(&self, other: &Self) -> bool {
        self.rdns == other.rdns
    }
}

impl Eq for Dn {}

impl Hash for Dn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, rdn) in self.rdns.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", rdn)?;
        }
        Ok(())
    }
}

impl FromStr for Dn {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dn::parse(s)
    }
}

impl Serialize for Dn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Dn::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Lower-case and collapse inner whitespace.
pub(crate) fn normalize_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_valid_descr_or_oid(attribute: &str) -> bool {
    let mut chars = attribute.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => attribute
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ';'),
        Some(c) if c.is_ascii_digit() => attribute.chars().all(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&input[start..index]);
            start = index + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

fn split_once_unescaped(input: &str, separator: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == separator {
            return Some((&input[..index], &input[index + c.len_utf8()..]));
        }
    }
    None
}

fn unescape_value(raw: &str, whole: &str) -> Result<String, DirectoryError> {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buffer = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buffer).as_bytes());
            continue;
        }
        let next = chars.next().ok_or_else(|| DirectoryError::InvalidDn {
            dn: whole.to_string(),
            reason: "dangling escape".to_string(),
        })?;
        if next.is_ascii_hexdigit() {
            let low = chars
                .next()
                .filter(char::is_ascii_hexdigit)
                .ok_or_else(|| DirectoryError::InvalidDn {
                    dn: whole.to_string(),
                    reason: "incomplete hex escape".to_string(),
                })?;
            let pair: String = [next, low].iter().collect();
            let byte = u8::from_str_radix(&pair, 16).map_err(|_| DirectoryError::InvalidDn {
                dn: whole.to_string(),
                reason: format!("invalid hex escape '\\{}'", pair),
            })?;
            bytes.push(byte);
        } else {
            let mut buffer = [0u8; 4];
            bytes.extend_from_slice(next.encode_utf8(&mut buffer).as_bytes());
        }
    }
    String::from_utf8(bytes).map_err(|_| DirectoryError::InvalidDn {
        dn: whole.to_string(),
        reason: "escaped value is not valid UTF-8".to_string(),
    })
}

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (index, c) in value.chars().enumerate() {
        let leading = index == 0 && (c == ' ' || c == '#');
        let trailing = index == last && c == ' ';
        if matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=') || leading || trailing {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
