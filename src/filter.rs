//! Search filter expression tree.
//!
//! Only the shape of a filter is modelled here. Leaf nodes carry an attribute
//! id and assertion value(s); branch nodes combine children. The schema stage
//! walks the leaves to coerce assertion values to the representation of their
//! attribute's syntax; the backend decides how to evaluate them.

use crate::entry::Value;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

/// An attribute value assertion used by comparison filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub attribute: String,
    pub value: Value,
}

impl Assertion {
    pub fn new(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A search filter node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    Equality(Assertion),
    GreaterOrEqual(Assertion),
    LessOrEqual(Assertion),
    Approximate(Assertion),
    /// Extensible match; the attribute may be omitted when a rule is given
    Extensible {
        attribute: Option<String>,
        matching_rule: Option<String>,
        value: Value,
        dn_attributes: bool,
    },
    Substring {
        attribute: String,
        initial: Option<Value>,
        any: Vec<Value>,
        #[serde(rename = "final")]
        final_: Option<Value>,
    },
    Presence {
        attribute: String,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn equality(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equality(Assertion::new(attribute, value))
    }

    pub fn presence(attribute: impl Into<String>) -> Self {
        Self::Presence {
            attribute: attribute.into(),
        }
    }

    pub fn substring(
        attribute: impl Into<String>,
        initial: Option<&str>,
        any: &[&str],
        final_: Option<&str>,
    ) -> Self {
        Self::Substring {
            attribute: attribute.into(),
            initial: initial.map(Value::from),
            any: any.iter().map(|part| Value::from(*part)).collect(),
            final_: final_.map(Value::from),
        }
    }

    pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Filter) -> Self {
        Self::Not(Box::new(child))
    }

    /// The filter matching every entry, `(objectClass=*)`.
    pub fn any_entry() -> Self {
        Self::presence(crate::entry::OBJECT_CLASS)
    }

    /// Attribute id of a leaf node.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Equality(a) | Self::GreaterOrEqual(a) | Self::LessOrEqual(a) | Self::Approximate(a) => {
                Some(&a.attribute)
            }
            Self::Extensible { attribute, .. } => attribute.as_deref(),
            Self::Substring { attribute, .. } | Self::Presence { attribute } => Some(attribute),
            Self::And(_) | Self::Or(_) | Self::Not(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::And(_) | Self::Or(_) | Self::Not(_))
    }

    /// Visit every assertion value together with its attribute id.
    ///
    /// Presence nodes carry no value and extensible nodes without an attribute
    /// are skipped.
    pub fn try_for_each_value_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&str, &mut Value) -> Result<(), E>,
    {
        match self {
            Self::Equality(a) | Self::GreaterOrEqual(a) | Self::LessOrEqual(a) | Self::Approximate(a) => {
                f(a.attribute.as_str(), &mut a.value)
            }
            Self::Extensible {
                attribute: Some(attribute),
                value,
                ..
            } => f(attribute.as_str(), value),
            Self::Extensible { attribute: None, .. } | Self::Presence { .. } => Ok(()),
            Self::Substring {
                attribute,
                initial,
                any,
                final_,
            } => {
                for value in initial.iter_mut().chain(any.iter_mut()).chain(final_.iter_mut()) {
                    f(attribute.as_str(), value)?;
                }
                Ok(())
            }
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.try_for_each_value_mut(f)?;
                }
                Ok(())
            }
            Self::Not(child) => child.try_for_each_value_mut(f),
        }
    }

    /// Infallible form of [`Filter::try_for_each_value_mut`].
    pub fn for_each_value_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut Value),
    {
        let visited: Result<(), Infallible> = self.try_for_each_value_mut(&mut |attribute, value| {
            f(attribute, value);
            Ok(())
        });
        match visited {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Text(text) => {
            for c in text.chars() {
                match c {
                    '*' | '(' | ')' | '\\' | '\0' => write!(f, "\\{:02x}", c as u32)?,
                    _ => write!(f, "{}", c)?,
                }
            }
            Ok(())
        }
        Value::Binary(bytes) => {
            for byte in bytes {
                write!(f, "\\{:02x}", byte)?;
            }
            Ok(())
        }
    }
}

fn write_comparison(f: &mut fmt::Formatter<'_>, assertion: &Assertion, op: &str) -> fmt::Result {
    write!(f, "({}{}", assertion.attribute, op)?;
    write_value(f, &assertion.value)?;
    f.write_str(")")
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equality(a) => write_comparison(f, a, "="),
            Self::GreaterOrEqual(a) => write_comparison(f, a, ">="),
            Self::LessOrEqual(a) => write_comparison(f, a, "<="),
            Self::Approximate(a) => write_comparison(f, a, "~="),
            Self::Extensible {
                attribute,
                matching_rule,
                value,
                dn_attributes,
            } => {
                f.write_str("(")?;
                if let Some(attribute) = attribute {
                    f.write_str(attribute)?;
                }
                if *dn_attributes {
                    f.write_str(":dn")?;
                }
                if let Some(rule) = matching_rule {
                    write!(f, ":{}", rule)?;
                }
                f.write_str(":=")?;
                write_value(f, value)?;
                f.write_str(")")
            }
            Self::Substring {
                attribute,
                initial,
                any,
                final_,
            } => {
                write!(f, "({}=", attribute)?;
                if let Some(initial) = initial {
                    write_value(f, initial)?;
                }
                f.write_str("*")?;
                for part in any {
                    write_value(f, part)?;
                    f.write_str("*")?;
                }
                if let Some(final_) = final_ {
                    write_value(f, final_)?;
                }
                f.write_str(")")
            }
            Self::Presence { attribute } => write!(f, "({}=*)", attribute),
            Self::And(children) => {
                f.write_str("(&")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            Self::Or(children) => {
                f.write_str("(|")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            Self::Not(child) => write!(f, "(!{})", child),
        }
    }
}
