//! Attribute kind resolution
//!
//! Primitive tags are checked first against a closed set; anything else is a
//! reference whose cardinality comes from the relationship connecting the
//! owner to the referenced entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bundle::MemberKind;
use crate::mson::{Attribute, Multiplicity, MsonModel};

/// Closed set of value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Datetime,
    Object,
    Array,
    Any,
    Void,
}

impl PrimitiveType {
    /// Normalized name emitted in models
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primitive = match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" | "str" | "char" => Self::String,
            "number" | "float" | "double" | "decimal" => Self::Number,
            "integer" | "int" | "long" => Self::Integer,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "datetime" | "timestamp" => Self::Datetime,
            "object" | "json" | "map" => Self::Object,
            "array" | "list" => Self::Array,
            "any" => Self::Any,
            "void" => Self::Void,
            _ => return Err(()),
        };
        Ok(primitive)
    }
}

/// How an attribute resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Property(PrimitiveType),
    /// Single-valued reference to the named entity
    Link(String),
    /// Multi-valued reference to the named entity
    Collection(String),
}

impl AttributeKind {
    pub fn member_kind(&self) -> MemberKind {
        match self {
            Self::Property(_) => MemberKind::Property,
            Self::Link(_) => MemberKind::Link,
            Self::Collection(_) => MemberKind::Collection,
        }
    }
}

/// Classify an attribute of the entity `owner_id`
pub fn resolve_attribute(model: &MsonModel, owner_id: &str, attribute: &Attribute) -> AttributeKind {
    if let Ok(primitive) = attribute.type_name.parse::<PrimitiveType>() {
        return AttributeKind::Property(primitive);
    }

    let target_name = attribute.type_name.trim().to_string();
    let many = reference_multiplicity(model, owner_id, &target_name)
        .map(|m| m.is_many())
        .unwrap_or(false);

    if many {
        AttributeKind::Collection(target_name)
    } else {
        AttributeKind::Link(target_name)
    }
}

/// Multiplicity seen from `owner_id` looking at the entity named `target_name`
///
/// Forward edges (owner -> target) contribute their target side; backward
/// edges (target -> owner) contribute their source side. Forward edges win.
fn reference_multiplicity(model: &MsonModel, owner_id: &str, target_name: &str) -> Option<Multiplicity> {
    let target_ids: Vec<&str> = model
        .entities
        .iter()
        .filter(|e| e.name == target_name)
        .map(|e| e.id.as_str())
        .collect();

    let structural = || model.relationships.iter().filter(|r| r.kind.is_structural());

    let forward = structural()
        .find(|r| r.source_id == owner_id && target_ids.contains(&r.target_id.as_str()))
        .map(|r| r.target_multiplicity());
    if let Some(found) = forward {
        return found;
    }

    structural()
        .find(|r| r.target_id == owner_id && target_ids.contains(&r.source_id.as_str()))
        .and_then(|r| r.source_multiplicity())
}
