//! Runtime component bundle
//!
//! A bundle carries three parallel dictionaries keyed by entity name:
//! - `schemas`: member name -> structural kind, plus the `_inherit` list
//! - `models`: member name -> type expression
//! - `components`: one placeholder per instantiable entity
//!
//! `types` and `behaviors` are reserved and always emitted empty by the
//! transformer. All dictionaries are ordered maps so the text encoding is
//! deterministic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::checksum::Checksum;
use crate::error::Result;

/// Base capability every schema inherits from
pub const ROOT_MARKER: &str = "_Component";

/// Key carrying a method's return type inside its signature object
pub const RETURN_KEY: &str = "=>";

/// Metadata keys shared by schema and model entries
pub const ID_KEY: &str = "_id";
pub const NAME_KEY: &str = "_name";
pub const INHERIT_KEY: &str = "_inherit";

/// Structural kind of a schema member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    Method,
    Link,
    Collection,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Method => "method",
            Self::Link => "link",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type expression of a model member
///
/// Serialized untagged: a scalar is a bare type name, a collection is a
/// one-element array template, a method is a parameter map with the
/// [`RETURN_KEY`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Scalar(String),
    Collection(Vec<String>),
    Signature(BTreeMap<String, String>),
}

impl TypeExpr {
    pub fn collection_of(type_name: impl Into<String>) -> Self {
        Self::Collection(vec![type_name.into()])
    }
}

/// Structural description of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(rename = "_inherit", default)]
    pub inherit: Vec<String>,
    #[serde(flatten)]
    pub members: BTreeMap<String, MemberKind>,
}

/// Type signatures of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(flatten)]
    pub members: BTreeMap<String, TypeExpr>,
}

/// Instantiability marker, serialized as `{}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    /// Always true: nested sub-bundles are not supported
    pub master: bool,
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaEntry>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentEntry>,
    #[serde(default)]
    pub types: BTreeMap<String, Value>,
    #[serde(default)]
    pub behaviors: BTreeMap<String, Value>,
}

impl Bundle {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaEntry> {
        self.schemas.get(name)
    }

    pub fn model(&self, name: &str) -> Option<&ModelEntry> {
        self.models.get(name)
    }

    /// Checksum over the bundle with every internal identifier removed
    ///
    /// Two transforms of the same input yield the same structural checksum.
    pub fn structural_checksum(&self) -> Result<Checksum> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(root) = &mut value {
            root.remove(ID_KEY);
            for section in ["schemas", "models", "types", "behaviors"] {
                if let Some(Value::Object(entries)) = root.get_mut(section) {
                    for entry in entries.values_mut() {
                        if let Value::Object(fields) = entry {
                            fields.remove(ID_KEY);
                        }
                    }
                }
            }
        }
        Ok(Checksum::from_json(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Bundle {
        let mut schema_members = BTreeMap::new();
        schema_members.insert("name".to_string(), MemberKind::Property);
        schema_members.insert("friends".to_string(), MemberKind::Collection);
        schema_members.insert("greet".to_string(), MemberKind::Method);

        let mut signature = BTreeMap::new();
        signature.insert("other".to_string(), "Person".to_string());
        signature.insert(RETURN_KEY.to_string(), "string".to_string());

        let mut model_members = BTreeMap::new();
        model_members.insert("name".to_string(), TypeExpr::Scalar("string".to_string()));
        model_members.insert("friends".to_string(), TypeExpr::collection_of("Person"));
        model_members.insert("greet".to_string(), TypeExpr::Signature(signature));

        Bundle {
            id: "b1".to_string(),
            name: "People".to_string(),
            description: String::new(),
            version: "0.0.1".to_string(),
            master: true,
            schemas: BTreeMap::from([(
                "Person".to_string(),
                SchemaEntry {
                    id: "s1".to_string(),
                    name: "Person".to_string(),
                    inherit: vec![ROOT_MARKER.to_string()],
                    members: schema_members,
                },
            )]),
            models: BTreeMap::from([(
                "Person".to_string(),
                ModelEntry {
                    id: "m1".to_string(),
                    name: "Person".to_string(),
                    members: model_members,
                },
            )]),
            components: BTreeMap::from([("Person".to_string(), ComponentEntry::default())]),
            types: BTreeMap::new(),
            behaviors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["master"], json!(true));
        assert_eq!(value["schemas"]["Person"]["_inherit"], json!(["_Component"]));
        assert_eq!(value["schemas"]["Person"]["friends"], json!("collection"));
        assert_eq!(value["models"]["Person"]["friends"], json!(["Person"]));
        assert_eq!(
            value["models"]["Person"]["greet"],
            json!({ "=>": "string", "other": "Person" })
        );
        assert_eq!(value["components"]["Person"], json!({}));
        assert_eq!(value["types"], json!({}));
        assert_eq!(value["behaviors"], json!({}));
    }

    #[test]
    fn test_json_roundtrip_preserves_members() {
        let bundle = sample();
        let decoded = Bundle::from_json(&bundle.to_json_pretty().unwrap()).unwrap();
        assert_eq!(decoded, bundle);
    }

    #[test]
    fn test_structural_checksum_ignores_ids() {
        let a = sample();
        let mut b = sample();
        b.id = "other".to_string();
        b.schemas.get_mut("Person").unwrap().id = "s9".to_string();
        b.models.get_mut("Person").unwrap().id = "m9".to_string();
        assert_eq!(a.structural_checksum().unwrap(), b.structural_checksum().unwrap());

        b.version = "1.0.0".to_string();
        assert_ne!(a.structural_checksum().unwrap(), b.structural_checksum().unwrap());
    }
}
