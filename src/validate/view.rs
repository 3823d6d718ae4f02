//! Lenient read-only view of a bundle
//!
//! Typed bundles and raw JSON both reduce to the same view so the checks see
//! identical data whichever form was supplied. Shape problems in raw JSON are
//! recorded as findings instead of failing.

use serde_json::{Map, Value};

use crate::bundle::{Bundle, ID_KEY, INHERIT_KEY, NAME_KEY};

use super::diagnostics::{Finding, FindingCode};

/// Sections whose entries carry internal identifiers
pub const IDENTIFIED_SECTIONS: [&str; 4] = ["schemas", "models", "types", "behaviors"];

/// JSON type of a scalar identifier; `7` and `"7"` are different identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdKind {
    String,
    Number,
    Boolean,
}

impl IdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// An entry carrying an internal identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifiedEntry {
    pub section: &'static str,
    pub key: String,
    pub id: String,
    pub id_kind: IdKind,
}

impl IdentifiedEntry {
    fn string(section: &'static str, key: &str, id: &str) -> Self {
        Self {
            section,
            key: key.to_string(),
            id: id.to_string(),
            id_kind: IdKind::String,
        }
    }

    /// Read the `_id` of an untyped entry; anything but a scalar is a shape finding
    pub fn read(section: &'static str, key: &str, fields: &Map<String, Value>) -> Result<Self, Finding> {
        let (id, id_kind) = match fields.get(ID_KEY) {
            Some(Value::String(id)) => (id.clone(), IdKind::String),
            Some(Value::Number(id)) => (id.to_string(), IdKind::Number),
            Some(Value::Bool(id)) => (id.to_string(), IdKind::Boolean),
            Some(Value::Null) | None => {
                return Err(Finding::new(
                    FindingCode::MalformedSection,
                    format!("Entry '{}.{}' has no identifier", section, key),
                )
                .about(key.to_string()))
            }
            Some(_) => {
                return Err(Finding::new(
                    FindingCode::MalformedSection,
                    format!("Entry '{}.{}' has an identifier that is not a scalar", section, key),
                )
                .about(key.to_string()))
            }
        };
        Ok(Self {
            section,
            key: key.to_string(),
            id,
            id_kind,
        })
    }

    pub fn location(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }
}

fn not_an_object(section: &str, key: &str) -> Finding {
    Finding::new(
        FindingCode::MalformedSection,
        format!("Entry '{}.{}' is not an object", section, key),
    )
    .about(key.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaView {
    pub key: String,
    pub name: String,
    pub inherit: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BundleView {
    pub version: Option<String>,
    pub identified: Vec<IdentifiedEntry>,
    pub schemas: Vec<SchemaView>,
    /// Model entry names (`_name`, else dictionary key)
    pub models: Vec<String>,
    pub components: Vec<String>,
    /// Shape problems found while reading raw JSON
    pub shape_findings: Vec<Finding>,
}

impl BundleView {
    pub fn from_bundle(bundle: &Bundle) -> Self {
        let mut identified = Vec::new();
        let mut shape_findings = Vec::new();
        for (key, entry) in &bundle.schemas {
            identified.push(IdentifiedEntry::string("schemas", key, &entry.id));
        }
        for (key, entry) in &bundle.models {
            identified.push(IdentifiedEntry::string("models", key, &entry.id));
        }
        // reserved sections are untyped, read them the same way as raw JSON
        for (section, entries) in [("types", &bundle.types), ("behaviors", &bundle.behaviors)] {
            for (key, entry) in entries {
                let read = match entry.as_object() {
                    Some(fields) => IdentifiedEntry::read(section, key, fields),
                    None => Err(not_an_object(section, key)),
                };
                match read {
                    Ok(entry) => identified.push(entry),
                    Err(finding) => shape_findings.push(finding),
                }
            }
        }

        Self {
            version: Some(bundle.version.clone()),
            identified,
            schemas: bundle
                .schemas
                .iter()
                .map(|(key, entry)| SchemaView {
                    key: key.clone(),
                    name: entry.name.clone(),
                    inherit: entry.inherit.clone(),
                })
                .collect(),
            models: bundle.models.values().map(|m| m.name.clone()).collect(),
            components: bundle.components.keys().cloned().collect(),
            shape_findings,
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let mut view = Self::default();

        let Some(root) = value.as_object() else {
            view.shape_findings.push(Finding::new(
                FindingCode::MalformedBundle,
                "Bundle is not a JSON object",
            ));
            return view;
        };

        view.version = root.get("version").and_then(Value::as_str).map(str::to_string);

        for section in IDENTIFIED_SECTIONS {
            let Some(entries) = view.section(root, section) else {
                continue;
            };
            for (key, entry) in entries {
                let Some(fields) = entry.as_object() else {
                    view.shape_findings.push(not_an_object(section, key));
                    continue;
                };
                match IdentifiedEntry::read(section, key, fields) {
                    Ok(entry) => view.identified.push(entry),
                    Err(finding) => view.shape_findings.push(finding),
                }

                let name = fields
                    .get(NAME_KEY)
                    .and_then(Value::as_str)
                    .unwrap_or(key)
                    .to_string();
                match section {
                    "schemas" => {
                        let inherit = view.inherit_list(key, fields);
                        view.schemas.push(SchemaView {
                            key: key.clone(),
                            name,
                            inherit,
                        });
                    }
                    "models" => view.models.push(name),
                    _ => {}
                }
            }
        }

        if let Some(components) = view.section(root, "components") {
            view.components = components.keys().cloned().collect();
        }

        view
    }

    /// A dictionary section; absent sections read as empty
    fn section<'v>(&mut self, root: &'v Map<String, Value>, section: &str) -> Option<&'v Map<String, Value>> {
        match root.get(section) {
            None | Some(Value::Null) => None,
            Some(Value::Object(entries)) => Some(entries),
            Some(_) => {
                self.shape_findings.push(Finding::new(
                    FindingCode::MalformedSection,
                    format!("Section '{}' is not an object", section),
                ));
                None
            }
        }
    }

    fn inherit_list(&mut self, key: &str, fields: &Map<String, Value>) -> Vec<String> {
        match fields.get(INHERIT_KEY) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let names: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                if names.len() != items.len() {
                    self.shape_findings.push(
                        Finding::new(
                            FindingCode::MalformedSection,
                            format!("Schema '{}' has non-string inheritance entries", key),
                        )
                        .about(key.to_string()),
                    );
                }
                names
            }
            Some(_) => {
                self.shape_findings.push(
                    Finding::new(
                        FindingCode::MalformedSection,
                        format!("Schema '{}' has an inheritance list that is not an array", key),
                    )
                    .about(key.to_string()),
                );
                Vec::new()
            }
        }
    }

    /// Names every schema answers to
    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.name.as_str())
    }
}
