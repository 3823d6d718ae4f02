//! Entity to bundle transformation
//!
//! Each entity is planned once into an ordered list of members (declared
//! attributes, declared methods, relationship-inferred members). The schema
//! and model transformers both render that same plan, which keeps the two
//! dictionaries key-for-key consistent.

pub mod model;
pub mod schema;

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use crate::bundle::{Bundle, ComponentEntry};
use crate::config::BundleConfig;
use crate::ids::{IdGenerator, RandomIds};
use crate::mson::{Entity, Method, MsonModel};
use crate::resolve::{inferred_members, resolve_attribute, AttributeKind, InferredMember, NamingPolicy};

pub use model::build_model;
pub use schema::build_schema;

/// Where a planned member comes from
#[derive(Debug, Clone)]
pub enum MemberSource<'a> {
    Attribute(AttributeKind),
    Method(&'a Method),
    Inferred(InferredMember),
}

#[derive(Debug, Clone)]
pub struct PlannedMember<'a> {
    pub name: String,
    pub source: MemberSource<'a>,
}

/// Members of one entity, in emission order
///
/// Names starting with `_` would collide with entry metadata and are dropped.
/// Repeated names keep their first occurrence.
pub fn plan_members<'a>(model: &MsonModel, entity: &'a Entity, naming: &NamingPolicy) -> Vec<PlannedMember<'a>> {
    let mut seen = HashSet::new();
    let mut planned = Vec::new();

    let declared = entity
        .attributes
        .iter()
        .map(|a| (a.name.clone(), MemberSource::Attribute(resolve_attribute(model, &entity.id, a))))
        .chain(entity.methods.iter().map(|m| (m.name.clone(), MemberSource::Method(m))));

    let inferred = inferred_members(model, entity, naming)
        .into_iter()
        .map(|m| (m.name.clone(), MemberSource::Inferred(m)));

    for (name, source) in declared.chain(inferred) {
        if name.starts_with('_') {
            warn!(entity = %entity.name, member = %name, "skipping member with reserved name");
            continue;
        }
        if seen.insert(name.clone()) {
            planned.push(PlannedMember { name, source });
        }
    }

    planned
}

/// Builds bundles from MSON models
#[derive(Debug, Clone)]
pub struct Transformer {
    naming: NamingPolicy,
    default_version: String,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(&BundleConfig::default())
    }
}

impl Transformer {
    pub fn new(config: &BundleConfig) -> Self {
        Self {
            naming: NamingPolicy::new(&config.naming),
            default_version: config.bundle.default_version.clone(),
        }
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    /// Assemble a bundle with fresh random identifiers
    pub fn transform(&self, model: &MsonModel, version: Option<&str>) -> Bundle {
        self.transform_with_ids(model, version, &mut RandomIds::new())
    }

    /// Assemble a bundle drawing identifiers from `ids`
    pub fn transform_with_ids(
        &self,
        model: &MsonModel,
        version: Option<&str>,
        ids: &mut dyn IdGenerator,
    ) -> Bundle {
        let mut schemas = BTreeMap::new();
        let mut models = BTreeMap::new();
        let mut components = BTreeMap::new();

        for entity in &model.entities {
            if schemas.contains_key(&entity.name) {
                warn!(entity = %entity.name, id = %entity.id, "duplicate entity name, keeping first");
                continue;
            }

            let plan = plan_members(model, entity, &self.naming);
            let schema = build_schema(model, entity, &plan, ids.next_id());
            let type_model = build_model(entity, &plan, ids.next_id());
            debug!(
                entity = %entity.name,
                members = plan.len(),
                parents = schema.inherit.len() - 1,
                "transformed entity"
            );

            schemas.insert(entity.name.clone(), schema);
            models.insert(entity.name.clone(), type_model);
            components.insert(entity.name.clone(), ComponentEntry::default());
        }

        let bundle = Bundle {
            id: ids.next_id(),
            name: model.name.clone(),
            description: model.description.clone().unwrap_or_default(),
            version: version
                .map(str::to_string)
                .unwrap_or_else(|| self.default_version.clone()),
            master: true,
            schemas,
            models,
            components,
            types: BTreeMap::new(),
            behaviors: BTreeMap::new(),
        };

        info!(
            bundle = %bundle.name,
            version = %bundle.version,
            entities = bundle.schemas.len(),
            relationships = model.relationships.len(),
            "assembled bundle"
        );
        bundle
    }
}

/// Assemble a bundle with the default configuration
pub fn transform(model: &MsonModel, version: Option<&str>) -> Bundle {
    Transformer::default().transform(model, version)
}
