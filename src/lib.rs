//! MSON Bundle
//!
//! Converts a structural object model (entities, attributes, methods and the
//! relationships between them) into a runtime component bundle, and validates
//! bundles for internal consistency.
//!
//! ## Pipeline
//!
//! ```text
//! MsonModel ──► resolve (kinds, reverse members, inheritance)
//!           ──► transform (schema + model per entity, components)
//!           ──► Bundle ──► validate ──► ValidationReport
//! ```
//!
//! ## Bundle layout
//!
//! ```text
//! {
//!   "_id": "...", "name": "...", "description": "...",
//!   "version": "0.0.1", "master": true,
//!   "schemas":    { "Dog": { "_id", "_name", "_inherit": ["_Component", ...], "name": "property" } },
//!   "models":     { "Dog": { "_id", "_name", "name": "string", "bark": { "=>": "void" } } },
//!   "components": { "Dog": {} },
//!   "types": {}, "behaviors": {}
//! }
//! ```
//!
//! Every operation is synchronous and pure apart from identifier generation,
//! so concurrent calls over independent inputs need no coordination.

pub mod bundle;
pub mod checksum;
pub mod config;
pub mod error;
pub mod ids;
pub mod mson;
pub mod resolve;
pub mod transform;
pub mod validate;

pub use bundle::{Bundle, ComponentEntry, MemberKind, ModelEntry, SchemaEntry, TypeExpr, RETURN_KEY, ROOT_MARKER};
pub use checksum::Checksum;
pub use config::BundleConfig;
pub use error::{BundleError, Result};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use mson::{
    Attribute, Entity, EntityKind, Method, ModelKind, MsonModel, Multiplicity, Parameter, RelationKind,
    Relationship, Visibility,
};
pub use transform::{transform, Transformer};
pub use validate::{validate_bundle, validate_value, Finding, FindingCode, Severity, ValidationReport, Validator};
