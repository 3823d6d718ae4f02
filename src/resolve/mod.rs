//! Attribute and relationship resolution shared by the schema and model
//! transformers.

pub mod kind;
pub mod naming;
pub mod relation;

pub use kind::{resolve_attribute, AttributeKind, PrimitiveType};
pub use naming::{to_lower_camel_case, NamingPolicy};
pub use relation::{inferred_members, inheritance_chain, InferredMember};
