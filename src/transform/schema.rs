//! Entity -> schema entry (member name to structural kind)

use std::collections::BTreeMap;

use crate::bundle::{MemberKind, SchemaEntry};
use crate::mson::{Entity, MsonModel};
use crate::resolve::inheritance_chain;

use super::{MemberSource, PlannedMember};

/// Render a planned entity as a schema entry
///
/// Methods record presence only; their signatures live in the model entry.
pub fn build_schema(model: &MsonModel, entity: &Entity, plan: &[PlannedMember<'_>], id: String) -> SchemaEntry {
    let members: BTreeMap<String, MemberKind> = plan
        .iter()
        .map(|member| {
            let kind = match &member.source {
                MemberSource::Attribute(kind) => kind.member_kind(),
                MemberSource::Method(_) => MemberKind::Method,
                MemberSource::Inferred(inferred) => inferred.kind,
            };
            (member.name.clone(), kind)
        })
        .collect();

    SchemaEntry {
        id,
        name: entity.name.clone(),
        inherit: inheritance_chain(model, entity),
        members,
    }
}
