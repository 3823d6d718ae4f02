//! Relationship resolution
//!
//! Two passes over the declared relationships of a model:
//! - structural edges (association/aggregation/composition) imply members on
//!   the entity that did not declare them
//! - inheritance/implementation edges linearize into an ordered, de-duplicated
//!   parent list headed by [`ROOT_MARKER`]

use std::collections::HashSet;

use crate::bundle::{MemberKind, ROOT_MARKER};
use crate::mson::{Entity, MsonModel, Multiplicity, RelationKind, Relationship};

use super::naming::NamingPolicy;

/// A member implied by a relationship rather than declared as an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredMember {
    pub name: String,
    /// Link or collection
    pub kind: MemberKind,
    /// Name of the entity on the other end
    pub target: String,
    /// Relationship the member came from
    pub relationship_id: String,
}

fn reference_kind(many: bool) -> MemberKind {
    if many {
        MemberKind::Collection
    } else {
        MemberKind::Link
    }
}

fn is_many(multiplicity: Option<Multiplicity>) -> bool {
    multiplicity.map(|m| m.is_many()).unwrap_or(false)
}

/// Kind of the member implied on the target of `relationship`
///
/// Driven by the source side, but a many target side also yields a collection:
/// Student `1` -> Course `0..*` ("enrolls in") must give Course a collection
/// of students. The reverse is a link only when both ends are at most one, so
/// Department `1` -> Employee `0..*` also gives Employee a collection.
pub fn reverse_kind(relationship: &Relationship) -> MemberKind {
    reference_kind(
        is_many(relationship.source_multiplicity()) || is_many(relationship.target_multiplicity()),
    )
}

/// Kind of the member implied on the source of `relationship`
pub fn forward_kind(relationship: &Relationship) -> MemberKind {
    reference_kind(is_many(relationship.target_multiplicity()))
}

/// Members implied on `entity` by structural relationships, in declaration order
///
/// Names already declared on the entity, and names produced earlier in the
/// same pass, are skipped. A named edge also yields its forward member on the
/// source entity when that entity declares no attribute of the target type.
pub fn inferred_members(model: &MsonModel, entity: &Entity, naming: &NamingPolicy) -> Vec<InferredMember> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut members = Vec::new();

    let mut push = |member: InferredMember| {
        if entity.declares(&member.name) || member.name.is_empty() {
            return;
        }
        if seen.insert(member.name.clone()) {
            members.push(member);
        }
    };

    for relationship in model.relationships.iter().filter(|r| r.kind.is_structural()) {
        let (Some(source), Some(target)) = (
            model.entity(&relationship.source_id),
            model.entity(&relationship.target_id),
        ) else {
            continue;
        };

        if relationship.source_id == entity.id {
            if let Some(declared) = relationship.declared_name() {
                let already_expressed = entity
                    .attributes
                    .iter()
                    .any(|a| a.type_name.trim() == target.name);
                if !already_expressed {
                    push(InferredMember {
                        name: naming.forward_name(declared),
                        kind: forward_kind(relationship),
                        target: target.name.clone(),
                        relationship_id: relationship.id.clone(),
                    });
                }
            }
        }

        if relationship.target_id == entity.id {
            push(InferredMember {
                name: naming.reverse_name(relationship.declared_name(), &source.name),
                kind: reverse_kind(relationship),
                target: source.name.clone(),
                relationship_id: relationship.id.clone(),
            });
        }
    }

    members
}

/// Ordered parent list for `entity`
///
/// Root marker first, then inheritance targets, then implementation targets,
/// each in declaration order. Never contains the entity's own name or repeats.
pub fn inheritance_chain(model: &MsonModel, entity: &Entity) -> Vec<String> {
    let mut chain = vec![ROOT_MARKER.to_string()];

    for kind in [RelationKind::Inheritance, RelationKind::Implementation] {
        let parents = model
            .relationships
            .iter()
            .filter(|r| r.kind == kind && r.source_id == entity.id)
            .filter_map(|r| model.entity(&r.target_id));

        for parent in parents {
            if parent.name != entity.name && !chain.contains(&parent.name) {
                chain.push(parent.name.clone());
            }
        }
    }

    chain
}
