//! Entity -> model entry (member name to type expression)

use std::collections::BTreeMap;

use crate::bundle::{MemberKind, ModelEntry, TypeExpr, RETURN_KEY};
use crate::mson::{Entity, Method};
use crate::resolve::{AttributeKind, PrimitiveType};

use super::{MemberSource, PlannedMember};

/// Primitive names normalize; entity names pass through trimmed
fn normalize_type(type_name: &str) -> String {
    type_name
        .parse::<PrimitiveType>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|_| type_name.trim().to_string())
}

fn signature(method: &Method) -> TypeExpr {
    let mut params: BTreeMap<String, String> = method
        .parameters
        .iter()
        .map(|p| (p.name.clone(), normalize_type(&p.type_name)))
        .collect();
    params.insert(RETURN_KEY.to_string(), normalize_type(&method.return_type));
    TypeExpr::Signature(params)
}

/// Render a planned entity as a model entry
pub fn build_model(entity: &Entity, plan: &[PlannedMember<'_>], id: String) -> ModelEntry {
    let members = plan
        .iter()
        .map(|member| {
            let expr = match &member.source {
                MemberSource::Attribute(AttributeKind::Property(primitive)) => {
                    TypeExpr::Scalar(primitive.as_str().to_string())
                }
                MemberSource::Attribute(AttributeKind::Link(target)) => TypeExpr::Scalar(target.clone()),
                MemberSource::Attribute(AttributeKind::Collection(target)) => {
                    TypeExpr::collection_of(target.clone())
                }
                MemberSource::Method(method) => signature(method),
                MemberSource::Inferred(inferred) => match inferred.kind {
                    MemberKind::Collection => TypeExpr::collection_of(inferred.target.clone()),
                    _ => TypeExpr::Scalar(inferred.target.clone()),
                },
            };
            (member.name.clone(), expr)
        })
        .collect();

    ModelEntry {
        id,
        name: entity.name.clone(),
        members,
    }
}
