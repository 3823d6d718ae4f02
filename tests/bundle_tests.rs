//! End-to-end tests: MSON model -> bundle -> validation

use std::collections::{BTreeSet, HashSet};

use mson_bundle::{
    transform, validate_bundle, validate_value, Attribute, Bundle, Entity, EntityKind, FindingCode,
    MemberKind, MsonModel, Multiplicity, RelationKind, Relationship, SequentialIds, Transformer,
    TypeExpr, ROOT_MARKER,
};
use serde_json::json;

fn fixture(text: &str) -> MsonModel {
    serde_json::from_str(text).unwrap()
}

fn school() -> MsonModel {
    fixture(include_str!("fixtures/school.json"))
}

fn pets() -> MsonModel {
    fixture(include_str!("fixtures/dog_interfaces.json"))
}

fn tree() -> MsonModel {
    fixture(include_str!("fixtures/tree_node.json"))
}

fn all_models() -> Vec<MsonModel> {
    vec![school(), pets(), tree()]
}

fn member_keys<V>(members: &std::collections::BTreeMap<String, V>) -> BTreeSet<&str> {
    members.keys().map(String::as_str).collect()
}

// =============================================================================
// Transform properties
// =============================================================================

#[test]
fn test_transformed_bundles_validate_cleanly() {
    for model in all_models() {
        let report = validate_bundle(&transform(&model, None));
        assert!(report.is_valid, "{}", report.format_all());
        assert_eq!(report.error_count(), 0);
        assert!(report.findings.is_empty(), "{}", report.format_all());
    }
}

#[test]
fn test_one_entry_per_entity_in_every_dictionary() {
    for model in all_models() {
        let bundle = transform(&model, None);
        let names: BTreeSet<&str> = model.entities.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(member_keys(&bundle.schemas), names);
        assert_eq!(member_keys(&bundle.models), names);
        assert_eq!(member_keys(&bundle.components), names);
        assert!(bundle.types.is_empty());
        assert!(bundle.behaviors.is_empty());
        assert!(bundle.master);
    }
}

#[test]
fn test_schema_and_model_keys_match() {
    for model in all_models() {
        let bundle = transform(&model, None);
        for (name, schema) in &bundle.schemas {
            let type_model = &bundle.models[name];
            assert_eq!(member_keys(&schema.members), member_keys(&type_model.members), "{}", name);

            for (member, kind) in &schema.members {
                let expr = &type_model.members[member];
                match kind {
                    MemberKind::Collection => assert!(matches!(expr, TypeExpr::Collection(v) if v.len() == 1)),
                    MemberKind::Method => assert!(matches!(expr, TypeExpr::Signature(_))),
                    MemberKind::Property | MemberKind::Link => assert!(matches!(expr, TypeExpr::Scalar(_))),
                }
            }
        }
    }
}

#[test]
fn test_fresh_identifiers_each_call() {
    let model = school();
    let first = transform(&model, None);
    let second = transform(&model, None);

    assert_ne!(first.id, second.id);
    assert_ne!(first.schemas["Student"].id, second.schemas["Student"].id);
    assert_ne!(first.schemas["Student"].id, first.models["Student"].id);
    assert_eq!(
        first.structural_checksum().unwrap(),
        second.structural_checksum().unwrap()
    );
}

#[test]
fn test_concurrent_transforms_share_nothing() {
    let model = school();
    let bundles: Vec<Bundle> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| transform(&model, None)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let checksum = bundles[0].structural_checksum().unwrap();
    let mut ids = HashSet::new();
    let mut total = 0;
    for bundle in &bundles {
        assert!(validate_bundle(bundle).is_valid);
        assert_eq!(bundle.structural_checksum().unwrap(), checksum);

        let entry_ids = bundle
            .schemas
            .values()
            .map(|s| &s.id)
            .chain(bundle.models.values().map(|m| &m.id));
        for id in std::iter::once(&bundle.id).chain(entry_ids) {
            ids.insert(id.clone());
            total += 1;
        }
    }
    assert_eq!(ids.len(), total);
}

#[test]
fn test_identity_and_version() {
    let model = school();
    let bundle = transform(&model, None);
    assert_eq!(bundle.name, "School");
    assert_eq!(bundle.description, "Students and the courses they enroll in");
    assert_eq!(bundle.version, "0.0.1");

    let bundle = transform(&model, Some("1.4.0"));
    assert_eq!(bundle.version, "1.4.0");
}

// =============================================================================
// Relationship semantics
// =============================================================================

#[test]
fn test_student_course_reverse_collection() {
    let bundle = transform(&school(), None);

    let student = &bundle.schemas["Student"];
    assert_eq!(student.members["name"], MemberKind::Property);
    assert_eq!(student.members["courses"], MemberKind::Collection);
    assert_eq!(student.members["enroll"], MemberKind::Method);
    assert_eq!(student.members.len(), 3);

    let course = &bundle.schemas["Course"];
    assert_eq!(course.members["title"], MemberKind::Property);
    assert_eq!(course.members["inverseEnrollsIn"], MemberKind::Collection);
    assert_eq!(
        bundle.models["Course"].members["inverseEnrollsIn"],
        TypeExpr::collection_of("Student")
    );
    assert_eq!(
        serde_json::to_value(&bundle.models["Student"].members["enroll"]).unwrap(),
        json!({ "course": "Course", "=>": "boolean" })
    );
    assert_eq!(
        bundle.models["Course"].members["credits"],
        TypeExpr::Scalar("integer".to_string())
    );
}

#[test]
fn test_dog_implements_interfaces_in_order() {
    let bundle = transform(&pets(), None);
    assert_eq!(
        bundle.schemas["Dog"].inherit,
        vec![ROOT_MARKER, "InterfaceA", "InterfaceB"]
    );
    assert_eq!(bundle.schemas["InterfaceA"].inherit, vec![ROOT_MARKER]);
    assert_eq!(
        serde_json::to_value(&bundle.models["Dog"].members["bark"]).unwrap(),
        json!({ "=>": "void" })
    );
}

#[test]
fn test_tree_node_children_collection() {
    let bundle = transform(&tree(), None);
    assert_eq!(bundle.schemas["TreeNode"].members["children"], MemberKind::Collection);
    assert_eq!(
        serde_json::to_value(&bundle.models["TreeNode"].members["children"]).unwrap(),
        json!(["TreeNode"])
    );
    // the other end of a one-to-many edge is also many-valued
    assert_eq!(
        bundle.schemas["TreeNode"].members["inverseChildren"],
        MemberKind::Collection
    );
    assert_eq!(
        bundle.models["TreeNode"].members["inverseChildren"],
        TypeExpr::collection_of("TreeNode")
    );
}

#[test]
fn test_tree_node_children_synthesized_without_attribute() {
    let model = MsonModel {
        id: "m".to_string(),
        name: "Tree".to_string(),
        kind: Default::default(),
        description: None,
        entities: vec![Entity::new("n", "TreeNode", EntityKind::Class)
            .with_attribute(Attribute::new("value", "number"))],
        relationships: vec![Relationship::new("r", "n", "n", RelationKind::Composition)
            .with_multiplicity(Multiplicity::One, Multiplicity::ZeroOrMany)
            .named("children")],
    };
    let bundle = transform(&model, None);
    assert_eq!(bundle.schemas["TreeNode"].members["children"], MemberKind::Collection);
    assert_eq!(
        bundle.models["TreeNode"].members["children"],
        TypeExpr::collection_of("TreeNode")
    );
}

#[test]
fn test_repeated_parent_listed_once() {
    let model = MsonModel {
        id: "m".to_string(),
        name: "Zoo".to_string(),
        kind: Default::default(),
        description: None,
        entities: vec![
            Entity::new("c", "Cat", EntityKind::Class),
            Entity::new("a", "Animal", EntityKind::Abstract),
        ],
        relationships: vec![
            Relationship::new("r1", "c", "a", RelationKind::Inheritance),
            Relationship::new("r2", "c", "a", RelationKind::Inheritance),
            Relationship::new("r3", "c", "a", RelationKind::Implementation),
        ],
    };
    let bundle = transform(&model, None);
    assert_eq!(bundle.schemas["Cat"].inherit, vec![ROOT_MARKER, "Animal"]);
    assert!(validate_bundle(&bundle).is_valid);
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn test_roundtrip_preserves_validation_outcome() {
    let mut bundles: Vec<Bundle> = all_models().iter().map(|m| transform(m, None)).collect();

    let mut broken = transform(&pets(), None);
    broken.schemas.get_mut("Dog").unwrap().inherit.push("Wolf".to_string());
    let shared = broken.schemas["Dog"].id.clone();
    broken.models.get_mut("InterfaceA").unwrap().id = shared;
    bundles.push(broken);

    for bundle in bundles {
        let before = validate_bundle(&bundle);
        let text = bundle.to_json().unwrap();

        let decoded = Bundle::from_json(&text).unwrap();
        assert_eq!(decoded, bundle);
        assert_eq!(validate_bundle(&decoded), before);

        let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
        let after = validate_value(&raw);
        assert_eq!(after.is_valid, before.is_valid);
        assert_eq!(after.error_count(), before.error_count());
        assert_eq!(after.findings.len(), before.findings.len());
    }
}

// =============================================================================
// Hand-built bundles
// =============================================================================

#[test]
fn test_dangling_inheritance_names_missing_schema() {
    let bundle = Bundle::from_json(include_str!("fixtures/dangling_bundle.json")).unwrap();
    let report = validate_bundle(&bundle);

    assert!(!report.is_valid);
    let finding = report
        .errors()
        .find(|f| f.code == FindingCode::DanglingInherit)
        .unwrap();
    assert!(finding.message.contains("Animal"));
    assert_eq!(finding.subject.as_deref(), Some("Dog"));
}

#[test]
fn test_duplicate_identifier_reported() {
    let raw: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/duplicate_ids_bundle.json")).unwrap();
    let report = validate_value(&raw);

    assert!(!report.is_valid);
    let dups: Vec<_> = report
        .errors()
        .filter(|f| f.code == FindingCode::DuplicateId)
        .collect();
    assert_eq!(dups.len(), 1);
    assert!(dups[0].message.contains("same"));
    assert_eq!(dups[0].context, vec!["schemas.Cat, schemas.Dog"]);
}

#[test]
fn test_model_without_schema_is_only_a_warning() {
    let mut bundle = Transformer::default().transform_with_ids(&pets(), None, &mut SequentialIds::new("n"));
    let mut extra = bundle.models["Dog"].clone();
    extra.id = "n-extra".to_string();
    extra.name = "Ghost".to_string();
    bundle.models.insert("Ghost".to_string(), extra);

    let report = validate_bundle(&bundle);
    assert!(report.is_valid);
    assert_eq!(report.warning_count(), 1);
    assert!(report.has_code(FindingCode::OrphanModel));
}

#[test]
fn test_cycle_reported_and_validation_continues() {
    let raw = json!({
        "_id": "b",
        "name": "Cycles",
        "version": "0.0.1",
        "master": true,
        "schemas": {
            "A": { "_id": "1", "_name": "A", "_inherit": ["_Component", "B"] },
            "B": { "_id": "2", "_name": "B", "_inherit": ["_Component", "A"] },
            "C": { "_id": "3", "_name": "C", "_inherit": ["_Component", "Nowhere"] }
        },
        "models": {},
        "components": {}
    });
    let report = validate_value(&raw);

    assert!(!report.is_valid);
    let cycle = report
        .errors()
        .find(|f| f.code == FindingCode::CircularInheritance)
        .unwrap();
    assert_eq!(cycle.context, vec!["A -> B -> A"]);
    assert!(report.has_code(FindingCode::DanglingInherit));
}
