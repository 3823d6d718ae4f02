//! Bundle validation
//!
//! Checks a bundle, assembled here or supplied from outside, for internal
//! consistency. Every check runs; nothing short-circuits and nothing fails.
//!
//! ## Checks
//! 1. **Duplicate identifiers**: `_id` values across schemas, models and the
//!    reserved sections must be unique (error per duplicate value)
//! 2. **Dangling references**: inheritance entries must name the root marker
//!    or a schema (error); models need a same-named schema (warning)
//! 3. **Circular inheritance**: first cycle per connected component (error)
//! 4. Optional warnings: non-semver version, components without schemas

pub mod cycles;
pub mod diagnostics;
pub mod view;

pub use cycles::InheritanceGraph;
pub use diagnostics::{Finding, FindingCode, Severity, ValidationReport};
pub use view::{BundleView, IdKind};

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

use crate::bundle::{Bundle, ROOT_MARKER};
use crate::config::ValidationConfig;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_bundle(&self, bundle: &Bundle) -> ValidationReport {
        self.validate_view(&BundleView::from_bundle(bundle))
    }

    pub fn validate_value(&self, value: &Value) -> ValidationReport {
        self.validate_view(&BundleView::from_value(value))
    }

    pub fn validate_view(&self, view: &BundleView) -> ValidationReport {
        let mut findings = view.shape_findings.clone();

        check_duplicate_ids(view, &mut findings);
        check_dangling_references(view, &mut findings);
        check_circular_inheritance(view, &mut findings);
        if self.config.check_components {
            check_orphan_components(view, &mut findings);
        }
        if self.config.check_version {
            check_version(view, &mut findings);
        }

        let report = ValidationReport::from_findings(findings);
        info!(
            valid = report.is_valid,
            errors = report.error_count(),
            warnings = report.warning_count(),
            schemas = view.schemas.len(),
            "validated bundle"
        );
        report
    }
}

/// Validate a typed bundle with default settings
pub fn validate_bundle(bundle: &Bundle) -> ValidationReport {
    Validator::default().validate_bundle(bundle)
}

/// Validate arbitrary JSON with default settings
pub fn validate_value(value: &Value) -> ValidationReport {
    Validator::default().validate_value(value)
}

fn check_duplicate_ids(view: &BundleView, findings: &mut Vec<Finding>) {
    let mut locations: BTreeMap<(IdKind, &str), Vec<String>> = BTreeMap::new();
    for entry in &view.identified {
        locations
            .entry((entry.id_kind, entry.id.as_str()))
            .or_default()
            .push(entry.location());
    }

    for ((kind, id), used_by) in locations.into_iter().filter(|(_, l)| l.len() > 1) {
        let shown = match kind {
            IdKind::String => format!("'{}'", id),
            other => format!("{} {}", other.as_str(), id),
        };
        findings.push(
            Finding::new(
                FindingCode::DuplicateId,
                format!("Duplicate identifier {} used by {} entries", shown, used_by.len()),
            )
            .about(id)
            .with_context(used_by.join(", ")),
        );
    }
}

fn check_dangling_references(view: &BundleView, findings: &mut Vec<Finding>) {
    let names: HashSet<&str> = view.schema_names().collect();

    for schema in &view.schemas {
        for parent in &schema.inherit {
            if parent != ROOT_MARKER && !names.contains(parent.as_str()) {
                findings.push(
                    Finding::new(
                        FindingCode::DanglingInherit,
                        format!(
                            "Schema '{}' inherits from missing schema '{}'",
                            schema.name, parent
                        ),
                    )
                    .about(schema.name.clone()),
                );
            }
        }
    }

    for model in &view.models {
        if !names.contains(model.as_str()) {
            findings.push(
                Finding::new(
                    FindingCode::OrphanModel,
                    format!("Model '{}' has no corresponding schema", model),
                )
                .about(model.clone()),
            );
        }
    }
}

fn check_circular_inheritance(view: &BundleView, findings: &mut Vec<Finding>) {
    for cycle in InheritanceGraph::build(&view.schemas).cycles() {
        let head = cycle.first().cloned().unwrap_or_default();
        findings.push(
            Finding::new(
                FindingCode::CircularInheritance,
                format!("Circular inheritance involving schema '{}'", head),
            )
            .about(head)
            .with_context(cycle.join(" -> ")),
        );
    }
}

fn check_orphan_components(view: &BundleView, findings: &mut Vec<Finding>) {
    let names: HashSet<&str> = view.schema_names().collect();
    for component in &view.components {
        if !names.contains(component.as_str()) {
            findings.push(
                Finding::new(
                    FindingCode::OrphanComponent,
                    format!("Component '{}' has no corresponding schema", component),
                )
                .about(component.clone()),
            );
        }
    }
}

fn check_version(view: &BundleView, findings: &mut Vec<Finding>) {
    match &view.version {
        Some(version) if semver::Version::parse(version).is_ok() => {}
        Some(version) => findings.push(Finding::new(
            FindingCode::InvalidVersion,
            format!("Bundle version '{}' is not valid semver", version),
        )),
        None => findings.push(Finding::new(
            FindingCode::InvalidVersion,
            "Bundle has no version string",
        )),
    }
}
