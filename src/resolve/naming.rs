//! Naming policy for members synthesized from relationships
//!
//! - Named relationship, reverse side: `inverse_prefix` + declared words,
//!   lower camel case ("enrolls in" -> `inverseEnrollsIn`)
//! - Named relationship, forward side: declared words, lower camel case
//!   ("children" -> `children`)
//! - Unnamed relationship, reverse side: the source entity's name, lower camel
//!   case (`Student` -> `student`)
//!
//! No pluralization is applied; cardinality is carried by the member kind.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::NamingConfig;

fn word_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("static pattern"))
}

#[derive(Debug, Clone)]
pub struct NamingPolicy {
    inverse_prefix: String,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(&NamingConfig::default())
    }
}

impl NamingPolicy {
    pub fn new(config: &NamingConfig) -> Self {
        Self {
            inverse_prefix: config.inverse_prefix.clone(),
        }
    }

    /// Name of the member implied on the target of a relationship
    pub fn reverse_name(&self, declared: Option<&str>, source_entity: &str) -> String {
        match declared {
            Some(name) => to_lower_camel_case(&format!("{} {}", self.inverse_prefix, name)),
            None => to_lower_camel_case(source_entity),
        }
    }

    /// Name of the member implied on the source of a named relationship
    pub fn forward_name(&self, declared: &str) -> String {
        to_lower_camel_case(declared)
    }
}

/// Convert free text or an identifier to lowerCamelCase
///
/// Words inside an identifier keep their casing past the first letter, so
/// `TreeNode` becomes `treeNode` and `enrolls in` becomes `enrollsIn`.
pub fn to_lower_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for word in word_separator().split(s).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        let Some(first) = chars.next() else { continue };
        if result.is_empty() {
            result.extend(first.to_lowercase());
        } else {
            result.extend(first.to_uppercase());
        }
        result.push_str(chars.as_str());
    }

    result
}
