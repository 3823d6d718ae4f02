//! Bundle-internal identifier generation
//!
//! Identifiers only need to be unique among those issued for a single bundle,
//! so each assembly call owns its own generator.

use std::collections::HashSet;
use uuid::Uuid;

/// Source of bundle-internal identifiers
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random identifiers (uuid v4, 32 hex chars), never repeating within one generator
#[derive(Debug, Default)]
pub struct RandomIds {
    issued: HashSet<String>,
}

impl RandomIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        loop {
            let candidate = Uuid::new_v4().simple().to_string();
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Deterministic `prefix` + counter identifiers
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
