//! Validation findings
//!
//! Collects errors and warnings while checking a bundle. The report is the
//! validator's only output; checks never abort.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Finding Codes
// =============================================================================

/// Code categorizing a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    /// Internal identifier used by more than one entry
    DuplicateId,
    /// Inheritance entry names no schema
    DanglingInherit,
    /// Inheritance graph contains a cycle
    CircularInheritance,
    /// Input is not a bundle object at all
    MalformedBundle,
    /// Model entry without a schema of the same name
    OrphanModel,
    /// Component entry without a schema of the same name
    OrphanComponent,
    /// Bundle version is not valid semver
    InvalidVersion,
    /// Section or entry has the wrong JSON shape
    MalformedSection,
}

impl FindingCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateId => "E001",
            Self::DanglingInherit => "E002",
            Self::CircularInheritance => "E003",
            Self::MalformedBundle => "E004",
            Self::OrphanModel => "W001",
            Self::OrphanComponent => "W002",
            Self::InvalidVersion => "W003",
            Self::MalformedSection => "W004",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateId
            | Self::DanglingInherit
            | Self::CircularInheritance
            | Self::MalformedBundle => Severity::Error,

            Self::OrphanModel
            | Self::OrphanComponent
            | Self::InvalidVersion
            | Self::MalformedSection => Severity::Warning,
        }
    }
}

impl fmt::Display for FindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Finding
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub severity: Severity,
    pub message: String,
    /// Entry the finding is about, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Additional context (locations, cycle members)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl Finding {
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            subject: None,
            context: Vec::new(),
        }
    }

    pub fn about(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.severity, self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, " ({})", subject)?;
        }
        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }
        Ok(())
    }
}

// =============================================================================
// Report
// =============================================================================

/// Outcome of validating one bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self {
            is_valid: !findings.iter().any(Finding::is_error),
            findings,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn has_code(&self, code: FindingCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    /// Format all findings for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();
        for finding in &self.findings {
            output.push_str(&finding.to_string());
            output.push('\n');
        }
        if !self.findings.is_empty() {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s)\n",
                self.error_count(),
                self.warning_count()
            ));
        }
        output
    }
}
