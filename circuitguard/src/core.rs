//! Core validation logic shared by the library API and the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::analyzer::rules::{Issue, RulesEngine, Severity, UnknownComponentRule};
use crate::netlist::{build_nets, resolve_nets};
use crate::parser::snapshot::CircuitSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum CircuitGuardError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid wire: {0}")]
    InvalidWire(String),
    #[error("Duplicate component id: {0}")]
    DuplicateComponent(String),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CircuitGuardError {
    fn from(e: serde_json::Error) -> Self {
        CircuitGuardError::Parse(e.to_string())
    }
}

/// Options for validation runs (library or CLI).
#[derive(Clone, Debug)]
pub struct ValidationOptions {
    /// Report components whose type is not in the catalogue.
    pub strict_unknown_types: bool,
    /// Keep informational advisories in the result.
    pub include_advisories: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict_unknown_types: false,
            include_advisories: true,
        }
    }
}

/// Validation result with issues and counts.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub file: Option<PathBuf>,
    pub issues: Vec<Issue>,
    pub stats: ValidationStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    pub errors: usize,
    pub advisories: usize,
    pub components: usize,
    pub wires: usize,
    pub nets: usize,
}

impl ValidationResult {
    /// True when nothing blocks simulation.
    pub fn is_valid(&self) -> bool {
        self.stats.errors == 0
    }

    /// Messages of blocking issues, in report order.
    pub fn violations(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|i| i.is_blocking())
            .map(|i| i.message.clone())
            .collect()
    }

    pub fn total_issues(&self) -> usize {
        self.stats.errors + self.stats.advisories
    }
}

/// Core validation API.
pub struct CircuitGuardCore;

impl CircuitGuardCore {
    pub fn engine(options: &ValidationOptions) -> RulesEngine {
        let mut engine = RulesEngine::with_default_rules();
        if options.strict_unknown_types {
            engine.add_rule(Arc::new(UnknownComponentRule));
        }
        engine
    }

    /// Validate an in-memory snapshot.
    pub fn validate(snapshot: &CircuitSnapshot, options: &ValidationOptions) -> ValidationResult {
        let nets = resolve_nets(&build_nets(&snapshot.components, &snapshot.wires));
        let mut issues = Self::engine(options).analyze_with_nets(&snapshot.components, &nets);
        if !options.include_advisories {
            issues.retain(Issue::is_blocking);
        }

        let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
        let stats = ValidationStats {
            errors,
            advisories: issues.len() - errors,
            components: snapshot.components.len(),
            wires: snapshot.wires.len(),
            nets: nets.net_count(),
        };
        tracing::debug!(
            "Validated {} components: {} errors, {} advisories",
            stats.components,
            stats.errors,
            stats.advisories
        );

        ValidationResult {
            file: None,
            issues,
            stats,
        }
    }

    /// Load a JSON snapshot from disk and validate it.
    pub fn validate_file(
        path: &Path,
        options: &ValidationOptions,
    ) -> Result<ValidationResult, CircuitGuardError> {
        let snapshot = CircuitSnapshot::from_path(path)?;
        let mut result = Self::validate(&snapshot, options);
        result.file = Some(path.to_path_buf());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Component, ComponentKind, Terminal, Wire};

    fn motor_bench() -> CircuitSnapshot {
        CircuitSnapshot {
            components: vec![Component::new("m-1", ComponentKind::DcMotor, "Fan")],
            wires: vec![
                Wire::with_id("w1", Terminal::new("m-1", "t1"), Terminal::board("pin-5")),
                Wire::with_id("w2", Terminal::new("m-1", "t2"), Terminal::board("gnd-1")),
            ],
        }
    }

    #[test]
    fn test_advisory_counts_but_does_not_block() {
        let result = CircuitGuardCore::validate(&motor_bench(), &ValidationOptions::default());
        assert!(result.is_valid());
        assert_eq!(result.stats.advisories, 1);
        assert_eq!(result.total_issues(), 1);
        assert!(result.violations().is_empty());
    }

    #[test]
    fn test_advisories_can_be_dropped() {
        let options = ValidationOptions {
            include_advisories: false,
            ..Default::default()
        };
        let result = CircuitGuardCore::validate(&motor_bench(), &options);
        assert!(result.issues.is_empty());
        assert_eq!(result.stats.nets, 2);
    }

    #[test]
    fn test_strict_mode_reports_unknown_types() {
        let mut snapshot = CircuitSnapshot::new();
        snapshot.components.push(Component::new("x-1", ComponentKind::Unknown, "Gizmo"));

        let lenient = CircuitGuardCore::validate(&snapshot, &ValidationOptions::default());
        assert!(lenient.is_valid());

        let strict = ValidationOptions {
            strict_unknown_types: true,
            ..Default::default()
        };
        let result = CircuitGuardCore::validate(&snapshot, &strict);
        assert!(!result.is_valid());
        assert_eq!(result.violations().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CircuitGuardCore::validate_file(
            Path::new("/nonexistent/circuit.json"),
            &ValidationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CircuitGuardError::Io(_)));
    }
}
