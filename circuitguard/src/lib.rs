//! CircuitGuard - wiring validation for a virtual Arduino workbench
//!
//! This library checks whether a circuit built from an Arduino Uno, discrete
//! components and point-to-point wires is electrically sound before it is
//! simulated: it resolves the wires and breadboard buses into nets and
//! applies a wiring rule to every placed component.
//!
//! # Quick Start
//!
//! ```no_run
//! use circuitguard::{CircuitGuardCore, ValidationOptions};
//! use std::path::Path;
//!
//! let options = ValidationOptions::default();
//! let result = CircuitGuardCore::validate_file(
//!     Path::new("circuit.json"),
//!     &options,
//! ).unwrap();
//!
//! for issue in &result.issues {
//!     println!("{:?}: {}", issue.severity, issue.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Net resolution**: wires plus breadboard rail and strip ties
//! - **Rule catalogue**: one declarative wiring rule per component type
//! - **Solution generation**: validation-gated Gemini client (used by the CLI)

pub mod ai;
pub mod analyzer;
pub mod board;
pub mod core;
pub mod netlist;
pub mod parser;

// Re-export main types
pub use analyzer::rules::{check_circuit, Issue, RulesEngine, Severity};
pub use board::{classify_pin, PinRole};
pub use core::{
    CircuitGuardCore, CircuitGuardError, ValidationOptions, ValidationResult, ValidationStats,
};
pub use netlist::{build_nets, resolve_nets, NetGraph, NetMap};
pub use parser::schema::{Component, ComponentKind, ComponentState, Terminal, Wire, BOARD_ID};
pub use parser::snapshot::CircuitSnapshot;

/// Load a JSON snapshot (convenience wrapper).
pub fn load_snapshot(path: &std::path::Path) -> Result<CircuitSnapshot, CircuitGuardError> {
    CircuitSnapshot::from_path(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        check_circuit, CircuitGuardCore, CircuitGuardError, CircuitSnapshot, Component,
        ComponentKind, Issue, Severity, Terminal, ValidationOptions, ValidationResult, Wire,
    };
}
