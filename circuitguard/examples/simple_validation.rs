//! Simple validation example: validate a circuit snapshot and print results.

use circuitguard::prelude::*;
use std::path::Path;

fn main() -> Result<(), CircuitGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid_blink.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_validation [path/to/circuit.json]");
        std::process::exit(1);
    }

    let result = CircuitGuardCore::validate_file(path, &ValidationOptions::default())?;

    println!("Validation results for: {}", path.display());
    println!("Total issues: {}", result.total_issues());
    println!();

    for issue in &result.issues {
        let tag = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Info => "INFO",
        };
        println!("  [{}] {}", tag, issue.message);
        if let Some(ref suggestion) = issue.suggestion {
            println!("    Suggestion: {}", suggestion);
        }
    }

    if !result.is_valid() {
        println!("\nValidation failed ({} wiring errors).", result.stats.errors);
        std::process::exit(1);
    }

    println!("\nCircuit is ready to simulate.");
    Ok(())
}
