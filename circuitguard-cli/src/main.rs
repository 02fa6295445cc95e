//! CircuitGuard CLI - Arduino breadboard wiring validation from the command line.

use anyhow::{Context, Result};
use circuitguard::ai::{
    describe_circuit, summarize_components, GeminiClient, GenerationConfig, GenerationError,
    Solution, SolutionGenerator,
};
use circuitguard::analyzer::catalogue::CATALOGUE;
use circuitguard::board::{classify_pin, UNO_PINS};
use circuitguard::parser::pinout::{
    PROTOBOARD_COLUMNS, PROTOBOARD_RAILS, PROTOBOARD_RAIL_POSITIONS, PROTOBOARD_STRIP_GROUPS,
};
use circuitguard::{
    check_circuit, CircuitGuardCore, CircuitSnapshot, ComponentKind, Issue, Severity,
    ValidationOptions, ValidationResult,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name = "circuitguard")]
#[command(about = "Arduino breadboard wiring validation tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Log library activity to stderr
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a circuit snapshot
    Check {
        /// Path to a circuit .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Report components of unknown type
        #[arg(long)]
        strict: bool,

        /// Leave informational advisories out of the report
        #[arg(long)]
        no_advisories: bool,
    },

    /// List the wiring rule catalogue
    Rules {
        /// Show detailed rule descriptions
        #[arg(short, long)]
        verbose: bool,
    },

    /// List terminal names of a component type, or the board pins
    Terminals {
        /// Component type tag (e.g. led, servo, protoboard)
        #[arg(value_name = "TYPE")]
        kind: Option<String>,
    },

    /// Print the wiring description sent to the generator
    Describe {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate, then ask Gemini for wiring instructions and a sketch
    Generate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// What the project should do
        #[arg(short, long)]
        prompt: String,

        /// Model name override
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            strict,
            no_advisories,
        } => handle_check(&file, format, strict, no_advisories),
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            0
        }
        Commands::Terminals { kind } => handle_terminals(kind.as_deref()),
        Commands::Describe { file } => handle_describe(&file),
        Commands::Generate {
            file,
            prompt,
            model,
        } => handle_generate(&file, &prompt, model),
    };

    process::exit(exit_code);
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(file: &Path) -> Result<CircuitSnapshot> {
    CircuitSnapshot::from_path(file)
        .with_context(|| format!("failed to load circuit from {}", file.display()))
}

fn handle_check(file: &Path, format: OutputFormat, strict: bool, no_advisories: bool) -> i32 {
    let options = ValidationOptions {
        strict_unknown_types: strict,
        include_advisories: !no_advisories,
    };

    let result = load(file).map(|snapshot| {
        let mut result = CircuitGuardCore::validate(&snapshot, &options);
        result.file = Some(file.to_path_buf());
        result
    });

    match result {
        Ok(validation) => {
            output_result(&validation, &format);
            if validation.is_valid() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn output_result(result: &ValidationResult, format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(result),
        OutputFormat::Json => output_json(result),
        OutputFormat::Github => output_github(result),
    }
}

fn file_name(result: &ValidationResult) -> String {
    result
        .file
        .as_ref()
        .map(|f| f.display().to_string())
        .unwrap_or_else(|| "<snapshot>".to_string())
}

fn output_human(result: &ValidationResult) {
    println!("\nFile: {}", file_name(result));
    println!("{}", "─".repeat(60));

    if result.total_issues() == 0 {
        println!("  No issues found");
        return;
    }

    let errors: Vec<_> = result
        .issues
        .iter()
        .filter(|i| matches!(i.severity, Severity::Error))
        .collect();
    let advisories: Vec<_> = result
        .issues
        .iter()
        .filter(|i| matches!(i.severity, Severity::Info))
        .collect();

    if !errors.is_empty() {
        println!("\n  ERRORS:");
        for issue in errors {
            println!("    - {}", issue.message);
            if let Some(ref suggestion) = issue.suggestion {
                println!("      Suggestion: {}", suggestion);
            }
        }
    }
    if !advisories.is_empty() {
        println!("\n  ADVISORIES:");
        for issue in advisories {
            println!("    - {}", issue.message);
        }
    }

    println!("\n  Summary:");
    println!("    Errors:     {}", result.stats.errors);
    println!("    Advisories: {}", result.stats.advisories);
}

fn output_json(result: &ValidationResult) {
    let output = serde_json::json!({
        "file": file_name(result),
        "valid": result.is_valid(),
        "issues": result.issues,
        "stats": result.stats,
    });
    println!("{:#}", output);
}

fn severity_to_github(issue: &Issue) -> &'static str {
    match issue.severity {
        Severity::Error => "error",
        Severity::Info => "notice",
    }
}

fn output_github(result: &ValidationResult) {
    for issue in &result.issues {
        println!(
            "::{} file={}::{}",
            severity_to_github(issue),
            file_name(result),
            issue.message.replace('\n', " ")
        );
    }
}

fn handle_rules(verbose: bool) {
    println!("Available wiring rules:\n");

    for rule in CATALOGUE {
        println!("  {}", rule.rule_id);
        println!("    {}", rule.name);
        if verbose {
            println!("    {}", rule.description);
            if let Some(note) = rule.advisory {
                println!("    Note: {}", note);
            }
        }
        println!();
    }
}

fn handle_terminals(kind: Option<&str>) -> i32 {
    let Some(tag) = kind else {
        print_board_pins();
        println!("\nComponent types:");
        for kind in ComponentKind::ALL {
            println!("  {}", kind);
        }
        return 0;
    };

    let kind: ComponentKind = match tag.parse() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("{} ({}):", kind, kind.display_name());
    if kind.is_bus() {
        println!(
            "  rails: {} (rail-<name>-1 .. rail-<name>-{})",
            PROTOBOARD_RAILS.join(", "),
            PROTOBOARD_RAIL_POSITIONS
        );
        for rows in PROTOBOARD_STRIP_GROUPS {
            let first = rows.first().copied().unwrap_or('a');
            let last = rows.last().copied().unwrap_or('a');
            println!(
                "  strips: rows {}-{}, columns 1-{} (e.g. {}1)",
                first, last, PROTOBOARD_COLUMNS, first
            );
        }
    } else {
        println!("  {}", kind.terminals().join(", "));
    }
    0
}

fn print_board_pins() {
    println!("Board pins (component id \"{}\"):", circuitguard::BOARD_ID);
    for pin in UNO_PINS {
        let role = classify_pin(pin.id)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<8} {:<8} {}", pin.id, pin.label, role);
    }
}

fn handle_describe(file: &Path) -> i32 {
    match load(file) {
        Ok(snapshot) => {
            println!(
                "Components: {}",
                summarize_components(&snapshot.components)
            );
            println!("{}", describe_circuit(&snapshot.components, &snapshot.wires));
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn handle_generate(file: &Path, prompt: &str, model: Option<String>) -> i32 {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return 1;
        }
    };

    match runtime.block_on(generate(file, prompt, model)) {
        Ok(solution) => {
            println!("### Wiring Instructions\n{}\n", solution.wiring);
            println!("### Arduino Code\n```cpp\n{}\n```", solution.code);
            0
        }
        Err(e) => {
            if let Some(GenerationError::CircuitInvalid(violations)) =
                e.downcast_ref::<GenerationError>()
            {
                eprintln!("Error: the circuit has wiring problems:");
                for violation in violations {
                    eprintln!("  - {}", violation);
                }
            } else {
                eprintln!("Error: {:#}", e);
            }
            1
        }
    }
}

async fn generate(file: &Path, prompt: &str, model: Option<String>) -> Result<Solution> {
    let snapshot = load(file)?;
    let violations = check_circuit(&snapshot.components, &snapshot.wires);
    if !violations.is_empty() {
        return Err(GenerationError::CircuitInvalid(violations).into());
    }

    let mut config = GenerationConfig::from_env()
        .context("set GEMINI_API_KEY (or API_KEY) to use generation")?;
    if let Some(model) = model {
        config = config.with_model(model);
    }

    let generator = SolutionGenerator::new(Arc::new(GeminiClient::new(config)));
    let solution = generator.generate(prompt, &snapshot).await?;
    Ok(solution)
}
