//! JSON:API Fixture CLI
//!
//! Command-line interface for rendering and checking fixture documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsonapi_fixture::{
    error_document, lint, load_descriptor, load_json_auto, render, validate_document,
    FileStatus, LintResult, RenderMode, RenderOptions, Severity, ValidateError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonapi-fixture")]
#[command(about = "Render and check JSON:API response fixtures")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render JSON records into a resource or collection document
    Render {
        /// Records source: file path or URL (http:// or https://)
        records: String,

        /// Mapping descriptor: file path or URL
        #[arg(long, short)]
        descriptor: String,

        /// Render a collection document (records must be an array)
        #[arg(long)]
        list: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print an error document
    Error {
        /// HTTP status code echoed in the document
        #[arg(long)]
        status: u16,

        /// Error detail text
        #[arg(long)]
        detail: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check that a document has one of the emitted wire shapes
    Validate {
        /// Document source: file path or URL
        document: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Lint descriptor files for annotations the mapper would ignore
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            records,
            descriptor,
            list,
            output,
            pretty,
        } => run_render(&records, &descriptor, list, output, pretty),

        Commands::Error {
            status,
            detail,
            pretty,
        } => run_error(status, &detail, pretty),

        Commands::Validate { document, json } => run_validate(&document, json),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Log to stderr; `-v` overrides `RUST_LOG`, which overrides the `warn` default.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_render(
    records_source: &str,
    descriptor_source: &str,
    list: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let descriptor = load_descriptor(descriptor_source).map_err(|e| {
        eprintln!("Error: loading descriptor: {}", e);
        e.exit_code() as u8
    })?;

    let records = load_json_auto(records_source).map_err(|e| {
        eprintln!("Error: loading records: {}", e);
        e.exit_code() as u8
    })?;

    let options = RenderOptions::new(RenderMode::from_list_flag(list)).pretty(pretty);
    let document = render(&records, &descriptor, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    write_output(&document, output)
}

fn run_error(status: u16, detail: &str, pretty: bool) -> Result<(), u8> {
    let document = error_document(status, detail);
    let encoded = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    println!("{}", encoded);
    Ok(())
}

fn write_output(content: &str, output: Option<PathBuf>) -> Result<(), u8> {
    match output {
        Some(path) => {
            std::fs::write(&path, content).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            tracing::debug!(path = %path.display(), "document written");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn run_validate(source: &str, json_output: bool) -> Result<(), u8> {
    let document = load_json_auto(source).map_err(|e| {
        report_error(json_output, &format!("loading document: {}", e));
        e.exit_code() as u8
    })?;

    match validate_document(&document) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!(
            "{}",
            serde_json::json!({ "valid": false, "error": msg })
        );
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);

    if format == "json" {
        let encoded = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", encoded);
    } else {
        print_lint_report(&result, quiet);
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

/// Text report: one line per descriptor file, its diagnostics, then a summary.
/// Quiet mode keeps failing files and error diagnostics only.
fn print_lint_report(result: &LintResult, quiet: bool) {
    if !quiet {
        println!("Linting {} ...\n", result.path.display());
    }

    for file in &result.results {
        if quiet && file.status == FileStatus::Ok {
            continue;
        }
        let marker = match file.status {
            FileStatus::Ok => "\x1b[32m✓\x1b[0m",
            FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
            FileStatus::Error => "\x1b[31m✗\x1b[0m",
        };
        println!("  {} {}", marker, file.file.display());

        for diag in file
            .diagnostics
            .iter()
            .filter(|d| !quiet || d.severity == Severity::Error)
        {
            let (color, label) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            println!(
                "    {}{}[{}]\x1b[0m: {} - {}",
                color, label, diag.code, diag.path, diag.message
            );
        }
    }

    println!();
    if result.is_ok() {
        println!(
            "\x1b[32m✓ {} descriptor files checked, all passed\x1b[0m",
            result.files_checked
        );
    } else {
        println!(
            "\x1b[31m✗ {} descriptor files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
            result.files_checked, result.passed, result.failed, result.errors, result.warnings
        );
    }
}
