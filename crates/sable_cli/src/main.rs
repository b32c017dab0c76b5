//! sablec: The sable front-end driver.
//!
//! Usage:
//!   sablec [options] <FILE>
//!
//! Lexes and parses one source file, renders its diagnostics, and optionally
//! prints the token stream, the parsed tree or the arena's memory use.

use clap::Parser as ClapParser;
use miette::{IntoDiagnostic, WrapErr};
use sable_core::text::SourceFile;
use sable_diagnostics::{DiagnosticCollection, Renderer};
use sable_options::FrontendConfig;
use sable_parser::Parser;
use sable_scanner::Lexer;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "sablec", version, about = "sable - front end for the sable systems language")]
struct Cli {
    /// Source file to parse.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the token stream instead of parsing.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed expressions as S-expressions.
    #[arg(long)]
    tree: bool,

    /// Print node count and arena memory use after parsing.
    #[arg(long)]
    footprint: bool,

    /// Path to sable.json. Defaults to a sable.json beside FILE.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Never color diagnostics.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Raise log verbosity (-v debug, -vv trace). SABLE_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = run(&cli)?;
    if exit_code != 0 {
        process::exit(exit_code);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SABLE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> miette::Result<i32> {
    let start = Instant::now();

    let config = sable_options::load_config(cli.config.as_deref(), &cli.file)
        .into_diagnostic()
        .wrap_err("failed to load configuration")?;
    let bytes = std::fs::read(&cli.file)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", cli.file.display()))?;
    let file = SourceFile::from_bytes(cli.file.display().to_string(), bytes).into_diagnostic()?;
    tracing::debug!(file = file.name(), lines = file.line_count(), "loaded source");

    let mut diagnostics = DiagnosticCollection::new();
    if cli.tokens {
        print_tokens(&file, &mut diagnostics);
    } else {
        parse_file(cli, &config, &file, &mut diagnostics);
    }

    let use_color = config.color && !cli.no_color && io::stderr().is_terminal();
    print_diagnostics(&diagnostics, &config, use_color);

    let elapsed = start.elapsed();
    if diagnostics.has_errors() {
        let count = diagnostics.error_count();
        let plural = if count == 1 { "" } else { "s" };
        if use_color {
            eprintln!("\n{RED}Found {count} error{plural}.{RESET}");
        } else {
            eprintln!("\nFound {count} error{plural}.");
        }
        return Ok(1);
    }

    if use_color {
        eprintln!("{GRAY}Parsed in {:.2}ms.{RESET}", elapsed.as_secs_f64() * 1000.0);
    }
    Ok(0)
}

fn print_tokens<'src>(file: &'src SourceFile, diagnostics: &mut DiagnosticCollection<'src>) {
    for token in Lexer::new(file, diagnostics) {
        let text = token.text.as_deref().unwrap_or("");
        println!(
            "{}:{}\t{:?}\t{}",
            token.location.line, token.location.column, token.kind, text
        );
    }
}

fn parse_file<'src>(
    cli: &Cli,
    config: &FrontendConfig,
    file: &'src SourceFile,
    diagnostics: &mut DiagnosticCollection<'src>,
) {
    let mut parser = Parser::new(file, diagnostics, config.parse_options());
    if let Err(err) = parser.parse_program() {
        tracing::debug!(%err, "parse stopped");
    }
    let ast = parser.into_ast();

    if cli.tree {
        print!("{}", sable_printer::print_roots(&ast));
    }
    if cli.footprint {
        let footprint = ast.memory_footprint();
        println!(
            "nodes: {}, arena bytes: {} (one-size-fits-all: {})",
            ast.node_count(),
            footprint.actual,
            footprint.naive
        );
    }
}

fn print_diagnostics(diagnostics: &DiagnosticCollection<'_>, config: &FrontendConfig, use_color: bool) {
    let renderer = Renderer::new(use_color);
    let limit = config.max_errors.unwrap_or(usize::MAX);
    let mut out = String::new();
    for diagnostic in diagnostics.diagnostics().iter().take(limit) {
        // Writing into a String cannot fail.
        let _ = renderer.render(diagnostic, &mut out);
    }
    eprint!("{out}");

    let hidden = diagnostics.len().saturating_sub(limit);
    if hidden > 0 {
        eprintln!("... and {hidden} more");
    }
}
