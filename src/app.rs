// Declare modules
pub mod cli;
pub mod config;
pub mod errors;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod vcs;

use anyhow::Context;
use std::env;
use std::io::{self, BufWriter, Write};

use self::cli::{parse_args, ParseOutcome};
use self::config::{load_presets_file, presets_path, resolve_config};
use self::errors::DumpError;
use self::formatter::OutputGenerator;
use self::scanner::Scanner;
use self::vcs::Git;

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<(), DumpError> {
    let program = cli::program_name();

    // 1. Parse Args
    let args = match parse_args(env::args_os()) {
        ParseOutcome::Run(args) => args,
        ParseOutcome::Help { diagnostic } => return show_help(&program, diagnostic.as_deref()),
    };

    // 2. Identify Working Directory & Project Name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 3. Resolve Configuration
    let presets = load_presets_file(&presets_path()?)?;
    let config = match resolve_config(&args, &presets, project_name) {
        Ok(config) => config,
        Err(err @ DumpError::InvalidPattern { .. }) => {
            return show_help(&program, Some(&err.to_string()))
        }
        Err(err) => return Err(err),
    };

    // 4. Enumerate Tracked Files
    let git = Git::new(current_dir.clone());
    let files = Scanner::new(&git, &config).scan()?;

    // 5. Render
    let stdout = io::stdout();
    let stderr = io::stderr();
    OutputGenerator::new(
        &config,
        &current_dir,
        &program,
        BufWriter::new(stdout.lock()),
        stderr.lock(),
    )
    .render(&files)?;

    Ok(())
}

/// Help is an early exit: usage on stdout, the reason (if any) on stderr.
fn show_help(program: &str, diagnostic: Option<&str>) -> Result<(), DumpError> {
    if let Some(message) = diagnostic {
        eprintln!("{}: {}", program, message);
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(cli::usage(program).as_bytes())?;
    stdout.flush()?;
    Err(DumpError::HelpShown)
}
