use std::ffi::OsString;
use std::path::Path;

use clap::error::ErrorKind;
use clap::Parser;

use crate::app::models::DEFAULT_PATTERN;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Print the git-tracked files matching a pattern, then their contents",
    disable_help_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// Prefix every content line with its line number
    #[arg(short = 'n')]
    pub line_numbers: bool,

    /// Extended regular expression matched against tracked paths
    #[arg(short = 'p', value_name = "PATTERN", allow_hyphen_values = true)]
    pub pattern: Option<String>,

    /// Show usage and exit
    #[arg(short = 'h')]
    pub help: bool,
}

#[derive(Debug)]
pub enum ParseOutcome {
    Run(Cli),
    /// Usage must be shown; `diagnostic` is set when the arguments were bad.
    Help { diagnostic: Option<String> },
}

pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) if cli.help => ParseOutcome::Help { diagnostic: None },
        Ok(cli) => ParseOutcome::Run(cli),
        Err(err) if err.kind() == ErrorKind::DisplayVersion => err.exit(),
        Err(err) => ParseOutcome::Help {
            diagnostic: Some(first_line(&err.to_string())),
        },
    }
}

/// clap renders multi-line errors; keep the reason only.
fn first_line(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or_default().trim();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

/// Name the binary was invoked as, for diagnostics and usage.
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

pub fn usage(program: &str) -> String {
    format!(
        "\
Usage: {program} [-n] [-p PATTERN] [-h]

Lists the git-tracked files whose path matches PATTERN, then prints each one.

Options:
  -n          Prefix every content line with its line number
  -p PATTERN  Extended regular expression matched against tracked paths
              (default: {DEFAULT_PATTERN})
  -h          Show this help and exit

Examples:
  {program}                          # Kotlin and Java sources
  {program} -n                       # same, with line numbers
  {program} -p '\\.md$'               # Markdown files
  {program} -n -p '^src/.*\\.rs$'     # Rust sources under src/, numbered
"
    )
}
