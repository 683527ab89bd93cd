//! repo-dump: print the git-tracked files matching a pattern, followed by
//! their contents.

mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::init_logging();

    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.is_reportable() {
                eprintln!("{}: fatal: {:#}", app::cli::program_name(), err);
            }
            ExitCode::from(err.exit_code())
        }
    }
}
