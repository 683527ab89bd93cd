use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Source of tracked paths. Anything that can answer these two questions
/// can stand in for git.
pub trait VersionControl {
    fn is_working_tree(&self) -> bool;

    /// Tracked paths relative to the working directory, in whatever order
    /// the backend reports them. Names are kept byte-for-byte.
    fn tracked_files(&self) -> Result<Vec<OsString>>;
}

pub struct Git {
    workdir: PathBuf,
    ceiling: Option<PathBuf>,
}

impl Git {
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            workdir,
            ceiling: None,
        }
    }

    /// Stop git's repository discovery at `dir`.
    #[cfg(test)]
    fn with_ceiling(mut self, dir: PathBuf) -> Self {
        self.ceiling = Some(dir);
        self
    }

    fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        log::debug!("running git {} in {:?}", args.join(" "), self.workdir);
        let mut command = Command::new("git");
        command.args(args).current_dir(&self.workdir);
        if let Some(ceiling) = &self.ceiling {
            command.env("GIT_CEILING_DIRECTORIES", ceiling);
        }
        command.output()
    }
}

impl VersionControl for Git {
    fn is_working_tree(&self) -> bool {
        match self.run(&["rev-parse", "--is-inside-work-tree"]) {
            Ok(output) => {
                output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
            }
            Err(err) => {
                log::debug!("could not run git: {}", err);
                false
            }
        }
    }

    fn tracked_files(&self) -> Result<Vec<OsString>> {
        let output = self
            .run(&["ls-files", "-z"])
            .context("Failed to run git ls-files")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git ls-files failed: {}", stderr.trim());
        }

        Ok(split_nul(&output.stdout))
    }
}

/// `-z` output: NUL-terminated, unquoted paths.
fn split_nul(stdout: &[u8]) -> Vec<OsString> {
    stdout
        .split(|&b| b == 0)
        .filter(|entry| !entry.is_empty())
        .map(os_string_from_bytes)
        .collect()
}

#[cfg(unix)]
fn os_string_from_bytes(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    std::ffi::OsStr::from_bytes(bytes).to_os_string()
}

// git on Windows emits UTF-8 paths.
#[cfg(not(unix))]
fn os_string_from_bytes(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}
