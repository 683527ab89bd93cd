use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    /// Usage text was already printed; nothing left to report.
    #[error("help requested")]
    HelpShown,

    #[error("invalid pattern '{pattern}': {}", regex_reason(.source))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("not inside a git working tree")]
    NotWorkingTree,

    #[error("cannot read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// regex syntax errors span several lines; the last one carries the reason.
fn regex_reason(err: &regex::Error) -> String {
    let rendered = err.to_string();
    let last = rendered.lines().last().unwrap_or_default().trim();
    last.strip_prefix("error: ").unwrap_or(last).to_string()
}

impl DumpError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::HelpShown | Self::InvalidPattern { .. } => 1,
            Self::NotWorkingTree => 2,
            Self::Io(err) if err.kind() == io::ErrorKind::BrokenPipe => 0,
            Self::FileRead { .. } | Self::Io(_) | Self::Other(_) => 3,
        }
    }

    /// Whether `main` still has something to say on stderr.
    pub fn is_reportable(&self) -> bool {
        self.exit_code() > 1
    }
}
