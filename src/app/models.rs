use regex::bytes::Regex;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};

/// Filter applied when neither `-p` nor a preset names one.
pub const DEFAULT_PATTERN: &str = r"\.(kt|java)$";

/// Width of the dashed separator line.
pub const SEPARATOR_WIDTH: usize = 80;

/// The final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub show_line_numbers: bool,
    pub pattern: String,
    pub filter: Regex,
}

impl RuntimeConfig {
    pub fn matches(&self, path: &OsStr) -> bool {
        self.filter.is_match(&path_bytes(path))
    }
}

/// Raw bytes of a path as git reported it.
#[cfg(unix)]
pub fn path_bytes(path: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_bytes())
}

#[cfg(not(unix))]
pub fn path_bytes(path: &OsStr) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// Tracked paths that survived the filter, sorted by raw bytes and
/// deduplicated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileList {
    paths: Vec<OsString>,
}

impl FileList {
    pub fn new(mut paths: Vec<OsString>) -> Self {
        paths.sort_by(|a, b| path_bytes(a).cmp(&path_bytes(b)));
        paths.dedup();
        Self { paths }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OsStr> {
        self.paths.iter().map(OsString::as_os_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}
