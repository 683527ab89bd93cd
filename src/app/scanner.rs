use crate::app::errors::DumpError;
use crate::app::models::{FileList, RuntimeConfig};
use crate::app::vcs::VersionControl;
use std::ffi::OsString;

pub struct Scanner<'a, V: VersionControl> {
    vcs: &'a V,
    config: &'a RuntimeConfig,
}

impl<'a, V: VersionControl> Scanner<'a, V> {
    pub fn new(vcs: &'a V, config: &'a RuntimeConfig) -> Self {
        Self { vcs, config }
    }

    /// Tracked paths matching the configured pattern, sorted by byte order.
    /// An empty result is not an error.
    pub fn scan(&self) -> Result<FileList, DumpError> {
        if !self.vcs.is_working_tree() {
            return Err(DumpError::NotWorkingTree);
        }

        let tracked = self.vcs.tracked_files()?;
        let total = tracked.len();

        let matched: Vec<OsString> = tracked
            .into_iter()
            .filter(|path| self.config.matches(path))
            .collect();
        let files = FileList::new(matched);

        log::info!(
            "{} of {} tracked files match '{}'",
            files.len(),
            total,
            self.config.pattern
        );
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use crate::app::models::DEFAULT_PATTERN;
    use regex::bytes::Regex;

    struct FakeRepo {
        inside: bool,
        files: Vec<&'static str>,
    }

    impl VersionControl for FakeRepo {
        fn is_working_tree(&self) -> bool {
            self.inside
        }

        fn tracked_files(&self) -> Result<Vec<OsString>> {
            Ok(self.files.iter().map(OsString::from).collect())
        }
    }

    fn config(pattern: &str) -> RuntimeConfig {
        RuntimeConfig {
            show_line_numbers: false,
            pattern: pattern.to_string(),
            filter: Regex::new(pattern).unwrap(),
        }
    }

    fn scan(repo: &FakeRepo, pattern: &str) -> Vec<String> {
        let config = config(pattern);
        Scanner::new(repo, &config)
            .scan()
            .unwrap()
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_pattern_keeps_kotlin_and_java() {
        let repo = FakeRepo {
            inside: true,
            files: vec!["c.txt", "b.java", "a.kt"],
        };
        assert_eq!(scan(&repo, DEFAULT_PATTERN), ["a.kt", "b.java"]);
    }

    #[test]
    fn pattern_matches_anywhere_unless_anchored() {
        let repo = FakeRepo {
            inside: true,
            files: vec!["docs/src/x.md", "src/y.md", "lib/src.rs"],
        };
        assert_eq!(scan(&repo, "src"), ["docs/src/x.md", "lib/src.rs", "src/y.md"]);
        assert_eq!(scan(&repo, "^src/"), ["src/y.md"]);
    }

    #[test]
    fn duplicates_from_the_index_are_collapsed() {
        let repo = FakeRepo {
            inside: true,
            files: vec!["Main.kt", "Main.kt", "Main.kt"],
        };
        assert_eq!(scan(&repo, r"\.kt$"), ["Main.kt"]);
    }

    #[test]
    fn no_match_is_an_empty_list() {
        let repo = FakeRepo {
            inside: true,
            files: vec!["a.kt"],
        };
        assert!(scan(&repo, r"\.zig$").is_empty());
    }

    #[test]
    fn outside_a_working_tree_is_fatal() {
        let repo = FakeRepo {
            inside: false,
            files: vec!["a.kt"],
        };
        let config = config(r"\.kt$");
        let err = Scanner::new(&repo, &config).scan().unwrap_err();
        assert!(matches!(err, DumpError::NotWorkingTree));
    }
}
