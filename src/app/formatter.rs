use crate::app::errors::DumpError;
use crate::app::models::{FileList, RuntimeConfig, SEPARATOR_WIDTH};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Writes the listing and content report for one run.
///
/// Report text goes to `out`; per-file read failures go to `diag` and do
/// not stop the run.
pub struct OutputGenerator<'a, W: Write, E: Write> {
    config: &'a RuntimeConfig,
    root: &'a Path,
    program: &'a str,
    out: W,
    diag: E,
}

impl<'a, W: Write, E: Write> OutputGenerator<'a, W, E> {
    pub fn new(
        config: &'a RuntimeConfig,
        root: &'a Path,
        program: &'a str,
        out: W,
        diag: E,
    ) -> Self {
        Self {
            config,
            root,
            program,
            out,
            diag,
        }
    }

    /// Returns how many files were actually rendered.
    pub fn render(&mut self, files: &FileList) -> Result<usize, DumpError> {
        self.write_listing(files)?;
        let processed = self.write_contents(files)?;
        self.write_footer(processed)?;
        self.out.flush()?;
        Ok(processed)
    }

    fn write_listing(&mut self, files: &FileList) -> io::Result<()> {
        writeln!(self.out, "=== Files matching pattern: {} ===", self.config.pattern)?;
        writeln!(self.out)?;
        for path in files.iter() {
            writeln!(self.out, "{}", Path::new(path).display())?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", separator())?;
        writeln!(self.out)
    }

    fn write_contents(&mut self, files: &FileList) -> Result<usize, DumpError> {
        let numbering = if self.config.show_line_numbers { "on" } else { "off" };
        writeln!(
            self.out,
            "=== File contents (line numbers: {}, pattern: {}) ===",
            numbering, self.config.pattern
        )?;
        writeln!(self.out)?;

        let mut processed = 0;
        for path in files.iter() {
            let full_path = self.root.join(path);
            if !is_regular_file(&full_path) {
                log::debug!("skipping {:?}: not a regular file", path);
                continue;
            }
            processed += 1;

            match self.write_file(path, &full_path) {
                Ok(()) => {}
                Err(err @ DumpError::FileRead { .. }) => {
                    // Keep the file header ahead of the diagnostic.
                    self.out.flush()?;
                    writeln!(self.diag, "{}: {}", self.program, err)?;
                }
                Err(err) => return Err(err),
            }
            writeln!(self.out)?;
        }

        Ok(processed)
    }

    fn write_file(&mut self, path: &OsStr, full_path: &Path) -> Result<(), DumpError> {
        let separator = separator();
        writeln!(self.out, "{}", separator)?;
        writeln!(self.out, "{}:", Path::new(path).display())?;
        writeln!(self.out, "{}", separator)?;

        let file = File::open(full_path).map_err(read_error(path))?;
        self.stream(path, BufReader::new(file))
    }

    fn stream<R: BufRead>(&mut self, path: &OsStr, mut reader: R) -> Result<(), DumpError> {
        if self.config.show_line_numbers {
            let mut line = Vec::new();
            let mut number = 0usize;
            loop {
                line.clear();
                if reader.read_until(b'\n', &mut line).map_err(read_error(path))? == 0 {
                    break;
                }
                number += 1;
                let text = line.strip_suffix(b"\n").unwrap_or(&line);
                write!(self.out, "{:>4} | ", number)?;
                self.out.write_all(text)?;
                self.out.write_all(b"\n")?;
            }
        } else {
            loop {
                let chunk = match reader.fill_buf() {
                    Ok(chunk) => chunk,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(read_error(path)(err)),
                };
                if chunk.is_empty() {
                    break;
                }
                let len = chunk.len();
                self.out.write_all(chunk)?;
                reader.consume(len);
            }
        }
        Ok(())
    }

    fn write_footer(&mut self, processed: usize) -> io::Result<()> {
        if processed == 0 {
            writeln!(self.out, "No files matched pattern: {}", self.config.pattern)?;
        }
        writeln!(self.out, "=== End of listing ===")
    }
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Follows symlinks, like `test -f`.
fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

fn read_error(path: &OsStr) -> impl Fn(io::Error) -> DumpError + '_ {
    move |source| DumpError::FileRead {
        path: PathBuf::from(path),
        source,
    }
}
