//! Day file naming, resume check and atomic commit.

use chrono::NaiveDate;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tickday_types::Tick;
use tracing::{debug, warn};

use crate::{FormatError, OutputFormat, write_ticks};

/// Where one day's output goes and in which format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    path: PathBuf,
    format: OutputFormat,
}

impl OutputTarget {
    /// Creates a target for an explicit path.
    #[must_use]
    pub const fn new(path: PathBuf, format: OutputFormat) -> Self {
        Self { path, format }
    }

    /// Creates the target for one instrument-day:
    /// `{dir}/{stem}_ticks_{YYYY-MM-DD}.{ext}`.
    #[must_use]
    pub fn for_day(dir: &Path, stem: &str, date: NaiveDate, format: OutputFormat) -> Self {
        let name = format!("{stem}_ticks_{}.{}", date.format("%Y-%m-%d"), format.extension());
        Self::new(dir.join(name), format)
    }

    /// Final path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Returns true if a committed file already exists at the final path.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Temporary path used while writing: the final name plus `.tmp`.
    #[must_use]
    pub fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.path)
    }

    /// Serializes `ticks` and commits them atomically.
    ///
    /// Text formats render prices with `decimals` places.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is unavailable or any write, sync or
    /// rename fails; the final path is then untouched and the temporary file
    /// removed.
    pub fn commit(&self, ticks: &[Tick], decimals: usize) -> Result<(), FormatError> {
        self.format.ensure_available()?;
        write_atomic(&self.path, |writer| {
            write_ticks(self.format, ticks, writer, decimals)
        })
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Removes the temporary file on drop unless the commit went through.
struct TempGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl Drop for TempGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.path.exists() {
            if let Err(e) = fs::remove_file(self.path) {
                warn!(path = %self.path.display(), error = %e, "failed to remove temporary file");
            }
        }
    }
}

/// Writes a file through a temporary sibling and renames it into place.
///
/// `write` receives a buffered writer on `{path}.tmp`. Only when it returns
/// `Ok` and the data has been flushed and synced is the temporary renamed to
/// `path`. On any failure the temporary is deleted and `path` is left as it
/// was.
///
/// # Errors
///
/// Returns the error from `write`, or the I/O error from create, flush,
/// sync or rename.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), FormatError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), FormatError>,
{
    let temp = temp_path_for(path);
    let mut guard = TempGuard {
        path: &temp,
        armed: true,
    };

    let mut writer = BufWriter::new(File::create(&temp)?);
    write(&mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp, path)?;
    guard.armed = false;
    debug!(path = %path.display(), "committed output file");
    Ok(())
}
