//! Export formats and download persistence.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
        }
    }

    /// Server endpoint serving this format
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Csv => "/export",
            Self::Excel => "/export-excel",
        }
    }

    /// Fixed download filename per format
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "college_results.csv",
            Self::Excel => "college_results.xlsx",
        }
    }
}

/// Write an export payload into the download directory under the format's
/// fixed filename. The payload lands in a temp file first; persisting renames
/// it into place and a failure drops the temp file on the way out.
pub fn save_download(dir: &Path, format: ExportFormat, payload: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(payload)?;
    temp.flush()?;

    let dest = dir.join(format.file_name());
    temp.persist(&dest)
        .map_err(|e| eyre!("could not save export to {}: {}", dest.display(), e.error))?;
    Ok(dest)
}
