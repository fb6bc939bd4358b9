mod tar_gz;
mod zip;

use crate::asset::AssetKind;
use crate::error::ProvisionError;
use crate::platform::BINARY_NAME;
use crate::runtime::{EXECUTABLE_MODE, Runtime};
use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

pub use tar_gz::TarGzExtractor;
pub use zip::ZipExtractor;

/// A single archive format
pub trait FormatExtractor: Send + Sync {
    /// Short name shown in diagnostics.
    fn tool(&self) -> &'static str;

    /// Unpack `archive_path` into the existing directory `extract_to`.
    fn unpack<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Expands a downloaded asset into the vendor directory
#[cfg_attr(test, mockall::automock)]
pub trait Extractor: Send + Sync {
    /// Extract `archive_path` of the given kind into `extract_to`, creating it
    /// if needed. `Direct` assets need no extraction and are left untouched.
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        kind: AssetKind,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the extractor matching the asset kind.
pub struct ArchiveExtractor {
    tar_gz: TarGzExtractor,
    zip: ZipExtractor,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
            zip: ZipExtractor,
        }
    }
}

impl Extractor for ArchiveExtractor {
    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        kind: AssetKind,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        match kind {
            AssetKind::TarGz => unpack_with(&self.tar_gz, runtime, archive_path, extract_to),
            AssetKind::Zip => unpack_with(&self.zip, runtime, archive_path, extract_to),
            AssetKind::Direct => {
                debug!("{:?} is not an archive, nothing to extract", archive_path);
                Ok(())
            }
        }
    }
}

fn unpack_with<E: FormatExtractor, R: Runtime + 'static>(
    extractor: &E,
    runtime: &R,
    archive_path: &Path,
    extract_to: &Path,
) -> Result<()> {
    runtime.create_dir_all(extract_to)?;
    extractor
        .unpack(runtime, archive_path, extract_to)
        .map_err(|e| ProvisionError::Extraction {
            tool: extractor.tool(),
            archive: archive_path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;
    Ok(())
}

/// Restore the execute bit on the binary at its conventional location.
///
/// Archives do not reliably carry permission bits across every transport, so
/// the first of `bin/<name>`, `<name>`, `bin/<name>.exe`, `<name>.exe` that
/// exists is made executable. Returns the path that was touched, if any.
pub fn mark_executable<R: Runtime>(runtime: &R, root: &Path) -> Result<Option<PathBuf>> {
    let exe_name = format!("{}.exe", BINARY_NAME);
    let candidates = [
        root.join("bin").join(BINARY_NAME),
        root.join(BINARY_NAME),
        root.join("bin").join(&exe_name),
        root.join(&exe_name),
    ];

    let Some(found) = candidates.into_iter().find(|p| runtime.is_file(p)) else {
        debug!("No binary at a conventional location under {:?}", root);
        return Ok(None);
    };

    debug!("Setting executable permission on {:?}", found);
    runtime.set_permissions(&found, EXECUTABLE_MODE)?;
    Ok(Some(found))
}
