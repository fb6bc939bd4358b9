use crate::runtime::Runtime;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, info};
use std::path::Path;
use tar::Archive;

use super::FormatExtractor;

/// Extractor for .tar.gz archives
pub struct TarGzExtractor;

impl FormatExtractor for TarGzExtractor {
    fn tool(&self) -> &'static str {
        "tar.gz"
    }

    fn unpack<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tar.gz archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        let mut archive = Archive::new(GzDecoder::new(file));
        archive.set_preserve_permissions(true);
        archive.set_overwrite(true);

        // `unpack` refuses entries that would escape `extract_to`.
        archive
            .unpack(extract_to)
            .with_context(|| format!("Failed to unpack {:?}", archive_path))?;

        info!("Extraction complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs::{self, File};
    use tar::Builder;
    use tempfile::tempdir;

    fn create_test_archive(path: &Path, files: &[(&str, &str, u32)]) -> Result<()> {
        let file = File::create(path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(enc);

        for (name, content, mode) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(name)?;
            header.set_size(content.len() as u64);
            header.set_mode(*mode);
            header.set_cksum();
            tar.append(&header, content.as_bytes())?;
        }

        tar.into_inner()?.finish()?;
        Ok(())
    }

    #[test]
    fn test_tool_name() {
        assert_eq!(TarGzExtractor.tool(), "tar.gz");
    }

    #[test]
    fn test_extract_keeps_layout() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("test.tar.gz");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;

        create_test_archive(
            &archive_path,
            &[
                ("metasweep-1.0.0/bin/metasweep", "binary", 0o755),
                ("metasweep-1.0.0/README.md", "docs", 0o644),
            ],
        )?;

        TarGzExtractor.unpack(&RealRuntime, &archive_path, &extract_path)?;

        assert_eq!(
            fs::read_to_string(extract_path.join("metasweep-1.0.0/bin/metasweep"))?,
            "binary"
        );
        assert!(extract_path.join("metasweep-1.0.0/README.md").is_file());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_preserves_execute_bits() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let archive_path = dir.path().join("test.tar.gz");
        let extract_path = dir.path().join("extracted");
        fs::create_dir(&extract_path)?;

        create_test_archive(&archive_path, &[("bin/metasweep", "binary", 0o755)])?;
        TarGzExtractor.unpack(&RealRuntime, &archive_path, &extract_path)?;

        let mode = fs::metadata(extract_path.join("bin/metasweep"))?
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
        Ok(())
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let dir = tempdir().unwrap();
        let result = TarGzExtractor.unpack(
            &RealRuntime,
            &dir.path().join("absent.tar.gz"),
            dir.path(),
        );
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to open archive")
        );
    }
}
