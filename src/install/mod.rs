use anyhow::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::{
    LOG_TAG,
    archive::{Extractor, mark_executable},
    asset::{AssetKind, AssetRef, build_plan},
    download::Downloader,
    error::ProvisionError,
    http::SchemePolicy,
    locate::locate,
    platform::Platform,
    runtime::{EXECUTABLE_MODE, Runtime},
};

pub mod config;

pub use config::{Config, InstallSettings};

/// How an install run ended
#[derive(Debug, Clone, PartialEq)]
pub enum InstallOutcome {
    /// The binary is in place and was located at this path.
    Installed { binary: PathBuf },
    /// No prebuilt artifact exists for this platform; nothing was written.
    Skipped { platform: Platform },
}

/// Install using the real filesystem and network.
#[tracing::instrument]
pub async fn install(settings: &InstallSettings, policy: SchemePolicy) -> Result<InstallOutcome> {
    let config = Config::new(policy)?;
    Installer::from_config(config).install(settings).await
}

pub struct Installer<R: Runtime, D: Downloader, E: Extractor> {
    pub runtime: R,
    pub downloader: D,
    pub extractor: E,
}

impl<R: Runtime + 'static, D: Downloader, E: Extractor> Installer<R, D, E> {
    pub fn new(runtime: R, downloader: D, extractor: E) -> Self {
        Self {
            runtime,
            downloader,
            extractor,
        }
    }

    pub fn from_config(config: Config<R, D, E>) -> Self {
        Self::new(config.runtime, config.downloader, config.extractor)
    }

    /// Resolve the plan, fetch and unpack the asset, then verify the binary
    /// can be located.
    #[tracing::instrument(skip(self))]
    pub async fn install(&self, settings: &InstallSettings) -> Result<InstallOutcome> {
        let key = settings.platform.key();
        let Some(plan) = build_plan(&settings.plan_request(key))? else {
            println!(
                "{} No prebuilt binary plan for {}. Skipping.",
                LOG_TAG, settings.platform
            );
            return Ok(InstallOutcome::Skipped {
                platform: settings.platform.clone(),
            });
        };
        info!("Installing release {} into {:?}", plan.tag, settings.vendor_dir);

        let vendor_dir = &settings.vendor_dir;
        self.runtime.create_dir_all(vendor_dir)?;

        let binary_name = settings.platform.binary_file_name();
        if let Err(e) = self
            .fetch_and_unpack(&plan.primary, vendor_dir, &binary_name)
            .await
        {
            match &plan.fallback {
                // Only a missing asset warrants the fallback; other failures stay fatal.
                Some(fallback) if is_asset_missing(&e) => {
                    warn!("Primary asset unavailable ({}), trying {}", e, fallback.url);
                    self.fetch_and_unpack(fallback, vendor_dir, &binary_name)
                        .await?;
                }
                _ => return Err(e),
            }
        }

        let binary = locate(&self.runtime, vendor_dir, &binary_name, key).ok_or_else(|| {
            ProvisionError::BinaryNotFound {
                vendor_root: vendor_dir.clone(),
            }
        })?;
        // The located file is what the shim will run, wherever it sits in the tree.
        self.runtime.set_permissions(&binary, EXECUTABLE_MODE)?;

        println!("{} Installed to {}", LOG_TAG, binary.display());
        Ok(InstallOutcome::Installed { binary })
    }

    async fn fetch_and_unpack(
        &self,
        asset: &AssetRef,
        vendor_dir: &Path,
        binary_name: &str,
    ) -> Result<()> {
        println!("{} Downloading {}", LOG_TAG, asset.url);

        if asset.kind == AssetKind::Direct {
            let dest = vendor_dir.join(binary_name);
            self.downloader.download(&asset.url, &dest).await?;
            self.runtime.set_permissions(&dest, EXECUTABLE_MODE)?;
            debug!("Installed direct asset at {:?}", dest);
            return Ok(());
        }

        let archive_path = vendor_dir.join(asset.file_name());
        self.downloader.download(&asset.url, &archive_path).await?;
        let extracted = self
            .extractor
            .extract(&self.runtime, asset.kind, &archive_path, vendor_dir);

        if let Err(e) = self.runtime.remove_file(&archive_path) {
            warn!("Failed to remove archive {:?}: {}", archive_path, e);
        }
        extracted?;

        mark_executable(&self.runtime, vendor_dir)?;
        Ok(())
    }
}

fn is_asset_missing(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ProvisionError>()
        .is_some_and(ProvisionError::is_asset_missing)
}
