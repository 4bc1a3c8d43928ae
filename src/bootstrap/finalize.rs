use std::path::Path;

use anyhow::{bail, Context as _, Result};
use tokio::process::Command;

use crate::{
    fs::{chroot::ChrootGuard, cmd::CheckCommandOutput as _},
    metadata::{self, Metadata},
};

/// User-mode emulation shim staged into the target so foreign-arch binaries
/// can run under the chroot on the build host.
const EMULATOR_BIN: &str = "/usr/bin/qemu-aarch64-static";

/// Post-bootstrap cleanup inside the target tree, then the initial metadata
/// record. Only invoked after a successful bootstrap run.
pub async fn finalize(target_dir: &Path, build_version: &str, metadata_path: &Path) -> Result<()> {
    let emulator_rel = Path::new(EMULATOR_BIN)
        .strip_prefix("/")
        .unwrap_or(Path::new(EMULATOR_BIN));
    let emulator_dest = target_dir.join(emulator_rel);
    tokio::fs::copy(EMULATOR_BIN, &emulator_dest)
        .await
        .with_context(|| format!("Failed to stage {EMULATOR_BIN} into {target_dir:?}"))?;

    let guard = ChrootGuard::enter(target_dir)?;
    let cleanup = cleanup_in_target(build_version, metadata_path).await;
    guard
        .exit()
        .context("Failed to restore the original root context")?;
    cleanup?;

    tokio::fs::remove_file(&emulator_dest)
        .await
        .with_context(|| format!("Failed to remove staged emulator shim {emulator_dest:?}"))
}

/// Runs with the target tree as the effective root.
async fn cleanup_in_target(build_version: &str, metadata_path: &Path) -> Result<()> {
    tracing::info!("Cleaning APT caches");
    Command::new(EMULATOR_BIN)
        .args(["/usr/bin/apt-get", "clean"])
        .current_dir("/")
        .run()
        .await
        .context("Failed to run 'apt-get clean'")?;

    // Prime the dpkg status database. On a freshly unpacked tree the listing
    // exits with status 1 even though the inventory is fine, so exactly that
    // exit is tolerated.
    Command::new(EMULATOR_BIN)
        .args(["/usr/bin/dpkg-query", "--list"])
        .current_dir("/")
        .run_with_status_checker(|code, _, _| match code {
            0 => Ok(()),
            1 => {
                tracing::warn!("dpkg-query --list exited with status 1 on the fresh tree");
                Ok(())
            }
            _ => bail!("dpkg-query --list failed"),
        })
        .await?;

    tracing::info!("Writing metadata");
    let record = Metadata {
        version: build_version.to_string(),
        kernel_version: None,
    };
    metadata::store(metadata_path, &record).await
}
