pub mod finalize;
pub mod keyring;
pub mod packages;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tokio::process::Command;

use crate::{config::KeyringSource, fs::cmd::CheckCommandOutput as _};

/// Fully describes one bootstrap run. Populated by the caller before the run
/// and never mutated here.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Target directory for the new root filesystem tree.
    pub directory: PathBuf,

    /// CPU architecture identifier as known to the package repository.
    pub arch: String,

    /// Base URL of the package repository mirror.
    pub mirror: String,

    /// Repository suite to install from.
    pub suite: String,

    /// Repository components to enable.
    pub components: Vec<String>,

    /// Resolved package set. Duplicates are tolerated by multistrap.
    pub packages: Vec<String>,
}

/// Populate `options.directory` with a self-contained root filesystem.
///
/// The repository keyring is fetched and digest-checked before multistrap is
/// allowed to install anything. The run is not transactional: a failure
/// partway through leaves a partially populated target, and the caller is
/// expected to discard it and rerun from a clean directory.
pub async fn run(options: &BootstrapOptions, keyring_source: &KeyringSource) -> Result<()> {
    tracing::info!("Fetching repository archive keys");
    keyring::install_trusted_keys(&options.directory, keyring_source).await?;

    which::which("multistrap").context("Could not found `multistrap`")?;

    tracing::info!("Running multistrap");
    let config_file = tempfile::Builder::new()
        .prefix("rootsmith-multistrap-")
        .suffix(".conf")
        .tempfile()
        .context("Failed to create multistrap config file")?;
    tokio::fs::write(config_file.path(), render_multistrap_config(options))
        .await
        .context("Failed to write multistrap config file")?;

    Command::new("multistrap")
        .arg("-f")
        .arg(config_file.path())
        .run()
        .await
        .with_context(|| format!("multistrap failed for target {:?}", options.directory))?;

    Ok(())
}

fn render_multistrap_config(options: &BootstrapOptions) -> String {
    format!(
        "[General]\n\
         arch={arch}\n\
         directory={directory}\n\
         cleanup=true\n\
         noauth=false\n\
         unpack=true\n\
         aptsources=Repository\n\
         bootstrap=Repository\n\
         \n\
         [Repository]\n\
         packages={packages}\n\
         source={mirror}\n\
         suite={suite}\n\
         components={components}\n",
        arch = options.arch,
        directory = options.directory.display(),
        packages = options.packages.join(" "),
        mirror = options.mirror,
        suite = options.suite,
        components = options.components.join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_complete_multistrap_config() {
        let options = BootstrapOptions {
            directory: PathBuf::from("/tmp/rootfs"),
            arch: "arm64".into(),
            mirror: "http://deb.debian.org/debian".into(),
            suite: "buster".into(),
            components: vec!["main".into(), "contrib".into()],
            packages: vec!["apt".into(), "systemd".into()],
        };

        let config = render_multistrap_config(&options);
        assert!(config.starts_with("[General]\n"));
        assert!(config.contains("arch=arm64\n"));
        assert!(config.contains("directory=/tmp/rootfs\n"));
        assert!(config.contains("packages=apt systemd\n"));
        assert!(config.contains("suite=buster\n"));
        assert!(config.contains("components=main contrib\n"));
    }
}
