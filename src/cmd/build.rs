use std::path::Path;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;

use crate::{
    bootstrap::{self, finalize, packages, BootstrapOptions},
    cli::BuildOptions,
    config::{self, KeyringSource},
    metadata,
};

pub struct BuildCommand {
    pub build_options: BuildOptions,
}

#[async_trait]
impl super::Command for BuildCommand {
    async fn run(&self) -> Result<()> {
        if !rustix::process::geteuid().is_root() {
            bail!("rootsmith build must be run as root")
        }

        let options = BootstrapOptions {
            directory: self.build_options.directory.clone(),
            arch: config::TARGET_ARCH.to_string(),
            mirror: config::REPOSITORY_MIRROR.to_string(),
            suite: config::REPOSITORY_SUITE.to_string(),
            components: config::REPOSITORY_COMPONENTS
                .iter()
                .map(|component| component.to_string())
                .collect(),
            packages: packages::resolve(self.build_options.flavor, self.build_options.debug),
        };

        bootstrap::run(&options, &KeyringSource::default())
            .await
            .context("Bootstrap failed, discard the target directory and restart from a clean one")?;

        let build_version = chrono::Local::now().format("%Y-%m-%d").to_string();
        finalize::finalize(
            &options.directory,
            &build_version,
            Path::new(metadata::METADATA_PATH),
        )
        .await?;

        tracing::info!(directory = ?options.directory, "Root filesystem assembled");
        Ok(())
    }
}
