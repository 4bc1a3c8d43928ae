use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::{
    cli::UpdateOptions,
    config::UpdateConfig,
    update::{self, UpdateOutcome},
};

pub struct UpdateCommand {
    #[allow(unused)]
    pub update_options: UpdateOptions,
}

#[async_trait]
impl super::Command for UpdateCommand {
    async fn run(&self) -> Result<()> {
        if !rustix::process::geteuid().is_root() {
            bail!("rootsmith update must be run as root")
        }

        match update::check_and_apply(&UpdateConfig::default()).await? {
            UpdateOutcome::UpToDate => {
                tracing::info!("You're already using the latest version");
            }
            UpdateOutcome::Applied(version) => {
                tracing::info!(%version, "Kernel updated, reboot for it to take effect");
            }
        }

        Ok(())
    }
}
