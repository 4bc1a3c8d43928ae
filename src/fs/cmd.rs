use std::{
    marker::{Send, Sync},
    process::Stdio,
};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

#[async_trait]
pub trait CheckCommandOutput {
    async fn run(&mut self) -> Result<Vec<u8>>;

    /// Like [`CheckCommandOutput::run`] but hands the exit code and captured
    /// output to `f`, letting the caller accept exits that `run` would treat
    /// as failures.
    async fn run_with_status_checker<R>(
        &mut self,
        f: impl Fn(i32, Vec<u8>, Vec<u8>) -> Result<R> + Send + Sync,
    ) -> Result<R>;
}

#[async_trait]
impl CheckCommandOutput for Command {
    async fn run(&mut self) -> Result<Vec<u8>> {
        self.run_with_status_checker(|code, stdout, _| {
            if code != 0 {
                bail!("Bad exit code")
            } else {
                Ok(stdout)
            }
        })
        .await
    }

    async fn run_with_status_checker<R>(
        &mut self,
        f: impl Fn(i32, Vec<u8>, Vec<u8>) -> Result<R> + Send + Sync,
    ) -> Result<R> {
        // reset all locale settings for this command
        self.env("LC_ALL", "C");
        self.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::trace!(cmd = ?self.as_std(), "running external command");

        let output = self
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to spawn {:?}", self.as_std()))?;

        let code = output
            .status
            .code()
            .ok_or_else(|| anyhow!("{:?} was killed by a signal", self.as_std()))?;

        f(code, output.stdout.clone(), output.stderr.clone()).with_context(|| {
            format!(
                "\ncmd: {:?}\nexit code: {code}\nstdout: {}\nstderr: {}",
                self.as_std(),
                String::from_utf8_lossy(&output.stdout).trim(),
                String::from_utf8_lossy(&output.stderr).trim(),
            )
        })
    }
}
