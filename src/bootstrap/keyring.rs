use std::path::Path;

use anyhow::{Context as _, Result};
use sha2::{Digest as _, Sha256};
use tokio::process::Command;

use crate::{config::KeyringSource, error::TrustError, fs::cmd::CheckCommandOutput as _};

/// Fetch the repository keyring package, check it against the pinned digest
/// and unpack the contained trust store into the target tree.
///
/// Every package installed afterwards is authenticated through these keys, so
/// a digest mismatch aborts the whole bootstrap before anything is installed.
pub async fn install_trusted_keys(target_dir: &Path, source: &KeyringSource) -> Result<()> {
    let keyring = reqwest::get(&source.url)
        .await
        .with_context(|| format!("Failed to fetch keyring from {}", source.url))?
        .error_for_status()
        .with_context(|| format!("Bad response fetching keyring from {}", source.url))?
        .bytes()
        .await
        .context("Failed to read keyring response body")?;

    verify_keyring_digest(&keyring, &source.sha256_hex)?;

    let staging_dir = tempfile::Builder::new()
        .prefix("rootsmith-keyring-")
        .tempdir()
        .context("Failed to create keyring staging dir")?;
    let deb_path = staging_dir.path().join("keyring.deb");
    tokio::fs::write(&deb_path, &keyring)
        .await
        .context("Failed to stage the verified keyring package")?;

    Command::new("dpkg-deb")
        .arg("-x")
        .arg(&deb_path)
        .arg(target_dir)
        .run()
        .await
        .with_context(|| format!("Failed to unpack keyring into {target_dir:?}"))?;

    Ok(())
}

pub fn verify_keyring_digest(content: &[u8], expected_sha256_hex: &str) -> Result<()> {
    let actual = hex::encode(Sha256::digest(content));
    let expected = expected_sha256_hex.to_ascii_lowercase();
    if actual != expected {
        return Err(TrustError(format!(
            "keyring digest mismatch, expected sha256 {expected} but fetched content hashes to {actual}"
        ))
        .into());
    }
    Ok(())
}
