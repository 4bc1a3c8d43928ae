pub mod release;
pub mod stream;
pub mod verify;

use anyhow::{Context as _, Result};
use indicatif::ProgressBar;
use tokio::process::Command;

use crate::{
    config::UpdateConfig, fs::cmd::CheckCommandOutput as _, metadata, update::verify::StreamVerifier,
};

/// Terminal states of one update run.
#[derive(Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The installed version is already current; nothing was downloaded.
    UpToDate,

    /// The release with this version was extracted and committed.
    Applied(String),
}

/// Query the latest release and, when it is newer than the installed one,
/// stream-verify-extract-commit it.
///
/// Idempotent with respect to "no newer version available". Not cancellable
/// mid-flight; the staged archive is removed on every exit path.
pub async fn check_and_apply(config: &UpdateConfig) -> Result<UpdateOutcome> {
    let signing_key = verify::parse_verifying_key(&config.signing_key_hex)?;

    let release = release::query_latest(&config.latest_url, &config.download_base).await?;
    let record = metadata::load(&config.metadata_path).await?;

    // Deliberately a plain lexical comparison: release versions are date
    // stamps and those sort correctly as strings. Not a semver comparator.
    if !is_newer(&release.version, record.effective_version()) {
        return Ok(UpdateOutcome::UpToDate);
    }

    tracing::info!(version = %release.version, "Downloading release");

    let client = reqwest::Client::new();

    // The detached signature is its own request, fetched up front.
    let signature_url = release.signature_url(&config.archive_name);
    let raw_signature = client
        .get(&signature_url)
        .send()
        .await
        .with_context(|| format!("Couldn't get {signature_url}"))?
        .error_for_status()
        .with_context(|| format!("Bad response for {signature_url}"))?
        .bytes()
        .await
        .context("Failed to read detached signature")?;
    let signature = verify::parse_signature(&raw_signature)?;

    let archive_url = release.archive_url(&config.archive_name);
    let response = client
        .get(&archive_url)
        .send()
        .await
        .with_context(|| format!("Couldn't get {archive_url}"))?
        .error_for_status()
        .with_context(|| format!("Bad response for {archive_url}"))?;

    let staged_archive = config.archive_path.clone();
    // No residual archive regardless of how this run ends.
    scopeguard::defer! {
        let _ = std::fs::remove_file(&staged_archive);
    }

    let mut archive_file = tokio::fs::File::create(&config.archive_path)
        .await
        .with_context(|| format!("Couldn't create {:?}", config.archive_path))?;

    let progress = match response.content_length() {
        Some(len) => ProgressBar::new(len),
        None => ProgressBar::new_spinner(),
    };

    let mut verifier = StreamVerifier::new(signing_key, signature);
    stream::tee_stream(
        Box::pin(response.bytes_stream()),
        &mut archive_file,
        &mut verifier,
        &progress,
    )
    .await?;
    progress.finish_and_clear();
    drop(archive_file);

    verifier.finish()?;

    tracing::info!("Signature verified, extracting archive");
    Command::new("tar")
        .arg("-zxf")
        .arg(&config.archive_path)
        .arg("-C")
        .arg(&config.extract_root)
        .run()
        .await
        .with_context(|| format!("Couldn't extract {:?}", config.archive_path))?;

    commit(config, record, &release.version).await?;

    Ok(UpdateOutcome::Applied(release.version))
}

/// `remote > local` under plain string ordering. `"9" > "10"` lexically, so a
/// non-date version scheme would misbehave here; the version contract is date
/// stamps.
fn is_newer(remote: &str, local: &str) -> bool {
    remote > local
}

/// Persist the new kernel version. The filesystem mutation this records has
/// already happened and is not rolled back when the write fails.
async fn commit(
    config: &UpdateConfig,
    mut record: metadata::Metadata,
    version: &str,
) -> Result<()> {
    record.kernel_version = Some(version.to_string());
    if let Err(error) = metadata::store(&config.metadata_path, &record).await {
        tracing::error!(?error, "Filesystem was updated but the metadata write failed");
        return Err(error.context(
            "Metadata write failed after a successful extraction, version bookkeeping is stale",
        ));
    }
    Ok(())
}
