use anyhow::{Context as _, Result};
use futures::{Stream, StreamExt as _};
use indicatif::ProgressBar;
use tokio::{fs::File, io::AsyncWriteExt as _};

use super::verify::StreamVerifier;

/// Fan one producer out to its consumers: every chunk is written to `file`,
/// folded into `verifier` and reported to `progress` before the next chunk is
/// pulled from the producer. Nothing is buffered beyond the current chunk,
/// and the slowest consumer paces the producer.
pub async fn tee_stream<S, B, E>(
    mut stream: S,
    file: &mut File,
    verifier: &mut StreamVerifier,
    progress: &ProgressBar,
) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut total = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Failed to read from the download stream")?;
        let chunk = chunk.as_ref();

        file.write_all(chunk)
            .await
            .context("Failed to write archive data to disk")?;
        verifier.update(chunk);
        progress.inc(chunk.len() as u64);
        total += chunk.len() as u64;
    }

    file.flush()
        .await
        .context("Failed to flush archive data to disk")?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signature, SigningKey};
    use rand::rngs::OsRng;
    use sha2::{Digest as _, Sha512};

    use super::*;

    #[tokio::test]
    async fn fans_one_producer_out_to_all_consumers() -> Result<()> {
        let payload = b"rootsmith archive payload".to_vec();
        let key = SigningKey::generate(&mut OsRng);
        let mut prehash = Sha512::new();
        prehash.update(&payload);
        let signature = key.sign_prehashed(prehash, None)?;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("archive");
        let mut file = File::create(&path).await?;

        let chunks: Vec<std::result::Result<Vec<u8>, std::io::Error>> =
            payload.chunks(7).map(|chunk| Ok(chunk.to_vec())).collect();

        let mut verifier = StreamVerifier::new(key.verifying_key(), signature);
        let progress = ProgressBar::hidden();
        let total = tee_stream(futures::stream::iter(chunks), &mut file, &mut verifier, &progress)
            .await?;
        drop(file);

        assert_eq!(total, payload.len() as u64);
        assert_eq!(tokio::fs::read(&path).await?, payload);
        verifier.finish()?;
        Ok(())
    }

    #[tokio::test]
    async fn surfaces_a_mid_stream_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut file = File::create(dir.path().join("archive")).await?;

        let chunks: Vec<std::result::Result<Vec<u8>, std::io::Error>> = vec![
            Ok(b"partial".to_vec()),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            )),
        ];

        let key = SigningKey::generate(&mut OsRng);
        let mut verifier =
            StreamVerifier::new(key.verifying_key(), Signature::from_bytes(&[0u8; 64]));
        let progress = ProgressBar::hidden();

        let result =
            tee_stream(futures::stream::iter(chunks), &mut file, &mut verifier, &progress).await;
        assert!(result.is_err());
        Ok(())
    }
}
