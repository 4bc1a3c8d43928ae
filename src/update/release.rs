use anyhow::{bail, Context as _, Result};

/// A resolved remote release. Derived fresh on every run and never persisted
/// except as the committed kernel version.
#[derive(Debug, Clone)]
pub struct Release {
    pub version: String,
    pub download_base: String,
}

impl Release {
    pub fn archive_url(&self, archive_name: &str) -> String {
        format!("{}/{}", self.download_base, archive_name)
    }

    pub fn signature_url(&self, archive_name: &str) -> String {
        format!("{}/{}.sig", self.download_base, archive_name)
    }
}

/// Resolve the latest release by reading the redirect the release index
/// answers with, without following it. The last path segment of the redirect
/// target is the version identifier, so no index payload is ever downloaded.
pub async fn query_latest(latest_url: &str, download_base: &str) -> Result<Release> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let response = client
        .get(latest_url)
        .send()
        .await
        .with_context(|| format!("Couldn't request the latest release from {latest_url}"))?;

    if !response.status().is_redirection() {
        bail!(
            "Expected a redirect from {latest_url}, got HTTP {}",
            response.status()
        )
    }

    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .with_context(|| format!("Redirect from {latest_url} carries no Location header"))?
        .to_str()
        .context("Redirect target is not valid UTF-8")?;

    let version = version_from_location(location)?;

    Ok(Release {
        download_base: format!("{}/{}", download_base.trim_end_matches('/'), version),
        version,
    })
}

fn version_from_location(location: &str) -> Result<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .with_context(|| format!("Couldn't derive a version from redirect target {location:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_the_version_from_the_last_path_segment() {
        assert_eq!(
            version_from_location("https://example.org/kernel/releases/tag/2021-06-01").unwrap(),
            "2021-06-01"
        );
        assert_eq!(
            version_from_location("/kernel/releases/tag/2021-06-01/").unwrap(),
            "2021-06-01"
        );
    }

    #[test]
    fn rejects_an_empty_redirect_target() {
        assert!(version_from_location("").is_err());
        assert!(version_from_location("///").is_err());
    }

    #[test]
    fn release_urls_point_into_the_versioned_directory() {
        let release = Release {
            version: "2021-06-01".into(),
            download_base: "https://example.org/dl/2021-06-01".into(),
        };
        assert_eq!(
            release.archive_url("linux.tar.gz"),
            "https://example.org/dl/2021-06-01/linux.tar.gz"
        );
        assert_eq!(
            release.signature_url("linux.tar.gz"),
            "https://example.org/dl/2021-06-01/linux.tar.gz.sig"
        );
    }
}
