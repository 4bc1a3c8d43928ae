//! Fixed trust anchors and endpoints, surfaced as injectable config values.
//!
//! The constants here are the only place trust material lives. Production
//! callers take the `Default` impls; tests construct fixture values instead
//! of touching these.

use std::path::PathBuf;

/// CPU architecture of the produced image.
pub const TARGET_ARCH: &str = "arm64";

/// Package repository the image is assembled from.
pub const REPOSITORY_MIRROR: &str = "http://deb.debian.org/debian";
pub const REPOSITORY_SUITE: &str = "buster";
pub const REPOSITORY_COMPONENTS: &[&str] = &["main", "contrib", "non-free"];

const KEYRING_URL: &str = "http://deb.debian.org/debian/pool/main/d/debian-archive-keyring/debian-archive-keyring_2019.1_all.deb";
const KEYRING_SHA256: &str = "9cefd8917f3d97a999c136aa87f04a3024408b5bc1de470de7d6dfa5e4bd4361";

const RELEASE_LATEST_URL: &str = "https://github.com/rootsmith/kernel/releases/latest";
const RELEASE_DOWNLOAD_BASE: &str = "https://github.com/rootsmith/kernel/releases/download";
const ARCHIVE_NAME: &str = "linux.tar.gz";
const ARCHIVE_STAGING_PATH: &str = "/root/linux.tar.gz";

/// Ed25519 public key trusted to sign kernel release archives, hex encoded.
const RELEASE_SIGNING_KEY_HEX: &str =
    "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

/// Where the one-time repository keyring comes from and what it must hash to.
/// The keyring is the root of the image's trust chain: every package
/// installed during bootstrap is authenticated through it.
#[derive(Debug, Clone)]
pub struct KeyringSource {
    pub url: String,
    pub sha256_hex: String,
}

impl Default for KeyringSource {
    fn default() -> Self {
        Self {
            url: KEYRING_URL.to_string(),
            sha256_hex: KEYRING_SHA256.to_string(),
        }
    }
}

/// Everything one update run needs: endpoints, the pinned signing key, and
/// the local paths it reads and writes.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Endpoint answering with a redirect whose target names the latest
    /// version.
    pub latest_url: String,

    /// Base of the per-version download directories.
    pub download_base: String,

    /// Archive file name within a versioned download directory.
    pub archive_name: String,

    /// Pinned Ed25519 public key, hex encoded.
    pub signing_key_hex: String,

    /// Location of the metadata record.
    pub metadata_path: PathBuf,

    /// Where the archive is staged while it streams in. Removed after every
    /// run.
    pub archive_path: PathBuf,

    /// Root the archive is extracted relative to.
    pub extract_root: PathBuf,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            latest_url: RELEASE_LATEST_URL.to_string(),
            download_base: RELEASE_DOWNLOAD_BASE.to_string(),
            archive_name: ARCHIVE_NAME.to_string(),
            signing_key_hex: RELEASE_SIGNING_KEY_HEX.to_string(),
            metadata_path: PathBuf::from(crate::metadata::METADATA_PATH),
            archive_path: PathBuf::from(ARCHIVE_STAGING_PATH),
            extract_root: PathBuf::from("/"),
        }
    }
}
