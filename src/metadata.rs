use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::error::MetadataNotFound;

/// Well-known location of the metadata record on an installed system.
pub const METADATA_PATH: &str = "/etc/rootsmith.toml";

/// The single persisted record describing an installed system. One record
/// exists per system; writes replace the whole record.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    /// Date stamp of the image build. Immutable once written.
    pub version: String,

    /// Version of the most recently applied kernel update. Absent until the
    /// first update is committed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
}

impl Metadata {
    /// The version the system is considered to be at when compared against a
    /// remote release: the last applied kernel update, or the image build
    /// stamp when no update was ever applied.
    pub fn effective_version(&self) -> &str {
        self.kernel_version.as_deref().unwrap_or(&self.version)
    }
}

pub async fn load(path: &Path) -> Result<Metadata> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(MetadataNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(error) => {
            return Err(error).with_context(|| format!("Can not read metadata file at {path:?}"))
        }
    };

    toml::from_str(&content).with_context(|| format!("Malformed metadata file at {path:?}"))
}

/// Whole-record replace; the record stays internally consistent because no
/// partial-field patching exists.
pub async fn store(path: &Path, metadata: &Metadata) -> Result<()> {
    let content = toml::to_string(metadata)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Can not write metadata file at {path:?}"))
}
