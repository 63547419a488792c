//! File-backed store, one file per key

use super::KeyValueStore;
use crate::error::{MarketError, MarketResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Stores each key as `<digest>.json` inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> MarketResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| MarketError::store(format!("creating store dir {}", dir.display()), e))?;
        Ok(Self { dir })
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the value for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key_digest(key)))
    }
}

/// Short content address for a key, so arbitrary keys map to safe file names
fn key_digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let result = hasher.finalize();

    // First 16 hex characters (8 bytes)
    hex::encode(&result[..8])
}

/// Write `value` to `tmp`, then rename it over `path`
async fn replace_via(tmp: &Path, path: &Path, value: &str) -> MarketResult<()> {
    fs::write(tmp, value)
        .await
        .map_err(|e| MarketError::store(format!("writing {}", tmp.display()), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        fs::set_permissions(tmp, perms)
            .await
            .map_err(|e| MarketError::store("setting store file permissions", e))?;
    }

    // Rename so readers never observe a partial blob
    fs::rename(tmp, path)
        .await
        .map_err(|e| MarketError::store(format!("replacing {}", path.display()), e))
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> MarketResult<Option<String>> {
        let path = self.path_for(key);

        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("Read {} bytes for {} from {}", content.len(), key, path.display());
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MarketError::store(
                format!("reading {}", path.display()),
                e,
            )),
        }
    }

    async fn set(&self, key: &str, value: &str) -> MarketResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        if let Err(e) = replace_via(&tmp, &path, value).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    debug!("Could not remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e);
        }

        debug!("Wrote {} bytes for {} to {}", value.len(), key, path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> MarketResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MarketError::store(
                format!("removing {}", path.display()),
                e,
            )),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
