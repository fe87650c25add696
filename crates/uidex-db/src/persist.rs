//! JSON snapshot files backing the in-memory stores.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;

/// Write `value` to `path` via a sibling temp file and a rename,
/// so a crash mid-write never leaves a truncated snapshot behind.
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Read a snapshot file. A missing file is `Ok(None)`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
