//! Collection files
//!
//! Each collection is one pretty-printed JSON document. Writes go to a
//! sibling `.tmp` file that is synced and then renamed over the original, so
//! a reader sees either the old collection or the new one.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Read a collection document; a missing file reads as the empty default
pub fn read_json<T, P>(path: P) -> LedgerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("read", path, e)),
    };

    serde_json::from_slice(&bytes).map_err(|e| storage_error("parse", path, e))
}

/// Replace a collection document in one step
pub fn write_json_atomic<T, P>(path: P, data: &T) -> LedgerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(data).map_err(|e| storage_error("serialize", path, e))?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| storage_error("create the directory of", path, e))?;
    }

    let staged = staging_path(path);
    if let Err(e) = write_synced(&staged, &bytes).and_then(|()| fs::rename(&staged, path)) {
        let _ = fs::remove_file(&staged);
        return Err(storage_error("write", path, e));
    }

    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn storage_error(action: &str, path: &Path, e: impl Display) -> LedgerError {
    LedgerError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}
