use std::io::Write as _;
use std::path::Path;

use crate::error::{Result, ScrapeError};

/// Writes `path` through a temp file in the same directory, so readers see
/// either the old file or the complete new one.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut std::fs::File) -> std::io::Result<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|err| ScrapeError::persistence("create dir", parent, err))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|err| ScrapeError::persistence("create temp file in", parent, err))?;
    write(tmp.as_file_mut()).map_err(|err| ScrapeError::persistence("write", path, err))?;
    tmp.as_file_mut()
        .flush()
        .map_err(|err| ScrapeError::persistence("flush", path, err))?;
    tmp.persist(path)
        .map_err(|err| ScrapeError::persistence("rename temp file to", path, err.error))?;
    Ok(())
}

pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)
        .map_err(|err| ScrapeError::persistence("serialize", path, err))?;
    write_atomic(path, |file| file.write_all(&data))
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ScrapeError::persistence("read", path, err)),
    };
    let value =
        serde_json::from_slice(&bytes).map_err(|err| ScrapeError::persistence("parse", path, err))?;
    Ok(Some(value))
}
