//! Write-to-temp-then-rename file writes.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::ExportError;

/// Writes `contents` to `path` so readers never see a partial file.
///
/// Parent directories are created as needed.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ExportError::io(parent, e))?;
    }

    let temp = temp_path(path);
    let mut file = fs::File::create(&temp)
        .await
        .map_err(|e| ExportError::io(&temp, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| ExportError::io(&temp, e))?;
    file.sync_all().await.map_err(|e| ExportError::io(&temp, e))?;
    drop(file);

    fs::rename(&temp, path)
        .await
        .map_err(|e| ExportError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
