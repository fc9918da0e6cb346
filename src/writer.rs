//! Writing reports to disk
//!
//! Both variants create missing parent directories first and report every
//! failure through the returned `Result`.

use std::path::Path;

use crate::error::{Result, ValidatorError};

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ValidatorError + '_ {
    move |source| ValidatorError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `data` to `path`, blocking the current thread
pub fn write_file(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_error(path))?;
    }
    std::fs::write(path, data).map_err(write_error(path))
}

/// Write `data` to `path` on the tokio runtime
pub async fn write_file_async(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(write_error(path))?;
    }
    tokio::fs::write(path, data).await.map_err(write_error(path))?;
    log::info!("Report written to {}", path.display());
    Ok(())
}
