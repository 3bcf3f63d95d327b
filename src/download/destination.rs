//! Destination directory preparation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::EngineError;

/// Rejects destinations that can never be prepared, without touching the
/// filesystem.
///
/// # Errors
///
/// Returns [`EngineError::Destination`] if `path` is empty.
pub fn check_destination(path: &Path) -> Result<(), EngineError> {
    if path.as_os_str().is_empty() {
        return Err(EngineError::destination(path, "path is empty"));
    }
    Ok(())
}

/// Makes sure `path` exists as a directory before any track is written.
///
/// Missing parents are created. If creation fails part-way, the directories
/// created by this call are removed again.
///
/// # Errors
///
/// Returns [`EngineError::Destination`] if `path` is empty, exists but is
/// not a directory, or cannot be created.
pub async fn prepare_destination(path: &Path) -> Result<PathBuf, EngineError> {
    check_destination(path)?;
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            debug!(path = %path.display(), "destination already exists");
            return Ok(path.to_path_buf());
        }
        Ok(_) => return Err(EngineError::destination(path, "exists but is not a directory")),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(EngineError::destination(path, e.to_string())),
    }

    let missing = missing_ancestors(path).await;
    if let Err(e) = tokio::fs::create_dir_all(path).await {
        // Deepest first; remove_dir only succeeds on the empty dirs we made.
        for dir in &missing {
            if tokio::fs::remove_dir(dir).await.is_ok() {
                warn!(path = %dir.display(), "removed partially created directory");
            }
        }
        return Err(EngineError::destination(path, e.to_string()));
    }

    info!(path = %path.display(), created = missing.len(), "created destination directory");
    Ok(path.to_path_buf())
}

/// `path` and its ancestors that do not exist yet, deepest first.
async fn missing_ancestors(path: &Path) -> Vec<PathBuf> {
    let mut missing = Vec::new();
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty()
            || tokio::fs::try_exists(ancestor).await.unwrap_or(false)
        {
            break;
        }
        missing.push(ancestor.to_path_buf());
    }
    missing
}
