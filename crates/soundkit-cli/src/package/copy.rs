//! Async file-tree copies used while staging packages

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use soundkit_core::{Error, Result};
use tokio::fs;
use tokio::task::JoinSet;

/// Copy a file or a whole directory tree, creating destination parents
pub async fn copy_path(from: &Path, to: &Path) -> Result<()> {
    let meta = fs::metadata(from).await.map_err(|e| Error::io(from, e))?;

    if !meta.is_dir() {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(from, to).await.map_err(|e| Error::io(from, e))?;
        return Ok(());
    }

    let mut stack = vec![(from.to_path_buf(), to.to_path_buf())];
    while let Some((src, dst)) = stack.pop() {
        fs::create_dir_all(&dst)
            .await
            .map_err(|e| Error::io(&dst, e))?;

        let mut entries = fs::read_dir(&src).await.map_err(|e| Error::io(&src, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(&src, e))? {
            let path = entry.path();
            let target = dst.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(|e| Error::io(&path, e))?;

            if file_type.is_dir() {
                stack.push((path, target));
            } else {
                fs::copy(&path, &target)
                    .await
                    .map_err(|e| Error::io(&path, e))?;
            }
        }
    }

    Ok(())
}

/// Copy every `(from, to)` pair concurrently; the first failure is returned
/// once all copies have finished
pub async fn copy_all(pairs: Vec<(PathBuf, PathBuf)>) -> Result<usize> {
    let mut copies = JoinSet::new();
    for (from, to) in pairs {
        copies.spawn(async move { copy_path(&from, &to).await });
    }

    let mut copied = 0;
    let mut first_error = None;
    while let Some(joined) = copies.join_next().await {
        let outcome = joined
            .map_err(|e| Error::Command(format!("copy task failed: {e}")))
            .and_then(|r| r);
        match outcome {
            Ok(()) => copied += 1,
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(copied),
    }
}

/// Remove a directory tree; a missing directory is not an error
pub async fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
