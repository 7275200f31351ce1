//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// This is a shared helper for resource `apply()` methods that need to
/// create parent directories before writing a file or symlink.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.  Real directories are left alone;
/// callers decide whether those are backed up or reported.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Recursively copy a directory tree.
///
/// Symlinks inside the tree are recreated as symlinks rather than followed,
/// so a backup copy preserves the layout exactly.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .with_context(|| format!("file type of {}", src_path.display()))?;
        if file_type.is_symlink() {
            let link = std::fs::read_link(&src_path)
                .with_context(|| format!("reading link {}", src_path.display()))?;
            std::os::unix::fs::symlink(&link, &dst_path)
                .with_context(|| format!("recreating link {}", dst_path.display()))?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Move `from` to `to`, creating the destination's parent directories.
///
/// Tries an atomic rename first and falls back to copy + delete when the
/// rename crosses a filesystem boundary (EXDEV).
///
/// # Errors
///
/// Returns an error if the rename fails for any other reason, or if the copy
/// fallback fails.  The source is left untouched in the first case.
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    ensure_parent_dir(to)?;
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => copy_then_remove(from, to),
        Err(e) => {
            Err(e).with_context(|| format!("renaming {} to {}", from.display(), to.display()))
        }
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    let meta = from
        .symlink_metadata()
        .with_context(|| format!("stat {}", from.display()))?;
    if meta.is_dir() {
        copy_dir_recursive(from, to)
            .with_context(|| format!("cross-fs copy {} to {}", from.display(), to.display()))?;
        std::fs::remove_dir_all(from)
            .with_context(|| format!("remove after copy: {}", from.display()))?;
    } else if meta.is_symlink() {
        let link =
            std::fs::read_link(from).with_context(|| format!("reading link {}", from.display()))?;
        std::os::unix::fs::symlink(&link, to)
            .with_context(|| format!("recreating link {}", to.display()))?;
        std::fs::remove_file(from)
            .with_context(|| format!("remove after copy: {}", from.display()))?;
    } else {
        std::fs::copy(from, to)
            .with_context(|| format!("cross-fs copy {} to {}", from.display(), to.display()))?;
        std::fs::remove_file(from)
            .with_context(|| format!("remove after copy: {}", from.display()))?;
    }
    Ok(())
}
