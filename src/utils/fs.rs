//! File system utilities shared by the build pipeline and the packager.
//!
//! Provides idempotent directory operations, symlink-preserving recursive
//! copies with overwrite and timestamp control, and permission helpers.
//! Everything returns plain `io::Result` so callers attach their own context.

use std::{
    fs::FileTimes,
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Options controlling [`copy_dir`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyOptions {
    /// Replace files that already exist at the destination.
    ///
    /// When false, existing destination files are left untouched.
    pub overwrite: bool,

    /// Carry access and modification times over from the source files.
    pub preserve_timestamps: bool,
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> io::Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path).await
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Creates a fresh, uniquely named directory under `root`.
///
/// The directory is not removed automatically.
pub async fn create_temp_dir(root: &Path, prefix: &str) -> io::Result<PathBuf> {
    let dir = root.join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).await?;
    Ok(dir)
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from).await?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", from.display()),
        ));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating the
/// destination and its parents as necessary.
///
/// Preserves symlinks on platforms that support them. Unlike a plain copy,
/// the destination may already exist: its contents are merged according to
/// `options`.
pub async fn copy_dir(from: &Path, to: &Path, options: CopyOptions) -> io::Result<()> {
    let metadata = fs::metadata(from).await?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", from.display()),
        ));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || copy_dir_blocking(&from, &to, options))
        .await
        .map_err(|e| io::Error::other(format!("directory copy task panicked: {e}")))?
}

fn copy_dir_blocking(from: &Path, to: &Path, options: CopyOptions) -> io::Result<()> {
    std::fs::create_dir_all(to)?;

    for entry in walkdir::WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        let rel_path = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let dest_path = to.join(rel_path);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }

        if std::fs::symlink_metadata(&dest_path).is_ok() {
            if !options.overwrite {
                continue;
            }
            std::fs::remove_file(&dest_path)?;
        }

        if file_type.is_symlink() {
            let target = std::fs::read_link(entry.path())?;
            if entry.path().is_dir() {
                symlink_dir(&target, &dest_path)?;
            } else {
                symlink_file(&target, &dest_path)?;
            }
        } else {
            std::fs::copy(entry.path(), &dest_path)?;
            if options.preserve_timestamps {
                copy_timestamps(entry.path(), &dest_path)?;
            }
        }
    }

    Ok(())
}

/// Applies `from`'s access and modification times to `to`.
///
/// Setting times needs a writable handle, so a read-only destination is made
/// owner-writable for the duration and its permissions restored afterwards.
fn copy_timestamps(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = std::fs::metadata(from)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);

    let permissions = std::fs::metadata(to)?.permissions();
    let readonly = permissions.readonly();
    if readonly {
        std::fs::set_permissions(to, owner_writable(permissions.clone()))?;
    }

    let result = std::fs::OpenOptions::new()
        .write(true)
        .open(to)
        .and_then(|file| file.set_times(times));

    if readonly {
        std::fs::set_permissions(to, permissions)?;
    }
    result
}

#[cfg(unix)]
fn owner_writable(mut permissions: std::fs::Permissions) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(permissions.mode() | 0o200);
    permissions
}

#[cfg(not(unix))]
fn owner_writable(mut permissions: std::fs::Permissions) -> std::fs::Permissions {
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    permissions
}

/// Marks a file as executable (`0o755`). No-op on non-Unix hosts.
pub async fn set_executable(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_copy_dir_merges_into_existing_destination() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("a.txt"), "new").unwrap();
        std::fs::write(src.join("nested/b.txt"), "b").unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(dst.join("a.txt"), "old").unwrap();
        std::fs::write(dst.join("keep.txt"), "keep").unwrap();

        copy_dir(&src, &dst, CopyOptions::default()).await.unwrap();
        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "old");
        assert_eq!(std::fs::read_to_string(dst.join("nested/b.txt")).unwrap(), "b");

        copy_dir(
            &src,
            &dst,
            CopyOptions {
                overwrite: true,
                preserve_timestamps: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dst.join("keep.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_copy_dir_preserves_modified_time() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        let file = src.join("stamp.txt");
        std::fs::write(&file, "x").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        std::fs::OpenOptions::new()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(past)
            .unwrap();

        copy_dir(
            &src,
            &dst,
            CopyOptions {
                overwrite: true,
                preserve_timestamps: true,
            },
        )
        .await
        .unwrap();

        let copied = std::fs::metadata(dst.join("stamp.txt")).unwrap();
        assert_eq!(copied.modified().unwrap(), past);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_dir_preserves_timestamps_of_read_only_files() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        let file = src.join("locked.txt");
        std::fs::write(&file, "x").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(2_000_000);
        std::fs::OpenOptions::new()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(past)
            .unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o444)).unwrap();

        copy_dir(
            &src,
            &dst,
            CopyOptions {
                overwrite: true,
                preserve_timestamps: true,
            },
        )
        .await
        .unwrap();

        let copied = std::fs::metadata(dst.join("locked.txt")).unwrap();
        assert_eq!(copied.modified().unwrap(), past);
        assert_eq!(copied.permissions().mode() & 0o777, 0o444);
    }

    #[tokio::test]
    async fn test_copy_file_missing_source_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(&temp.path().join("nope.png"), &temp.path().join("out.png"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_remove_dir_all_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("gone");
        remove_dir_all(&dir).await.unwrap();
        create_dir_all(&dir, true).await.unwrap();
        assert!(dir.is_dir());
    }
}
