//! URI-to-file-system resolution, executed under chroot: every target
//! is interpreted relative to the confined root. Path traversal is
//! delegated entirely to chroot confinement; there is no explicit
//! `..` rejection (see the design notes on preserved limitations).

use crate::error::RequestError;
use nix::unistd::{access, AccessFlags};
use std::path::{Path, PathBuf};

/// A regular file resolved for serving.
pub struct ServeTarget {
    pub path: PathBuf,
    pub len: u64,
}

/// Resolve `target` against `root`, following the five steps in order:
/// empty target, trailing-slash redirect, existence probe, directory
/// redirect, then a checked `stat` for the file to serve.
pub fn resolve(root: &Path, target: &str) -> Result<ServeTarget, RequestError> {
    if target.is_empty() {
        return Err(RequestError::EmptyTarget);
    }

    if target.ends_with('/') {
        return Err(RequestError::IsDirectory {
            has_trailing_slash: true,
        });
    }

    let full = join_target(root, target);

    if access(&full, AccessFlags::F_OK).is_err() {
        return Err(RequestError::NotFound);
    }

    let metadata = std::fs::metadata(&full).map_err(|_| RequestError::NotFound)?;

    if metadata.is_dir() {
        return Err(RequestError::IsDirectory {
            has_trailing_slash: false,
        });
    }

    Ok(ServeTarget {
        path: full,
        len: metadata.len(),
    })
}

fn join_target(root: &Path, target: &str) -> PathBuf {
    root.join(target.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_target_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve(dir.path(), ""), Err(RequestError::EmptyTarget));
    }

    #[test]
    fn trailing_slash_redirects_to_index() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve(dir.path(), "/docs/"),
            Err(RequestError::IsDirectory {
                has_trailing_slash: true
            })
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve(dir.path(), "/missing.html"),
            Err(RequestError::NotFound)
        );
    }

    #[test]
    fn directory_without_slash_redirects() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        assert_eq!(
            resolve(dir.path(), "/sub"),
            Err(RequestError::IsDirectory {
                has_trailing_slash: false
            })
        );
    }

    #[test]
    fn regular_file_resolves_with_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        let target = resolve(dir.path(), "/a.txt").unwrap();
        assert_eq!(target.len, 5);
        assert_eq!(target.path, dir.path().join("a.txt"));
    }
}
