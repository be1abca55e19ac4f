//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve against `root` when relative.
pub fn expand_under(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absolute_missing() {
        let p = Path::new("/definitely/not/here/livepad");
        assert_eq!(normalize_path(p), p.to_path_buf());
    }

    #[test]
    fn test_expand_under_relative() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("sketch")).unwrap();
        let expanded = expand_under(Path::new("sketch"), root.path());
        assert_eq!(expanded, normalize_path(&root.path().join("sketch")));
    }

    #[test]
    fn test_expand_under_absolute_kept() {
        let p = Path::new("/definitely/not/here");
        assert_eq!(expand_under(p, Path::new("/tmp")), p.to_path_buf());
    }
}
