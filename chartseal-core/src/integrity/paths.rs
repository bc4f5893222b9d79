//! Resolution of decoded relative paths against the application root
//!
//! Bundled paths are written with `\` separators. Both `\` and `/` are treated
//! as separators so the same tokens resolve on every platform.

use std::path::{Path, PathBuf};

/// Joins relative paths against an application root
pub trait PathResolver: Send + Sync {
    fn resolve_absolute(&self, relative: &str) -> PathBuf;
}

/// Resolver rooted at a fixed application directory
#[derive(Debug, Clone)]
pub struct AppRoot {
    root: PathBuf,
}

impl AppRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AppRoot { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for AppRoot {
    fn resolve_absolute(&self, relative: &str) -> PathBuf {
        relative
            .split(['\\', '/'])
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_against_root() {
        let root = AppRoot::new("/srv/app");
        assert_eq!(
            root.resolve_absolute("vendor/phpblaze/bladelib/src/func.php"),
            PathBuf::from("/srv/app/vendor/phpblaze/bladelib/src/func.php")
        );
    }

    #[test]
    fn test_resolve_accepts_backslash_separators() {
        let root = AppRoot::new("/srv/app");
        assert_eq!(
            root.resolve_absolute("vendor\\phpblaze\\bladelib\\src\\Paths\\W.php"),
            PathBuf::from("/srv/app/vendor/phpblaze/bladelib/src/Paths/W.php")
        );
    }

    #[test]
    fn test_resolve_keeps_leading_separator_under_root() {
        let root = AppRoot::new("/srv/app");
        assert_eq!(
            root.resolve_absolute("/etc/passwd"),
            PathBuf::from("/srv/app/etc/passwd")
        );
        assert_eq!(
            root.resolve_absolute("\\etc\\passwd"),
            PathBuf::from("/srv/app/etc/passwd")
        );
    }
}
