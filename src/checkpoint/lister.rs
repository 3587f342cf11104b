//! Directory listing behind checkpoint resolution

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::Result;

/// Lists the files in `dir` whose names match a glob `pattern`.
///
/// Resolution goes through this trait so argument assembly can be tested
/// without real checkpoint files on disk. Any
/// `Fn(&Path, &str) -> Result<Vec<PathBuf>>` is a lister too.
pub trait FileLister {
    fn list(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>>;
}

impl<F> FileLister for F
where
    F: Fn(&Path, &str) -> Result<Vec<PathBuf>>,
{
    fn list(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        self(dir, pattern)
    }
}

/// Wildcards never match a leading `.`, so hidden files and `._*`
/// sidecars are not listed.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Filesystem lister backed by `glob`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobLister;

impl FileLister for GlobLister {
    fn list(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        // The directory part is literal, only the file pattern is a glob
        let full_pattern = Path::new(&Pattern::escape(&dir.to_string_lossy())).join(pattern);

        let mut files = Vec::new();
        for entry in glob::glob_with(&full_pattern.to_string_lossy(), MATCH_OPTIONS)? {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// In-memory lister over a fixed set of paths
#[derive(Debug, Clone, Default)]
pub struct StaticLister {
    files: Vec<PathBuf>,
}

impl StaticLister {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileLister for StaticLister {
    fn list(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = Pattern::new(pattern)?;
        Ok(self
            .files
            .iter()
            .filter(|f| f.parent() == Some(dir))
            .filter(|f| {
                f.file_name()
                    .map(|n| pattern.matches_with(&n.to_string_lossy(), MATCH_OPTIONS))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lister_filters_by_dir_and_pattern() {
        let lister = StaticLister::new([
            "ckpt/sam_vit_b.pth",
            "ckpt/notes.txt",
            "other/sam_vit_h.pth",
        ]);
        let found = lister.list(Path::new("ckpt"), "sam_*.pth").unwrap();
        assert_eq!(found, vec![PathBuf::from("ckpt/sam_vit_b.pth")]);
    }

    #[test]
    fn test_glob_lister_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sam_vit_h_4b8939.pth"), b"").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();
        std::fs::create_dir(dir.path().join("sam_dir.pth")).unwrap();

        let found = GlobLister.list(dir.path(), "sam_*.pth").unwrap();
        assert_eq!(found, vec![dir.path().join("sam_vit_h_4b8939.pth")]);
    }

    #[test]
    fn test_glob_lister_skips_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("._R50_DeAOTL_PRE_YTB_DAV.pth"), b"").unwrap();
        std::fs::write(dir.path().join(".hidden.pth"), b"").unwrap();
        std::fs::write(dir.path().join("R50_DeAOTL_PRE_YTB_DAV.pth"), b"").unwrap();

        let found = GlobLister.list(dir.path(), "*.pth").unwrap();
        assert_eq!(found, vec![dir.path().join("R50_DeAOTL_PRE_YTB_DAV.pth")]);
    }

    #[test]
    fn test_static_lister_skips_dotfiles() {
        let lister = StaticLister::new(["ckpt/._sam_vit_b.pth", "ckpt/r50_aotl.pth"]);
        let found = lister.list(Path::new("ckpt"), "*.pth").unwrap();
        assert_eq!(found, vec![PathBuf::from("ckpt/r50_aotl.pth")]);
    }

    #[test]
    fn test_glob_lister_missing_directory_is_empty() {
        let found = GlobLister
            .list(Path::new("/definitely/not/here"), "*.pth")
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_closure_lister() {
        let lister =
            |_: &Path, _: &str| -> Result<Vec<PathBuf>> { Ok(vec![PathBuf::from("x/a.pth")]) };
        assert_eq!(lister.list(Path::new("x"), "*").unwrap().len(), 1);
    }
}
