use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scoped directory for backend intermediate files.
///
/// An owned workspace wraps a temporary directory that is recursively deleted
/// when the handle drops, i.e. on every exit path of a typing run. A borrowed
/// workspace wraps a caller-supplied path (created if absent) and deletes
/// nothing, which is the escape hatch for inspecting intermediate files after
/// a run. Sharing a borrowed workspace between concurrent runs is not
/// supported; the file names inside collide.
#[derive(Debug)]
pub enum Workspace {
    Owned(TempDir),
    Borrowed(PathBuf),
}

impl Workspace {
    /// Opens a workspace: borrowed over `dir` when given, owned otherwise.
    pub fn open(dir: Option<&Path>) -> io::Result<Self> {
        match dir {
            Some(path) => {
                fs::create_dir_all(path)?;
                Ok(Workspace::Borrowed(path.to_path_buf()))
            }
            None => Ok(Workspace::Owned(TempDir::new()?)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Workspace::Owned(dir) => dir.path(),
            Workspace::Borrowed(path) => path.as_path(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Workspace::Borrowed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_workspace_is_deleted_on_drop() {
        let workspace = Workspace::open(None).unwrap();
        let path = workspace.path().to_path_buf();
        fs::write(path.join("mol.mol2"), "data").unwrap();
        assert!(path.exists());
        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn borrowed_workspace_survives_drop() {
        let parent = tempfile::tempdir().unwrap();
        let dir = parent.path().join("typing");
        let workspace = Workspace::open(Some(&dir)).unwrap();
        assert!(workspace.is_persistent());
        fs::write(workspace.path().join("mol.mol2"), "data").unwrap();
        drop(workspace);
        assert!(dir.join("mol.mol2").exists());
    }

    #[test]
    fn borrowed_workspace_creates_missing_directories() {
        let parent = tempfile::tempdir().unwrap();
        let dir = parent.path().join("a").join("b");
        let workspace = Workspace::open(Some(&dir)).unwrap();
        assert!(workspace.path().is_dir());
    }

    #[test]
    fn owned_workspace_is_not_persistent() {
        let workspace = Workspace::open(None).unwrap();
        assert!(!workspace.is_persistent());
    }
}
