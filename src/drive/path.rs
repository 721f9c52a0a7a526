//! Name types and path resolution under the drive root.
//!
//! Two kinds of names reach the filesystem:
//! - [`EntryName`]: a name introduced by create/delete, restricted to ASCII
//!   letters and digits.
//! - [`Segment`]: any single path component. Parent folder names, lookup
//!   names and uploaded filenames are not policy-checked, but they can never
//!   climb out of the root.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::{DriveError, Result};

/// A single, non-traversing path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment(String);

impl Segment {
    /// Parse a raw segment.
    ///
    /// Rejects empty values, separators, NUL bytes, `.` and `..`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
            return Err(DriveError::InvalidName(raw.to_string()));
        }

        let mut components = Path::new(raw).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self(raw.to_string())),
            _ => Err(DriveError::InvalidName(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for Segment {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// A name that satisfies the `^[A-Za-z0-9]+$` naming policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(Segment);

impl EntryName {
    pub fn parse(raw: &str) -> Result<Self> {
        if !is_valid_name(raw) {
            return Err(DriveError::InvalidName(raw.to_string()));
        }
        Ok(Self(Segment(raw.to_string())))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_segment(&self) -> &Segment {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<EntryName> for Segment {
    fn from(name: EntryName) -> Self {
        name.0
    }
}

/// Check a name against the alphanumeric naming policy.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Address of an entry: directly under the root, or under one parent folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPath {
    pub parent: Option<Segment>,
    pub name: Segment,
}

impl EntryPath {
    /// Entry directly under the root.
    pub fn root(name: impl Into<Segment>) -> Self {
        Self {
            parent: None,
            name: name.into(),
        }
    }

    pub fn new(parent: Option<Segment>, name: impl Into<Segment>) -> Self {
        Self {
            parent,
            name: name.into(),
        }
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{parent}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The directory all drive operations are scoped under.
#[derive(Debug, Clone)]
pub struct Root {
    path: PathBuf,
}

impl Root {
    /// Create the root, creating the directory if it does not exist yet.
    ///
    /// The stored path is canonical, and must name a directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;

        let path = path.canonicalize()?;
        if !path.is_dir() {
            return Err(DriveError::Config(format!(
                "drive root {} is not a directory",
                path.display()
            )));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding entries: the root itself, or `root/parent`.
    pub fn dir(&self, parent: Option<&Segment>) -> PathBuf {
        match parent {
            Some(parent) => self.path.join(parent),
            None => self.path.clone(),
        }
    }

    /// Absolute path of an entry: `root/[parent/]name`.
    pub fn resolve(&self, entry: &EntryPath) -> PathBuf {
        self.dir(entry.parent.as_ref()).join(&entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("MyFolder"));
        assert!(is_valid_name("projectA"));
        assert!(is_valid_name("2024"));
        assert!(is_valid_name("x"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("My-Folder"));
        assert!(!is_valid_name("my folder"));
        assert!(!is_valid_name("report.txt"));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/b"));
        // Non-ASCII letters are outside the policy
        assert!(!is_valid_name("dossierÉté"));
    }

    #[test]
    fn test_entry_name_parse() {
        let name = EntryName::parse("MyFolder").unwrap();
        assert_eq!(name.as_str(), "MyFolder");

        let err = EntryName::parse("My-Folder").unwrap_err();
        assert!(matches!(err, DriveError::InvalidName(n) if n == "My-Folder"));
    }

    #[test]
    fn test_segment_accepts_arbitrary_names() {
        assert_eq!(Segment::parse("report.txt").unwrap().as_str(), "report.txt");
        assert_eq!(Segment::parse("My-Folder").unwrap().as_str(), "My-Folder");
        assert_eq!(Segment::parse(".hidden").unwrap().as_str(), ".hidden");
        assert_eq!(Segment::parse("日本語").unwrap().as_str(), "日本語");
    }

    #[test]
    fn test_segment_rejects_traversal() {
        for raw in ["", ".", "..", "../etc", "a/b", "/abs", "a\\b", "nul\0byte"] {
            assert!(
                matches!(Segment::parse(raw), Err(DriveError::InvalidName(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_entry_path_display() {
        let name = EntryName::parse("x").unwrap();
        assert_eq!(EntryPath::root(name.clone()).to_string(), "x");

        let parent = Segment::parse("projectA").unwrap();
        assert_eq!(EntryPath::new(Some(parent), name).to_string(), "projectA/x");
    }

    #[test]
    fn test_root_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root_path = temp_dir.path().join("drive");
        assert!(!root_path.exists());

        let root = Root::open(&root_path).unwrap();

        assert!(root_path.is_dir());
        assert_eq!(root.path(), root_path.canonicalize().unwrap());
    }

    #[test]
    fn test_root_open_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("plain");
        std::fs::write(&file_path, b"not a dir").unwrap();

        assert!(Root::open(&file_path).is_err());
    }

    #[test]
    fn test_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let root = Root::open(temp_dir.path()).unwrap();

        let name = EntryName::parse("report").unwrap();
        assert_eq!(
            root.resolve(&EntryPath::root(name.clone())),
            root.path().join("report")
        );

        let parent = Segment::parse("projectA").unwrap();
        assert_eq!(
            root.resolve(&EntryPath::new(Some(parent.clone()), name)),
            root.path().join("projectA").join("report")
        );
        assert_eq!(root.dir(Some(&parent)), root.path().join("projectA"));
        assert_eq!(root.dir(None), root.path());
    }
}
