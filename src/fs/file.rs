//! Local and remote file descriptions.

use std::path::{Path, PathBuf};

use crate::error::{CloudError, Result};

/// A file registered in the cloud by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    name: String,
    full_path: String,
    hash: String,
    size: u64,
    public_link: Option<String>,
    last_modified: i64,
}

impl RemoteFile {
    pub(crate) fn new(name: String, full_path: String, hash: String, size: u64) -> Self {
        Self {
            name,
            full_path,
            hash,
            size,
            public_link: None,
            last_modified: 0,
        }
    }

    /// File name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full cloud path including the name, URL-decoded.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Server-computed content hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// File size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Public link, when the server reported one.
    pub fn public_link(&self) -> Option<&str> {
        self.public_link.as_deref()
    }

    /// Last modification time (Unix epoch seconds, 0 if unknown).
    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Directory holding the file, with trailing slash.
    pub fn parent_dir(&self) -> &str {
        self.full_path
            .strip_suffix(self.name.as_str())
            .unwrap_or(&self.full_path)
    }
}

/// A local file ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Name sent to the server.
    pub name: String,
    /// Where the bytes are read from.
    pub path: PathBuf,
    /// Number of bytes to send.
    pub size: u64,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
        }
    }

    /// Describe a file on disk, taking name and size from the filesystem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| {
                CloudError::Validation(format!("Invalid file path: {}", path.display()))
            })?
            .to_string_lossy()
            .to_string();

        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(CloudError::Validation(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        Ok(Self::new(name, path, metadata.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parent_dir() {
        let file = RemoteFile::new(
            "a.txt".into(),
            "/docs/my files/a.txt".into(),
            "h".into(),
            1,
        );
        assert_eq!(file.parent_dir(), "/docs/my files/");
        assert!(file.public_link().is_none());
        assert_eq!(file.last_modified(), 0);
    }

    #[test]
    fn test_local_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.bin");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[7u8; 42])
            .unwrap();

        let local = LocalFile::from_path(&path).unwrap();
        assert_eq!(local.name, "report.bin");
        assert_eq!(local.size, 42);
        assert_eq!(local.path, path);
    }

    #[test]
    fn test_local_file_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LocalFile::from_path(dir.path()).unwrap_err().is_validation());
    }

    #[test]
    fn test_local_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFile::from_path(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CloudError::Io(_)));
    }
}
