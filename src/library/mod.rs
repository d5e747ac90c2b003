//! Audio library module
//!
//! Owns the configured audio directory and implements the two operations the
//! HTTP layer exposes: listing its regular files and reading one of them.

mod listing;
mod resolve;

pub use listing::render_index;
pub use resolve::decode_file_name;

use crate::error::{Result, ServeError};
use crate::http::mime;
use crate::logger;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A file read from the library, ready to be sent
#[derive(Debug)]
pub struct AudioFile {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// The audio directory exposed by the server
#[derive(Debug, Clone)]
pub struct AudioLibrary {
    root: PathBuf,
}

impl AudioLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Names of the regular files directly inside the directory
    ///
    /// Order is whatever the filesystem yields. Symlinks are followed and kept
    /// only when their target is a regular file inside the directory, so every
    /// listed name can be served. Names that are not UTF-8 are skipped.
    pub async fn list_entries(&self) -> Result<Vec<String>> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|source| self.access_error(source))?;
        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|source| self.access_error(source))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|source| self.access_error(source))?
        {
            if !is_listable(&root, &entry.path()).await {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => logger::log_warning(&format!(
                    "Skipping non UTF-8 file name in '{}': {}",
                    self.root.display(),
                    raw.to_string_lossy()
                )),
            }
        }

        Ok(names)
    }

    /// Resolve `file_name` to a canonical path inside the directory
    pub async fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        resolve::check_file_name(file_name)?;

        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Audio directory not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return Err(ServeError::NotFound(file_name.to_string()));
            }
        };

        // Missing files are the common 404 case, not worth a log line
        let Ok(canonical) = fs::canonicalize(root.join(file_name)).await else {
            return Err(ServeError::NotFound(file_name.to_string()));
        };
        if !resolve::is_contained(&root, &canonical) {
            return Err(ServeError::PathTraversal(format!(
                "{file_name} -> {}",
                canonical.display()
            )));
        }

        match fs::metadata(&canonical).await {
            Ok(meta) if meta.is_file() => Ok(canonical),
            _ => Err(ServeError::NotFound(file_name.to_string())),
        }
    }

    /// Read a file's bytes and infer its content type
    pub async fn read(&self, file_name: &str) -> Result<AudioFile> {
        let path = self.resolve(file_name).await?;

        let content = fs::read(&path).await.map_err(|e| {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            ServeError::NotFound(file_name.to_string())
        })?;
        let content_type = mime::content_type_for(&path);

        Ok(AudioFile {
            content,
            content_type,
        })
    }

    fn access_error(&self, source: std::io::Error) -> ServeError {
        ServeError::DirectoryAccess {
            path: self.root.clone(),
            source,
        }
    }
}

/// Regular file (after following links) whose target stays under `root`
async fn is_listable(root: &Path, path: &Path) -> bool {
    let Ok(canonical) = fs::canonicalize(path).await else {
        return false;
    };
    if !resolve::is_contained(root, &canonical) {
        return false;
    }
    fs::metadata(&canonical).await.is_ok_and(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn library_with(files: &[(&str, &[u8])]) -> (tempfile::TempDir, AudioLibrary) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        let library = AudioLibrary::new(dir.path());
        (dir, library)
    }

    #[tokio::test]
    async fn test_list_excludes_subdirectories() {
        let (dir, library) = library_with(&[("a.mp3", "aaa".as_bytes()), ("b.wav", "bbb".as_bytes())]);
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.mp3"), b"ccc").unwrap();

        let names: HashSet<String> = library.list_entries().await.unwrap().into_iter().collect();
        let expected: HashSet<String> = ["a.mp3", "b.wav"].iter().map(ToString::to_string).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let (_dir, library) = library_with(&[]);
        assert!(library.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let library = AudioLibrary::new(dir.path().join("gone"));
        let err = library.list_entries().await.unwrap_err();
        assert!(matches!(err, ServeError::DirectoryAccess { .. }));
    }

    #[tokio::test]
    async fn test_read_returns_exact_bytes() {
        let payload: &[u8] = &[0x49, 0x44, 0x33, 0x04, 0x00, 0xff, 0x10];
        let (_dir, library) = library_with(&[("a.mp3", payload)]);

        let file = library.read("a.mp3").await.unwrap();
        assert_eq!(file.content, payload);
        assert_eq!(file.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let (_dir, library) = library_with(&[("a.mp3", "aaa".as_bytes())]);
        let err = library.read("missing.mp3").await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_directory_is_not_found() {
        let (dir, library) = library_with(&[]);
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let err = library.read("sub").await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_rejects_traversal() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
        let audio = outer.path().join("audio");
        std::fs::create_dir(&audio).unwrap();
        let library = AudioLibrary::new(&audio);

        for name in ["../secret.txt", "..", "sub/../../secret.txt", "..\\secret.txt"] {
            let err = library.read(name).await.unwrap_err();
            assert!(
                matches!(err, ServeError::PathTraversal(_)),
                "{name} was not rejected: {err}"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escaping_root_is_rejected() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"secret").unwrap();
        let audio = outer.path().join("audio");
        std::fs::create_dir(&audio).unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), audio.join("link.mp3")).unwrap();
        let library = AudioLibrary::new(&audio);

        let err = library.read("link.mp3").await.unwrap_err();
        assert!(matches!(err, ServeError::PathTraversal(_)));
        assert!(library.list_entries().await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_inside_root_is_listed_and_served() {
        let (dir, library) = library_with(&[]);
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("real.mp3"), b"real").unwrap();
        std::os::unix::fs::symlink(dir.path().join("sub").join("real.mp3"), dir.path().join("alias.mp3"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("folder-link")).unwrap();

        assert_eq!(library.list_entries().await.unwrap(), vec!["alias.mp3".to_string()]);
        assert_eq!(library.read("alias.mp3").await.unwrap().content, b"real");
    }
}
