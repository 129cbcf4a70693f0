use crate::config::ExtractorConfig;
use sd_types::{EngineError, EngineResult, SourceFile};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::ZipArchive;

/// An uploaded source archive
#[derive(Clone, PartialEq, Eq)]
pub struct SourceArchive {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SourceArchive {
    pub fn zip(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "application/zip".to_string(),
            bytes,
        }
    }
}

impl std::fmt::Debug for SourceArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceArchive")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Lists the analyzable source files inside an archive.
///
/// Implementations return `EngineError::NoSourceFiles` rather than an empty list.
pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, archive: &SourceArchive) -> EngineResult<Vec<SourceFile>>;
}

/// Case-insensitive extension filter, stored as lowercase `.ext`
#[derive(Debug, Clone)]
struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| {
                    let e: String = e.into();
                    normalize_extension(&e)
                })
                .collect(),
        )
    }

    fn accepts(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = format!(".{}", ext.to_string_lossy().to_ascii_lowercase());
                self.0.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}

/// Lists source entries of an uploaded zip without unpacking it
#[derive(Debug, Clone)]
pub struct ZipExtractor {
    extensions: ExtensionSet,
}

impl Default for ZipExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl ZipExtractor {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: ExtensionSet::new(extensions),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.extensions.iter().cloned())
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &SourceArchive) -> EngineResult<Vec<SourceFile>> {
        let invalid = |e: ZipError| EngineError::InvalidArchive {
            name: archive.file_name.clone(),
            reason: e.to_string(),
        };
        let mut zip = ZipArchive::new(Cursor::new(archive.bytes.as_slice())).map_err(invalid)?;

        let mut files = Vec::new();
        for index in 0..zip.len() {
            let entry = zip.by_index_raw(index).map_err(invalid)?;
            if entry.is_dir() {
                continue;
            }
            // names that escape the archive root are skipped
            let Some(path) = entry.enclosed_name() else {
                continue;
            };
            if path.components().any(|c| c.as_os_str() == "__MACOSX")
                || !self.extensions.accepts(&path)
            {
                continue;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            files.push(SourceFile::new(name, slash_path(&path)));
        }

        if files.is_empty() {
            return Err(EngineError::NoSourceFiles(archive.file_name.clone()));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(archive = %archive.file_name, files = files.len(), "Archive listed");
        Ok(files)
    }
}

/// Walks an unpacked source tree for files with configured extensions
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    extensions: ExtensionSet,
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl DirectoryScanner {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: ExtensionSet::new(extensions),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.extensions.iter().cloned())
    }

    /// Check if this scanner keeps the given file
    pub fn accepts(&self, path: &Path) -> bool {
        self.extensions.accepts(path)
    }

    /// Source files under `root`, sorted by relative path
    pub fn scan(&self, root: &Path) -> EngineResult<Vec<SourceFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| EngineError::IoError(e.into()))?;
            if !entry.file_type().is_file() || !self.accepts(entry.path()) {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            files.push(SourceFile::new(
                entry.file_name().to_string_lossy().into_owned(),
                slash_path(relative),
            ));
        }

        if files.is_empty() {
            return Err(EngineError::NoSourceFiles(root.display().to_string()));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(root = %root.display(), files = files.len(), "Source tree scanned");
        Ok(files)
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_ascii_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn zip_of(entries: &[&str]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for name in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(b"class X {}").unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_zip_lists_matching_entries() {
        let bytes = zip_of(&[
            "shop/",
            "shop/src/Main.java",
            "shop/src/model/User.JAVA",
            "shop/README.md",
            "__MACOSX/shop/src/._Main.java",
        ]);
        let files = ZipExtractor::default()
            .extract(&SourceArchive::zip("shop.zip", bytes))
            .unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["shop/src/Main.java", "shop/src/model/User.JAVA"]);
        assert_eq!(files[1].name, "User.JAVA");
    }

    #[test]
    fn test_zip_without_sources_fails() {
        let bytes = zip_of(&["docs/", "docs/notes.txt"]);
        let err = ZipExtractor::default()
            .extract(&SourceArchive::zip("docs.zip", bytes))
            .unwrap_err();
        assert!(matches!(err, EngineError::NoSourceFiles(ref name) if name == "docs.zip"));
    }

    #[test]
    fn test_zip_uses_configured_extensions() {
        let bytes = zip_of(&["App.kt", "Main.java"]);
        let config = ExtractorConfig {
            extensions: vec!["kt".to_string()],
        };
        let files = ZipExtractor::from_config(&config)
            .extract(&SourceArchive::zip("app.zip", bytes))
            .unwrap();
        assert_eq!(files, vec![SourceFile::new("App.kt", "App.kt")]);
    }

    #[test]
    fn test_unreadable_zip_is_rejected() {
        let err = ZipExtractor::default()
            .extract(&SourceArchive::zip("broken.zip", b"not a zip".to_vec()))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArchive { .. }));
        assert_eq!(err.kind(), sd_types::ErrorKind::Validation);
    }

    #[test]
    fn test_scan_keeps_matching_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/model")).unwrap();
        fs::write(dir.path().join("src/Main.java"), "class Main {}").unwrap();
        fs::write(dir.path().join("src/model/User.JAVA"), "class User {}").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let files = DirectoryScanner::default().scan(dir.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/Main.java", "src/model/User.JAVA"]);
        assert_eq!(files[0].name, "Main.java");
    }

    #[test]
    fn test_scan_without_sources_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing").unwrap();

        let err = DirectoryScanner::default().scan(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::NoSourceFiles(_)));
    }

    #[test]
    fn test_extensions_are_normalized() {
        let scanner = DirectoryScanner::new(["kt", ".Java"]);
        assert!(scanner.accepts(Path::new("a/B.kt")));
        assert!(scanner.accepts(Path::new("a/B.java")));
        assert!(!scanner.accepts(Path::new("a/B.scala")));
        assert!(!scanner.accepts(Path::new("Makefile")));
    }

    #[test]
    fn test_archive_debug_hides_bytes() {
        let archive = SourceArchive::zip("upload.zip", vec![0u8; 1024]);
        let shown = format!("{:?}", archive);
        assert!(shown.contains("upload.zip"));
        assert!(shown.contains("1024"));
    }
}
