//! Input file admission and text decoding
//!
//! Supplies decoded lines to the parser. Files are admitted by existence and
//! size, then decoded as UTF-8 with a Latin-1 fallback. An unusual extension
//! is only logged.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::ACCEPTED_EXTENSIONS;
use crate::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encoding a source was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    /// ISO-8859-1, one byte per character
    Latin1,
}

/// Decoded text of one admitted input file
#[derive(Debug, Clone)]
pub struct LineSource {
    pub path: PathBuf,
    pub encoding: SourceEncoding,
    pub size_bytes: u64,
    text: String,
}

impl LineSource {
    /// Admit and decode a file
    pub fn open(path: &Path, max_file_size_mb: u64) -> Result<Self> {
        let size_bytes = admit_file(path, max_file_size_mb)?;
        let bytes = fs::read(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

        if bytes.contains(&0) {
            return Err(Error::encoding(
                path.display().to_string(),
                "file contains NUL bytes and is not a text file",
            ));
        }

        let (text, encoding) = decode_bytes(&bytes);
        if encoding == SourceEncoding::Latin1 {
            warn!("{} is not valid UTF-8, decoded as Latin-1", path.display());
        }
        debug!("Read {} ({} bytes)", path.display(), size_bytes);

        Ok(Self {
            path: path.to_path_buf(),
            encoding,
            size_bytes,
            text,
        })
    }

    /// Wrap already-decoded text
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            path: path.into(),
            encoding: SourceEncoding::Utf8,
            size_bytes: text.len() as u64,
            text,
        }
    }

    /// Lines without their terminators
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Check a file against the admission policy and return its size
pub fn admit_file(path: &Path, max_file_size_mb: u64) -> Result<u64> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(Error::file_not_found(display));
    }

    let metadata = fs::metadata(path)
        .map_err(|e| Error::io(format!("Failed to read metadata of {}", display), e))?;

    if !metadata.is_file() {
        return Err(Error::file_admission(display, "not a regular file"));
    }

    if path.extension().is_some() && !has_accepted_extension(path) {
        warn!(
            "{} has an unusual extension (expected one of: {})",
            path.display(),
            ACCEPTED_EXTENSIONS.join(", ")
        );
    }

    let size = metadata.len();
    if size == 0 {
        return Err(Error::file_admission(display, "file is empty"));
    }

    let max_bytes = max_file_size_mb.saturating_mul(1024 * 1024);
    if size > max_bytes {
        return Err(Error::file_admission(
            display,
            format!(
                "file is {} bytes, above the {} MB limit",
                size, max_file_size_mb
            ),
        ));
    }

    Ok(size)
}

/// True when the extension is accepted, ignoring case
pub fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Decode bytes as UTF-8, falling back to Latin-1; a UTF-8 BOM is dropped
pub fn decode_bytes(bytes: &[u8]) -> (String, SourceEncoding) {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(_) => (
            bytes.iter().map(|&b| char::from(b)).collect(),
            SourceEncoding::Latin1,
        ),
    }
}

/// Expand files and directories into input files, keeping argument order
///
/// Directories are walked recursively for accepted extensions, sorted by
/// path. Files named directly are kept as given and checked at admission.
pub fn discover_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = entry?;
                if entry.file_type().is_file() && has_accepted_extension(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            debug!("Found {} input files under {}", found.len(), input.display());
            files.extend(found);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(Error::file_not_found(input.display().to_string()));
        }
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|path| seen.insert(path.clone()));

    info!("Discovered {} input files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn temp_file_with(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_utf8_file() {
        let file = temp_file_with(".txt", "|C010|11222333000181|1|\n|9999|1|\n".as_bytes());
        let source = LineSource::open(file.path(), 100).unwrap();

        assert_eq!(source.encoding, SourceEncoding::Utf8);
        assert_eq!(source.lines().count(), 2);
    }

    #[test]
    fn test_latin1_fallback() {
        // "Saída" with 0xED as in ISO-8859-1
        let file = temp_file_with(".sped", b"|0000|Sa\xEDda|\r\n");
        let source = LineSource::open(file.path(), 100).unwrap();

        assert_eq!(source.encoding, SourceEncoding::Latin1);
        assert_eq!(source.lines().next(), Some("|0000|Saída|"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let (text, encoding) = decode_bytes(b"\xEF\xBB\xBF|C010|x|");
        assert_eq!(encoding, SourceEncoding::Utf8);
        assert_eq!(text, "|C010|x|");
    }

    #[test]
    fn test_admission_rejections() {
        let missing = PathBuf::from("/nonexistent/file.txt");
        match admit_file(&missing, 100) {
            Err(Error::FileNotFound { .. }) => {}
            other => panic!("Expected FileNotFound, got {:?}", other),
        }

        let empty = temp_file_with(".txt", b"");
        match admit_file(empty.path(), 100) {
            Err(Error::FileAdmission { reason, .. }) => assert!(reason.contains("empty")),
            other => panic!("Expected FileAdmission, got {:?}", other),
        }

        let oversized = temp_file_with(".txt", &vec![b'a'; 2 * 1024 * 1024]);
        match admit_file(oversized.path(), 1) {
            Err(Error::FileAdmission { reason, .. }) => assert!(reason.contains("limit")),
            other => panic!("Expected FileAdmission, got {:?}", other),
        }

        let dir = TempDir::new().unwrap();
        assert!(admit_file(dir.path(), 100).is_err());
    }

    #[test]
    fn test_admission_accepts_any_extension() {
        let unusual = temp_file_with(".csv", b"|C010|x|");
        assert_eq!(admit_file(unusual.path(), 100).unwrap(), 8);

        let dir = TempDir::new().unwrap();
        let bare = dir.path().join("SPED_EFD_2024");
        fs::write(&bare, "|9999|1|\n").unwrap();
        assert_eq!(admit_file(&bare, 100).unwrap(), 9);

        let source = LineSource::open(&bare, 100).unwrap();
        assert_eq!(source.lines().next(), Some("|9999|1|"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(has_accepted_extension(Path::new("EFD.TXT")));
        assert!(has_accepted_extension(Path::new("efd.Sped")));
        assert!(!has_accepted_extension(Path::new("efd.txt.gz")));
        assert!(!has_accepted_extension(Path::new("efd")));
    }

    #[test]
    fn test_binary_file_is_rejected() {
        let file = temp_file_with(".txt", b"|C010|\0\0|");
        match LineSource::open(file.path(), 100) {
            Err(Error::Encoding { .. }) => {}
            other => panic!("Expected Encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_input_files() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.txt"), "|9999|1|").unwrap();
        fs::write(dir.path().join("a.SPED"), "|9999|1|").unwrap();
        fs::write(nested.join("c.txt"), "|9999|1|").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let files = discover_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.SPED", "b.txt", "nested/c.txt"]);

        let direct = dir.path().join("b.txt");
        let files = discover_input_files(&[direct.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(files[0], direct);
        assert_eq!(files.len(), 3);

        assert!(discover_input_files(&[PathBuf::from("/nonexistent/dir")]).is_err());
    }
}
