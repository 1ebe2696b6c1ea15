//! Whole-file read/write of obfuscated text.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::codec::XorCodec;
use crate::error::{Error, Result};

/// Read and reveal the file at `path`.
///
/// A missing file reads as empty text. Bytes that are not valid UTF-8 after
/// revealing are replaced rather than failing the load.
pub(crate) fn read_text(path: &Path, codec: &XorCodec) -> Result<String> {
    let mut bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = Error::from(e);
            if err.is_not_found() {
                debug!("{} not found, treating as empty", path.display());
                return Ok(String::new());
            }
            return Err(err);
        }
    };
    codec.apply(&mut bytes);

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(
                "{} is not valid UTF-8 after decoding, damaged bytes replaced",
                path.display()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Like [`read_text`], but any I/O error degrades to empty text.
pub(crate) fn read_text_or_empty(path: &Path, codec: &XorCodec) -> String {
    read_text(path, codec).unwrap_or_else(|e| {
        warn!("Failed to read {}: {}", path.display(), e);
        String::new()
    })
}

/// Obscure `text` and replace the file at `path` with it.
pub(crate) fn write_text(path: &Path, codec: &XorCodec, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, codec.obscure(text.as_bytes()))?;
    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let text = read_text(&dir.path().join("absent.bin"), &XorCodec::default()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.bin");
        let codec = XorCodec::default();

        write_text(&path, &codec, "hello|world").unwrap();

        let raw = fs::read(&path).unwrap();
        assert_ne!(raw, b"hello|world");
        assert_eq!(read_text(&path, &codec).unwrap(), "hello|world");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.bin");
        let codec = XorCodec::default();
        let mut raw = b"ok".to_vec();
        raw.push(0xff);
        fs::write(&path, codec.obscure(&raw)).unwrap();

        let text = read_text(&path, &codec).unwrap();
        assert!(text.starts_with("ok"));
    }

    #[test]
    fn test_read_directory_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_text(dir.path(), &XorCodec::default()).is_err());
        assert!(read_text_or_empty(dir.path(), &XorCodec::default()).is_empty());
    }
}
