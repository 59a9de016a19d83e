use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use super::{FetchError, Result};

/// Every PDF file starts with this header
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// A validated PDF in a temporary file.
///
/// The file is deleted when this value is dropped, so the holder decides how
/// long it lives: keep it until the library has copied it, then let it go.
#[derive(Debug)]
pub struct StagedPdf {
    file: NamedTempFile,
    size: usize,
}

impl StagedPdf {
    /// Empty `.pdf` temp file for a download to stream into
    pub fn temp_file() -> Result<NamedTempFile> {
        Ok(Builder::new()
            .prefix("zotbridge-")
            .suffix(".pdf")
            .tempfile()?)
    }

    /// Take ownership of a fully written temp file once its signature checks out.
    ///
    /// Returns [`FetchError::NotAPdf`] when the file does not start with
    /// [`PDF_MAGIC`]; the file is removed in that case.
    pub fn from_file(file: NamedTempFile) -> Result<Self> {
        if !has_pdf_signature(file.path())? {
            return Err(FetchError::NotAPdf);
        }

        let size = file.as_file().metadata()?.len() as usize;
        Ok(Self { file, size })
    }

    /// Write `bytes` to a fresh temp file and validate it
    pub fn stage(bytes: &[u8]) -> Result<Self> {
        let mut file = Self::temp_file()?;
        file.write_all(bytes)?;
        file.flush()?;
        Self::from_file(file)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Inspect the first bytes of a file for the PDF header
pub fn has_pdf_signature(path: &Path) -> std::io::Result<bool> {
    let mut header = Vec::with_capacity(PDF_MAGIC.len());
    File::open(path)?
        .take(PDF_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    Ok(header == PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_valid_pdf() {
        let staged = StagedPdf::stage(b"%PDF-1.7\n%binary\n").unwrap();

        assert!(staged.path().exists());
        assert_eq!(staged.path().extension().unwrap(), "pdf");
        assert_eq!(staged.size(), 17);
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"%PDF-1.7\n%binary\n");
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let staged = StagedPdf::stage(b"%PDF-1.4").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_reject_html_and_short_files() {
        assert!(matches!(
            StagedPdf::stage(b"<html><body>Login required</body></html>"),
            Err(FetchError::NotAPdf)
        ));
        assert!(matches!(StagedPdf::stage(b"%PD"), Err(FetchError::NotAPdf)));
        assert!(matches!(StagedPdf::stage(b""), Err(FetchError::NotAPdf)));
    }
}
