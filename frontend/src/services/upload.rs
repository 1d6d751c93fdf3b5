use std::path::Path;

use anyhow::Context;

use crate::services::api::ApiError;

/// Largest image accepted for extraction (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Image extensions the AI backend accepts
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "png", "gif", "bmp", "webp"];

/// Image file validated for upload to the AI backend
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate size and extension before any network call is made
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let upload = Self {
            file_name: file_name.into(),
            bytes,
        };

        if upload.is_empty() {
            return Err(ApiError::InvalidUpload(format!("{} is empty", upload.file_name)));
        }
        if upload.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::InvalidUpload(
                "File size must be less than 10MB".to_string(),
            ));
        }
        if !ACCEPTED_EXTENSIONS.contains(&upload.extension().as_str()) {
            return Err(ApiError::InvalidUpload(format!(
                "Unsupported image type for {} (accepted: {})",
                upload.file_name,
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        Ok(upload)
    }

    /// Read and validate an image from disk
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(file_name, bytes)?)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased extension, empty when the name has none
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_str() {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepts_known_image_types() {
        let upload = ImageUpload::new("Scan.PNG", vec![1, 2, 3]).unwrap();
        assert_eq!(upload.extension(), "png");
        assert_eq!(upload.mime_type(), "image/png");
        assert_eq!(upload.len(), 3);

        let jpeg = ImageUpload::new("cheque.jpg", vec![0xff]).unwrap();
        assert_eq!(jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_rejects_invalid_uploads() {
        assert!(matches!(
            ImageUpload::new("notes.pdf", vec![1]),
            Err(ApiError::InvalidUpload(_))
        ));
        assert!(matches!(
            ImageUpload::new("empty.png", Vec::new()),
            Err(ApiError::InvalidUpload(_))
        ));

        let oversized = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = ImageUpload::new("huge.png", oversized).unwrap_err();
        assert_eq!(err.to_string(), "Invalid upload: File size must be less than 10MB");
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("facture.webp");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"RIFF").unwrap();

        let upload = ImageUpload::read(&path).unwrap();
        assert_eq!(upload.file_name(), "facture.webp");
        assert_eq!(upload.bytes(), b"RIFF");

        assert!(ImageUpload::read(&dir.path().join("missing.png")).is_err());
    }
}
