use std::path::{Path, PathBuf};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use image::ImageFormat;
use shared::ErrorResponse;
use uuid::Uuid;

/// URL prefix under which stored uploads are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("multipart error: {0}")]
    Multipart(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No file part")]
    MissingFile,
    #[error("File too large")]
    FileTooLarge,
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Multipart(_) | UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::MissingFile => StatusCode::BAD_REQUEST,
            UploadError::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            UploadError::Multipart(_) | UploadError::Io(_) => "Upload failed".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error })
    }
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            return Err(UploadError::FileTooLarge);
        }
        Ok(())
    }

    /// Extension from the client filename, falling back to the part's MIME type.
    pub fn file_extension(filename: Option<&str>, mime_type: Option<&str>) -> Option<String> {
        let from_name = filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| is_safe_extension(ext))
            .map(str::to_string);

        from_name.or_else(|| {
            mime_type
                .and_then(ImageFormat::from_mime_type)
                .and_then(|format| format.extensions_str().first())
                .map(|ext| ext.to_string())
        })
    }

    pub fn generate_file_name(extension: Option<&str>) -> String {
        match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }

    /// Writes the upload and returns the path it is served under.
    pub async fn save(&self, data: &[u8], extension: Option<&str>) -> Result<String, UploadError> {
        self.check_size(data.len())?;
        self.ensure_dir().await?;

        let file_name = Self::generate_file_name(extension);
        tokio::fs::write(self.dir.join(&file_name), data).await?;
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_comes_from_filename_first() {
        assert_eq!(
            UploadStore::file_extension(Some("hornero.PNG"), Some("image/jpeg")).as_deref(),
            Some("PNG")
        );
        assert_eq!(
            UploadStore::file_extension(Some("dir/../bird.photo.webp"), None).as_deref(),
            Some("webp")
        );
    }

    #[test]
    fn extension_falls_back_to_mime_type() {
        assert_eq!(
            UploadStore::file_extension(Some("blob"), Some("image/png")).as_deref(),
            Some("png")
        );
        assert_eq!(
            UploadStore::file_extension(None, Some("image/jpeg")).as_deref(),
            Some("jpg")
        );
        assert_eq!(UploadStore::file_extension(Some("weird.p/ng"), None), None);
        assert_eq!(UploadStore::file_extension(None, Some("text/plain")), None);
    }

    #[test]
    fn size_limit_is_inclusive() {
        let store = UploadStore::new("unused", 10);
        assert!(store.check_size(10).is_ok());
        assert!(matches!(store.check_size(11), Err(UploadError::FileTooLarge)));
    }

    #[test]
    fn generated_names_keep_extension() {
        let name = UploadStore::generate_file_name(Some("gif"));
        assert!(name.ends_with(".gif"));
        assert_ne!(name, UploadStore::generate_file_name(Some("gif")));
        assert!(!UploadStore::generate_file_name(None).contains('.'));
    }

    #[actix_web::test]
    async fn save_writes_into_upload_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("uploads"), 1024);

        let path = store.save(b"abc", Some("jpg")).await.unwrap();
        let name = path.strip_prefix("/uploads/").unwrap();
        let written = std::fs::read(tmp.path().join("uploads").join(name)).unwrap();
        assert_eq!(written, b"abc");
    }
}
