//! File upload storage.
//!
//! Uploaded files land under the configured upload root as
//! `<category>/<uuid>.<ext>` and are served back via `/media`. Each upload
//! kind carries its own content-type allow-list and size cap.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::error::AppError;

/// What is being uploaded; decides allow-list, size cap and subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Admin-uploaded product photo.
    ProductImage,
    /// Customer-uploaded payment confirmation (bank transfer receipt).
    PaymentConfirmation,
    /// Customer profile picture.
    ProfilePicture,
}

impl UploadKind {
    /// Subdirectory under the upload root.
    #[must_use]
    pub const fn subdir(self) -> &'static str {
        match self {
            Self::ProductImage => "products",
            Self::PaymentConfirmation => "payment-confirmations",
            Self::ProfilePicture => "profiles",
        }
    }

    /// Maximum accepted size in bytes.
    #[must_use]
    pub const fn max_bytes(self) -> usize {
        match self {
            Self::ProductImage => 5 * 1024 * 1024,
            Self::PaymentConfirmation => 10 * 1024 * 1024,
            Self::ProfilePicture => 2 * 1024 * 1024,
        }
    }

    /// Accepted content types with their canonical extensions.
    #[must_use]
    pub const fn allowed_types(self) -> &'static [(&'static str, &'static str)] {
        const IMAGES: &[(&str, &str)] = &[
            ("image/png", "png"),
            ("image/jpeg", "jpg"),
            ("image/webp", "webp"),
        ];
        const IMAGES_AND_PDF: &[(&str, &str)] = &[
            ("image/png", "png"),
            ("image/jpeg", "jpg"),
            ("image/webp", "webp"),
            ("application/pdf", "pdf"),
        ];
        match self {
            Self::ProductImage | Self::ProfilePicture => IMAGES,
            Self::PaymentConfirmation => IMAGES_AND_PDF,
        }
    }

    /// Resolve a content type to a file extension, if accepted.
    #[must_use]
    pub fn extension_for(self, content_type: &str) -> Option<&'static str> {
        self.allowed_types()
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
    }
}

/// Errors from storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Content type is not on the allow-list for this upload kind.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// File exceeds the size cap for this upload kind.
    #[error("file too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: usize },

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedType(_) | UploadError::TooLarge { .. } => {
                Self::BadRequest(err.to_string())
            }
            UploadError::Io(e) => Self::Internal(format!("upload storage failed: {e}")),
        }
    }
}

/// Validate and store an uploaded file.
///
/// Returns the stored path relative to the upload root (the value persisted
/// on the owning entity and served under `/media`).
///
/// # Errors
///
/// Returns `UploadError::UnsupportedType` or `TooLarge` on validation
/// failure, `Io` when the file cannot be written.
pub async fn store(
    upload_root: &Path,
    kind: UploadKind,
    content_type: &str,
    bytes: &[u8],
) -> Result<String, UploadError> {
    let ext = kind
        .extension_for(content_type)
        .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))?;

    if bytes.len() > kind.max_bytes() {
        return Err(UploadError::TooLarge {
            max_bytes: kind.max_bytes(),
        });
    }

    let relative = format!("{}/{}.{ext}", kind.subdir(), Uuid::new_v4());
    let full: PathBuf = upload_root.join(&relative);

    if let Some(parent) = full.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&full, bytes).await?;

    tracing::info!(path = %relative, size = bytes.len(), "Stored upload");
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_types_per_kind() {
        assert!(UploadKind::ProductImage.extension_for("image/png").is_some());
        assert!(UploadKind::ProductImage.extension_for("application/pdf").is_none());
        // Payment confirmations accept PDF too
        assert_eq!(
            UploadKind::PaymentConfirmation.extension_for("application/pdf"),
            Some("pdf")
        );
        assert!(UploadKind::ProfilePicture.extension_for("application/pdf").is_none());
    }

    #[test]
    fn test_size_caps() {
        assert_eq!(UploadKind::ProfilePicture.max_bytes(), 2 * 1024 * 1024);
        assert!(UploadKind::PaymentConfirmation.max_bytes() > UploadKind::ProductImage.max_bytes());
    }

    #[tokio::test]
    async fn test_store_rejects_unknown_type() {
        let dir = std::env::temp_dir().join(format!("shortcakes-test-{}", Uuid::new_v4()));
        let result = store(&dir, UploadKind::ProductImage, "text/html", b"<html>").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType(_))));
    }

    #[tokio::test]
    async fn test_store_rejects_oversize() {
        let dir = std::env::temp_dir().join(format!("shortcakes-test-{}", Uuid::new_v4()));
        let bytes = vec![0u8; UploadKind::ProfilePicture.max_bytes() + 1];
        let result = store(&dir, UploadKind::ProfilePicture, "image/png", &bytes).await;
        assert!(matches!(result, Err(UploadError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = std::env::temp_dir().join(format!("shortcakes-test-{}", Uuid::new_v4()));
        let path = store(&dir, UploadKind::ProductImage, "image/jpeg", b"jpegdata")
            .await
            .expect("store succeeds");
        assert!(path.starts_with("products/"));
        assert!(path.ends_with(".jpg"));
        let on_disk = tokio::fs::read(dir.join(&path)).await.expect("file exists");
        assert_eq!(on_disk, b"jpegdata");
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
