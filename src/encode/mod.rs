use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{EncodeError, PipelineError};

pub const DEFAULT_MAX_REFERENCE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    File(PathBuf),
    /// Base64 body of a `data:` URI, header already removed.
    Inline(String),
}

/// A validated reference photo of the yard. Nothing is read until `encode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    source: Source,
    media_type: String,
    size: u64,
}

/// Transport-ready base64 body (no `data:` header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// Splits `data:<mime>;base64,<body>` into its media type and body.
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (header, body) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    Some((media_type, body))
}

fn check(media_type: &str, size: u64, max_bytes: u64) -> Result<(), PipelineError> {
    if !media_type.starts_with("image/") {
        return Err(PipelineError::UnsupportedMediaType(media_type.to_string()));
    }
    if size > max_bytes {
        return Err(PipelineError::PayloadTooLarge { size, max: max_bytes });
    }
    Ok(())
}

impl ReferenceImage {
    pub fn from_path(path: impl Into<PathBuf>, max_bytes: u64) -> Result<Self, PipelineError> {
        let path = path.into();
        let media_type = mime_for_path(&path)
            .ok_or_else(|| PipelineError::UnsupportedMediaType(path.display().to_string()))?;
        let size = fs_err::metadata(&path)
            .map_err(|e| PipelineError::UnreadableReference(e.to_string()))?
            .len();
        check(media_type, size, max_bytes)?;
        Ok(Self { source: Source::File(path), media_type: media_type.to_string(), size })
    }

    pub fn from_data_uri(uri: &str, max_bytes: u64) -> Result<Self, PipelineError> {
        let (media_type, body) = split_data_uri(uri)
            .ok_or_else(|| PipelineError::UnsupportedMediaType("not a base64 data URI".into()))?;
        let size = (body.len() as u64) * 3 / 4;
        check(media_type, size, max_bytes)?;
        Ok(Self {
            source: Source::Inline(body.to_string()),
            media_type: media_type.to_string(),
            size,
        })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn label(&self) -> String {
        match &self.source {
            Source::File(p) => p.display().to_string(),
            Source::Inline(_) => format!("inline {}", self.media_type),
        }
    }

    pub async fn encode(&self) -> Result<EncodedPayload, EncodeError> {
        match &self.source {
            Source::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| EncodeError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                debug!(path = %path.display(), bytes = bytes.len(), "encoded reference image");
                Ok(EncodedPayload(BASE64.encode(bytes)))
            }
            Source::Inline(body) => Ok(EncodedPayload(body.clone())),
        }
    }
}

/// Holds at most one reference image. Replacing or clearing drops the old one.
#[derive(Debug, Default)]
pub struct ReferenceSlot {
    current: Option<ReferenceImage>,
}

impl ReferenceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, image: ReferenceImage) -> Option<ReferenceImage> {
        self.current.replace(image)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<&ReferenceImage> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn encodes_file_without_header() {
        let mut f = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        f.write_all(b"hello yard").unwrap();
        let img = ReferenceImage::from_path(f.path(), DEFAULT_MAX_REFERENCE_BYTES).unwrap();
        assert_eq!(img.media_type(), "image/png");
        assert_eq!(img.size(), 10);
        let payload = img.encode().await.unwrap();
        assert_eq!(payload.as_str(), BASE64.encode(b"hello yard"));
        assert!(!payload.as_str().starts_with("data:"));
    }

    #[test]
    fn rejects_non_image_extension() {
        let f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = ReferenceImage::from_path(f.path(), DEFAULT_MAX_REFERENCE_BYTES).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedMediaType(_)));
    }

    #[test]
    fn rejects_oversized_file_before_reading() {
        let mut f = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        f.write_all(&[0u8; 64]).unwrap();
        let err = ReferenceImage::from_path(f.path(), 32).unwrap_err();
        assert_eq!(err, PipelineError::PayloadTooLarge { size: 64, max: 32 });
    }

    #[tokio::test]
    async fn data_uri_header_is_stripped() {
        let img = ReferenceImage::from_data_uri("data:image/jpeg;base64,QUJDRA==", 1024).unwrap();
        assert_eq!(img.media_type(), "image/jpeg");
        assert_eq!(img.encode().await.unwrap().as_str(), "QUJDRA==");
    }

    #[test]
    fn data_uri_must_be_an_image() {
        let err = ReferenceImage::from_data_uri("data:text/plain;base64,QUJD", 1024).unwrap_err();
        assert_eq!(err, PipelineError::UnsupportedMediaType("text/plain".into()));
        assert!(ReferenceImage::from_data_uri("https://example.com/a.png", 1024).is_err());
    }

    #[test]
    fn oversized_data_uri_is_rejected() {
        // 16 base64 chars decode to 12 bytes
        let uri = "data:image/png;base64,QUJDREVGR0hJSktM";
        let err = ReferenceImage::from_data_uri(uri, 8).unwrap_err();
        assert_eq!(err, PipelineError::PayloadTooLarge { size: 12, max: 8 });
        assert_eq!(ReferenceImage::from_data_uri(uri, 12).unwrap().size(), 12);
    }

    #[test]
    fn slot_keeps_only_latest() {
        let a = ReferenceImage::from_data_uri("data:image/png;base64,QQ==", 1024).unwrap();
        let b = ReferenceImage::from_data_uri("data:image/png;base64,Qg==", 1024).unwrap();
        let mut slot = ReferenceSlot::new();
        assert!(slot.set(a.clone()).is_none());
        assert_eq!(slot.set(b.clone()), Some(a));
        assert_eq!(slot.get(), Some(&b));
        slot.clear();
        assert!(slot.get().is_none());
    }
}
