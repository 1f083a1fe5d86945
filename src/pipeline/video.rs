use std::path::Path;

use crate::error::{Result, VidlingoError};
use crate::media::SUPPORTED_VIDEO_EXTENSIONS;

/// Video bytes handed over by the caller, with the declared container.
#[derive(Clone)]
pub struct UploadedVideo {
    bytes: Vec<u8>,
    extension: String,
}

impl UploadedVideo {
    pub fn new<S: AsRef<str>>(bytes: Vec<u8>, extension: S) -> Self {
        Self {
            bytes,
            extension: extension.as_ref().trim_start_matches('.').to_lowercase(),
        }
    }

    /// Load a video file, taking the extension from its name.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(bytes, extension))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Suffix for the scratch copy, e.g. `.mkv`
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(VidlingoError::Validation("Please upload a video file".to_string()));
        }
        if !SUPPORTED_VIDEO_EXTENSIONS.contains(&self.extension.as_str()) {
            return Err(VidlingoError::Validation(format!(
                "Unsupported video format '{}'. Supported formats: {}",
                self.extension,
                SUPPORTED_VIDEO_EXTENSIONS.join(", ")
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for UploadedVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedVideo")
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_normalized() {
        let video = UploadedVideo::new(vec![1, 2, 3], ".MKV");
        assert_eq!(video.extension(), "mkv");
        assert_eq!(video.suffix(), ".mkv");
        assert!(video.validate().is_ok());
    }

    #[test]
    fn empty_video_is_rejected() {
        let video = UploadedVideo::new(Vec::new(), "mp4");
        assert!(matches!(video.validate(), Err(VidlingoError::Validation(_))));
    }

    #[test]
    fn unsupported_container_is_rejected() {
        let video = UploadedVideo::new(vec![0; 16], "webm");
        let err = video.validate().unwrap_err();
        assert!(err.to_string().contains("mp4, mov, avi, mkv"));
    }

    #[tokio::test]
    async fn from_path_reads_bytes_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"not really a movie").unwrap();

        let video = UploadedVideo::from_path(&path).await.unwrap();
        assert_eq!(video.extension(), "mov");
        assert_eq!(video.len(), 18);
    }
}
