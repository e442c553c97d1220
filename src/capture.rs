use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use thiserror::Error;

/// MIME type of frames produced by the browser camera page.
pub const JPEG: &str = "image/jpeg";

/// A live video source that can hand out its current frame on demand.
pub trait FrameSource: Send + Sync {
    /// Return the current frame as encoded image bytes, or `None` if the
    /// source has not produced a frame yet.
    fn snapshot(&self) -> Option<Bytes>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// The video source has not produced a frame yet.
    #[error("video source not ready")]
    SourceNotReady,
}

/// One still image taken from the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Bytes,
    mime: &'static str,
}

impl CapturedImage {
    pub fn jpeg(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: JPEG,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as a `data:` URI, the form the recommendation service expects.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, B64.encode(&self.bytes))
    }
}

/// Holds at most one captured image.
#[derive(Debug, Clone, Default)]
pub struct CaptureState {
    image: Option<CapturedImage>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot from `source`, replacing any previous capture.
    ///
    /// Leaves the state untouched when the source is not ready.
    pub fn capture(&mut self, source: &dyn FrameSource) -> Result<(), CaptureError> {
        let frame = source.snapshot().ok_or(CaptureError::SourceNotReady)?;
        tracing::debug!(target: "capture", bytes = frame.len(), "frame captured");
        self.image = Some(CapturedImage::jpeg(frame));
        Ok(())
    }

    /// Retake: drop the current image and go back to awaiting a capture.
    pub fn clear(&mut self) {
        self.image = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }
}
