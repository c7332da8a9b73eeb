//! Validation of user-supplied reference photos.

use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

use crate::models::{ReferenceImage, ReferenceUpload};

/// 5 MB cap on the decoded payload.
pub const MAX_REFERENCE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ReferenceImageError {
    #[error("Image is too large ({size} bytes). Maximum is 5MB.")]
    TooLarge { size: usize },
    #[error("Image is too large. Maximum is 5MB.")]
    ExceedsUploadLimit,
    #[error("Reference image is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    #[error("Reference image is empty.")]
    Empty,
    #[error("Reference image is not a recognised image format.")]
    NotAnImage,
}

impl ReferenceImage {
    /// Decodes and checks an upload. Accepts bare base64 or a full data URL.
    /// An explicit `mimeType` wins over the one in a data URL, and both win
    /// over the type sniffed from the payload's magic bytes.
    pub fn from_upload(upload: ReferenceUpload) -> Result<Self, ReferenceImageError> {
        let (url_mime, payload) = split_data_url(upload.data.trim());

        // Base64 inflates by 4/3; reject obviously oversized payloads before decoding.
        if payload.len() / 4 * 3 > MAX_REFERENCE_BYTES + 2 {
            return Err(ReferenceImageError::TooLarge { size: payload.len() / 4 * 3 });
        }

        let decoded = base64::engine::general_purpose::STANDARD.decode(payload)?;
        if decoded.is_empty() {
            return Err(ReferenceImageError::Empty);
        }
        if decoded.len() > MAX_REFERENCE_BYTES {
            return Err(ReferenceImageError::TooLarge { size: decoded.len() });
        }

        let sniffed = image::guess_format(&decoded).map_err(|_| ReferenceImageError::NotAnImage)?;
        let mime_type = upload
            .mime_type
            .filter(|m| !m.is_empty())
            .or(url_mime)
            .unwrap_or_else(|| sniffed.to_mime_type().to_string());

        Ok(Self { bytes: Bytes::from(decoded), mime_type })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn split_data_url(data: &str) -> (Option<String>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.trim_end_matches(";base64");
            (Some(mime.to_string()).filter(|m| !m.is_empty()), payload)
        }
        None => (None, data),
    }
}
