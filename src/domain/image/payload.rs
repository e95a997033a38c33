//! Image payload value object

use base64::Engine;

use crate::domain::error::PayloadError;

/// Anything shorter than this is definitely not an image
pub const MIN_PAYLOAD_BYTES: usize = 100;

const DATA_URI_SCHEME: &str = "data:";

/// Raw image bytes received from a phone, plus the MIME tag it declared.
///
/// Lives for the duration of one upload and is never written to disk.
/// Construction validates the minimum size, so every `ImagePayload` is
/// eligible for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data: Vec<u8>,
    mime_type: Option<String>,
}

impl ImagePayload {
    /// Create a payload from raw binary data
    pub fn new(data: Vec<u8>, mime_type: Option<String>) -> Result<Self, PayloadError> {
        if data.is_empty() {
            return Err(PayloadError::Empty);
        }
        if data.len() < MIN_PAYLOAD_BYTES {
            return Err(PayloadError::TooSmall {
                len: data.len(),
                min: MIN_PAYLOAD_BYTES,
            });
        }

        Ok(Self {
            data,
            mime_type: mime_type.filter(|m| !m.trim().is_empty()),
        })
    }

    /// Create a payload from base64 text.
    ///
    /// Accepts a bare base64 string or a data URI
    /// (`data:image/png;base64,...`). The data URI header is stripped and
    /// its MIME type kept as the declared tag. ASCII whitespace inside the
    /// text is ignored.
    pub fn from_base64(text: &str) -> Result<Self, PayloadError> {
        let (mime_type, encoded) = split_data_uri(text.trim());

        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return Err(PayloadError::Empty);
        }

        let data = base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| PayloadError::InvalidBase64(e.to_string()))?;

        Self::new(data, mime_type)
    }

    /// Get the raw image bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw image bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the declared MIME type, if any
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and payload.
/// Text without the `data:` scheme is returned unchanged.
fn split_data_uri(text: &str) -> (Option<String>, &str) {
    let Some(rest) = text.strip_prefix(DATA_URI_SCHEME) else {
        return (None, text);
    };

    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header
                .split(';')
                .next()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            (mime, payload)
        }
        None => (None, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn rejects_short_payload() {
        let err = ImagePayload::new(vec![0u8; 99], None).unwrap_err();
        assert_eq!(err, PayloadError::TooSmall { len: 99, min: 100 });
    }

    #[test]
    fn accepts_minimum_payload() {
        let payload = ImagePayload::new(vec![0u8; 100], None).unwrap();
        assert_eq!(payload.size_bytes(), 100);
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(
            ImagePayload::new(Vec::new(), None).unwrap_err(),
            PayloadError::Empty
        );
    }

    #[test]
    fn blank_mime_type_is_dropped() {
        let payload = ImagePayload::new(sample_bytes(200), Some("  ".into())).unwrap();
        assert!(payload.mime_type().is_none());
    }

    #[test]
    fn data_uri_matches_bare_base64() {
        let bytes = sample_bytes(512);
        let bare = ImagePayload::from_base64(&encode(&bytes)).unwrap();
        let uri = ImagePayload::from_base64(&format!("data:image/png;base64,{}", encode(&bytes)))
            .unwrap();

        assert_eq!(bare.data(), uri.data());
        assert_eq!(uri.mime_type(), Some("image/png"));
        assert!(bare.mime_type().is_none());
    }

    #[test]
    fn base64_ignores_line_breaks() {
        let bytes = sample_bytes(300);
        let encoded = encode(&bytes);
        let (head, tail) = encoded.split_at(40);
        let wrapped = format!("{}\r\n{}\n", head, tail);

        let payload = ImagePayload::from_base64(&wrapped).unwrap();
        assert_eq!(payload.data(), bytes.as_slice());
    }

    #[test]
    fn short_base64_is_rejected_before_decode() {
        let err = ImagePayload::from_base64(&encode(&[1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::PayloadTooSmall);
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let err = ImagePayload::from_base64("not*valid*base64").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidBase64(_)));
    }

    #[test]
    fn data_uri_without_payload_is_empty() {
        assert_eq!(
            ImagePayload::from_base64("data:image/png;base64").unwrap_err(),
            PayloadError::Empty
        );
    }

    #[test]
    fn human_readable_size_kb() {
        let payload = ImagePayload::new(vec![0u8; 2048], None).unwrap();
        assert_eq!(payload.human_readable_size(), "2.0 KB");
    }
}
