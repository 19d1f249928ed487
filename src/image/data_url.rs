use base64::Engine as _;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// An image held in memory as `data:<mime>;base64,<payload>`.
///
/// The same string is used for preview and as the inline payload sent to the
/// inference service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    raw: String,
    // Byte offset where the payload starts.
    payload_at: usize,
}

impl DataUrl {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let prefix = format!("{}{}{}", SCHEME, mime_type, BASE64_MARKER);
        let payload_at = prefix.len();
        Self {
            raw: prefix + &encoded,
            payload_at,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.raw[SCHEME.len()..self.payload_at - BASE64_MARKER.len()]
    }

    /// Base64 payload without the `data:` header.
    pub fn payload(&self) -> &str {
        &self.raw[self.payload_at..]
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// Size of the decoded image in bytes, computed from the payload length.
    pub fn decoded_len(&self) -> usize {
        let payload = self.payload();
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        ((payload.len() / 4) * 3).saturating_sub(padding.min(2))
    }
}
