use std::path::Path;

/// Content types the upload surface offers in its picker.
pub const ACCEPTED_TYPES: &str = "image/jpeg,image/png,image/jpg";

/// Declared type for files whose extension says nothing useful.
pub const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Type assumed when no signature matches.
const FALLBACK_MIME: &str = "image/png";

/// One recognised image format: where its magic bytes sit and which file
/// extensions a picker maps to it.
struct ImageFormat {
    mime: &'static str,
    signature: &'static [(usize, &'static [u8])],
    extensions: &'static [&'static str],
}

impl ImageFormat {
    fn matches(&self, bytes: &[u8]) -> bool {
        self.signature.iter().all(|(offset, magic)| {
            bytes
                .get(*offset..offset + magic.len())
                .is_some_and(|window| window == *magic)
        })
    }
}

const FORMATS: &[ImageFormat] = &[
    ImageFormat {
        mime: "image/jpeg",
        signature: &[(0, &[0xFF, 0xD8, 0xFF])],
        extensions: &["jpg", "jpeg"],
    },
    ImageFormat {
        mime: "image/png",
        signature: &[(0, b"\x89PNG")],
        extensions: &["png"],
    },
    // RIFF container with a WEBP form type.
    ImageFormat {
        mime: "image/webp",
        signature: &[(0, b"RIFF"), (8, b"WEBP")],
        extensions: &["webp"],
    },
    ImageFormat {
        mime: "image/gif",
        signature: &[(0, b"GIF8")],
        extensions: &["gif"],
    },
];

/// Sniff an image MIME type from magic bytes, falling back to PNG.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    if let Some(format) = FORMATS.iter().find(|f| f.matches(bytes)) {
        return format.mime;
    }
    tracing::warn!(
        head = ?&bytes[..bytes.len().min(4)],
        "No image signature matched, assuming {}",
        FALLBACK_MIME
    );
    FALLBACK_MIME
}

/// Content type a file picker would declare for `path`, judged by extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return UNKNOWN_CONTENT_TYPE;
    };
    FORMATS
        .iter()
        .find(|f| f.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .map_or(UNKNOWN_CONTENT_TYPE, |f| f.mime)
}
