//! MIME type resolution for uploaded photos.

const FALLBACK_MIME: &str = "application/octet-stream";

pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [_, _, _, _, 0x66, 0x74, 0x79, 0x70, 0x68, 0x65, 0x69, 0x63, ..] => Some("image/heic"),
        _ => None,
    }
}

pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Resolve the encoding of an uploaded file: extension first, then magic
/// bytes, then the part's declared `image/*` type.
pub fn resolve_upload_mime(filename: Option<&str>, declared: Option<&str>, bytes: &[u8]) -> String {
    if let Some(mime) = filename.and_then(mime_from_filename) {
        return mime.to_string();
    }
    if let Some(mime) = detect_image_mime(bytes) {
        return mime.to_string();
    }
    match declared {
        Some(declared) if declared.starts_with("image/") => declared.to_string(),
        _ => {
            tracing::warn!(
                "Unrecognized upload format (first 4 bytes: {:02X?}), falling back to {}",
                &bytes[..bytes.len().min(4)],
                FALLBACK_MIME
            );
            FALLBACK_MIME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some("image/png")
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(
            detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            Some("image/webp")
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_image_mime(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(detect_image_mime(&[]), None);
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(mime_from_filename("Holiday.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_filename("me.webp"), Some("image/webp"));
        assert_eq!(mime_from_filename("notes.txt"), None);
        assert_eq!(mime_from_filename("no_extension"), None);
    }

    #[test]
    fn test_resolve_prefers_extension() {
        // PNG magic bytes under a .jpg name still resolve by extension.
        let mime = resolve_upload_mime(Some("photo.jpg"), None, &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn test_resolve_falls_back_to_sniffing_then_declared() {
        let sniffed = resolve_upload_mime(Some("blob"), None, &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(sniffed, "image/png");

        let declared = resolve_upload_mime(None, Some("image/avif"), &[0x00]);
        assert_eq!(declared, "image/avif");

        let fallback = resolve_upload_mime(None, Some("text/plain"), &[0x00]);
        assert_eq!(fallback, "application/octet-stream");
    }
}
