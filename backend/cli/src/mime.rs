//! Image media type detection for local files.

use std::path::Path;

/// Detect an image MIME type by file extension.
pub fn detect_image_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png"          => Some("image/png"),
        "gif"          => Some("image/gif"),
        "webp"         => Some("image/webp"),
        "heic"         => Some("image/heic"),
        "heif"         => Some("image/heif"),
        "avif"         => Some("image/avif"),
        "bmp"          => Some("image/bmp"),
        "tiff" | "tif" => Some("image/tiff"),
        _              => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg_case_insensitive() {
        assert_eq!(detect_image_mime(&PathBuf::from("IMG_0042.JPG")), Some("image/jpeg"));
    }

    #[test]
    fn detects_heic() {
        assert_eq!(detect_image_mime(&PathBuf::from("leaf.heic")), Some("image/heic"));
    }

    #[test]
    fn unknown_extension() {
        assert_eq!(detect_image_mime(&PathBuf::from("notes.txt")), None);
        assert_eq!(detect_image_mime(&PathBuf::from("no_extension")), None);
    }
}
