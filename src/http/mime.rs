//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

/// Content type for Android application packages
pub const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";

/// Get MIME Content-Type based on file extension
///
/// Extensions are matched case-insensitively.
///
/// # Examples
/// ```
/// use apk_depot::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(get_content_type(Some("APK")), "application/vnd.android.package-archive");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let lower = extension.map(str::to_ascii_lowercase);
    match lower.as_deref() {
        // Android
        Some("apk") => APK_CONTENT_TYPE,
        Some("aab") => "application/octet-stream",

        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",
        Some("kt" | "kts" | "java" | "gradle" | "properties" | "pro") => {
            "text/plain; charset=utf-8"
        }
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",

        // JavaScript/JSON
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Archives and documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("jar") => "application/java-archive",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        // Default
        _ => "application/octet-stream",
    }
}

/// Whether the extension marks an Android package served as an attachment
pub fn is_apk(extension: Option<&str>) -> bool {
    extension.is_some_and(|e| e.eq_ignore_ascii_case("apk"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css");
        assert_eq!(get_content_type(Some("json")), "application/json");
        assert_eq!(get_content_type(Some("png")), "image/png");
        assert_eq!(get_content_type(Some("zip")), "application/zip");
        assert_eq!(get_content_type(Some("md")), "text/markdown; charset=utf-8");
    }

    #[test]
    fn test_apk_type() {
        assert_eq!(get_content_type(Some("apk")), APK_CONTENT_TYPE);
        assert_eq!(get_content_type(Some("Apk")), APK_CONTENT_TYPE);
        assert!(is_apk(Some("APK")));
        assert!(!is_apk(Some("zip")));
        assert!(!is_apk(None));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }
}
