//! MIME type detection module
//!
//! Returns the Content-Type for a frontend asset based on its file extension.

use std::path::Path;

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return "application/octet-stream";
    };

    match ext.to_ascii_lowercase().as_str() {
        // Documents and code
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        _ => "application/octet-stream",
    }
}

/// Content-Type for a file path
pub fn for_path(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(get_content_type(Some("css")), "text/css; charset=utf-8");
        assert_eq!(get_content_type(Some("js")), "text/javascript; charset=utf-8");
        assert_eq!(get_content_type(Some("json")), "application/json");
        assert_eq!(get_content_type(Some("svg")), "image/svg+xml");
    }

    #[test]
    fn test_extension_case_ignored() {
        assert_eq!(get_content_type(Some("PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }

    #[test]
    fn test_for_path() {
        assert_eq!(for_path(Path::new("static/app.js")), "text/javascript; charset=utf-8");
        assert_eq!(for_path(Path::new("static/LICENSE")), "application/octet-stream");
    }
}
