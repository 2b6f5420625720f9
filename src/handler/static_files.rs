//! Static file serving module
//!
//! Serves the frontend from the asset root: `/` maps to the entry file and
//! every other path to the like-named file under the root.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::borrow::Cow;
use std::path::Path;
use tokio::fs;

use crate::config::AssetsConfig;
use crate::http::{self, mime};
use crate::logger;

/// Serve the asset for a request path, or 404
pub async fn serve_asset(
    request_path: &str,
    is_head: bool,
    assets: &AssetsConfig,
) -> Response<Full<Bytes>> {
    match load_asset(&assets.root, request_path, &assets.index_file).await {
        Some((content, content_type)) => {
            http::build_file_response(Bytes::from(content), content_type, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Map a request path onto the asset root
///
/// The path is percent-decoded first; `None` when it does not decode to UTF-8.
fn relative_asset_path<'a>(request_path: &'a str, index_file: &'a str) -> Option<Cow<'a, str>> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let relative = match decoded {
        Cow::Borrowed(path) => Cow::Borrowed(path.trim_start_matches('/')),
        Cow::Owned(path) => Cow::Owned(path.trim_start_matches('/').to_string()),
    };
    if relative.is_empty() {
        Some(Cow::Borrowed(index_file))
    } else {
        Some(relative)
    }
}

/// Load an asset, refusing anything that resolves outside the root
pub async fn load_asset(
    root: &str,
    request_path: &str,
    index_file: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let relative = relative_asset_path(request_path, index_file)?;
    let file_path = Path::new(root).join(&*relative);

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{root}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let metadata = fs::metadata(&file_canonical).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    Some((content, mime::for_path(&file_canonical)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    fn assets_in(dir: &Path) -> AssetsConfig {
        AssetsConfig {
            root: dir.to_str().unwrap().to_string(),
            index_file: "index.html".to_string(),
        }
    }

    #[test]
    fn test_relative_asset_path() {
        let relative = |path: &str| relative_asset_path(path, "index.html").unwrap().into_owned();
        assert_eq!(relative("/"), "index.html");
        assert_eq!(relative(""), "index.html");
        assert_eq!(relative("/css/app.css"), "css/app.css");
        assert_eq!(relative("/my%20file.css"), "my file.css");
        assert_eq!(relative("/%2Fetc/passwd"), "etc/passwd");
        assert!(relative_asset_path("/%ff.css", "index.html").is_none());
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>todo</h1>").unwrap();

        let (content, content_type) = load_asset(dir.path().to_str().unwrap(), "/", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"<h1>todo</h1>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("js/app.js"), "console.log(1)").unwrap();

        let response = serve_asset("/js/app.js", false, &assets_in(dir.path())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = serve_asset("/nope.css", false, &assets_in(dir.path())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("img")).unwrap();
        let response = serve_asset("/img", false, &assets_in(dir.path())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("static");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "key").unwrap();

        let loaded = load_asset(root.to_str().unwrap(), "/../secret.txt", "index.html").await;
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_encoded_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("my file.css"), "body {}").unwrap();

        let response = serve_asset("/my%20file.css", false, &assets_in(dir.path())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/css; charset=utf-8");
    }

    #[tokio::test]
    async fn test_encoded_traversal_blocked() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("static");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "key").unwrap();

        let root = root.to_str().unwrap();
        for path in ["/%2e%2e/secret.txt", "/%2E%2E%2Fsecret.txt", "/..%2fsecret.txt"] {
            assert!(load_asset(root, path, "index.html").await.is_none(), "{path}");
        }
    }

    #[tokio::test]
    async fn test_missing_root_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetsConfig {
            root: dir.path().join("absent").to_str().unwrap().to_string(),
            index_file: "index.html".to_string(),
        };
        let response = serve_asset("/", false, &assets).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
