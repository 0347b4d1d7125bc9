//! Static file serving module
//!
//! Resolves request paths inside the static root and builds file responses
//! with cache validators and byte-range support.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::response::{build_file_response, build_partial_response, FileValidators};
use crate::http::{self, cache, mime, RangeOutcome};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// A file that passed resolution
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Canonical path, guaranteed to be under the canonical root
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

/// Serve a GET/HEAD request from the static root
pub async fn serve(ctx: &RequestContext<'_>, config: &StaticFilesConfig) -> Response<Full<Bytes>> {
    let Some(file) = resolve(&config.root, ctx.path, &config.index_file).await else {
        return http::build_404_response();
    };

    let data = match fs::read(&file.path).await {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            tracing::error!("Failed to read file '{}': {e}", file.path.display());
            return http::build_404_response();
        }
    };

    build_static_file_response(ctx, &data, &file)
}

/// Map a URL path onto a regular file inside `root`
///
/// `/` (and an empty path) resolves to `index_file`. The path is
/// percent-decoded first; anything that is not a plain relative path, or
/// that canonicalizes outside the root (e.g. through a symlink), is refused.
pub async fn resolve(root: &Path, request_path: &str, index_file: &str) -> Option<ResolvedFile> {
    let Ok(decoded) = percent_decode_str(request_path).decode_utf8() else {
        tracing::debug!("Rejected non UTF-8 path: {request_path}");
        return None;
    };
    if decoded.contains(|c| c == '\0' || c == '\\') {
        tracing::warn!("Rejected path with forbidden characters: {request_path}");
        return None;
    }

    let relative = match decoded.trim_start_matches('/') {
        "" => index_file,
        rest => rest,
    };
    let relative = Path::new(relative);

    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        tracing::warn!("Path traversal attempt blocked: {request_path}");
        return None;
    }

    let root = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            );
            return None;
        }
    };

    // Missing files are the common 404, not worth a warning
    let candidate = fs::canonicalize(root.join(relative)).await.ok()?;
    if !candidate.starts_with(&root) {
        tracing::warn!(
            "Path traversal attempt blocked: {request_path} -> {}",
            candidate.display()
        );
        return None;
    }

    let metadata = fs::metadata(&candidate).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(ResolvedFile {
        path: candidate,
        modified: metadata.modified().ok(),
    })
}

/// Build the file response: 304, 206, 416 or 200
fn build_static_file_response(
    ctx: &RequestContext<'_>,
    data: &Bytes,
    file: &ResolvedFile,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let last_modified = file.modified.map(cache::http_date);
    let content_type = mime::content_type_for(&file.path);

    if cache::is_not_modified(
        ctx.if_none_match,
        ctx.if_modified_since,
        &etag,
        file.modified,
    ) {
        return http::build_304_response(&etag, last_modified.as_deref());
    }

    let validators = FileValidators {
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    match http::parse_range(ctx.range, data.len()) {
        RangeOutcome::Partial(range) => {
            build_partial_response(data, range, content_type, &validators, ctx.is_head)
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(data.len()),
        RangeOutcome::Full => {
            build_file_response(data.clone(), content_type, &validators, ctx.is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("public");
        std::fs::create_dir_all(root.join("css")).unwrap();
        std::fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::write(root.join("css/site.css"), "body{}").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn test_root_resolves_to_index() {
        let (_dir, root) = site();
        let file = resolve(&root, "/", "index.html").await.unwrap();
        assert!(file.path.ends_with("index.html"));
        assert!(file.modified.is_some());
    }

    #[tokio::test]
    async fn test_nested_and_encoded_paths() {
        let (_dir, root) = site();
        assert!(resolve(&root, "/css/site.css", "index.html").await.is_some());
        assert!(resolve(&root, "/css%2Fsite.css", "index.html").await.is_some());
        assert!(resolve(&root, "/./css/site.css", "index.html").await.is_some());
    }

    #[tokio::test]
    async fn test_escapes_are_refused() {
        let (_dir, root) = site();
        for path in [
            "/../secret.txt",
            "/css/../../secret.txt",
            "/%2e%2e/secret.txt",
            "/..%2fsecret.txt",
            "/..%5csecret.txt",
            "/index.html%00.css",
        ] {
            assert!(resolve(&root, path, "index.html").await.is_none(), "{path}");
        }
    }

    #[tokio::test]
    async fn test_directories_and_missing_files() {
        let (_dir, root) = site();
        assert!(resolve(&root, "/css", "index.html").await.is_none());
        assert!(resolve(&root, "/css/", "index.html").await.is_none());
        assert!(resolve(&root, "/missing.js", "index.html").await.is_none());
        assert!(resolve(&root.join("nope"), "/", "index.html").await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_refused() {
        let (dir, root) = site();
        std::os::unix::fs::symlink(dir.path().join("secret.txt"), root.join("leak.txt")).unwrap();
        assert!(resolve(&root, "/leak.txt", "index.html").await.is_none());
    }
}
