use frontdesk::config::Config;
use frontdesk::handler::handle_request;
use frontdesk::AppState;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header;
use hyper::{Method, Request, Response, StatusCode};
use std::sync::Arc;
use tempfile::TempDir;

const INDEX: &[u8] = b"<!DOCTYPE html>\n<h1>Front Desk</h1>\n";

/// Site root at `<tmp>/public` with a secret one level above it
fn site() -> (TempDir, Arc<AppState>) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("public");
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("index.html"), INDEX).unwrap();
    std::fs::write(root.join("script.js"), "console.log('hi');").unwrap();
    std::fs::write(root.join("assets/data.bin"), b"0123456789").unwrap();
    std::fs::write(dir.path().join("secret.txt"), "do not serve").unwrap();

    let mut config = Config::default();
    config.logging.access_log = false;
    config.static_files.root = root;
    (dir, Arc::new(AppState::new(config)))
}

async fn request(state: &Arc<AppState>, method: Method, uri: &str, headers: &[(header::HeaderName, &str)]) -> Response<Full<Bytes>> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(name, *value);
    }
    let req = builder.body(Full::new(Bytes::new())).unwrap();
    handle_request(req, Arc::clone(state), "127.0.0.1:40000".parse().unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn test_root_serves_index_unchanged() {
    let (_dir, state) = site();
    let response = request(&state, Method::GET, "/", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(body_bytes(response).await.as_ref(), INDEX);
}

#[tokio::test]
async fn test_named_file_and_content_type() {
    let (_dir, state) = site();
    let response = request(&state, Method::GET, "/script.js", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/javascript; charset=utf-8");
    assert_eq!(body_bytes(response).await, Bytes::from_static(b"console.log('hi');"));
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let (_dir, state) = site();
    let response = request(&state, Method::GET, "/nope.css", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_index_is_404() {
    let (dir, state) = site();
    std::fs::remove_file(dir.path().join("public/index.html")).unwrap();
    let response = request(&state, Method::GET, "/", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_paths_outside_root_never_leak() {
    let (_dir, state) = site();
    for uri in [
        "/../secret.txt",
        "/assets/../../secret.txt",
        "/%2e%2e/secret.txt",
        "/%2E%2E%2Fsecret.txt",
        "/..%5Csecret.txt",
    ] {
        let response = request(&state, Method::GET, uri, &[]).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body_bytes(response).await;
        assert!(!body.windows(12).any(|w| w == b"do not serve"), "{uri}");
    }
}

#[tokio::test]
async fn test_head_has_headers_but_no_body() {
    let (_dir, state) = site();
    let response = request(&state, Method::HEAD, "/", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], INDEX.len().to_string().as_str());
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_etag_revalidation() {
    let (_dir, state) = site();
    let first = request(&state, Method::GET, "/script.js", &[]).await;
    let etag = first.headers()[header::ETAG].to_str().unwrap().to_string();

    let second = request(&state, Method::GET, "/script.js", &[(header::IF_NONE_MATCH, etag.as_str())]).await;
    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert!(body_bytes(second).await.is_empty());

    let stale = request(&state, Method::GET, "/script.js", &[(header::IF_NONE_MATCH, "\"stale\"")]).await;
    assert_eq!(stale.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_last_modified_revalidation() {
    let (_dir, state) = site();
    let first = request(&state, Method::GET, "/script.js", &[]).await;
    let last_modified = first.headers()[header::LAST_MODIFIED].to_str().unwrap().to_string();

    let second = request(
        &state,
        Method::GET,
        "/script.js",
        &[(header::IF_MODIFIED_SINCE, last_modified.as_str())],
    )
    .await;
    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);

    let old = request(
        &state,
        Method::GET,
        "/script.js",
        &[(header::IF_MODIFIED_SINCE, "Sun, 06 Nov 1994 08:49:37 GMT")],
    )
    .await;
    assert_eq!(old.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_byte_ranges() {
    let (_dir, state) = site();
    let partial = request(&state, Method::GET, "/assets/data.bin", &[(header::RANGE, "bytes=2-4")]).await;
    assert_eq!(partial.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(partial.headers()[header::CONTENT_RANGE], "bytes 2-4/10");
    assert_eq!(body_bytes(partial).await, Bytes::from_static(b"234"));

    let tail = request(&state, Method::GET, "/assets/data.bin", &[(header::RANGE, "bytes=-3")]).await;
    assert_eq!(body_bytes(tail).await, Bytes::from_static(b"789"));

    let past_end = request(&state, Method::GET, "/assets/data.bin", &[(header::RANGE, "bytes=10-")]).await;
    assert_eq!(past_end.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(past_end.headers()[header::CONTENT_RANGE], "bytes */10");
}

#[tokio::test]
async fn test_directory_is_not_listed() {
    let (_dir, state) = site();
    let response = request(&state, Method::GET, "/assets/", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
