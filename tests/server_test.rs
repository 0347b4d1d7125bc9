use frontdesk::config::Config;
use frontdesk::{server, AppState};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::{header, Request, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

struct RunningServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    handle: JoinHandle<Result<(), frontdesk::ServerError>>,
    _root: TempDir,
}

fn start(configure: impl FnOnce(&mut Config)) -> RunningServer {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>hello</h1>").unwrap();

    let mut config = Config::default();
    config.logging.access_log = false;
    config.performance.request_timeout = 5;
    config.static_files.root = root.path().to_path_buf();
    configure(&mut config);

    let listener = server::create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Notify::new());
    let handle = tokio::spawn(server::run(
        listener,
        Arc::new(AppState::new(config)),
        Arc::clone(&shutdown),
    ));

    RunningServer {
        addr,
        shutdown,
        handle,
        _root: root,
    }
}

async fn connect(addr: SocketAddr) -> http1::SendRequest<Full<Bytes>> {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(async move {
        let _ = conn.await;
    });
    sender
}

#[tokio::test]
async fn test_end_to_end_over_tcp() {
    let server = start(|_| {});
    let mut sender = connect(server.addr).await;

    let req = Request::post("/signin")
        .header(header::HOST, server.addr.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"username":"alice","password":"x"}"#)))
        .unwrap();
    let response = sender.send_request(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        body,
        Bytes::from_static(br#"{"message":"Sign-in successful!","status":"success"}"#)
    );

    // Same keep-alive connection
    let req = Request::get("/")
        .header(header::HOST, server.addr.to_string())
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = sender.send_request(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, Bytes::from_static(b"<h1>hello</h1>"));

    drop(sender);
    server.shutdown.notify_one();
    let result = tokio::time::timeout(Duration::from_secs(10), server.handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_connection_cap_drops_excess_connections() {
    let server = start(|config| config.performance.max_connections = Some(0));
    let mut sender = connect(server.addr).await;

    let req = Request::get("/")
        .header(header::HOST, server.addr.to_string())
        .body(Full::new(Bytes::new()))
        .unwrap();
    assert!(sender.send_request(req).await.is_err());

    server.shutdown.notify_one();
    tokio::time::timeout(Duration::from_secs(10), server.handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
