use reqwest::Url;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use forkify::error::RemoteError;
use forkify::remote::{HttpRemote, RemoteSource};

mod test_helpers {
    use super::*;

    pub fn remote(timeout: Duration) -> HttpRemote {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpRemote::with_client(client, timeout)
    }

    /// Read one HTTP request (headers plus Content-Length body).
    pub async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve exactly one request with a fixed response; yields the raw request.
    pub async fn serve_once(status_line: &'static str, body: String) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request
        });
        let url = Url::parse(&format!("http://{addr}/api/v2/recipes")).unwrap();
        (url, handle)
    }

    /// Accept a connection and never answer.
    pub async fn serve_silence() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        Url::parse(&format!("http://{addr}/api/v2/recipes")).unwrap()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_fetch_json_success() {
    let (url, server) = serve_once("200 OK", json!({"status": "success", "data": {"recipes": []}}).to_string()).await;

    let value = remote(Duration::from_secs(5)).fetch_json(url).await.unwrap();
    assert_eq!(value["status"], "success");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v2/recipes"));
}

#[tokio::test]
async fn test_non_2xx_carries_message_and_status() {
    let (url, _server) = serve_once(
        "400 Bad Request",
        json!({"status": "fail", "message": "Invalid _id: abc"}).to_string(),
    )
    .await;

    let err = remote(Duration::from_secs(5)).fetch_json(url).await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::Status {
            message: "Invalid _id: abc".into(),
            status: 400
        }
    );
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Invalid _id: abc (400)");
}

#[tokio::test]
async fn test_non_2xx_without_json_body_uses_reason() {
    let (url, _server) = serve_once("503 Service Unavailable", "down".to_string()).await;

    let err = remote(Duration::from_secs(5)).fetch_json(url).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("Service Unavailable"));
}

#[tokio::test]
async fn test_invalid_json_on_success_is_decode_error() {
    let (url, _server) = serve_once("200 OK", "<html>oops</html>".to_string()).await;

    let err = remote(Duration::from_secs(5)).fetch_json(url).await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_send_json_posts_body() {
    let (url, server) = serve_once(
        "201 Created",
        json!({"status": "success", "data": {"recipe": {"id": "new"}}}).to_string(),
    )
    .await;

    let payload = json!({"title": "Soup", "servings": 2});
    let value = remote(Duration::from_secs(5))
        .send_json(url, payload)
        .await
        .unwrap();
    assert_eq!(value["data"]["recipe"]["id"], "new");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/v2/recipes"));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.contains(r#""title":"Soup""#));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let url = serve_silence().await;
    let timeout = Duration::from_millis(200);

    let remote = remote(timeout);
    assert_eq!(remote.timeout(), timeout);

    let started = Instant::now();
    let err = remote.fetch_json(url).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err, RemoteError::Timeout(timeout));
    assert!(err.to_string().starts_with("Request took too long!"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/")).unwrap();
    let err = remote(Duration::from_secs(5)).fetch_json(url).await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)));
}
