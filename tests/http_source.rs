use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tweetfeed::config::PageParam;
use tweetfeed::feeds::tweets::HttpTweetSource;
use tweetfeed::feeds::{FetchError, TweetSource};

/// Serves one canned HTTP response and reports the request line it saw.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (format!("http://{}/api", addr), rx)
}

#[tokio::test]
async fn test_loads_page_from_server() {
    let body = r#"{"tweets": [
        {"user_name": "Robin Hanson", "datetime": "1h ago", "text": "first"},
        {"user_name": "Morning Brew", "datetime": "19h ago", "text": "second"}
    ]}"#;
    let (base, seen) = serve_once("200 OK", body).await;
    let source = HttpTweetSource::new(base, PageParam::Ignore, Duration::from_secs(5));

    let tweets = source.load_page("random", 3).await.unwrap();

    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0].author, "Robin Hanson");
    assert_eq!(tweets[1].timestamp, "19h ago");
    assert_eq!(seen.await.unwrap(), "GET /api/tweets/random HTTP/1.1");
}

#[tokio::test]
async fn test_forwards_page_when_configured() {
    let (base, seen) = serve_once("200 OK", r#"{"tweets": []}"#).await;
    let source = HttpTweetSource::new(base, PageParam::Query, Duration::from_secs(5));

    let tweets = source.load_page("space cats", 2).await.unwrap();

    assert!(tweets.is_empty());
    assert_eq!(
        seen.await.unwrap(),
        "GET /api/tweets/space%20cats?page=2 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_non_success_status() {
    let (base, _seen) = serve_once("500 Internal Server Error", "boom").await;
    let source = HttpTweetSource::new(base, PageParam::Ignore, Duration::from_secs(5));

    let err = source.load_page("random", 1).await.unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus(500)));
}

#[tokio::test]
async fn test_malformed_body() {
    let (base, _seen) = serve_once("200 OK", r#"{"posts": "nope"}"#).await;
    let source = HttpTweetSource::new(base, PageParam::Ignore, Duration::from_secs(5));

    let err = source.load_page("random", 1).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpTweetSource::new(
        format!("http://{}/api", addr),
        PageParam::Ignore,
        Duration::from_secs(5),
    );
    let err = source.load_page("random", 1).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    // The transport error stays reachable through the error chain.
    let cause = std::error::Error::source(&err).expect("network error keeps its cause");
    assert!(cause.downcast_ref::<reqwest::Error>().is_some());
}

#[tokio::test]
async fn test_hung_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        // Hold the connection open without answering.
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });

    let source = HttpTweetSource::new(
        format!("http://{}/api", addr),
        PageParam::Ignore,
        Duration::from_millis(200),
    );
    let err = source.load_page("random", 1).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));
}
