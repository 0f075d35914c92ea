use std::future::Future;
use std::time::Duration;

use channel::{ClientMessage, CloseKind, Endpoint, ResultBatch, SearchResponse};
use frames::{Sentiment, Snippet, Thumbnails, VideoId, VideoItem};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::Utf8Bytes;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

use super::*;

type ServerSocket = WebSocketStream<TcpStream>;

fn cats_batch() -> String {
    let item = VideoItem {
        id: VideoId { video_id: "abc".to_owned() },
        snippet: Snippet {
            title: "Cat compilation".to_owned(),
            channel_id: "c1".to_owned(),
            channel_title: "Cats TV".to_owned(),
            description: String::new(),
            thumbnails: Thumbnails::default(),
        },
        flesch_kincaid_grade_level: None,
        flesch_reading_score: None,
    };
    let response = SearchResponse {
        query: "cats".to_owned(),
        sentiment: Some(Sentiment::Happy),
        flesch_kincaid_grade_level_avg: Some(7.25),
        flesch_reading_score_avg: Some(80.1),
        items: vec![item],
    };
    frames::encode_batch(&ResultBatch { responses: vec![response] })
}

async fn serve_once<F, Fut>(handler: F) -> String
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let socket = tokio_tungstenite::accept_async(tcp).await.expect("handshake");
        handler(socket).await;
    });
    format!("ws://{addr}/ws")
}

/// Next client message other than keepalive pings.
async fn next_request(socket: &mut ServerSocket) -> ClientMessage {
    loop {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => match frames::decode_message(text.as_str()).expect("client message") {
                ClientMessage::Ping => {}
                request => return request,
            },
            Some(Ok(_)) => {}
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

fn search_for(query: &str) -> ClientMessage {
    ClientMessage::Search { query: SearchQuery::new(query).expect("query") }
}

/// Keep reading so the server answers the client's close.
async fn drain(mut socket: ServerSocket) {
    while let Some(Ok(_)) = socket.next().await {}
}

fn config(url: String, queries: &[&str], once: bool) -> SessionConfig {
    SessionConfig {
        endpoint: Endpoint::new(url),
        keepalive: Duration::from_secs(60),
        queries: queries.iter().map(|q| SearchQuery::new(q).expect("query")).collect(),
        once,
    }
}

async fn run_session<I>(config: SessionConfig, input: I) -> SessionOutcome<Vec<u8>>
where
    I: AsyncBufRead + Unpin,
{
    tokio::time::timeout(Duration::from_secs(10), run(config, TerminalRenderer::new(Vec::new()), input))
        .await
        .expect("session finished in time")
        .expect("session ran")
}

#[tokio::test]
async fn once_mode_closes_cleanly_after_answer() {
    let url = serve_once(|mut socket| async move {
        assert_eq!(next_request(&mut socket).await, search_for("cats"));
        socket.send(Message::text(cats_batch())).await.expect("send batch");
        drain(socket).await;
    })
    .await;

    let outcome = run_session(config(url, &["cats"], true), &b""[..]).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Clean));
    assert!(outcome.renderer.has_answered("cats"));
    let text = String::from_utf8(outcome.renderer.into_inner()).expect("utf8");
    assert!(text.contains("[cats] :-) positive  grade 7.25  ease 80.10"));
    assert!(text.contains("https://www.youtube.com/watch?v=abc"));
}

#[tokio::test]
async fn malformed_frame_does_not_end_session() {
    let url = serve_once(|mut socket| async move {
        next_request(&mut socket).await;
        socket.send(Message::text("not json".to_owned())).await.expect("send garbage");
        socket.send(Message::text(cats_batch())).await.expect("send batch");
        drain(socket).await;
    })
    .await;

    let outcome = run_session(config(url, &["cats"], true), &b""[..]).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Clean));
    assert_eq!(outcome.renderer.batches(), 1);
    assert_eq!(outcome.renderer.last_error(), None);
}

#[tokio::test]
async fn input_lines_are_searched_until_quit() {
    let url = serve_once(|mut socket| async move {
        assert_eq!(next_request(&mut socket).await, search_for("cats"));
        socket.send(Message::text(cats_batch())).await.expect("send batch");
        drain(socket).await;
    })
    .await;

    let outcome = run_session(config(url, &[], false), &b"  \ncats\n:quit\n"[..]).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Clean));
    assert!(outcome.renderer.has_answered("cats"));
}

#[tokio::test]
async fn peer_dropping_the_socket_is_unclean() {
    let url = serve_once(|mut socket| async move {
        next_request(&mut socket).await;
        drop(socket);
    })
    .await;

    let outcome = run_session(config(url, &["cats"], true), &b""[..]).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Unclean));
    assert_eq!(outcome.renderer.last_error(), Some("connection lost (code 1006)"));
}

#[tokio::test]
async fn peer_close_with_pending_keepalive_stays_clean() {
    let url = serve_once(|mut socket| async move {
        next_request(&mut socket).await;
        let frame = CloseFrame { code: CloseCode::Normal, reason: Utf8Bytes::from_static("bye") };
        socket.send(Message::Close(Some(frame))).await.expect("send close");
        // Hold the TCP connection open across several keepalive periods.
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(socket);
    })
    .await;

    let mut config = config(url, &["cats"], false);
    config.keepalive = Duration::from_millis(200);
    let (_stdin, input) = tokio::io::duplex(64);
    let outcome = run_session(config, tokio::io::BufReader::new(input)).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Clean));
    assert_eq!(outcome.renderer.last_error(), None);
}

#[tokio::test]
async fn refused_connection_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let outcome = run_session(config(format!("ws://{addr}/ws"), &["cats"], true), &b""[..]).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Error));
    let error = outcome.renderer.last_error().expect("error reported");
    assert!(error.starts_with("could not connect"), "{error}");
}

#[tokio::test]
async fn invalid_url_fails_without_a_socket() {
    let outcome = run_session(config("not a url".to_owned(), &["cats"], true), &b""[..]).await;

    assert_eq!(outcome.state, ConnectionState::Closed(CloseKind::Error));
    assert!(outcome.renderer.last_error().is_some_and(|e| e.starts_with("could not connect")));
}
