use super::*;

#[test]
fn http_page_uses_ws_scheme() {
    let endpoint = Endpoint::from_page("http://localhost:9000/", "localhost:9000");
    assert_eq!(endpoint.as_str(), "ws://localhost:9000/ws");
}

#[test]
fn https_page_uses_wss_scheme() {
    let endpoint = Endpoint::from_page("https://search.example.com/results?q=1", "search.example.com");
    assert_eq!(endpoint.as_str(), "wss://search.example.com/ws");
}

#[test]
fn explicit_url_is_kept_verbatim() {
    let endpoint = Endpoint::new("ws://127.0.0.1:9000/custom");
    assert_eq!(endpoint.to_string(), "ws://127.0.0.1:9000/custom");
}
