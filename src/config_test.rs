use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("livesearch").chain(args.iter().copied())).expect("valid args")
}

#[test]
fn explicit_flags_override_defaults() {
    let cli = parse(&["--url", "ws://search.local/ws", "--keepalive-secs", "5", "--query", "cats"]);
    let config = SessionConfig::try_from(cli).expect("config");
    assert_eq!(config.endpoint.as_str(), "ws://search.local/ws");
    assert_eq!(config.keepalive, Duration::from_secs(5));
    assert_eq!(config.queries, vec![SearchQuery::new("cats").expect("query")]);
    assert!(!config.once);
}

#[test]
fn queries_keep_command_line_order() {
    let cli = parse(&["--query", "cats", "--query", " dogs ", "--once"]);
    let config = SessionConfig::try_from(cli).expect("config");
    let queries: Vec<&str> = config.queries.iter().map(SearchQuery::as_str).collect();
    assert_eq!(queries, vec!["cats", "dogs"]);
    assert!(config.once);
}

#[test]
fn blank_query_is_rejected_before_connecting() {
    let cli = parse(&["--query", "   "]);
    assert_eq!(SessionConfig::try_from(cli).err(), Some(QueryError::Empty));
}

#[test]
fn once_requires_a_query() {
    assert!(Cli::try_parse_from(["livesearch", "--once"]).is_err());
}

#[test]
fn zero_keepalive_is_rejected() {
    assert!(Cli::try_parse_from(["livesearch", "--keepalive-secs", "0"]).is_err());
}
