use super::*;

#[test]
fn connection_state_default_is_idle() {
    assert_eq!(ConnectionState::default(), ConnectionState::Idle);
}

#[test]
fn only_open_is_open() {
    assert!(ConnectionState::Open.is_open());
    assert!(!ConnectionState::Connecting.is_open());
    assert!(!ConnectionState::Closing.is_open());
    assert!(!ConnectionState::Closed(CloseKind::Clean).is_open());
}

#[test]
fn every_closed_kind_is_terminal() {
    for kind in [CloseKind::Clean, CloseKind::Unclean, CloseKind::Error] {
        assert!(ConnectionState::Closed(kind).is_terminal());
    }
    assert!(!ConnectionState::Closing.is_terminal());
    assert!(!ConnectionState::Idle.is_terminal());
}

#[test]
fn labels_distinguish_close_kinds() {
    assert_eq!(ConnectionState::Closed(CloseKind::Clean).to_string(), "closed");
    assert_eq!(ConnectionState::Closed(CloseKind::Unclean).to_string(), "lost");
    assert_eq!(ConnectionState::Closed(CloseKind::Error).to_string(), "failed");
}
