#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use pactline_client::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
endpoint: "ws://127.0.0.1:8080/realtime"
reconnect:
  base_delay_ms: 1000
  max_atempts: 5 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
endpoint: "wss://collab.example.com/realtime"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.reconnect.base_delay_ms, 1000);
    assert_eq!(cfg.reconnect.max_attempts, 5);
    assert!(cfg.client.user_agent.starts_with("pactline/"));

    let policy = cfg.reconnect_policy();
    assert_eq!(policy.max_attempts(), 5);
    assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
    assert_eq!(cfg.connect_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.write_timeout(), Duration::from_secs(5));
}

#[test]
fn endpoint_must_be_websocket() {
    let bad = r#"
version: 1
endpoint: "https://collab.example.com/realtime"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn version_two_is_unsupported() {
    let bad = r#"
version: 2
endpoint: "ws://127.0.0.1:8080/realtime"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn reconnect_bounds_are_checked() {
    let bad = r#"
version: 1
endpoint: "ws://127.0.0.1:8080/realtime"
reconnect:
  max_attempts: 40
"#;
    assert!(config::load_from_str(bad).is_err());

    let bad = r#"
version: 1
endpoint: "ws://127.0.0.1:8080/realtime"
client:
  event_buffer: 0
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn write_timeout_bounds_are_checked() {
    let ok = r#"
version: 1
endpoint: "ws://127.0.0.1:8080/realtime"
client:
  write_timeout_ms: 250
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.write_timeout(), Duration::from_millis(250));

    let bad = r#"
version: 1
endpoint: "ws://127.0.0.1:8080/realtime"
client:
  write_timeout_ms: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}
