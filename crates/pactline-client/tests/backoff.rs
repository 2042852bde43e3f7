#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use pactline_client::realtime::{Backoff, ReconnectPolicy};

#[test]
fn five_attempts_double_from_one_second() {
    let mut backoff = Backoff::new(ReconnectPolicy::default());
    let delays: Vec<u128> = std::iter::from_fn(|| backoff.next_delay())
        .map(|d| d.as_millis())
        .collect();
    assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000]);
    assert_eq!(backoff.attempts(), 5);
    assert!(backoff.next_delay().is_none(), "exhausted policy must stay exhausted");
}

#[test]
fn reset_starts_over_at_base_delay() {
    let mut backoff = Backoff::new(ReconnectPolicy::new(Duration::from_millis(250), 3));
    assert_eq!(backoff.next_delay(), Some(Duration::from_millis(250)));
    assert_eq!(backoff.next_delay(), Some(Duration::from_millis(500)));
    backoff.reset();
    assert_eq!(backoff.attempts(), 0);
    assert_eq!(backoff.next_delay(), Some(Duration::from_millis(250)));
}

#[test]
fn zero_attempts_never_retries() {
    let mut backoff = Backoff::new(ReconnectPolicy::new(Duration::from_millis(1000), 0));
    assert!(backoff.next_delay().is_none());
}

#[test]
fn large_attempt_numbers_saturate() {
    let policy = ReconnectPolicy::new(Duration::from_secs(60), 16);
    assert!(policy.delay_for(64) >= policy.delay_for(16));
}
