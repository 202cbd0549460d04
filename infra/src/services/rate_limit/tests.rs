use std::time::Duration;

use super::window_store::{member_salt, window_millis, SLIDING_WINDOW_SCRIPT};

#[test]
fn test_window_millis() {
    assert_eq!(window_millis(Duration::from_secs(60)), 60_000);
    assert_eq!(window_millis(Duration::from_millis(1500)), 1500);
    assert_eq!(window_millis(Duration::from_micros(10)), 1);
}

#[test]
fn test_member_salt_is_unique_hex() {
    let a = member_salt();
    let b = member_salt();

    assert_eq!(a.len(), 16);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[test]
fn test_script_reads_server_clock() {
    assert!(SLIDING_WINDOW_SCRIPT.contains("redis.call('TIME')"));
    assert!(SLIDING_WINDOW_SCRIPT.contains("ZREMRANGEBYSCORE"));
    assert!(SLIDING_WINDOW_SCRIPT.contains("PEXPIRE"));
}
