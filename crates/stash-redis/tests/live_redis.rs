//! Integration tests that exercise a live Redis server.
//!
//! These tests are ignored by default so the suite runs without external
//! services. Run them against a local server (the target is taken from
//! `REDIS_URL` when set) with:
//!
//! ```sh
//! cargo test -p stash-redis -- --ignored
//! ```

use std::time::Duration;

use stash_redis::{RedisClient, RedisConfig};

fn live_client() -> RedisClient {
    RedisClient::new(RedisConfig::from_env()).expect("valid configuration")
}

#[tokio::test]
#[ignore]
async fn set_then_get_round_trips() {
    let client = live_client();
    let key = "stash:test:round_trip";

    client.set(key, "userA", Duration::from_secs(60)).await.unwrap();
    assert_eq!(client.get(key).await.unwrap().as_deref(), Some("userA"));

    client.del(key).await.unwrap();
    assert_eq!(client.get(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn set_twice_last_write_wins() {
    let client = live_client();
    let key = "stash:test:last_write_wins";

    client.set(key, "first", Duration::from_secs(60)).await.unwrap();
    client.set(key, "second", Duration::from_secs(60)).await.unwrap();
    assert_eq!(client.get(key).await.unwrap().as_deref(), Some("second"));

    client.del(key).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn del_missing_key_is_noop() {
    let client = live_client();

    client.del("stash:test:never_stored").await.unwrap();
}

#[tokio::test]
#[ignore]
async fn expired_key_reads_as_absent() {
    let client = live_client();
    let key = "stash:test:expiry";

    client.set(key, "ephemeral", Duration::from_secs(1)).await.unwrap();
    assert!(client.exists(key).await.unwrap());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(client.get(key).await.unwrap(), None);
    assert!(!client.exists(key).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn successful_round_trip_marks_client_alive() {
    let client = live_client();

    client.ping().await.unwrap();
    assert!(client.is_alive());
}

#[tokio::test]
#[ignore]
async fn scalar_values_are_stringified() {
    let client = live_client();
    let key = "stash:test:scalar";

    client.set(key, 1234u64, Duration::from_secs(60)).await.unwrap();
    assert_eq!(client.get(key).await.unwrap().as_deref(), Some("1234"));

    client.del(key).await.unwrap();
}
