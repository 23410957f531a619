mod test_utils;

use serde_json::json;
use statline_client::{FetchConfig, FetchConfigBuilder, Fetcher, param};
use statline_error::ApiErrorKind;
use std::sync::Arc;
use test_utils::{MockTransport, page};

const BASE: &str = "https://api.example.com/v1";

fn fetcher(transport: &MockTransport) -> Fetcher {
    Fetcher::new(Arc::new(transport.clone()), FetchConfig::default())
}

#[tokio::test(start_paused = true)]
async fn success_returns_document() -> anyhow::Result<()> {
    let transport = MockTransport::new().json("/players", 200, json!({"data": [{"id": 1}]}));

    let document = fetcher(&transport)
        .fetch(BASE, "/players", &[param("search", "curry")])
        .await?;

    assert_eq!(document, Some(json!({"data": [{"id": 1}]})));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.calls()[0].0, "https://api.example.com/v1/players");
    assert_eq!(transport.param(0, "search").as_deref(), Some("curry"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn not_found_is_absent_not_error() -> anyhow::Result<()> {
    let transport = MockTransport::new().text("/players/999", 404, "missing");

    let document = fetcher(&transport).fetch(BASE, "players/999", &[]).await?;

    assert_eq!(document, None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rate_limit_waits_and_retries() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .text("/stats", 429, "slow down")
        .json("/stats", 200, json!({"data": []}));

    let started = tokio::time::Instant::now();
    let document = fetcher(&transport).fetch(BASE, "/stats", &[]).await?;

    assert_eq!(document, Some(json!({"data": []})));
    assert_eq!(transport.call_count(), 2);
    assert!(started.elapsed() >= std::time::Duration::from_secs(60));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rate_limit_retries_are_bounded() {
    let transport = MockTransport::new().text("/stats", 429, "slow down");
    let config = FetchConfigBuilder::default()
        .max_rate_limit_retries(2u32)
        .cooldown_secs(5u64)
        .build()
        .unwrap();

    let err = Fetcher::new(Arc::new(transport.clone()), config)
        .fetch(BASE, "/stats", &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::RateLimitExhausted { attempts: 3 });
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn request_timeout_bounds_the_whole_call() {
    let transport = MockTransport::new().text("/stats", 429, "slow down");
    let config = FetchConfigBuilder::default()
        .max_rate_limit_retries(10u32)
        .cooldown_secs(60u64)
        .request_timeout_secs(90u64)
        .build()
        .unwrap();

    let err = Fetcher::new(Arc::new(transport.clone()), config)
        .fetch(BASE, "/stats", &[])
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Timeout { seconds: 90 });
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn error_status_carries_url_and_body() {
    let transport = MockTransport::new().text("/leaders", 500, "upstream down");

    let err = fetcher(&transport)
        .fetch(BASE, "/leaders", &[])
        .await
        .unwrap_err();

    assert_eq!(err.url, "https://api.example.com/v1/leaders");
    assert_eq!(
        err.kind,
        ApiErrorKind::Status {
            status: 500,
            body: "upstream down".to_string()
        }
    );
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_and_bad_json_are_errors() {
    let transport = MockTransport::new()
        .fail("/down", "connection refused")
        .text("/garbled", 200, "<html>");

    let down = fetcher(&transport).fetch(BASE, "/down", &[]).await.unwrap_err();
    assert!(matches!(down.kind, ApiErrorKind::Transport(_)));

    let garbled = fetcher(&transport)
        .fetch(BASE, "/garbled", &[])
        .await
        .unwrap_err();
    assert!(matches!(garbled.kind, ApiErrorKind::Decode(_)));
}

#[tokio::test(start_paused = true)]
async fn pages_are_concatenated_in_cursor_order() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json("/stats", 200, page(vec![json!({"n": 1}), json!({"n": 2})], Some(17)))
        .json("/stats", 200, page(vec![json!({"n": 3})], Some(42)))
        .json("/stats", 200, page(vec![json!({"n": 4})], None));

    let rows = fetcher(&transport)
        .fetch_all_pages(BASE, "/stats", &[param("seasons[]", 2024)])
        .await?;

    let numbers: Vec<i64> = rows.iter().map(|r| r["n"].as_i64().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(transport.call_count(), 3);
    assert_eq!(transport.param(0, "cursor").as_deref(), Some("0"));
    assert_eq!(transport.param(1, "cursor").as_deref(), Some("17"));
    assert_eq!(transport.param(2, "cursor").as_deref(), Some("42"));
    assert_eq!(transport.param(0, "per_page").as_deref(), Some("100"));
    assert_eq!(transport.param(2, "seasons[]").as_deref(), Some("2024"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn empty_page_stops_pagination() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json("/stats", 200, page(vec![json!({"n": 1})], Some(5)))
        .json("/stats", 200, page(vec![], Some(6)));

    let rows = fetcher(&transport).fetch_all_pages(BASE, "/stats", &[]).await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn absent_first_page_yields_nothing() -> anyhow::Result<()> {
    let transport = MockTransport::new();

    let rows = fetcher(&transport).fetch_all_pages(BASE, "/stats", &[]).await?;

    assert!(rows.is_empty());
    assert_eq!(transport.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn repeated_cursor_stops_pagination() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json("/stats", 200, page(vec![json!({"n": 1})], Some(9)))
        .json("/stats", 200, page(vec![json!({"n": 2})], Some(9)));

    let rows = fetcher(&transport).fetch_all_pages(BASE, "/stats", &[]).await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn page_limit_is_respected() -> anyhow::Result<()> {
    let transport = MockTransport::new()
        .json("/season_stats", 200, page(vec![json!({"n": 1})], Some(1)))
        .json("/season_stats", 200, page(vec![json!({"n": 2})], Some(2)))
        .json("/season_stats", 200, page(vec![json!({"n": 3})], Some(3)));

    let rows = fetcher(&transport)
        .fetch_pages(BASE, "/season_stats", &[], 2)
        .await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(transport.call_count(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failure_mid_pagination_propagates() {
    let transport = MockTransport::new()
        .json("/stats", 200, page(vec![json!({"n": 1})], Some(3)))
        .text("/stats", 503, "maintenance");

    let err = fetcher(&transport)
        .fetch_all_pages(BASE, "/stats", &[])
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ApiErrorKind::Status { status: 503, .. }));
}
