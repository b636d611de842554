//! Integration tests for the server-sent dashboard stream.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, StatusCode};
use http_body_util::BodyExt;
use kilnwatch_api::background::snapshot_publisher;
use kilnwatch_core::snapshot::DashboardSnapshot;
use kilnwatch_db::repositories::ReadingRepo;
use tokio_util::sync::CancellationToken;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Wait for the next SSE data frame and return it as text.
async fn next_frame(body: &mut Body) -> Option<String> {
    let frame = tokio::time::timeout(FRAME_TIMEOUT, body.frame())
        .await
        .expect("timed out waiting for an SSE frame")?
        .unwrap();
    let bytes = frame.into_data().ok()?;
    Some(String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn stream_responds_with_event_stream() {
    let state = common::test_state(common::test_pool().await, None);
    let response = common::get(common::build_test_app(state), "/ws/data").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");
}

#[tokio::test]
async fn stream_sends_snapshot_on_connect() {
    let pool = common::test_pool().await;
    ReadingRepo::insert(&pool, &common::nominal_reading("2024-05-01 10:00:00.000000"))
        .await
        .unwrap();

    let state = common::test_state(pool, Some(common::kiln_model()));
    let response = common::get(common::build_test_app(state), "/api/v1/stream").await;
    let mut body = response.into_body();

    let first = next_frame(&mut body).await.unwrap();
    assert!(first.starts_with("data:"), "{first}");
    assert!(first.contains("\"latest\""));
    assert!(first.contains("2024-05-01 10:00:00.000000"));
    assert!(first.contains("\"anomaly\":0"));
    assert!(first.contains("\"kiln_temperature\":\"safe\""));
}

#[tokio::test]
async fn stream_forwards_published_snapshots() {
    let state = common::test_state(common::test_pool().await, None);
    let response = common::get(common::build_test_app(state.clone()), "/ws/data").await;
    let mut body = response.into_body();

    let first = next_frame(&mut body).await.unwrap();
    assert!(first.contains("\"latest\":{}"), "{first}");
    assert!(first.contains("id: 0"), "{first}");

    state.bus.publish(DashboardSnapshot::default());
    let second = next_frame(&mut body).await.unwrap();
    assert!(second.contains("id: 1"), "{second}");
    assert!(second.contains("\"alerts\":{}"));
}

#[tokio::test]
async fn snapshot_on_connect_carries_last_published_sequence() {
    let state = common::test_state(common::test_pool().await, None);
    state.bus.publish(DashboardSnapshot::default());
    state.bus.publish(DashboardSnapshot::default());

    let response = common::get(common::build_test_app(state.clone()), "/ws/data").await;
    let mut body = response.into_body();

    let first = next_frame(&mut body).await.unwrap();
    assert!(first.contains("id: 2"), "{first}");

    state.bus.publish(DashboardSnapshot::default());
    let next = next_frame(&mut body).await.unwrap();
    assert!(next.contains("id: 3"), "{next}");
}

#[tokio::test]
async fn stream_ends_on_shutdown() {
    let state = common::test_state(common::test_pool().await, None);
    let response = common::get(common::build_test_app(state.clone()), "/ws/data").await;
    let mut body = response.into_body();

    next_frame(&mut body).await.unwrap();
    state.shutdown.cancel();

    let end = tokio::time::timeout(FRAME_TIMEOUT, body.frame())
        .await
        .expect("stream did not end after shutdown");
    assert!(end.is_none());
}

#[tokio::test]
async fn publisher_pushes_ticks_to_subscribers() {
    let pool = common::test_pool().await;
    ReadingRepo::insert(&pool, &common::nominal_reading("2024-05-01 10:00:00.000000"))
        .await
        .unwrap();

    let state = common::test_state(pool, None);
    let mut receiver = state.bus.subscribe();
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(snapshot_publisher::run(
        state.clone(),
        Duration::from_millis(20),
        cancel.clone(),
    ));

    let event = tokio::time::timeout(FRAME_TIMEOUT, receiver.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.sequence, 1);
    assert!(!event.snapshot.is_empty());
    assert_eq!(event.snapshot.alerts.len(), 8);

    cancel.cancel();
    tokio::time::timeout(FRAME_TIMEOUT, handle).await.unwrap().unwrap();
}
