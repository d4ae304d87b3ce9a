//! Tests for route creation, reads, and cascading deletes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::image_lifecycle_service::DEFAULT_DRAFT_TTL;
use crate::domain::ports::{HistoryIndex, ImageLibrary, MockHistoryIndex};
use crate::domain::{DataUrl, ErrorCode, HistoryIndexService, Order};
use crate::outbound::kv::InMemoryKeyValueStore;
use crate::test_support::MutableClock;

struct Harness {
    store: Arc<InMemoryKeyValueStore>,
    images: ImageLifecycleService,
    history: Arc<HistoryIndexService>,
    service: RouteDocumentService,
}

fn created_at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-12-11T08:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(MutableClock::new(created_at()));
    let store = Arc::new(InMemoryKeyValueStore::with_clock(clock.clone()));
    let images = ImageLifecycleService::new(store.clone(), DEFAULT_DRAFT_TTL);
    let history = Arc::new(HistoryIndexService::new(store.clone()));
    let service = RouteDocumentService::new(
        store.clone(),
        images.clone(),
        history.clone(),
        RouteWriteLocks::new(),
        clock,
    );
    Harness {
        store,
        images,
        history,
        service,
    }
}

fn order(customer: &str) -> Order {
    Order {
        customer: customer.to_owned(),
        address: "No. 291 Linsen Rd".to_owned(),
        items: "Fridge x1".to_owned(),
        ..Order::default()
    }
}

fn today() -> HistoryDate {
    HistoryDate::of(created_at())
}

#[rstest]
#[tokio::test]
async fn create_then_read_round_trips_with_permanent_image_keys(harness: Harness) {
    let draft = harness
        .images
        .stash_draft(&DataUrl::from_bytes("image/jpeg", b"receipt"))
        .await
        .expect("stash");
    let mut first = order("Chen");
    first.image_key = Some(draft.into_inner());
    first.extra.insert("tags".to_owned(), json!(["fridge_upright"]));
    let second = order("Lin");

    let route_id = harness
        .service
        .create(vec![first.clone().into(), second.clone().into()])
        .await
        .expect("create");
    let document = harness.service.read(&route_id).await.expect("read");

    assert_eq!(document.route_id, route_id);
    assert_eq!(document.created_at, created_at());
    assert_eq!(document.orders.len(), 2);

    let stored_first = &document.orders[0];
    assert_eq!(
        stored_first.image_key.as_deref(),
        Some(format!("img_{route_id}_0").as_str())
    );
    let expected_first = Order {
        image_key: stored_first.image_key.clone(),
        ..first
    };
    assert_eq!(stored_first, &expected_first);
    assert_eq!(document.orders[1], second);

    let image_key = StoreKey::new(stored_first.image_key.clone().expect("key")).expect("key");
    assert_eq!(
        harness.images.serve(&image_key).await.expect("serve").bytes,
        b"receipt"
    );
}

#[rstest]
#[tokio::test]
async fn create_records_history_snapshot(harness: Harness) {
    let route_id = harness
        .service
        .create(vec![order("Chen").into(), order("Lin").into(), order("Wu").into()])
        .await
        .expect("create");

    let listed = harness.history.list(&today()).await.expect("list");
    assert_eq!(
        listed,
        vec![HistoryEntry {
            route_id,
            created_at: created_at(),
            order_count: 3,
        }]
    );
}

#[rstest]
#[tokio::test]
async fn create_resets_server_owned_counters(harness: Harness) {
    let mut submitted = order("Chen");
    submitted.delivery_photo_count = 9;
    submitted.status = OrderStatus::Done;
    let route_id = harness
        .service
        .create(vec![submitted.into()])
        .await
        .expect("create");
    let document = harness.service.read(&route_id).await.expect("read");
    assert_eq!(document.orders[0].delivery_photo_count, 0);
    assert_eq!(document.orders[0].status, OrderStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn delete_clears_every_key_when_the_document_is_corrupt(harness: Harness) {
    let new_order = NewOrder {
        order: order("Chen"),
        source_image_data: Some(DataUrl::from_bytes("image/png", b"inline").to_string()),
    };
    let route_id = harness.service.create(vec![new_order]).await.expect("create");
    harness
        .store
        .put(&StoreKey::route(&route_id), "{not json", None)
        .await
        .expect("corrupt route");

    harness
        .service
        .delete(&route_id, &today())
        .await
        .expect("delete succeeds");

    assert!(harness.store.is_empty().expect("len"));
    assert!(harness.history.list(&today()).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn create_uses_inline_image_when_no_draft(harness: Harness) {
    let new_order = NewOrder {
        order: order("Chen"),
        source_image_data: Some(DataUrl::from_bytes("image/png", b"inline").to_string()),
    };
    let route_id = harness.service.create(vec![new_order]).await.expect("create");
    let document = harness.service.read(&route_id).await.expect("read");
    assert_eq!(
        document.orders[0].image_key.as_deref(),
        Some(format!("img_{route_id}_0").as_str())
    );
}

#[rstest]
#[tokio::test]
async fn create_drops_dangling_image_keys(harness: Harness) {
    let mut submitted = order("Chen");
    submitted.image_key = Some("draft_expired".to_owned());
    let route_id = harness
        .service
        .create(vec![submitted.into()])
        .await
        .expect("create");
    let document = harness.service.read(&route_id).await.expect("read");
    assert!(document.orders[0].image_key.is_none());
}

#[rstest]
#[tokio::test]
async fn read_unknown_route_is_not_found(harness: Harness) {
    let err = harness
        .service
        .read(&RouteId::new("deadbeef").expect("route id"))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_cascades_and_is_idempotent(harness: Harness) {
    let inline = DataUrl::from_bytes("image/png", b"inline").to_string();
    let route_id = harness
        .service
        .create(vec![
            NewOrder {
                order: order("Chen"),
                source_image_data: Some(inline.clone()),
            },
            NewOrder {
                order: order("Lin"),
                source_image_data: Some(inline),
            },
        ])
        .await
        .expect("create");
    let photo = StoreKey::delivery_photo(&route_id, OrderIndex::new(0), 0);
    harness.store.put(&photo, "x", None).await.expect("put");

    harness
        .service
        .delete(&route_id, &today())
        .await
        .expect("delete");
    harness
        .service
        .delete(&route_id, &today())
        .await
        .expect("second delete succeeds");

    assert_eq!(
        harness.service.read(&route_id).await.expect_err("gone").code(),
        ErrorCode::NotFound
    );
    assert!(harness.history.list(&today()).await.expect("list").is_empty());
    assert!(
        harness
            .store
            .list(&KeyPrefix::permanent_images(&route_id))
            .await
            .expect("list")
            .is_empty()
    );
    assert!(
        harness
            .store
            .list(&KeyPrefix::route_delivery_photos(&route_id))
            .await
            .expect("list")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn delete_with_wrong_date_still_removes_creation_entry(harness: Harness) {
    let route_id = harness
        .service
        .create(vec![order("Chen").into()])
        .await
        .expect("create");
    let other_day: HistoryDate = "2025-12-01".parse().expect("date");

    harness
        .service
        .delete(&route_id, &other_day)
        .await
        .expect("delete");
    assert!(harness.history.list(&today()).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_leaves_other_routes_alone(harness: Harness) {
    let doomed = harness
        .service
        .create(vec![order("Chen").into()])
        .await
        .expect("create");
    let survivor = harness
        .service
        .create(vec![order("Lin").into()])
        .await
        .expect("create");

    harness.service.delete(&doomed, &today()).await.expect("delete");

    assert!(harness.service.read(&survivor).await.is_ok());
    let listed = harness.history.list(&today()).await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].route_id, survivor);
}

#[tokio::test]
async fn history_failure_surfaces_from_create() {
    let clock = Arc::new(MutableClock::new(created_at()));
    let store = Arc::new(InMemoryKeyValueStore::with_clock(clock.clone()));
    let mut history = MockHistoryIndex::new();
    history
        .expect_record()
        .times(1)
        .return_once(|_| Err(Error::internal("history store down")));
    let service = RouteDocumentService::new(
        store.clone(),
        ImageLifecycleService::new(store, DEFAULT_DRAFT_TTL),
        Arc::new(history),
        RouteWriteLocks::new(),
        clock,
    );

    let err = service
        .create(vec![order("Chen").into()])
        .await
        .expect_err("history failure propagates");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
