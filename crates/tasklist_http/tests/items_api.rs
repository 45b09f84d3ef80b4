use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tasklist_core::Item;
use tasklist_test_utils::{seed_numbered_items, TestStore};
use tower::ServiceExt;

/// One isolated store per test, seeded with `Item 1`..`Item 10` (ids 1..10).
fn seeded_fixture() -> (TestStore, Router) {
    let store = TestStore::in_memory().seed_with(|s| seed_numbered_items(s, 10));
    let app = tasklist_http::app(store.conn_handle());
    (store, app)
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn get_all_returns_the_seeded_items() {
    let (_store, app) = seeded_fixture();

    let resp = app.oneshot(bare_request("GET", "/api/items")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Item> = body_json(resp).await;
    assert_eq!(items.len(), 10);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[9].description, "Item 10");
}

// --- get by id ---

#[tokio::test]
async fn get_by_id_returns_not_found_given_unknown_id() {
    let (_store, app) = seeded_fixture();

    let resp = app
        .oneshot(bare_request("GET", "/api/items/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_by_id_returns_item_given_valid_id() {
    let (_store, app) = seeded_fixture();

    let resp = app
        .oneshot(bare_request("GET", "/api/items/2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let item: Item = body_json(resp).await;
    assert_eq!(item.id, 2);
    assert_eq!(item.description, "Item 2");
}

// --- create ---

#[tokio::test]
async fn create_returns_bad_request_given_no_payload() {
    let (store, app) = seeded_fixture();

    let resp = app
        .oneshot(bare_request("POST", "/api/items"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.item_count(), 10);
}

#[tokio::test]
async fn create_returns_bad_request_given_malformed_json() {
    let (store, app) = seeded_fixture();

    let resp = app
        .oneshot(json_request("POST", "/api/items", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.item_count(), 10);
}

#[tokio::test]
async fn create_returns_bad_request_when_description_is_missing_or_empty() {
    let (store, app) = seeded_fixture();

    for body in ["{}", r#"{"description":""}"#, r#"{"description":"   "}"#] {
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/items", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    // No failed create mutated the store.
    assert_eq!(store.item_count(), 10);
}

#[tokio::test]
async fn create_returns_newly_created_item() {
    let (store, app) = seeded_fixture();

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/items",
            r#"{"description":"This is a new task"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(http::header::LOCATION)
        .expect("created response carries a location")
        .to_str()
        .unwrap()
        .to_string();
    let created: Item = body_json(resp).await;
    assert_eq!(created.id, 11);
    assert_eq!(location, "/api/items/11");

    let found = store
        .find_where(|item| item.description == "This is a new task")
        .expect("new item visible through the harness");
    assert_eq!(found.id, 11);
    assert_eq!(store.item_count(), 11);
}

#[tokio::test]
async fn create_ignores_caller_supplied_id() {
    let (store, app) = seeded_fixture();

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/items",
            r#"{"id":500,"description":"identity comes from the store"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    assert_eq!(created.id, 11);
    assert!(store.find_by_id(500).is_none());
}

// --- update ---

#[tokio::test]
async fn update_returns_bad_request_when_body_id_mismatches_path() {
    let (_store, app) = seeded_fixture();

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/api/items/99",
            r#"{"id":1,"description":"Task 1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_returns_bad_request_given_no_payload() {
    let (_store, app) = seeded_fixture();

    let resp = app
        .oneshot(bare_request("PUT", "/api/items/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_returns_bad_request_when_description_is_invalid() {
    let (store, app) = seeded_fixture();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/items/1",
            r#"{"id":1,"description":null}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/api/items/1",
            r#"{"id":1,"description":""}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The stored row is untouched by the rejected updates.
    assert_eq!(store.find_by_id(1).unwrap().description, "Item 1");
}

#[tokio::test]
async fn update_returns_not_found_for_unknown_id_with_consistent_body() {
    let (_store, app) = seeded_fixture();

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/api/items/99",
            r#"{"id":99,"description":"Task 99"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_returns_no_content_when_item_updated() {
    let (store, app) = seeded_fixture();

    let resp = app
        .oneshot(json_request(
            "PUT",
            "/api/items/1",
            r#"{"id":1,"description":"Task 1","done":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let updated = store.find_by_id(1).expect("item 1 still exists");
    assert_eq!(updated.description, "Task 1");
    assert!(updated.done);
}

// --- delete ---

#[tokio::test]
async fn delete_returns_not_found_given_unknown_id() {
    let (_store, app) = seeded_fixture();

    let resp = app
        .oneshot(bare_request("DELETE", "/api/items/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_no_content_and_removes_the_item() {
    let (store, app) = seeded_fixture();

    let resp = app
        .clone()
        .oneshot(bare_request("DELETE", "/api/items/2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(store.find_by_id(2).is_none());

    let resp = app
        .oneshot(bare_request("GET", "/api/items/2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_id_is_not_reassigned_by_a_later_create() {
    let (store, app) = seeded_fixture();

    let resp = app
        .clone()
        .oneshot(bare_request("DELETE", "/api/items/10"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/items",
            r#"{"description":"takes a fresh id"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    assert_eq!(created.id, 11);
    assert!(store.find_by_id(10).is_none());
}

// --- health ---

#[tokio::test]
async fn health_reports_the_core_version() {
    let store = TestStore::in_memory();
    let app = tasklist_http::app(store.conn_handle());

    let resp = app.oneshot(bare_request("GET", "/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().starts_with("tasklist "));
}
