//! REST transport integration tests.
//!
//! Starts a stub backend with axum and drives it through `RestTransport`.

#![cfg(feature = "http")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch};
use axum::{Json, Router};
use foodstore_sync::{
    AvailabilityPatch, CatalogueQuery, ClientConfig, CommentPatch, Credential, NewComment, RestTransport,
    Session, StoreDirectory, StoreQuery, Transport,
};
use serde_json::{json, Value};

#[derive(Default)]
struct Recorded {
    authorization: Option<String>,
    query: HashMap<String, String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Recorded>>;

fn record(state: &Shared, headers: &HeaderMap, query: HashMap<String, String>, body: Option<Value>) {
    let mut recorded = state.lock().unwrap();
    recorded.authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorded.query = query;
    recorded.body = body;
}

async fn list_stores(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&state, &headers, query, None);
    Json(json!([
        {
            "id": "p1",
            "userId": "s1",
            "user": { "id": "s1", "name": "La Huerta" },
            "storeHasFood": [
                { "storeId": "p1", "foodLocalId": "f1", "isAvailable": true }
            ]
        }
    ]))
}

async fn list_comments(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&state, &headers, query, None);
    Json(json!([
        { "id": "c1", "userId": "u2", "storeId": "s1", "content": "Rico", "isRecommended": true, "isHidden": null }
    ]))
}

async fn create_comment(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    record(&state, &headers, HashMap::new(), Some(body.clone()));
    Json(json!({
        "id": "c9",
        "userId": body["userId"],
        "storeId": body["storeId"],
        "content": body["content"],
        "isRecommended": body["isRecommended"],
        "createdAt": "2024-05-01T10:00:00Z"
    }))
}

async fn update_comment(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Comentario {id} no encontrado") })),
    )
}

async fn delete_comment(Path(_id): Path<String>) -> StatusCode {
    StatusCode::OK
}

async fn patch_availability(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(store_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    record(&state, &headers, HashMap::new(), Some(body.clone()));
    Json(json!({
        "storeId": store_id,
        "foodLocalId": body["foodLocalId"],
        "isAvailable": body["isAvailable"]
    }))
}

async fn list_catalogue() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// Bind to port 0 and return the actual address.
async fn start_backend() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/store-profile", get(list_stores))
        .route("/comments-store", get(list_comments).post(create_comment))
        .route("/comments-store/:id", patch(update_comment).delete(delete_comment))
        .route("/catalogue", get(list_catalogue))
        .route("/catalogue/bystore/:store_id", patch(patch_availability))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn transport(base: &str) -> RestTransport {
    RestTransport::new(ClientConfig::new(base), Some(Credential::new("tok-1")))
}

#[tokio::test]
async fn fetch_stores_sends_flags_and_bearer() {
    let (base, state) = start_backend().await;

    let stores = transport(&base)
        .fetch_stores(&StoreQuery::selling("f1"))
        .await
        .unwrap();

    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].display_name(), Some("La Huerta"));
    assert_eq!(stores[0].catalogue[0].food_local_id, "f1");

    let recorded = state.lock().unwrap();
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer tok-1"));
    assert_eq!(recorded.query.get("wu").map(String::as_str), Some("true"));
    assert_eq!(recorded.query.get("wc").map(String::as_str), Some("true"));
    assert_eq!(recorded.query.get("f").map(String::as_str), Some("f1"));
}

#[tokio::test]
async fn anonymous_requests_carry_no_bearer() {
    let (base, state) = start_backend().await;

    RestTransport::new(ClientConfig::new(&base), None)
        .fetch_stores(&StoreQuery::default())
        .await
        .unwrap();

    let recorded = state.lock().unwrap();
    assert!(recorded.authorization.is_none());
    assert!(!recorded.query.contains_key("f"));
}

#[tokio::test]
async fn create_comment_returns_canonical_record() {
    let (base, state) = start_backend().await;

    let created = transport(&base)
        .create_comment(&NewComment::new("u1", "s1", "Muy bueno").recommended(true))
        .await
        .unwrap();

    assert_eq!(created.id, "c9");
    assert!(created.is_recommended);
    assert!(created.created_at.is_some());

    let recorded = state.lock().unwrap();
    assert_eq!(recorded.body.as_ref().unwrap()["userId"], "u1");
}

#[tokio::test]
async fn error_message_comes_from_body() {
    let (base, _state) = start_backend().await;

    let patch = CommentPatch {
        content: "Cambiado".into(),
        is_recommended: false,
    };
    let err = transport(&base).update_comment("c7", &patch).await.unwrap_err();

    assert_eq!(err.status, Some(404));
    assert_eq!(err.to_string(), "Comentario c7 no encontrado");
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_reason() {
    let (base, _state) = start_backend().await;

    let err = transport(&base)
        .fetch_catalogue(&CatalogueQuery::for_store("p1"))
        .await
        .unwrap_err();

    assert_eq!(err.status, Some(500));
    assert_eq!(err.message, "Internal Server Error");
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let (base, _state) = start_backend().await;
    transport(&base).delete_comment("c1").await.unwrap();
}

#[tokio::test]
async fn availability_patch_goes_to_store_route() {
    let (base, state) = start_backend().await;

    let patch = AvailabilityPatch {
        food_local_id: "f1".into(),
        is_available: false,
    };
    let entry = transport(&base).patch_catalogue_entry("p1", &patch).await.unwrap();

    assert_eq!(entry.store_id, "p1");
    assert!(!entry.is_available);
    let recorded = state.lock().unwrap();
    assert_eq!(
        recorded.body,
        Some(json!({ "foodLocalId": "f1", "isAvailable": false }))
    );
}

#[tokio::test]
async fn directory_loads_over_http() {
    let (base, _state) = start_backend().await;
    let session = Session::signed_in("u2", Credential::new("tok-1"));
    let directory = StoreDirectory::new(transport(&base), session);

    let snapshot = directory.load(&StoreQuery::default()).await.unwrap();

    assert_eq!(snapshot.stores().len(), 1);
    assert!(!snapshot.comments()[0].is_hidden);
    let stats = directory.statistics_for(&snapshot.stores()[0]).unwrap();
    assert_eq!(stats.total_comments, 1);
    assert!(stats.viewer_has_recommended);
}
