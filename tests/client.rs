use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Local, NaiveDate};
use serde_json::{json, Value};

use wellness_api::client::{
    session::{ENTRIES_CACHE_KEY, USER_ID_KEY, USERNAME_KEY},
    ApiClient, ClientError, EntryDraft, MemoryStorage, Session, Storage,
};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn entry_json(id: i32, user_id: i64, date: NaiveDate) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "date": date,
        "mood": 6,
        "sleep": 7.25,
        "stress": 2,
        "journal": null,
        "activities": ["walk"],
        "created_at": "2024-01-01T08:00:00",
        "updated_at": "2024-01-01T08:00:00",
    })
}

async fn fake_auth(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["action"].as_str() {
        Some("login") if body["password"] == "password123" => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user": {
                    "id": 7,
                    "username": body["username"],
                    "created_at": "2024-01-01T08:00:00",
                },
            })),
        ),
        Some("login") => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid username or password" })),
        ),
        Some("register") => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Username already exists" })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid action" })),
        ),
    }
}

/// Today, yesterday, the day before, then a gap and one entry ten days back.
async fn fake_list(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let user_id: i64 = query
        .get("user_id")
        .and_then(|id| id.parse().ok())
        .unwrap_or(1);
    let today = today();
    Json(json!([
        entry_json(4, user_id, today),
        entry_json(3, user_id, today - Duration::days(1)),
        entry_json(2, user_id, today - Duration::days(2)),
        entry_json(1, user_id, today - Duration::days(10)),
    ]))
}

async fn fake_save(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut entry = entry_json(
        11,
        body["user_id"].as_i64().unwrap_or(1),
        serde_json::from_value(body["date"].clone()).unwrap_or_else(|_| today()),
    );
    entry["mood"] = body["mood"].clone();
    entry["activities"] = body["activities"].clone();
    (StatusCode::CREATED, Json(entry))
}

async fn fake_delete(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "message": "Entry deleted successfully" }))
}

async fn spawn_fake_server() -> String {
    let app = Router::new()
        .route("/auth", post(fake_auth))
        .route(
            "/entries",
            get(fake_list).post(fake_save).delete(fake_delete),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake server");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server failed");
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
async fn unreachable_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let addr: SocketAddr = listener.local_addr().expect("no local addr");
    drop(listener);
    format!("http://{addr}")
}

fn client(base: String) -> (ApiClient, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let client = ApiClient::new(base, storage.clone());
    (client, storage)
}

fn signed_in() -> Session {
    Session {
        user_id: Some(7),
        username: Some("user123".into()),
    }
}

#[tokio::test]
async fn login_records_session_and_persists_it() {
    let (client, storage) = client(spawn_fake_server().await);
    let mut session = Session::default();

    let response = client
        .login(&mut session, "user123", "password123")
        .await
        .expect("login failed");

    assert!(response.success);
    assert_eq!(session.user_id, Some(7));
    assert_eq!(session.username.as_deref(), Some("user123"));
    assert_eq!(storage.get(USER_ID_KEY).unwrap().as_deref(), Some("7"));
    assert_eq!(storage.get(USERNAME_KEY).unwrap().as_deref(), Some("user123"));
    assert_eq!(Session::restore(storage.as_ref()).unwrap(), session);
}

#[tokio::test]
async fn rejected_login_propagates_and_leaves_session_alone() {
    let (client, storage) = client(spawn_fake_server().await);
    let mut session = Session::default();

    let err = client
        .login(&mut session, "user123", "wrong")
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid username or password");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(session, Session::default());
    assert_eq!(storage.get(USER_ID_KEY).unwrap(), None);
}

#[tokio::test]
async fn register_conflict_propagates() {
    let (client, _) = client(spawn_fake_server().await);

    let err = client.register("user123", "password123").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 409, .. }));
}

#[tokio::test]
async fn reads_use_session_user_and_derive_locally() {
    let (client, _) = client(spawn_fake_server().await);
    let session = signed_in();

    let entries = client.get_all_entries(&session).await;
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.user_id == 7));

    let yesterday = today() - Duration::days(1);
    let entry = client.get_entry(&session, yesterday).await.expect("entry");
    assert_eq!(entry.id, 3);
    assert!(client
        .get_entry(&session, today() - Duration::days(5))
        .await
        .is_none());

    let recent = client.get_last_n_days(&session, 7).await;
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|e| e.date >= today() - Duration::days(7)));

    assert_eq!(client.calculate_streak(&session).await, 3);
}

#[tokio::test]
async fn save_and_delete_round_trip() {
    let (client, _) = client(spawn_fake_server().await);
    let session = signed_in();
    let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

    let draft = EntryDraft {
        mood: Some(8),
        sleep: Some(7.5),
        stress: Some(1),
        journal: Some("good day".into()),
        activities: vec!["yoga".into(), "reading".into()],
    };
    let saved = client.save_entry(&session, date, &draft).await.expect("save");
    assert_eq!(saved.user_id, 7);
    assert_eq!(saved.date, date);
    assert_eq!(saved.mood, Some(8));
    assert_eq!(saved.activities, vec!["yoga", "reading"]);

    let deleted = client.delete_entry(&session, date).await.expect("delete");
    assert_eq!(deleted.message, "Entry deleted successfully");
}

#[tokio::test]
async fn reads_swallow_transport_failures() {
    let (client, _) = client(unreachable_base().await);
    let session = signed_in();

    assert!(client.get_all_entries(&session).await.is_empty());
    assert!(client.get_entry(&session, today()).await.is_none());
    assert!(client.get_last_n_days(&session, 7).await.is_empty());
    assert_eq!(client.calculate_streak(&session).await, 0);
}

#[tokio::test]
async fn writes_propagate_transport_failures() {
    let (client, _) = client(unreachable_base().await);
    let mut session = signed_in();

    let save = client
        .save_entry(&session, today(), &EntryDraft::default())
        .await;
    assert!(matches!(save, Err(ClientError::Transport(_))));

    let delete = client.delete_entry(&session, today()).await;
    assert!(matches!(delete, Err(ClientError::Transport(_))));

    let register = client.register("someone", "secret").await;
    assert!(matches!(register, Err(ClientError::Transport(_))));

    let login = client.login(&mut session, "someone", "secret").await;
    assert!(matches!(login, Err(ClientError::Transport(_))));
}

#[tokio::test]
async fn fallback_serves_cached_entries_when_offline() {
    let (client, storage) = client(unreachable_base().await);
    let session = signed_in();

    assert!(client.get_entries_with_fallback(&session).await.is_empty());

    let cached = json!([entry_json(9, 7, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())]);
    storage
        .set(ENTRIES_CACHE_KEY, &cached.to_string())
        .unwrap();

    let entries = client.get_entries_with_fallback(&session).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, 9);
}

#[tokio::test]
async fn fallback_prefers_network_when_available() {
    let (client, storage) = client(spawn_fake_server().await);
    storage.set(ENTRIES_CACHE_KEY, "[]").unwrap();

    let entries = client.get_entries_with_fallback(&signed_in()).await;
    assert_eq!(entries.len(), 4);
}
