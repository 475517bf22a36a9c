use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::Json;

use super::*;

type Store = Arc<Mutex<HashMap<String, Value>>>;

async fn save_handler(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
    let key = body["key"].as_str().unwrap_or_default().to_owned();
    store.lock().unwrap().insert(key, body["value"].clone());
    Json(json!({ "ok": true }))
}

async fn get_handler(
    State(store): State<Store>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let key = query.get("key").cloned().unwrap_or_default();
    let value = store.lock().unwrap().get(&key).cloned();
    value.map(|value| Json(json!({ "key": key, "value": value }))).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_handler(State(store): State<Store>, Json(body): Json<Value>) -> StatusCode {
    let key = body["key"].as_str().unwrap_or_default();
    match store.lock().unwrap().remove(key) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn image_handler(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
    store.lock().unwrap().insert("__image".to_owned(), body["image"].clone());
    Json(json!({ "saved": true }))
}

async fn upload_handler(mut multipart: Multipart) -> Json<Value> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.unwrap();
        fields.push(json!({ "field": name, "file_name": file_name, "size": bytes.len() }));
    }
    Json(Value::Array(fields))
}

async fn broken_handler() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn text_handler() -> &'static str {
    "plain words"
}

async fn serve(store: Store) -> String {
    let app = Router::new()
        .route("/save", post(save_handler))
        .route("/get", get(get_handler))
        .route("/delete", delete(delete_handler))
        .route("/images", post(image_handler))
        .route("/upload", post(upload_handler))
        .route("/broken", post(broken_handler))
        .route("/text", post(text_handler))
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client() -> (RemoteClient, Store) {
    let store = Store::default();
    let base = serve(store.clone()).await;
    let client = RemoteClient::new(RemoteConfig::new(&base).unwrap()).unwrap();
    (client, store)
}

#[tokio::test]
async fn save_then_get_round_trips() {
    let (client, store) = client().await;
    let saved = client.save("drawing", &json!({ "shapes": 3 })).await.unwrap();
    assert_eq!(saved, json!({ "ok": true }));
    assert_eq!(store.lock().unwrap().get("drawing"), Some(&json!({ "shapes": 3 })));

    let got = client.get("drawing").await.unwrap();
    assert_eq!(got, json!({ "key": "drawing", "value": { "shapes": 3 } }));
}

#[tokio::test]
async fn get_missing_key_is_status_error() {
    let (client, _) = client().await;
    let err = client.get("nope").await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 404, .. }));
}

#[tokio::test]
async fn delete_removes_key() {
    let (client, store) = client().await;
    client.save("k", &json!(1)).await.unwrap();
    let body = client.delete("k").await.unwrap();
    assert_eq!(body, Value::Null);
    assert!(store.lock().unwrap().is_empty());
    assert!(matches!(client.delete("k").await, Err(RemoteError::Status { status: 404, .. })));
}

#[tokio::test]
async fn server_error_carries_body() {
    let (client, _) = client().await;
    let err = client.save_image("/broken", "data:image/png;base64,AAAA").await.unwrap_err();
    match err {
        RemoteError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn save_image_relative_and_absolute() {
    let (client, store) = client().await;
    client.save_image("images", "data:image/png;base64,AAAA").await.unwrap();
    assert_eq!(store.lock().unwrap().get("__image"), Some(&json!("data:image/png;base64,AAAA")));

    let absolute = client.config().url("/images");
    client.save_image(&absolute, "data:image/png;base64,BBBB").await.unwrap();
    assert_eq!(store.lock().unwrap().get("__image"), Some(&json!("data:image/png;base64,BBBB")));
}

#[tokio::test]
async fn non_json_body_comes_back_as_string() {
    let (client, _) = client().await;
    let value = client.save_image("/text", "x").await.unwrap();
    assert_eq!(value, json!("plain words"));
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let (client, _) = client().await;
    let body = client.upload_file("sketch.png", vec![1, 2, 3, 4]).await.unwrap();
    assert_eq!(body, json!([{ "field": "file", "file_name": "sketch.png", "size": 4 }]));
}

#[tokio::test]
async fn upload_path_uses_file_name() {
    let (client, _) = client().await;
    let path = std::env::temp_dir().join(format!("remote-upload-{}.bin", std::process::id()));
    std::fs::write(&path, b"hello").unwrap();
    let body = client.upload_path(&path).await.unwrap();
    std::fs::remove_file(&path).unwrap();
    let expected_name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(body, json!([{ "field": "file", "file_name": expected_name, "size": 5 }]));
}

#[tokio::test]
async fn upload_path_missing_file_is_io_error() {
    let (client, _) = client().await;
    let err = client.upload_path(Path::new("/definitely/not/here.png")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Io(_)));
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = RemoteClient::new(RemoteConfig::new(&format!("http://{addr}")).unwrap()).unwrap();
    assert!(matches!(client.get("k").await, Err(RemoteError::Http(_))));
}

#[tokio::test]
async fn send_chat_without_connection_is_false() {
    let (mut client, _) = client().await;
    assert!(!client.chat_connected());
    assert!(!client.send_chat("hello").await);
}

#[test]
fn parse_body_variants() {
    assert_eq!(parse_body(""), Value::Null);
    assert_eq!(parse_body("  \n"), Value::Null);
    assert_eq!(parse_body(r#"{"a":1}"#), json!({ "a": 1 }));
    assert_eq!(parse_body("ok"), json!("ok"));
}
