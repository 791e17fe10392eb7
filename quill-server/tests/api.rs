mod common;

use common::{body_json, mk_api, mk_api_with, request, send};
use hyper::header;
use hyper::{Method, StatusCode};
use quill_core::{Config, EntryStore, FsBlobStore};
use quill_server::Api;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

#[tokio::test]
async fn create_read_list_delete_round_trip() {
    let api = mk_api();

    let (status, created) = send(
        &api,
        request(Method::POST, "/entries", Some("alice"), Some(r#"{"content":"Hello"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["preview"], "Hello");
    assert_eq!(created["title"], "Untitled");
    assert_eq!(created["userId"], "alice");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(
        &api,
        request(Method::GET, &format!("/entries/{id}"), Some("alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content"], "Hello");
    assert_eq!(fetched, created);

    let (status, list) = send(&api, request(Method::GET, "/entries", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert!(list[0].get("content").is_none());

    let (status, body) = send(
        &api,
        request(Method::DELETE, &format!("/entries/{id}"), Some("alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = send(
        &api,
        request(Method::GET, &format!("/entries/{id}"), Some("alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Entry not found" }));
}

#[tokio::test]
async fn create_uses_title_and_date_from_the_body() {
    let api = mk_api();
    let (status, created) = send(
        &api,
        request(
            Method::POST,
            "/entries",
            Some("alice"),
            Some(r##"{"title":"Trip","content":"# Day one\n\nWe **left**.","date":"2025-08-15"}"##),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Trip");
    assert_eq!(created["date"], "2025-08-15T00:00:00.000Z");
    assert_eq!(created["preview"], "Day one We left.");
    assert!(created["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn create_rejects_blank_content_and_oversized_titles() {
    let api = mk_api();

    let (status, body) = send(
        &api,
        request(Method::POST, "/entries", Some("alice"), Some(r#"{"content":"   "}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Content is required");

    let long_title = "t".repeat(201);
    let (status, body) = send(
        &api,
        request(
            Method::POST,
            "/entries",
            Some("alice"),
            Some(&json!({ "title": long_title, "content": "x" }).to_string()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"], json!(["title must be 200 characters or less"]));

    let (_, list) = send(&api, request(Method::GET, "/entries", Some("alice"), None)).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let api = mk_api();
    for (method, path) in [
        (Method::GET, "/entries"),
        (Method::POST, "/entries"),
        (Method::GET, "/entries/abc"),
        (Method::PUT, "/entries/abc"),
        (Method::DELETE, "/entries/abc"),
    ] {
        let req = request(method, path, None, Some(r#"{"content":"x"}"#));
        let (status, body) = send(&api, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");
    }
}

#[tokio::test]
async fn entries_are_private_to_their_owner() {
    let api = mk_api();
    let (_, created) = send(
        &api,
        request(Method::POST, "/entries", Some("alice"), Some(r#"{"content":"secret"}"#)),
    )
    .await;
    let path = format!("/entries/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&api, request(Method::GET, &path, Some("bob"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &api,
        request(Method::PUT, &path, Some("bob"), Some(r#"{"content":"mine now"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&api, request(Method::DELETE, &path, Some("bob"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&api, request(Method::GET, "/entries", Some("bob"), None)).await;
    assert_eq!(list, json!([]));
    let (status, fetched) = send(&api, request(Method::GET, &path, Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["content"], "secret");
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_created_at() {
    let api = mk_api();
    let (_, created) = send(
        &api,
        request(
            Method::POST,
            "/entries",
            Some("alice"),
            Some(r#"{"title":"Draft","content":"first","date":"2025-08-01T09:00:00Z"}"#),
        ),
    )
    .await;
    let path = format!("/entries/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(
        &api,
        request(Method::PUT, &path, Some("alice"), Some(r#"{"content":"second *take*"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["content"], "second *take*");
    assert_eq!(updated["preview"], "second take");
    assert_eq!(updated["title"], "Untitled");
    assert_eq!(updated["date"], "2025-08-01T09:00:00.000Z");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(updated["updatedAt"].as_str().unwrap() >= created["updatedAt"].as_str().unwrap());

    let (_, fetched) = send(&api, request(Method::GET, &path, Some("alice"), None)).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_errors() {
    let api = mk_api();
    let (status, _) = send(
        &api,
        request(Method::PUT, "/entries/missing", Some("alice"), Some(r#"{"content":"x"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &api,
        request(Method::PUT, "/entries/missing", Some("alice"), Some(r#"{"content":""}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Content is required");

    let (status, body) = send(
        &api,
        request(Method::PUT, "/entries/", Some("alice"), Some(r#"{"content":"x"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Entry id is required");
}

#[tokio::test]
async fn list_is_sorted_newest_first() {
    let api = mk_api();
    for (content, date) in [
        ("middle", "2025-08-10T00:00:00Z"),
        ("oldest", "2025-08-01T00:00:00Z"),
        ("newest", "2025-08-20T00:00:00Z"),
    ] {
        let body = json!({ "content": content, "date": date }).to_string();
        let req = request(Method::POST, "/entries", Some("alice"), Some(&body));
        let (status, _) = send(&api, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = send(&api, request(Method::GET, "/entries", Some("alice"), None)).await;
    let previews: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["preview"].as_str().unwrap())
        .collect();
    assert_eq!(previews, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn get_and_delete_need_an_id() {
    let api = mk_api();
    let (status, body) = send(&api, request(Method::GET, "/entries/", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Entry id is required");

    let (status, _) = send(&api, request(Method::DELETE, "/entries/", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ids_that_escape_the_user_prefix_are_rejected() {
    let api = mk_api();
    let (status, body) = send(
        &api,
        request(Method::GET, "/entries/..%2Fbob%2Fx", Some("alice"), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid entry");
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let api = mk_api();
    let (status, body) = send(&api, request(Method::GET, "/nope", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");

    let (status, _) = send(&api, request(Method::PATCH, "/entries", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = send(&api, request(Method::POST, "/entries/abc", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_needs_no_identity() {
    let api = mk_api();
    let (status, body) = send(&api, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn responses_carry_json_and_cors_headers() {
    let config = Config {
        cors_origin: "https://journal.example".to_string(),
        ..Config::default()
    };
    let api = mk_api_with(config);

    let response = api
        .handle(request(Method::GET, "/entries", Some("alice"), None))
        .await;
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://journal.example"
    );

    let error = api.handle(request(Method::GET, "/entries", None, None)).await;
    assert_eq!(
        error.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://journal.example"
    );
}

#[tokio::test]
async fn preflight_lists_methods_and_the_identity_header() {
    let api = mk_api();
    let response = api
        .handle(request(Method::OPTIONS, "/entries/abc", None, None))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("DELETE")
    );
    assert!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .contains("x-authenticated-user")
    );
    assert!(body_json(response).await.is_null());
}

#[tokio::test]
async fn bodies_over_the_limit_are_rejected() {
    let config = Config {
        max_body_bytes: 64,
        ..Config::default()
    };
    let api = mk_api_with(config);
    let body = json!({ "content": "x".repeat(100) }).to_string();
    let req = request(Method::POST, "/entries", Some("alice"), Some(&body));
    let (status, body) = send(&api, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Request body too large");
}

#[tokio::test]
async fn previews_agree_between_create_and_get_at_the_length_limit() {
    let api = mk_api();
    for len in [200, 201] {
        let body = json!({ "content": "x".repeat(len) }).to_string();
        let req = request(Method::POST, "/entries", Some("alice"), Some(&body));
        let (status, created) = send(&api, req).await;
        assert_eq!(status, StatusCode::CREATED);
        let preview = created["preview"].as_str().unwrap();
        assert!(preview.chars().count() <= 203);

        let id = created["id"].as_str().unwrap();
        let (_, fetched) = send(
            &api,
            request(Method::GET, &format!("/entries/{id}"), Some("alice"), None),
        )
        .await;
        assert_eq!(fetched["preview"], created["preview"]);
    }

    let (_, list) = send(&api, request(Method::GET, "/entries", Some("alice"), None)).await;
    for summary in list.as_array().unwrap() {
        assert!(summary["preview"].as_str().unwrap().chars().count() <= 200);
    }
}

async fn open_disk_api(dir: &Path) -> Api {
    let blobs = FsBlobStore::new(dir).await.unwrap();
    Api::from_config(EntryStore::new(Arc::new(blobs)), &Config::default()).unwrap()
}

#[tokio::test]
async fn entries_on_disk_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let api = open_disk_api(dir.path()).await;
    let (status, created) = send(
        &api,
        request(Method::POST, "/entries", Some("alice"), Some(r#"{"content":"Kept"}"#)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    drop(api);

    let api = open_disk_api(dir.path()).await;
    let (status, list) = send(&api, request(Method::GET, "/entries", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["id"], created["id"]);
    assert_eq!(list[0]["preview"], "Kept");
}
