mod common;

use common::{USER_HEADER, mk_api_with};
use quill_core::Config;
use quill_server::HttpServer;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server(config: Config) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Arc::new(HttpServer::new(Arc::new(mk_api_with(config)), addr));
    tokio::spawn(server.serve(listener));
    addr
}

#[tokio::test]
async fn serves_the_entry_api_over_http() {
    let addr = spawn_server(Config::default()).await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let created: Value = client
        .post(format!("{base}/entries"))
        .header(USER_HEADER, "alice")
        .json(&json!({ "title": "Over the wire", "content": "Hello" }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["title"], "Over the wire");

    let response = client
        .get(format!("{base}/entries"))
        .header(USER_HEADER, "alice")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    let list: Vec<Value> = response.json().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], created["id"]);

    let response = client
        .delete(format!("{base}/entries/{}", created["id"].as_str().unwrap()))
        .header(USER_HEADER, "alice")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn rejects_oversized_bodies_while_reading() {
    let config = Config {
        max_body_bytes: 32,
        ..Config::default()
    };
    let addr = spawn_server(config).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/entries"))
        .header(USER_HEADER, "alice")
        .json(&json!({ "content": "x".repeat(1024) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Request body too large");
}
