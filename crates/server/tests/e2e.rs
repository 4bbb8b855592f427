use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use models::user::{StorageMeta, User};
use server::routes::{self, AppState};
use service::store::{LastTouched, MemoryBackend, UserStore};

struct TestApp {
    base_url: String,
}

/// Boot the full router on an ephemeral port with the in-memory
/// backend, so the HTTP contract is exercised without a database.
async fn start_server() -> anyhow::Result<TestApp> {
    let store = Arc::new(UserStore::new(
        Arc::new(MemoryBackend::default()),
        Arc::new(LastTouched::default()),
    ));
    let app: Router = routes::build_router(AppState { store }, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_user_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let users_url = format!("{}/users", app.base_url);

    // create: 201 with the entity echoed back
    let res = c
        .post(&users_url)
        .json(&json!({"name": "Piotr", "age": 30}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: User = res.json().await?;
    assert_eq!(created, User { name: "Piotr".into(), age: 30 });

    // duplicate create: 200 with the existing record, body unchanged
    let res = c
        .post(&users_url)
        .json(&json!({"name": "Piotr", "age": 99}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let existing: User = res.json().await?;
    assert_eq!(existing.age, 30);

    // list: exactly one record
    let res = c.get(&users_url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let all: Vec<User> = res.json().await?;
    assert_eq!(all.len(), 1);

    // read one
    let res = c.get(format!("{}/Piotr", users_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let one: User = res.json().await?;
    assert_eq!(one.age, 30);

    // update: 200 with storage metadata
    let res = c
        .put(&users_url)
        .json(&json!({"name": "Piotr", "age": 22}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let meta: StorageMeta = res.json().await?;
    assert!(!meta.key.is_empty());
    assert!(!meta.revision.is_empty());

    let res = c.get(format!("{}/Piotr", users_url)).send().await?;
    let one: User = res.json().await?;
    assert_eq!(one.age, 22);

    // /meta observer reflects the most recent touch
    let res = c.get(format!("{}/meta", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let last: Option<StorageMeta> = res.json().await?;
    assert_eq!(last.map(|m| m.key), Some(meta.key.clone()));

    // delete: 200 with storage metadata, then reads miss
    let res = c.delete(format!("{}/Piotr", users_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let removed: StorageMeta = res.json().await?;
    assert_eq!(removed.key, meta.key);

    let res = c.get(format!("{}/Piotr", users_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn e2e_error_contract() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let users_url = format!("{}/users", app.base_url);

    // empty name fails shape validation
    let res = c
        .post(&users_url)
        .json(&json!({"name": "", "age": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert!(body["error"].is_string());

    // update of a never-created name is 404, not a create
    let res = c
        .put(&users_url)
        .json(&json!({"name": "ghost", "age": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = c.get(format!("{}/ghost", users_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // delete of an absent name is 404, not a crash
    let res = c.delete(format!("{}/nonexistent", users_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // the service still answers afterwards
    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
