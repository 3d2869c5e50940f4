//! End-to-end API tests.
//!
//! Mounts the router on an ephemeral listener, backed by the in-memory card
//! store, and exercises it with reqwest. Each test gets a fresh server.

use std::sync::Arc;

use exone_api::{cards::MemoryCardStore, config::Config, router, state::AppState};
use serde_json::{json, Value};

fn test_state() -> Arc<AppState> {
    let config = Config {
        port: 0,
        redis_url: String::new(),
        cors_origins: vec!["http://localhost:5173".to_string()],
    };

    AppState::with_store(config, Arc::new(MemoryCardStore::default()))
}

/// Bind to port 0 and return the base URL of a running server.
async fn start_server() -> String {
    let app = router(test_state());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn create_card(client: &reqwest::Client, base: &str, name: &str) -> Value {
    let resp = client
        .post(format!("{base}/createCard"))
        .json(&json!({ "name": name, "link": "http://x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    resp.json().await.unwrap()
}

#[tokio::test]
async fn create_starts_at_zero_likes_and_round_trips() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/createCard"))
        .json(&json!({ "name": "A", "link": "http://x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["likes"], 0);
    assert_eq!(created["name"], "A");
    assert_eq!(created["link"], "http://x");
    assert!(created["createdAt"].is_string());

    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let fetched: Value = client
        .get(format!("{base}/getCard/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_trims_fields_and_omits_blank_description() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/createCard"))
        .json(&json!({ "name": "  A  ", "link": " http://x ", "description": "   " }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(created["name"], "A");
    assert_eq!(created["link"], "http://x");
    assert!(created.get("description").is_none());
}

#[tokio::test]
async fn create_rejects_missing_name_or_link() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    for payload in [
        json!({ "link": "http://x" }),
        json!({ "name": "A" }),
        json!({ "name": "   ", "link": "http://x" }),
        json!({}),
    ] {
        let resp = client
            .post(format!("{base}/createCard"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Faltan campos requeridos");
    }

    let all: Value = client
        .get(format!("{base}/getAllCards"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create_card(&client, &base, "doomed").await;
    let id = created["id"].as_str().unwrap();

    let resp = client
        .delete(format!("{base}/deleteCard/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Card eliminada");
    assert_eq!(body["deleted"], created);

    let resp = client
        .get(format!("{base}/getCard/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Card no encontrada");
}

#[tokio::test]
async fn like_and_unlike_move_the_counter() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create_card(&client, &base, "popular").await;
    let id = created["id"].as_str().unwrap();

    let mut last = Value::Null;
    for _ in 0..3 {
        let resp = client
            .put(format!("{base}/likeCard/{id}"))
            .json(&json!({ "action": "like" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        last = resp.json().await.unwrap();
    }
    assert_eq!(last["likes"], 3);

    let unliked: Value = client
        .put(format!("{base}/likeCard/{id}"))
        .json(&json!({ "action": "unlike" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unliked["likes"], 2);
}

#[tokio::test]
async fn unlike_clamps_at_zero() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create_card(&client, &base, "unloved").await;
    let id = created["id"].as_str().unwrap();

    for _ in 0..4 {
        let body: Value = client
            .put(format!("{base}/likeCard/{id}"))
            .json(&json!({ "action": "unlike" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["likes"], 0);
    }
}

#[tokio::test]
async fn invalid_action_is_rejected_and_leaves_likes_unchanged() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let created = create_card(&client, &base, "stable").await;
    let id = created["id"].as_str().unwrap();

    for payload in [json!({ "action": "explode" }), json!({})] {
        let resp = client
            .put(format!("{base}/likeCard/{id}"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Acción inválida");
    }

    let fetched: Value = client
        .get(format!("{base}/getCard/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["likes"], 0);
}

#[tokio::test]
async fn unknown_ids_yield_not_found_everywhere() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/getCard/definitely-not-an-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{base}/deleteCard/definitely-not-an-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .put(format!("{base}/likeCard/definitely-not-an-id"))
        .json(&json!({ "action": "like" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Card no encontrada");
}

#[tokio::test]
async fn list_returns_created_cards_in_order_on_both_paths() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let names = ["first", "second", "third"];
    let mut created = Vec::new();
    for name in names {
        created.push(create_card(&client, &base, name).await);
    }

    for path in ["getAllCards", "GetAllCards"] {
        let all: Value = client
            .get(format!("{base}/{path}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let all = all.as_array().unwrap();
        assert_eq!(all.len(), names.len());
        for (listed, card) in all.iter().zip(&created) {
            assert_eq!(listed, card);
        }
    }
}

#[tokio::test]
async fn probe_endpoints_answer_with_their_fixed_bodies() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let hola = client.get(format!("{base}/hola")).send().await.unwrap();
    assert_eq!(hola.status(), 200);
    assert_eq!(hola.text().await.unwrap(), "hallo");

    let hello = client.get(format!("{base}/hello")).send().await.unwrap();
    assert_eq!(hello.status(), 200);
    assert_eq!(hello.text().await.unwrap(), "adabada");
}

#[tokio::test]
async fn index_lists_the_endpoints_as_html() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let body = resp.text().await.unwrap();
    assert!(body.contains("/createCard"));
    assert!(body.contains("/likeCard/:id"));
}

#[tokio::test]
async fn datos_list_appends_and_validates() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let empty: Value = client
        .get(format!("{base}/api/datos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty, json!([]));

    let resp = client
        .post(format!("{base}/api/datos"))
        .json(&json!({ "Nombre": "Ana", "Apellido": "García", "Grupo": "A", "PuntosExtra": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["mensaje"], "Dato agregado correctamente");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["Nombre"], "Ana");

    // Null is an accepted value, only a missing key is rejected.
    let resp = client
        .post(format!("{base}/api/datos"))
        .json(&json!({ "Nombre": "Luis", "Apellido": "Pérez", "Grupo": "B", "PuntosExtra": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["id"], 2);

    let resp = client
        .post(format!("{base}/api/datos"))
        .json(&json!({ "Nombre": "Eva", "Apellido": "Cruz", "Grupo": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Faltan campos requeridos");

    let all: Value = client
        .get(format!("{base}/api/datos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["Nombre"], "Ana");
    assert_eq!(all[1]["PuntosExtra"], Value::Null);
}
