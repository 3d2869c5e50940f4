//! Card board API for the exone front-end.
//!
//! Cards are JSON documents in Redis, addressed by ids minted from a store
//! sequence; the HTTP surface is create / list / get / delete plus a
//! like/unlike counter. The `/api/datos` list and the `/hola` and `/hello`
//! probes are kept for the existing front-end.
//!
//! Run with `RUST_LOG=info cargo run`; `PORT`, `REDIS_URL` and
//! `CORS_ORIGINS` override the defaults.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, post, put},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod cards;
pub mod config;
pub mod database;
pub mod datos;
pub mod error;
pub mod routes;
pub mod state;

use routes::{
    create_card_handler, create_dato_handler, delete_card_handler, get_all_cards_handler,
    get_card_handler, get_datos_handler, hello_handler, hola_handler, index_handler,
    like_card_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(index_handler))
        .route("/createCard", post(create_card_handler))
        // The front-end historically calls the capitalized path.
        .route("/getAllCards", get(get_all_cards_handler))
        .route("/GetAllCards", get(get_all_cards_handler))
        .route("/getCard/:id", get(get_card_handler))
        .route("/deleteCard/:id", delete(delete_card_handler))
        .route("/likeCard/:id", put(like_card_handler))
        .route("/hola", get(hola_handler))
        .route("/hello", get(hello_handler))
        .route(
            "/api/datos",
            get(get_datos_handler).post(create_dato_handler),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .map_err(|_| warn!("Ignoring invalid CORS origin: {origin}"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
