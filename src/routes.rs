use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    cards::{Card, CreateCard, LikeAction},
    datos::{Dato, NewDato},
    error::AppError,
    state::AppState,
};

#[derive(Serialize)]
struct Endpoint {
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        method: "GET",
        path: "/",
        description: "Página con lista de endpoints",
    },
    Endpoint {
        method: "POST",
        path: "/createCard",
        description: "Crear una nueva tarjeta",
    },
    Endpoint {
        method: "GET",
        path: "/getAllCards",
        description: "Obtener todas las tarjetas",
    },
    Endpoint {
        method: "GET",
        path: "/getCard/:id",
        description: "Obtener una tarjeta por ID",
    },
    Endpoint {
        method: "DELETE",
        path: "/deleteCard/:id",
        description: "Eliminar tarjeta",
    },
    Endpoint {
        method: "PUT",
        path: "/likeCard/:id",
        description: "Incrementar o decrementar likes de tarjeta",
    },
    Endpoint {
        method: "GET",
        path: "/api/datos",
        description: "Obtener datos CSV",
    },
    Endpoint {
        method: "POST",
        path: "/api/datos",
        description: "Agregar un dato CSV",
    },
];

pub async fn index_handler() -> Html<String> {
    let listing = serde_json::to_string_pretty(ENDPOINTS).unwrap_or_default();

    Html(format!(
        "<html>\n  <head><title>API Endpoints</title></head>\n  <body>\n    \
         <h1>API Endpoints</h1>\n    <pre>{listing}</pre>\n  </body>\n</html>"
    ))
}

pub async fn create_card_handler(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<CreateCard>>,
) -> Result<impl IntoResponse, AppError> {
    let draft = payload.map(|Json(p)| p).unwrap_or_default().validate()?;

    let card = state.cards.insert(draft).await?;

    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_all_cards_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Card>>, AppError> {
    Ok(Json(state.cards.find_all().await?))
}

pub async fn get_card_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Card>, AppError> {
    let card = state
        .cards
        .find_by_id(&id)
        .await?
        .ok_or(AppError::CardNotFound)?;

    Ok(Json(card))
}

#[derive(Serialize)]
pub struct DeletedCard {
    pub message: &'static str,
    pub deleted: Card,
}

pub async fn delete_card_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedCard>, AppError> {
    let deleted = state
        .cards
        .delete_by_id(&id)
        .await?
        .ok_or(AppError::CardNotFound)?;

    Ok(Json(DeletedCard {
        message: "Card eliminada",
        deleted,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LikePayload {
    pub action: Option<String>,
}

pub async fn like_card_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Option<Json<LikePayload>>,
) -> Result<Json<Card>, AppError> {
    // Reject bad actions before touching the store.
    let action = payload
        .map(|Json(p)| p)
        .unwrap_or_default()
        .action
        .ok_or(AppError::InvalidAction)?
        .parse::<LikeAction>()?;

    let mut card = state
        .cards
        .find_by_id(&id)
        .await?
        .ok_or(AppError::CardNotFound)?;

    card.apply(action);
    state.cards.save(&card).await?;

    Ok(Json(card))
}

pub async fn hola_handler() -> &'static str {
    "hallo"
}

pub async fn hello_handler() -> &'static str {
    "adabada"
}

pub async fn get_datos_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Dato>> {
    let datos = state.datos.lock().unwrap().all();

    Json(datos)
}

#[derive(Serialize)]
pub struct CreatedDato {
    pub mensaje: &'static str,
    pub data: Dato,
}

pub async fn create_dato_handler(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<NewDato>>,
) -> Result<impl IntoResponse, AppError> {
    let nuevo = payload.map(|Json(p)| p).unwrap_or_default();

    let dato = state.datos.lock().unwrap().push(nuevo)?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedDato {
            mensaje: "Dato agregado correctamente",
            data: dato,
        }),
    ))
}
