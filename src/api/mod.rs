//! JSON API for the browser front end.
//!
//! Every handler locks the shared connection, runs one repository call and
//! releases the lock before returning. Errors are [`AppError`] values and
//! become `{"error", "message"}` bodies through [`error`].
//!
//! ```rust,no_run
//! use dexus::api::{serve, AppState};
//! use dexus::db::db::Db;
//! use dexus::libs::config::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let state = AppState::from_config(Db::new()?.conn, &config)?;
//! serve(state, "127.0.0.1", 8080).await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod clients;
pub mod error;
pub mod orders;
pub mod relations;

use crate::libs::config::Config;
use crate::libs::error::AppError;
use crate::libs::lookup::{CompanyRecord, DocumentLookup};
use crate::libs::messages::Message;
use crate::libs::pdf::PdfRenderer;
use crate::msg_info;
use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use rusqlite::Connection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type ApiResult<T> = Result<T, AppError>;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub conn: Arc<Mutex<Connection>>,
    pub renderer: Arc<PdfRenderer>,
    pub lookup: Arc<DocumentLookup>,
}

impl AppState {
    pub fn new(conn: Connection, renderer: PdfRenderer, lookup: DocumentLookup) -> Self {
        AppState {
            conn: Arc::new(Mutex::new(conn)),
            renderer: Arc::new(renderer),
            lookup: Arc::new(lookup),
        }
    }

    pub fn from_config(conn: Connection, config: &Config) -> Result<Self> {
        let renderer = PdfRenderer::from_config(config)?;
        let lookup = DocumentLookup::new(&config.lookup());
        Ok(Self::new(conn, renderer, lookup))
    }
}

/// Reply to a create, update or delete.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub id: i64,
    pub message: String,
}

impl Ack {
    pub fn new(id: i64, message: Message) -> Json<Ack> {
        Json(Ack {
            id,
            message: message.to_string(),
        })
    }

    pub fn created(id: i64, message: Message) -> Response {
        (StatusCode::CREATED, Self::new(id, message)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CanDelete {
    pub id: i64,
    pub can_delete: bool,
}

#[derive(Debug, Serialize)]
pub struct CanModify {
    pub id: i64,
    pub can_modify: bool,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn lookup_document(State(state): State<AppState>, Path(document): Path<String>) -> ApiResult<Json<CompanyRecord>> {
    Ok(Json(state.lookup.lookup(&document).await?))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/clients", get(clients::list).post(clients::create))
        .route("/api/clients/{id}", get(clients::show).put(clients::update).delete(clients::delete))
        .route("/api/clients/{id}/can-delete", get(clients::can_delete))
        .route("/api/documents/{document}", get(lookup_document))
        .route("/api/consultants", get(catalog::list_consultants).post(catalog::create_consultant))
        .route(
            "/api/consultants/{id}",
            get(catalog::show_consultant)
                .put(catalog::update_consultant)
                .delete(catalog::delete_consultant),
        )
        .route("/api/consultants/{id}/can-delete", get(catalog::consultant_can_delete))
        .route("/api/services", get(catalog::list_services).post(catalog::create_service))
        .route(
            "/api/services/{id}",
            get(catalog::show_service).put(catalog::update_service).delete(catalog::delete_service),
        )
        .route("/api/services/{id}/can-delete", get(catalog::service_can_delete))
        .route("/api/modalities", get(catalog::list_modalities).post(catalog::create_modality))
        .route(
            "/api/modalities/{id}",
            get(catalog::show_modality)
                .put(catalog::update_modality)
                .delete(catalog::delete_modality),
        )
        .route("/api/modalities/{id}/can-delete", get(catalog::modality_can_delete))
        .route("/api/orders", get(orders::list).post(orders::create))
        .route("/api/orders/{id}", get(orders::show).put(orders::update).delete(orders::delete))
        .route("/api/orders/{id}/can-modify", get(orders::can_modify))
        .route("/api/orders/{id}/pdf", get(orders::pdf))
        .route("/api/orders/{id}/send", post(orders::send))
        .route("/api/relations", get(relations::list))
        .route("/api/relations/statistics", get(relations::statistics))
        .route("/api/relations/pdf", get(relations::pdf))
        .route("/api/relations/{id}/invoiced", put(relations::set_invoiced))
        .route("/api/relations/{id}/collected", put(relations::set_collected))
        .route("/api/dashboard", get(relations::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds and serves until Ctrl+C.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    msg_info!(Message::ServerStarting(addr));

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    msg_info!(Message::ServerStopped);
    Ok(())
}
