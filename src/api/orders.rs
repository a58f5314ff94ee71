use super::{Ack, ApiResult, AppState, CanModify};
use crate::db::orders::{OrderFilter, OrderInput, Orders, ServiceOrder};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SendReply {
    pub id: i64,
    pub path: String,
    pub message: String,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paged<ServiceOrder>>> {
    let conn = state.conn.lock();
    Ok(Json(Orders::new(&conn).list(&filter, page)?))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<ServiceOrder>> {
    let conn = state.conn.lock();
    Ok(Json(Orders::new(&conn).get(id)?))
}

pub async fn create(State(state): State<AppState>, Json(input): Json<OrderInput>) -> ApiResult<Response> {
    let conn = state.conn.lock();
    let id = Orders::new(&conn).create(&input)?;
    Ok(Ack::created(id, Message::RecordCreated(Entity::Order, id)))
}

pub async fn update(State(state): State<AppState>, Path(id): Path<i64>, Json(input): Json<OrderInput>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Orders::new(&conn).update(id, &input)?;
    Ok(Ack::new(id, Message::RecordUpdated(Entity::Order, id)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Orders::new(&conn).delete(id)?;
    Ok(Ack::new(id, Message::RecordDeleted(Entity::Order, id)))
}

pub async fn can_modify(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<CanModify>> {
    let conn = state.conn.lock();
    let can_modify = Orders::new(&conn).can_modify(id)?;
    Ok(Json(CanModify { id, can_modify }))
}

/// The order rendered inline; nothing is written to disk.
pub async fn pdf(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    let order = {
        let conn = state.conn.lock();
        Orders::new(&conn).get(id)?
    };
    let bytes = state.renderer.order_pdf(&order)?;
    let disposition = format!("inline; filename=\"os_{}.pdf\"", order.number());

    Ok(([(header::CONTENT_TYPE, "application/pdf".to_string()), (header::CONTENT_DISPOSITION, disposition)], bytes).into_response())
}

pub async fn send(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<SendReply>> {
    let conn = state.conn.lock();
    let orders = Orders::new(&conn);
    let path = orders.send(id, &state.renderer)?;
    let email = orders.get(id)?.client_order_email.unwrap_or_default();
    tracing::info!(order = id, path = %path.display(), "service order sent");

    Ok(Json(SendReply {
        id,
        path: path.display().to_string(),
        message: Message::OrderSent(id, email).to_string(),
    }))
}
