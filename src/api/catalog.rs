//! Consultants, services and modalities.

use super::{Ack, ApiResult, AppState, CanDelete};
use crate::db::consultants::{Consultant, ConsultantFilter, Consultants};
use crate::db::modalities::{Modalities, Modality, ModalityFilter};
use crate::db::services::{Service, ServiceFilter, Services};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

// === CONSULTANTS ===

pub async fn list_consultants(
    State(state): State<AppState>,
    Query(filter): Query<ConsultantFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paged<Consultant>>> {
    let conn = state.conn.lock();
    Ok(Json(Consultants::new(&conn).list(&filter, page)?))
}

pub async fn show_consultant(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Consultant>> {
    let conn = state.conn.lock();
    Ok(Json(Consultants::new(&conn).get(id)?))
}

pub async fn create_consultant(State(state): State<AppState>, Json(consultant): Json<Consultant>) -> ApiResult<Response> {
    let conn = state.conn.lock();
    let id = Consultants::new(&conn).create(&consultant)?;
    Ok(Ack::created(id, Message::RecordCreated(Entity::Consultant, id)))
}

pub async fn update_consultant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(consultant): Json<Consultant>,
) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Consultants::new(&conn).update(id, &consultant)?;
    Ok(Ack::new(id, Message::RecordUpdated(Entity::Consultant, id)))
}

pub async fn delete_consultant(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Consultants::new(&conn).delete(id)?;
    Ok(Ack::new(id, Message::RecordDeleted(Entity::Consultant, id)))
}

pub async fn consultant_can_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<CanDelete>> {
    let conn = state.conn.lock();
    let can_delete = Consultants::new(&conn).can_delete(id)?;
    Ok(Json(CanDelete { id, can_delete }))
}

// === SERVICES ===

pub async fn list_services(
    State(state): State<AppState>,
    Query(filter): Query<ServiceFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paged<Service>>> {
    let conn = state.conn.lock();
    Ok(Json(Services::new(&conn).list(&filter, page)?))
}

pub async fn show_service(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Service>> {
    let conn = state.conn.lock();
    Ok(Json(Services::new(&conn).get(id)?))
}

pub async fn create_service(State(state): State<AppState>, Json(service): Json<Service>) -> ApiResult<Response> {
    let conn = state.conn.lock();
    let id = Services::new(&conn).create(&service)?;
    Ok(Ack::created(id, Message::RecordCreated(Entity::Service, id)))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(service): Json<Service>,
) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Services::new(&conn).update(id, &service)?;
    Ok(Ack::new(id, Message::RecordUpdated(Entity::Service, id)))
}

pub async fn delete_service(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Services::new(&conn).delete(id)?;
    Ok(Ack::new(id, Message::RecordDeleted(Entity::Service, id)))
}

pub async fn service_can_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<CanDelete>> {
    let conn = state.conn.lock();
    let can_delete = Services::new(&conn).can_delete(id)?;
    Ok(Json(CanDelete { id, can_delete }))
}

// === MODALITIES ===

pub async fn list_modalities(
    State(state): State<AppState>,
    Query(filter): Query<ModalityFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paged<Modality>>> {
    let conn = state.conn.lock();
    Ok(Json(Modalities::new(&conn).list(&filter, page)?))
}

pub async fn show_modality(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Modality>> {
    let conn = state.conn.lock();
    Ok(Json(Modalities::new(&conn).get(id)?))
}

pub async fn create_modality(State(state): State<AppState>, Json(modality): Json<Modality>) -> ApiResult<Response> {
    let conn = state.conn.lock();
    let id = Modalities::new(&conn).create(&modality)?;
    Ok(Ack::created(id, Message::RecordCreated(Entity::Modality, id)))
}

pub async fn update_modality(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(modality): Json<Modality>,
) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Modalities::new(&conn).update(id, &modality)?;
    Ok(Ack::new(id, Message::RecordUpdated(Entity::Modality, id)))
}

pub async fn delete_modality(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Modalities::new(&conn).delete(id)?;
    Ok(Ack::new(id, Message::RecordDeleted(Entity::Modality, id)))
}

pub async fn modality_can_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<CanDelete>> {
    let conn = state.conn.lock();
    let can_delete = Modalities::new(&conn).can_delete(id)?;
    Ok(Json(CanDelete { id, can_delete }))
}
