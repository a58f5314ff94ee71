use super::{Ack, ApiResult, AppState, CanDelete};
use crate::db::clients::{Client, ClientFilter, Clients};
use crate::libs::messages::{Entity, Message};
use crate::libs::pagination::{Paged, Pagination};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ClientFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paged<Client>>> {
    let conn = state.conn.lock();
    Ok(Json(Clients::new(&conn).list(&filter, page)?))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Client>> {
    let conn = state.conn.lock();
    Ok(Json(Clients::new(&conn).get(id)?))
}

pub async fn create(State(state): State<AppState>, Json(client): Json<Client>) -> ApiResult<Response> {
    let conn = state.conn.lock();
    let id = Clients::new(&conn).create(&client)?;
    Ok(Ack::created(id, Message::RecordCreated(Entity::Client, id)))
}

pub async fn update(State(state): State<AppState>, Path(id): Path<i64>, Json(client): Json<Client>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Clients::new(&conn).update(id, &client)?;
    Ok(Ack::new(id, Message::RecordUpdated(Entity::Client, id)))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Ack>> {
    let conn = state.conn.lock();
    Clients::new(&conn).delete(id)?;
    Ok(Ack::new(id, Message::RecordDeleted(Entity::Client, id)))
}

pub async fn can_delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<CanDelete>> {
    let conn = state.conn.lock();
    let can_delete = Clients::new(&conn).can_delete(id)?;
    Ok(Json(CanDelete { id, can_delete }))
}
