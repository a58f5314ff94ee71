//! Order relations, their statistics and the dashboard.

use super::{Ack, ApiResult, AppState};
use crate::db::dashboard::{Dashboard, DashboardStats};
use crate::db::relations::{RelationFilter, RelationList, Relations};
use crate::libs::messages::Message;
use crate::libs::pagination::Pagination;
use crate::libs::statistics::StatisticsSummary;
use crate::libs::status::Flag;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::Deserialize;

/// Body of the flag updates: `{"value": "S"}`.
#[derive(Debug, Deserialize)]
pub struct FlagBody {
    pub value: String,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<RelationFilter>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<RelationList>> {
    let conn = state.conn.lock();
    Ok(Json(Relations::new(&conn).list(&filter, page)?))
}

pub async fn statistics(State(state): State<AppState>, Query(filter): Query<RelationFilter>) -> Json<StatisticsSummary> {
    let conn = state.conn.lock();
    Json(Relations::new(&conn).statistics(&filter))
}

pub async fn set_invoiced(State(state): State<AppState>, Path(id): Path<i64>, Json(body): Json<FlagBody>) -> ApiResult<Json<Ack>> {
    let flag: Flag = body.value.parse()?;
    let conn = state.conn.lock();
    Relations::new(&conn).set_invoiced(id, flag)?;
    Ok(Ack::new(id, Message::RelationInvoicedSet(id, flag)))
}

pub async fn set_collected(State(state): State<AppState>, Path(id): Path<i64>, Json(body): Json<FlagBody>) -> ApiResult<Json<Ack>> {
    let flag: Flag = body.value.parse()?;
    let conn = state.conn.lock();
    Relations::new(&conn).set_collected(id, flag)?;
    Ok(Ack::new(id, Message::RelationCollectedSet(id, flag)))
}

/// Every row matching the filter, rendered as the landscape report.
pub async fn pdf(State(state): State<AppState>, Query(filter): Query<RelationFilter>) -> ApiResult<Response> {
    let (rows, summary, applied) = {
        let conn = state.conn.lock();
        let relations = Relations::new(&conn);
        (relations.all(&filter)?, relations.statistics(&filter), relations.applied(&filter)?)
    };
    let bytes = state.renderer.relation_pdf(&rows, &summary, &applied)?;
    let disposition = format!("inline; filename=\"relacao_{}.pdf\"", Local::now().format("%Y%m%d_%H%M%S"));

    Ok(([(header::CONTENT_TYPE, "application/pdf".to_string()), (header::CONTENT_DISPOSITION, disposition)], bytes).into_response())
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let conn = state.conn.lock();
    Ok(Json(Dashboard::new(&conn).stats()?))
}
