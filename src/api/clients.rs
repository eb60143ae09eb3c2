use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::{AppState, ValidatedJson};
use crate::error::{AppError, AppResult};
use crate::models::{
    ClientQuery, ClientWithRelations, CreateClientRequest, ListResponse, UpdateClientRequest,
};
use crate::services::ClientService;

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
}

async fn list_clients(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ClientQuery>, AppError>,
) -> AppResult<Json<ListResponse<ClientWithRelations>>> {
    let clients = ClientService::new(state.db).list(&query).await?;
    Ok(Json(clients))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientWithRelations>> {
    let client = ClientService::new(state.db).get(id).await?;
    Ok(Json(client))
}

async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateClientRequest>,
) -> AppResult<(StatusCode, Json<ClientWithRelations>)> {
    let client = ClientService::new(state.db).create(request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateClientRequest>,
) -> AppResult<Json<ClientWithRelations>> {
    let client = ClientService::new(state.db).update(id, request).await?;
    Ok(Json(client))
}

async fn delete_client(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    ClientService::new(state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
