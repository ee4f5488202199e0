use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use std::collections::HashMap;

use crate::{
    entity::Entity,
    errors::ApiError,
    models::GenericMessage,
    repository::RepositoryState,
};

// Every entity is served by the same five handlers. The role checks happen in the
// route-layer middleware (`auth::require_user` / `auth::require_admin`) before any
// of these run.

/// list
///
/// [User Route] `GET {path}/all`. Returns the whole table, unfiltered.
pub async fn list<E: Entity>(
    State(repo): State<RepositoryState<E>>,
) -> Result<Json<Vec<E>>, ApiError> {
    let records = repo.find_all().await?;
    Ok(Json(records))
}

/// get_by_id
///
/// [User Route] `GET {path}?{id_param}=...`. 404 with an `EntityNotFoundException`
/// body when no row has that id.
pub async fn get_by_id<E: Entity>(
    State(repo): State<RepositoryState<E>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<E>, ApiError> {
    let id = id_param::<E>(&params)?;
    let record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found::<E>(&id))?;
    Ok(Json(record))
}

/// create
///
/// [Admin Route] `POST {path}/post?<fields>`. Builds the record from the query
/// string, leaves id generation to the store and echoes the persisted row.
/// Posting the same fields twice creates two rows.
pub async fn create<E: Entity>(
    State(repo): State<RepositoryState<E>>,
    params: Result<Query<E::Params>, QueryRejection>,
) -> Result<Json<E>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let saved = repo.save(E::from_params(params)).await?;
    tracing::info!(entity = E::NAME, id = %saved.id(), "created");
    Ok(Json(saved))
}

/// update
///
/// [Admin Route] `PUT {path}?{id_param}=...` with the new field values as JSON.
/// The stored record keeps its id; every other field is replaced.
///
/// Any key in the body is ignored and may be omitted. The body is parsed before
/// the lookup, so a malformed body is a 400 even for an unknown id.
pub async fn update<E: Entity>(
    State(repo): State<RepositoryState<E>>,
    Query(params): Query<HashMap<String, String>>,
    body: Result<Json<E>, JsonRejection>,
) -> Result<Json<E>, ApiError> {
    let Json(incoming) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let id = id_param::<E>(&params)?;

    let mut record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found::<E>(&id))?;
    record.apply(incoming);

    let saved = repo.save(record).await?;
    tracing::info!(entity = E::NAME, id = %id, "updated");
    Ok(Json(saved))
}

/// delete
///
/// [Admin Route] `DELETE {path}?{id_param}=...`. An unknown id is a 404; otherwise
/// the reply is a `GenericMessage` naming the entity and id.
pub async fn delete<E: Entity>(
    State(repo): State<RepositoryState<E>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<GenericMessage>, ApiError> {
    let id = id_param::<E>(&params)?;
    let record = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found::<E>(&id))?;

    repo.delete(&record).await?;
    tracing::info!(entity = E::NAME, id = %id, "deleted");
    Ok(Json(GenericMessage::new(format!(
        "{} with id {} deleted",
        E::NAME,
        id
    ))))
}

/// Reads and parses the entity's id parameter from the query string.
fn id_param<E: Entity>(params: &HashMap<String, String>) -> Result<E::Id, ApiError> {
    let raw = params
        .get(E::ID_PARAM)
        .ok_or(ApiError::MissingParameter(E::ID_PARAM))?;
    raw.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid value '{}' for parameter '{}'",
            raw,
            E::ID_PARAM
        ))
    })
}
