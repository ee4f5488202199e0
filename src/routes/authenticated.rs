use crate::{
    AppState, handlers,
    entity::Entity,
    models::{
        Article, HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons,
        UcsbDiningCommonsMenuItem, UcsbOrganization,
    },
    repository::RepositoryState,
};
use axum::{Router, extract::FromRef, routing::get};

/// Authenticated Router Module
///
/// The read side of every entity. `create_router` wraps this router in
/// `auth::require_user`, so every handler here runs for USER callers only.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        .merge(read_routes::<Article>())
        .merge(read_routes::<HelpRequest>())
        .merge(read_routes::<MenuItemReview>())
        .merge(read_routes::<UcsbDiningCommonsMenuItem>())
        .merge(read_routes::<UcsbOrganization>())
        .merge(read_routes::<UcsbDate>())
        .merge(read_routes::<UcsbDiningCommons>())
}

/// read_routes
///
/// - `GET {path}/all` lists the table.
/// - `GET {path}?{id_param}=...` fetches one record.
fn read_routes<E: Entity>() -> Router<AppState>
where
    RepositoryState<E>: FromRef<AppState>,
{
    Router::new()
        .route(&format!("{}/all", E::PATH), get(handlers::list::<E>))
        .route(E::PATH, get(handlers::get_by_id::<E>))
}
