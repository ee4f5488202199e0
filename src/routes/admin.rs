use crate::{
    AppState, handlers,
    entity::Entity,
    models::{
        Article, HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons,
        UcsbDiningCommonsMenuItem, UcsbOrganization,
    },
    repository::RepositoryState,
};
use axum::{
    Router,
    extract::FromRef,
    routing::{post, put},
};

/// Admin Router Module
///
/// The write side of every entity. `create_router` wraps this router in
/// `auth::require_admin`. The update and delete routes share their path with
/// the read routes; axum merges them per method, so each method keeps its own
/// role layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(write_routes::<Article>())
        .merge(write_routes::<HelpRequest>())
        .merge(write_routes::<MenuItemReview>())
        .merge(write_routes::<UcsbDiningCommonsMenuItem>())
        .merge(write_routes::<UcsbOrganization>())
        .merge(write_routes::<UcsbDate>())
        .merge(write_routes::<UcsbDiningCommons>())
}

/// write_routes
///
/// - `POST {path}/post?<fields>` creates a record.
/// - `PUT {path}?{id_param}=...` replaces a record's fields from a JSON body.
/// - `DELETE {path}?{id_param}=...` removes a record.
fn write_routes<E: Entity>() -> Router<AppState>
where
    RepositoryState<E>: FromRef<AppState>,
{
    Router::new()
        .route(&format!("{}/post", E::PATH), post(handlers::create::<E>))
        .route(
            E::PATH,
            put(handlers::update::<E>).delete(handlers::delete::<E>),
        )
}
