use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod entity;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod repository;

// Routing is segregated by the role each group of endpoints requires.
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use entity::Entity;
pub use errors::ApiError;
pub use repository::{Repositories, RepositoryState, UserRepositoryState};

use models::{
    Article, HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons,
    UcsbDiningCommonsMenuItem, UcsbOrganization,
};

/// AppState
///
/// The single shared container for every repository plus the loaded configuration.
/// Cloning is cheap: each repository is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Identity lookups for the auth layer.
    pub users: UserRepositoryState,
    /// One repository per entity.
    pub repos: Repositories,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for UserRepositoryState {
    fn from_ref(app_state: &AppState) -> UserRepositoryState {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

// Lets `State<RepositoryState<E>>` resolve to the matching field of `Repositories`.
macro_rules! repository_from_ref {
    ($($entity:ty => $field:ident),* $(,)?) => {
        $(
            impl FromRef<AppState> for RepositoryState<$entity> {
                fn from_ref(app_state: &AppState) -> RepositoryState<$entity> {
                    app_state.repos.$field.clone()
                }
            }
        )*
    };
}

repository_from_ref! {
    Article => articles,
    HelpRequest => help_requests,
    MenuItemReview => menu_item_reviews,
    UcsbDiningCommonsMenuItem => menu_items,
    UcsbOrganization => organizations,
    UcsbDate => dates,
    UcsbDiningCommons => dining_commons,
}

/// create_router
///
/// Assembles the routing structure, applies the role middleware per route group
/// and the global observability layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::api_doc()))
        .merge(public::public_routes())
        // Read endpoints: USER role.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_user,
            )),
        )
        // Write endpoints: ADMIN role. `route_layer` runs before the merge, so the
        // paths shared with the read endpoints keep a separate check per method.
        .merge(
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_admin,
            )),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the `x-request-id` set by the layer above
/// so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
