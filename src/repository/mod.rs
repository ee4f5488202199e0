use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    entity::Entity,
    models::{
        Article, HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons,
        UcsbDiningCommonsMenuItem, UcsbOrganization, User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::{CallCounts, InMemoryRepository, InMemoryUserRepository};
pub use postgres::{PgEntity, PostgresRepository, PostgresUserRepository};

/// RepositoryError
///
/// A failure reported by the underlying store. Missing rows are not errors;
/// lookups return `Ok(None)` for those.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// CrudRepository
///
/// The persistence contract shared by every entity. Handlers are written against
/// this trait only, so the backing store (Postgres, in-memory) can be swapped
/// without touching them.
///
/// **Send + Sync + async_trait** make `Arc<dyn CrudRepository<E>>` shareable
/// across Axum's request tasks.
#[async_trait]
pub trait CrudRepository<E: Entity>: Send + Sync {
    /// Full table contents in the order the store reports them.
    async fn find_all(&self) -> Result<Vec<E>, RepositoryError>;

    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, RepositoryError>;

    /// Inserts the record when it still needs a generated id, otherwise
    /// inserts or overwrites the row with the same id. Returns the stored row.
    async fn save(&self, entity: E) -> Result<E, RepositoryError>;

    async fn delete(&self, entity: &E) -> Result<(), RepositoryError>;
}

/// RepositoryState
///
/// The shared handle to one entity's repository, pulled from `AppState` via `FromRef`.
pub type RepositoryState<E> = Arc<dyn CrudRepository<E>>;

/// UserRepository
///
/// Read access to the identities the auth layer resolves callers against.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
}

pub type UserRepositoryState = Arc<dyn UserRepository>;

/// Repositories
///
/// One repository per entity. Bundled so `AppState` stays a single value.
#[derive(Clone)]
pub struct Repositories {
    pub articles: RepositoryState<Article>,
    pub help_requests: RepositoryState<HelpRequest>,
    pub menu_item_reviews: RepositoryState<MenuItemReview>,
    pub menu_items: RepositoryState<UcsbDiningCommonsMenuItem>,
    pub organizations: RepositoryState<UcsbOrganization>,
    pub dates: RepositoryState<UcsbDate>,
    pub dining_commons: RepositoryState<UcsbDiningCommons>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one connection pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            articles: Arc::new(PostgresRepository::<Article>::new(pool.clone())),
            help_requests: Arc::new(PostgresRepository::<HelpRequest>::new(pool.clone())),
            menu_item_reviews: Arc::new(PostgresRepository::<MenuItemReview>::new(pool.clone())),
            menu_items: Arc::new(PostgresRepository::<UcsbDiningCommonsMenuItem>::new(
                pool.clone(),
            )),
            organizations: Arc::new(PostgresRepository::<UcsbOrganization>::new(pool.clone())),
            dates: Arc::new(PostgresRepository::<UcsbDate>::new(pool.clone())),
            dining_commons: Arc::new(PostgresRepository::<UcsbDiningCommons>::new(pool)),
        }
    }

    /// Empty in-memory repositories, used by tests.
    pub fn in_memory() -> Self {
        Self {
            articles: Arc::new(InMemoryRepository::<Article>::new()),
            help_requests: Arc::new(InMemoryRepository::<HelpRequest>::new()),
            menu_item_reviews: Arc::new(InMemoryRepository::<MenuItemReview>::new()),
            menu_items: Arc::new(InMemoryRepository::<UcsbDiningCommonsMenuItem>::new()),
            organizations: Arc::new(InMemoryRepository::<UcsbOrganization>::new()),
            dates: Arc::new(InMemoryRepository::<UcsbDate>::new()),
            dining_commons: Arc::new(InMemoryRepository::<UcsbDiningCommons>::new()),
        }
    }
}
