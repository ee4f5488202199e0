use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, postgres::PgRow, query_builder::Separated};
use std::marker::PhantomData;
use uuid::Uuid;

use super::{CrudRepository, RepositoryError, UserRepository};
use crate::{
    entity::Entity,
    models::{
        Article, HelpRequest, MenuItemReview, UcsbDate, UcsbDiningCommons,
        UcsbDiningCommonsMenuItem, UcsbOrganization, User,
    },
};

/// PgEntity
///
/// Describes how an entity maps onto its Postgres table. `COLUMNS` lists the
/// non-identifier columns in the same order `push_values` binds them.
pub trait PgEntity: Entity + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Column `find_all` sorts by. `None` leaves the order to the store.
    const ORDER_BY: Option<&'static str>;

    fn push_id<'args>(id: &Self::Id, builder: &mut QueryBuilder<'args, Postgres>);

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>);
}

/// PostgresRepository
///
/// The `CrudRepository` implementation backed by PostgreSQL. All statements are
/// assembled with `QueryBuilder` and bound parameters, so no caller-supplied
/// value is ever spliced into SQL text.
pub struct PostgresRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PostgresRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

fn select_list<E: PgEntity>() -> String {
    let mut columns = vec![E::ID_COLUMN];
    columns.extend_from_slice(E::COLUMNS);
    columns.join(", ")
}

#[async_trait]
impl<E: PgEntity> CrudRepository<E> for PostgresRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(select_list::<E>()).push(" FROM ").push(E::TABLE);
        if let Some(column) = E::ORDER_BY {
            builder.push(" ORDER BY ").push(column);
        }
        tracing::debug!(sql = builder.sql(), "find_all");

        let rows = builder.build_query_as::<E>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder
            .push(select_list::<E>())
            .push(" FROM ")
            .push(E::TABLE)
            .push(" WHERE ")
            .push(E::ID_COLUMN)
            .push(" = ");
        E::push_id(id, &mut builder);

        let row = builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// save
    ///
    /// A record still waiting for a generated id is inserted without one and the
    /// store assigns it. Any other record is written with its id and
    /// `ON CONFLICT DO UPDATE`, so saving an existing row overwrites it.
    async fn save(&self, entity: E) -> Result<E, RepositoryError> {
        let generated = entity.needs_generated_id();

        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO ");
        builder.push(E::TABLE).push(" (");
        if !generated {
            builder.push(E::ID_COLUMN).push(", ");
        }
        builder.push(E::COLUMNS.join(", ")).push(") VALUES (");
        if !generated {
            E::push_id(&entity.id(), &mut builder);
            builder.push(", ");
        }
        {
            let mut values = builder.separated(", ");
            entity.push_values(&mut values);
        }
        builder.push(")");

        if !generated {
            let assignments = E::COLUMNS
                .iter()
                .map(|column| format!("{column} = EXCLUDED.{column}"))
                .collect::<Vec<_>>()
                .join(", ");
            builder
                .push(" ON CONFLICT (")
                .push(E::ID_COLUMN)
                .push(") DO UPDATE SET ")
                .push(assignments);
        }
        builder.push(" RETURNING ").push(select_list::<E>());
        tracing::debug!(sql = builder.sql(), "save");

        let saved = builder.build_query_as::<E>().fetch_one(&self.pool).await?;
        Ok(saved)
    }

    async fn delete(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("DELETE FROM ");
        builder
            .push(E::TABLE)
            .push(" WHERE ")
            .push(E::ID_COLUMN)
            .push(" = ");
        E::push_id(&entity.id(), &mut builder);

        builder.build().execute(&self.pool).await?;
        Ok(())
    }
}

// --- Table Mappings ---

impl PgEntity for Article {
    const TABLE: &'static str = "articles";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["title", "url", "explanation", "email", "date_added"];
    const ORDER_BY: Option<&'static str> = Some("id");

    fn push_id<'args>(id: &i64, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(*id);
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.title.clone())
            .push_bind(self.url.clone())
            .push_bind(self.explanation.clone())
            .push_bind(self.email.clone())
            .push_bind(self.date_added);
    }
}

impl PgEntity for HelpRequest {
    const TABLE: &'static str = "help_requests";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "requester_email",
        "team_id",
        "table_or_breakout_room",
        "request_time",
        "explanation",
        "solved",
    ];
    const ORDER_BY: Option<&'static str> = Some("id");

    fn push_id<'args>(id: &i64, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(*id);
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.requester_email.clone())
            .push_bind(self.team_id.clone())
            .push_bind(self.table_or_breakout_room.clone())
            .push_bind(self.request_time)
            .push_bind(self.explanation.clone())
            .push_bind(self.solved);
    }
}

impl PgEntity for MenuItemReview {
    const TABLE: &'static str = "menu_item_reviews";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] =
        &["item_id", "reviewer_email", "stars", "date_reviewed", "comments"];
    const ORDER_BY: Option<&'static str> = Some("id");

    fn push_id<'args>(id: &i64, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(*id);
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.item_id)
            .push_bind(self.reviewer_email.clone())
            .push_bind(self.stars)
            .push_bind(self.date_reviewed)
            .push_bind(self.comments.clone());
    }
}

impl PgEntity for UcsbDiningCommonsMenuItem {
    const TABLE: &'static str = "ucsb_dining_commons_menu_items";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["dining_commons_code", "name", "station"];
    const ORDER_BY: Option<&'static str> = Some("id");

    fn push_id<'args>(id: &i64, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(*id);
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.dining_commons_code.clone())
            .push_bind(self.name.clone())
            .push_bind(self.station.clone());
    }
}

impl PgEntity for UcsbOrganization {
    const TABLE: &'static str = "ucsb_organizations";
    const ID_COLUMN: &'static str = "org_code";
    const COLUMNS: &'static [&'static str] =
        &["org_translation_short", "org_translation", "inactive"];
    const ORDER_BY: Option<&'static str> = None;

    fn push_id<'args>(id: &String, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(id.clone());
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.org_translation_short.clone())
            .push_bind(self.org_translation.clone())
            .push_bind(self.inactive);
    }
}

impl PgEntity for UcsbDate {
    const TABLE: &'static str = "ucsb_dates";
    const ID_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["quarter_yyyyq", "name", "local_date_time"];
    const ORDER_BY: Option<&'static str> = Some("id");

    fn push_id<'args>(id: &i64, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(*id);
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.quarter_yyyyq.clone())
            .push_bind(self.name.clone())
            .push_bind(self.local_date_time);
    }
}

impl PgEntity for UcsbDiningCommons {
    const TABLE: &'static str = "ucsb_dining_commons";
    const ID_COLUMN: &'static str = "code";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "has_sack_meal",
        "has_take_out_meal",
        "has_dining_cam",
        "latitude",
        "longitude",
    ];
    const ORDER_BY: Option<&'static str> = None;

    fn push_id<'args>(id: &String, builder: &mut QueryBuilder<'args, Postgres>) {
        builder.push_bind(id.clone());
    }

    fn push_values<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.name.clone())
            .push_bind(self.has_sack_meal)
            .push_bind(self.has_take_out_meal)
            .push_bind(self.has_dining_cam)
            .push_bind(self.latitude)
            .push_bind(self.longitude);
    }
}

/// PostgresUserRepository
///
/// Reads caller identities from the `users` table.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, admin FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
