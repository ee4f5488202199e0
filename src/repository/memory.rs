use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicI64, AtomicUsize, Ordering},
    },
};
use uuid::Uuid;

use super::{CrudRepository, RepositoryError, UserRepository};
use crate::{entity::Entity, models::User};

/// CallCounts
///
/// A snapshot of how many times each repository operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub find_all: usize,
    pub find_by_id: usize,
    pub save: usize,
    pub delete: usize,
}

#[derive(Default)]
struct Counters {
    find_all: AtomicUsize,
    find_by_id: AtomicUsize,
    save: AtomicUsize,
    delete: AtomicUsize,
}

/// InMemoryRepository
///
/// A `CrudRepository` holding records in insertion order, with counters on every
/// operation. This lets handler and router tests run without a database and
/// assert exactly which store calls a request made.
pub struct InMemoryRepository<E: Entity> {
    records: Mutex<Vec<E>>,
    next_id: AtomicI64,
    counters: Counters,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds the store. Generated ids continue after the largest seeded id.
    pub fn with_records(records: Vec<E>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|record| record.generated_id())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            records: Mutex::new(records),
            next_id: AtomicI64::new(next_id),
            counters: Counters::default(),
        }
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            find_all: self.counters.find_all.load(Ordering::SeqCst),
            find_by_id: self.counters.find_by_id.load(Ordering::SeqCst),
            save: self.counters.save.load(Ordering::SeqCst),
            delete: self.counters.delete.load(Ordering::SeqCst),
        }
    }

    /// Current contents, without counting as a `find_all` call.
    pub fn snapshot(&self) -> Vec<E> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<E>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<E: Entity> CrudRepository<E> for InMemoryRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        self.counters.find_all.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, RepositoryError> {
        self.counters.find_by_id.fetch_add(1, Ordering::SeqCst);
        let found = self.lock().iter().find(|record| record.id() == *id).cloned();
        Ok(found)
    }

    async fn save(&self, mut entity: E) -> Result<E, RepositoryError> {
        self.counters.save.fetch_add(1, Ordering::SeqCst);
        if entity.needs_generated_id() {
            entity.assign_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        }

        let mut records = self.lock();
        let id = entity.id();
        match records.iter_mut().find(|record| record.id() == id) {
            Some(existing) => *existing = entity.clone(),
            None => records.push(entity.clone()),
        }
        Ok(entity)
    }

    async fn delete(&self, entity: &E) -> Result<(), RepositoryError> {
        self.counters.delete.fetch_add(1, Ordering::SeqCst);
        let id = entity.id();
        self.lock().retain(|record| record.id() != id);
        Ok(())
    }
}

/// InMemoryUserRepository
///
/// Fixed set of identities for tests and local runs without the identity layer.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: HashMap<Uuid, User>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(&id).cloned())
    }
}
