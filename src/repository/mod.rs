//! Repository layer: collaborator ports and their PostgreSQL implementations

pub mod bookings;
pub mod items;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingFilter, BookingStatus, NewBooking},
        item::ItemRef,
        page::PageRequest,
    },
};

/// Existence checks against user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: i64) -> AppResult<bool>;
}

/// Read access to listed items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn get_item(&self, id: i64) -> AppResult<Option<ItemRef>>;

    async fn list_item_ids_owned_by(&self, owner_id: i64) -> AppResult<Vec<i64>>;
}

/// Booking persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: NewBooking) -> AppResult<Booking>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Booking>>;

    /// Set `new` only if the stored status is still `expected`.
    /// Returns whether the row was updated.
    async fn conditional_update_status(
        &self,
        id: i64,
        expected: BookingStatus,
        new: BookingStatus,
    ) -> AppResult<bool>;

    async fn query_by_booker(
        &self,
        booker_id: i64,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Vec<Booking>>;

    async fn query_by_item_set(
        &self,
        item_ids: &[i64],
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Vec<Booking>>;

    async fn exists_for_booker_and_item(
        &self,
        booker_id: i64,
        item_id: i64,
        filter: BookingFilter,
    ) -> AppResult<bool>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub items: items::ItemsRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            items: items::ItemsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
