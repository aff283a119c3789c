//! Bookings repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingFilter, BookingStatus, NewBooking},
        page::PageRequest,
    },
};

use super::BookingStore;

const BOOKING_COLUMNS: &str = "id, start_date, end_date, status, booker_id, item_id";

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_page(&self, mut builder: QueryBuilder<'_, Postgres>, page: PageRequest) -> AppResult<Vec<Booking>> {
        push_page(&mut builder, page);
        let bookings = builder
            .build_query_as::<Booking>()
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }
}

/// Append one `AND` clause per set filter field
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookingFilter) {
    if let Some(at) = filter.starts_after {
        builder.push(" AND start_date > ").push_bind(at);
    }
    if let Some(at) = filter.starts_before {
        builder.push(" AND start_date < ").push_bind(at);
    }
    if let Some(at) = filter.ends_after {
        builder.push(" AND end_date > ").push_bind(at);
    }
    if let Some(at) = filter.ends_before {
        builder.push(" AND end_date < ").push_bind(at);
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    builder
        .push(" ORDER BY ")
        .push(page.order().sql())
        .push(" LIMIT ")
        .push_bind(page.size())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

#[async_trait]
impl BookingStore for BookingsRepository {
    /// Create a new booking in `WAITING`
    async fn insert(&self, booking: NewBooking) -> AppResult<Booking> {
        let created = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (start_date, end_date, status, booker_id, item_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(BookingStatus::Waiting.as_str())
        .bind(booking.booker_id)
        .bind(booking.item_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Get booking by ID
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn conditional_update_status(
        &self,
        id: i64,
        expected: BookingStatus,
        new: BookingStatus,
    ) -> AppResult<bool> {
        if expected == new {
            return Err(AppError::Internal(format!(
                "Status update on booking {} must change the status",
                id
            )));
        }

        let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3")
            .bind(new.as_str())
            .bind(id)
            .bind(expected.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn query_by_booker(
        &self,
        booker_id: i64,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM bookings WHERE booker_id = ", BOOKING_COLUMNS));
        builder.push_bind(booker_id);
        push_filter(&mut builder, &filter);
        self.fetch_page(builder, page).await
    }

    async fn query_by_item_set(
        &self,
        item_ids: &[i64],
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Vec<Booking>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM bookings WHERE item_id = ANY(", BOOKING_COLUMNS));
        builder.push_bind(item_ids.to_vec()).push(")");
        push_filter(&mut builder, &filter);
        self.fetch_page(builder, page).await
    }

    async fn exists_for_booker_and_item(
        &self,
        booker_id: i64,
        item_id: i64,
        filter: BookingFilter,
    ) -> AppResult<bool> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT EXISTS(SELECT 1 FROM bookings WHERE booker_id = ");
        builder.push_bind(booker_id).push(" AND item_id = ").push_bind(item_id);
        push_filter(&mut builder, &filter);
        builder.push(")");

        let exists: bool = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
