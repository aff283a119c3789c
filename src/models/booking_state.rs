//! Booking listing categories
//!
//! A category selects a temporal or status slice of the bookings a user made
//! (`by_booker`) or received on their items (`by_item_set`). The whole
//! category to predicate mapping lives in [`BookingState::filter`].

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingFilter, BookingStatus},
        page::PageRequest,
    },
    repository::BookingStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingState {
    #[default]
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub const ALL_STATES: [BookingState; 6] = [
        BookingState::All,
        BookingState::Current,
        BookingState::Past,
        BookingState::Future,
        BookingState::Waiting,
        BookingState::Rejected,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    /// Predicate selected by this category, evaluated against `now`
    pub fn filter(&self, now: DateTime<Utc>) -> BookingFilter {
        let any = BookingFilter::any();
        match self {
            BookingState::All => any,
            BookingState::Current => any.starts_before(now).ends_after(now),
            BookingState::Past => any.ends_before(now),
            BookingState::Future => any.starts_after(now),
            BookingState::Waiting => any.with_status(BookingStatus::Waiting),
            BookingState::Rejected => any.with_status(BookingStatus::Rejected),
        }
    }

    /// Bookings made by `booker_id` in this category
    pub async fn by_booker(
        &self,
        store: &dyn BookingStore,
        booker_id: i64,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        store.query_by_booker(booker_id, self.filter(now), page).await
    }

    /// Bookings on any of `item_ids` in this category
    pub async fn by_item_set(
        &self,
        store: &dyn BookingStore,
        item_ids: &[i64],
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        store.query_by_item_set(item_ids, self.filter(now), page).await
    }
}

impl FromStr for BookingState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_STATES
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| AppError::UnknownFilterState { state: s.to_string() })
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
