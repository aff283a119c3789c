//! In-memory collaborators for unit tests.
//!
//! Only compiled for tests. Mirrors the PostgreSQL repositories closely enough
//! to exercise filtering, ordering, pagination and the conditional status write.

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{
        booking::{Booking, BookingFilter, BookingStatus, NewBooking},
        item::ItemRef,
        page::{PageRequest, SortOrder},
    },
    repository::{BookingStore, ItemCatalog, UserDirectory},
    services::bookings::BookingsService,
};

#[derive(Default)]
struct Inner {
    users: HashSet<i64>,
    items: BTreeMap<i64, ItemRef>,
    bookings: BTreeMap<i64, Booking>,
    next_booking_id: i64,
}

/// Shared in-memory users, items and bookings
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: i64) {
        self.inner.lock().unwrap().users.insert(id);
    }

    pub fn add_item(&self, id: i64, owner_id: i64, available: bool) {
        self.inner.lock().unwrap().items.insert(
            id,
            ItemRef {
                id,
                owner_id,
                name: format!("item-{}", id),
                available,
            },
        );
    }

    /// Insert a booking directly, bypassing creation-time date checks
    pub fn seed_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        let mut inner = self.inner.lock().unwrap();
        inner.next_booking_id += 1;
        let booking = Booking {
            id: inner.next_booking_id,
            start_date,
            end_date,
            status,
            booker_id,
            item_id,
        };
        inner.bookings.insert(booking.id, booking.clone());
        booking
    }

    pub fn status_of(&self, id: i64) -> Option<BookingStatus> {
        self.inner.lock().unwrap().bookings.get(&id).map(|b| b.status)
    }

    pub fn booking_count(&self) -> usize {
        self.inner.lock().unwrap().bookings.len()
    }

    /// Service wired entirely on this store
    pub fn service(&self) -> BookingsService {
        BookingsService::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    fn select<F>(&self, subject: F, filter: BookingFilter, page: PageRequest) -> Vec<Booking>
    where
        F: Fn(&Booking) -> bool,
    {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| subject(b) && filter.matches(b))
            .cloned()
            .collect();

        matching.sort_by(|a, b| match page.order() {
            SortOrder::StartDesc => b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)),
            SortOrder::StartAsc => a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)),
        });

        matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .collect()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn user_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.lock().unwrap().users.contains(&id))
    }
}

#[async_trait]
impl ItemCatalog for MemoryStore {
    async fn get_item(&self, id: i64) -> AppResult<Option<ItemRef>> {
        Ok(self.inner.lock().unwrap().items.get(&id).cloned())
    }

    async fn list_item_ids_owned_by(&self, owner_id: i64) -> AppResult<Vec<i64>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .items
            .values()
            .filter(|item| item.owner_id == owner_id)
            .map(|item| item.id)
            .collect())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert(&self, booking: NewBooking) -> AppResult<Booking> {
        Ok(self.seed_booking(
            booking.booker_id,
            booking.item_id,
            booking.start_date,
            booking.end_date,
            BookingStatus::Waiting,
        ))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        Ok(self.inner.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn conditional_update_status(
        &self,
        id: i64,
        expected: BookingStatus,
        new: BookingStatus,
    ) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.bookings.get_mut(&id) {
            Some(booking) if booking.status == expected => {
                booking.status = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn query_by_booker(
        &self,
        booker_id: i64,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Vec<Booking>> {
        Ok(self.select(|b| b.booker_id == booker_id, filter, page))
    }

    async fn query_by_item_set(
        &self,
        item_ids: &[i64],
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Vec<Booking>> {
        Ok(self.select(|b| item_ids.contains(&b.item_id), filter, page))
    }

    async fn exists_for_booker_and_item(
        &self,
        booker_id: i64,
        item_id: i64,
        filter: BookingFilter,
    ) -> AppResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookings
            .values()
            .any(|b| b.booker_id == booker_id && b.item_id == item_id && filter.matches(b)))
    }
}
