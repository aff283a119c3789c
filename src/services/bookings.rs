//! Booking lifecycle service
//!
//! Every mutation passes the same guard: the acting user and the target item
//! are resolved first, then ownership and availability rules are applied, and
//! only then is storage written. Status changes go through a conditional write
//! on the previous status so two concurrent decisions cannot both win.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingFilter, BookingStatus, CreateBooking, ItemBookingSummary},
        booking_state::BookingState,
        item::ItemRef,
        page::{PageRequest, SortOrder},
    },
    repository::{BookingStore, ItemCatalog, UserDirectory},
};

#[derive(Clone)]
pub struct BookingsService {
    users: Arc<dyn UserDirectory>,
    items: Arc<dyn ItemCatalog>,
    bookings: Arc<dyn BookingStore>,
}

impl BookingsService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        items: Arc<dyn ItemCatalog>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self { users, items, bookings }
    }

    /// Request a booking of an item; the booking starts in `WAITING`
    pub async fn create_booking(&self, request: CreateBooking, booker_id: i64) -> AppResult<Booking> {
        tracing::info!("Booking of item id={} requested by user id={}", request.item_id, booker_id);

        request.check_dates(Utc::now())?;
        self.require_user(booker_id).await?;

        let item = self.require_item(request.item_id).await?;
        if !item.available {
            return Err(AppError::ItemUnavailable(item.id));
        }
        if item.is_owned_by(booker_id) {
            return Err(AppError::SelfBookingForbidden);
        }

        let booking = self.bookings.insert(request.into_new_booking(booker_id)).await?;
        tracing::info!("Booking id={} created for item id={}", booking.id, booking.item_id);
        Ok(booking)
    }

    /// Get a booking visible to the booker or the item owner.
    ///
    /// Anyone else gets `BookingNotFound`, so existence is not disclosed.
    pub async fn get_booking(&self, viewer_id: i64, booking_id: i64) -> AppResult<Booking> {
        tracing::debug!("Booking id={} viewed by user id={}", booking_id, viewer_id);
        let (booking, _) = self.load_visible(viewer_id, booking_id).await?;
        Ok(booking)
    }

    /// Approve or reject a waiting booking as the item owner
    pub async fn update_booking_status(&self, owner_id: i64, booking_id: i64, approve: bool) -> AppResult<Booking> {
        tracing::info!(
            "User id={} deciding booking id={} (approved={})",
            owner_id,
            booking_id,
            approve
        );

        let (booking, item) = self.load_visible(owner_id, booking_id).await?;
        if !item.is_owned_by(owner_id) {
            return Err(AppError::NotAuthorized(format!(
                "Only the owner of item {} can decide on booking {}",
                item.id, booking_id
            )));
        }

        let new_status = booking.status.decide(approve)?;
        let updated = self
            .bookings
            .conditional_update_status(booking_id, booking.status, new_status)
            .await?;

        if !updated {
            tracing::warn!("Booking id={} was decided concurrently", booking_id);
            let current = self
                .bookings
                .get_by_id(booking_id)
                .await?
                .map(|b| b.status)
                .ok_or(AppError::BookingNotFound(booking_id))?;
            return Err(AppError::AlreadyDecided(current.to_string()));
        }

        Ok(Booking {
            status: new_status,
            ..booking
        })
    }

    /// Bookings made by a user, filtered by state
    pub async fn list_for_booker(&self, booker_id: i64, state: &str, from: i64, size: i64) -> AppResult<Vec<Booking>> {
        let page = PageRequest::new(from, size)?;
        let state: BookingState = state.parse()?;
        tracing::info!("Listing {} bookings of booker id={}", state, booker_id);

        self.require_user(booker_id).await?;

        let bookings = state
            .by_booker(self.bookings.as_ref(), booker_id, page, Utc::now())
            .await?;
        tracing::debug!("Found {} bookings for booker id={}", bookings.len(), booker_id);
        Ok(bookings)
    }

    /// Bookings on any item listed by a user, filtered by state
    pub async fn list_for_owner(&self, owner_id: i64, state: &str, from: i64, size: i64) -> AppResult<Vec<Booking>> {
        let page = PageRequest::new(from, size)?;
        let state: BookingState = state.parse()?;
        tracing::info!("Listing {} bookings on items of owner id={}", state, owner_id);

        self.require_user(owner_id).await?;

        let item_ids = self.items.list_item_ids_owned_by(owner_id).await?;
        let bookings = state
            .by_item_set(self.bookings.as_ref(), &item_ids, page, Utc::now())
            .await?;
        tracing::debug!(
            "Found {} bookings over {} items of owner id={}",
            bookings.len(),
            item_ids.len(),
            owner_id
        );
        Ok(bookings)
    }

    /// Last started and next upcoming approved bookings of an item.
    ///
    /// Only the owner sees them; other viewers get an empty summary.
    pub async fn item_booking_summary(&self, viewer_id: i64, item_id: i64) -> AppResult<ItemBookingSummary> {
        self.require_user(viewer_id).await?;
        let item = self.require_item(item_id).await?;

        let mut summary = ItemBookingSummary {
            item_id,
            item_name: item.name.clone(),
            ..Default::default()
        };
        if !item.is_owned_by(viewer_id) {
            return Ok(summary);
        }

        let now = Utc::now();
        let approved = BookingFilter::any().with_status(BookingStatus::Approved);

        summary.last_booking = self
            .bookings
            .query_by_item_set(
                &[item_id],
                approved.starts_before(now),
                PageRequest::first(1, SortOrder::StartDesc),
            )
            .await?
            .into_iter()
            .next()
            .map(Into::into);

        summary.next_booking = self
            .bookings
            .query_by_item_set(
                &[item_id],
                approved.starts_after(now),
                PageRequest::first(1, SortOrder::StartAsc),
            )
            .await?
            .into_iter()
            .next()
            .map(Into::into);

        Ok(summary)
    }

    /// Whether the user has an approved booking of the item that already started.
    ///
    /// Comments on an item are only accepted from such users.
    pub async fn has_rented_item(&self, user_id: i64, item_id: i64) -> AppResult<bool> {
        self.require_user(user_id).await?;
        self.require_item(item_id).await?;

        let filter = BookingFilter::any()
            .with_status(BookingStatus::Approved)
            .starts_before(Utc::now());
        self.bookings
            .exists_for_booker_and_item(user_id, item_id, filter)
            .await
    }

    async fn require_user(&self, user_id: i64) -> AppResult<()> {
        if self.users.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::UserNotFound(user_id))
        }
    }

    async fn require_item(&self, item_id: i64) -> AppResult<ItemRef> {
        self.items
            .get_item(item_id)
            .await?
            .ok_or(AppError::ItemNotFound(item_id))
    }

    async fn load_visible(&self, viewer_id: i64, booking_id: i64) -> AppResult<(Booking, ItemRef)> {
        let booking = self
            .bookings
            .get_by_id(booking_id)
            .await?
            .ok_or(AppError::BookingNotFound(booking_id))?;
        let item = self.require_item(booking.item_id).await?;

        if !booking.is_booked_by(viewer_id) && !item.is_owned_by(viewer_id) {
            return Err(AppError::BookingNotFound(booking_id));
        }
        Ok((booking, item))
    }
}
