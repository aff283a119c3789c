//! Booking model, status state machine and booking filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Booking status. `Waiting` is the only initial value; the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    /// Database and wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Approved | BookingStatus::Rejected)
    }

    /// Owner decision on a waiting booking.
    ///
    /// Returns the status to move to, or `AlreadyDecided` when the booking has
    /// left `Waiting`.
    pub fn decide(self, approve: bool) -> AppResult<BookingStatus> {
        if self.is_terminal() {
            return Err(AppError::AlreadyDecided(self.as_str().to_string()));
        }
        Ok(if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        })
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            other => Err(AppError::Internal(format!("Unknown booking status in storage: {}", other))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub booker_id: i64,
    pub item_id: i64,
}

impl Booking {
    /// Whether the given user takes part in this booking as booker
    pub fn is_booked_by(&self, user_id: i64) -> bool {
        self.booker_id == user_id
    }
}

/// Booking to be inserted; always starts in `Waiting`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub booker_id: i64,
    pub item_id: i64,
}

/// Create booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    /// Item to book
    #[serde(rename = "itemId")]
    #[validate(range(min = 1, message = "Item id must be positive"))]
    pub item_id: i64,
    /// Rental start (ISO 8601)
    #[serde(rename = "start")]
    pub start_date: DateTime<Utc>,
    /// Rental end (ISO 8601)
    #[serde(rename = "end")]
    pub end_date: DateTime<Utc>,
}

impl CreateBooking {
    /// Check the rental window against the creation instant.
    ///
    /// Both ends must be strictly in the future and `start < end`.
    pub fn check_dates(&self, now: DateTime<Utc>) -> AppResult<()> {
        if self.start_date <= now {
            return Err(AppError::InvalidBookingDates("start must be in the future".to_string()));
        }
        if self.end_date <= now {
            return Err(AppError::InvalidBookingDates("end must be in the future".to_string()));
        }
        if self.start_date >= self.end_date {
            return Err(AppError::InvalidBookingDates("start must be before end".to_string()));
        }
        Ok(())
    }

    pub fn into_new_booking(self, booker_id: i64) -> NewBooking {
        NewBooking {
            start_date: self.start_date,
            end_date: self.end_date,
            booker_id,
            item_id: self.item_id,
        }
    }
}

/// Conjunction of optional conditions over a booking.
///
/// Each set field narrows the result; the default filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub starts_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
    pub ends_after: Option<DateTime<Utc>>,
    pub ends_before: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn starts_after(mut self, at: DateTime<Utc>) -> Self {
        self.starts_after = Some(at);
        self
    }

    pub fn starts_before(mut self, at: DateTime<Utc>) -> Self {
        self.starts_before = Some(at);
        self
    }

    pub fn ends_after(mut self, at: DateTime<Utc>) -> Self {
        self.ends_after = Some(at);
        self
    }

    pub fn ends_before(mut self, at: DateTime<Utc>) -> Self {
        self.ends_before = Some(at);
        self
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Evaluate the filter against a single booking. All bounds are strict.
    pub fn matches(&self, booking: &Booking) -> bool {
        self.starts_after.map_or(true, |at| booking.start_date > at)
            && self.starts_before.map_or(true, |at| booking.start_date < at)
            && self.ends_after.map_or(true, |at| booking.end_date > at)
            && self.ends_before.map_or(true, |at| booking.end_date < at)
            && self.status.map_or(true, |status| booking.status == status)
    }
}

/// Short booking reference shown on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ItemBooking {
    pub id: i64,
    #[serde(rename = "bookerId")]
    pub booker_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Booking> for ItemBooking {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker_id,
            start: booking.start_date,
            end: booking.end_date,
        }
    }
}

/// Last and next approved bookings of an item, visible to its owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ItemBookingSummary {
    #[serde(rename = "itemId")]
    pub item_id: i64,
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "lastBooking")]
    pub last_booking: Option<ItemBooking>,
    #[serde(rename = "nextBooking")]
    pub next_booking: Option<ItemBooking>,
}
