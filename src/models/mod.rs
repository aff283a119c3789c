//! Data models for ShareIt

pub mod booking;
pub mod booking_state;
pub mod item;
pub mod page;

// Re-export commonly used types
pub use booking::{Booking, BookingFilter, BookingStatus, CreateBooking, ItemBookingSummary, NewBooking};
pub use booking_state::BookingState;
pub use item::ItemRef;
pub use page::{PageRequest, SortOrder};
