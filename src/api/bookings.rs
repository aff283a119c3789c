//! Booking endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::booking::{Booking, BookingStatus, CreateBooking},
};

use super::{ApiJson, ApiPath, ApiQuery, SharerUser};

/// Listing parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookingListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (default ALL)
    pub state: Option<String>,
    /// Offset of the first element (default 0)
    pub from: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

/// Owner decision
#[derive(Debug, Deserialize, IntoParams)]
pub struct ApprovalQuery {
    pub approved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookerRef {
    pub id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookedItemRef {
    pub id: i64,
}

/// Booking as returned to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker: BookerRef,
    pub item: BookedItemRef,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            start: booking.start_date,
            end: booking.end_date,
            status: booking.status,
            booker: BookerRef { id: booking.booker_id },
            item: BookedItemRef { id: booking.item_id },
        }
    }
}

fn into_responses(bookings: Vec<Booking>) -> Vec<BookingResponse> {
    bookings.into_iter().map(BookingResponse::from).collect()
}

/// Request a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Booker id")),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created in WAITING", body = BookingResponse),
        (status = 400, description = "Invalid dates, unavailable item or own item"),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerUser(booker_id): SharerUser,
    ApiJson(request): ApiJson<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    request.validate()?;

    let booking = state.services.bookings.create_booking(request, booker_id).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Get a booking as its booker or the item owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Viewer id")
    ),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 404, description = "Booking not found or not visible")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerUser(viewer_id): SharerUser,
    ApiPath(booking_id): ApiPath<i64>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.get_booking(viewer_id, booking_id).await?;
    Ok(Json(booking.into()))
}

/// Approve or reject a waiting booking
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner id"),
        ApprovalQuery
    ),
    responses(
        (status = 200, description = "Booking decided", body = BookingResponse),
        (status = 400, description = "Not the owner or already decided"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_status(
    State(state): State<crate::AppState>,
    SharerUser(owner_id): SharerUser,
    ApiPath(booking_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ApprovalQuery>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state
        .services
        .bookings
        .update_booking_status(owner_id, booking_id, query.approved)
        .await?;
    Ok(Json(booking.into()))
}

/// Bookings made by the acting user
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker id"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings, newest start first", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state or invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_bookings(
    State(state): State<crate::AppState>,
    SharerUser(booker_id): SharerUser,
    ApiQuery(query): ApiQuery<BookingListQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let (filter, from, size) = resolve_listing(&state, query);
    let bookings = state
        .services
        .bookings
        .list_for_booker(booker_id, &filter, from, size)
        .await?;
    Ok(Json(into_responses(bookings)))
}

/// Bookings on items listed by the acting user
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner id"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings, newest start first", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state or invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_owner_bookings(
    State(state): State<crate::AppState>,
    SharerUser(owner_id): SharerUser,
    ApiQuery(query): ApiQuery<BookingListQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let (filter, from, size) = resolve_listing(&state, query);
    let bookings = state
        .services
        .bookings
        .list_for_owner(owner_id, &filter, from, size)
        .await?;
    Ok(Json(into_responses(bookings)))
}

fn resolve_listing(state: &crate::AppState, query: BookingListQuery) -> (String, i64, i64) {
    (
        query.state.unwrap_or_else(|| "ALL".to_string()),
        query.from.unwrap_or(0),
        query.size.unwrap_or(state.config.pagination.default_size),
    )
}
