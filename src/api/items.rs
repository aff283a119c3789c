//! Item-scoped booking endpoints

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::booking::ItemBookingSummary};

use super::{ApiPath, SharerUser};

#[derive(Serialize, ToSchema)]
pub struct RentalCheckResponse {
    #[serde(rename = "itemId")]
    pub item_id: i64,
    /// True when the acting user has an approved booking of the item that already started
    pub rented: bool,
}

/// Last and next approved bookings of an item (owner only)
#[utoipa::path(
    get,
    path = "/items/{id}/bookings/summary",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Viewer id")
    ),
    responses(
        (status = 200, description = "Booking summary, empty for non-owners", body = ItemBookingSummary),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn get_booking_summary(
    State(state): State<crate::AppState>,
    SharerUser(viewer_id): SharerUser,
    ApiPath(item_id): ApiPath<i64>,
) -> AppResult<Json<ItemBookingSummary>> {
    let summary = state
        .services
        .bookings
        .item_booking_summary(viewer_id, item_id)
        .await?;
    Ok(Json(summary))
}

/// Whether the acting user has rented the item, which gates commenting
#[utoipa::path(
    get,
    path = "/items/{id}/bookings/rented",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "User id")
    ),
    responses(
        (status = 200, description = "Rental check", body = RentalCheckResponse),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn get_rental_check(
    State(state): State<crate::AppState>,
    SharerUser(user_id): SharerUser,
    ApiPath(item_id): ApiPath<i64>,
) -> AppResult<Json<RentalCheckResponse>> {
    let rented = state.services.bookings.has_rented_item(user_id, item_id).await?;
    Ok(Json(RentalCheckResponse { item_id, rented }))
}
