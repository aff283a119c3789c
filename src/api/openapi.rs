//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt API",
        version = "1.0.0",
        description = "Item rental marketplace booking API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::update_booking_status,
        bookings::list_user_bookings,
        bookings::list_owner_bookings,
        // Items
        items::get_booking_summary,
        items::get_rental_check,
    ),
    components(
        schemas(
            health::HealthResponse,
            bookings::BookingResponse,
            bookings::BookerRef,
            bookings::BookedItemRef,
            items::RentalCheckResponse,
            crate::models::booking::BookingStatus,
            crate::models::booking::CreateBooking,
            crate::models::booking::ItemBooking,
            crate::models::booking::ItemBookingSummary,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "items", description = "Item booking views")
    )
)]
pub struct ApiDoc;

/// Swagger UI and the raw OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
