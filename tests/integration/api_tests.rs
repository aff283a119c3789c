//! API integration tests
//!
//! Require a running server on a database loaded with `tests/fixtures/seed.sql`.

use chrono::{Duration, SecondsFormat, Utc};
use reqwest::{Client, Response};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:9090/api/v1";
const USER_HEADER: &str = "X-Sharer-User-Id";

const OWNER: i64 = 1;
const BOOKER: i64 = 2;
const STRANGER: i64 = 3;
const ITEM: i64 = 1;
const UNAVAILABLE_ITEM: i64 = 2;

/// Helper to request a booking starting `days_ahead` days from now
async fn book(client: &Client, user: i64, item_id: i64, days_ahead: i64) -> Response {
    let start = Utc::now() + Duration::days(days_ahead);
    let end = start + Duration::days(1);

    client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, user)
        .json(&json!({
            "itemId": item_id,
            "start": start.to_rfc3339_opts(SecondsFormat::Secs, true),
            "end": end.to_rfc3339_opts(SecondsFormat::Secs, true)
        }))
        .send()
        .await
        .expect("Failed to send booking request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();

    let response = book(&client, BOOKER, ITEM, 1).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "WAITING");
    let booking_id = body["id"].as_i64().expect("No booking ID");

    // Owner approves
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_HEADER, OWNER)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");

    // A second decision is refused
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, booking_id))
        .header(USER_HEADER, OWNER)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "AlreadyDecided");

    // Booker sees it, a stranger does not
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_HEADER, BOOKER)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_HEADER, STRANGER)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_book_own_item() {
    let client = Client::new();

    let response = book(&client, OWNER, ITEM, 2).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "SelfBooking");
}

#[tokio::test]
#[ignore]
async fn test_unavailable_item() {
    let client = Client::new();

    let response = book(&client, BOOKER, UNAVAILABLE_ITEM, 2).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "ItemNotAvailable");
}

#[tokio::test]
#[ignore]
async fn test_list_bookings_filters() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings?state=FUTURE&from=0&size=10", BASE_URL))
        .header(USER_HEADER, BOOKER)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let bookings = body.as_array().expect("Expected an array");
    assert!(bookings.len() <= 10);

    let response = client
        .get(format!("{}/bookings/owner?state=ALL", BASE_URL))
        .header(USER_HEADER, OWNER)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_list_bookings_rejects_bad_parameters() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings?state=BOGUS", BASE_URL))
        .header(USER_HEADER, BOOKER)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unknown state: BOGUS");

    let response = client
        .get(format!("{}/bookings/owner?size=0", BASE_URL))
        .header(USER_HEADER, OWNER)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_missing_user_header() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
