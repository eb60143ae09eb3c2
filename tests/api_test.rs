// Routing, auth and validation paths that reject before touching the database

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{body_json, lazy_pool, request, test_app, token_for};
use gym_manager::models::UserRole;

#[tokio::test]
async fn test_health_check_is_public() {
    let app = test_app(lazy_pool());

    let response = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "gym-manager");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app(lazy_pool());

    let response = app
        .oneshot(request(Method::GET, "/api/clients", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = test_app(lazy_pool());

    let response = app
        .oneshot(request(Method::GET, "/api/trainers", Some("not-a-jwt"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = test_app(lazy_pool());
    let foreign = gym_manager::auth::JwtService::new("some-other-secret")
        .create_access_token(Uuid::new_v4(), "intruder@example.com", UserRole::Admin)
        .unwrap();

    let response = app
        .oneshot(request(Method::GET, "/api/users", Some(&foreign), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let app = test_app(lazy_pool());
    let request = Request::builder()
        .uri("/api/feedbacks")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid authorization header format");
}

#[tokio::test]
async fn test_feedback_rating_out_of_range_is_unprocessable() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Client);

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/feedbacks",
            Some(&token),
            Some(json!({ "trainerId": Uuid::new_v4(), "rating": 6 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "rating");
    assert_eq!(body["errors"][0]["message"], "Rating must be between 1 and 5");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Admin);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/clients")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{\"userId\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_invalid_query_parameter_is_bad_request() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Admin);

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/clients?status=retired",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_creating_users_requires_admin() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Trainer);

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/users",
            Some(&token),
            Some(json!({
                "email": "new.member@example.com",
                "firstName": "New",
                "lastName": "Member"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Insufficient permissions");
}

#[tokio::test]
async fn test_deleting_users_requires_admin() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Client);

    let response = app
        .oneshot(request(
            Method::DELETE,
            &format!("/api/users/{}", Uuid::new_v4()),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_users_cannot_edit_other_accounts() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Client);

    let response = app
        .oneshot(request(
            Method::PUT,
            &format!("/api/users/{}", Uuid::new_v4()),
            Some(&token),
            Some(json!({ "firstName": "Mallory" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_appointment_must_end_after_start() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Trainer);

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/appointments",
            Some(&token),
            Some(json!({
                "clientId": Uuid::new_v4(),
                "trainerId": Uuid::new_v4(),
                "startTime": "2024-05-01T10:00:00Z",
                "endTime": "2024-05-01T09:00:00Z"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "end_time");
}

#[tokio::test]
async fn test_meal_plan_date_range_is_checked() {
    let app = test_app(lazy_pool());
    let token = token_for(Uuid::new_v4(), UserRole::Trainer);

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/meal-plans",
            Some(&token),
            Some(json!({
                "userId": Uuid::new_v4(),
                "name": "Cut",
                "startDate": "2024-06-01",
                "endDate": "2024-05-01"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "end_date");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = test_app(lazy_pool());

    let response = app
        .oneshot(request(Method::GET, "/nowhere", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
