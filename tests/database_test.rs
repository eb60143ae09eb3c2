// End-to-end CRUD through the router against a real database.
// Run with: DATABASE_URL=... cargo test -- --ignored

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::{body_json, database_pool, request, test_app, token_for};
use gym_manager::models::{CreateUserRequest, UserRole};
use gym_manager::services::UserService;

fn unique_email(prefix: &str) -> String {
    format!("{}.{}@example.com", prefix, Uuid::new_v4().simple())
}

async fn admin_token(pool: &sqlx::PgPool) -> String {
    let admin = UserService::new(pool.clone())
        .create(CreateUserRequest {
            email: unique_email("admin"),
            first_name: "Test".to_string(),
            last_name: "Admin".to_string(),
            role: Some(UserRole::Admin),
            phone: None,
        })
        .await
        .unwrap();
    token_for(admin.id, UserRole::Admin)
}

async fn send(pool: &sqlx::PgPool, token: &str, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = test_app(pool.clone())
        .oneshot(request(method, uri, Some(token), body))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn create_user(pool: &sqlx::PgPool, token: &str, first_name: &str, role: &str) -> Value {
    let (status, user) = send(
        pool,
        token,
        Method::POST,
        "/api/users",
        Some(json!({
            "email": unique_email(&first_name.to_lowercase()),
            "firstName": first_name,
            "lastName": "Tester",
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    user
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_client_assignment_lifecycle() {
    let pool = database_pool().await;
    let token = admin_token(&pool).await;

    let trainer_user = create_user(&pool, &token, "Sarah", "trainer").await;
    let (status, trainer) = send(
        &pool,
        &token,
        Method::POST,
        "/api/trainers",
        Some(json!({ "userId": trainer_user["id"], "specialty": "Yoga", "experience": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trainer["clientCount"], 0);
    assert_eq!(trainer["averageRating"], Value::Null);

    let client_user = create_user(&pool, &token, "John", "client").await;
    let (status, client) = send(
        &pool,
        &token,
        Method::POST,
        "/api/clients",
        Some(json!({ "userId": client_user["id"], "goals": "Lose 5kg", "activityLevel": "light" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client["trainer"], Value::Null);
    assert_eq!(client["user"]["firstName"], "John");
    let client_uri = format!("/api/clients/{}", client["id"].as_str().unwrap());

    let (status, assigned) = send(
        &pool,
        &token,
        Method::PUT,
        &client_uri,
        Some(json!({ "trainerId": trainer["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["trainer"]["id"], trainer["id"]);
    assert_eq!(assigned["goals"], "Lose 5kg");

    let (_, filtered) = send(
        &pool,
        &token,
        Method::GET,
        &format!("/api/clients?trainerId={}", trainer["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(filtered["pagination"]["total"], 1);

    let (status, unassigned) = send(
        &pool,
        &token,
        Method::PUT,
        &client_uri,
        Some(json!({ "trainerId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unassigned["trainerId"], Value::Null);

    let (status, _) = send(&pool, &token, Method::DELETE, &client_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&pool, &token, Method::DELETE, &client_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Client not found");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_trainer_rating_reflects_feedback() {
    let pool = database_pool().await;
    let token = admin_token(&pool).await;

    let trainer_user = create_user(&pool, &token, "Marco", "trainer").await;
    let (_, trainer) = send(
        &pool,
        &token,
        Method::POST,
        "/api/trainers",
        Some(json!({ "userId": trainer_user["id"] })),
    )
    .await;

    for (name, rating) in [("Ann", 4), ("Bob", 5)] {
        let user = create_user(&pool, &token, name, "client").await;
        let (status, feedback) = send(
            &pool,
            &token,
            Method::POST,
            "/api/feedbacks",
            Some(json!({ "userId": user["id"], "trainerId": trainer["id"], "rating": rating })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(feedback["client"]["firstName"], name);
    }

    let trainer_uri = format!("/api/trainers/{}", trainer["id"].as_str().unwrap());
    let (_, reloaded) = send(&pool, &token, Method::GET, &trainer_uri, None).await;
    assert_eq!(reloaded["averageRating"], 4.5);
    assert_eq!(reloaded["feedbackCount"], 2);

    let (_, high) = send(
        &pool,
        &token,
        Method::GET,
        &format!("/api/feedbacks?trainerId={}&minRating=5", trainer["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(high["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_conflicts() {
    let pool = database_pool().await;
    let token = admin_token(&pool).await;
    let email = unique_email("dup");
    let body = json!({ "email": email, "firstName": "Dup", "lastName": "Licate" });

    let (status, _) = send(&pool, &token, Method::POST, "/api/users", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&pool, &token, Method::POST, "/api/users", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_progress_derives_bmi_and_feeds_latest_snapshot() {
    let pool = database_pool().await;
    let token = admin_token(&pool).await;

    let user = create_user(&pool, &token, "Jane", "client").await;
    let (_, client) = send(
        &pool,
        &token,
        Method::POST,
        "/api/clients",
        Some(json!({ "userId": user["id"] })),
    )
    .await;

    let (status, record) = send(
        &pool,
        &token,
        Method::POST,
        "/api/progress",
        Some(json!({ "clientId": client["id"], "weight": 70.0, "height": 175.0, "date": "2024-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["bmi"], 22.9);

    let client_uri = format!("/api/clients/{}", client["id"].as_str().unwrap());
    let (_, reloaded) = send(&pool, &token, Method::GET, &client_uri, None).await;
    assert_eq!(reloaded["latestProgress"]["weight"], 70.0);
    assert_eq!(reloaded["progressCount"], 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_foreign_key_is_unprocessable() {
    let pool = database_pool().await;
    let token = admin_token(&pool).await;

    let (status, _) = send(
        &pool,
        &token,
        Method::POST,
        "/api/trainers",
        Some(json!({ "userId": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
