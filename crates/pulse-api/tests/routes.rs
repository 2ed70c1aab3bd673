use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use pulse_api::{AppStateInner, router};
use pulse_db::Database;

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    router(Arc::new(AppStateInner { db }))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn review(id: &str, rating: i64, created_at: &str) -> Value {
    json!({
        "id": id,
        "movieId": "t1",
        "userId": "u1",
        "userName": "Asha",
        "rating": rating,
        "text": "Mass!",
        "createdAt": created_at,
        "sentiment": "Positive",
    })
}

#[tokio::test]
async fn movies_come_from_the_seeded_catalog() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/movies", None).await;
    assert_eq!(status, StatusCode::OK);
    let movies = body.as_array().unwrap();
    assert_eq!(movies.len(), 18);
    assert_eq!(movies[0]["title"], "Vikram");
    assert_eq!(movies[12]["category"], "K-Drama");
    assert_eq!(movies[4]["releaseType"], "OTT");
}

#[tokio::test]
async fn posted_feedback_is_listed_newest_first() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/feedback",
        Some(review("a", 5, "2024-06-01T10:00:00Z")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");

    // snake_case keys are accepted too
    let older = json!({
        "id": "b",
        "movie_id": "t1",
        "user_id": "u2",
        "user_name": "Ravi",
        "rating": 2,
        "text": "meh",
        "created_at": "2024-05-30T10:00:00Z",
    });
    let (status, _) = call(&app, Method::POST, "/api/feedback", Some(older)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(&app, Method::GET, "/api/feedback", None).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "a");
    assert_eq!(list[1]["sentiment"], "Negative");
    assert_eq!(list[1]["userName"], "Ravi");
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let app = app();
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/feedback",
        Some(review("a", 7, "2024-06-01T10:00:00Z")),
    )
    .await;
    assert!(status.is_client_error());
    let (_, body) = call(&app, Method::GET, "/api/feedback", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_rederives_sentiment() {
    let app = app();
    call(&app, Method::POST, "/api/feedback", Some(review("a", 5, "2024-06-01T10:00:00Z"))).await;

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/feedback/a",
        Some(json!({ "rating": 1, "text": "changed my mind", "sentiment": "Positive" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/api/feedback", None).await;
    assert_eq!(body[0]["sentiment"], "Negative");
    assert_eq!(body[0]["text"], "changed my mind");
}

#[tokio::test]
async fn update_of_missing_feedback_is_404() {
    let app = app();
    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/feedback/nope",
        Some(json!({ "rating": 3, "text": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/feedback/nope",
        Some(json!({ "rating": 0, "text": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app();
    call(&app, Method::POST, "/api/feedback", Some(review("a", 4, "2024-06-01T10:00:00Z"))).await;

    for _ in 0..2 {
        let (status, body) = call(&app, Method::DELETE, "/api/feedback/a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }
    let (_, body) = call(&app, Method::GET, "/api/feedback", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn signup_then_login() {
    let app = app();
    let signup = json!({
        "name": "Meera",
        "email": "meera@gmail.com",
        "password": "popcorn",
        "role": "analyst",
    });

    let (status, body) = call(&app, Method::POST, "/api/signup", Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "analyst");
    assert!(body.get("password").is_none());

    let (status, _) = call(&app, Method::POST, "/api/signup", Some(signup)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "meera@gmail.com", "password": "popcorn" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Meera");
    assert_eq!(body["notificationsEnabled"], true);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "meera@gmail.com", "password": "popcorn!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "ghost@gmail.com", "password": "popcorn" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_keeps_client_chosen_id() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/signup",
        Some(json!({
            "id": "local-42",
            "name": "Ravi",
            "email": "ravi@gmail.com",
            "password": "secret",
            "role": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "local-42");
}

#[tokio::test]
async fn signup_validates_input() {
    let app = app();
    for (email, password, name) in [
        ("meera@yahoo.com", "popcorn", "Meera"),
        ("meera@gmail.com", "pop", "Meera"),
        ("meera@gmail.com", "popcorn", "  "),
    ] {
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/signup",
            Some(json!({ "name": name, "email": email, "password": password, "role": "user" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{email} / {password} / {name:?}");
    }
}
