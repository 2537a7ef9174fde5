use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, Problem, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json; charset=UTF-8")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- get user ---

#[tokio::test]
async fn get_user_defaults_to_first_user() {
    let resp = app().oneshot(get("/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(
        user,
        User {
            id: 1,
            name: "Ann".to_string()
        }
    );
}

#[tokio::test]
async fn get_user_by_payload() {
    // {"id":1}
    let resp = app().oneshot(get("/users?payload=eyJpZCI6MX0")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.id, 1);
}

#[tokio::test]
async fn get_user_not_found() {
    // {"id":9}
    let resp = app().oneshot(get("/users?payload=eyJpZCI6OX0")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let problem: Problem = body_json(resp).await;
    assert_eq!(problem.message, "no user with id 9");
}

#[tokio::test]
async fn get_user_bad_payload_returns_400() {
    let resp = app().oneshot(get("/users?payload=***")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create user ---

#[tokio::test]
async fn create_user_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"name":"Bob"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.id, 2);
    assert_eq!(user.name, "Bob");
}

#[tokio::test]
async fn create_user_empty_name_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"name":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Problem = body_json(resp).await;
    assert_eq!(problem.message, "name must not be empty");
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"nick":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- echo ---

#[tokio::test]
async fn echo_reports_json_body_and_content_type() {
    let resp = app()
        .oneshot(json_request("PATCH", "/echo", r#"{"a":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(
        echo.content_type.as_deref(),
        Some("application/json; charset=UTF-8")
    );
    assert_eq!(echo.body, Some(serde_json::json!({"a": 1})));
    assert!(echo.authorization.is_none());
}

#[tokio::test]
async fn echo_reports_query_and_missing_body() {
    let resp = app().oneshot(get("/echo?payload=bnVsbA")).await.unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query.get("payload").map(String::as_str), Some("bnVsbA"));
    assert!(echo.body.is_none());
    assert!(echo.content_type.is_none());
}

// --- not json ---

#[tokio::test]
async fn not_json_returns_plain_text() {
    let resp = app().oneshot(get("/not-json")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
}

// --- create then fetch ---

#[tokio::test]
async fn created_user_can_be_fetched() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/users", r#"{"name":"Cleo"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: User = body_json(resp).await;

    // {"id":2}
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users?payload=eyJpZCI6Mn0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: User = body_json(resp).await;
    assert_eq!(fetched, created);
}
