//! Sample API used to exercise the client over real HTTP.
//!
//! Routes:
//! - `GET /users` — look up a user by the `payload` query parameter
//!   (base64url JSON `{"id": n}`); defaults to user 1. 200 or 404.
//! - `POST /users` — create a user from a JSON body. 201 or 400.
//! - `/echo` — any method; describes the request it received.
//! - `GET /slow` — answers after `SLOW_DELAY`.
//! - `GET /not-json` — 200 with a plain-text body.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const SLOW_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub id: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub message: String,
}

/// What `/echo` saw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: BTreeMap<String, String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Deserialize)]
pub struct PayloadQuery {
    pub payload: Option<String>,
}

pub type Db = Arc<RwLock<BTreeMap<u64, User>>>;

type ApiError = (StatusCode, Json<Problem>);

fn problem(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(Problem {
            message: message.into(),
        }),
    )
}

pub fn app() -> Router {
    let mut users = BTreeMap::new();
    users.insert(
        1,
        User {
            id: 1,
            name: "Ann".to_string(),
        },
    );
    let db: Db = Arc::new(RwLock::new(users));
    Router::new()
        .route("/users", get(get_user).post(create_user))
        .route("/echo", any(echo))
        .route("/slow", get(slow))
        .route("/not-json", get(not_json))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Decode a base64url JSON `payload` query parameter, padded or not.
pub fn decode_payload<T: serde::de::DeserializeOwned>(encoded: &str) -> Result<T, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|e| format!("payload is not base64url: {e}"))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("payload is not valid: {e}"))
}

async fn get_user(
    State(db): State<Db>,
    Query(query): Query<PayloadQuery>,
) -> Result<Json<User>, ApiError> {
    let id = match query.payload.as_deref() {
        Some(encoded) => {
            decode_payload::<UserQuery>(encoded)
                .map_err(|e| problem(StatusCode::BAD_REQUEST, e))?
                .id
        }
        None => 1,
    };
    debug!(id, "get user");
    let users = db.read().await;
    users
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| problem(StatusCode::NOT_FOUND, format!("no user with id {id}")))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if input.name.trim().is_empty() {
        return Err(problem(StatusCode::BAD_REQUEST, "name must not be empty"));
    }
    let mut users = db.write().await;
    let id = users.keys().next_back().map_or(1, |last| last + 1);
    let user = User {
        id,
        name: input.name,
    };
    users.insert(id, user.clone());
    debug!(id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    body: String,
) -> Json<Echo> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    };
    Json(Echo {
        method: method.to_string(),
        query,
        content_type: header_value(header::CONTENT_TYPE),
        authorization: header_value(header::AUTHORIZATION),
        body,
    })
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(Value::Object(Default::default()))
}

async fn not_json() -> &'static str {
    "definitely not json"
}
