//! In-memory stand-in for the sweet shop backend.
//!
//! # Design
//! Mirrors the production API's observable behavior: bearer-token auth with
//! tokens issued on register/login, `{"detail": "..."}` error bodies, integer
//! server-assigned ids, and the insufficient-stock rejection on purchase.
//! Listing and searching are public; every mutation requires a valid token.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sweet {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSweet {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
}

fn default_purchase_quantity() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    #[serde(default = "default_purchase_quantity")]
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

struct UserRecord {
    email: String,
    password: String,
}

#[derive(Default)]
pub struct ShopState {
    users: HashMap<String, UserRecord>,
    tokens: HashMap<String, String>,
    sweets: HashMap<i64, Sweet>,
    next_id: i64,
}

pub type Db = Arc<RwLock<ShopState>>;

type Rejection = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(ShopState::default()));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/sweets", get(list_sweets).post(create_sweet))
        .route("/sweets/search", get(search_sweets))
        .route("/sweets/{id}", put(update_sweet).delete(delete_sweet))
        .route("/sweets/{id}/purchase", post(purchase_sweet))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn detail(status: StatusCode, message: impl Into<String>) -> Rejection {
    (status, Json(json!({ "detail": message.into() })))
}

/// Resolve the bearer token from the Authorization header to a username.
async fn authorize(db: &Db, headers: &HeaderMap) -> Result<String, Rejection> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    let state = db.read().await;
    state
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

// --- auth ---

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterUser>,
) -> Result<(StatusCode, Json<AuthResponse>), Rejection> {
    if input.username.trim().is_empty()
        || input.email.trim().is_empty()
        || input.password.trim().is_empty()
    {
        return Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "username, email and password are required",
        ));
    }
    let mut state = db.write().await;
    if state.users.contains_key(&input.username) {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            "Username already registered",
        ));
    }
    if state.users.values().any(|user| user.email == input.email) {
        return Err(detail(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    state.users.insert(
        input.username.clone(),
        UserRecord {
            email: input.email,
            password: input.password,
        },
    );
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), input.username);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, Rejection> {
    let mut state = db.write().await;
    let valid = state
        .users
        .get(&input.username)
        .is_some_and(|user| user.password == input.password);
    if !valid {
        return Err(detail(
            StatusCode::UNAUTHORIZED,
            "Incorrect username or password",
        ));
    }
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), input.username);
    Ok(Json(AuthResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

// --- sweets ---

async fn list_sweets(State(db): State<Db>) -> Json<Vec<Sweet>> {
    let state = db.read().await;
    let mut sweets: Vec<Sweet> = state.sweets.values().cloned().collect();
    sweets.sort_by_key(|sweet| sweet.id);
    Json(sweets)
}

async fn search_sweets(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Sweet>> {
    let state = db.read().await;
    let mut sweets: Vec<Sweet> = state
        .sweets
        .values()
        .filter(|sweet| {
            params.name.as_deref().is_none_or(|name| {
                sweet.name.to_lowercase().contains(&name.to_lowercase())
            }) && params.category.as_deref().is_none_or(|category| {
                sweet
                    .category
                    .to_lowercase()
                    .contains(&category.to_lowercase())
            }) && params.min_price.is_none_or(|min| sweet.price >= min)
                && params.max_price.is_none_or(|max| sweet.price <= max)
        })
        .cloned()
        .collect();
    sweets.sort_by_key(|sweet| sweet.id);
    Json(sweets)
}

fn validate_fields(
    name: Option<&str>,
    category: Option<&str>,
    price: Option<f64>,
) -> Result<(), Rejection> {
    if name.is_some_and(|name| name.trim().is_empty()) {
        return Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "name must not be empty",
        ));
    }
    if category.is_some_and(|category| category.trim().is_empty()) {
        return Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "category must not be empty",
        ));
    }
    if price.is_some_and(|price| price < 0.0) {
        return Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "price must not be negative",
        ));
    }
    Ok(())
}

async fn create_sweet(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateSweet>,
) -> Result<(StatusCode, Json<Sweet>), Rejection> {
    authorize(&db, &headers).await?;
    validate_fields(
        Some(&input.name),
        Some(&input.category),
        Some(input.price),
    )?;
    let mut state = db.write().await;
    state.next_id += 1;
    let sweet = Sweet {
        id: state.next_id,
        name: input.name,
        category: input.category,
        price: input.price,
        quantity: input.quantity,
        description: input.description,
    };
    state.sweets.insert(sweet.id, sweet.clone());
    Ok((StatusCode::CREATED, Json(sweet)))
}

async fn update_sweet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<UpdateSweet>,
) -> Result<Json<Sweet>, Rejection> {
    authorize(&db, &headers).await?;
    validate_fields(input.name.as_deref(), input.category.as_deref(), input.price)?;
    let mut state = db.write().await;
    let sweet = state
        .sweets
        .get_mut(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, format!("Sweet with id {id} not found")))?;
    if let Some(name) = input.name {
        sweet.name = name;
    }
    if let Some(category) = input.category {
        sweet.category = category;
    }
    if let Some(price) = input.price {
        sweet.price = price;
    }
    if let Some(quantity) = input.quantity {
        sweet.quantity = quantity;
    }
    if let Some(description) = input.description {
        sweet.description = Some(description);
    }
    Ok(Json(sweet.clone()))
}

async fn delete_sweet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, Rejection> {
    authorize(&db, &headers).await?;
    let mut state = db.write().await;
    state
        .sweets
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, format!("Sweet with id {id} not found")))
}

async fn purchase_sweet(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<PurchaseRequest>,
) -> Result<Json<Sweet>, Rejection> {
    authorize(&db, &headers).await?;
    if input.quantity == 0 {
        return Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "quantity must be at least 1",
        ));
    }
    let mut state = db.write().await;
    let sweet = state
        .sweets
        .get_mut(&id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, format!("Sweet with id {id} not found")))?;
    if sweet.quantity < input.quantity {
        return Err(detail(
            StatusCode::BAD_REQUEST,
            format!(
                "Insufficient stock. Only {} items available",
                sweet.quantity
            ),
        ));
    }
    sweet.quantity -= input.quantity;
    Ok(Json(sweet.clone()))
}
