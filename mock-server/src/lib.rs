use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Key accepted by `app()` and `run()`.
pub const DEFAULT_API_KEY: &str = "mock-key";

/// One request as seen by the server, before the key check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
}

pub type RequestLog = Arc<RwLock<Vec<RecordedRequest>>>;

#[derive(Clone, Debug)]
pub struct MockState {
    pub api_key: String,
    pub log: RequestLog,
}

impl MockState {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            log: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

pub fn app() -> Router {
    app_with_state(MockState::new(DEFAULT_API_KEY))
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/auto/categories", get(categories))
        .route("/auto/bodystyles", get(all_body_styles))
        .route("/auto/categories/{category}/bodystyles", get(body_styles))
        .route("/auto/categories/{category}/bodystyles/_group", get(grouped_body_styles))
        .route("/auto/categories/{category}/marks", get(marks))
        .route("/auto/models", get(all_models))
        .route("/auto/categories/{category}/marks/{mark}/models", get(models))
        .route(
            "/auto/categories/{category}/marks/{mark}/models/_group",
            get(grouped_models),
        )
        .route("/auto/states", get(states))
        .route("/auto/states/{region}/cities", get(cities))
        .route("/auto/categories/{category}/gearboxes", get(gearboxes))
        .route("/auto/categories/{category}/driverTypes", get(driver_types))
        .route("/auto/type", get(fuels))
        .route("/auto/colors", get(colors))
        .route("/auto/categories/{category}/auto_options", get(options))
        .route("/auto/average_price", get(average_price))
        .route("/auto/info", get(info))
        .route("/auto/fotos/{car_id}", get(photos))
        .layer(middleware::from_fn_with_state(state.clone(), check_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

fn upstream_error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

async fn check_api_key(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let recorded = RecordedRequest {
        path: request.uri().path().to_string(),
        query: request.uri().query().unwrap_or_default().to_string(),
    };
    debug!(path = %recorded.path, "handled request");
    state.log.write().await.push(recorded);

    match params.get("api_key") {
        Some(key) if *key == state.api_key => next.run(request).await,
        _ => upstream_error(
            StatusCode::FORBIDDEN,
            "API_KEY_INVALID",
            "An invalid api_key was supplied. Get one at https://developers.ria.com",
        ),
    }
}

fn named(items: &[(&str, u32)]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect(),
    )
}

async fn categories() -> Json<Value> {
    Json(named(&[
        ("Легковые", 1),
        ("Мото", 2),
        ("Водный транспорт", 3),
        ("Спецтехника", 4),
        ("Прицепы", 5),
        ("Грузовики", 6),
    ]))
}

async fn body_styles(Path(category): Path<String>) -> Json<Value> {
    debug!(%category, "body styles");
    Json(named(&[("Седан", 3), ("Хэтчбек", 4), ("Универсал", 2)]))
}

async fn grouped_body_styles(Path(_category): Path<String>) -> Json<Value> {
    Json(json!([
        [{ "name": "Седан", "value": 3, "parentId": 0 }],
        [
            { "name": "Хэтчбек", "value": 4, "parentId": 0 },
            { "name": "Лифтбек", "value": 307, "parentId": 4 }
        ]
    ]))
}

async fn all_body_styles() -> Json<Value> {
    Json(named(&[("Седан", 3), ("Мотоцикл", 34), ("Катер", 51)]))
}

async fn marks(Path(_category): Path<String>) -> Json<Value> {
    Json(named(&[("Audi", 6), ("BMW", 9), ("Volkswagen", 84)]))
}

async fn models(Path((_category, mark)): Path<(String, String)>) -> Json<Value> {
    match mark.as_str() {
        "9" => Json(named(&[("3 Series", 3219), ("5 Series", 3220), ("X5", 31612)])),
        _ => Json(json!([])),
    }
}

async fn grouped_models(Path((_category, _mark)): Path<(String, String)>) -> Json<Value> {
    Json(json!([
        [{ "name": "3 Series", "value": 3219, "parentId": 0 }],
        [
            { "name": "X5", "value": 31612, "parentId": 0 },
            { "name": "X5 M", "value": 44112, "parentId": 31612 }
        ]
    ]))
}

async fn all_models() -> Json<Value> {
    Json(named(&[("A4", 2), ("3 Series", 3219), ("Passat", 2359)]))
}

async fn states() -> Json<Value> {
    Json(named(&[("Киевская", 10), ("Львовская", 5), ("Одесская", 12)]))
}

async fn cities(Path(region): Path<String>) -> Response {
    match region.as_str() {
        "10" => Json(named(&[("Киев", 10), ("Белая Церковь", 85)])).into_response(),
        _ => upstream_error(StatusCode::NOT_FOUND, "NOT_FOUND", "unknown region"),
    }
}

async fn gearboxes(Path(_category): Path<String>) -> Json<Value> {
    Json(named(&[
        ("Ручная / Механика", 1),
        ("Автомат", 2),
        ("Типтроник", 3),
    ]))
}

async fn driver_types(Path(_category): Path<String>) -> Json<Value> {
    Json(named(&[("Полный", 1), ("Передний", 2), ("Задний", 3)]))
}

async fn fuels() -> Json<Value> {
    Json(named(&[("Бензин", 1), ("Дизель", 2), ("Газ", 3), ("Электро", 6)]))
}

async fn colors() -> Json<Value> {
    Json(named(&[("Бежевый", 1), ("Черный", 2), ("Белый", 15)]))
}

async fn options(Path(_category): Path<String>) -> Json<Value> {
    Json(named(&[("ABS", 1), ("Кондиционер", 24), ("Парктроник", 41)]))
}

/// Echoes the received parameters (minus the key) next to fixed statistics.
async fn average_price(Query(params): Query<Vec<(String, String)>>) -> Json<Value> {
    let query: Vec<Value> = params
        .into_iter()
        .filter(|(name, _)| name != "api_key")
        .map(|(name, value)| json!([name, value]))
        .collect();
    Json(json!({
        "total": 42,
        "arithmeticMean": 23517.5,
        "interQuartileMean": 22950.0,
        "percentiles": { "25.0": 19500, "50.0": 23000, "75.0": 27000 },
        "query": query
    }))
}

fn parse_car_id(raw: Option<&String>) -> Result<u64, Response> {
    raw.and_then(|id| id.parse().ok()).ok_or_else(|| {
        upstream_error(StatusCode::BAD_REQUEST, "BAD_REQUEST", "auto_id is required")
    })
}

async fn info(Query(params): Query<HashMap<String, String>>) -> Response {
    let id = match parse_car_id(params.get("auto_id")) {
        Ok(id) => id,
        Err(response) => return response,
    };
    Json(json!({
        "autoData": { "autoId": id, "year": 2016, "fuelName": "Дизель" },
        "markName": "BMW",
        "modelName": "X5",
        "USD": 31500
    }))
    .into_response()
}

async fn photos(
    Path(car_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let id = match parse_car_id(params.get("auto_id")) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if car_id != id.to_string() {
        return upstream_error(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "auto_id does not match the path",
        );
    }
    let mut data = serde_json::Map::new();
    data.insert(
        car_id,
        json!({
            "1001": { "formats": ["https://cdn.riastatic.com/photosnew/auto/photo/1001f.jpg"] },
            "1002": { "formats": ["https://cdn.riastatic.com/photosnew/auto/photo/1002f.jpg"] }
        }),
    );
    Json(json!({ "status": 200, "data": data })).into_response()
}
