use crate::app::car_service::CarService;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone)]
pub struct AppState {
    pub service: CarService,
}

impl AppState {
    pub fn new(service: CarService) -> Self {
        Self { service }
    }
}

/// Query parameters accepted by `GET /`. Anything else is ignored.
///
/// Values stay raw strings so malformed input produces our own 400 page
/// instead of an extractor rejection.
#[derive(Deserialize, Debug, Default)]
pub struct IndexParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub delete: Option<String>,
}

/// Form fields accepted by `POST /`.
#[derive(Deserialize, Debug, Default)]
pub struct CarForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
