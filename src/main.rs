//! Climate & Road Accident Impact Prediction Server
//!
//! Single-page form over a pre-trained scoring model.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ACCIDENT IMPACT SERVER                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  Form     │  │  JSON     │  │  Inference Service      │ │
//! │  │  (HTML)   │  │  API      │  │  (record → frame →      │ │
//! │  │           │  │  (Axum)   │  │   predict → first)      │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │              ┌─────────────────┐                            │
//! │              │ Scoring Model   │ ← loaded once (JSON)       │
//! │              └─────────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod inference;
mod handlers;
mod views;
mod error;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

use inference::{InferenceService, ModelLoader};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    // Initialize logging
    init_tracing(config.is_production());

    tracing::info!("Accident Impact Server starting...");
    tracing::info!(
        "Record schema v{} ({:08x}), {} columns",
        models::SCHEMA_VERSION,
        models::schema_hash(),
        models::COLUMN_COUNT
    );

    // Load the model once; nothing is served without it
    let loader = ModelLoader::new(&config.model_path, config.model_sha256.clone());
    let model = match loader.load() {
        Ok(model) => model,
        Err(e) => {
            tracing::error!(
                "Model file not found or invalid ({}). Place a model artifact at '{}' or set MODEL_PATH.",
                e,
                loader.path().display()
            );
            std::process::exit(1);
        }
    };

    // Build application state
    let state = AppState {
        inference: InferenceService::new(model),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "accident_impact=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inference: InferenceService,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Form page
    let page_routes = Router::new()
        .route("/", get(handlers::form::index).post(handlers::form::submit));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/model", get(handlers::model::info));

    // Combine all routes
    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    const REFERENCE_FORM: &str = "Driver_Age=30&Time_of_Day=Morning&Driver_Experience=5\
        &Number_of_Vehicles=1&Traffic_Density=1&Road_Type=Highway&Vehicle_Type=Car\
        &Driver_Alcohol=0&Speed_Limit=60&Road_Condition=Dry&Road_Light_Condition=Day\
        &Accident_Severity=Low&Weather=Clear";

    fn test_app() -> Router {
        let loader = ModelLoader::new(inference::bundled_artifact_path(), None);
        let state = AppState {
            inference: InferenceService::new(loader.load().unwrap()),
            config: config::Config {
                model_path: loader.path().display().to_string(),
                model_sha256: None,
                host: [127, 0, 0, 1].into(),
                port: 0,
                environment: "test".to_string(),
            },
        };
        create_router(state)
    }

    fn reference_json() -> serde_json::Value {
        serde_json::json!({
            "Driver_Age": 30, "Driver_Experience": 5, "Number_of_Vehicles": 1,
            "Speed_Limit": 60, "Driver_Alcohol": 0, "Traffic_Density": 1,
            "Time_of_Day": "Morning", "Road_Type": "Highway", "Vehicle_Type": "Car",
            "Road_Condition": "Dry", "Road_Light_Condition": "Day",
            "Accident_Severity": "Low", "Weather": "Clear"
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model"], "best_climate_accident_model");
    }

    #[tokio::test]
    async fn test_model_info() {
        let request = Request::get("/api/v1/model").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["model"]["estimator"], "linear");
        assert_eq!(json["schema"]["columns"].as_array().unwrap().len(), 13);
        assert_eq!(json["schema"]["hash"], models::schema_hash());
    }

    #[tokio::test]
    async fn test_api_predict_reference_record() {
        let (status, body) = send(test_app(), post_json("/api/v1/predict", &reference_json())).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let score = json["score"].as_f64().unwrap();
        assert!((score - 0.618_569_704_189).abs() < 1e-9);
        assert_eq!(json["input"], reference_json());
        assert!(json["prediction_id"].is_string());
    }

    #[tokio::test]
    async fn test_api_predict_missing_field() {
        let mut record = reference_json();
        record.as_object_mut().unwrap().remove("Weather");
        let (status, body) = send(test_app(), post_json("/api/v1/predict", &record)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Weather"), "{}", body);
    }

    #[tokio::test]
    async fn test_api_predict_out_of_range() {
        let mut record = reference_json();
        record["Speed_Limit"] = serde_json::json!(250);
        let (status, body) = send(test_app(), post_json("/api/v1/predict", &record)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Speed_Limit must be between 10 and 200");
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_form_index() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Enter Scenario Details"));
        assert!(body.contains("<form method=\"post\" action=\"/\">"));
    }

    #[tokio::test]
    async fn test_form_submit_renders_score() {
        let (status, body) = send(test_app(), post_form(REFERENCE_FORM)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Predicted Accident Impact Score: <strong>0.62</strong>"));
        assert!(body.contains("&quot;Driver_Age&quot;: 30"));
    }

    #[tokio::test]
    async fn test_form_low_light_value() {
        let form = REFERENCE_FORM.replace("Road_Light_Condition=Day", "Road_Light_Condition=Low+Light");
        let (status, body) = send(test_app(), post_form(&form)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("&quot;Road_Light_Condition&quot;: &quot;Low Light&quot;"));
    }

    #[tokio::test]
    async fn test_form_rejects_missing_field() {
        let form = REFERENCE_FORM.replace("&Weather=Clear", "");
        let (status, body) = send(test_app(), post_form(&form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("class=\"error\""));
        assert!(body.contains("Weather"));
        assert!(!body.contains("Predicted Accident Impact Score"));
    }

    #[tokio::test]
    async fn test_form_rejects_out_of_range() {
        let form = REFERENCE_FORM.replace("Driver_Age=30", "Driver_Age=95");
        let (status, body) = send(test_app(), post_form(&form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Driver_Age must be between 16 and 90"));
    }
}
