use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use forecast_core::{ForecastError, ForecastService, TemperatureUnit};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};

const INDEX_HTML: &str = include_str!("../static/index.html");
const STYLE_CSS: &str = include_str!("../static/style.css");

#[derive(Debug, Clone)]
struct AppState {
    service: Arc<ForecastService>,
    default_unit: TemperatureUnit,
}

#[derive(Debug, Deserialize)]
struct ForecastParams {
    #[serde(default)]
    location: String,
    unit: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn run(
    service: ForecastService,
    default_unit: TemperatureUnit,
    port: u16,
    assets: Option<PathBuf>,
) -> anyhow::Result<()> {
    let app = router(Arc::new(service), default_unit, assets);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(
    service: Arc<ForecastService>,
    default_unit: TemperatureUnit,
    assets: Option<PathBuf>,
) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/style.css", get(stylesheet))
        .route("/api/forecast", get(get_forecast));

    if let Some(dir) = assets {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            service,
            default_unit,
        })
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
) -> Response {
    let location = params.location.trim();
    if location.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Please enter a location.".into());
    }

    let unit = match params.unit.as_deref() {
        Some(hint) => TemperatureUnit::from_hint(Some(hint)),
        None => state.default_unit,
    };

    match state.service.forecast(location, unit).await {
        Ok(forecast) => Json(forecast).into_response(),
        Err(e) => error_response(status_for(&e), e.user_message()),
    }
}

fn status_for(error: &ForecastError) -> StatusCode {
    match error {
        ForecastError::LocationNotFound => StatusCode::NOT_FOUND,
        ForecastError::ForecastUnavailable => StatusCode::BAD_GATEWAY,
        ForecastError::PipelineFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}
