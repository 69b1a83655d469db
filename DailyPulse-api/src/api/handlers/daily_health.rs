use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, instrument};

use daily_pulse_domain::services::{create_default_daily_health_service, DailyHealthServiceTrait};
use daily_pulse_data::repository::DocumentRepository;

use crate::api::errors::ApiError;
use crate::entities::common::UserQuery;
use crate::entities::daily_health::{
    DashboardResponse, MealLog, MealLogBody, MealLogResponse, PulseResponse,
};

/// Service type for dependency injection
pub type DailyHealthService = Arc<dyn DailyHealthServiceTrait>;

/// Create the service the handlers use over the given repository
pub fn create_service(repository: DocumentRepository) -> DailyHealthService {
    Arc::new(create_default_daily_health_service(repository))
}

/// Compute and store today's pulse for a user
#[utoipa::path(
    get,
    path = "/dailyPulse",
    params(UserQuery),
    responses(
        (status = 200, description = "Today's pulse", body = PulseResponse),
        (status = 400, description = "userId missing", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage failure", body = String, content_type = "text/plain"),
    ),
    tag = "daily_pulse"
)]
#[instrument(skip(service))]
pub async fn daily_pulse(
    State(service): State<DailyHealthService>,
    Query(params): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Daily pulse requested");

    let pulse = service.daily_pulse(params.user_id.as_deref()).await?;

    Ok((StatusCode::OK, Json(PulseResponse::from(pulse))))
}

/// Add a meal to today's nutrition log
///
/// The body is read raw so that an empty or malformed body reaches validation
/// instead of being rejected by the JSON extractor.
#[utoipa::path(
    post,
    path = "/logMeal",
    request_body = MealLogBody,
    responses(
        (status = 200, description = "Meal logged", body = MealLogResponse),
        (status = 400, description = "userId or photoUrl missing", body = String, content_type = "text/plain"),
        (status = 405, description = "Method other than POST", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage failure", body = String, content_type = "text/plain"),
    ),
    tag = "daily_pulse"
)]
#[instrument(skip(service, body))]
pub async fn log_meal(
    State(service): State<DailyHealthService>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    info!("Meal log received ({} bytes)", body.len());

    let request = MealLogBody::from_slice(&body);
    let entry = service.log_meal(request.into()).await?;

    Ok((
        StatusCode::OK,
        Json(MealLogResponse {
            success: true,
            log: MealLog::from(entry),
        }),
    ))
}

/// Today's wearable and nutrition data for a user
#[utoipa::path(
    get,
    path = "/healthDashboard",
    params(UserQuery),
    responses(
        (status = 200, description = "Today's dashboard", body = DashboardResponse),
        (status = 400, description = "userId missing", body = String, content_type = "text/plain"),
        (status = 500, description = "Storage failure", body = String, content_type = "text/plain"),
    ),
    tag = "daily_pulse"
)]
#[instrument(skip(service))]
pub async fn health_dashboard(
    State(service): State<DailyHealthService>,
    Query(params): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Health dashboard requested");

    let dashboard = service.health_dashboard(params.user_id.as_deref()).await?;

    Ok((StatusCode::OK, Json(DashboardResponse::from(dashboard))))
}

/// Any method other than POST on the meal log route
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
