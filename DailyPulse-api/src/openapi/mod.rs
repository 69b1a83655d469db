use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Daily health endpoints
        crate::api::handlers::daily_health::daily_pulse,
        crate::api::handlers::daily_health::log_meal,
        crate::api::handlers::daily_health::health_dashboard,
    ),
    components(
        schemas(
            crate::entities::common::UserQuery,
            crate::entities::daily_health::PulseResponse,
            crate::entities::daily_health::MealLogBody,
            crate::entities::daily_health::MealLog,
            crate::entities::daily_health::MealLogResponse,
            crate::entities::daily_health::DashboardResponse,

            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "daily_pulse", description = "Daily pulse, meal log and dashboard endpoints")
    ),
    info(
        title = "Daily Pulse API",
        version = "0.1.0",
        description = "Per-user daily health pulse, meal logging and dashboards",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
