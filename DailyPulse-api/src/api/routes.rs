use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use daily_pulse_data::repository::DocumentRepository;

use crate::api::handlers::{daily_health, health};
use crate::openapi::configure_swagger_routes;

/// Services shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub daily_health: daily_health::DailyHealthService,
    pub health: health::HealthService,
}

impl AppState {
    /// Build every service over one document repository
    pub fn from_repository(repository: DocumentRepository) -> Self {
        Self {
            daily_health: daily_health::create_service(repository.clone()),
            health: health::create_health_service(repository),
        }
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Mounted at the root and again under /api
    let daily_routes = Router::new()
        .route("/dailyPulse", get(daily_health::daily_pulse))
        .route(
            "/logMeal",
            post(daily_health::log_meal).fallback(daily_health::method_not_allowed),
        )
        .route("/healthDashboard", get(daily_health::health_dashboard));

    let app = Router::new()
        .merge(daily_routes.clone())
        .nest("/api", daily_routes)
        .route("/health", get(health::health_check))
        .layer(Extension(state.health))
        .with_state(state.daily_health);

    debug!("Routes configured");

    let app = add_swagger_ui(app)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
