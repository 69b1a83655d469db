use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use crate::entities::conversions;
use crate::entities::{
    DailySnapshot, HealthDashboard, MealLogEntry, MealLogRequest, PulseRecord,
    NUTRITION_COLLECTION, PROFILE_COLLECTION, PULSE_COLLECTION, WEARABLE_COLLECTION,
};
use crate::services::clock::{Clock, SystemClock};
use crate::services::pulse::evaluate_pulse;
use daily_pulse_data::models::{DocumentKey, SetOptions};
use daily_pulse_data::repository::{DocumentRepository, DocumentRepositoryTrait, RepositoryError};

/// Daily health service errors
#[derive(Debug, Error)]
pub enum DailyHealthServiceError {
    /// Client input was missing or invalid
    #[error("{0}")]
    Validation(String),

    /// Storage failed
    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for DailyHealthServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidWrite(e) => DailyHealthServiceError::Validation(e.to_string()),
            other => DailyHealthServiceError::Repository(other.to_string()),
        }
    }
}

/// Trait for the per-user, per-day health operations
#[async_trait]
pub trait DailyHealthServiceTrait: Send + Sync {
    /// Compute, store, and return today's pulse for a user
    async fn daily_pulse(&self, user_id: Option<&str>) -> Result<PulseRecord, DailyHealthServiceError>;

    /// Add a meal to today's nutrition log
    async fn log_meal(&self, request: MealLogRequest) -> Result<MealLogEntry, DailyHealthServiceError>;

    /// Today's wearable and nutrition data, flattened
    async fn health_dashboard(&self, user_id: Option<&str>) -> Result<HealthDashboard, DailyHealthServiceError>;
}

/// Reject an absent or empty user id
pub fn require_user_id(user_id: Option<&str>) -> Result<&str, DailyHealthServiceError> {
    match user_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(DailyHealthServiceError::Validation("userId required".to_string())),
    }
}

/// Fields in the order their messages are reported
const MEAL_LOG_FIELDS: [&str; 4] = ["user_id", "photo_url", "calories", "water"];

/// First validation message in field order, or a generic one
fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    MEAL_LOG_FIELDS
        .iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errors| errors.iter())
        .find_map(|err| err.message.as_ref().map(|msg| msg.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// Daily health service over a document repository
pub struct DailyHealthService<R: DocumentRepositoryTrait> {
    repository: R,
    clock: Arc<dyn Clock>,
}

impl<R: DocumentRepositoryTrait> DailyHealthService<R> {
    /// Create a service that dates documents by the system clock
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    /// Create a service with an explicit clock
    pub fn with_clock(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Read everything the pulse rules need; the three reads run concurrently
    async fn load_snapshot(&self, user_id: &str, today: &str) -> Result<DailySnapshot, RepositoryError> {
        let wearable_key = DocumentKey::dated(WEARABLE_COLLECTION, user_id, today);
        let nutrition_key = DocumentKey::dated(NUTRITION_COLLECTION, user_id, today);
        let profile_key = DocumentKey::user(PROFILE_COLLECTION, user_id);

        let (wearable, nutrition, profile) = tokio::try_join!(
            self.repository.get(&wearable_key),
            self.repository.get(&nutrition_key),
            self.repository.get(&profile_key),
        )?;

        Ok(DailySnapshot {
            wearable: conversions::convert_to_wearable_record(&wearable),
            nutrition: conversions::convert_to_nutrition_record(&nutrition),
            profile: conversions::convert_to_user_profile(&profile),
        })
    }
}

#[async_trait]
impl<R: DocumentRepositoryTrait> DailyHealthServiceTrait for DailyHealthService<R> {
    async fn daily_pulse(&self, user_id: Option<&str>) -> Result<PulseRecord, DailyHealthServiceError> {
        let user_id = require_user_id(user_id)?;
        let today = self.clock.today();

        let snapshot = self.load_snapshot(user_id, &today).await?;
        let pulse = evaluate_pulse(&snapshot);
        debug!("Pulse for {} on {}: {:?}", user_id, today, pulse.focus_areas);

        let key = DocumentKey::dated(PULSE_COLLECTION, user_id, &today);
        self.repository
            .set(&key, conversions::convert_to_pulse_fields(&pulse), SetOptions::overwrite())
            .await?;

        Ok(pulse)
    }

    async fn log_meal(&self, request: MealLogRequest) -> Result<MealLogEntry, DailyHealthServiceError> {
        if let Err(errors) = request.validate() {
            let message = validation_message(&errors);
            warn!("Rejected meal log: {}", message);
            return Err(DailyHealthServiceError::Validation(message));
        }

        let (Some(user_id), Some(photo_url)) = (request.user_id.as_deref(), request.photo_url.as_deref()) else {
            return Err(DailyHealthServiceError::Validation(
                "userId and photoUrl required".to_string(),
            ));
        };

        let today = self.clock.today();
        let key = DocumentKey::dated(NUTRITION_COLLECTION, user_id, &today);
        let fields = conversions::convert_to_meal_log_fields(photo_url, &request);

        let resolved = self.repository.set(&key, fields, SetOptions::merge()).await?;
        let entry = conversions::convert_to_meal_log_entry(&resolved);
        info!(
            "Logged meal for {} on {}: calories={} water={}",
            user_id, today, entry.calories, entry.water
        );

        Ok(entry)
    }

    async fn health_dashboard(&self, user_id: Option<&str>) -> Result<HealthDashboard, DailyHealthServiceError> {
        let user_id = require_user_id(user_id)?;
        let today = self.clock.today();

        let wearable_key = DocumentKey::dated(WEARABLE_COLLECTION, user_id, &today);
        let nutrition_key = DocumentKey::dated(NUTRITION_COLLECTION, user_id, &today);
        let (wearable, nutrition) = tokio::try_join!(
            self.repository.get(&wearable_key),
            self.repository.get(&nutrition_key),
        )?;

        Ok(conversions::convert_to_dashboard(
            &conversions::convert_to_wearable_record(&wearable),
            conversions::convert_to_nutrition_record(&nutrition),
        ))
    }
}

/// Create a daily health service over the given repository
pub fn create_default_daily_health_service(
    repository: DocumentRepository,
) -> impl DailyHealthServiceTrait {
    DailyHealthService::new(repository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use daily_pulse_data::models::{apply_write, Document, WriteFields};
    use mockall::mock;
    use serde_json::json;

    use crate::entities::FocusArea;
    use crate::services::clock::FixedClock;

    mock! {
        pub Repository {}

        #[async_trait]
        impl DocumentRepositoryTrait for Repository {
            async fn get(&self, key: &DocumentKey) -> Result<Document, RepositoryError>;
            async fn set(
                &self,
                key: &DocumentKey,
                fields: WriteFields,
                options: SetOptions,
            ) -> Result<Document, RepositoryError>;
            async fn ping(&self) -> Result<(), RepositoryError>;
            fn describe(&self) -> String;
        }
    }

    fn fixed_clock(day: u32) -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap()))
    }

    fn service<R: DocumentRepositoryTrait>(repository: R) -> DailyHealthService<R> {
        DailyHealthService::with_clock(repository, fixed_clock(15))
    }

    fn meal(user_id: Option<&str>, photo_url: Option<&str>, calories: f64) -> MealLogRequest {
        MealLogRequest {
            user_id: user_id.map(str::to_string),
            photo_url: photo_url.map(str::to_string),
            foods: vec!["salad".to_string()],
            calories,
            water: 1.0,
        }
    }

    #[tokio::test]
    async fn test_daily_pulse_requires_user_id() {
        // No expectations: any repository call fails the test
        let service = service(MockRepository::new());

        let missing = service.daily_pulse(None).await;
        let empty = service.daily_pulse(Some("")).await;

        assert!(matches!(missing, Err(DailyHealthServiceError::Validation(ref msg)) if msg == "userId required"));
        assert!(matches!(empty, Err(DailyHealthServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_daily_pulse_reads_today_and_overwrites_pulse() {
        let mut repo = MockRepository::new();
        repo.expect_get()
            .times(3)
            .returning(|key| {
                let document = match key.collection.as_str() {
                    "wearableData" => json!({ "sleepHours": 5, "steps": 9000, "hrv": 40 }),
                    "foodLogs" => json!({ "water": 3 }),
                    "users" => {
                        assert!(key.date.is_none());
                        json!({ "stepGoal": 8000 })
                    }
                    other => panic!("unexpected collection {}", other),
                };
                match document {
                    serde_json::Value::Object(map) => Ok(map),
                    _ => unreachable!(),
                }
            });
        repo.expect_set()
            .withf(|key, _fields, options| {
                key.collection == "dailyPulse"
                    && key.user_id == "u1"
                    && key.date.as_deref() == Some("2024-03-15")
                    && !options.merge
            })
            .times(1)
            .returning(|_, fields, options| Ok(apply_write(None, &fields, options, Utc::now()).unwrap().resolved));

        let pulse = service(repo).daily_pulse(Some("u1")).await.unwrap();

        assert_eq!(pulse.focus_areas, vec![FocusArea::Rest]);
        assert!(pulse.pulse_message.starts_with("You slept 5 hours, below usual."));
    }

    #[tokio::test]
    async fn test_daily_pulse_storage_failure() {
        let mut repo = MockRepository::new();
        repo.expect_get()
            .returning(|_| Err(RepositoryError::Lock("poisoned".to_string())));

        let result = service(repo).daily_pulse(Some("u1")).await;

        assert!(matches!(result, Err(DailyHealthServiceError::Repository(_))));
    }

    #[tokio::test]
    async fn test_log_meal_validation_skips_storage() {
        let service = service(MockRepository::new());

        for request in [
            meal(Some("u1"), None, 100.0),
            meal(None, Some("meal.jpg"), 100.0),
            meal(Some(""), Some("meal.jpg"), 100.0),
            MealLogRequest::default(),
        ] {
            let result = service.log_meal(request).await;
            assert!(
                matches!(result, Err(DailyHealthServiceError::Validation(ref msg)) if msg == "userId and photoUrl required")
            );
        }
    }

    #[tokio::test]
    async fn test_log_meal_rejects_negative_amounts() {
        // No expectations: any repository call fails the test
        let service = service(MockRepository::new());

        let mut negative_water = meal(Some("u1"), Some("meal.jpg"), 100.0);
        negative_water.water = -2.0;

        for request in [meal(Some("u1"), Some("meal.jpg"), -500.0), negative_water] {
            let result = service.log_meal(request).await;
            assert!(
                matches!(result, Err(DailyHealthServiceError::Validation(ref msg)) if msg == "calories and water must not be negative")
            );
        }
    }

    #[tokio::test]
    async fn test_log_meal_missing_ids_reported_before_amounts() {
        let service = service(MockRepository::new());

        let result = service.log_meal(meal(None, Some("meal.jpg"), -1.0)).await;

        assert!(
            matches!(result, Err(DailyHealthServiceError::Validation(ref msg)) if msg == "userId and photoUrl required")
        );
    }

    #[tokio::test]
    async fn test_log_meal_overflow_keeps_total() {
        let service = service(DocumentRepository::in_memory());

        service.log_meal(meal(Some("u1"), Some("a.jpg"), 1e308)).await.unwrap();
        let result = service.log_meal(meal(Some("u1"), Some("b.jpg"), 1e308)).await;
        assert!(matches!(result, Err(DailyHealthServiceError::Validation(ref msg)) if msg.contains("calories")));

        let dashboard = service.health_dashboard(Some("u1")).await.unwrap();
        assert_eq!(dashboard.calories, 1e308);
        assert_eq!(dashboard.water, 1.0);
    }

    #[tokio::test]
    async fn test_log_meal_sends_increments_with_merge() {
        let mut repo = MockRepository::new();
        repo.expect_set()
            .withf(|key, fields, options| {
                key.path() == "foodLogs/u1/2024-03-15" && options.merge && fields.len() == 5
            })
            .times(1)
            .returning(|_, fields, options| {
                let existing = match json!({ "calories": 200, "water": 1 }) {
                    serde_json::Value::Object(map) => map,
                    _ => unreachable!(),
                };
                Ok(apply_write(Some(&existing), &fields, options, Utc::now()).unwrap().resolved)
            });

        let entry = service(repo).log_meal(meal(Some("u1"), Some("meal.jpg"), 150.0)).await.unwrap();

        assert_eq!(entry.calories, 350.0);
        assert_eq!(entry.water, 2.0);
        assert_eq!(entry.photo_url, "meal.jpg");
        assert!(!entry.updated_at.is_empty());
    }

    #[tokio::test]
    async fn test_meal_logs_accumulate() {
        let service = service(DocumentRepository::in_memory());

        service.log_meal(meal(Some("u1"), Some("a.jpg"), 200.0)).await.unwrap();
        let second = service.log_meal(meal(Some("u1"), Some("b.jpg"), 150.0)).await.unwrap();
        assert_eq!(second.calories, 350.0);

        let dashboard = service.health_dashboard(Some("u1")).await.unwrap();
        assert_eq!(dashboard.calories, 350.0);
        assert_eq!(dashboard.water, 2.0);
        assert_eq!(dashboard.foods, vec!["salad".to_string()]);
    }

    #[tokio::test]
    async fn test_dashboard_does_not_leak_across_days() {
        let repository = DocumentRepository::in_memory();
        let yesterday = DailyHealthService::with_clock(repository.clone(), fixed_clock(14));
        let today = DailyHealthService::with_clock(repository, fixed_clock(15));

        yesterday.log_meal(meal(Some("u1"), Some("a.jpg"), 500.0)).await.unwrap();

        let dashboard = today.health_dashboard(Some("u1")).await.unwrap();
        assert_eq!(dashboard, HealthDashboard::default());
    }

    #[tokio::test]
    async fn test_dashboard_requires_user_id() {
        let service = service(MockRepository::new());

        let result = service.health_dashboard(None).await;

        assert!(matches!(result, Err(DailyHealthServiceError::Validation(_))));
    }
}
