//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::warn;

use daily_pulse_data::repository::DocumentRepositoryTrait;

/// A ping slower than this marks the storage as degraded
pub const SLOW_PING_THRESHOLD: Duration = Duration::from_millis(500);

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    /// Returns true if the database is healthy, false if it answers slowly
    /// Returns an error if the database could not be reached
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Health checks backed by the document repository
pub struct StorageHealthService<R: DocumentRepositoryTrait> {
    repository: R,
}

impl<R: DocumentRepositoryTrait> StorageHealthService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: DocumentRepositoryTrait> HealthServiceTrait for StorageHealthService<R> {
    async fn get_system_health(&self) -> SystemHealth {
        let db_component = match self.check_database_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(self.repository.describe()),
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Database is available but has performance issues".to_string()),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        let overall_status = match db_component.status {
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Healthy => SystemStatus::Healthy,
        };

        SystemHealth {
            status: overall_status,
            components: vec![("database".to_string(), db_component)].into_iter().collect(),
        }
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        let started = Instant::now();

        match self.repository.ping().await {
            Ok(()) => {
                let elapsed = started.elapsed();
                if elapsed > SLOW_PING_THRESHOLD {
                    warn!("Database ping took {:?}", elapsed);
                    Ok(false)
                } else {
                    Ok(true)
                }
            }
            Err(e) => {
                warn!("Database ping failed: {}", e);
                Err(format!("Database connection error: {}", e))
            }
        }
    }
}
