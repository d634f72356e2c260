//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, ObjectStorage};
use crate::services::{
    AuthService, CatalogService, EnrollmentService, FileService, ProvisioningService,
    ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User provisioning service
    pub provisioning_service: Arc<dyn ProvisioningService>,
    /// Catalog service
    pub catalog_service: Arc<dyn CatalogService>,
    /// Enrollment service
    pub enrollment_service: Arc<dyn EnrollmentService>,
    /// File service
    pub file_service: Arc<dyn FileService>,
    /// Application configuration
    pub config: Config,
    /// Database handle; absent when the state was assembled from manually
    /// injected services (tests)
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from a connected database and config.
    ///
    /// This is the recommended way to create AppState as it uses
    /// the ServiceContainer for centralized service wiring.
    pub fn from_config(
        database: Arc<Database>,
        storage: Arc<dyn ObjectStorage>,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), storage);

        Self {
            auth_service: container.auth(),
            provisioning_service: container.provisioning(),
            catalog_service: container.catalog(),
            enrollment_service: container.enrollments(),
            file_service: container.files(),
            config,
            database: Some(database),
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        provisioning_service: Arc<dyn ProvisioningService>,
        catalog_service: Arc<dyn CatalogService>,
        enrollment_service: Arc<dyn EnrollmentService>,
        file_service: Arc<dyn FileService>,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            provisioning_service,
            catalog_service,
            enrollment_service,
            file_service,
            config,
            database: None,
        }
    }
}
