//! Service Container - Centralized service access.
//!
//! Wires the Unit of Work and storage backend into the service trait
//! objects consumed by the API layer.

use std::sync::Arc;

use super::{
    AuthService, CatalogService, EnrollmentService, FileService, ProvisioningService,
};
use crate::infra::{ObjectStorage, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get provisioning service
    fn provisioning(&self) -> Arc<dyn ProvisioningService>;

    /// Get catalog service
    fn catalog(&self) -> Arc<dyn CatalogService>;

    /// Get enrollment service
    fn enrollments(&self) -> Arc<dyn EnrollmentService>;

    /// Get file service
    fn files(&self) -> Arc<dyn FileService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    provisioning_service: Arc<dyn ProvisioningService>,
    catalog_service: Arc<dyn CatalogService>,
    enrollment_service: Arc<dyn EnrollmentService>,
    file_service: Arc<dyn FileService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        provisioning_service: Arc<dyn ProvisioningService>,
        catalog_service: Arc<dyn CatalogService>,
        enrollment_service: Arc<dyn EnrollmentService>,
        file_service: Arc<dyn FileService>,
    ) -> Self {
        Self {
            auth_service,
            provisioning_service,
            catalog_service,
            enrollment_service,
            file_service,
        }
    }

    /// Create service container from a database connection and storage
    /// backend
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        use super::{Authenticator, CatalogManager, EnrollmentManager, FileManager, Registrar};

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone())),
            provisioning_service: Arc::new(Registrar::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            enrollment_service: Arc::new(EnrollmentManager::new(uow.clone())),
            file_service: Arc::new(FileManager::new(uow, storage)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn provisioning(&self) -> Arc<dyn ProvisioningService> {
        self.provisioning_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentService> {
        self.enrollment_service.clone()
    }

    fn files(&self) -> Arc<dyn FileService> {
        self.file_service.clone()
    }
}
