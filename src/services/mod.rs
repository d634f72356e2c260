//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and use the Unit of Work for repository access
//! and transaction management.

mod auth_service;
mod catalog_service;
pub mod container;
mod enrollment_service;
mod file_service;
mod provisioning_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator};
pub use catalog_service::{CatalogManager, CatalogService, TeacherClass};
pub use enrollment_service::{EnrollmentManager, EnrollmentService};
pub use file_service::{FileManager, FileService, NewUpload};
pub use provisioning_service::{
    NewStudent, NewTeacher, ProvisioningService, Registrar, StudentUpdate, TeacherUpdate,
};

/// Unit-test scaffolding: a UnitOfWork over mock repositories.
///
/// The transaction method fails by design - transactional happy paths need
/// a live database and are exercised against a real Postgres instead.
#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::errors::{AppError, AppResult};
    use crate::infra::{
        CatalogRepository, EnrollmentRepository, FileRepository, MockCatalogRepository,
        MockEnrollmentRepository, MockFileRepository, MockUserRepository, TransactionContext,
        UnitOfWork, UserRepository,
    };

    /// UnitOfWork over mock repositories. Unset expectations panic on
    /// call, which doubles as a "this store was never touched" assertion.
    pub struct TestUow {
        pub users: Arc<MockUserRepository>,
        pub catalog: Arc<MockCatalogRepository>,
        pub enrollments: Arc<MockEnrollmentRepository>,
        pub files: Arc<MockFileRepository>,
    }

    impl TestUow {
        pub fn new(
            users: MockUserRepository,
            catalog: MockCatalogRepository,
            enrollments: MockEnrollmentRepository,
            files: MockFileRepository,
        ) -> Self {
            Self {
                users: Arc::new(users),
                catalog: Arc::new(catalog),
                enrollments: Arc::new(enrollments),
                files: Arc::new(files),
            }
        }
    }

    impl Default for TestUow {
        fn default() -> Self {
            Self::new(
                MockUserRepository::new(),
                MockCatalogRepository::new(),
                MockEnrollmentRepository::new(),
                MockFileRepository::new(),
            )
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUow {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn catalog(&self) -> Arc<dyn CatalogRepository> {
            self.catalog.clone()
        }

        fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
            self.enrollments.clone()
        }

        fn files(&self) -> Arc<dyn FileRepository> {
            self.files.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }
}
