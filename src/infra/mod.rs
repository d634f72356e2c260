//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Object storage for uploaded assets
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CatalogRepository, CatalogStore, EnrollmentRepository, EnrollmentStore, FileRepository,
    FileStore, UserRepository, UserStore,
};
pub use storage::{LocalStorage, ObjectStorage};
pub use unit_of_work::{
    Persistence, TransactionContext, TxEnrollmentRepository, TxFileRepository, TxUserRepository,
    UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCatalogRepository, MockEnrollmentRepository, MockFileRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockObjectStorage;
