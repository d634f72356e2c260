//! HTTP request handlers.

pub mod auth_handler;
pub mod course_handler;
pub mod department_handler;
pub mod enrollment_handler;
pub mod file_handler;
pub mod portal_handler;
pub mod student_handler;
pub mod subject_handler;
pub mod teacher_handler;

pub use auth_handler::auth_routes;
pub use course_handler::course_routes;
pub use department_handler::department_routes;
pub use enrollment_handler::enrollment_routes;
pub use file_handler::file_routes;
pub use portal_handler::portal_routes;
pub use student_handler::student_routes;
pub use subject_handler::subject_routes;
pub use teacher_handler::teacher_routes;
