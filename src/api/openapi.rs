//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::extractors::CurrentUser;
use crate::api::handlers::{
    auth_handler, course_handler, department_handler, enrollment_handler, file_handler,
    student_handler, subject_handler, teacher_handler,
};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{
    AssignedTeacher, ClassAssignment, Course, Department, Enrollment, EnrollmentResponse, Role,
    StudentResponse, Subject, SubjectFileResponse, SubjectResponse, TeacherResponse, UserResponse,
};
use crate::services::TeacherClass;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Campus API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus API",
        version = "0.1.0",
        description = "Role-based e-learning backend: departments, courses, subjects, provisioning, enrollment and file delivery",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login,
        auth_handler::logout,
        auth_handler::me,
        // Departments
        department_handler::list_departments,
        department_handler::create_department,
        department_handler::get_department,
        department_handler::update_department,
        department_handler::delete_department,
        // Courses
        course_handler::list_courses,
        course_handler::create_course,
        course_handler::get_course,
        course_handler::update_course,
        course_handler::delete_course,
        // Subjects
        subject_handler::list_subjects,
        subject_handler::create_subject,
        subject_handler::get_subject,
        subject_handler::update_subject,
        subject_handler::delete_subject,
        // Teachers
        teacher_handler::list_teachers,
        teacher_handler::create_teacher,
        teacher_handler::get_teacher,
        teacher_handler::update_teacher,
        teacher_handler::delete_teacher,
        teacher_handler::assign_subject,
        teacher_handler::unassign_subject,
        // Students
        student_handler::list_students,
        student_handler::create_student,
        student_handler::get_student,
        student_handler::update_student,
        student_handler::delete_student,
        // Enrollments
        enrollment_handler::list_enrollments,
        enrollment_handler::reconcile_enrollments,
        enrollment_handler::delete_enrollment,
        // Files
        file_handler::list_files,
        file_handler::get_file,
        file_handler::delete_file,
        file_handler::upload,
    ),
    components(
        schemas(
            // Domain types
            Role,
            UserResponse,
            TeacherResponse,
            StudentResponse,
            Department,
            Course,
            Subject,
            SubjectResponse,
            AssignedTeacher,
            ClassAssignment,
            TeacherClass,
            Enrollment,
            EnrollmentResponse,
            SubjectFileResponse,
            CurrentUser,
            MessageResponse,
            // Request types
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            department_handler::CreateDepartmentRequest,
            department_handler::UpdateDepartmentRequest,
            course_handler::CreateCourseRequest,
            course_handler::UpdateCourseRequest,
            subject_handler::CreateSubjectRequest,
            subject_handler::UpdateSubjectRequest,
            teacher_handler::CreateTeacherRequest,
            teacher_handler::UpdateTeacherRequest,
            teacher_handler::AssignSubjectRequest,
            student_handler::CreateStudentRequest,
            student_handler::UpdateStudentRequest,
            enrollment_handler::ReconcileEnrollmentsRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and session handling"),
        (name = "Departments", description = "Department management"),
        (name = "Courses", description = "Course management"),
        (name = "Subjects", description = "Subject management and class assignments"),
        (name = "Teachers", description = "Teacher provisioning"),
        (name = "Students", description = "Student provisioning"),
        (name = "Enrollments", description = "Enrollment reconciliation"),
        (name = "Files", description = "Subject file upload and delivery")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE_NAME,
                    "Session token set by POST /api/auth/login",
                ))),
            );
        }
    }
}
