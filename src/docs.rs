use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterRequestDto};
use crate::modules::classes::model::{
    ClassWithRelations, CreateClassDto, EnrollmentDto, StudentInfo, SubjectInfo, TeacherInfo,
    UpdateClassDto,
};
use crate::modules::grades::model::{
    CreateGradeDto, Grade, GradeStudentInfo, GradeSubjectInfo, GradeWithRelations,
    PaginatedGradesResponse, StudentAverage, UpdateGradeDto,
};
use crate::modules::subjects::model::{CreateSubjectDto, Subject, UpdateSubjectDto};
use crate::modules::users::model::{PaginatedUsersResponse, User, UserRole};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::delete_user,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::enroll_student,
        crate::modules::classes::controller::unenroll_student,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::grades::controller::get_student_average,
        crate::modules::reports::controller::get_student_report,
    ),
    components(
        schemas(
            User,
            UserRole,
            PaginatedUsersResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequestDto,
            Subject,
            CreateSubjectDto,
            UpdateSubjectDto,
            ClassWithRelations,
            SubjectInfo,
            TeacherInfo,
            StudentInfo,
            CreateClassDto,
            UpdateClassDto,
            EnrollmentDto,
            Grade,
            GradeWithRelations,
            GradeStudentInfo,
            GradeSubjectInfo,
            CreateGradeDto,
            UpdateGradeDto,
            StudentAverage,
            PaginatedGradesResponse,
            PaginationMeta,
            PaginationParams,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User management endpoints"),
        (name = "Subjects", description = "Subject catalog endpoints"),
        (name = "Classes", description = "Class and enrollment management"),
        (name = "Grades", description = "Grade management and averages"),
        (name = "Reports", description = "Academic report generation")
    ),
    info(
        title = "Schoolhub API",
        version = "0.1.0",
        description = "A school-management REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication and role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
