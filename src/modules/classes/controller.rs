use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_role, parse_role_from_string};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::classes::model::{
    ClassScope, ClassWithRelations, CreateClassDto, EnrollmentDto, UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// Create a class (admin only)
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created successfully", body = ClassWithRelations),
        (status = 400, description = "Bad request - invalid subject or teacher", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn create_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<CreateClassDto>,
) -> Result<(StatusCode, Json<ClassWithRelations>), AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let class = ClassService::create_class(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// List classes visible to the requester.
///
/// Admins see every class, teachers the classes they teach, students the
/// classes they're enrolled in.
#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "List of classes", body = Vec<ClassWithRelations>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn get_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ClassWithRelations>>, AppError> {
    let user_id = auth_user.user_id()?;
    let scope = match parse_role_from_string(&auth_user.0.role)? {
        UserRole::Admin => ClassScope::All,
        UserRole::Teacher => ClassScope::Teacher(user_id),
        UserRole::Student => ClassScope::Student(user_id),
    };

    let classes = ClassService::get_classes(&state.db, scope).await?;
    Ok(Json(classes))
}

/// Get a class by ID
#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class details", body = ClassWithRelations),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn get_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassWithRelations>, AppError> {
    let class = ClassService::get_class_by_id(&state.db, id).await?;
    Ok(Json(class))
}

/// Update a class (admin only)
#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated successfully", body = ClassWithRelations),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn update_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateClassDto>,
) -> Result<Json<ClassWithRelations>, AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(Json(class))
}

/// Delete a class (admin only)
#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn delete_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    ClassService::delete_class(&state.db, id).await?;
    Ok(Json(json!({"message": "Class deleted successfully"})))
}

/// Enroll a student into a class (admin only)
#[utoipa::path(
    post,
    path = "/api/classes/{id}/enroll",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = EnrollmentDto,
    responses(
        (status = 200, description = "Student enrolled", body = ClassWithRelations),
        (status = 400, description = "Bad request - not a student or already enrolled", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn enroll_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<EnrollmentDto>,
) -> Result<Json<ClassWithRelations>, AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    let class = ClassService::enroll_student(&state.db, id, dto.student_id).await?;
    Ok(Json(class))
}

/// Remove a student from a class (admin only)
#[utoipa::path(
    post,
    path = "/api/classes/{id}/unenroll",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = EnrollmentDto,
    responses(
        (status = 200, description = "Student unenrolled", body = ClassWithRelations),
        (status = 400, description = "Bad request - student not enrolled", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Classes"
)]
#[instrument]
pub async fn unenroll_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<EnrollmentDto>,
) -> Result<Json<ClassWithRelations>, AppError> {
    check_role(&auth_user, UserRole::Admin)?;

    let class = ClassService::unenroll_student(&state.db, id, dto.student_id).await?;
    Ok(Json(class))
}
