use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_any_role, parse_role_from_string};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::grades::model::{
    CreateGradeDto, Grade, GradeWithRelations, PaginatedGradesResponse, StudentAverage,
    UpdateGradeDto,
};
use crate::modules::grades::service::GradeService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PaginationMeta, PaginationParams};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

/// Record a grade (admin or teacher)
#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded successfully", body = Grade),
        (status = 400, description = "Bad request - invalid student or subject", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument]
pub async fn create_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Teacher])?;

    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let grade = GradeService::create_grade(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

/// List grades.
///
/// Admins and teachers see every grade; students see only their own.
#[utoipa::path(
    get,
    path = "/api/grades",
    params(
        PaginationParams
    ),
    responses(
        (status = 200, description = "Paginated list of grades", body = PaginatedGradesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument]
pub async fn get_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedGradesResponse>, AppError> {
    let student_filter = match parse_role_from_string(&auth_user.0.role)? {
        UserRole::Student => Some(auth_user.user_id()?),
        _ => None,
    };

    let (grades, total) =
        GradeService::get_grades(&state.db, student_filter, params.limit(), params.offset())
            .await?;

    Ok(Json(PaginatedGradesResponse {
        meta: PaginationMeta::new(&params, total),
        data: grades,
    }))
}

/// Get a grade by ID.
///
/// Students may only fetch their own grades.
#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(
        ("id" = Uuid, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade details", body = GradeWithRelations),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - not your grade", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument]
pub async fn get_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GradeWithRelations>, AppError> {
    let grade = GradeService::get_grade_by_id(&state.db, id).await?;

    if parse_role_from_string(&auth_user.0.role)? == UserRole::Student
        && grade.student.id != auth_user.user_id()?
    {
        return Err(AppError::forbidden("Access denied".to_string()));
    }

    Ok(Json(grade))
}

/// Update a grade (admin or teacher)
#[utoipa::path(
    put,
    path = "/api/grades/{id}",
    params(
        ("id" = Uuid, Path, description = "Grade ID")
    ),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated successfully", body = GradeWithRelations),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument]
pub async fn update_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateGradeDto>,
) -> Result<Json<GradeWithRelations>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Teacher])?;

    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let grade = GradeService::update_grade(&state.db, id, dto).await?;
    Ok(Json(grade))
}

/// Delete a grade (admin or teacher)
#[utoipa::path(
    delete,
    path = "/api/grades/{id}",
    params(
        ("id" = Uuid, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument]
pub async fn delete_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_any_role(&auth_user, &[UserRole::Admin, UserRole::Teacher])?;

    GradeService::delete_grade(&state.db, id).await?;
    Ok(Json(json!({"message": "Grade deleted successfully"})))
}

/// Get a student's overall average.
///
/// Students may only request their own average. Returns 404 when the
/// student has no grades at all, so an empty record is never mistaken
/// for a zero average.
#[utoipa::path(
    get,
    path = "/api/grades/average/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student average", body = StudentAverage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - not your average", body = ErrorResponse),
        (status = 404, description = "No grades found for this student", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument]
pub async fn get_student_average(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentAverage>, AppError> {
    if parse_role_from_string(&auth_user.0.role)? == UserRole::Student
        && auth_user.user_id()? != id
    {
        return Err(AppError::forbidden("Access denied".to_string()));
    }

    let average = GradeService::get_student_average(&state.db, id).await?;
    Ok(Json(average))
}
