use crate::middleware::auth::AuthUser;
use crate::middleware::role::parse_role_from_string;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::reports::service::ReportService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, header},
};
use tracing::instrument;
use uuid::Uuid;

/// Download a student's academic report as PDF.
///
/// Students may only download their own report.
#[utoipa::path(
    get,
    path = "/api/reports/student/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "PDF report", body = Vec<u8>, content_type = "application/pdf"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - not your report", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument]
pub async fn get_student_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    if parse_role_from_string(&auth_user.0.role)? == UserRole::Student
        && auth_user.user_id()? != id
    {
        return Err(AppError::forbidden("Access denied".to_string()));
    }

    let report = ReportService::generate_student_report(&state.db, id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", report.filename))
            .map_err(|e| AppError::internal_error(format!("Invalid report filename: {}", e)))?,
    );

    Ok((headers, report.bytes))
}
