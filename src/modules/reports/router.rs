use crate::modules::reports::controller::get_student_report;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_reports_router() -> Router<AppState> {
    Router::new().route("/student/{id}", get(get_student_report))
}
