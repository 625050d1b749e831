use crate::modules::grades::controller::{
    create_grade, delete_grade, get_grade, get_grades, get_student_average, update_grade,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_grade).get(get_grades))
        .route(
            "/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route("/average/{id}", get(get_student_average))
}
