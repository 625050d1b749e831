use crate::modules::classes::controller::{
    create_class, delete_class, enroll_student, get_class, get_classes, unenroll_student,
    update_class,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class).get(get_classes))
        .route(
            "/{id}",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/{id}/enroll", post(enroll_student))
        .route("/{id}/unenroll", post(unenroll_student))
}
