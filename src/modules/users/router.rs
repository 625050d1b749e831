use crate::modules::users::controller::{delete_user, get_me, get_users};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/me", get(get_me))
        .route("/{id}", delete(delete_user))
}
