use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{get_current_user, update_user_profile};

pub fn build_user_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/usuarios/perfil", put(update_user_profile))
}
