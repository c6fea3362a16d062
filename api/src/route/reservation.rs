use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    cancel_reservation, create_reservation, show_reservation, show_reservation_list,
    update_reservation_status,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/", post(create_reservation))
        .route("/", get(show_reservation_list))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id", delete(cancel_reservation))
        .route("/:reservation_id/status", patch(update_reservation_status));

    Router::new().nest("/reservas", reservations_routers)
}
