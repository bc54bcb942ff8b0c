use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::server::AppState;

mod devices;
mod error;
mod sensor;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(devices::status))
        .route("/devices", get(devices::list_devices))
        .route("/sensor/{id}", post(sensor::insert_reading))
        .route("/sensor/latest/{id}", get(sensor::get_latest))
        .route("/sensor/history/{id}", get(sensor::get_history))
}
