use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::error;

use crate::model::{DeviceList, Status};
use crate::server::AppState;

pub async fn status() -> Json<Status> {
    Json(Status {
        status: "Backend running correctly".to_string(),
    })
}

pub async fn list_devices(State(state): State<Arc<AppState>>) -> Json<DeviceList> {
    let devices = state.store.list_device_ids().await.unwrap_or_else(|err| {
        error!("Couldn't list devices: {:#}", err);
        vec![]
    });

    Json(DeviceList { devices })
}
