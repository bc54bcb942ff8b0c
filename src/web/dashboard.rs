use anyhow::{anyhow, Result};
use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::data::ReadingStore;
use crate::model::LatestReading;
use crate::server::AppState;
use crate::web::templates::{Dashboard, DeviceCard, DeviceChoice};

pub const ALL_DEVICES: &str = "all";

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    device_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    Device(i64),
    /// Anything that is neither "all" nor an id. Echoed back, nothing is queried.
    Unresolved(String),
    Nothing,
}

pub fn resolve_selection(requested: Option<&str>, device_ids: &[i64]) -> Selection {
    match requested {
        None => device_ids
            .first()
            .map_or(Selection::Nothing, |id| Selection::Device(*id)),
        Some(raw) if raw.eq_ignore_ascii_case(ALL_DEVICES) => Selection::All,
        Some(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => raw
            .parse::<i64>()
            .map_or_else(|_| Selection::Unresolved(raw.to_string()), Selection::Device),
        Some(raw) => Selection::Unresolved(raw.to_string()),
    }
}

/// Looks up the latest reading of every device concurrently. Results keep the order
/// of `device_ids` and a failing device never hides the others.
pub async fn fetch_latest(
    store: &ReadingStore,
    device_ids: &[i64],
) -> Vec<(i64, Result<Option<LatestReading>>)> {
    let mut tasks = JoinSet::new();

    for &sensor_id in device_ids {
        let store = store.clone();
        tasks.spawn(async move { (sensor_id, store.latest_summary(sensor_id).await) });
    }

    let mut found = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((sensor_id, result)) => {
                found.insert(sensor_id, result);
            }
            Err(err) => error!("Dashboard lookup task failed: {}", err),
        }
    }

    device_ids
        .iter()
        .map(|&sensor_id| {
            let result = found
                .remove(&sensor_id)
                .unwrap_or_else(|| Err(anyhow!("lookup for sensor {} did not finish", sensor_id)));
            (sensor_id, result)
        })
        .collect()
}

fn build_card(sensor_id: i64, result: Result<Option<LatestReading>>) -> DeviceCard {
    let mut card = DeviceCard {
        sensor_id: sensor_id.to_string(),
        value: String::new(),
        timestamp: String::new(),
        total: String::new(),
        error: None,
    };

    match result {
        Ok(Some(latest)) => {
            card.value = latest.latest_value.to_string();
            card.timestamp = latest
                .latest_timestamp
                .format(crate::model::TIMESTAMP_FORMAT)
                .to_string();
            card.total = latest.total_readings.to_string();
        }
        Ok(None) => card.error = Some("No readings found in DB".to_string()),
        Err(err) => {
            error!("Couldn't read latest reading of sensor {}: {:#}", sensor_id, err);
            card.error = Some(format!("DB access error for sensor {}", sensor_id));
        }
    }

    card
}

fn build_choices(device_ids: &[i64], selection: &Selection) -> Vec<DeviceChoice> {
    let mut choices = vec![DeviceChoice {
        value: ALL_DEVICES.to_string(),
        label: "All devices".to_string(),
        selected: *selection == Selection::All,
    }];

    for &sensor_id in device_ids {
        choices.push(DeviceChoice {
            value: sensor_id.to_string(),
            label: format!("Device {}", sensor_id),
            selected: *selection == Selection::Device(sensor_id),
        });
    }

    choices
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Html<String> {
    let device_ids = state.store.list_device_ids().await.unwrap_or_else(|err| {
        error!("Couldn't list devices: {:#}", err);
        vec![]
    });

    let selection = resolve_selection(params.device_id.as_deref(), &device_ids);

    let queried = match &selection {
        Selection::All => device_ids.clone(),
        Selection::Device(sensor_id) => vec![*sensor_id],
        Selection::Unresolved(raw) => {
            warn!("Ignoring dashboard selection '{}'", raw);
            vec![]
        }
        Selection::Nothing => vec![],
    };

    let cards: Vec<DeviceCard> = fetch_latest(&state.store, &queried)
        .await
        .into_iter()
        .map(|(sensor_id, result)| build_card(sensor_id, result))
        .collect();

    let choices = build_choices(&device_ids, &selection);

    Html(
        Dashboard {
            choices: &choices,
            cards: &cards,
        }
        .to_string(),
    )
}
