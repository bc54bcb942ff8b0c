use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::data::HISTORY_LIMIT;
use crate::model::Reading;
use crate::server::AppState;

pub mod dashboard;
mod templates;

use templates::{ErrorFragment, ReadingRow, SensorPage};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/sensor/{id}", get(sensor_page))
        .route("/sensor", get(database_probe))
        .route("/about", get(about))
}

fn chart_script(readings: &[Reading]) -> String {
    let timestamps: Vec<String> = readings.iter().map(Reading::formatted_timestamp).collect();
    let values: Vec<f64> = readings.iter().map(|r| r.value).collect();

    let traces = json!([{
        "x": timestamps,
        "y": values,
        "type": "scatter",
        "mode": "lines+markers",
    }]);

    format!("Plotly.newPlot('chart', {});", traces)
}

pub async fn sensor_page(State(state): State<Arc<AppState>>, Path(sensor_id): Path<i64>) -> Html<String> {
    let readings = match state.store.history(sensor_id, HISTORY_LIMIT).await {
        Ok(readings) => readings,
        Err(err) => {
            error!("Couldn't read history of sensor {}: {:#}", sensor_id, err);
            return Html(
                ErrorFragment {
                    message: "couldn't read sensor history",
                }
                .to_string(),
            );
        }
    };

    let rows: Vec<ReadingRow> = readings
        .iter()
        .map(|reading| ReadingRow {
            value: reading.value.to_string(),
            timestamp: reading.formatted_timestamp(),
        })
        .collect();

    let sensor_id = sensor_id.to_string();
    let chart = chart_script(&readings);

    Html(
        SensorPage {
            sensor_id: &sensor_id,
            rows: &rows,
            chart: &chart,
        }
        .to_string(),
    )
}

/// Checks that the database answers.
pub async fn database_probe(State(state): State<Arc<AppState>>) -> String {
    match state.store.database_time().await {
        Ok(now) => format!("Sensor endpoint OK. Current time: {}", now),
        Err(err) => {
            error!("Database probe failed: {:#}", err);
            "Database connection failed".to_string()
        }
    }
}

pub async fn about() -> &'static str {
    "About"
}
