use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::error::{ApiError, ApiPath, STORAGE_ERROR_MESSAGE};
use crate::data::HISTORY_LIMIT;
use crate::model::{ErrorBody, History, InsertedReading};
use crate::server::AppState;

const MISSING_VALUE_MESSAGE: &str = "Missing value";

#[derive(Debug, Deserialize)]
pub struct InsertParams {
    value: Option<String>,
}

/// Devices report either with `?value=` or with a `{"value": ..}` json body.
/// The query parameter wins when both are present.
fn parse_value(query_value: Option<&str>, body: &[u8]) -> Result<f64, ApiError> {
    let query_value = query_value.map(str::trim).filter(|raw| !raw.is_empty());

    let value = if let Some(raw) = query_value {
        raw.parse::<f64>()
            .map_err(|_| ApiError::Validation(format!("Invalid value '{}'", raw)))?
    } else {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::Validation(MISSING_VALUE_MESSAGE.to_string()));
        }

        let body: serde_json::Value = serde_json::from_slice(body)
            .map_err(|err| ApiError::Validation(format!("Invalid JSON body: {}", err)))?;

        match body.get("value") {
            None | Some(serde_json::Value::Null) => {
                return Err(ApiError::Validation(MISSING_VALUE_MESSAGE.to_string()))
            }
            Some(value) => value
                .as_f64()
                .ok_or_else(|| ApiError::Validation("Value must be a number".to_string()))?,
        }
    };

    if !value.is_finite() {
        return Err(ApiError::Validation(
            "Value must be a finite number".to_string(),
        ));
    }

    Ok(value)
}

pub async fn insert_reading(
    State(state): State<Arc<AppState>>,
    ApiPath(sensor_id): ApiPath<i64>,
    Query(params): Query<InsertParams>,
    body: Bytes,
) -> Result<(StatusCode, Json<InsertedReading>), ApiError> {
    let value = parse_value(params.value.as_deref(), &body)?;

    state
        .store
        .insert_reading(sensor_id, value)
        .await
        .map_err(ApiError::Storage)?;

    info!("Inserted reading {} for sensor {}", value, sensor_id);

    Ok((
        StatusCode::CREATED,
        Json(InsertedReading {
            message: "Inserted successfully".to_string(),
            sensor_id,
            value,
        }),
    ))
}

// Both lookups report failures as 200 with an error body.
pub async fn get_latest(State(state): State<Arc<AppState>>, ApiPath(sensor_id): ApiPath<i64>) -> Response {
    match state.store.latest_summary(sensor_id).await {
        Ok(Some(latest)) => Json(latest).into_response(),
        Ok(None) => Json(ErrorBody::new("No data found")).into_response(),
        Err(err) => {
            error!("Couldn't read latest reading of sensor {}: {:#}", sensor_id, err);
            Json(ErrorBody::new(STORAGE_ERROR_MESSAGE)).into_response()
        }
    }
}

pub async fn get_history(State(state): State<Arc<AppState>>, ApiPath(sensor_id): ApiPath<i64>) -> Response {
    match state.store.history(sensor_id, HISTORY_LIMIT).await {
        Ok(history) => Json(History { sensor_id, history }).into_response(),
        Err(err) => {
            error!("Couldn't read history of sensor {}: {:#}", sensor_id, err);
            Json(ErrorBody::new(STORAGE_ERROR_MESSAGE)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(result: Result<f64, ApiError>) -> String {
        match result {
            Err(ApiError::Validation(message)) => message,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn query_value_takes_precedence_over_body() {
        assert_eq!(parse_value(Some("21.5"), br#"{"value": 3}"#).unwrap(), 21.5);
    }

    #[test]
    fn reads_value_from_json_body() {
        assert_eq!(parse_value(None, br#"{"value": 22}"#).unwrap(), 22.0);
    }

    #[test]
    fn missing_value_is_reported() {
        assert_eq!(validation_message(parse_value(None, b"")), MISSING_VALUE_MESSAGE);
        assert_eq!(validation_message(parse_value(Some(" "), b"{}")), MISSING_VALUE_MESSAGE);
        assert_eq!(
            validation_message(parse_value(None, br#"{"value": null}"#)),
            MISSING_VALUE_MESSAGE
        );
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert!(matches!(
            parse_value(Some("warm"), b""),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_value(None, br#"{"value": "21.5"}"#),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_value(Some("NaN"), b""),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_value(None, b"not json"),
            Err(ApiError::Validation(_))
        ));
    }
}
