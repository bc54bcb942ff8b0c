use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// One stored reading, as exposed by history queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reading {
    pub value: f64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
}

impl Reading {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Most recent reading of a device together with how many readings it has.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatestReading {
    pub sensor_id: i64,
    pub latest_value: f64,
    #[serde(serialize_with = "serialize_timestamp")]
    pub latest_timestamp: NaiveDateTime,
    pub total_readings: u64,
}

impl LatestReading {
    pub fn new(sensor_id: i64, latest: Reading, total_readings: u64) -> Self {
        LatestReading {
            sensor_id,
            latest_value: latest.value,
            latest_timestamp: latest.timestamp,
            total_readings,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct History {
    pub sensor_id: i64,
    pub history: Vec<Reading>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeviceList {
    pub devices: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsertedReading {
    pub message: String,
    pub sensor_id: i64,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Status {
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
        }
    }
}
