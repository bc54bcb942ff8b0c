use anyhow::{anyhow, Result};
use rusqlite::params;

use crate::data::DbConnection;

pub fn insert_reading(conn: &DbConnection, sensor_id: i64, value: f64) -> Result<()> {
    let query = "INSERT INTO sensors (sensor_id, value) VALUES (?, ?)";

    let rows = conn.execute(query, params![sensor_id, value])?;

    if rows != 1 {
        return Err(anyhow!("Expected one inserted row, got {}", rows));
    }

    Ok(())
}
