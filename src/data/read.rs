use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use crate::data::DbConnection;
use crate::model::Reading;

pub fn get_latest_reading(conn: &DbConnection, sensor_id: i64) -> Result<Option<Reading>> {
    let reading = conn
        .query_row(
            "SELECT value, created_at
             FROM sensors
             WHERE sensor_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT 1;",
            [sensor_id],
            |row| {
                Ok(Reading {
                    value: row.get(0)?,
                    timestamp: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(reading)
}

pub fn get_reading_count(conn: &DbConnection, sensor_id: i64) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sensors WHERE sensor_id = ?;",
        [sensor_id],
        |row| row.get(0),
    )?;

    Ok(u64::try_from(count)?)
}

/// Most recent `limit` readings of a device, oldest first.
pub fn get_history(conn: &DbConnection, sensor_id: i64, limit: usize) -> Result<Vec<Reading>> {
    let mut stmt = conn.prepare(
        "SELECT value, created_at
         FROM sensors
         WHERE sensor_id = ?
         ORDER BY created_at DESC, id DESC
         LIMIT ?;",
    )?;

    let rows = stmt.query_map(params![sensor_id, i64::try_from(limit)?], |row| {
        Ok(Reading {
            value: row.get(0)?,
            timestamp: row.get(1)?,
        })
    })?;

    let mut result = rows.collect::<rusqlite::Result<Vec<Reading>>>()?;
    result.reverse();

    Ok(result)
}

pub fn get_device_ids(conn: &DbConnection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT DISTINCT sensor_id FROM sensors ORDER BY sensor_id;")?;

    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    Ok(ids)
}

pub fn get_database_time(conn: &DbConnection) -> Result<String> {
    let now: String = conn.query_row("SELECT datetime('now');", [], |row| row.get(0))?;

    Ok(now)
}
