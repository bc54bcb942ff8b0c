pub const SENSORS_TABLE: &str = "CREATE TABLE IF NOT EXISTS sensors (
                                id INTEGER PRIMARY KEY AUTOINCREMENT,
                                sensor_id INTEGER NOT NULL,
                                value REAL NOT NULL,
                                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
                            );";

pub const SENSORS_INDEX: &str = "CREATE INDEX IF NOT EXISTS sensors_by_device
                                ON sensors (sensor_id, created_at);";

