use rusqlite::Connection;
use tracing::info;

use crate::StoreResult;

pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            email           TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL,
            role            TEXT NOT NULL DEFAULT 'REPORTER',
            phone_number    TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ghost_nets (
            id              INTEGER PRIMARY KEY,
            latitude        REAL NOT NULL,
            longitude       REAL NOT NULL,
            size_meters     REAL,
            status          TEXT NOT NULL,
            reported_by     INTEGER,
            reported_at     TEXT NOT NULL,
            scheduled_by    INTEGER,
            scheduled_at    TEXT,
            recovered_by    INTEGER,
            recovered_at    TEXT,
            cancelled_by    INTEGER,
            cancelled_at    TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ghost_nets_status
            ON ghost_nets(status);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
