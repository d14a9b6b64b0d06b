use rusqlite::OptionalExtension;

use crate::Database;
use crate::StoreResult;
use crate::models::{GhostNetRow, UserRow};

impl Database {
    // -- Users --

    /// Insert a new user and return the id SQLite assigned.
    pub fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        created_at: &str,
    ) -> StoreResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, email, password_hash, role, created_at),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_users(&self) -> StoreResult<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, email, password_hash, role, phone_number, created_at
                 FROM users ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], read_user_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(&user_select("id = ?1"), [id], read_user_row)
                .optional()?;
            Ok(row)
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(&user_select("username = ?1"), [username], read_user_row)
                .optional()?;
            Ok(row)
        })
    }

    pub fn exists_by_username(&self, username: &str) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM users WHERE username = ?1",
                    [username],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Email comparison is case-insensitive; stored emails are already
    /// lower-cased but inputs may not be.
    pub fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM users WHERE email = LOWER(?1)",
                    [email],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn update_user_profile(
        &self,
        id: i64,
        email: &str,
        phone_number: Option<&str>,
    ) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET email = ?1, phone_number = ?2 WHERE id = ?3",
                (email, phone_number, id),
            )?;
            Ok(())
        })
    }

    // -- Ghost nets --

    pub fn insert_ghost_net(
        &self,
        latitude: f64,
        longitude: f64,
        size_meters: Option<f64>,
        status: &str,
        reported_by: Option<i64>,
        now: &str,
    ) -> StoreResult<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ghost_nets
                     (latitude, longitude, size_meters, status, reported_by,
                      reported_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?6)",
                (latitude, longitude, size_meters, status, reported_by, now),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_ghost_nets(&self) -> StoreResult<Vec<GhostNetRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM ghost_nets ORDER BY id",
                NET_COLUMNS
            ))?;
            let rows = stmt
                .query_map([], read_net_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_ghost_net_by_id(&self, id: i64) -> StoreResult<Option<GhostNetRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {} FROM ghost_nets WHERE id = ?1", NET_COLUMNS),
                    [id],
                    read_net_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Full-row update: the service mutates the loaded record and saves
    /// it back as a whole.
    pub fn update_ghost_net(&self, row: &GhostNetRow) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE ghost_nets SET
                     status = ?1,
                     scheduled_by = ?2, scheduled_at = ?3,
                     recovered_by = ?4, recovered_at = ?5,
                     cancelled_by = ?6, cancelled_at = ?7,
                     updated_at = ?8
                 WHERE id = ?9",
                (
                    &row.status,
                    row.scheduled_by,
                    row.scheduled_at.as_deref(),
                    row.recovered_by,
                    row.recovered_at.as_deref(),
                    row.cancelled_by,
                    row.cancelled_at.as_deref(),
                    &row.updated_at,
                    row.id,
                ),
            )?;
            Ok(())
        })
    }
}

const NET_COLUMNS: &str = "id, latitude, longitude, size_meters, status, reported_by, \
     reported_at, scheduled_by, scheduled_at, recovered_by, recovered_at, \
     cancelled_by, cancelled_at, created_at, updated_at";

fn user_select(filter: &str) -> String {
    format!(
        "SELECT id, username, email, password_hash, role, phone_number, created_at
         FROM users WHERE {}",
        filter
    )
}

fn read_user_row(row: &rusqlite::Row<'_>) -> Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        phone_number: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn read_net_row(row: &rusqlite::Row<'_>) -> Result<GhostNetRow, rusqlite::Error> {
    Ok(GhostNetRow {
        id: row.get(0)?,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
        size_meters: row.get(3)?,
        status: row.get(4)?,
        reported_by: row.get(5)?,
        reported_at: row.get(6)?,
        scheduled_by: row.get(7)?,
        scheduled_at: row.get(8)?,
        recovered_by: row.get(9)?,
        recovered_at: row.get(10)?,
        cancelled_by: row.get(11)?,
        cancelled_at: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
