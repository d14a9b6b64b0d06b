//! Database row types — these map directly to SQLite rows.
//! Distinct from the ghostnet-types models so the storage encoding
//! (RFC 3339 text timestamps, status as text) stays in this crate.

use chrono::{DateTime, Utc};
use ghostnet_types::models::{GhostNet, User};

use crate::StoreError;

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub created_at: String,
}

pub struct GhostNetRow {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub size_meters: Option<f64>,
    pub status: String,
    pub reported_by: Option<i64>,
    pub reported_at: String,
    pub scheduled_by: Option<i64>,
    pub scheduled_at: Option<String>,
    pub recovered_by: Option<i64>,
    pub recovered_at: Option<String>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn parse_ts(value: &str, column: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("{}: '{}': {}", column, value, e)))
}

fn parse_ts_opt(value: Option<&str>, column: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    value.map(|v| parse_ts(v, column)).transpose()
}

impl UserRow {
    /// Convert to the API-facing model. The password hash stays behind.
    pub fn into_model(self) -> Result<User, StoreError> {
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            role: self
                .role
                .parse()
                .map_err(|e: String| StoreError::Corrupt(e))?,
            phone_number: self.phone_number,
            created_at: parse_ts(&self.created_at, "users.created_at")?,
        })
    }
}

impl GhostNetRow {
    pub fn into_model(self) -> Result<GhostNet, StoreError> {
        Ok(GhostNet {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            size_meters: self.size_meters,
            status: self
                .status
                .parse()
                .map_err(|e: String| StoreError::Corrupt(e))?,
            reported_by: self.reported_by,
            reported_at: parse_ts(&self.reported_at, "ghost_nets.reported_at")?,
            scheduled_by: self.scheduled_by,
            scheduled_at: parse_ts_opt(self.scheduled_at.as_deref(), "ghost_nets.scheduled_at")?,
            recovered_by: self.recovered_by,
            recovered_at: parse_ts_opt(self.recovered_at.as_deref(), "ghost_nets.recovered_at")?,
            cancelled_by: self.cancelled_by,
            cancelled_at: parse_ts_opt(self.cancelled_at.as_deref(), "ghost_nets.cancelled_at")?,
            created_at: parse_ts(&self.created_at, "ghost_nets.created_at")?,
            updated_at: parse_ts(&self.updated_at, "ghost_nets.updated_at")?,
        })
    }
}

impl From<&GhostNet> for GhostNetRow {
    fn from(net: &GhostNet) -> Self {
        GhostNetRow {
            id: net.id,
            latitude: net.latitude,
            longitude: net.longitude,
            size_meters: net.size_meters,
            status: net.status.as_str().to_string(),
            reported_by: net.reported_by,
            reported_at: net.reported_at.to_rfc3339(),
            scheduled_by: net.scheduled_by,
            scheduled_at: net.scheduled_at.map(|t| t.to_rfc3339()),
            recovered_by: net.recovered_by,
            recovered_at: net.recovered_at.map(|t| t.to_rfc3339()),
            cancelled_by: net.cancelled_by,
            cancelled_at: net.cancelled_at.map(|t| t.to_rfc3339()),
            created_at: net.created_at.to_rfc3339(),
            updated_at: net.updated_at.to_rfc3339(),
        }
    }
}
