use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles a user can hold: reporters submit net sightings, salvors
/// recover them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Reporter,
    Salvor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Reporter => "REPORTER",
            UserRole::Salvor => "SALVOR",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REPORTER" => Ok(UserRole::Reporter),
            "SALVOR" => Ok(UserRole::Salvor),
            other => Err(format!("unknown user role '{}'", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle states of a ghost-net report. Any status may follow any
/// other; there are no source-state guards on transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetStatus {
    Reported,
    Scheduled,
    Recovered,
    Cancelled,
}

impl NetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetStatus::Reported => "REPORTED",
            NetStatus::Scheduled => "SCHEDULED",
            NetStatus::Recovered => "RECOVERED",
            NetStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for NetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REPORTED" => Ok(NetStatus::Reported),
            "SCHEDULED" => Ok(NetStatus::Scheduled),
            "RECOVERED" => Ok(NetStatus::Recovered),
            "CANCELLED" => Ok(NetStatus::Cancelled),
            other => Err(format!("unknown net status '{}'", other)),
        }
    }
}

impl fmt::Display for NetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account. The password hash lives only in the DB layer
/// and never appears on this type, so it cannot leak through a response.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A ghost-net report with its full audit trail. Actor ids are weak
/// references into the user directory; each actor/timestamp pair for a
/// transition is set together and never cleared afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct GhostNet {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub size_meters: Option<f64>,
    pub status: NetStatus,
    pub reported_by: Option<i64>,
    pub reported_at: DateTime<Utc>,
    pub scheduled_by: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub recovered_by: Option<i64>,
    pub recovered_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&NetStatus::Scheduled).unwrap();
        assert_eq!(json, "\"SCHEDULED\"");

        let parsed: NetStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, NetStatus::Cancelled);
    }

    #[test]
    fn status_str_roundtrip() {
        for status in [
            NetStatus::Reported,
            NetStatus::Scheduled,
            NetStatus::Recovered,
            NetStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<NetStatus>().unwrap(), status);
        }
        assert!("LOST".parse::<NetStatus>().is_err());
    }

    #[test]
    fn role_defaults_to_reporter() {
        assert_eq!(UserRole::default(), UserRole::Reporter);
    }
}
