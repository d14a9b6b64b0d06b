use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{NetStatus, User, UserRole};

// -- Users --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Profile update payload. `phone_number` is a double option: an absent
/// field leaves the stored number untouched, an explicit `null` (or
/// empty string) clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// -- Ghost nets --

/// Submission payload. Coordinates are optional here so their absence
/// can be reported as a field-qualified validation error rather than a
/// deserialization failure. A client-supplied `status` is accepted for
/// compatibility but always ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ReportNetRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub size_meters: Option<f64>,
    #[serde(default)]
    pub status: Option<NetStatus>,
}

/// Status transition payload. Only the actor matching the target status
/// is consulted; the others are carried for callers that always send
/// the full set.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<NetStatus>,
    #[serde(default)]
    pub scheduled_by: Option<i64>,
    #[serde(default)]
    pub recovered_by: Option<i64>,
    #[serde(default)]
    pub cancelled_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_number_distinguishes_null_from_absent() {
        let absent: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.phone_number, None);

        let cleared: UpdateUserRequest =
            serde_json::from_str(r#"{"phone_number": null}"#).unwrap();
        assert_eq!(cleared.phone_number, Some(None));

        let set: UpdateUserRequest =
            serde_json::from_str(r#"{"phone_number": "+49 170 1234567"}"#).unwrap();
        assert_eq!(set.phone_number, Some(Some("+49 170 1234567".to_string())));
    }

    #[test]
    fn report_request_tolerates_missing_fields() {
        let req: ReportNetRequest = serde_json::from_str(r#"{"latitude": 10.0}"#).unwrap();
        assert_eq!(req.latitude, Some(10.0));
        assert_eq!(req.longitude, None);
        assert_eq!(req.status, None);
    }
}
