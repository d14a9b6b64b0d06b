//! User directory: registration, credential checks, profile updates.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use ghostnet_db::Database;
use ghostnet_types::api::{LoginRequest, RegisterRequest, UpdateUserRequest};
use ghostnet_types::models::User;

use crate::error::{ApiError, ApiResult};
use crate::hash::PasswordHasher;

#[derive(Clone)]
pub struct UserDirectory {
    db: Arc<Database>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserDirectory {
    pub fn new(db: Arc<Database>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { db, hasher }
    }

    pub fn list(&self) -> ApiResult<Vec<User>> {
        let rows = self.db.list_users()?;
        rows.into_iter()
            .map(|row| row.into_model().map_err(ApiError::from))
            .collect()
    }

    /// Register a new account. Username is trimmed, email is trimmed and
    /// lower-cased before the uniqueness checks and before storage. The
    /// plaintext password exists only long enough to be hashed.
    pub fn register(&self, req: RegisterRequest) -> ApiResult<User> {
        if req.password != req.confirm {
            return Err(ApiError::Validation(
                "confirm: passwords do not match".into(),
            ));
        }

        let username = req.username.trim().to_string();
        if username.is_empty() {
            return Err(ApiError::Validation("username: must not be blank".into()));
        }
        let email = req.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ApiError::Validation("email: must not be blank".into()));
        }

        if self.db.exists_by_username(&username)? {
            return Err(ApiError::Conflict(format!(
                "username: '{}' is already taken",
                username
            )));
        }
        if self.db.exists_by_email(&email)? {
            return Err(ApiError::Conflict(format!(
                "email: '{}' is already taken",
                email
            )));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let role = req.role.unwrap_or_default();
        let created_at = Utc::now();

        // The pre-checks above have a race window; a concurrent insert
        // surfaces here as StoreError::Constraint and maps to Conflict.
        let id = self.db.insert_user(
            &username,
            &email,
            &password_hash,
            role.as_str(),
            &created_at.to_rfc3339(),
        )?;

        info!(user_id = id, username = %username, "registered user");

        Ok(User {
            id,
            username,
            email,
            role,
            phone_number: None,
            created_at,
        })
    }

    /// Credential check. Unknown username and wrong password both come
    /// back as `Ok(None)` — the caller cannot tell them apart, and a
    /// mismatch is a negative result, not an error.
    pub fn login(&self, req: &LoginRequest) -> ApiResult<Option<User>> {
        let Some(row) = self.db.find_user_by_username(&req.username)? else {
            return Ok(None);
        };

        if !self.hasher.verify(&req.password, &row.password_hash) {
            return Ok(None);
        }

        Ok(Some(row.into_model()?))
    }

    /// Update email and/or phone number. The email is only checked and
    /// written when it actually changes; the phone number is replaced
    /// whenever the field is present, with null or empty clearing it.
    pub fn update_profile(&self, id: i64, req: UpdateUserRequest) -> ApiResult<User> {
        let Some(row) = self.db.find_user_by_id(id)? else {
            return Err(ApiError::NotFound(format!("user {} not found", id)));
        };
        let mut user = row.into_model()?;

        if let Some(email) = req.email {
            let email = email.trim().to_lowercase();
            if email.is_empty() {
                return Err(ApiError::Validation("email: must not be blank".into()));
            }
            if email != user.email {
                if self.db.exists_by_email(&email)? {
                    return Err(ApiError::Conflict(format!(
                        "email: '{}' is already in use",
                        email
                    )));
                }
                user.email = email;
            }
        }

        if let Some(phone) = req.phone_number {
            user.phone_number = phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());
        }

        self.db
            .update_user_profile(user.id, &user.email, user.phone_number.as_deref())?;

        info!(user_id = user.id, "updated user profile");
        Ok(user)
    }
}
