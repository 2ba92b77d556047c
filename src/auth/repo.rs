use anyhow::Context;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{error, warn};

use crate::sheets::SheetsClient;

/// Whole-column range of the user table.
pub const USERS_RANGE: &str = "Users!A:F";

/// One row of the `Users` sheet. Rows are append-only; users are never
/// updated or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub age: String,
    pub gender: String,
}

/// Fields of a user that exist before the row does.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub age: String,
    pub gender: String,
}

impl User {
    /// Parse a raw sheet row. Rows with missing columns are rejected
    /// here rather than turning into half-empty users downstream.
    fn from_row(row: &[String]) -> Option<User> {
        let [id, username, password_hash, name, age, gender] = row else {
            return None;
        };
        Some(User {
            id: id.clone(),
            username: username.clone(),
            password_hash: password_hash.clone(),
            name: name.clone(),
            age: age.clone(),
            gender: gender.clone(),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.username.clone(),
            self.password_hash.clone(),
            self.name.clone(),
            self.age.clone(),
            self.gender.clone(),
        ]
    }

    /// Scan the user table for an exact, case-sensitive username match.
    ///
    /// A store failure is reported as "no such user" to keep the public
    /// contract; the log line below is the only place the two cases
    /// differ.
    pub async fn find_by_username(sheets: &dyn SheetsClient, username: &str) -> Option<User> {
        let rows = match sheets.get_rows(USERS_RANGE).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "user lookup degraded to not-found by store failure");
                return None;
            }
        };

        for row in &rows {
            let Some(user) = User::from_row(row) else {
                warn!(columns = row.len(), "skipping malformed user row");
                continue;
            };
            if user.username == username {
                return Some(user);
            }
        }
        None
    }

    /// Append a new user row. The id is a millisecond timestamp,
    /// matching the id scheme of existing rows.
    pub async fn create(sheets: &dyn SheetsClient, new_user: NewUser) -> anyhow::Result<User> {
        let user = User {
            id: new_user_id(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            name: new_user.name,
            age: new_user.age,
            gender: new_user.gender,
        };
        sheets
            .append_row(USERS_RANGE, user.to_row())
            .await
            .context("append user row")?;
        Ok(user)
    }
}

fn new_user_id() -> String {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).to_string()
}
