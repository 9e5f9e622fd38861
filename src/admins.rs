//! Administrators
//!
//! An admin record holds the name shown on the dashboard and the sign-in email used to
//! look it up. Records live at `admins/{user_id}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    session::Session,
    store::{DocumentPath, StoreWrite},
};

/// Errors raised when registering an administrator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// A required field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Stored administrator document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Sign-in email.
    pub email: String,
}

impl AdminRecord {
    /// Name shown on the admin dashboard.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if this record belongs to the signed-in user.
    pub fn matches(&self, session: &Session) -> bool {
        self.email.eq_ignore_ascii_case(session.email.trim())
    }
}

/// Register the signed-in user as an administrator.
///
/// Names are trimmed and the email is taken from the session.
///
/// # Errors
///
/// Returns [`AdminError::MissingField`] for the first empty name or a session without
/// an email.
pub fn register(
    session: &Session,
    first_name: &str,
    last_name: &str,
) -> Result<StoreWrite<AdminRecord>, AdminError> {
    let first_name = required("First name", first_name)?;
    let last_name = required("Last name", last_name)?;
    let email = required("Email", &session.email)?;

    debug!(user = %session.user_id, "registered admin");

    Ok(StoreWrite::Set {
        path: DocumentPath::admin(&session.user_id),
        document: AdminRecord {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        },
    })
}

/// Find the admin record for the signed-in user, matching on email.
pub fn find_admin<'a>(
    admins: impl IntoIterator<Item = &'a AdminRecord>,
    session: &Session,
) -> Option<&'a AdminRecord> {
    let found = admins.into_iter().find(|admin| admin.matches(session));

    if found.is_none() {
        warn!(user = %session.user_id, "no admin record for session");
    }

    found
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AdminError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(AdminError::MissingField(field));
    }

    Ok(value)
}
