use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user, owned by the repository.
///
/// Services receive copies for the duration of a single operation and
/// must not cache them across requests. `roles` is populated only by
/// [`super::UserRepositoryInterface::get_roles`]; lookups by id/email
/// return it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier.
    pub id: i32,
    pub login: String,
    pub full_name: String,
    pub email: String,
    /// bcrypt digest; the algorithm and cost are encoded in the string itself.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_check: DateTime<Utc>,
    /// Role names, unique and unordered.
    pub roles: HashSet<String>,
}

/// The identity projection embedded in tokens and injected into the
/// request context by the auth middleware.
///
/// Derived from [`User`] at token-issuance time; goes stale if roles
/// change before the token expires (accepted staleness window = TTL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "userId")]
    pub id: i32,
    pub roles: HashSet<String>,
}
