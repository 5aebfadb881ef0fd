use std::collections::HashSet;

/// Input for [`super::UserRepositoryInterface::create_user`].
///
/// The password arrives already hashed; raw credentials never cross the
/// repository boundary.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: HashSet<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub login: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}
