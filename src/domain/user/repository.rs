use std::collections::HashSet;

use async_trait::async_trait;

use super::{CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

/// Capability set the services need from the user store.
///
/// Uniqueness of login/email is enforced here, not in the callers; a
/// violation surfaces as [`crate::domain::DomainError::Conflict`].
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: &CreateUserDto) -> DomainResult<()>;

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    async fn get_roles(&self, user_id: i32) -> DomainResult<HashSet<String>>;
    async fn set_roles(&self, user_id: i32, roles: &HashSet<String>) -> DomainResult<()>;

    async fn update_user(&self, id: i32, dto: &UpdateUserDto) -> DomainResult<()>;
    async fn update_password(&self, id: i32, new_password_hash: &str) -> DomainResult<()>;
}
